use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pedigree_coi_core::engine::{
    calculate_inbreeding_coefficient, calculate_pairing_inbreeding, explain_pairing_inbreeding,
    PairingExplanation,
};
use pedigree_coi_core::store::MemoryStore;

#[derive(Parser)]
#[command(name = "pedigree-coi")]
#[command(version)]
#[command(about = "Wright inbreeding coefficients from breeder pedigree records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the inbreeding coefficient of a recorded animal
    Coi {
        /// Path to the animal CSV file (columns: animal, name, sire, dam)
        #[arg(short, long)]
        animals: String,

        /// Identifier of the animal to evaluate
        #[arg(long)]
        animal: String,

        /// Maximum number of ancestor generations to expand
        #[arg(long, default_value = "50")]
        generations: usize,
    },

    /// Predict the inbreeding coefficient of a hypothetical sire x dam pairing
    Pairing {
        /// Path to the animal CSV file (columns: animal, name, sire, dam)
        #[arg(short, long)]
        animals: String,

        /// Sire identifier
        #[arg(long)]
        sire: String,

        /// Dam identifier
        #[arg(long)]
        dam: String,

        /// Maximum number of ancestor generations to expand
        #[arg(long, default_value = "5")]
        generations: usize,
    },

    /// Predict a pairing and print the per-ancestor contribution breakdown
    Explain {
        /// Path to the animal CSV file (columns: animal, name, sire, dam)
        #[arg(short, long)]
        animals: String,

        /// Sire identifier
        #[arg(long)]
        sire: String,

        /// Dam identifier
        #[arg(long)]
        dam: String,

        /// Maximum number of ancestor generations to expand
        #[arg(long, default_value = "50")]
        generations: usize,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Coi {
            animals,
            animal,
            generations,
        } => cmd_coi(&animals, &animal, generations),
        Commands::Pairing {
            animals,
            sire,
            dam,
            generations,
        } => cmd_pairing(&animals, &sire, &dam, generations),
        Commands::Explain {
            animals,
            sire,
            dam,
            generations,
            format,
        } => cmd_explain(&animals, &sire, &dam, generations, &format),
    }
}

fn load_store(path: &str) -> Result<MemoryStore> {
    let store = MemoryStore::from_csv(path)
        .with_context(|| format!("Failed to load animal records from '{}'", path))?;
    eprintln!("Loaded {} animals from '{}'", store.n_animals(), path);
    Ok(store)
}

fn cmd_coi(animals_path: &str, animal: &str, generations: usize) -> Result<()> {
    let store = load_store(animals_path)?;
    let coi = calculate_inbreeding_coefficient(&store, animal, generations)
        .with_context(|| format!("Failed to compute COI for '{}'", animal))?;
    println!("Inbreeding coefficient of '{}': {:.2}%", animal, coi);
    Ok(())
}

fn cmd_pairing(animals_path: &str, sire: &str, dam: &str, generations: usize) -> Result<()> {
    let store = load_store(animals_path)?;
    let coi = calculate_pairing_inbreeding(&store, sire, dam, generations)
        .with_context(|| format!("Failed to predict pairing '{}' x '{}'", sire, dam))?;
    println!("Predicted COI for '{}' x '{}': {:.4}%", sire, dam, coi);
    Ok(())
}

fn cmd_explain(
    animals_path: &str,
    sire: &str,
    dam: &str,
    generations: usize,
    output_format: &str,
) -> Result<()> {
    let store = load_store(animals_path)?;
    let explanation = explain_pairing_inbreeding(&store, sire, dam, generations)
        .with_context(|| format!("Failed to explain pairing '{}' x '{}'", sire, dam))?;

    match output_format.to_lowercase().as_str() {
        "json" => print_json(sire, dam, &explanation)?,
        _ => print_text(sire, dam, &explanation),
    }

    Ok(())
}

fn print_text(sire: &str, dam: &str, explanation: &PairingExplanation) {
    println!("Predicted COI for '{}' x '{}': {:.4}%", sire, dam, explanation.total);

    if explanation.breakdown.is_empty() {
        println!("No common ancestors.");
        return;
    }

    for ancestor in &explanation.breakdown {
        println!(
            "\n{} ({}): {:.4}% via {} path pair(s), own F = {:.2}%",
            ancestor.name,
            ancestor.id,
            ancestor.contribution_pct,
            ancestor.path_pairs.len(),
            ancestor.coefficient_pct,
        );
        for pair in &ancestor.path_pairs {
            println!(
                "  sire {} ({} links) x dam {} ({} links): {:.4}%",
                pair.sire_path.join(" -> "),
                pair.sire_links,
                pair.dam_path.join(" -> "),
                pair.dam_links,
                pair.contribution_pct,
            );
        }
    }
}

fn print_json(sire: &str, dam: &str, explanation: &PairingExplanation) -> Result<()> {
    let mut map = serde_json::Map::new();

    map.insert("sire".to_string(), serde_json::json!(sire));
    map.insert("dam".to_string(), serde_json::json!(dam));
    map.insert("total".to_string(), serde_json::json!(explanation.total));

    let breakdown: Vec<serde_json::Value> = explanation
        .breakdown
        .iter()
        .map(|ancestor| {
            let pairs: Vec<serde_json::Value> = ancestor
                .path_pairs
                .iter()
                .map(|pair| {
                    serde_json::json!({
                        "sire_path": pair.sire_path,
                        "dam_path": pair.dam_path,
                        "sire_links": pair.sire_links,
                        "dam_links": pair.dam_links,
                        "contribution_pct": pair.contribution_pct,
                    })
                })
                .collect();

            serde_json::json!({
                "id": ancestor.id,
                "name": ancestor.name,
                "coefficient_pct": ancestor.coefficient_pct,
                "contribution_pct": ancestor.contribution_pct,
                "path_pairs": pairs,
            })
        })
        .collect();
    map.insert("breakdown".to_string(), serde_json::json!(breakdown));

    println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(map))?);
    Ok(())
}
