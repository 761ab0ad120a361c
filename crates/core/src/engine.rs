//! Public entry points of the genealogy engine.
//!
//! All three operations are deterministic pure functions of the ancestry
//! graph visible through the injected [`AnimalStore`] at call time: they
//! build a fresh pedigree per invocation, share no state across calls, and
//! perform no writes.

use crate::coi::{coi_with_breakdown, compute_coi, AncestorContribution};
use crate::error::Result;
use crate::pedigree::{build_pedigree, PedigreeNode};
use crate::store::AnimalStore;

/// Default generation bound for a single animal's recorded pedigree.
pub const DEFAULT_COI_GENERATIONS: usize = 50;

/// Default generation bound for a hypothetical pairing prediction.
pub const DEFAULT_PAIRING_GENERATIONS: usize = 5;

/// Identifier given to the synthetic offspring root of a pairing prediction.
const PAIRING_ROOT_ID: &str = "hypothetical-offspring";

/// Result of [`explain_pairing_inbreeding`]: the rounded total plus the
/// per-ancestor audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingExplanation {
    /// Total COI as a percentage, rounded to four decimals; numerically
    /// identical to [`calculate_pairing_inbreeding`] for the same inputs.
    pub total: f64,
    /// Per-ancestor contributions, sorted descending.
    pub breakdown: Vec<AncestorContribution>,
}

/// Coefficient of inbreeding of a recorded animal, as a percentage rounded
/// to two decimals.
///
/// An unrecorded `animal_id`, a missing parent on either side, or disjoint
/// parental lineages all yield exactly 0.
///
/// # Errors
/// Returns an error only if the store fails.
pub fn calculate_inbreeding_coefficient(
    store: &dyn AnimalStore,
    animal_id: &str,
    generations: usize,
) -> Result<f64> {
    let record = match store.fetch_animal(animal_id)? {
        Some(record) => record,
        None => return Ok(0.0),
    };

    let sire = build_pedigree(store, record.sire_id.as_deref(), generations)?;
    let dam = build_pedigree(store, record.dam_id.as_deref(), generations)?;

    let coi = compute_coi(sire.as_ref(), dam.as_ref());
    Ok(round_pct(coi * 100.0, 2))
}

/// Predicted coefficient of inbreeding for a hypothetical sire x dam
/// pairing, as a percentage rounded to four decimals.
///
/// # Errors
/// Returns an error only if the store fails.
pub fn calculate_pairing_inbreeding(
    store: &dyn AnimalStore,
    sire_id: &str,
    dam_id: &str,
    generations: usize,
) -> Result<f64> {
    let root = build_pairing_root(store, sire_id, dam_id, generations)?;
    let coi = compute_coi(root.sire.as_deref(), root.dam.as_deref());
    Ok(round_pct(coi * 100.0, 4))
}

/// Diagnostic variant of [`calculate_pairing_inbreeding`]: the same total
/// plus the full per-ancestor, per-path-pair breakdown.
///
/// # Errors
/// Returns an error only if the store fails.
pub fn explain_pairing_inbreeding(
    store: &dyn AnimalStore,
    sire_id: &str,
    dam_id: &str,
    generations: usize,
) -> Result<PairingExplanation> {
    let root = build_pairing_root(store, sire_id, dam_id, generations)?;
    let (coi, breakdown) = coi_with_breakdown(root.sire.as_deref(), root.dam.as_deref());
    Ok(PairingExplanation {
        total: round_pct(coi * 100.0, 4),
        breakdown,
    })
}

/// Synthesize the placeholder offspring of a hypothetical pairing. The rest
/// of the pipeline runs on it exactly as on a recorded animal.
fn build_pairing_root(
    store: &dyn AnimalStore,
    sire_id: &str,
    dam_id: &str,
    generations: usize,
) -> Result<PedigreeNode> {
    let sire = build_pedigree(store, Some(sire_id), generations)?;
    let dam = build_pedigree(store, Some(dam_id), generations)?;

    Ok(PedigreeNode {
        id: PAIRING_ROOT_ID.to_string(),
        name: "Hypothetical offspring".to_string(),
        sire: sire.map(Box::new),
        dam: dam.map(Box::new),
        coefficient: 0.0,
    })
}

fn round_pct(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
