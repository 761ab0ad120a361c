use std::collections::HashMap;
use std::path::Path;

use crate::error::{GenealogyError, Result};

/// A single animal record as held by the external data store: identifier,
/// display name, and optional parent identifiers.
///
/// The engine never mutates records; it only reads them through
/// [`AnimalStore::fetch_animal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalRecord {
    /// Animal identifier string.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sire identifier, or `None` if unknown.
    pub sire_id: Option<String>,
    /// Dam identifier, or `None` if unknown.
    pub dam_id: Option<String>,
}

impl AnimalRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sire_id: Option<&str>,
        dam_id: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sire_id: sire_id.map(str::to_string),
            dam_id: dam_id.map(str::to_string),
        }
    }
}

/// The engine's only I/O boundary: look up one animal record by identifier.
///
/// `Ok(None)` means the animal is not recorded; the engine treats that as a
/// truncated lineage branch, never as a failure. An `Err` means the backing
/// storage itself failed and is propagated to the caller unchanged —
/// swallowing it would silently understate inbreeding.
///
/// Callers are responsible for ownership/authorization checks before handing
/// a store to the engine.
pub trait AnimalStore {
    fn fetch_animal(&self, id: &str) -> Result<Option<AnimalRecord>>;
}

/// HashMap-backed [`AnimalStore`], suitable for offline computation, the CLI,
/// and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, AnimalRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of animals in the store.
    pub fn n_animals(&self) -> usize {
        self.records.len()
    }

    /// Insert a record, replacing any existing record with the same id.
    pub fn insert(&mut self, record: AnimalRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Convenience constructor from `(id, name, sire, dam)` tuples.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AnimalRecord>,
    {
        let mut store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Read animal records from a CSV file.
    ///
    /// Expected columns (header required): `animal`, `name`, `sire`, `dam`.
    /// The `name` column is optional; when missing, the identifier doubles as
    /// the display name. Unknown parents are coded as `"0"`, `""`, or `"NA"`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the `animal` column is
    /// missing, or duplicate animal IDs are found.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let animal_col = headers
            .iter()
            .position(|h| h == "animal")
            .ok_or_else(|| {
                GenealogyError::Pedigree("CSV missing 'animal' column".to_string())
            })?;
        let name_col = headers.iter().position(|h| h == "name");
        let sire_col = headers
            .iter()
            .position(|h| h == "sire")
            .ok_or_else(|| {
                GenealogyError::Pedigree("CSV missing 'sire' column".to_string())
            })?;
        let dam_col = headers
            .iter()
            .position(|h| h == "dam")
            .ok_or_else(|| {
                GenealogyError::Pedigree("CSV missing 'dam' column".to_string())
            })?;

        let mut store = Self::new();

        for result in reader.records() {
            let record = result?;

            let animal = record
                .get(animal_col)
                .ok_or_else(|| {
                    GenealogyError::Pedigree("Missing animal field in row".to_string())
                })?
                .to_string();

            if store.records.contains_key(&animal) {
                return Err(GenealogyError::Pedigree(format!(
                    "Duplicate animal ID: '{}'",
                    animal
                )));
            }

            let name = name_col
                .and_then(|c| record.get(c))
                .filter(|n| !n.is_empty())
                .unwrap_or(&animal)
                .to_string();

            let sire = record.get(sire_col).and_then(parse_parent);
            let dam = record.get(dam_col).and_then(parse_parent);

            store.insert(AnimalRecord {
                id: animal,
                name,
                sire_id: sire,
                dam_id: dam,
            });
        }

        Ok(store)
    }
}

impl AnimalStore for MemoryStore {
    fn fetch_animal(&self, id: &str) -> Result<Option<AnimalRecord>> {
        Ok(self.records.get(id).cloned())
    }
}

/// Parse a parent string, returning `None` for unknown parents.
///
/// Unknown parents are coded as `"0"`, `""`, `"NA"`, or `"na"`.
fn parse_parent(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("na") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
