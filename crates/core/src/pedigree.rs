use std::collections::HashSet;

use crate::error::Result;
use crate::store::AnimalStore;

/// One node of a bounded-depth ancestry tree.
///
/// Ancestry is really a DAG (an inbred ancestor reaches a descendant through
/// several routes), but the engine represents it as a tree by re-expanding a
/// shared ancestor at each occurrence. Ownership is strictly per-subtree;
/// nodes are never shared across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct PedigreeNode {
    /// Animal identifier string.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sire subtree, or `None` if unknown, out of depth, or not recorded.
    pub sire: Option<Box<PedigreeNode>>,
    /// Dam subtree, or `None` if unknown, out of depth, or not recorded.
    pub dam: Option<Box<PedigreeNode>>,
    /// This animal's own inbreeding coefficient as a fraction in [0, 1].
    ///
    /// The builder always assigns 0 here; the field stays in the formula as
    /// the `(1 + F_A)` factor so real ancestor coefficients can be threaded
    /// through later without changing the arithmetic.
    pub coefficient: f64,
}

impl PedigreeNode {
    /// A node with no recorded parents; terminates its lineage.
    pub fn is_leaf(&self) -> bool {
        self.sire.is_none() && self.dam.is_none()
    }

    /// Total number of nodes in this subtree, counting re-expanded ancestors
    /// once per occurrence.
    pub fn n_nodes(&self) -> usize {
        1 + self.sire.as_ref().map_or(0, |s| s.n_nodes())
            + self.dam.as_ref().map_or(0, |d| d.n_nodes())
    }
}

/// Recursively expand an animal identifier into a bounded-depth ancestry
/// tree, fetching records through `store`.
///
/// - `None` id or `generations == 0` yields no node.
/// - An unrecorded animal truncates its branch (`Ok(None)`), it is not an
///   error; only a failing store propagates as `Err`.
/// - An identifier already visited on the *current* recursive path marks a
///   corrupted, cyclic record: the animal is kept as a childless leaf so the
///   walk terminates, and no error is raised. The visited set is scoped to
///   one lineage path, so a legitimately repeated ancestor in a sibling
///   branch is still expanded in full.
///
/// # Errors
/// Returns an error only if `store` itself fails.
pub fn build_pedigree(
    store: &dyn AnimalStore,
    id: Option<&str>,
    generations: usize,
) -> Result<Option<PedigreeNode>> {
    build_with_lineage(store, id, generations, &HashSet::new())
}

fn build_with_lineage(
    store: &dyn AnimalStore,
    id: Option<&str>,
    depth_remaining: usize,
    lineage: &HashSet<String>,
) -> Result<Option<PedigreeNode>> {
    let id = match id {
        Some(id) => id,
        None => return Ok(None),
    };
    if depth_remaining == 0 {
        return Ok(None);
    }

    let record = match store.fetch_animal(id)? {
        Some(record) => record,
        None => return Ok(None),
    };

    if lineage.contains(id) {
        // Animal recorded as its own ancestor. Keep it as a leaf and stop.
        log::debug!("cycle in ancestry of '{}'; truncating lineage", id);
        return Ok(Some(PedigreeNode {
            id: record.id,
            name: record.name,
            sire: None,
            dam: None,
            coefficient: 0.0,
        }));
    }

    // Copy-on-recurse: each recursive path carries its own visited set.
    let mut visited = lineage.clone();
    visited.insert(id.to_string());

    let sire = build_with_lineage(store, record.sire_id.as_deref(), depth_remaining - 1, &visited)?;
    let dam = build_with_lineage(store, record.dam_id.as_deref(), depth_remaining - 1, &visited)?;

    Ok(Some(PedigreeNode {
        id: record.id,
        name: record.name,
        sire: sire.map(Box::new),
        dam: dam.map(Box::new),
        coefficient: 0.0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AnimalRecord, MemoryStore};

    /// Three generations: offspring O with parents S1/D1, S1's parents are
    /// GS/GD.
    fn three_generation_store() -> MemoryStore {
        MemoryStore::from_records(vec![
            AnimalRecord::new("GS", "Grandsire", None, None),
            AnimalRecord::new("GD", "Granddam", None, None),
            AnimalRecord::new("S1", "Sire", Some("GS"), Some("GD")),
            AnimalRecord::new("D1", "Dam", None, None),
            AnimalRecord::new("O", "Offspring", Some("S1"), Some("D1")),
        ])
    }

    #[test]
    fn test_build_full_depth() {
        let store = three_generation_store();
        let tree = build_pedigree(&store, Some("O"), 10).unwrap().unwrap();

        assert_eq!(tree.id, "O");
        assert_eq!(tree.n_nodes(), 5);

        let sire = tree.sire.as_deref().unwrap();
        assert_eq!(sire.id, "S1");
        assert_eq!(sire.sire.as_deref().unwrap().id, "GS");
        assert_eq!(sire.dam.as_deref().unwrap().id, "GD");

        let dam = tree.dam.as_deref().unwrap();
        assert!(dam.is_leaf());
    }

    #[test]
    fn test_depth_bound_truncates() {
        let store = three_generation_store();

        assert!(build_pedigree(&store, Some("O"), 0).unwrap().is_none());

        let tree = build_pedigree(&store, Some("O"), 2).unwrap().unwrap();
        // Depth 2 keeps O and its parents but not the grandparents.
        assert_eq!(tree.n_nodes(), 3);
        assert!(tree.sire.as_deref().unwrap().is_leaf());
    }

    #[test]
    fn test_missing_id_and_unrecorded_animal() {
        let store = three_generation_store();
        assert!(build_pedigree(&store, None, 10).unwrap().is_none());
        assert!(build_pedigree(&store, Some("ghost"), 10).unwrap().is_none());
    }

    #[test]
    fn test_unrecorded_parent_truncates_branch() {
        let store = MemoryStore::from_records(vec![AnimalRecord::new(
            "X",
            "Orphan",
            Some("missing-sire"),
            None,
        )]);
        let tree = build_pedigree(&store, Some("X"), 10).unwrap().unwrap();
        assert!(tree.is_leaf());
    }

    #[test]
    fn test_self_cycle_terminates_as_leaf() {
        // Corrupted record: A is its own sire.
        let store = MemoryStore::from_records(vec![AnimalRecord::new(
            "A",
            "Ouroboros",
            Some("A"),
            None,
        )]);
        let tree = build_pedigree(&store, Some("A"), 50).unwrap().unwrap();

        let repeat = tree.sire.as_deref().unwrap();
        assert_eq!(repeat.id, "A");
        assert!(repeat.is_leaf());
        assert_eq!(tree.n_nodes(), 2);
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        // A's sire is B, B's sire is A.
        let store = MemoryStore::from_records(vec![
            AnimalRecord::new("A", "A", Some("B"), None),
            AnimalRecord::new("B", "B", Some("A"), None),
        ]);
        let tree = build_pedigree(&store, Some("A"), 50).unwrap().unwrap();

        // A -> B -> A(leaf); the guard cuts the second visit to A.
        let b = tree.sire.as_deref().unwrap();
        assert_eq!(b.id, "B");
        let a_again = b.sire.as_deref().unwrap();
        assert_eq!(a_again.id, "A");
        assert!(a_again.is_leaf());
    }

    #[test]
    fn test_repeated_ancestor_expanded_in_both_branches() {
        // GS appears behind both parents; the cycle guard is path-local, so
        // both occurrences must be fully expanded.
        let store = MemoryStore::from_records(vec![
            AnimalRecord::new("GS", "Shared grandsire", None, None),
            AnimalRecord::new("S1", "Sire", Some("GS"), None),
            AnimalRecord::new("D1", "Dam", Some("GS"), None),
            AnimalRecord::new("O", "Offspring", Some("S1"), Some("D1")),
        ]);
        let tree = build_pedigree(&store, Some("O"), 10).unwrap().unwrap();

        assert_eq!(tree.sire.as_deref().unwrap().sire.as_deref().unwrap().id, "GS");
        assert_eq!(tree.dam.as_deref().unwrap().sire.as_deref().unwrap().id, "GS");
        assert_eq!(tree.n_nodes(), 5);
    }

    #[test]
    fn test_builder_coefficient_is_zero() {
        let store = three_generation_store();
        let tree = build_pedigree(&store, Some("O"), 10).unwrap().unwrap();
        assert_eq!(tree.coefficient, 0.0);
        assert_eq!(tree.sire.as_deref().unwrap().coefficient, 0.0);
    }
}
