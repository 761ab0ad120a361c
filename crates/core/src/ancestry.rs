use std::collections::HashSet;

use indexmap::IndexMap;

use crate::pedigree::PedigreeNode;

/// A lightweight projection of a [`PedigreeNode`], produced when flattening a
/// lineage. Before [`dedupe_by_identity`] runs, several entries may carry the
/// same identifier — a genuinely inbred ancestor recurs in the flat list once
/// per route through the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Ancestor {
    pub id: String,
    pub name: String,
    /// The ancestor's own inbreeding coefficient as a fraction.
    pub coefficient: f64,
}

/// Flatten a subtree into its ancestor entries via a pre-order walk (node,
/// then sire subtree, then dam subtree). Duplicates are expected and
/// preserved at this stage.
pub fn collect_ancestors(node: &PedigreeNode) -> Vec<Ancestor> {
    let mut out = Vec::new();
    collect_into(node, &mut out);
    out
}

fn collect_into(node: &PedigreeNode, out: &mut Vec<Ancestor>) {
    out.push(Ancestor {
        id: node.id.clone(),
        name: node.name.clone(),
        coefficient: node.coefficient,
    });
    if let Some(sire) = &node.sire {
        collect_into(sire, out);
    }
    if let Some(dam) = &node.dam {
        collect_into(dam, out);
    }
}

/// Reduce a flat ancestor list to one entry per identity, keeping the first
/// occurrence encountered.
///
/// This must run before common-ancestor resolution; without it the same
/// individual would be processed as several different ancestors and its
/// contribution double- or triple-counted.
pub fn dedupe_by_identity(entries: Vec<Ancestor>) -> Vec<Ancestor> {
    let mut unique: IndexMap<String, Ancestor> = IndexMap::new();
    for entry in entries {
        unique.entry(entry.id.clone()).or_insert(entry);
    }
    unique.into_values().collect()
}

/// Individuals appearing in both the sire-side and dam-side lineage, one
/// entry per identity, in sire-side first-appearance order.
///
/// If either subtree is absent the result is empty: no inbreeding is
/// computable without both parental lineages. Path information is
/// intentionally discarded here; paths are re-enumerated per ancestor by
/// [`find_paths_to_ancestor`] so that every distinct route is counted.
pub fn find_common_ancestors(
    sire_subtree: Option<&PedigreeNode>,
    dam_subtree: Option<&PedigreeNode>,
) -> Vec<Ancestor> {
    let (sire, dam) = match (sire_subtree, dam_subtree) {
        (Some(sire), Some(dam)) => (sire, dam),
        _ => return Vec::new(),
    };

    let dam_ids: HashSet<String> = collect_ancestors(dam)
        .into_iter()
        .map(|a| a.id)
        .collect();

    dedupe_by_identity(collect_ancestors(sire))
        .into_iter()
        .filter(|a| dam_ids.contains(&a.id))
        .collect()
}

/// Enumerate every distinct path from `root` down to the ancestor with
/// identifier `ancestor_id`.
///
/// Exhaustive depth-first search branching into both sire and dam children
/// at every node; a branch terminates the instant the current node matches
/// the target. Each path is the ordered identifier sequence from `root` to
/// the ancestor, inclusive of both endpoints, so its length equals the number
/// of parent-to-child links traversed plus one.
pub fn find_paths_to_ancestor(root: &PedigreeNode, ancestor_id: &str) -> Vec<Vec<String>> {
    let mut paths = Vec::new();
    let mut prefix = Vec::new();
    walk_paths(root, ancestor_id, &mut prefix, &mut paths);
    paths
}

fn walk_paths(
    node: &PedigreeNode,
    target: &str,
    prefix: &mut Vec<String>,
    paths: &mut Vec<Vec<String>>,
) {
    prefix.push(node.id.clone());
    if node.id == target {
        paths.push(prefix.clone());
    } else {
        if let Some(sire) = &node.sire {
            walk_paths(sire, target, prefix, paths);
        }
        if let Some(dam) = &node.dam {
            walk_paths(dam, target, prefix, paths);
        }
    }
    prefix.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::build_pedigree;
    use crate::store::{AnimalRecord, MemoryStore};

    /// Inbred sire line: GS appears behind both of S1's parents.
    ///
    ///   S1 = SA x SB, SA = GS x ?, SB = GS x ?
    fn inbred_sire_store() -> MemoryStore {
        MemoryStore::from_records(vec![
            AnimalRecord::new("GS", "Grandsire", None, None),
            AnimalRecord::new("SA", "Sire A", Some("GS"), None),
            AnimalRecord::new("SB", "Sire B", Some("GS"), None),
            AnimalRecord::new("S1", "Sire", Some("SA"), Some("SB")),
            AnimalRecord::new("D1", "Dam", Some("GS"), None),
        ])
    }

    fn subtree(store: &MemoryStore, id: &str) -> PedigreeNode {
        build_pedigree(store, Some(id), 10).unwrap().unwrap()
    }

    #[test]
    fn test_collect_preorder_with_duplicates() {
        let store = inbred_sire_store();
        let s1 = subtree(&store, "S1");
        let ancestors = collect_ancestors(&s1);
        let ids: Vec<&str> = ancestors.iter().map(|a| a.id.as_str()).collect();
        // Pre-order: node, sire branch, dam branch; GS appears twice.
        assert_eq!(ids, vec!["S1", "SA", "GS", "SB", "GS"]);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let entries = vec![
            Ancestor { id: "GS".into(), name: "first".into(), coefficient: 0.0 },
            Ancestor { id: "SA".into(), name: "Sire A".into(), coefficient: 0.0 },
            Ancestor { id: "GS".into(), name: "second".into(), coefficient: 0.0 },
        ];
        let unique = dedupe_by_identity(entries);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, "GS");
        assert_eq!(unique[0].name, "first");
        assert_eq!(unique[1].id, "SA");
    }

    #[test]
    fn test_common_ancestors_intersection() {
        let store = inbred_sire_store();
        let s1 = subtree(&store, "S1");
        let d1 = subtree(&store, "D1");

        let common = find_common_ancestors(Some(&s1), Some(&d1));
        // Only GS is shared, and despite appearing twice on the sire side it
        // is reported once.
        assert_eq!(common.len(), 1);
        assert_eq!(common[0].id, "GS");
    }

    #[test]
    fn test_common_ancestors_absent_subtree() {
        let store = inbred_sire_store();
        let s1 = subtree(&store, "S1");
        assert!(find_common_ancestors(Some(&s1), None).is_empty());
        assert!(find_common_ancestors(None, Some(&s1)).is_empty());
        assert!(find_common_ancestors(None, None).is_empty());
    }

    #[test]
    fn test_disjoint_lineages_share_nothing() {
        let store = MemoryStore::from_records(vec![
            AnimalRecord::new("A", "A", None, None),
            AnimalRecord::new("B", "B", None, None),
        ]);
        let a = subtree(&store, "A");
        let b = subtree(&store, "B");
        assert!(find_common_ancestors(Some(&a), Some(&b)).is_empty());
    }

    #[test]
    fn test_paths_to_ancestor_multiplicity() {
        let store = inbred_sire_store();
        let s1 = subtree(&store, "S1");

        let mut paths = find_paths_to_ancestor(&s1, "GS");
        paths.sort();
        assert_eq!(
            paths,
            vec![
                vec!["S1".to_string(), "SA".to_string(), "GS".to_string()],
                vec!["S1".to_string(), "SB".to_string(), "GS".to_string()],
            ]
        );
        // Inclusive of both endpoints: 2 links -> length 3.
        assert_eq!(paths[0].len(), 3);
    }

    #[test]
    fn test_path_to_root_itself() {
        let store = inbred_sire_store();
        let s1 = subtree(&store, "S1");
        let paths = find_paths_to_ancestor(&s1, "S1");
        assert_eq!(paths, vec![vec!["S1".to_string()]]);
    }

    #[test]
    fn test_search_stops_at_target() {
        // D2's dam line continues past GS' child; the walk must not descend
        // below a matched target.
        let store = MemoryStore::from_records(vec![
            AnimalRecord::new("ROOT", "Root", Some("MID"), None),
            AnimalRecord::new("MID", "Mid", Some("DEEP"), None),
            AnimalRecord::new("DEEP", "Deep", None, None),
        ]);
        let tree = subtree(&store, "ROOT");
        let paths = find_paths_to_ancestor(&tree, "MID");
        assert_eq!(paths, vec![vec!["ROOT".to_string(), "MID".to_string()]]);
    }

    #[test]
    fn test_no_path_to_stranger() {
        let store = inbred_sire_store();
        let s1 = subtree(&store, "S1");
        assert!(find_paths_to_ancestor(&s1, "nobody").is_empty());
    }
}
