//! Wright's coefficient of inbreeding over a pair of parental lineages.
//!
//! For each common ancestor A with own coefficient F_A, every distinct
//! (sire-path, dam-path) pair contributes
//!
//!   0.5^(n1 + n2 - 1) * (1 + F_A)
//!
//! where n1 and n2 are the endpoint-inclusive path lengths. Both path lengths
//! count their shared ancestor endpoint as well as the parent-root starting
//! endpoint, so the `-1` recovers Wright's exponent
//! `links-from-sire-parent + links-from-dam-parent + 1` exactly.
//!
//! Reference: Wright, S. (1922). Coefficients of Inbreeding and Relationship.
//!            The American Naturalist 56, 330-338.

use crate::ancestry::{find_common_ancestors, find_paths_to_ancestor};
use crate::pedigree::PedigreeNode;

/// One (sire-path, dam-path) pair and its individual contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPairContribution {
    /// Identifiers from the sire root down to the common ancestor,
    /// inclusive of both endpoints.
    pub sire_path: Vec<String>,
    /// Identifiers from the dam root down to the common ancestor.
    pub dam_path: Vec<String>,
    /// Parent-to-child links on the sire path (path length - 1).
    pub sire_links: usize,
    /// Parent-to-child links on the dam path.
    pub dam_links: usize,
    /// This pair's contribution as a percentage.
    pub contribution_pct: f64,
}

/// Per-ancestor entry of the diagnostic breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct AncestorContribution {
    pub id: String,
    pub name: String,
    /// The ancestor's own coefficient as a percentage.
    pub coefficient_pct: f64,
    /// Summed contribution of every path pair through this ancestor, as a
    /// percentage.
    pub contribution_pct: f64,
    pub path_pairs: Vec<PathPairContribution>,
}

/// Total coefficient of inbreeding for the given parental subtrees, as a
/// fraction in [0, 1]. Absent subtrees or disjoint lineages yield exactly 0.
pub fn compute_coi(
    sire_subtree: Option<&PedigreeNode>,
    dam_subtree: Option<&PedigreeNode>,
) -> f64 {
    coi_with_breakdown(sire_subtree, dam_subtree).0
}

/// Diagnostic variant: the identical total (same accumulation loop, with
/// bookkeeping attached) plus a per-ancestor, per-path-pair breakdown sorted
/// by contribution descending.
pub fn coi_with_breakdown(
    sire_subtree: Option<&PedigreeNode>,
    dam_subtree: Option<&PedigreeNode>,
) -> (f64, Vec<AncestorContribution>) {
    let (sire, dam) = match (sire_subtree, dam_subtree) {
        (Some(sire), Some(dam)) => (sire, dam),
        _ => return (0.0, Vec::new()),
    };

    let mut total = 0.0;
    let mut breakdown = Vec::new();

    for ancestor in find_common_ancestors(Some(sire), Some(dam)) {
        let sire_paths = find_paths_to_ancestor(sire, &ancestor.id);
        let dam_paths = find_paths_to_ancestor(dam, &ancestor.id);

        let mut ancestor_total = 0.0;
        let mut path_pairs = Vec::with_capacity(sire_paths.len() * dam_paths.len());

        for sire_path in &sire_paths {
            for dam_path in &dam_paths {
                let n1 = sire_path.len();
                let n2 = dam_path.len();
                let contribution =
                    0.5_f64.powi((n1 + n2 - 1) as i32) * (1.0 + ancestor.coefficient);
                ancestor_total += contribution;

                path_pairs.push(PathPairContribution {
                    sire_path: sire_path.clone(),
                    dam_path: dam_path.clone(),
                    sire_links: n1 - 1,
                    dam_links: n2 - 1,
                    contribution_pct: contribution * 100.0,
                });
            }
        }

        total += ancestor_total;
        breakdown.push(AncestorContribution {
            id: ancestor.id,
            name: ancestor.name,
            coefficient_pct: ancestor.coefficient * 100.0,
            contribution_pct: ancestor_total * 100.0,
            path_pairs,
        });
    }

    breakdown.sort_by(|a, b| b.contribution_pct.total_cmp(&a.contribution_pct));

    (total, breakdown)
}
