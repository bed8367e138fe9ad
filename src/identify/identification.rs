use log::debug;
use serde::{Deserialize, Serialize};

use super::cluster_list::ClusterListResult;
use super::equivalence::is_contained;
use super::subcluster::sub_clusters;
use crate::base::{CemcError, Operation};

/// Stage-1 identification: containment table, Kikuchi–Baker entropy
/// coefficients and the grouping of ordered-phase cluster types under the
/// disordered (high-symmetry) parents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterIdentification {
    pub disordered: ClusterListResult,
    pub ordered: Option<ClusterListResult>,
    /// Number of disordered (HSP) cluster types
    pub num_disordered_types: usize,
    /// `nij[i][j]` counts sub-clusters of type `j` in a representative of
    /// type `i`
    pub nij: Vec<Vec<usize>>,
    pub kb_coefficients: Vec<f64>,
    /// `ordered_groups[t]` lists the ordered cluster types classified under
    /// disordered type `t`
    pub ordered_groups: Vec<Vec<usize>>,
    /// Group count per disordered type
    pub num_groups: Vec<usize>,
    /// Normalized multiplicities of the grouped ordered types
    pub group_multiplicities: Vec<Vec<f64>>,
}

impl ClusterIdentification {
    /// `ordered` carries the ordered-phase cluster list together with the
    /// affine map from the ordered frame into the disordered frame.
    pub fn new(
        disordered: ClusterListResult,
        ordered: Option<(ClusterListResult, Operation)>,
    ) -> Result<Self, CemcError> {
        let num_disordered_types = disordered.num_types;
        let nij = containment_table(&disordered);
        let kb_coefficients = kikuchi_baker(&disordered, &nij);
        debug!(
            "stage 1: {} disordered types, kb = {:?}",
            num_disordered_types, kb_coefficients
        );

        let mut ordered_groups: Vec<Vec<usize>> = vec![Vec::new(); num_disordered_types];
        let mut group_multiplicities: Vec<Vec<f64>> = vec![Vec::new(); num_disordered_types];
        let ordered = match ordered {
            None => {
                for t in 0..num_disordered_types {
                    ordered_groups[t].push(t);
                    group_multiplicities[t].push(disordered.multiplicities[t]);
                }
                None
            }
            Some((ordered, parent_map)) => {
                for o in 0..ordered.num_types {
                    let mapped = parent_map.apply_cluster(&ordered.clusters[o]);
                    let parent = (0..num_disordered_types).find(|&t| {
                        disordered.num_sites(t) == mapped.num_sites()
                            && is_contained(&disordered.orbits[t], &mapped)
                    });
                    let parent = parent.ok_or(CemcError::UnclassifiedOrderedCluster(o))?;
                    ordered_groups[parent].push(o);
                    group_multiplicities[parent].push(ordered.multiplicities[o]);
                }
                Some(ordered)
            }
        };
        let num_groups = ordered_groups.iter().map(|g| g.len()).collect();

        Ok(Self {
            disordered,
            ordered,
            num_disordered_types,
            nij,
            kb_coefficients,
            ordered_groups,
            num_groups,
            group_multiplicities,
        })
    }
}

fn containment_table(list: &ClusterListResult) -> Vec<Vec<usize>> {
    let num_types = list.num_types;
    let mut nij = vec![vec![0usize; num_types]; num_types];
    for i in 0..num_types {
        for sub in sub_clusters(&list.clusters[i]) {
            let j = (0..num_types)
                .find(|&j| {
                    list.num_sites(j) == sub.num_sites() && is_contained(&list.orbits[j], &sub)
                })
                .unwrap_or_else(|| {
                    panic!("sub-cluster of type {} matches no cluster type", i)
                });
            nij[i][j] += 1;
        }
    }
    nij
}

/// Multiplicity-weighted inclusion-exclusion on the sub-cluster poset.
///
/// Types are processed in the list's descending-size order; maximal types
/// receive coefficient one and every smaller type balances the overcount of
/// the types strictly containing it:
/// `kb[t] = 1 − Σ_{size(u) > size(t)} kb[u] · nij[u][t] · m[u] / m[t]`.
fn kikuchi_baker(list: &ClusterListResult, nij: &[Vec<usize>]) -> Vec<f64> {
    let num_types = list.num_types;
    let m = &list.multiplicities;
    let mut kb = vec![0.0; num_types];
    for t in 0..num_types {
        let mut coefficient = 1.0;
        for u in 0..t {
            if list.num_sites(u) > list.num_sites(t) {
                coefficient -= kb[u] * nij[u][t] as f64 * m[u] / m[t];
            }
        }
        kb[t] = coefficient;
    }
    kb
}
