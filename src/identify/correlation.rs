use log::debug;
use serde::{Deserialize, Serialize};

use super::cluster_list::ClusterListResult;
use super::equivalence::is_contained;
use super::identification::ClusterIdentification;
use crate::base::{CemcError, Cluster, Sublattice, DEFAULT_SYMBOL};

/// Basis symbols `s1 … s_{k−1}` for a k-component decoration
pub fn basis_symbols(num_components: usize) -> Vec<String> {
    (1..num_components).map(|alpha| format!("s{}", alpha)).collect()
}

/// Stage-2 identification: the distinct correlation functions (decorated
/// cluster orbits) and their grouping under the stage-1 ordered groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfIdentification {
    /// Decorated cluster types of the working (ordered) phase; this is the
    /// list the Monte Carlo embeddings and ECI refer to
    pub cfs: ClusterListResult,
    /// Decorated cluster types of the disordered phase
    pub disordered_cfs: ClusterListResult,
    pub num_cfs: usize,
    pub num_disordered_cfs: usize,
    /// Single-site CF types
    pub num_point_cfs: usize,
    /// CF types with at least two sites
    pub num_multisite_cfs: usize,
    /// `grouped[t][j]` lists the CF types whose stripped geometry belongs
    /// to ordered group `j` under disordered type `t`
    pub grouped: Vec<Vec<Vec<usize>>>,
    /// `group_sizes[t][j] = grouped[t][j].len()`
    pub group_sizes: Vec<Vec<usize>>,
}

impl CfIdentification {
    pub fn new(
        identification: &ClusterIdentification,
        cfs: ClusterListResult,
        disordered_cfs: ClusterListResult,
    ) -> Result<Self, CemcError> {
        let geometry = identification
            .ordered
            .as_ref()
            .unwrap_or(&identification.disordered);

        let mut grouped: Vec<Vec<Vec<usize>>> = identification
            .num_groups
            .iter()
            .map(|&n| vec![Vec::new(); n])
            .collect();

        for c in 0..cfs.num_types {
            let stripped = strip_decoration(&cfs.clusters[c]);
            let home = (0..geometry.num_types)
                .find(|&o| {
                    geometry.num_sites(o) == stripped.num_sites()
                        && is_contained(&geometry.orbits[o], &stripped)
                })
                .ok_or(CemcError::UnclassifiedOrderedCluster(c))?;
            let (parent, slot) = identification
                .ordered_groups
                .iter()
                .enumerate()
                .find_map(|(t, group)| {
                    group.iter().position(|&o| o == home).map(|j| (t, j))
                })
                .ok_or(CemcError::UnclassifiedOrderedCluster(c))?;
            grouped[parent][slot].push(c);
        }

        let group_sizes: Vec<Vec<usize>> = grouped
            .iter()
            .map(|groups| groups.iter().map(|g| g.len()).collect())
            .collect();
        let num_point_cfs = (0..cfs.num_types).filter(|&c| cfs.num_sites(c) == 1).count();
        let num_multisite_cfs = (0..cfs.num_types).filter(|&c| cfs.num_sites(c) >= 2).count();
        debug!(
            "stage 2: {} CFs ({} point, {} multi-site), {} disordered CFs",
            cfs.num_types, num_point_cfs, num_multisite_cfs, disordered_cfs.num_types
        );

        Ok(Self {
            num_cfs: cfs.num_types,
            num_disordered_cfs: disordered_cfs.num_types,
            num_point_cfs,
            num_multisite_cfs,
            cfs,
            disordered_cfs,
            grouped,
            group_sizes,
        })
    }
}

/// Replace every decoration with the default geometric symbol
fn strip_decoration(cluster: &Cluster) -> Cluster {
    Cluster::new(
        cluster
            .sublattices
            .iter()
            .map(|sub| {
                Sublattice::new(
                    sub.sites
                        .iter()
                        .map(|site| {
                            let mut site = site.clone();
                            site.symbol = DEFAULT_SYMBOL.to_string();
                            site
                        })
                        .collect(),
                )
            })
            .collect(),
    )
    .canonicalized()
}

#[cfg(test)]
mod tests {
    use nalgebra::{matrix, vector};

    use super::*;
    use crate::base::{Operation, Operations};
    use crate::identify::cluster_list;

    fn inversion_with_centering() -> Operations {
        let identity = matrix![1.0, 0.0, 0.0; 0.0, 1.0, 0.0; 0.0, 0.0, 1.0];
        vec![
            Operation::identity(),
            Operation::new(-identity, vector![0.0, 0.0, 0.0]),
            Operation::new(identity, vector![0.5, 0.5, 0.5]),
            Operation::new(-identity, vector![0.5, 0.5, 0.5]),
        ]
    }

    #[test]
    fn test_ternary_pair_cf_count() {
        let maximal = vec![Cluster::from_positions(vec![
            vector![0.0, 0.0, 0.0],
            vector![0.5, 0.5, 0.5],
        ])];
        let operations = inversion_with_centering();
        let geometric = cluster_list(&maximal, &operations, None);
        let identification = ClusterIdentification::new(geometric, None).unwrap();

        let symbols = basis_symbols(3);
        assert_eq!(symbols, vec!["s1".to_string(), "s2".to_string()]);
        let decorated = cluster_list(&maximal, &operations, Some(&symbols));
        let cf =
            CfIdentification::new(&identification, decorated.clone(), decorated).unwrap();

        // points: s1 and s2; pairs: (s1,s1), (s2,s2) and the symmetric
        // mixed decoration; plus the empty CF
        assert_eq!(cf.num_point_cfs, 2);
        assert_eq!(cf.num_multisite_cfs, 3);
        assert_eq!(cf.num_cfs, 6);

        // every stripped CF lands in a stage-1 group
        let assigned: usize = cf
            .grouped
            .iter()
            .flat_map(|groups| groups.iter().map(|g| g.len()))
            .sum();
        assert_eq!(assigned, cf.num_cfs);
    }

    #[test]
    fn test_binary_cfs_match_geometry() {
        let maximal = vec![Cluster::from_positions(vec![
            vector![0.0, 0.0, 0.0],
            vector![0.5, 0.5, 0.5],
        ])];
        let operations = inversion_with_centering();
        let geometric = cluster_list(&maximal, &operations, None);
        let num_geometric = geometric.num_types;
        let identification = ClusterIdentification::new(geometric, None).unwrap();

        let symbols = basis_symbols(2);
        let decorated = cluster_list(&maximal, &operations, Some(&symbols));
        let cf =
            CfIdentification::new(&identification, decorated.clone(), decorated).unwrap();
        assert_eq!(cf.num_cfs, num_geometric);
        assert_eq!(cf.group_sizes.iter().flatten().sum::<usize>() , cf.num_cfs);
    }
}
