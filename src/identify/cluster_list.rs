use log::debug;
use serde::{Deserialize, Serialize};

use super::equivalence::{generate_orbit, is_contained};
use super::subcluster::{decorated_sub_clusters, sub_clusters};
use crate::base::{Cluster, Operations};

/// Canonical list of symmetry-distinct cluster types.
///
/// Entries are sorted by descending site count. Orbit members are pairwise
/// non-translation-equivalent; multiplicities are raw orbit sizes divided
/// by the total number of point-cluster orbit members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterListResult {
    /// Canonical representative of each distinct cluster type
    pub clusters: Vec<Cluster>,
    pub multiplicities: Vec<f64>,
    /// `orbits[t]` is the full orbit of type `t` under the space group
    pub orbits: Vec<Vec<Cluster>>,
    /// `site_counts[t]` are the per-sublattice site counts of type `t`
    pub site_counts: Vec<Vec<usize>>,
    pub num_types: usize,
    pub num_point_members: usize,
}

impl ClusterListResult {
    pub fn orbit_size(&self, cluster_type: usize) -> usize {
        self.orbits[cluster_type].len()
    }

    pub fn num_sites(&self, cluster_type: usize) -> usize {
        self.clusters[cluster_type].num_sites()
    }

    /// Index of the empty cluster type, if present
    pub fn empty_type(&self) -> Option<usize> {
        (0..self.num_types).find(|&t| self.clusters[t].is_empty())
    }
}

/// Enumerate the distinct (decorated) cluster types generated by a set of
/// maximal clusters under a space group.
pub fn cluster_list(
    maximal_clusters: &[Cluster],
    operations: &Operations,
    basis_symbols: Option<&[String]>,
) -> ClusterListResult {
    let mut candidates: Vec<Cluster> = maximal_clusters
        .iter()
        .flat_map(|cluster| match basis_symbols {
            None => sub_clusters(cluster),
            Some(symbols) => decorated_sub_clusters(cluster, symbols),
        })
        .collect();
    candidates.sort_by(|a, b| b.num_sites().cmp(&a.num_sites()));

    // Walk candidates from the small end so that points and the empty
    // cluster are typed before the clusters that contain them.
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut orbits: Vec<Vec<Cluster>> = Vec::new();
    for candidate in candidates.iter().rev() {
        if orbits.iter().any(|orbit| is_contained(orbit, candidate)) {
            continue;
        }
        let orbit = generate_orbit(candidate, operations);
        debug!(
            "new cluster type: {} sites, orbit size {}",
            candidate.num_sites(),
            orbit.len()
        );
        clusters.push(candidate.clone());
        orbits.push(orbit);
    }

    let num_point_members: usize = clusters
        .iter()
        .zip(orbits.iter())
        .filter(|(cluster, _)| cluster.num_sites() == 1)
        .map(|(_, orbit)| orbit.len())
        .sum();
    let normalization = if num_point_members > 0 {
        num_point_members as f64
    } else {
        1.0
    };

    // Final order: descending site count, discovery order within a size
    let mut order: Vec<usize> = (0..clusters.len()).collect();
    order.sort_by(|&i, &j| clusters[j].num_sites().cmp(&clusters[i].num_sites()));

    let num_types = order.len();
    debug!(
        "cluster list: {} types, {} point orbit members",
        num_types, num_point_members
    );
    ClusterListResult {
        clusters: order.iter().map(|&i| clusters[i].clone()).collect(),
        multiplicities: order
            .iter()
            .map(|&i| orbits[i].len() as f64 / normalization)
            .collect(),
        site_counts: order.iter().map(|&i| clusters[i].site_counts()).collect(),
        orbits: order.iter().map(|&i| orbits[i].clone()).collect(),
        num_types,
        num_point_members,
    }
}
