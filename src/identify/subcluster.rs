use itertools::Itertools;

use crate::base::{Cluster, Site, Sublattice};

/// All 2^n sub-clusters of a cluster, including the empty one, each
/// re-grouped into its original sublattices (sublattices that lose every
/// site are dropped) and canonicalized.
pub fn sub_clusters(cluster: &Cluster) -> Vec<Cluster> {
    let slots = site_slots(cluster);
    let n = slots.len();
    assert!(n < 64, "cluster too large for subset enumeration");

    (0u64..(1u64 << n))
        .map(|mask| assemble(cluster, &slots, mask, None))
        .collect()
}

/// Decorated variant: every non-empty subset is emitted once per exhaustive
/// assignment of basis symbols to its sites.
pub fn decorated_sub_clusters(cluster: &Cluster, basis_symbols: &[String]) -> Vec<Cluster> {
    let slots = site_slots(cluster);
    let n = slots.len();
    assert!(n < 64, "cluster too large for subset enumeration");

    let mut result = Vec::new();
    for mask in 0u64..(1u64 << n) {
        let num_selected = mask.count_ones() as usize;
        if num_selected == 0 {
            result.push(Cluster::empty());
            continue;
        }
        for assignment in (0..num_selected)
            .map(|_| basis_symbols.iter())
            .multi_cartesian_product()
        {
            result.push(assemble(cluster, &slots, mask, Some(&assignment)));
        }
    }
    result
}

fn site_slots(cluster: &Cluster) -> Vec<(usize, Site)> {
    cluster
        .sublattices
        .iter()
        .enumerate()
        .flat_map(|(i, sub)| sub.sites.iter().map(move |site| (i, site.clone())))
        .collect()
}

fn assemble(
    cluster: &Cluster,
    slots: &[(usize, Site)],
    mask: u64,
    symbols: Option<&[&String]>,
) -> Cluster {
    let mut sublattices: Vec<Vec<Site>> = vec![Vec::new(); cluster.sublattices.len()];
    let mut assigned = 0;
    for (slot, (sublattice, site)) in slots.iter().enumerate() {
        if mask & (1 << slot) == 0 {
            continue;
        }
        let mut site = site.clone();
        if let Some(symbols) = symbols {
            site.symbol = symbols[assigned].clone();
            assigned += 1;
        }
        sublattices[*sublattice].push(site);
    }
    Cluster::new(
        sublattices
            .into_iter()
            .filter(|sites| !sites.is_empty())
            .map(Sublattice::new)
            .collect(),
    )
    .canonicalized()
}
