use crate::base::{is_integer_translation, position_eq, Cluster, Operations};

/// Test whether two canonical clusters differ by a lattice translation.
///
/// Both clusters must already be in canonical (per-sublattice sorted) form;
/// translating every site by the same vector preserves that order, so
/// corresponding sites line up slot by slot. Empty clusters are equivalent
/// to empty clusters.
pub fn translation_equivalent(lhs: &Cluster, rhs: &Cluster) -> bool {
    if lhs.sublattices.len() != rhs.sublattices.len() {
        return false;
    }
    if lhs.site_counts() != rhs.site_counts() {
        return false;
    }
    let lhs_sites: Vec<_> = lhs.all_sites().collect();
    let rhs_sites: Vec<_> = rhs.all_sites().collect();
    if lhs_sites.is_empty() {
        return true;
    }
    if lhs_sites
        .iter()
        .zip(rhs_sites.iter())
        .any(|(a, b)| a.symbol != b.symbol)
    {
        return false;
    }

    // The difference multiset must be a singleton integer vector
    let delta = rhs_sites[0].position - lhs_sites[0].position;
    if !is_integer_translation(&delta) {
        return false;
    }
    lhs_sites
        .iter()
        .zip(rhs_sites.iter())
        .all(|(a, b)| position_eq(&(b.position - a.position), &delta))
}

/// True if some orbit member is translation-equivalent to `cluster`
pub fn is_contained(orbit: &[Cluster], cluster: &Cluster) -> bool {
    orbit.iter().any(|member| translation_equivalent(member, cluster))
}

/// Apply every operation to the seed and keep each image not yet contained
/// in the accumulating orbit. Result order is the order of first discovery.
pub fn generate_orbit(seed: &Cluster, operations: &Operations) -> Vec<Cluster> {
    let mut orbit: Vec<Cluster> = Vec::new();
    for operation in operations.iter() {
        let image = operation.apply_cluster(seed);
        if !is_contained(&orbit, &image) {
            orbit.push(image);
        }
    }
    orbit
}
