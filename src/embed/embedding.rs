use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::supercell::PositionIndex;
use crate::base::{CemcError, Position};
use crate::identify::ClusterListResult;

/// A cluster orbit member realized on concrete supercell sites.
///
/// Slot 0 is the anchor, i.e. the site the embedding was generated at;
/// `basis_indices[k]` is the α parsed from the k-th site symbol of the
/// orbit member, aligned the same way. Two embeddings are the same physical
/// cluster iff they share the cluster type and the same site-index set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub cluster_type: usize,
    pub orbit_member: usize,
    pub site_indices: Vec<usize>,
    pub basis_indices: Vec<usize>,
}

impl Embedding {
    pub fn num_sites(&self) -> usize {
        self.site_indices.len()
    }
}

/// One anchor choice of one orbit member: displacements of the remaining
/// sites relative to the anchor, `displacements[0] = 0`.
#[derive(Debug, Clone)]
struct ClusterTemplate {
    cluster_type: usize,
    orbit_member: usize,
    displacements: Vec<Position>,
    basis_indices: Vec<usize>,
}

/// Embeddings of every cluster orbit on a periodic supercell.
///
/// `embeddings` is the concatenation of per-site batches: each site keeps
/// one embedding per distinct (type, site set) anchored at it, so a
/// physical n-site cluster appears n times overall, once per member site.
/// The single empty embedding carries the constant term and belongs to no
/// batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingData {
    pub embeddings: Vec<Embedding>,
    /// `site_to_embeddings[i]` indexes the batch anchored at site i: every
    /// cluster incidence at i exactly once
    pub site_to_embeddings: Vec<Vec<usize>>,
    /// Number of embeddings per cluster type
    pub type_counts: Vec<usize>,
    pub num_sites: usize,
    pub num_types: usize,
}

impl EmbeddingData {
    /// Realize every orbit member of `clusters` at every supercell site.
    ///
    /// Lookups that leave the lattice are skipped silently (sublattices need
    /// not fill the supercell); a malformed species symbol is an input
    /// error.
    pub fn generate(
        positions: &[Position],
        clusters: &ClusterListResult,
        l: usize,
    ) -> Result<Self, CemcError> {
        let index = PositionIndex::new(positions, l);
        let templates = build_templates(clusters)?;
        debug!(
            "embedding generation: {} sites, {} templates",
            positions.len(),
            templates.len()
        );

        let mut embeddings: Vec<Embedding> = Vec::new();
        let mut site_to_embeddings: Vec<Vec<usize>> = vec![Vec::new(); positions.len()];
        let mut empty_emitted = false;
        let mut seen: HashSet<(usize, Vec<usize>)> = HashSet::new();
        for (site, position) in positions.iter().enumerate() {
            seen.clear();
            'templates: for template in templates.iter() {
                if template.displacements.is_empty() {
                    if !empty_emitted {
                        empty_emitted = true;
                        embeddings.push(Embedding {
                            cluster_type: template.cluster_type,
                            orbit_member: template.orbit_member,
                            site_indices: Vec::new(),
                            basis_indices: Vec::new(),
                        });
                    }
                    continue;
                }

                let mut site_indices = Vec::with_capacity(template.displacements.len());
                for displacement in template.displacements.iter() {
                    match index.lookup(&(position + displacement)) {
                        Some(target) => site_indices.push(target),
                        None => continue 'templates,
                    }
                }
                debug_assert_eq!(site_indices[0], site);

                let mut key = site_indices.clone();
                key.sort_unstable();
                if seen.insert((template.cluster_type, key)) {
                    site_to_embeddings[site].push(embeddings.len());
                    embeddings.push(Embedding {
                        cluster_type: template.cluster_type,
                        orbit_member: template.orbit_member,
                        site_indices,
                        basis_indices: template.basis_indices.clone(),
                    });
                }
            }
        }

        let mut type_counts = vec![0usize; clusters.num_types];
        for embedding in embeddings.iter() {
            type_counts[embedding.cluster_type] += 1;
        }
        debug!(
            "embedding generation: {} embeddings, per-type counts {:?}",
            embeddings.len(),
            type_counts
        );

        Ok(Self {
            site_to_embeddings,
            type_counts,
            num_sites: positions.len(),
            num_types: clusters.num_types,
            embeddings,
        })
    }
}

/// Cycle the anchor over every site of every orbit member; orbit members
/// are stored once per direction and anchor cycling recovers the reverse
/// directions.
fn build_templates(clusters: &ClusterListResult) -> Result<Vec<ClusterTemplate>, CemcError> {
    let mut templates = Vec::new();
    for (cluster_type, orbit) in clusters.orbits.iter().enumerate() {
        for (orbit_member, member) in orbit.iter().enumerate() {
            let sites: Vec<_> = member.all_sites().collect();
            if sites.is_empty() {
                templates.push(ClusterTemplate {
                    cluster_type,
                    orbit_member,
                    displacements: Vec::new(),
                    basis_indices: Vec::new(),
                });
                continue;
            }

            let alphas: Vec<usize> = sites
                .iter()
                .map(|site| {
                    site.basis_index()
                        .ok_or_else(|| CemcError::InvalidSpecieSymbol(site.symbol.clone()))
                })
                .collect::<Result<_, _>>()?;

            for anchor in 0..sites.len() {
                let mut displacements = vec![Position::zeros()];
                let mut basis_indices = vec![alphas[anchor]];
                for (k, site) in sites.iter().enumerate() {
                    if k == anchor {
                        continue;
                    }
                    displacements.push(site.position - sites[anchor].position);
                    basis_indices.push(alphas[k]);
                }
                templates.push(ClusterTemplate {
                    cluster_type,
                    orbit_member,
                    displacements,
                    basis_indices,
                });
            }
        }
    }
    Ok(templates)
}
