use super::basis::SiteOperatorBasis;
use super::config::LatticeConfig;
use crate::base::CemcError;
use crate::embed::{Embedding, EmbeddingData};

/// Cluster-expansion energy over a fixed embedding set.
///
/// Owns the embeddings, the site-operator basis and one ECI per cluster
/// type (zero-padded to the type count).
#[derive(Debug)]
pub struct EnergyModel {
    embeddings: EmbeddingData,
    basis: SiteOperatorBasis,
    eci: Vec<f64>,
}

impl EnergyModel {
    pub fn new(
        embeddings: EmbeddingData,
        basis: SiteOperatorBasis,
        mut eci: Vec<f64>,
    ) -> Result<Self, CemcError> {
        if eci.len() > embeddings.num_types {
            return Err(CemcError::InvalidEciLength {
                given: eci.len(),
                expected: embeddings.num_types,
            });
        }
        eci.resize(embeddings.num_types, 0.0);

        // every cached α must address a basis row
        for embedding in embeddings.embeddings.iter() {
            for &alpha in embedding.basis_indices.iter() {
                if alpha < 1 || alpha >= basis.num_components() {
                    return Err(CemcError::BasisIndexOutOfRange {
                        alpha,
                        num_components: basis.num_components(),
                    });
                }
            }
        }

        Ok(Self {
            embeddings,
            basis,
            eci,
        })
    }

    pub fn embeddings(&self) -> &EmbeddingData {
        &self.embeddings
    }

    pub fn basis(&self) -> &SiteOperatorBasis {
        &self.basis
    }

    pub fn eci(&self) -> &[f64] {
        &self.eci
    }

    /// Φ(e) = Π_k φ_{α[k]}(occ[site[k]]); the empty product is one
    pub fn cluster_product(&self, embedding: &Embedding, config: &LatticeConfig) -> f64 {
        embedding
            .site_indices
            .iter()
            .zip(embedding.basis_indices.iter())
            .map(|(&site, &alpha)| self.basis.evaluate(alpha, config.occupation(site)))
            .product()
    }

    /// Full energy pass. Each physical cluster appears `size` times in the
    /// embedding list, so products of non-empty clusters are divided by
    /// their size; the empty cluster contributes its ECI once.
    pub fn total_energy(&self, config: &LatticeConfig) -> f64 {
        self.embeddings
            .embeddings
            .iter()
            .map(|embedding| {
                let weight = self.eci[embedding.cluster_type];
                if embedding.site_indices.is_empty() {
                    weight
                } else {
                    weight * self.cluster_product(embedding, config)
                        / embedding.num_sites() as f64
                }
            })
            .sum()
    }

    /// ΔE for changing `site` to `new_occupation`, summed over the
    /// embeddings containing the site. No size division: each listed
    /// embedding is one full cluster incidence at the site.
    pub fn delta_single_site(
        &self,
        config: &LatticeConfig,
        site: usize,
        new_occupation: usize,
    ) -> f64 {
        let mut delta = 0.0;
        for &index in self.embeddings.site_to_embeddings[site].iter() {
            let embedding = &self.embeddings.embeddings[index];
            let mut product_old = 1.0;
            let mut product_new = 1.0;
            for (&target, &alpha) in embedding
                .site_indices
                .iter()
                .zip(embedding.basis_indices.iter())
            {
                let phi_old = self.basis.evaluate(alpha, config.occupation(target));
                product_old *= phi_old;
                product_new *= if target == site {
                    self.basis.evaluate(alpha, new_occupation)
                } else {
                    phi_old
                };
            }
            delta += self.eci[embedding.cluster_type] * (product_new - product_old);
        }
        delta
    }

    /// ΔE for swapping the occupations of two sites; the second half is
    /// evaluated with the first site already flipped, which handles
    /// embeddings containing both sites.
    pub fn delta_exchange(
        &self,
        config: &mut LatticeConfig,
        site_i: usize,
        site_j: usize,
    ) -> f64 {
        let occupation_i = config.occupation(site_i);
        let occupation_j = config.occupation(site_j);
        let delta_i = self.delta_single_site(config, site_i, occupation_j);
        config.set_occupation(site_i, occupation_j);
        let delta_j = self.delta_single_site(config, site_j, occupation_i);
        config.set_occupation(site_i, occupation_i);
        delta_i + delta_j
    }
}
