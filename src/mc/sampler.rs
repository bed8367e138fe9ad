use super::config::LatticeConfig;
use super::energy::EnergyModel;

/// Accumulates energy moments and per-type correlation functions over the
/// averaging phase.
///
/// Each sample adds `Σ Φ(e) / count(t)` per cluster type: the mean basis
/// product per embedding, which is exactly 1.0 for a uniform all-zero
/// configuration regardless of lattice size.
#[derive(Debug, Clone)]
pub struct McSampler {
    sum_energy: f64,
    sum_energy_sq: f64,
    sum_cf: Vec<f64>,
    num_samples: usize,
}

impl McSampler {
    pub fn new(num_types: usize) -> Self {
        Self {
            sum_energy: 0.0,
            sum_energy_sq: 0.0,
            sum_cf: vec![0.0; num_types],
            num_samples: 0,
        }
    }

    pub fn reset(&mut self) {
        self.sum_energy = 0.0;
        self.sum_energy_sq = 0.0;
        self.sum_cf.iter_mut().for_each(|v| *v = 0.0);
        self.num_samples = 0;
    }

    pub fn sample(&mut self, config: &LatticeConfig, energy: &EnergyModel, current_energy: f64) {
        self.sum_energy += current_energy;
        self.sum_energy_sq += current_energy * current_energy;

        let data = energy.embeddings();
        let mut cf_num = vec![0.0; data.num_types];
        for embedding in data.embeddings.iter() {
            cf_num[embedding.cluster_type] += energy.cluster_product(embedding, config);
        }
        for (sum, (&num, &count)) in self
            .sum_cf
            .iter_mut()
            .zip(cf_num.iter().zip(data.type_counts.iter()))
        {
            if count > 0 {
                *sum += num / count as f64;
            }
        }
        self.num_samples += 1;
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn mean_energy(&self) -> f64 {
        if self.num_samples == 0 {
            0.0
        } else {
            self.sum_energy / self.num_samples as f64
        }
    }

    pub fn mean_cfs(&self) -> Vec<f64> {
        if self.num_samples == 0 {
            return vec![0.0; self.sum_cf.len()];
        }
        self.sum_cf
            .iter()
            .map(|sum| sum / self.num_samples as f64)
            .collect()
    }

    /// (⟨H²⟩ − ⟨H⟩²) / (N · R · T²)
    pub fn heat_capacity_per_site(
        &self,
        num_sites: usize,
        gas_constant: f64,
        temperature: f64,
    ) -> f64 {
        if self.num_samples == 0 {
            return 0.0;
        }
        let mean = self.mean_energy();
        // cancellation can push the variance of a frozen chain below zero
        let variance = (self.sum_energy_sq / self.num_samples as f64 - mean * mean).max(0.0);
        variance / (num_sites as f64 * gas_constant * temperature * temperature)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::vector;

    use super::*;
    use crate::base::{Cluster, Operation, Position};
    use crate::embed::EmbeddingData;
    use crate::identify::cluster_list;
    use crate::mc::basis::SiteOperatorBasis;

    fn chain_energy(l: usize) -> EnergyModel {
        let positions: Vec<Position> =
            (0..l).map(|a| vector![a as f64, 0.0, 0.0]).collect();
        let maximal = vec![Cluster::from_positions(vec![
            vector![0.0, 0.0, 0.0],
            vector![1.0, 0.0, 0.0],
        ])];
        let clusters = cluster_list(&maximal, &vec![Operation::identity()], None);
        let embeddings = EmbeddingData::generate(&positions, &clusters, l).unwrap();
        EnergyModel::new(embeddings, SiteOperatorBasis::new(2).unwrap(), vec![]).unwrap()
    }

    #[test]
    fn test_uniform_state_cfs_are_one() {
        let energy = chain_energy(10);
        let config = LatticeConfig::new(10, 2);
        let mut sampler = McSampler::new(energy.embeddings().num_types);
        sampler.sample(&config, &energy, 0.0);
        for &cf in sampler.mean_cfs().iter() {
            assert_relative_eq!(cf, 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_all_ones_alternates_by_size() {
        let energy = chain_energy(10);
        let mut config = LatticeConfig::new(10, 2);
        config.fill(1);
        let mut sampler = McSampler::new(energy.embeddings().num_types);
        sampler.sample(&config, &energy, 0.0);
        let cfs = sampler.mean_cfs();
        // pair, point, empty in descending size order
        assert_relative_eq!(cfs[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(cfs[1], -1.0, epsilon = 1e-10);
        assert_relative_eq!(cfs[2], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_heat_capacity_from_moments() {
        let energy = chain_energy(4);
        let config = LatticeConfig::new(4, 2);
        let mut sampler = McSampler::new(energy.embeddings().num_types);
        sampler.sample(&config, &energy, 1.0);
        sampler.sample(&config, &energy, 3.0);
        // mean 2, variance 1
        assert_relative_eq!(sampler.mean_energy(), 2.0);
        assert_relative_eq!(sampler.heat_capacity_per_site(4, 2.0, 5.0), 1.0 / 200.0);
    }
}
