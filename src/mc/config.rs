use rand::Rng;

/// Occupation state of a supercell: one species per site.
///
/// Constructed once per chain and mutated in place by the step actor.
#[derive(Debug, Clone)]
pub struct LatticeConfig {
    occupations: Vec<usize>,
    num_components: usize,
}

impl LatticeConfig {
    pub fn new(num_sites: usize, num_components: usize) -> Self {
        if num_components < 2 {
            panic!("a lattice configuration needs at least two components");
        }
        Self {
            occupations: vec![0; num_sites],
            num_components,
        }
    }

    pub fn num_sites(&self) -> usize {
        self.occupations.len()
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn occupation(&self, site: usize) -> usize {
        self.occupations[site]
    }

    pub fn set_occupation(&mut self, site: usize, occupation: usize) {
        if occupation >= self.num_components {
            panic!(
                "occupation {} out of range for {} components",
                occupation, self.num_components
            );
        }
        self.occupations[site] = occupation;
    }

    /// Set every site to the same species
    pub fn fill(&mut self, occupation: usize) {
        if occupation >= self.num_components {
            panic!(
                "occupation {} out of range for {} components",
                occupation, self.num_components
            );
        }
        self.occupations.fill(occupation);
    }

    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.num_components];
        for &occupation in self.occupations.iter() {
            counts[occupation] += 1;
        }
        counts
    }

    pub fn composition(&self) -> Vec<f64> {
        let num_sites = self.num_sites() as f64;
        self.counts()
            .into_iter()
            .map(|count| count as f64 / num_sites)
            .collect()
    }

    /// Assign `round(x_c · N)` sites to each species c ≥ 1, fill the
    /// remainder with species 0 and shuffle (Fisher–Yates).
    pub fn randomize(&mut self, composition: &[f64], rng: &mut impl Rng) {
        assert_eq!(composition.len(), self.num_components);
        let num_sites = self.occupations.len();
        let mut counts: Vec<usize> = composition
            .iter()
            .skip(1)
            .map(|&x| (x * num_sites as f64).round() as usize)
            .collect();
        let mut total: usize = counts.iter().sum();
        // rounding may overshoot by a site; trim the largest count
        while total > num_sites {
            let largest = (0..counts.len()).max_by_key(|&c| counts[c]).unwrap();
            counts[largest] -= 1;
            total -= 1;
        }

        self.occupations.clear();
        self.occupations.resize(num_sites - total, 0);
        for (c, &count) in counts.iter().enumerate() {
            self.occupations.extend(std::iter::repeat(c + 1).take(count));
        }
        for i in (1..num_sites).rev() {
            let j = rng.gen_range(0..=i);
            self.occupations.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_randomize_counts() {
        let mut config = LatticeConfig::new(128, 2);
        let mut rng = StdRng::seed_from_u64(11);
        config.randomize(&[0.5, 0.5], &mut rng);
        assert_eq!(config.counts(), vec![64, 64]);

        config.randomize(&[0.0, 1.0], &mut rng);
        assert_eq!(config.counts(), vec![0, 128]);
    }

    #[test]
    fn test_randomize_ternary_rounding() {
        let mut config = LatticeConfig::new(10, 3);
        let mut rng = StdRng::seed_from_u64(0);
        config.randomize(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], &mut rng);
        let counts = config.counts();
        assert_eq!(counts.iter().sum::<usize>(), 10);
        assert_eq!(counts[1], 3);
        assert_eq!(counts[2], 3);
    }

    #[test]
    fn test_randomize_is_deterministic() {
        let mut a = LatticeConfig::new(64, 2);
        let mut b = LatticeConfig::new(64, 2);
        a.randomize(&[0.5, 0.5], &mut StdRng::seed_from_u64(7));
        b.randomize(&[0.5, 0.5], &mut StdRng::seed_from_u64(7));
        let occ_a: Vec<usize> = (0..64).map(|i| a.occupation(i)).collect();
        let occ_b: Vec<usize> = (0..64).map(|i| b.occupation(i)).collect();
        assert_eq!(occ_a, occ_b);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_occupation_panics() {
        let mut config = LatticeConfig::new(4, 2);
        config.set_occupation(0, 2);
    }
}
