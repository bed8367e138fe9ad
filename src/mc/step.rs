use rand::rngs::StdRng;
use rand::Rng;

use super::config::LatticeConfig;
use super::energy::EnergyModel;

/// One Metropolis move kind. `attempt` returns the accepted cluster ΔE
/// (0.0 on rejection), which the engine adds to its tracked energy.
pub trait McStep {
    fn attempt(
        &mut self,
        config: &mut LatticeConfig,
        energy: &EnergyModel,
        beta: f64,
        rng: &mut StdRng,
    ) -> f64;

    fn num_attempted(&self) -> u64;

    fn num_accepted(&self) -> u64;

    fn accept_rate(&self) -> f64 {
        if self.num_attempted() == 0 {
            0.0
        } else {
            self.num_accepted() as f64 / self.num_attempted() as f64
        }
    }

    fn reset_counters(&mut self);

    /// Must be called after any external mutation of the configuration
    fn invalidate_cache(&mut self) {}
}

fn metropolis(delta: f64, beta: f64, rng: &mut StdRng) -> bool {
    delta <= 0.0 || rng.gen_range(0.0..1.0) < (-beta * delta).exp()
}

/// Canonical two-site swap between distinct species.
///
/// Keeps a species→sites cache so both partners are drawn in O(1); the
/// cache is rebuilt lazily after `invalidate_cache` and patched in place on
/// every accepted move.
#[derive(Debug, Default)]
pub struct ExchangeStep {
    species_sites: Option<Vec<Vec<usize>>>,
    site_slot: Vec<usize>,
    attempted: u64,
    accepted: u64,
}

impl ExchangeStep {
    pub fn new() -> Self {
        Self::default()
    }

    fn rebuild_cache(&mut self, config: &LatticeConfig) {
        let mut species_sites = vec![Vec::new(); config.num_components()];
        self.site_slot = vec![0; config.num_sites()];
        for site in 0..config.num_sites() {
            let species = config.occupation(site);
            self.site_slot[site] = species_sites[species].len();
            species_sites[species].push(site);
        }
        self.species_sites = Some(species_sites);
    }
}

impl McStep for ExchangeStep {
    fn attempt(
        &mut self,
        config: &mut LatticeConfig,
        energy: &EnergyModel,
        beta: f64,
        rng: &mut StdRng,
    ) -> f64 {
        self.attempted += 1;
        if self.species_sites.is_none() {
            self.rebuild_cache(config);
        }

        let cache = self.species_sites.as_ref().unwrap();
        let occupied: Vec<usize> = (0..config.num_components())
            .filter(|&c| !cache[c].is_empty())
            .collect();
        if occupied.len() < 2 {
            return 0.0;
        }
        let first = rng.gen_range(0..occupied.len());
        let mut second = rng.gen_range(0..occupied.len() - 1);
        if second >= first {
            second += 1;
        }
        let (species_i, species_j) = (occupied[first], occupied[second]);
        let site_i = cache[species_i][rng.gen_range(0..cache[species_i].len())];
        let site_j = cache[species_j][rng.gen_range(0..cache[species_j].len())];

        let delta = energy.delta_exchange(config, site_i, site_j);
        if !metropolis(delta, beta, rng) {
            return 0.0;
        }

        config.set_occupation(site_i, species_j);
        config.set_occupation(site_j, species_i);
        let cache = self.species_sites.as_mut().unwrap();
        let slot_i = self.site_slot[site_i];
        let slot_j = self.site_slot[site_j];
        cache[species_i][slot_i] = site_j;
        cache[species_j][slot_j] = site_i;
        self.site_slot.swap(site_i, site_j);
        self.accepted += 1;
        delta
    }

    fn num_attempted(&self) -> u64 {
        self.attempted
    }

    fn num_accepted(&self) -> u64 {
        self.accepted
    }

    fn reset_counters(&mut self) {
        self.attempted = 0;
        self.accepted = 0;
    }

    fn invalidate_cache(&mut self) {
        self.species_sites = None;
    }
}

/// Grand-canonical single-site flip with an optional chemical-potential
/// bias. `delta_mu[c] = μ_c − μ_0`; the zero entry is pinned.
#[derive(Debug)]
pub struct FlipStep {
    delta_mu: Vec<f64>,
    attempted: u64,
    accepted: u64,
}

impl FlipStep {
    pub fn new(mut delta_mu: Vec<f64>) -> Self {
        if !delta_mu.is_empty() {
            delta_mu[0] = 0.0;
        }
        Self {
            delta_mu,
            attempted: 0,
            accepted: 0,
        }
    }
}

impl McStep for FlipStep {
    fn attempt(
        &mut self,
        config: &mut LatticeConfig,
        energy: &EnergyModel,
        beta: f64,
        rng: &mut StdRng,
    ) -> f64 {
        self.attempted += 1;
        let num_sites = config.num_sites();
        let site = rng.gen_range(0..num_sites);
        let old = config.occupation(site);
        let mut new = rng.gen_range(0..config.num_components() - 1);
        if new >= old {
            new += 1;
        }

        let delta = energy.delta_single_site(config, site, new);
        let bias = (self.delta_mu[new] - self.delta_mu[old]) / num_sites as f64;
        if !metropolis(delta + bias, beta, rng) {
            return 0.0;
        }
        config.set_occupation(site, new);
        self.accepted += 1;
        delta
    }

    fn num_attempted(&self) -> u64 {
        self.attempted
    }

    fn num_accepted(&self) -> u64 {
        self.accepted
    }

    fn reset_counters(&mut self) {
        self.attempted = 0;
        self.accepted = 0;
    }
}
