use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::basis::SiteOperatorBasis;
use super::config::LatticeConfig;
use super::energy::EnergyModel;
use super::engine::{McEngine, UpdateListener};
use super::sampler::McSampler;
use super::step::{ExchangeStep, FlipStep, McStep};
use crate::base::{CemcError, Position};
use crate::embed::{bcc_positions, EmbeddingData};
use crate::identify::ClusterListResult;
use crate::ClusterDataset;

const COMPOSITION_TOLERANCE: f64 = 1e-6;

/// Assembles a Monte Carlo chain: cluster list + ECI + ensemble choice in,
/// validated `McEngine` out.
///
/// Defaults: canonical exchange ensemble, L = 4 with the conventional BCC
/// position generator (N = 2L³), no equilibration, one averaging sweep,
/// seed 0. The gas constant is a required argument and must carry the same
/// units as the ECI.
pub struct McRunnerBuilder {
    clusters: ClusterListResult,
    eci: Vec<f64>,
    num_components: usize,
    temperature: f64,
    composition: Vec<f64>,
    gas_constant: f64,
    num_equilibration: usize,
    num_averaging: usize,
    supercell: usize,
    positions: Option<Vec<Position>>,
    use_flip_step: bool,
    delta_mu: Option<Vec<f64>>,
    seed: u64,
    listener: Option<UpdateListener>,
    cancel: Option<Arc<AtomicBool>>,
    verify_interval: Option<usize>,
}

impl McRunnerBuilder {
    pub fn new(
        clusters: ClusterListResult,
        eci: Vec<f64>,
        num_components: usize,
        temperature: f64,
        composition: Vec<f64>,
        gas_constant: f64,
    ) -> Self {
        Self {
            clusters,
            eci,
            num_components,
            temperature,
            composition,
            gas_constant,
            num_equilibration: 0,
            num_averaging: 1,
            supercell: 4,
            positions: None,
            use_flip_step: false,
            delta_mu: None,
            seed: 0,
            listener: None,
            cancel: None,
            verify_interval: None,
        }
    }

    /// Wire a chain to the CF list of an identification dataset; the ECI
    /// follow the dataset's descending-size CF order.
    pub fn from_dataset(
        dataset: &ClusterDataset,
        eci: Vec<f64>,
        temperature: f64,
        composition: Vec<f64>,
        gas_constant: f64,
    ) -> Self {
        Self::new(
            dataset.cf.cfs.clone(),
            eci,
            dataset.num_components,
            temperature,
            composition,
            gas_constant,
        )
    }

    pub fn equilibration_sweeps(mut self, num_sweeps: usize) -> Self {
        self.num_equilibration = num_sweeps;
        self
    }

    pub fn averaging_sweeps(mut self, num_sweeps: usize) -> Self {
        self.num_averaging = num_sweeps;
        self
    }

    pub fn supercell(mut self, l: usize) -> Self {
        self.supercell = l;
        self
    }

    /// Override the default BCC generator with custom unit-cell fractional
    /// positions
    pub fn positions(mut self, positions: Vec<Position>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Switch to the grand-canonical flip ensemble; `delta_mu[c] = μ_c − μ_0`
    pub fn flip_step(mut self, delta_mu: Vec<f64>) -> Self {
        self.use_flip_step = true;
        self.delta_mu = Some(delta_mu);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn update_listener(mut self, listener: UpdateListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Audit the tracked energy against a full recomputation every
    /// `interval` sweeps
    pub fn verify_interval(mut self, interval: usize) -> Self {
        self.verify_interval = Some(interval);
        self
    }

    /// Validate every option, realize the embeddings and build the engine.
    pub fn build(self) -> Result<McEngine, CemcError> {
        if self.num_components < 2 {
            return Err(CemcError::InvalidComponentCount(self.num_components));
        }
        if !(self.temperature > 0.0) {
            return Err(CemcError::InvalidTemperature(self.temperature));
        }
        if !(self.gas_constant > 0.0) {
            return Err(CemcError::InvalidGasConstant(self.gas_constant));
        }
        if self.supercell < 1 {
            return Err(CemcError::InvalidSupercell);
        }
        if self.num_averaging < 1 {
            return Err(CemcError::InvalidSweepCount);
        }
        if self.composition.len() != self.num_components
            || self.composition.iter().any(|&x| x < 0.0)
            || (self.composition.iter().sum::<f64>() - 1.0).abs() > COMPOSITION_TOLERANCE
        {
            return Err(CemcError::InvalidComposition);
        }
        if self.use_flip_step {
            let delta_mu = self.delta_mu.as_ref().expect("flip step sets delta_mu");
            if delta_mu.len() != self.num_components {
                return Err(CemcError::InvalidChemicalPotentials(delta_mu.len()));
            }
        }

        let positions = self
            .positions
            .unwrap_or_else(|| bcc_positions(self.supercell));
        if positions.is_empty() {
            return Err(CemcError::EmptyLattice);
        }

        let basis = SiteOperatorBasis::new(self.num_components)?;
        let embeddings = EmbeddingData::generate(&positions, &self.clusters, self.supercell)?;
        let energy = EnergyModel::new(embeddings, basis, self.eci)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut config = LatticeConfig::new(positions.len(), self.num_components);
        config.randomize(&self.composition, &mut rng);

        let step: Box<dyn McStep> = if self.use_flip_step {
            Box::new(FlipStep::new(self.delta_mu.unwrap()))
        } else {
            Box::new(ExchangeStep::new())
        };
        let sampler = McSampler::new(energy.embeddings().num_types);
        debug!(
            "runner: N = {}, {} embeddings, {} ensemble",
            positions.len(),
            energy.embeddings().embeddings.len(),
            if self.use_flip_step {
                "grand-canonical"
            } else {
                "canonical"
            }
        );

        Ok(McEngine {
            beta: 1.0 / (self.gas_constant * self.temperature),
            energy,
            config,
            step,
            sampler,
            rng,
            temperature: self.temperature,
            gas_constant: self.gas_constant,
            num_equilibration: self.num_equilibration,
            num_averaging: self.num_averaging,
            supercell: self.supercell,
            listener: self.listener,
            cancel: self.cancel,
            verify_interval: self.verify_interval,
        })
    }
}
