use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::config::LatticeConfig;
use super::energy::EnergyModel;
use super::sampler::McSampler;
use super::step::McStep;

/// Sweeps over which the ΔE statistics in sweep updates are rolled
const ROLLING_WINDOW: usize = 100;
/// Relative drift above which an energy audit corrects the tracked value
const DRIFT_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum McPhase {
    Equilibration,
    Averaging,
}

/// Per-sweep progress record delivered to the update listener
#[derive(Debug, Clone, Serialize)]
pub struct SweepUpdate {
    pub sweep: usize,
    pub phase: McPhase,
    pub current_energy: f64,
    pub sweep_delta_e: f64,
    pub rolling_mean_delta_e: f64,
    pub rolling_std_delta_e: f64,
    pub accept_rate: f64,
    pub elapsed_ms: u128,
}

pub type UpdateListener = Box<dyn FnMut(&SweepUpdate)>;

/// Final observables of one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McResult {
    pub temperature: f64,
    pub composition: Vec<f64>,
    pub avg_cfs: Vec<f64>,
    pub energy_per_site: f64,
    pub heat_capacity_per_site: f64,
    pub accept_rate: f64,
    pub num_equilibration: usize,
    pub num_averaging: usize,
    pub supercell: usize,
    pub num_sites: usize,
    /// False when cancellation cut the run short
    pub completed: bool,
}

/// Metropolis chain driver: equilibration then averaging, one sweep at a
/// time, with the total energy tracked incrementally from per-step ΔE.
pub struct McEngine {
    pub(crate) energy: EnergyModel,
    pub(crate) config: LatticeConfig,
    pub(crate) step: Box<dyn McStep>,
    pub(crate) sampler: McSampler,
    pub(crate) rng: StdRng,
    pub(crate) temperature: f64,
    pub(crate) gas_constant: f64,
    pub(crate) beta: f64,
    pub(crate) num_equilibration: usize,
    pub(crate) num_averaging: usize,
    pub(crate) supercell: usize,
    pub(crate) listener: Option<UpdateListener>,
    pub(crate) cancel: Option<Arc<AtomicBool>>,
    pub(crate) verify_interval: Option<usize>,
}

impl McEngine {
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn energy_model(&self) -> &EnergyModel {
        &self.energy
    }

    /// Mutate the configuration outside the step actor; the step caches are
    /// invalidated on behalf of the caller.
    pub fn config_mut(&mut self) -> &mut LatticeConfig {
        self.step.invalidate_cache();
        &mut self.config
    }

    pub fn set_listener(&mut self, listener: UpdateListener) {
        self.listener = Some(listener);
    }

    pub fn cancel_flag(&mut self) -> Arc<AtomicBool> {
        if self.cancel.is_none() {
            self.cancel = Some(Arc::new(AtomicBool::new(false)));
        }
        self.cancel.as_ref().unwrap().clone()
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    /// Run the chain to completion (or cancellation) and report the
    /// averaged observables. The only full-energy pass is the initial one;
    /// every sweep afterwards adds its aggregate ΔE.
    pub fn run(&mut self) -> McResult {
        let started = Instant::now();
        let num_sites = self.config.num_sites();
        let mut current_energy = self.energy.total_energy(&self.config);
        debug!(
            "mc run: N = {}, T = {}, initial energy {}",
            num_sites, self.temperature, current_energy
        );

        let mut window: VecDeque<f64> = VecDeque::with_capacity(ROLLING_WINDOW);
        let mut completed = true;

        let phases = [
            (McPhase::Equilibration, self.num_equilibration),
            (McPhase::Averaging, self.num_averaging),
        ];
        'phases: for (phase, num_sweeps) in phases {
            if phase == McPhase::Averaging {
                self.step.reset_counters();
                self.sampler.reset();
                debug!("mc run: averaging phase, energy {}", current_energy);
            }
            for sweep in 0..num_sweeps {
                if self.cancelled() {
                    debug!("mc run: cancelled at {:?} sweep {}", phase, sweep);
                    completed = false;
                    break 'phases;
                }

                let mut sweep_delta = 0.0;
                for _ in 0..num_sites {
                    sweep_delta +=
                        self.step
                            .attempt(&mut self.config, &self.energy, self.beta, &mut self.rng);
                }
                current_energy += sweep_delta;

                if let Some(interval) = self.verify_interval {
                    if interval > 0 && (sweep + 1) % interval == 0 {
                        current_energy = self.audit_drift(current_energy);
                    }
                }
                if phase == McPhase::Averaging {
                    self.sampler.sample(&self.config, &self.energy, current_energy);
                }

                if window.len() == ROLLING_WINDOW {
                    window.pop_front();
                }
                window.push_back(sweep_delta);
                if self.listener.is_some() {
                    let (rolling_mean, rolling_std) = rolling_stats(&window);
                    let update = SweepUpdate {
                        sweep,
                        phase,
                        current_energy,
                        sweep_delta_e: sweep_delta,
                        rolling_mean_delta_e: rolling_mean,
                        rolling_std_delta_e: rolling_std,
                        accept_rate: self.step.accept_rate(),
                        elapsed_ms: started.elapsed().as_millis(),
                    };
                    if let Some(listener) = self.listener.as_mut() {
                        listener(&update);
                    }
                }
            }
        }

        let energy_per_site = if self.sampler.num_samples() > 0 {
            self.sampler.mean_energy() / num_sites as f64
        } else {
            current_energy / num_sites as f64
        };
        McResult {
            temperature: self.temperature,
            composition: self.config.composition(),
            avg_cfs: self.sampler.mean_cfs(),
            energy_per_site,
            heat_capacity_per_site: self.sampler.heat_capacity_per_site(
                num_sites,
                self.gas_constant,
                self.temperature,
            ),
            accept_rate: self.step.accept_rate(),
            num_equilibration: self.num_equilibration,
            num_averaging: self.num_averaging,
            supercell: self.supercell,
            num_sites,
            completed,
        }
    }

    /// Recompute the total energy and keep the tracked value unless the
    /// drift exceeds the documented bound.
    fn audit_drift(&self, tracked: f64) -> f64 {
        let recomputed = self.energy.total_energy(&self.config);
        let bound = DRIFT_TOLERANCE * tracked.abs().max(1.0);
        if (recomputed - tracked).abs() > bound {
            debug!(
                "energy drift {} exceeds bound {}, correcting",
                recomputed - tracked,
                bound
            );
            recomputed
        } else {
            tracked
        }
    }
}

fn rolling_stats(window: &VecDeque<f64>) -> (f64, f64) {
    if window.is_empty() {
        return (0.0, 0.0);
    }
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_stats() {
        let window: VecDeque<f64> = vec![1.0, 3.0].into();
        let (mean, std) = rolling_stats(&window);
        assert_relative_eq!(mean, 2.0);
        assert_relative_eq!(std, 1.0);
        assert_eq!(rolling_stats(&VecDeque::new()), (0.0, 0.0));
    }
}
