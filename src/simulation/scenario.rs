//! Build fully-initialized scattering runs from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - the impact parameters, in run order
//! - the `Simulation` with one particle per impact parameter at t = 0
//! - the physical settings needed to compare against analytic results
//!
//! Every check runs here, before any stepping begins.

use log::info;

use crate::analysis::scattering::{rutherford_angle, scattering_results, ScatteringResult};
use crate::configuration::config::{ParticleConfig, PotentialConfig, ScenarioConfig};
use crate::simulation::engine::{RunReport, Simulation};
use crate::simulation::error::{require_finite, require_positive, Result};
use crate::simulation::forces::{Coulomb, SoftenedCoulomb};
use crate::simulation::params::SimulationConfig;
use crate::simulation::states::{NVec2, Particle};

#[derive(Debug)]
pub struct Scenario {
    pub potential: PotentialConfig,
    pub particle: ParticleConfig,
    pub impact_parameters: Vec<f64>,
    pub simulation: Simulation,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let impact_parameters = cfg.resolve_impact_parameters()?;
        for &b in &impact_parameters {
            require_finite("impact parameter", b)?;
        }
        let pc = cfg.particle;
        require_positive("start_distance", pc.start_distance)?;
        require_finite("v0", pc.v0)?;

        // Particles: one per impact parameter at (-R, b) moving along +x
        let particles = impact_parameters
            .iter()
            .map(|&b| {
                Particle::new(
                    pc.mass,
                    NVec2::new(-pc.start_distance, b),
                    NVec2::new(pc.v0, 0.0),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let p_cfg = cfg.parameters;
        let config = SimulationConfig::new(p_cfg.dt, p_cfg.t_max, p_cfg.r_exit)?
            .with_failure_policy(p_cfg.failure_policy)
            .with_parallel(p_cfg.parallel)
            .with_stop_when_all_exited(p_cfg.stop_when_all_exited);

        // Force law: the configured variant drives the run's integrator
        let simulation = match cfg.potential {
            PotentialConfig::Coulomb { g } => {
                Simulation::new(particles, Coulomb::new(require_finite("g", g)?), config)?
            }
            PotentialConfig::SoftenedCoulomb { g, eps2 } => {
                Simulation::new(particles, SoftenedCoulomb::new(g, eps2)?, config)?
            }
        };

        info!(
            "scenario: {:?}, m = {}, v0 = {}, R = {}, {} impact parameters",
            cfg.potential,
            pc.mass,
            pc.v0,
            pc.start_distance,
            impact_parameters.len()
        );

        Ok(Self {
            potential: cfg.potential,
            particle: pc,
            impact_parameters,
            simulation,
        })
    }

    pub fn run(&mut self) -> Result<RunReport> {
        self.simulation.run()
    }

    /// Scattering angle per impact parameter, in input order
    pub fn results(&self) -> Vec<ScatteringResult> {
        scattering_results(self.simulation.particles(), &self.impact_parameters)
    }

    /// Analytic deflection magnitude for impact parameter `b`
    pub fn rutherford(&self, b: f64) -> f64 {
        rutherford_angle(self.potential.g(), self.particle.mass, self.particle.v0, b)
    }
}
