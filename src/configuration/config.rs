//! Configuration types for loading scattering scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scattering experiment. A scenario consists of:
//!
//! - [`PotentialConfig`]  – the fixed central force law and its coupling
//! - [`ParticleConfig`]   – mass, incoming speed and start distance shared by every particle
//! - impact parameters    – an explicit list or an evenly spaced [`ImpactRange`]
//! - [`ParametersConfig`] – step size, time ceiling, exit radius and run options
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! potential:
//!   kind: coulomb           # or "softened_coulomb"
//!   g: 2.0                  # F = -g x / |x|^3
//!
//! particle:
//!   mass: 0.5
//!   v0: 1.0                 # incoming speed along +x
//!   start_distance: 10.0    # particles start at (-start_distance, b)
//!
//! impact_parameters: [1.0, 1.5, 2.0, 2.5, 3.0]
//! # impact_range: { start: 1.0, end: 5.0, count: 9 }
//!
//! parameters:
//!   dt: 0.01
//!   t_max: 100.0
//!   r_exit: 20.0            # optional, defaults to 20.0
//!   failure_policy: abort   # optional, "abort" or "isolate"
//!   parallel: false         # optional
//!   stop_when_all_exited: false  # optional
//! ```
//!
//! `Scenario::build_scenario` maps this configuration into runtime particles,
//! an integrator and a validated `SimulationConfig`.

use serde::Deserialize;

use crate::simulation::error::{Result, SimError};
use crate::simulation::params::{FailurePolicy, DEFAULT_R_EXIT};

/// Which force law acts from the center
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind")]
pub enum PotentialConfig {
    #[serde(rename = "coulomb")] // F = -g x / |x|^3, singular at the center
    Coulomb { g: f64 },

    #[serde(rename = "softened_coulomb")] // F = -g x / (|x|^2 + eps2)^(3/2)
    SoftenedCoulomb { g: f64, eps2: f64 },
}

impl PotentialConfig {
    /// Coupling constant of either variant
    pub fn g(&self) -> f64 {
        match *self {
            PotentialConfig::Coulomb { g } => g,
            PotentialConfig::SoftenedCoulomb { g, .. } => g,
        }
    }
}

/// Initial conditions shared by every particle of the fan
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    pub mass: f64, // must be > 0
    pub v0: f64, // incoming speed along +x
    pub start_distance: f64, // particles start at x = -start_distance
}

/// Evenly spaced impact parameters, both ends included
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ImpactRange {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl ImpactRange {
    pub fn values(&self) -> Result<Vec<f64>> {
        match self.count {
            0 => Err(SimError::InvalidConfig("impact_range.count must be > 0".into())),
            1 => Ok(vec![self.start]),
            n => {
                let step = (self.end - self.start) / (n - 1) as f64;
                Ok((0..n).map(|i| self.start + step * i as f64).collect())
            }
        }
    }
}

/// Numerical parameters and run options
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ParametersConfig {
    pub dt: f64, // fixed step size
    pub t_max: f64, // simulated time ceiling
    #[serde(default = "default_r_exit")]
    pub r_exit: f64, // radius of the interaction region
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub stop_when_all_exited: bool,
}

fn default_r_exit() -> f64 {
    DEFAULT_R_EXIT
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub potential: PotentialConfig,
    pub particle: ParticleConfig,
    #[serde(default)]
    pub impact_parameters: Vec<f64>,
    #[serde(default)]
    pub impact_range: Option<ImpactRange>,
    pub parameters: ParametersConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    /// Impact parameters in run order
    /// An explicit list and a range are mutually exclusive, one is required
    pub fn resolve_impact_parameters(&self) -> Result<Vec<f64>> {
        match (&self.impact_range, self.impact_parameters.is_empty()) {
            (Some(_), false) => Err(SimError::InvalidConfig(
                "set either impact_parameters or impact_range, not both".into(),
            )),
            (Some(range), true) => range.values(),
            (None, false) => Ok(self.impact_parameters.clone()),
            (None, true) => Err(SimError::InvalidConfig("no impact parameters given".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const YAML: &str = r#"
potential:
  kind: coulomb
  g: 2.0
particle:
  mass: 0.5
  v0: 1.0
  start_distance: 10.0
impact_range: { start: 1.0, end: 5.0, count: 9 }
parameters:
  dt: 0.01
  t_max: 100.0
"#;

    #[test]
    fn parses_with_defaults() {
        let cfg = ScenarioConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(cfg.potential, PotentialConfig::Coulomb { g: 2.0 });
        assert_eq!(cfg.parameters.r_exit, 20.0);
        assert_eq!(cfg.parameters.failure_policy, FailurePolicy::Abort);
        assert!(!cfg.parameters.parallel);
    }

    #[test]
    fn range_expands_inclusive() {
        let cfg = ScenarioConfig::from_yaml_str(YAML).unwrap();
        let bs = cfg.resolve_impact_parameters().unwrap();
        assert_eq!(bs.len(), 9);
        assert_relative_eq!(bs[0], 1.0);
        assert_relative_eq!(bs[1], 1.5);
        assert_relative_eq!(bs[8], 5.0);
    }

    #[test]
    fn softened_variant_and_explicit_list() {
        let cfg = ScenarioConfig::from_yaml_str(
            r#"
potential: { kind: softened_coulomb, g: -1.0, eps2: 0.01 }
particle: { mass: 1.0, v0: 1.0, start_distance: 10.0 }
impact_parameters: [0.4, 0.8]
parameters: { dt: 0.01, t_max: 10.0, r_exit: 15.0, failure_policy: isolate }
"#,
        )
        .unwrap();
        assert_eq!(cfg.potential.g(), -1.0);
        assert_eq!(cfg.resolve_impact_parameters().unwrap(), vec![0.4, 0.8]);
        assert_eq!(cfg.parameters.failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn missing_or_conflicting_impact_parameters_are_rejected() {
        let mut cfg = ScenarioConfig::from_yaml_str(YAML).unwrap();
        cfg.impact_parameters = vec![1.0];
        assert!(cfg.resolve_impact_parameters().is_err());

        cfg.impact_parameters.clear();
        cfg.impact_range = None;
        assert!(cfg.resolve_impact_parameters().is_err());

        let zero = ImpactRange { start: 1.0, end: 2.0, count: 0 };
        assert!(zero.values().is_err());
    }
}
