//! Numerical parameters for a scattering run
//!
//! `SimulationConfig` holds the runtime settings:
//! - fixed step size and simulated time ceiling,
//! - exit radius of the interaction region,
//! - failure policy and execution options

use serde::Deserialize;

use crate::simulation::error::{require_positive, Result};

/// Exit radius used when a scenario does not set one
pub const DEFAULT_R_EXIT: f64 = 20.0;

/// What the driver does when a particle's step fails
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failure aborts the whole run
    #[serde(rename = "abort")]
    #[default]
    Abort,

    /// The failing particle is frozen and recorded, the others keep going
    #[serde(rename = "isolate")]
    Isolate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    dt: f64, // step size
    t_max: f64, // simulated time ceiling
    r_exit: f64, // radius of the interaction region
    pub failure_policy: FailurePolicy,
    pub parallel: bool, // step a tick's particles on the rayon pool
    pub stop_when_all_exited: bool, // end the loop once every particle is frozen
}

impl SimulationConfig {
    /// Validated config with default policy and options
    /// Fails with `InvalidConfig` unless dt, t_max and r_exit are all > 0
    pub fn new(dt: f64, t_max: f64, r_exit: f64) -> Result<Self> {
        Ok(Self {
            dt: require_positive("dt", dt)?,
            t_max: require_positive("t_max", t_max)?,
            r_exit: require_positive("r_exit", r_exit)?,
            failure_policy: FailurePolicy::default(),
            parallel: false,
            stop_when_all_exited: false,
        })
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_stop_when_all_exited(mut self, stop: bool) -> Self {
        self.stop_when_all_exited = stop;
        self
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    pub fn r_exit(&self) -> f64 {
        self.r_exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::error::SimError;

    #[test]
    fn defaults_keep_fixed_length_abort_loop() {
        let cfg = SimulationConfig::new(0.01, 100.0, DEFAULT_R_EXIT).unwrap();
        assert_eq!(cfg.failure_policy, FailurePolicy::Abort);
        assert!(!cfg.parallel);
        assert!(!cfg.stop_when_all_exited);
        assert_eq!(cfg.r_exit(), 20.0);
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert!(matches!(SimulationConfig::new(0.0, 1.0, 1.0), Err(SimError::InvalidConfig(_))));
        assert!(matches!(SimulationConfig::new(0.1, -1.0, 1.0), Err(SimError::InvalidConfig(_))));
        assert!(matches!(SimulationConfig::new(0.1, 1.0, 0.0), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn policy_deserializes_from_lowercase_names() {
        let p: FailurePolicy = serde_yaml::from_str("isolate").unwrap();
        assert_eq!(p, FailurePolicy::Isolate);
    }
}
