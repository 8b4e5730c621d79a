//! Error type shared by the force laws, integrator and simulation driver

use thiserror::Error;

use crate::simulation::states::NVec2;

/// Failures raised while building or running a scattering simulation
///
/// - [`SimError::Singularity`] is raised by a force law evaluated at the
///   force center and propagates out of `Integrator::step`
/// - [`SimError::InvalidConfig`] is raised eagerly at construction time,
///   before any stepping begins
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("force evaluated at the singular point ({}, {})", .position.x, .position.y)]
    Singularity { position: NVec2 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Reject anything that is not a finite, strictly positive number
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidConfig(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

/// Reject NaN and infinities
pub(crate) fn require_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_values_pass_through() {
        assert_eq!(require_positive("dt", 0.01), Ok(0.01));
    }

    #[test]
    fn zero_negative_and_nan_are_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                require_positive("mass", bad),
                Err(SimError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn finite_check_accepts_zero_and_negatives() {
        assert_eq!(require_finite("g", 0.0), Ok(0.0));
        assert_eq!(require_finite("g", -2.0), Ok(-2.0));
        assert!(require_finite("g", f64::NAN).is_err());
        assert!(require_finite("v0", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn singularity_message_names_position() {
        let err = SimError::Singularity { position: NVec2::zeros() };
        assert_eq!(err.to_string(), "force evaluated at the singular point (0, 0)");
    }
}
