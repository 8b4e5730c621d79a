//! Force laws for the fixed scattering center
//!
//! Defines the [`ForceLaw`] capability, the inverse-square Coulomb law,
//! a softened variant, and [`ForceSet`] for summing several contributions

use crate::simulation::error::{require_finite, Result, SimError};
use crate::simulation::states::NVec2;

/// A static external field, evaluated at a particle position
/// Implementations are pure: the same position gives bit-identical output
pub trait ForceLaw: Send + Sync {
    /// Force acting on a particle at `x`
    fn force(&self, x: &NVec2) -> Result<NVec2>;

    /// Potential energy at `x`, consistent with `force = -grad U`
    fn potential_energy(&self, x: &NVec2) -> Result<f64>;
}

/// Coulomb-type central force `F = -g x / |x|^3`
///
/// With this sign convention `g > 0` pulls particles toward the center and
/// `g < 0` pushes them away. Undefined at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coulomb {
    pub g: f64, // coupling constant
}

impl Coulomb {
    pub fn new(g: f64) -> Self {
        Self { g }
    }
}

impl ForceLaw for Coulomb {
    fn force(&self, x: &NVec2) -> Result<NVec2> {
        let r = x.norm();
        if r == 0.0 {
            return Err(SimError::Singularity { position: *x });
        }
        let inv_r3 = (r * r * r).recip();
        Ok(*x * (-self.g * inv_r3))
    }

    fn potential_energy(&self, x: &NVec2) -> Result<f64> {
        let r = x.norm();
        if r == 0.0 {
            return Err(SimError::Singularity { position: *x });
        }
        Ok(-self.g / r)
    }
}

/// Coulomb force with softening
/// `F = -g x / (|x|^2 + eps2)^(3/2)`, finite at the origin when `eps2 > 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftenedCoulomb {
    g: f64, // coupling constant
    eps2: f64, // softening length squared, >= 0
}

impl SoftenedCoulomb {
    /// Fails with `InvalidConfig` unless `g` is finite and `eps2` is finite and >= 0
    pub fn new(g: f64, eps2: f64) -> Result<Self> {
        let g = require_finite("g", g)?;
        let eps2 = require_finite("eps2", eps2)?;
        if eps2 < 0.0 {
            return Err(SimError::InvalidConfig(format!("eps2 must be >= 0, got {eps2}")));
        }
        Ok(Self { g, eps2 })
    }
}

impl ForceLaw for SoftenedCoulomb {
    fn force(&self, x: &NVec2) -> Result<NVec2> {
        // Softened squared distance d2 = |x|^2 + eps^2
        let d2 = x.dot(x) + self.eps2;
        if d2 == 0.0 {
            return Err(SimError::Singularity { position: *x });
        }
        let inv_d = d2.sqrt().recip();
        let inv_d3 = inv_d * inv_d * inv_d;
        Ok(*x * (-self.g * inv_d3))
    }

    fn potential_energy(&self, x: &NVec2) -> Result<f64> {
        let d2 = x.dot(x) + self.eps2;
        if d2 == 0.0 {
            return Err(SimError::Singularity { position: *x });
        }
        Ok(-self.g / d2.sqrt())
    }
}

/// Collection of force terms whose contributions are summed
/// The first failing term fails the whole evaluation
#[derive(Default)]
pub struct ForceSet {
    terms: Vec<Box<dyn ForceLaw>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: ForceLaw + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl ForceLaw for ForceSet {
    fn force(&self, x: &NVec2) -> Result<NVec2> {
        let mut total = NVec2::zeros();
        for term in &self.terms {
            total += term.force(x)?;
        }
        Ok(total)
    }

    fn potential_energy(&self, x: &NVec2) -> Result<f64> {
        let mut total = 0.0;
        for term in &self.terms {
            total += term.potential_energy(x)?;
        }
        Ok(total)
    }
}
