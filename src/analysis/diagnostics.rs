//! Advisory conservation diagnostics
//!
//! Angular momentum, effective potential and total energy of a particle in a
//! central field. Used for logging and checks only; the integrator never reads
//! them back.

use crate::simulation::error::Result;
use crate::simulation::forces::ForceLaw;
use crate::simulation::states::{NVec2, Particle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyDiagnostics {
    pub angular_momentum: f64, // L = m (x cross v), z component
    pub effective_potential: f64, // L^2 / (2 m r^2) + U(r)
    pub total_energy: f64, // m |v|^2 / 2 + U(r)
}

impl EnergyDiagnostics {
    /// Evaluate at the particle's current state
    /// Fails where the potential is singular
    pub fn of(p: &Particle, force: &dyn ForceLaw) -> Result<Self> {
        Self::at(p.mass(), &p.position(), &p.velocity(), force)
    }

    pub fn at(m: f64, x: &NVec2, v: &NVec2, force: &dyn ForceLaw) -> Result<Self> {
        let u = force.potential_energy(x)?;
        let angular_momentum = m * x.perp(v);
        let r2 = x.norm_squared();
        let effective_potential = angular_momentum * angular_momentum / (2.0 * m * r2) + u;
        let total_energy = 0.5 * m * v.norm_squared() + u;

        Ok(Self {
            angular_momentum,
            effective_potential,
            total_energy,
        })
    }
}
