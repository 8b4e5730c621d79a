//! Fixed-step time integrator for a single particle
//!
//! Semi-implicit (symplectic) Euler: the velocity is kicked first and the
//! position drifts with the updated velocity, all driven by a shared
//! [`ForceLaw`]

use std::fmt;

use crate::analysis::diagnostics::EnergyDiagnostics;
use crate::simulation::error::{require_positive, Result};
use crate::simulation::forces::ForceLaw;
use crate::simulation::states::{NVec2, Particle};

pub struct Integrator {
    dt: f64, // time step dt
    force: Box<dyn ForceLaw>, // read-only for the whole run
}

impl fmt::Debug for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integrator")
            .field("dt", &self.dt)
            .field("force", &"dyn ForceLaw")
            .finish()
    }
}

impl Integrator {
    /// Fails with `InvalidConfig` for a non-positive `dt`
    pub fn new<F>(dt: f64, force: F) -> Result<Self>
    where
        F: ForceLaw + 'static,
    {
        Ok(Self {
            dt: require_positive("dt", dt)?,
            force: Box::new(force),
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn force_law(&self) -> &dyn ForceLaw {
        self.force.as_ref()
    }

    /// Advance `p` by one step of `dt`
    ///
    /// ```text
    ///   a     = F(x_n) / m
    ///   v_n+1 = v_n + a dt
    ///   x_n+1 = x_n + v_n+1 dt
    /// ```
    ///
    /// and record one snapshot pair. All or nothing: if the force law fails
    /// the particle is left untouched and nothing is appended.
    pub fn step(&self, p: &mut Particle) -> Result<()> {
        let (x_new, v_new) = self.propose(p)?;
        p.commit(x_new, v_new);
        Ok(())
    }

    /// Next `(position, velocity)` of `p` without touching it
    pub fn propose(&self, p: &Particle) -> Result<(NVec2, NVec2)> {
        let dt = self.dt;
        let x = p.position();
        let v = p.velocity();

        // Only fallible part
        let a = self.force.force(&x)? / p.mass();

        // Kick, then drift with the new velocity
        let v_new = v + a * dt;
        let x_new = x + v_new * dt;

        Ok((x_new, v_new))
    }

    /// Energy and angular momentum of `p` under this integrator's force law
    /// Advisory only: never feeds back into `step`
    pub fn diagnostics(&self, p: &Particle) -> Result<EnergyDiagnostics> {
        EnergyDiagnostics::of(p, self.force.as_ref())
    }
}
