//! Time loop driving every particle through the fixed field
//!
//! All particles advance in lockstep on a global clock. A particle is
//! stepped on a tick only while it is strictly inside the exit radius; once
//! it is found outside at the start of a tick it is frozen for the rest of
//! the run.
//!
//! Each tick has three phases:
//! - exit check: active particles at or beyond `r_exit` are frozen
//! - propose: the integrator computes the next state of every active
//!   particle from read-only state (sequential or on the rayon pool)
//! - commit: proposals are applied in particle index order
//!
//! Under [`FailurePolicy::Abort`] the commit stops at the first failing
//! particle: particles before it keep their new state, it and every later
//! particle are left untouched, and the clock is not advanced. This is the
//! same in sequential and parallel mode.

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use crate::simulation::error::{Result, SimError};
use crate::simulation::forces::ForceLaw;
use crate::simulation::integrator::Integrator;
use crate::simulation::params::{FailurePolicy, SimulationConfig};
use crate::simulation::states::{NVec2, Particle};

/// Per-particle run status
#[derive(Debug, Clone, PartialEq)]
enum Status {
    Active,
    Exited { tick: usize },
    Failed(SimError),
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub ticks: usize, // ticks executed
    pub elapsed: f64, // simulated time reached
    pub steps: usize, // integrator steps applied over all particles
    pub exited: usize, // particles that left the interaction region
    pub exit_ticks: Vec<Option<usize>>, // per particle, tick at which it was found outside
    pub failures: Vec<(usize, SimError)>, // isolated failures, by particle index
}

#[derive(Debug)]
pub struct Simulation {
    particles: Vec<Particle>,
    status: Vec<Status>,
    integrator: Integrator,
    config: SimulationConfig,
    t: f64, // global elapsed time
    ticks: usize,
    steps: usize,
}

impl Simulation {
    /// Builds the integrator from `force` and the config's `dt`
    pub fn new<F>(particles: Vec<Particle>, force: F, config: SimulationConfig) -> Result<Self>
    where
        F: ForceLaw + 'static,
    {
        let integrator = Integrator::new(config.dt(), force)?;
        let status = vec![Status::Active; particles.len()];
        Ok(Self {
            particles,
            status,
            integrator,
            config,
            t: 0.0,
            ticks: 0,
            steps: 0,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn into_particles(self) -> Vec<Particle> {
        self.particles
    }

    /// Simulated time of the last completed tick
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    /// Whether particle `i` is still being stepped
    pub fn is_active(&self, i: usize) -> bool {
        matches!(self.status.get(i), Some(Status::Active))
    }

    /// Tick at which particle `i` was found outside the exit radius
    pub fn exit_tick(&self, i: usize) -> Option<usize> {
        match self.status.get(i) {
            Some(Status::Exited { tick }) => Some(*tick),
            _ => None,
        }
    }

    /// Run until the global clock reaches `t_max`
    ///
    /// Under [`FailurePolicy::Abort`] the first failing step ends the run and
    /// its error is returned (see the module docs for the state left behind).
    /// The loop runs its full length even after every particle has exited,
    /// unless `stop_when_all_exited` is set.
    pub fn run(&mut self) -> Result<RunReport> {
        let dt = self.config.dt();
        let t_max = self.config.t_max();
        let r_exit = self.config.r_exit();
        info!(
            "run: {} particles, dt = {dt}, t_max = {t_max}, r_exit = {r_exit}",
            self.particles.len()
        );

        while self.t < t_max {
            let tick = self.ticks;
            self.freeze_exited(tick, r_exit);
            self.tick(tick)?;

            self.t += dt;
            self.ticks += 1;

            if self.config.stop_when_all_exited
                && !self.status.iter().any(|s| *s == Status::Active)
            {
                debug!("all particles frozen after {} ticks", self.ticks);
                break;
            }
        }

        let report = self.report();
        info!(
            "run finished: {} ticks, t = {:.4}, {} steps, {}/{} exited, {} failed",
            report.ticks,
            report.elapsed,
            report.steps,
            report.exited,
            self.particles.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Freeze every active particle at or beyond `r_exit`
    fn freeze_exited(&mut self, tick: usize, r_exit: f64) {
        for (i, (p, status)) in self.particles.iter().zip(self.status.iter_mut()).enumerate() {
            if *status == Status::Active && p.distance() >= r_exit {
                debug!("particle {i} exited at tick {tick}");
                *status = Status::Exited { tick };
            }
        }
    }

    /// Step every active particle once
    fn tick(&mut self, tick: usize) -> Result<()> {
        let integrator = &self.integrator;
        let propose = |(i, (p, status)): (usize, (&Particle, &Status))| {
            (*status == Status::Active).then(|| (i, integrator.propose(p)))
        };

        let proposals: Vec<(usize, Result<(NVec2, NVec2)>)> = if self.config.parallel {
            self.particles
                .par_iter()
                .zip(self.status.par_iter())
                .enumerate()
                .filter_map(propose)
                .collect()
        } else {
            self.particles
                .iter()
                .zip(self.status.iter())
                .enumerate()
                .filter_map(propose)
                .collect()
        };

        for (i, proposal) in proposals {
            match proposal {
                Ok((x, v)) => {
                    self.particles[i].commit(x, v);
                    self.steps += 1;
                }
                Err(err) => match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::Isolate => {
                        warn!("particle {i} failed at tick {tick}: {err}");
                        self.status[i] = Status::Failed(err);
                    }
                },
            }
        }

        if log::log_enabled!(log::Level::Trace) {
            for (i, p) in self.particles.iter().enumerate() {
                if let Ok(d) = self.integrator.diagnostics(p) {
                    trace!("tick {tick} particle {i}: E = {:.6}, L = {:.6}", d.total_energy, d.angular_momentum);
                }
            }
        }

        Ok(())
    }

    fn report(&self) -> RunReport {
        let exit_ticks: Vec<Option<usize>> = (0..self.status.len()).map(|i| self.exit_tick(i)).collect();
        let failures = self
            .status
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                Status::Failed(err) => Some((i, err.clone())),
                _ => None,
            })
            .collect();

        RunReport {
            ticks: self.ticks,
            elapsed: self.t,
            steps: self.steps,
            exited: exit_ticks.iter().flatten().count(),
            exit_ticks,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::forces::Coulomb;

    fn sim(particles: Vec<Particle>, g: f64, dt: f64, t_max: f64, r_exit: f64) -> Simulation {
        let config = SimulationConfig::new(dt, t_max, r_exit).unwrap();
        Simulation::new(particles, Coulomb::new(g), config).unwrap()
    }

    #[test]
    fn integrator_takes_dt_from_config() {
        let config = SimulationConfig::new(0.2, 1.0, 20.0).unwrap();
        let s = Simulation::new(Vec::new(), Coulomb::new(1.0), config).unwrap();
        assert_eq!(s.integrator().dt(), 0.2);
    }

    #[test]
    fn particle_outside_region_is_never_stepped() {
        let p = Particle::new(1.0, NVec2::new(25.0, 0.0), NVec2::new(-1.0, 0.0)).unwrap();
        let mut s = sim(vec![p], 1.0, 0.5, 5.0, 20.0);

        let report = s.run().unwrap();

        assert_eq!(s.particles()[0].samples(), 1);
        assert_eq!(report.steps, 0);
        assert_eq!(report.exited, 1);
        assert_eq!(report.exit_ticks, vec![Some(0)]);
        assert_eq!(s.exit_tick(0), Some(0));
        assert!(!s.is_active(0));
    }

    #[test]
    fn loop_runs_full_length_after_everyone_exits() {
        let p = Particle::new(1.0, NVec2::new(25.0, 0.0), NVec2::zeros()).unwrap();
        let mut s = sim(vec![p], 1.0, 0.5, 5.0, 20.0);
        let report = s.run().unwrap();
        assert_eq!(report.ticks, 10);
        assert_eq!(report.elapsed, 5.0);
    }

    #[test]
    fn opt_in_early_stop_ends_loop() {
        let p = Particle::new(1.0, NVec2::new(25.0, 0.0), NVec2::zeros()).unwrap();
        let config = SimulationConfig::new(0.5, 5.0, 20.0)
            .unwrap()
            .with_stop_when_all_exited(true);
        let mut s = Simulation::new(vec![p], Coulomb::new(1.0), config).unwrap();

        let report = s.run().unwrap();
        assert_eq!(report.ticks, 1);
    }

    #[test]
    fn abort_policy_propagates_singularity() {
        let at_center = Particle::new(1.0, NVec2::zeros(), NVec2::new(1.0, 0.0)).unwrap();
        let mut s = sim(vec![at_center], 1.0, 0.5, 5.0, 20.0);

        let err = s.run().unwrap_err();

        assert!(matches!(err, SimError::Singularity { .. }));
        assert_eq!(s.particles()[0].samples(), 1);
        assert_eq!(s.time(), 0.0);
    }

    #[test]
    fn abort_leaves_later_particles_unstepped() {
        for parallel in [false, true] {
            let before = Particle::new(1.0, NVec2::new(-10.0, 2.0), NVec2::new(1.0, 0.0)).unwrap();
            let at_center = Particle::new(1.0, NVec2::zeros(), NVec2::zeros()).unwrap();
            let after = Particle::new(1.0, NVec2::new(-10.0, 1.0), NVec2::new(1.0, 0.0)).unwrap();
            let config = SimulationConfig::new(0.25, 5.0, 20.0).unwrap().with_parallel(parallel);
            let mut s = Simulation::new(vec![before, at_center, after], Coulomb::new(-1.0), config).unwrap();

            assert!(s.run().is_err());

            assert_eq!(s.time(), 0.0);
            assert_eq!(s.particles()[0].samples(), 2, "parallel = {parallel}");
            assert_eq!(s.particles()[1].samples(), 1, "parallel = {parallel}");
            assert_eq!(s.particles()[2].samples(), 1, "parallel = {parallel}");
        }
    }

    #[test]
    fn isolate_policy_freezes_only_the_failing_particle() {
        let at_center = Particle::new(1.0, NVec2::zeros(), NVec2::new(1.0, 0.0)).unwrap();
        let healthy = Particle::new(1.0, NVec2::new(-10.0, 3.0), NVec2::new(1.0, 0.0)).unwrap();
        let config = SimulationConfig::new(0.5, 5.0, 20.0)
            .unwrap()
            .with_failure_policy(FailurePolicy::Isolate);
        let mut s = Simulation::new(vec![at_center, healthy], Coulomb::new(-1.0), config).unwrap();

        let report = s.run().unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, 0);
        assert_eq!(report.exit_ticks, vec![None, None]);
        assert_eq!(s.particles()[0].samples(), 1);
        assert_eq!(s.particles()[1].samples(), 11);
        assert!(!s.is_active(0));
        assert!(s.is_active(1));
    }
}
