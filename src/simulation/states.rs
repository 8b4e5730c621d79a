//! Core state types for the scattering simulation.
//!
//! Defines the 2D vector alias and the `Particle` state container:
//! - live position/velocity, updated only by the integrator
//! - append-only trajectory and velocity histories
//!
//! `NVec2` is `Copy`, so every history entry is an independent snapshot,
//! never an alias of the live state.

use nalgebra::Vector2;

use crate::simulation::error::{require_positive, Result};

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    m: f64, // mass
    x: NVec2, // position
    v: NVec2, // velocity
    trajectory: Vec<NVec2>, // position snapshots, starts with the initial position
    velocities: Vec<NVec2>, // velocity snapshots, starts with the initial velocity
}

impl Particle {
    /// Create a particle at its initial conditions
    /// Fails with `InvalidConfig` for a non-positive (or non-finite) mass
    pub fn new(mass: f64, position: NVec2, velocity: NVec2) -> Result<Self> {
        let m = require_positive("mass", mass)?;
        Ok(Self {
            m,
            x: position,
            v: velocity,
            trajectory: vec![position],
            velocities: vec![velocity],
        })
    }

    pub fn mass(&self) -> f64 {
        self.m
    }

    pub fn position(&self) -> NVec2 {
        self.x
    }

    pub fn velocity(&self) -> NVec2 {
        self.v
    }

    /// Distance from the force center
    pub fn distance(&self) -> f64 {
        self.x.norm()
    }

    pub fn trajectory(&self) -> &[NVec2] {
        &self.trajectory
    }

    pub fn velocity_history(&self) -> &[NVec2] {
        &self.velocities
    }

    /// Number of recorded samples (identical for both histories)
    pub fn samples(&self) -> usize {
        self.trajectory.len()
    }

    /// Commit a new state and record one snapshot pair
    /// Only the integrator advances particles.
    pub(crate) fn commit(&mut self, position: NVec2, velocity: NVec2) {
        self.x = position;
        self.v = velocity;
        self.velocities.push(velocity);
        self.trajectory.push(position);
    }
}
