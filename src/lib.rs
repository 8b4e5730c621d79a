pub mod simulation;
pub mod configuration;
pub mod analysis;
pub mod logger;

pub use simulation::states::{Particle, NVec2};
pub use simulation::error::{SimError, Result};
pub use simulation::forces::{ForceLaw, Coulomb, SoftenedCoulomb, ForceSet};
pub use simulation::integrator::Integrator;
pub use simulation::params::{SimulationConfig, FailurePolicy, DEFAULT_R_EXIT};
pub use simulation::engine::{Simulation, RunReport};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, PotentialConfig, ParticleConfig, ParametersConfig, ImpactRange};

pub use analysis::scattering::{ScatteringResult, scattering_angle, scattering_results, rutherford_angle};
pub use analysis::diagnostics::EnergyDiagnostics;
