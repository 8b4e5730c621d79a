pub mod diagnostics;
pub mod scattering;
