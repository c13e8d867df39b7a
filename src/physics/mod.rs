pub mod atmosphere;
pub mod gravity;
pub mod aerodynamics;

pub use atmosphere::{isa, Atmo};
