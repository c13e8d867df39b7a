pub mod state;
pub mod dynamics;
pub mod integrator;
pub mod host;
pub mod pilot;
pub mod event;
pub mod runner;
pub mod scenario;

pub use state::{PlantState, Systems};
pub use runner::{simulate, simulate_with, SimConfig};
pub use integrator::rk4_step;
pub use pilot::{PilotAction, PilotEvent};
pub use scenario::Scenario;
