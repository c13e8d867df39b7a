pub mod config;
pub mod vehicle;
mod control_mod;
pub mod physics;
pub mod sim;
pub mod io;

// The control module: expose control_mod as `control` publicly
pub mod control {
    pub use crate::control_mod::*;
}

pub use config::{AutopilotConfig, ConfigError};
pub use control::{AutopilotMode, AutopilotSuite};
pub use vehicle::{AutopilotCommand, VehicleSnapshot};
