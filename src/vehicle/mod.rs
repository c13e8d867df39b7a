pub mod thruster;
pub mod snapshot;
pub mod command;
pub mod trim;
pub mod model;

pub use thruster::{ThrusterCommands, ThrusterGroup, ThrusterLevels};
pub use snapshot::{EngineCapacity, SnapshotBuilder, VehicleSnapshot, G0};
pub use command::{Advisory, AdvisoryKind, AutopilotCommand, ModeRequest, Severity, Telemetry};
pub use trim::CenterOfLiftActuator;
pub use model::{presets, VehicleModel, VehicleModelBuilder};
