pub mod controller;
pub mod rate;
pub mod targets;
pub mod mode;
pub mod attitude;
pub mod descent;
pub mod airspeed;
pub mod suite;

pub use controller::Autopilot;
pub use rate::{kill_rotation, orient_axis, Axis, PitchLearningState, RateController};
pub use targets::{AirspeedAdjust, AutopilotTargets, DescentAdjust};
pub use mode::{AutopilotMode, AutopilotState};
pub use attitude::{wrap_bank_target, AttitudeHoldController, ColPowerState};
pub use descent::{auto_land_descent_rate, DescentHoldController};
pub use airspeed::AirspeedHoldController;
pub use suite::AutopilotSuite;
