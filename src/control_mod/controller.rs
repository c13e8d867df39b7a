use super::mode::AutopilotState;
use crate::vehicle::{AutopilotCommand, VehicleSnapshot};

/// Trait for the custom autopilots.
///
/// Each implementation reads one vehicle snapshot plus the pilot state and
/// returns the writes it wants made this step. Controllers keep whatever
/// memory they need between steps (previous mode, learning state) but never
/// touch the vehicle directly.
pub trait Autopilot {
    fn step(&mut self, snapshot: &VehicleSnapshot, state: &AutopilotState) -> AutopilotCommand;

    /// Forget all memory, as after a reload.
    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "unnamed"
    }
}
