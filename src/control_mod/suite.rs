use log::{info, warn};

use super::airspeed::AirspeedHoldController;
use super::attitude::AttitudeHoldController;
use super::controller::Autopilot;
use super::descent::DescentHoldController;
use super::mode::AutopilotState;
use crate::config::AutopilotConfig;
use crate::vehicle::{AdvisoryKind, AutopilotCommand, Severity, VehicleSnapshot};

/// The three custom autopilots plus the pilot state they share.
///
/// Call [`AutopilotSuite::step`] once per frame with a fresh snapshot and
/// apply the returned command to the vehicle.
#[derive(Debug, Clone)]
pub struct AutopilotSuite {
    pub state: AutopilotState,
    attitude: AttitudeHoldController,
    descent: DescentHoldController,
    airspeed: AirspeedHoldController,
    last_advisories: Vec<AdvisoryKind>,
}

impl AutopilotSuite {
    pub fn new(config: AutopilotConfig) -> Self {
        Self {
            state: AutopilotState::new(config.attitude),
            attitude: AttitudeHoldController::new(config.clone()),
            descent: DescentHoldController::new(config.clone()),
            airspeed: AirspeedHoldController::new(config),
            last_advisories: Vec::new(),
        }
    }

    pub fn attitude(&self) -> &AttitudeHoldController {
        &self.attitude
    }

    pub fn descent(&self) -> &DescentHoldController {
        &self.descent
    }

    pub fn step(&mut self, snap: &VehicleSnapshot) -> AutopilotCommand {
        if snap.is_unsafe() {
            return AutopilotCommand::default();
        }

        let mut cmd = self.attitude.step(snap, &self.state);
        cmd.merge(self.descent.step(snap, &self.state));
        cmd.merge(self.airspeed.step(snap, &self.state));

        for request in cmd.mode_requests.clone() {
            let advisories = self.state.apply(request, snap);
            cmd.advisories.extend(advisories);
        }
        if cmd.clear_descent_target {
            self.state.targets.descent_rate = 0.0;
        }

        self.log_new_advisories(&cmd);
        cmd
    }

    /// Log each advisory the first step it appears; a condition that
    /// persists step after step logs once.
    fn log_new_advisories(&mut self, cmd: &AutopilotCommand) {
        let current: Vec<AdvisoryKind> = cmd.advisories.iter().map(|a| a.kind).collect();
        for advisory in &cmd.advisories {
            if self.last_advisories.contains(&advisory.kind) {
                continue;
            }
            match advisory.severity {
                Severity::Warning => warn!("{}: {}", advisory.kind, advisory.message),
                Severity::Info => info!("{}: {}", advisory.kind, advisory.message),
            }
        }
        self.last_advisories = current;
    }

    pub fn reset(&mut self) {
        self.attitude.reset();
        self.descent.reset();
        self.airspeed.reset();
        self.last_advisories.clear();
    }
}

impl Default for AutopilotSuite {
    fn default() -> Self {
        Self::new(AutopilotConfig::default())
    }
}
