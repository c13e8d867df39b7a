use strum::Display;

use super::thruster::ThrusterCommands;

// ---------------------------------------------------------------------------
// Advisories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AdvisoryKind {
    ModeEngaged,
    ModeDisengaged,
    TargetChanged,
    AttitudeLimited,
    InsufficientHoverThrust,
    InsufficientMainThrust,
    HoverDoorsClosed,
    RetroDoorsClosed,
    ColShiftOffline,
    ColShiftOnline,
    ApuAutostart,
    ApuFuelDepleted,
    Touchdown,
}

/// A message for the pilot. The host decides how to show it.
#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub severity: Severity,
    pub message: String,
}

impl Advisory {
    pub fn info(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self { kind, severity: Severity::Info, message: message.into() }
    }

    pub fn warning(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self { kind, severity: Severity::Warning, message: message.into() }
    }
}

// ---------------------------------------------------------------------------
// Per-step autopilot output
// ---------------------------------------------------------------------------

/// Mode changes a controller asks the suite to make after the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    DisengageCustom,
    DisengageAirspeedHold,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    pub attitude_suspended: bool,
    pub descent_suspended: bool,
    pub airspeed_suspended: bool,
    pub initial_bank_completed: bool,
    pub learning_thrust_frac: f64,
    pub max_hover_acc: Option<f64>,      // m/s^2
    pub max_main_acc: Option<f64>,       // m/s^2
    pub target_descent_rate: Option<f64>, // m/s
}

/// Everything the autopilots want done to the vehicle this step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutopilotCommand {
    pub thrusters: ThrusterCommands,
    pub col_shift: f64,               // m
    pub elevator_trim_delta: f64,
    pub neutral_flight_controls: bool,
    pub col_auto_mode: Option<bool>,  // Some(true) claim, Some(false) release
    pub col_recenter: bool,
    pub start_apu: bool,
    pub mode_requests: Vec<ModeRequest>,
    pub clear_descent_target: bool,
    pub advisories: Vec<Advisory>,
    pub telemetry: Telemetry,
}

impl AutopilotCommand {
    /// True when the command changes nothing on the vehicle.
    pub fn is_inert(&self) -> bool {
        self.thrusters.is_empty()
            && self.col_shift == 0.0
            && self.elevator_trim_delta == 0.0
            && !self.neutral_flight_controls
            && self.col_auto_mode.is_none()
            && !self.col_recenter
            && !self.start_apu
            && self.mode_requests.is_empty()
    }

    /// Fold a later controller's output into this one. Thruster writes and
    /// COL claims from `other` win; flags and lists accumulate.
    pub fn merge(&mut self, other: AutopilotCommand) {
        self.thrusters.merge(&other.thrusters);
        self.col_shift += other.col_shift;
        self.elevator_trim_delta += other.elevator_trim_delta;
        self.neutral_flight_controls |= other.neutral_flight_controls;
        if other.col_auto_mode.is_some() {
            self.col_auto_mode = other.col_auto_mode;
        }
        self.col_recenter |= other.col_recenter;
        self.start_apu |= other.start_apu;
        self.mode_requests.extend(other.mode_requests);
        self.clear_descent_target |= other.clear_descent_target;
        self.advisories.extend(other.advisories);

        let t = other.telemetry;
        self.telemetry.attitude_suspended |= t.attitude_suspended;
        self.telemetry.descent_suspended |= t.descent_suspended;
        self.telemetry.airspeed_suspended |= t.airspeed_suspended;
        self.telemetry.initial_bank_completed |= t.initial_bank_completed;
        if t.learning_thrust_frac != 0.0 {
            self.telemetry.learning_thrust_frac = t.learning_thrust_frac;
        }
        self.telemetry.max_hover_acc = t.max_hover_acc.or(self.telemetry.max_hover_acc);
        self.telemetry.max_main_acc = t.max_main_acc.or(self.telemetry.max_main_acc);
        self.telemetry.target_descent_rate =
            t.target_descent_rate.or(self.telemetry.target_descent_rate);
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Advisory> {
        self.advisories.iter().filter(|a| a.severity == Severity::Warning)
    }
}
