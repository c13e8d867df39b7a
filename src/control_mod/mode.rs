use log::info;
use strum::Display;

use super::targets::{AirspeedAdjust, AutopilotTargets, DescentAdjust};
use crate::config::AttitudeLimits;
use crate::vehicle::{Advisory, AdvisoryKind, ModeRequest, VehicleSnapshot};

/// Custom attitude/descent autopilot selection. Airspeed hold is tracked
/// separately and can run alongside either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum AutopilotMode {
    #[default]
    #[strum(to_string = "off")]
    Off,
    #[strum(to_string = "attitude hold")]
    AttitudeHold,
    #[strum(to_string = "descent hold")]
    DescentHold,
}

impl AutopilotMode {
    /// Both custom modes run the attitude loop.
    pub fn holds_attitude(self) -> bool {
        self != AutopilotMode::Off
    }
}

// ---------------------------------------------------------------------------
// Pilot-facing autopilot state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AutopilotState {
    mode: AutopilotMode,
    airspeed_hold: bool,
    pub targets: AutopilotTargets,
    pub limits: AttitudeLimits,
}

impl AutopilotState {
    pub fn new(limits: AttitudeLimits) -> Self {
        Self {
            mode: AutopilotMode::Off,
            airspeed_hold: false,
            targets: AutopilotTargets::default(),
            limits,
        }
    }

    pub fn mode(&self) -> AutopilotMode {
        self.mode
    }

    pub fn airspeed_hold_engaged(&self) -> bool {
        self.airspeed_hold
    }

    pub fn attitude_hold_engaged(&self) -> bool {
        self.mode == AutopilotMode::AttitudeHold
    }

    /// Switch the custom autopilot. Refuses descent hold with the hover
    /// doors shut unless `force` is set, and turns everything off instead.
    pub fn set_custom_mode(&mut self, mode: AutopilotMode, snap: &VehicleSnapshot, force: bool) -> Vec<Advisory> {
        let mut out = Vec::new();
        if snap.crashed {
            return out;
        }
        if !force && mode == AutopilotMode::DescentHold && !snap.hover_doors_open {
            out.push(Advisory::warning(
                AdvisoryKind::HoverDoorsClosed,
                "Hover doors are closed; cannot engage descent hold",
            ));
            out.extend(self.set_custom_mode(AutopilotMode::Off, snap, false));
            self.targets.auto_land = false;
            return out;
        }

        let old = self.mode;
        if old == mode {
            return out;
        }
        self.mode = mode;
        let subject = if mode == AutopilotMode::Off { old } else { mode };
        info!("custom autopilot {old} -> {mode}");

        if subject == AutopilotMode::DescentHold {
            if mode == AutopilotMode::DescentHold && snap.ground_contact && self.targets.descent_rate < 0.1 {
                self.targets.descent_rate = 0.1;
            }
            self.targets.auto_land = false;
        }

        if mode == AutopilotMode::Off {
            out.push(Advisory::info(AdvisoryKind::ModeDisengaged, format!("{subject} disengaged")));
        } else {
            let detail = match mode {
                AutopilotMode::AttitudeHold => format!(
                    "hold {}={:+.1}°, bank={:+.1}°",
                    self.targets.axis_name(),
                    self.targets.pitch_or_aoa,
                    self.targets.bank
                ),
                _ => format!("hold rate={:+.1} m/s", self.targets.descent_rate),
            };
            out.push(Advisory::info(AdvisoryKind::ModeEngaged, format!("{mode} engaged, {detail}")));
        }
        out
    }

    pub fn toggle_attitude_hold(&mut self, snap: &VehicleSnapshot) -> Vec<Advisory> {
        let next = if self.mode == AutopilotMode::AttitudeHold {
            AutopilotMode::Off
        } else {
            AutopilotMode::AttitudeHold
        };
        self.set_custom_mode(next, snap, false)
    }

    pub fn toggle_descent_hold(&mut self, snap: &VehicleSnapshot) -> Vec<Advisory> {
        let next = if self.mode == AutopilotMode::DescentHold {
            AutopilotMode::Off
        } else {
            AutopilotMode::DescentHold
        };
        self.set_custom_mode(next, snap, false)
    }

    /// Engaging with no target set holds the current airspeed.
    pub fn set_airspeed_hold(&mut self, on: bool, current_airspeed: f64) -> Vec<Advisory> {
        if self.airspeed_hold == on {
            return Vec::new();
        }
        self.airspeed_hold = on;
        info!("airspeed hold {}", if on { "engaged" } else { "disengaged" });
        if !on {
            return vec![Advisory::info(AdvisoryKind::ModeDisengaged, "Airspeed hold disengaged")];
        }
        if self.targets.airspeed == 0.0 {
            self.targets.airspeed = current_airspeed;
        }
        self.targets.airspeed = self.targets.airspeed.max(0.0);
        vec![Advisory::info(
            AdvisoryKind::ModeEngaged,
            format!("Airspeed hold engaged, hold {:.1} m/s", self.targets.airspeed),
        )]
    }

    pub fn toggle_airspeed_hold(&mut self, hold_current: bool, current_airspeed: f64) -> Vec<Advisory> {
        if self.airspeed_hold {
            return self.set_airspeed_hold(false, current_airspeed);
        }
        let mut out = Vec::new();
        if hold_current {
            out.push(self.targets.adjust_airspeed(AirspeedAdjust::HoldCurrent, current_airspeed));
        }
        out.extend(self.set_airspeed_hold(true, current_airspeed));
        out
    }

    /// Flip between holding AOA and holding pitch. Resyncs to the current
    /// attitude when attitude hold is flying so the nose does not jump.
    pub fn toggle_hold_aoa(&mut self, snap: &VehicleSnapshot) -> Advisory {
        self.targets.hold_aoa = !self.targets.hold_aoa;
        if self.attitude_hold_engaged() {
            self.targets.sync_to_attitude(snap.pitch, snap.aoa, snap.bank, false, &self.limits)
        } else {
            Advisory::info(
                AdvisoryKind::TargetChanged,
                format!(
                    "Attitude hold: holding {:+.1}° {}",
                    self.targets.pitch_or_aoa,
                    self.targets.axis_name()
                ),
            )
        }
    }

    pub fn sync_attitude_hold(&mut self, snap: &VehicleSnapshot, force_pitch_mode: bool) -> Advisory {
        self.targets.sync_to_attitude(snap.pitch, snap.aoa, snap.bank, force_pitch_mode, &self.limits)
    }

    pub fn adjust_pitch(&mut self, delta: f64) -> Vec<Advisory> {
        let engaged = self.attitude_hold_engaged();
        self.targets.adjust_pitch(delta, &self.limits, engaged)
    }

    pub fn adjust_bank(&mut self, incrementing: bool) -> Vec<Advisory> {
        let engaged = self.attitude_hold_engaged();
        self.targets.adjust_bank(incrementing, &self.limits, engaged)
    }

    pub fn adjust_descent(&mut self, adjust: DescentAdjust) -> Advisory {
        self.targets.adjust_descent(adjust)
    }

    pub fn adjust_airspeed(&mut self, adjust: AirspeedAdjust, current_airspeed: f64) -> Advisory {
        self.targets.adjust_airspeed(adjust, current_airspeed)
    }

    pub fn kill_all(&mut self, snap: &VehicleSnapshot) -> Vec<Advisory> {
        let mut out = self.set_custom_mode(AutopilotMode::Off, snap, true);
        out.extend(self.set_airspeed_hold(false, snap.airspeed));
        out
    }

    /// Carry out a request raised by a controller during a step.
    pub fn apply(&mut self, request: ModeRequest, snap: &VehicleSnapshot) -> Vec<Advisory> {
        match request {
            ModeRequest::DisengageCustom => self.set_custom_mode(AutopilotMode::Off, snap, true),
            ModeRequest::DisengageAirspeedHold => self.set_airspeed_hold(false, snap.airspeed),
        }
    }
}

impl Default for AutopilotState {
    fn default() -> Self {
        Self::new(AttitudeLimits::default())
    }
}
