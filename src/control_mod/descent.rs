use log::{debug, info};

use super::controller::Autopilot;
use super::mode::{AutopilotMode, AutopilotState};
use super::rate::{rate_hold_thrust, throttle_for};
use crate::config::AutopilotConfig;
use crate::vehicle::{Advisory, AdvisoryKind, AutopilotCommand, ModeRequest, ThrusterGroup, VehicleSnapshot};

/// Auto-land switches from the braking curve to the flare below this, m.
pub const FLARE_ALTITUDE: f64 = 20.0;
/// Slowest descent the braking curve asks for above the flare, m/s.
pub const MIN_AUTO_DESCENT_RATE: f64 = -3.0;
/// Slowest descent inside the flare, m/s.
pub const FLARE_MIN_DESCENT_RATE: f64 = -0.20;
/// Final touchdown rate, m/s.
pub const TOUCHDOWN_DESCENT_RATE: f64 = -0.10;
pub const TOUCHDOWN_ALTITUDE: f64 = 0.25;

/// Fraction of the hover margin the braking curve may plan with.
const HOVER_ACC_SAFETY: f64 = 0.80;
const MIN_SAFE_HOVER_ACC: f64 = 1.0;
const ALTITUDE_PER_RATE: f64 = 7.0;
const RATE_PER_SAFE_ACC: f64 = 30.0;

/// Descent hold waits until bank and pitch are both inside this, deg.
const LEVEL_TOLERANCE: f64 = 5.0;
const MAX_REPORTED_MASS_PCT: f64 = 10_000.0;

/// Target vertical rate for auto-land at `altitude` (m, gear compressed).
///
/// Above the flare altitude this is the fastest descent from which the hover
/// engines, planning with 80% of `max_hover_acc`, can still brake to a stop at
/// the flare, capped to 1 m/s per 7 m of altitude or 30 s of braking. Below
/// it the rate scales down from `latched_rate` (the last rate flown above the
/// flare) to a -0.1 m/s touchdown.
pub fn auto_land_descent_rate(altitude: f64, max_hover_acc: f64, latched_rate: f64) -> f64 {
    if altitude >= FLARE_ALTITUDE {
        let safe_acc = (max_hover_acc * HOVER_ACC_SAFETY).max(MIN_SAFE_HOVER_ACC);
        let braking = -((altitude - FLARE_ALTITUDE) * 2.0 * safe_acc).sqrt();
        let cap = (-(altitude / ALTITUDE_PER_RATE)).max(-(safe_acc * RATE_PER_SAFE_ACC));
        MIN_AUTO_DESCENT_RATE.min(braking).max(cap)
    } else if altitude <= TOUCHDOWN_ALTITUDE {
        TOUCHDOWN_DESCENT_RATE
    } else {
        FLARE_MIN_DESCENT_RATE.min(altitude / FLARE_ALTITUDE * latched_rate)
    }
}

// ---------------------------------------------------------------------------
// Descent hold
// ---------------------------------------------------------------------------

/// Holds a vertical rate with the hover engines; optionally flies an
/// automatic landing. Attitude is levelled by the attitude hold loop.
#[derive(Debug, Clone)]
pub struct DescentHoldController {
    config: AutopilotConfig,
    prev_mode: Option<AutopilotMode>,
    latched_touchdown_rate: f64,
    suspended: bool,
}

impl DescentHoldController {
    pub fn new(config: AutopilotConfig) -> Self {
        Self {
            config,
            prev_mode: None,
            latched_touchdown_rate: MIN_AUTO_DESCENT_RATE,
            suspended: false,
        }
    }

    pub fn latched_touchdown_rate(&self) -> f64 {
        self.latched_touchdown_rate
    }

    fn hold(&mut self, snap: &VehicleSnapshot, state: &AutopilotState, cmd: &mut AutopilotCommand) {
        if !snap.hover_doors_open {
            cmd.advisories.push(Advisory::warning(AdvisoryKind::HoverDoorsClosed, "Hover doors are closed"));
            cmd.mode_requests.push(ModeRequest::DisengageCustom);
            return;
        }

        let suspended = self
            .config
            .suspension
            .attitude_suspended(snap.time_acceleration, snap.in_atmosphere);
        if suspended != self.suspended {
            debug!("descent hold {} at {}x", if suspended { "suspended" } else { "resumed" }, snap.time_acceleration);
            self.suspended = suspended;
        }
        cmd.telemetry.descent_suspended = suspended;
        if suspended {
            return;
        }

        if snap.bank.abs() > LEVEL_TOLERANCE || snap.pitch.abs() > LEVEL_TOLERANCE {
            return;
        }

        let targets = &state.targets;
        let altitude = snap.altitude;
        if altitude <= 0.0 && (targets.descent_rate < 0.0 || targets.auto_land) {
            info!("descent hold: touchdown at {:.2} m/s", snap.vertical_speed);
            cmd.thrusters.set(ThrusterGroup::Hover, 0.0);
            cmd.mode_requests.push(ModeRequest::DisengageCustom);
            cmd.clear_descent_target = true;
            cmd.advisories.push(Advisory::info(AdvisoryKind::Touchdown, "Touchdown; descent hold disengaged"));
            return;
        }

        let mass = snap.mass;
        let max_hover = snap.max_thrust.hover;
        let planet_acc = (snap.weight.y + snap.lift.y + snap.drag.y) / mass;
        let weight = -planet_acc * mass;
        if max_hover < weight {
            let pct = if max_hover > 0.0 {
                (weight / max_hover * 100.0).min(MAX_REPORTED_MASS_PCT)
            } else {
                MAX_REPORTED_MASS_PCT
            };
            cmd.advisories.push(Advisory::warning(
                AdvisoryKind::InsufficientHoverThrust,
                format!("Insufficient hover thrust to hover; ship mass {pct:.0}% of hover capacity"),
            ));
            if altitude <= 0.0 {
                return;
            }
        }

        let target_rate = if targets.auto_land {
            let max_hover_acc = (max_hover + snap.weight.y) / mass;
            let rate = auto_land_descent_rate(altitude, max_hover_acc, self.latched_touchdown_rate);
            if altitude >= FLARE_ALTITUDE {
                self.latched_touchdown_rate = rate;
            }
            rate
        } else {
            targets.descent_rate
        };
        cmd.telemetry.target_descent_rate = Some(target_rate);

        let current_rate = if snap.ground_contact { 0.0 } else { snap.vertical_speed };
        let gain = if targets.auto_land { 2.0 } else { 1.0 };
        let thrust = rate_hold_thrust(target_rate, current_rate, planet_acc, mass, gain);
        cmd.thrusters.set(ThrusterGroup::Hover, throttle_for(thrust, max_hover));
    }
}

impl Autopilot for DescentHoldController {
    fn step(&mut self, snap: &VehicleSnapshot, state: &AutopilotState) -> AutopilotCommand {
        let mut cmd = AutopilotCommand::default();
        cmd.telemetry.max_hover_acc = Some((snap.max_thrust.hover + snap.weight.y) / snap.mass);

        let mode = state.mode();
        let prev = self.prev_mode.replace(mode);
        if mode == AutopilotMode::DescentHold {
            if prev != Some(mode) {
                self.latched_touchdown_rate = MIN_AUTO_DESCENT_RATE;
                self.suspended = false;
            }
            if prev.is_some() {
                self.hold(snap, state, &mut cmd);
            }
        } else if prev == Some(AutopilotMode::DescentHold) {
            cmd.thrusters.set(ThrusterGroup::Hover, 0.0);
            cmd.thrusters.kill_attitude();
            cmd.clear_descent_target = true;
        }
        cmd
    }

    fn reset(&mut self) {
        self.prev_mode = None;
        self.latched_touchdown_rate = MIN_AUTO_DESCENT_RATE;
        self.suspended = false;
    }

    fn name(&self) -> &str {
        "descent hold"
    }
}
