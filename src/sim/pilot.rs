use log::info;

use super::state::Systems;
use crate::control::{AirspeedAdjust, AutopilotMode, AutopilotSuite, DescentAdjust};
use crate::vehicle::{Advisory, VehicleSnapshot};

// ---------------------------------------------------------------------------
// Scripted pilot inputs
// ---------------------------------------------------------------------------

/// Something the pilot does at a point in a simulated flight.
#[derive(Debug, Clone, PartialEq)]
pub enum PilotAction {
    EngageAttitudeHold,
    EngageDescentHold,
    /// Engage descent hold (if needed) with auto-land on.
    AutoLand,
    DisengageCustom,
    /// Set the attitude targets; applied through the usual target limits.
    SetAttitude { pitch_or_aoa: f64, bank: f64, hold_aoa: bool },
    SyncAttitude,
    AdjustBank { incrementing: bool },
    SetDescentRate(f64),
    /// `Some(target)` engages airspeed hold, `None` disengages it.
    AirspeedHold(Option<f64>),
    ToggleAirspeedHold { hold_current: bool },
    /// Pilot trim of the centre of lift, m. Refused while an autopilot owns it.
    ManualColShift(f64),
    KillAll,
    TimeAcceleration(f64),
    HoverDoors { open: bool },
    ApuShutdown,
    IncapacitateCrew,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PilotEvent {
    pub time: f64, // s
    pub action: PilotAction,
}

impl PilotEvent {
    pub fn new(time: f64, action: PilotAction) -> Self {
        Self { time, action }
    }
}

/// Carry out one pilot action. Returns the time acceleration to fly at
/// from now on.
pub fn apply_action(
    action: &PilotAction,
    suite: &mut AutopilotSuite,
    snap: &VehicleSnapshot,
    systems: &mut Systems,
    time_acceleration: f64,
) -> f64 {
    info!("t={:.2}s pilot: {action:?}", snap.sim_time);
    let state = &mut suite.state;
    let advisories: Vec<Advisory> = match action {
        PilotAction::EngageAttitudeHold => state.set_custom_mode(AutopilotMode::AttitudeHold, snap, false),
        PilotAction::EngageDescentHold => state.set_custom_mode(AutopilotMode::DescentHold, snap, false),
        PilotAction::AutoLand => {
            let mut out = state.set_custom_mode(AutopilotMode::DescentHold, snap, false);
            if state.mode() == AutopilotMode::DescentHold && !state.targets.auto_land {
                out.push(state.adjust_descent(DescentAdjust::ToggleAutoLand));
            }
            out
        }
        PilotAction::DisengageCustom => state.set_custom_mode(AutopilotMode::Off, snap, false),
        PilotAction::SetAttitude { pitch_or_aoa, bank, hold_aoa } => {
            state.targets.hold_aoa = *hold_aoa;
            state.targets.pitch_or_aoa = *pitch_or_aoa;
            state.targets.bank = *bank;
            let engaged = state.attitude_hold_engaged();
            let limits = state.limits;
            state.targets.limit_pitch_and_bank(&limits, false, engaged).into_iter().collect()
        }
        PilotAction::SyncAttitude => vec![state.sync_attitude_hold(snap, false)],
        PilotAction::AdjustBank { incrementing } => state.adjust_bank(*incrementing),
        PilotAction::SetDescentRate(rate) => {
            let delta = rate - state.targets.descent_rate;
            vec![state.adjust_descent(DescentAdjust::Adjust(delta))]
        }
        PilotAction::AirspeedHold(Some(target)) => {
            let mut out = vec![state.adjust_airspeed(AirspeedAdjust::Reset, snap.airspeed)];
            out.push(state.adjust_airspeed(AirspeedAdjust::Adjust(*target), snap.airspeed));
            out.extend(state.set_airspeed_hold(true, snap.airspeed));
            out
        }
        PilotAction::AirspeedHold(None) => state.set_airspeed_hold(false, snap.airspeed),
        PilotAction::ToggleAirspeedHold { hold_current } => state.toggle_airspeed_hold(*hold_current, snap.airspeed),
        PilotAction::ManualColShift(delta) => {
            let powered = systems.hydraulic_power();
            if !systems.col.manual_shift(*delta, powered) {
                info!("COL shift refused (auto mode {}, hydraulics {})", systems.col.auto_mode, powered);
            }
            Vec::new()
        }
        PilotAction::KillAll => state.kill_all(snap),
        PilotAction::TimeAcceleration(factor) => return *factor,
        PilotAction::HoverDoors { open } => {
            systems.hover_doors_open = *open;
            Vec::new()
        }
        PilotAction::ApuShutdown => {
            systems.apu_online = false;
            systems.apu_start_timer = None;
            Vec::new()
        }
        PilotAction::IncapacitateCrew => {
            systems.crew_incapacitated = true;
            Vec::new()
        }
    };
    for a in advisories {
        info!("{}: {}", a.kind, a.message);
    }
    time_acceleration
}
