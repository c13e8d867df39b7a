use log::{debug, info};

use super::controller::Autopilot;
use super::mode::AutopilotState;
use super::rate::{rate_hold_thrust, throttle_for};
use crate::config::AutopilotConfig;
use crate::vehicle::{Advisory, AdvisoryKind, AutopilotCommand, ModeRequest, ThrusterGroup, VehicleSnapshot};

/// Nothing runs before this much sim time has passed, s.
const STARTUP_DELAY: f64 = 0.10;
/// Below this gear-compressed altitude the wheels are on the runway, m.
const WHEELS_DOWN_ALTITUDE: f64 = 0.1;
/// Retros stay off above this dynamic pressure, Pa.
const RETRO_MAX_DYNAMIC_PRESSURE: f64 = 5_000.0;

/// Holds airspeed with the main engines (and optionally the retros).
#[derive(Debug, Clone)]
pub struct AirspeedHoldController {
    config: AutopilotConfig,
    prev_engaged: Option<bool>,
    prev_ground_contact: Option<bool>,
    suspended: bool,
}

impl AirspeedHoldController {
    pub fn new(config: AutopilotConfig) -> Self {
        Self { config, prev_engaged: None, prev_ground_contact: None, suspended: false }
    }

    /// Forward force (N) acting on the ship apart from thrust. On the
    /// runway the net force is used so wheel drag is included.
    fn resistive_force(snap: &VehicleSnapshot) -> f64 {
        if snap.altitude <= WHEELS_DOWN_ALTITUDE {
            snap.net_force.z - snap.thrust.z
        } else {
            snap.weight.z + snap.lift.z + snap.drag.z
        }
    }

    fn hold(&mut self, snap: &VehicleSnapshot, state: &AutopilotState, resistive: f64, cmd: &mut AutopilotCommand) {
        let suspended = self.config.suspension.airspeed_suspended(snap.time_acceleration);
        if suspended != self.suspended {
            debug!("airspeed hold {} at {}x", if suspended { "suspended" } else { "resumed" }, snap.time_acceleration);
            self.suspended = suspended;
        }
        cmd.telemetry.airspeed_suspended = suspended;
        if suspended {
            return;
        }

        let mass = snap.mass;
        let max_main = snap.max_thrust.main;
        let target = state.targets.airspeed;
        let mut planet_acc = resistive / mass;

        if max_main < -resistive && snap.airspeed < target {
            cmd.advisories.push(Advisory::warning(
                AdvisoryKind::InsufficientMainThrust,
                "Insufficient main thrust to accelerate further at this attitude",
            ));
        }

        // parked with a zero target: do not fight wheel drag into a creep
        if snap.ground_contact && target == 0.0 && planet_acc < 0.0 {
            planet_acc = 0.0;
        }

        let thrust = rate_hold_thrust(target, snap.airspeed, planet_acc, mass, 1.0);
        cmd.thrusters.set(ThrusterGroup::Main, throttle_for(thrust, max_main));

        let retro = if self.config.airspeed_retro_assist {
            self.retro_level(snap, thrust, cmd)
        } else {
            0.0
        };
        cmd.thrusters.set(ThrusterGroup::Retro, retro);
    }

    fn retro_level(&self, snap: &VehicleSnapshot, thrust: f64, cmd: &mut AutopilotCommand) -> f64 {
        let level = throttle_for(-thrust, snap.max_thrust.retro);
        if level == 0.0 || snap.dynamic_pressure > RETRO_MAX_DYNAMIC_PRESSURE {
            return 0.0;
        }
        if !snap.retro_doors_open {
            cmd.advisories.push(Advisory::warning(
                AdvisoryKind::RetroDoorsClosed,
                "Airspeed hold: open the retro doors",
            ));
            return 0.0;
        }
        level
    }
}

impl Autopilot for AirspeedHoldController {
    fn step(&mut self, snap: &VehicleSnapshot, state: &AutopilotState) -> AutopilotCommand {
        let mut cmd = AutopilotCommand::default();
        if snap.sim_time < STARTUP_DELAY {
            return cmd;
        }

        let resistive = Self::resistive_force(snap);
        cmd.telemetry.max_main_acc = Some((snap.max_thrust.main + resistive) / snap.mass);

        let engaged = state.airspeed_hold_engaged();
        let prev = self.prev_engaged.replace(engaged);
        let touched_down = self.prev_ground_contact.replace(snap.ground_contact) == Some(false) && snap.ground_contact;
        if engaged && touched_down {
            // wheels down from flight: engines off, hold dropped
            info!("airspeed hold: gear touchdown at {:.1} m/s", snap.airspeed);
            cmd.thrusters.set(ThrusterGroup::Main, 0.0);
            cmd.thrusters.set(ThrusterGroup::Retro, 0.0);
            cmd.mode_requests.push(ModeRequest::DisengageAirspeedHold);
        } else if engaged {
            if prev == Some(false) {
                self.suspended = false;
            }
            if prev.is_some() {
                self.hold(snap, state, resistive, &mut cmd);
            }
        } else if prev == Some(true) {
            cmd.thrusters.set(ThrusterGroup::Main, 0.0);
            cmd.thrusters.set(ThrusterGroup::Retro, 0.0);
        }
        cmd
    }

    fn reset(&mut self) {
        self.prev_engaged = None;
        self.prev_ground_contact = None;
        self.suspended = false;
    }

    fn name(&self) -> &str {
        "airspeed hold"
    }
}
