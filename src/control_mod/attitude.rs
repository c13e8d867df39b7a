use log::{debug, info};

use super::controller::Autopilot;
use super::mode::{AutopilotMode, AutopilotState};
use super::rate::{kill_rotation, orient_axis, Axis, RateContext, RateController, RateRequest};
use crate::config::AutopilotConfig;
use crate::vehicle::{Advisory, AdvisoryKind, AutopilotCommand, ThrusterGroup, VehicleSnapshot};

/// Dynamic pressure above which a deflected rudder counts as pilot yaw
/// input, Pa.
pub const RUDDER_ACTIVE_DYNAMIC_PRESSURE: f64 = 5_000.0;

/// No COL power warning this early in a session, s.
const POWER_WARNING_GRACE: f64 = 4.0;

/// Pick the equivalent of `target` (itself, or +/-360 from it) closest to
/// `current`, so an inverted ship rolls the short way across +/-180.
pub fn wrap_bank_target(target: f64, current: f64) -> f64 {
    let direct = (target - current).abs();
    let past_right = (target - current - 360.0).abs();
    let past_left = (target - current + 360.0).abs();
    if past_right < direct && past_right < past_left {
        target - 360.0
    } else if past_left < direct && past_left < past_right {
        target + 360.0
    } else {
        target
    }
}

/// What the pilot has been told about hydraulic power for COL shifting
/// during the current engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColPowerState {
    #[default]
    NoWarningYet,
    AutostartRequested,
    WarningIssued,
    PoweredUpNotified,
}

// ---------------------------------------------------------------------------
// Attitude hold
// ---------------------------------------------------------------------------

/// Holds bank and pitch (or AOA) with the RCS, trimming with the centre of
/// lift in an atmosphere. Also runs the attitude loop for descent hold,
/// with level targets.
#[derive(Debug, Clone)]
pub struct AttitudeHoldController {
    config: AutopilotConfig,
    rate: RateController,
    prev_mode: Option<AutopilotMode>,
    initial_bank_completed: bool,
    last_target_inverted: Option<bool>,
    last_yaw_levels: Option<[f64; 2]>,
    power: ColPowerState,
    apu_ran_once: bool,
    suspended: bool,
}

impl AttitudeHoldController {
    pub fn new(config: AutopilotConfig) -> Self {
        Self {
            rate: RateController::new(config.rate, config.col),
            config,
            prev_mode: None,
            initial_bank_completed: false,
            last_target_inverted: None,
            last_yaw_levels: None,
            power: ColPowerState::NoWarningYet,
            apu_ran_once: false,
            suspended: false,
        }
    }

    pub fn initial_bank_completed(&self) -> bool {
        self.initial_bank_completed
    }

    pub fn power_state(&self) -> ColPowerState {
        self.power
    }

    fn clear_engagement_memory(&mut self) {
        self.rate.reset_learning();
        self.last_yaw_levels = None;
        self.power = ColPowerState::NoWarningYet;
        self.apu_ran_once = false;
        self.initial_bank_completed = false;
        self.last_target_inverted = None;
        self.suspended = false;
    }

    /// Let go of the vehicle: RCS off, COL handed back (and recentred if
    /// powered), all per-engagement memory dropped.
    fn release(&mut self, snap: &VehicleSnapshot, cmd: &mut AutopilotCommand) {
        cmd.thrusters.kill_attitude();
        self.clear_engagement_memory();
        cmd.col_auto_mode = Some(false);
        if snap.hydraulic_power && snap.center_of_lift != self.config.col.neutral {
            cmd.col_recenter = true;
        }
    }

    fn hold(&mut self, snap: &VehicleSnapshot, state: &AutopilotState, cmd: &mut AutopilotCommand) {
        let cfg = &self.config;
        if !cfg.enable_manual_flight_controls {
            cmd.neutral_flight_controls = true;
        }
        if !snap.in_atmosphere && snap.center_of_lift != cfg.col.neutral {
            cmd.col_recenter = true;
        }

        let suspended = cfg.suspension.attitude_suspended(snap.time_acceleration, snap.in_atmosphere);
        if suspended != self.suspended {
            debug!("attitude hold {} at {}x", if suspended { "suspended" } else { "resumed" }, snap.time_acceleration);
            self.suspended = suspended;
        }
        cmd.telemetry.attitude_suspended = suspended;
        if suspended {
            return;
        }

        let descent = state.mode() == AutopilotMode::DescentHold;
        let targets = &state.targets;
        let gains = cfg.rate;
        let w = snap.angular_velocity;
        let inverted = snap.is_inverted();

        // bank
        let set_bank = if descent { 0.0 } else { targets.bank };
        let target_inverted = set_bank.abs() > 90.0;
        if self.last_target_inverted.is_some_and(|was| was != target_inverted) {
            self.initial_bank_completed = false;
        }
        self.last_target_inverted = Some(target_inverted);

        let target_bank = if inverted { wrap_bank_target(set_bank, snap.bank) } else { set_bank };
        let ctx = RateContext {
            sim_dt: snap.sim_dt,
            time_acceleration: snap.time_acceleration,
            in_atmosphere: snap.in_atmosphere,
            descent_hold: descent,
            initial_bank_completed: self.initial_bank_completed,
        };
        self.rate.fire(
            &RateRequest {
                axis: Axis::Roll,
                target: target_bank,
                current: snap.bank,
                drive: orient_axis(Axis::Roll, ThrusterGroup::BankRight, ThrusterGroup::BankLeft, w.z, inverted),
                rate_limit: gains.angular_rate_limit,
                reverse_rotation: false,
                inverted,
                master_thrust_frac: 1.0,
            },
            &ctx,
            &mut cmd.thrusters,
        );
        if !self.initial_bank_completed && (snap.bank - target_bank).abs() <= gains.bank_capture_tolerance {
            debug!("initial bank captured at {:.1}°", snap.bank);
            self.initial_bank_completed = true;
        }

        // pitch waits for the bank so the ship does not pitch while rolling
        if self.initial_bank_completed {
            let ctx = RateContext { initial_bank_completed: true, ..ctx };
            let drive = orient_axis(Axis::Pitch, ThrusterGroup::PitchUp, ThrusterGroup::PitchDown, w.x, inverted);
            let pitch_request = |target: f64, current: f64, reverse_rotation: bool| RateRequest {
                axis: Axis::Pitch,
                target,
                current,
                drive,
                rate_limit: gains.angular_rate_limit,
                reverse_rotation,
                inverted,
                master_thrust_frac: 1.0,
            };

            let req = if targets.hold_aoa && !descent {
                let limit = cfg.attitude.absolute_pitch_or_aoa;
                let pitch_cap = if targets.pitch_or_aoa.abs() >= snap.aoa.abs() && snap.pitch.abs() > limit {
                    Some(limit.copysign(snap.pitch))
                } else {
                    None
                };
                match pitch_cap {
                    Some(p) => pitch_request(p, snap.pitch, true),
                    None => pitch_request(targets.pitch_or_aoa, snap.aoa, !inverted),
                }
            } else {
                let set_pitch = if descent { 0.0 } else { targets.pitch_or_aoa };
                pitch_request(set_pitch, snap.pitch, true)
            };
            let col_shift = self.rate.fire(&req, &ctx, &mut cmd.thrusters);
            self.apply_col_shift(col_shift / snap.time_acceleration.max(f64::EPSILON), snap, cmd);
        }

        // yaw: hold still unless the pilot is yawing
        let yaw_now = [
            snap.thruster_levels.get(ThrusterGroup::YawLeft),
            snap.thruster_levels.get(ThrusterGroup::YawRight),
        ];
        let pilot_yaw = self.last_yaw_levels.is_some_and(|last| last != yaw_now);
        let rudder_active = snap.rudder != 0.0 && snap.dynamic_pressure >= RUDDER_ACTIVE_DYNAMIC_PRESSURE;
        if !descent && !pilot_yaw && !rudder_active {
            self.last_yaw_levels = Some(kill_rotation(
                w.y,
                ThrusterGroup::YawLeft,
                ThrusterGroup::YawRight,
                snap.sim_dt,
                &gains,
                &mut cmd.thrusters,
            ));
        }

        cmd.telemetry.initial_bank_completed = self.initial_bank_completed;
        cmd.telemetry.learning_thrust_frac = self.rate.learning().thrust_frac;
    }

    fn apply_col_shift(&mut self, shift: f64, snap: &VehicleSnapshot, cmd: &mut AutopilotCommand) {
        if shift == 0.0 {
            return;
        }
        if !snap.hydraulic_power {
            self.col_power_offline(snap, cmd);
            return;
        }

        self.apu_ran_once = true;
        if matches!(self.power, ColPowerState::WarningIssued | ColPowerState::AutostartRequested) {
            cmd.advisories.push(Advisory::info(
                AdvisoryKind::ColShiftOnline,
                "APU power-up complete; centre of lift shift online",
            ));
            self.power = ColPowerState::PoweredUpNotified;
        }
        if snap.ground_contact {
            return;
        }

        let col = &self.config.col;
        cmd.col_shift = shift;
        if snap.elevators_operational {
            let offset = col.clamp_position(snap.center_of_lift + shift) - col.neutral;
            let portion = (offset.abs() / col.trim_dead_zone).min(1.0);
            let step = col.trim_speed * snap.sim_dt * portion;
            cmd.elevator_trim_delta = if offset < 0.0 { -step } else { step };
        }
    }

    fn col_power_offline(&mut self, snap: &VehicleSnapshot, cmd: &mut AutopilotCommand) {
        if snap.sim_time < POWER_WARNING_GRACE || snap.apu_starting {
            return;
        }
        match self.power {
            ColPowerState::WarningIssued => {}
            ColPowerState::AutostartRequested => {
                cmd.advisories.push(Advisory::warning(
                    AdvisoryKind::ColShiftOffline,
                    "APU offline; cannot shift the centre of lift",
                ));
                self.power = ColPowerState::WarningIssued;
            }
            ColPowerState::NoWarningYet | ColPowerState::PoweredUpNotified => {
                if self.config.apu_autostart_for_cog_shift && !self.apu_ran_once {
                    if snap.apu_fuel <= 0.0 {
                        cmd.advisories.push(Advisory::warning(
                            AdvisoryKind::ApuFuelDepleted,
                            "APU fuel depleted; centre of lift shift offline",
                        ));
                        self.power = ColPowerState::WarningIssued;
                    } else {
                        info!("APU autostart for centre of lift shift");
                        cmd.advisories.push(Advisory::info(AdvisoryKind::ApuAutostart, "APU autostart initiated"));
                        cmd.start_apu = true;
                        self.power = ColPowerState::AutostartRequested;
                    }
                } else {
                    cmd.advisories.push(Advisory::warning(
                        AdvisoryKind::ColShiftOffline,
                        "APU offline; cannot shift the centre of lift",
                    ));
                    self.power = ColPowerState::WarningIssued;
                }
            }
        }
    }
}

impl Autopilot for AttitudeHoldController {
    fn step(&mut self, snap: &VehicleSnapshot, state: &AutopilotState) -> AutopilotCommand {
        let mut cmd = AutopilotCommand::default();
        let mode = state.mode();
        let prev = self.prev_mode.replace(mode);

        // switching straight from attitude to descent hold starts over
        if mode == AutopilotMode::DescentHold && prev == Some(AutopilotMode::AttitudeHold) {
            self.release(snap, &mut cmd);
        }

        if mode.holds_attitude() {
            if prev != Some(mode) {
                self.clear_engagement_memory();
            }
            cmd.col_auto_mode = Some(true);
            if prev.is_some() {
                self.hold(snap, state, &mut cmd);
            }
        } else if prev.is_some_and(AutopilotMode::holds_attitude) {
            self.release(snap, &mut cmd);
        }
        cmd
    }

    fn reset(&mut self) {
        self.clear_engagement_memory();
        self.prev_mode = None;
    }

    fn name(&self) -> &str {
        "attitude hold"
    }
}
