use crate::config::{ColLimits, RateGains};
use crate::vehicle::{ThrusterCommands, ThrusterGroup};

// ---------------------------------------------------------------------------
// Axis orientation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Pitch,
    Yaw,
    Roll,
}

/// The thruster pair that drives one axis, and that axis' angular rate as
/// seen from the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDrive {
    pub positive: ThrusterGroup,
    pub negative: ThrusterGroup,
    pub angular_velocity: f64, // deg/s
}

/// Flying inverted reverses pitch and yaw relative to the horizon, so the
/// pair is swapped and the rate negated. Roll is unaffected.
pub fn orient_axis(
    axis: Axis,
    positive: ThrusterGroup,
    negative: ThrusterGroup,
    angular_velocity: f64,
    inverted: bool,
) -> AxisDrive {
    if inverted && axis != Axis::Roll {
        AxisDrive { positive: negative, negative: positive, angular_velocity: -angular_velocity }
    } else {
        AxisDrive { positive, negative, angular_velocity }
    }
}

// ---------------------------------------------------------------------------
// Pitch thrust learning
// ---------------------------------------------------------------------------

/// Extra positive-pitch thrust learned against a steady nose-down moment,
/// e.g. aerodynamic pitch-down during reentry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PitchLearningState {
    pub thrust_frac: f64,
    pub last_step: f64,
    pub reverse_last_step: bool,
}

impl PitchLearningState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Next fraction if the positive jets fire with `step` added, undoing
    /// the previous step first when a rollback is pending.
    fn candidate(&self, step: f64) -> f64 {
        let base = if self.reverse_last_step {
            self.thrust_frac - self.last_step
        } else {
            self.thrust_frac
        };
        (base + step).clamp(0.0, 1.0)
    }

    fn latch(&mut self, frac: f64, step: f64) {
        self.thrust_frac = frac;
        self.last_step = step;
        self.reverse_last_step = false;
    }
}

// ---------------------------------------------------------------------------
// Rate controller
// ---------------------------------------------------------------------------

/// One axis request for [`RateController::fire`].
#[derive(Debug, Clone, Copy)]
pub struct RateRequest {
    pub axis: Axis,
    pub target: f64,           // deg
    pub current: f64,          // deg
    pub drive: AxisDrive,
    pub rate_limit: f64,       // deg/s
    pub reverse_rotation: bool,
    pub inverted: bool,
    pub master_thrust_frac: f64,
}

/// Per-step facts the rate controller needs besides the request itself.
#[derive(Debug, Clone, Copy)]
pub struct RateContext {
    pub sim_dt: f64,
    pub time_acceleration: f64,
    pub in_atmosphere: bool,
    pub descent_hold: bool,
    pub initial_bank_completed: bool,
}

#[derive(Debug, Clone)]
pub struct RateController {
    gains: RateGains,
    col: ColLimits,
    learning: PitchLearningState,
}

impl RateController {
    pub fn new(gains: RateGains, col: ColLimits) -> Self {
        Self { gains, col, learning: PitchLearningState::default() }
    }

    pub fn learning(&self) -> &PitchLearningState {
        &self.learning
    }

    pub fn reset_learning(&mut self) {
        self.learning.reset();
    }

    /// Fire one axis' thruster pair to drive `current` toward `target`.
    ///
    /// At most one group of the pair ends up non-zero. Returns the
    /// centre-of-lift shift (m) this firing asks for, which is only ever
    /// non-zero on the pitch axis in an atmosphere.
    pub fn fire(&mut self, req: &RateRequest, ctx: &RateContext, out: &mut ThrusterCommands) -> f64 {
        let g = &self.gains;
        let drive = req.drive;

        let delta = req.target - req.current;
        if delta.abs() <= g.target_dead_zone {
            out.zero_pair(drive.positive, drive.negative);
            return 0.0;
        }

        let mut target_rate = delta * g.delta_to_rate_frac;
        if !ctx.initial_bank_completed {
            // get the initial roll going briskly even for small errors
            let floor = g.min_initial_roll_rate;
            target_rate = if target_rate < 0.0 { target_rate.min(-floor) } else { target_rate.max(floor) };
        }
        if !req.reverse_rotation {
            target_rate = -target_rate;
        }
        target_rate = target_rate.clamp(-req.rate_limit, req.rate_limit);

        let rate = drive.angular_velocity;
        let rate_error = (target_rate - rate).abs();
        let band = if ctx.descent_hold { g.descent_closing_rate_band } else { g.closing_rate_band };
        let mut level = req.master_thrust_frac / g.step_divisor(ctx.sim_dt);
        level *= (rate_error / band).min(1.0);

        let pitch_in_atmosphere = ctx.in_atmosphere && req.axis == Axis::Pitch;
        let mut learned = (0.0, 0.0);
        if pitch_in_atmosphere && !ctx.descent_hold && req.current >= 0.0 && level < 1.0 {
            let step = rate_error / g.learning_step_divisor / ctx.time_acceleration.max(f64::EPSILON);
            if target_rate >= rate {
                let frac = self.learning.candidate(step);
                level += frac;
                learned = (frac, step);
            } else {
                self.learning.reverse_last_step = true;
            }
        }

        let fired = if rate > target_rate + g.rate_dead_zone {
            Some(drive.negative)
        } else if rate < target_rate - g.rate_dead_zone {
            Some(drive.positive)
        } else {
            None
        };
        match fired {
            Some(group) => out.set_pair(group, level, group_partner(group, &drive)),
            None => out.zero_pair(drive.positive, drive.negative),
        }

        if req.axis == Axis::Pitch && fired == Some(drive.positive) {
            self.learning.latch(learned.0, learned.1);
        }

        if !pitch_in_atmosphere || level <= self.col.thrust_dead_zone {
            return 0.0;
        }
        let Some(group) = fired else {
            return 0.0;
        };
        let frac = (level * self.col.thrust_to_shift_ratio).min(1.0);
        let mut shift = self.col.max_shift_rate * ctx.sim_dt * frac;
        if group == drive.negative {
            shift = -shift;
        }
        if req.inverted {
            shift = -shift;
        }
        shift
    }
}

fn group_partner(group: ThrusterGroup, drive: &AxisDrive) -> ThrusterGroup {
    if group == drive.positive { drive.negative } else { drive.positive }
}

// ---------------------------------------------------------------------------
// Rotation kill
// ---------------------------------------------------------------------------

/// Null the rotation on one axis. Returns the levels written as
/// `[positive, negative]`.
pub fn kill_rotation(
    angular_velocity: f64,
    positive: ThrusterGroup,
    negative: ThrusterGroup,
    sim_dt: f64,
    gains: &RateGains,
    out: &mut ThrusterCommands,
) -> [f64; 2] {
    let level = (1.0 / gains.step_divisor(sim_dt)) * (angular_velocity.abs() / gains.kill_rate_band).min(1.0);
    let dz = gains.kill_rate_dead_zone;
    let levels = if angular_velocity > dz {
        [0.0, level]
    } else if angular_velocity < -dz {
        [level, 0.0]
    } else {
        [0.0, 0.0]
    };
    out.set(positive, levels[0]);
    out.set(negative, levels[1]);
    [
        out.get(positive).unwrap_or(0.0),
        out.get(negative).unwrap_or(0.0),
    ]
}

// ---------------------------------------------------------------------------
// Linear-rate thrust
// ---------------------------------------------------------------------------

/// Thrust (N) needed to close a linear rate error: the closing acceleration
/// is the error times `max(2, |error|/5)` (times `gain`), on top of whatever
/// cancels the external acceleration `planet_acc`.
pub fn rate_hold_thrust(target: f64, current: f64, planet_acc: f64, mass: f64, gain: f64) -> f64 {
    let delta = target - current;
    let multiplier = (delta.abs() / 5.0).max(2.0) * gain;
    let target_acc = delta * multiplier;
    (target_acc - planet_acc) * mass
}

/// Throttle for `thrust` N on an engine rated `max_thrust` N, in [0, 1].
pub fn throttle_for(thrust: f64, max_thrust: f64) -> f64 {
    if max_thrust <= 0.0 || !thrust.is_finite() {
        return 0.0;
    }
    (thrust / max_thrust).clamp(0.0, 1.0)
}
