use crate::config::AttitudeLimits;
use crate::vehicle::{Advisory, AdvisoryKind};

/// Largest descent/climb rate the pilot can dial in, m/s.
pub const MAX_DESCENT_HOLD_RATE: f64 = 990.0;

/// Descent-rate step sizes, m/s.
pub const DESCENT_RATE_STEPS: [f64; 3] = [0.1, 0.5, 2.5];

/// Airspeed step sizes, m/s.
pub const AIRSPEED_STEPS: [f64; 4] = [0.1, 1.0, 5.0, 25.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DescentAdjust {
    Level,
    Adjust(f64),
    ToggleAutoLand,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AirspeedAdjust {
    HoldCurrent,
    Reset,
    Adjust(f64),
}

/// Pilot-selected targets shared by the custom autopilots.
#[derive(Debug, Clone, PartialEq)]
pub struct AutopilotTargets {
    pub bank: f64,         // deg
    pub pitch_or_aoa: f64, // deg
    pub hold_aoa: bool,
    pub descent_rate: f64, // m/s, positive up
    pub auto_land: bool,
    pub airspeed: f64,     // m/s
}

impl Default for AutopilotTargets {
    fn default() -> Self {
        Self {
            bank: 0.0,
            pitch_or_aoa: 0.0,
            hold_aoa: false,
            descent_rate: 0.0,
            auto_land: false,
            airspeed: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Attitude-hold target limits
// ---------------------------------------------------------------------------

pub fn limit_pitch(value: f64, limit: f64) -> f64 {
    value.clamp(-limit, limit)
}

/// Fold a bank angle back into [-180, 180].
pub fn wrap_bank(value: f64) -> f64 {
    if value > 180.0 {
        value - 360.0
    } else if value < -180.0 {
        value + 360.0
    } else {
        value
    }
}

/// Keep a bank target out of the cones around +/-90 deg.
///
/// The legal bands are `[-limit, limit]` upright and `|bank| >= 180 - limit`
/// inverted. While attitude hold is engaged an out-of-band value clamps to
/// the nearest edge of the band it came from and `limited` is returned as
/// true; while disengaged it snaps across to the next band in the direction
/// of travel.
pub fn limit_bank(value: f64, limit: f64, incrementing: bool, engaged: bool) -> (f64, bool) {
    let val = wrap_bank(value);
    let inverted_edge = 180.0 - limit;

    // quadrants, clockwise from the top: 4 = (limit, 90], 3 = [90, 180-limit),
    // 2 = (-(180-limit), -90], 1 = [-90, -limit)
    let in_q4 = val > limit && val <= 90.0;
    let in_q1 = val < -limit && val >= -90.0;
    let in_q3 = val < inverted_edge && val >= 90.0;
    let in_q2 = val > -inverted_edge && val <= -90.0;

    if engaged {
        let limited = if in_q4 {
            limit
        } else if in_q1 {
            -limit
        } else if in_q3 {
            inverted_edge
        } else if in_q2 {
            -inverted_edge
        } else {
            return (val, false);
        };
        (limited, true)
    } else {
        let snapped = if in_q4 {
            if incrementing { inverted_edge } else { -limit }
        } else if in_q1 {
            if incrementing { limit } else { -inverted_edge }
        } else if in_q3 {
            if incrementing { -inverted_edge } else { limit }
        } else if in_q2 {
            if incrementing { -limit } else { inverted_edge }
        } else {
            val
        };
        (snapped, false)
    }
}

/// Round to the nearest multiple of `boundary`, halves away from zero.
pub fn round_to(value: f64, boundary: f64) -> f64 {
    (value / boundary).round() * boundary
}

impl AutopilotTargets {
    pub fn axis_name(&self) -> &'static str {
        if self.hold_aoa { "AOA" } else { "Pitch" }
    }

    /// Re-apply both attitude limits after a target change.
    pub fn limit_pitch_and_bank(
        &mut self,
        limits: &AttitudeLimits,
        incrementing_bank: bool,
        engaged: bool,
    ) -> Option<Advisory> {
        let bank_level = self.bank == 0.0 || self.bank.abs() == 180.0;
        let pitch_limit = if bank_level { limits.absolute_pitch_or_aoa } else { limits.normal };
        self.pitch_or_aoa = limit_pitch(self.pitch_or_aoa, pitch_limit);

        let bank_limit = if self.pitch_or_aoa == 0.0 { limits.absolute_bank } else { limits.normal };
        let (bank, limited) = limit_bank(self.bank, bank_limit, incrementing_bank, engaged);
        self.bank = bank;
        limited.then(|| {
            Advisory::warning(
                AdvisoryKind::AttitudeLimited,
                "Disengage attitude hold before setting an inverted bank level",
            )
        })
    }

    pub fn adjust_pitch(&mut self, delta: f64, limits: &AttitudeLimits, engaged: bool) -> Vec<Advisory> {
        self.pitch_or_aoa += delta;
        let mut out: Vec<Advisory> = self.limit_pitch_and_bank(limits, false, engaged).into_iter().collect();
        out.push(Advisory::info(
            AdvisoryKind::TargetChanged,
            format!("Attitude hold: {} {:+.1}°", self.axis_name(), self.pitch_or_aoa),
        ));
        out
    }

    pub fn adjust_bank(&mut self, incrementing: bool, limits: &AttitudeLimits, engaged: bool) -> Vec<Advisory> {
        self.bank += if incrementing { limits.bank_step } else { -limits.bank_step };
        let mut out: Vec<Advisory> =
            self.limit_pitch_and_bank(limits, incrementing, engaged).into_iter().collect();
        out.push(Advisory::info(
            AdvisoryKind::TargetChanged,
            format!("Attitude hold: bank {:+.1}°", self.bank),
        ));
        out
    }

    /// Level the bank to 0 (upright) or 180 (inverted) and/or zero pitch.
    pub fn reset_to_level(&mut self, current_bank: f64, reset_bank: bool, reset_pitch: bool) -> Option<Advisory> {
        if reset_bank {
            self.bank = if current_bank.abs() <= 90.0 { 0.0 } else { 180.0 };
        }
        if reset_pitch {
            self.pitch_or_aoa = 0.0;
        }
        let axis = match (reset_bank, reset_pitch) {
            (true, true) => "ship",
            (true, false) => "bank",
            (false, true) => if self.hold_aoa { "AOA" } else { "pitch" },
            (false, false) => return None,
        };
        Some(Advisory::info(
            AdvisoryKind::TargetChanged,
            format!("Attitude hold: {axis} reset to level"),
        ))
    }

    /// Take the vehicle's present attitude as the new targets.
    pub fn sync_to_attitude(
        &mut self,
        pitch: f64,
        aoa: f64,
        bank: f64,
        force_pitch_mode: bool,
        limits: &AttitudeLimits,
    ) -> Advisory {
        if force_pitch_mode {
            self.hold_aoa = false;
        }
        let source = if self.hold_aoa { aoa } else { pitch };
        self.pitch_or_aoa = limit_pitch(round_to(source, limits.pitch_step_small), limits.normal);
        let (bank, _) = limit_bank(round_to(bank, limits.bank_step), limits.normal, false, false);
        self.bank = bank;
        Advisory::info(
            AdvisoryKind::TargetChanged,
            format!(
                "Attitude hold: {} synced to {:+.1}°, bank {:+.1}°",
                self.axis_name(),
                self.pitch_or_aoa,
                self.bank
            ),
        )
    }

    pub fn adjust_descent(&mut self, adjust: DescentAdjust) -> Advisory {
        if !matches!(adjust, DescentAdjust::ToggleAutoLand) {
            self.auto_land = false;
        }
        let message = match adjust {
            DescentAdjust::Level => {
                self.descent_rate = 0.0;
                "Descent hold: reset to hover".to_string()
            }
            DescentAdjust::Adjust(delta) => {
                self.descent_rate =
                    (self.descent_rate + delta).clamp(-MAX_DESCENT_HOLD_RATE, MAX_DESCENT_HOLD_RATE);
                format!("Descent hold: set to {:+.1} m/s", self.descent_rate)
            }
            DescentAdjust::ToggleAutoLand => {
                if self.auto_land {
                    self.auto_land = false;
                    self.descent_rate = 0.0;
                    "Descent hold: auto-land disengaged".to_string()
                } else {
                    self.auto_land = true;
                    "Descent hold: auto-land engaged".to_string()
                }
            }
        };
        Advisory::info(AdvisoryKind::TargetChanged, message)
    }

    pub fn adjust_airspeed(&mut self, adjust: AirspeedAdjust, current_airspeed: f64) -> Advisory {
        self.airspeed = match adjust {
            AirspeedAdjust::HoldCurrent => current_airspeed,
            AirspeedAdjust::Reset => 0.0,
            AirspeedAdjust::Adjust(delta) => self.airspeed + delta,
        }
        .max(0.0);
        Advisory::info(
            AdvisoryKind::TargetChanged,
            format!("Airspeed hold: set to {:.1} m/s", self.airspeed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> AttitudeLimits {
        AttitudeLimits::default()
    }

    #[test]
    fn bank_wraps_past_180() {
        assert_eq!(wrap_bank(185.0), -175.0);
        assert_eq!(wrap_bank(-185.0), 175.0);
        assert_eq!(wrap_bank(180.0), 180.0);
        assert_eq!(wrap_bank(-180.0), -180.0);
    }

    #[test]
    fn engaged_bank_clamps_to_cone_edge() {
        assert_eq!(limit_bank(65.0, 60.0, true, true), (60.0, true));
        assert_eq!(limit_bank(-65.0, 60.0, false, true), (-60.0, true));
        assert_eq!(limit_bank(115.0, 60.0, false, true), (120.0, true));
        assert_eq!(limit_bank(-115.0, 60.0, true, true), (-120.0, true));
        assert_eq!(limit_bank(45.0, 60.0, true, true), (45.0, false));
        assert_eq!(limit_bank(150.0, 60.0, true, true), (150.0, false));
    }

    #[test]
    fn disengaged_bank_snaps_across_quadrants() {
        // incrementing out of the upright band jumps to the inverted band
        assert_eq!(limit_bank(65.0, 60.0, true, false), (120.0, false));
        assert_eq!(limit_bank(65.0, 60.0, false, false), (-60.0, false));
        assert_eq!(limit_bank(115.0, 60.0, true, false), (-120.0, false));
        assert_eq!(limit_bank(115.0, 60.0, false, false), (60.0, false));
        assert_eq!(limit_bank(-65.0, 60.0, true, false), (60.0, false));
        assert_eq!(limit_bank(-115.0, 60.0, true, false), (-60.0, false));
    }

    #[test]
    fn bank_limit_widens_with_level_pitch() {
        let mut t = AutopilotTargets { bank: 70.0, ..Default::default() };
        assert!(t.limit_pitch_and_bank(&limits(), true, true).is_none());
        assert_eq!(t.bank, 70.0, "75 deg cone when pitch target is zero");

        t.pitch_or_aoa = 5.0;
        let adv = t.limit_pitch_and_bank(&limits(), true, true);
        assert_eq!(t.bank, 60.0);
        assert_eq!(adv.map(|a| a.kind), Some(AdvisoryKind::AttitudeLimited));
    }

    #[test]
    fn pitch_limit_depends_on_bank_level() {
        let mut t = AutopilotTargets { pitch_or_aoa: 95.0, ..Default::default() };
        t.limit_pitch_and_bank(&limits(), false, false);
        assert_eq!(t.pitch_or_aoa, 87.5);

        t.bank = 180.0;
        t.pitch_or_aoa = 95.0;
        t.limit_pitch_and_bank(&limits(), false, false);
        assert_eq!(t.pitch_or_aoa, 87.5, "180 counts as level");

        t.bank = 10.0;
        t.pitch_or_aoa = 95.0;
        t.limit_pitch_and_bank(&limits(), false, false);
        assert_eq!(t.pitch_or_aoa, 60.0);
    }

    #[test]
    fn bank_steps_through_180() {
        let mut t = AutopilotTargets { bank: 180.0, ..Default::default() };
        t.adjust_bank(true, &limits(), true);
        assert_eq!(t.bank, -175.0);
    }

    #[test]
    fn sync_rounds_and_limits() {
        let mut t = AutopilotTargets::default();
        t.sync_to_attitude(12.3, 4.0, 33.0, false, &limits());
        assert_eq!(t.pitch_or_aoa, 12.5);
        assert_eq!(t.bank, 35.0);

        t.sync_to_attitude(72.0, 4.0, -7.4, false, &limits());
        assert_eq!(t.pitch_or_aoa, 60.0);
        assert_eq!(t.bank, -5.0);

        t.hold_aoa = true;
        t.sync_to_attitude(12.3, 4.2, 0.0, false, &limits());
        assert_eq!(t.pitch_or_aoa, 4.0, "syncs AOA when holding AOA");
        t.sync_to_attitude(12.3, 4.2, 0.0, true, &limits());
        assert!(!t.hold_aoa);
        assert_eq!(t.pitch_or_aoa, 12.5);
    }

    #[test]
    fn round_handles_negatives() {
        assert_eq!(round_to(-8.0, 5.0), -10.0);
        assert_eq!(round_to(-7.0, 5.0), -5.0);
        assert_eq!(round_to(0.74, 0.5), 0.5);
    }

    #[test]
    fn reset_to_level_picks_upright_or_inverted() {
        let mut t = AutopilotTargets { bank: 40.0, pitch_or_aoa: 10.0, ..Default::default() };
        t.reset_to_level(120.0, true, false);
        assert_eq!(t.bank, 180.0);
        assert_eq!(t.pitch_or_aoa, 10.0);
        t.reset_to_level(-30.0, true, true);
        assert_eq!((t.bank, t.pitch_or_aoa), (0.0, 0.0));
        assert!(t.reset_to_level(0.0, false, false).is_none());
    }

    #[test]
    fn descent_adjust() {
        let mut t = AutopilotTargets::default();
        t.adjust_descent(DescentAdjust::ToggleAutoLand);
        assert!(t.auto_land);
        t.adjust_descent(DescentAdjust::Adjust(-2.5));
        assert!(!t.auto_land, "manual adjust cancels auto-land");
        assert_eq!(t.descent_rate, -2.5);
        t.adjust_descent(DescentAdjust::Adjust(-5000.0));
        assert_eq!(t.descent_rate, -MAX_DESCENT_HOLD_RATE);

        t.adjust_descent(DescentAdjust::ToggleAutoLand);
        t.adjust_descent(DescentAdjust::ToggleAutoLand);
        assert!(!t.auto_land);
        assert_eq!(t.descent_rate, 0.0, "auto-land off returns to hover");
    }

    #[test]
    fn airspeed_never_negative() {
        let mut t = AutopilotTargets::default();
        t.adjust_airspeed(AirspeedAdjust::Adjust(-5.0), 0.0);
        assert_eq!(t.airspeed, 0.0);
        t.adjust_airspeed(AirspeedAdjust::HoldCurrent, 142.0);
        assert_eq!(t.airspeed, 142.0);
        t.adjust_airspeed(AirspeedAdjust::Adjust(25.0), 0.0);
        assert_eq!(t.airspeed, 167.0);
        t.adjust_airspeed(AirspeedAdjust::Reset, 142.0);
        assert_eq!(t.airspeed, 0.0);
    }
}
