use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Time-acceleration factors above which the autopilots stop firing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspensionLimits {
    pub vacuum: f64,
    pub atmosphere: f64,
    pub airspeed: f64,
}

impl Default for SuspensionLimits {
    fn default() -> Self {
        Self { vacuum: 100.0, atmosphere: 60.0, airspeed: 100.0 }
    }
}

impl SuspensionLimits {
    /// Attitude and descent hold share this threshold.
    pub fn attitude_suspended(&self, time_acceleration: f64, in_atmosphere: bool) -> bool {
        time_acceleration > self.vacuum || (in_atmosphere && time_acceleration > self.atmosphere)
    }

    pub fn airspeed_suspended(&self, time_acceleration: f64) -> bool {
        time_acceleration > self.airspeed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateGains {
    pub delta_to_rate_frac: f64,        // (deg/s) per deg of attitude error
    pub angular_rate_limit: f64,        // deg/s
    pub min_initial_roll_rate: f64,     // deg/s
    pub reference_frame_time: f64,      // s
    pub target_dead_zone: f64,          // deg
    pub rate_dead_zone: f64,            // deg/s
    pub kill_rate_dead_zone: f64,       // deg/s
    pub closing_rate_band: f64,         // deg/s error at which thrust saturates
    pub descent_closing_rate_band: f64, // same, while descent hold runs
    pub kill_rate_band: f64,            // deg/s
    pub learning_step_divisor: f64,
    pub bank_capture_tolerance: f64,    // deg
}

impl Default for RateGains {
    fn default() -> Self {
        Self {
            delta_to_rate_frac: 0.5,
            angular_rate_limit: 20.0,
            min_initial_roll_rate: 10.0,
            reference_frame_time: 0.025,
            target_dead_zone: 0.01,
            rate_dead_zone: 0.01,
            kill_rate_dead_zone: 0.05,
            closing_rate_band: 5.0,
            descent_closing_rate_band: 1.0,
            kill_rate_band: 3.0,
            learning_step_divisor: 50.0,
            bank_capture_tolerance: 3.0,
        }
    }
}

impl RateGains {
    /// Larger frames get proportionally weaker pulses so the response does
    /// not depend on frame rate.
    pub fn step_divisor(&self, sim_dt: f64) -> f64 {
        (sim_dt / self.reference_frame_time).max(1.0)
    }
}

/// Centre-of-lift actuator and elevator-trim constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColLimits {
    pub neutral: f64,                // m
    pub max_shift_rate: f64,         // m/s
    pub max_shift_distance: f64,     // m either side of neutral
    pub thrust_dead_zone: f64,       // pitch thrust level below which COL stays put
    pub thrust_to_shift_ratio: f64,
    pub trim_dead_zone: f64,         // m of COL offset for full trim speed
    pub trim_speed: f64,             // trim fraction per second
}

impl Default for ColLimits {
    fn default() -> Self {
        Self {
            neutral: 0.0,
            max_shift_rate: 1.1644,
            max_shift_distance: 4.115,
            thrust_dead_zone: 0.04,
            thrust_to_shift_ratio: 4.0,
            trim_dead_zone: 0.1,
            trim_speed: 0.20,
        }
    }
}

impl ColLimits {
    pub fn min_position(&self) -> f64 {
        self.neutral - self.max_shift_distance
    }

    pub fn max_position(&self) -> f64 {
        self.neutral + self.max_shift_distance
    }

    pub fn clamp_position(&self, position: f64) -> f64 {
        position.clamp(self.min_position(), self.max_position())
    }
}

/// Pilot-target limits and step sizes for attitude hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttitudeLimits {
    pub normal: f64,                // deg
    pub absolute_pitch_or_aoa: f64, // deg
    pub absolute_bank: f64,         // deg
    pub pitch_step_small: f64,      // deg
    pub pitch_step_large: f64,      // deg
    pub bank_step: f64,             // deg
}

impl Default for AttitudeLimits {
    fn default() -> Self {
        Self {
            normal: 60.0,
            absolute_pitch_or_aoa: 87.5,
            absolute_bank: 75.0,
            pitch_step_small: 0.5,
            pitch_step_large: 2.5,
            bank_step: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    pub suspension: SuspensionLimits,
    pub rate: RateGains,
    pub col: ColLimits,
    pub attitude: AttitudeLimits,
    pub enable_manual_flight_controls: bool,
    pub apu_autostart_for_cog_shift: bool,
    pub airspeed_retro_assist: bool,
}

impl AutopilotConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: AutopilotConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, f64); 22] = [
            ("suspension.vacuum", self.suspension.vacuum),
            ("suspension.atmosphere", self.suspension.atmosphere),
            ("suspension.airspeed", self.suspension.airspeed),
            ("rate.delta_to_rate_frac", self.rate.delta_to_rate_frac),
            ("rate.angular_rate_limit", self.rate.angular_rate_limit),
            ("rate.min_initial_roll_rate", self.rate.min_initial_roll_rate),
            ("rate.reference_frame_time", self.rate.reference_frame_time),
            ("rate.target_dead_zone", self.rate.target_dead_zone),
            ("rate.rate_dead_zone", self.rate.rate_dead_zone),
            ("rate.kill_rate_dead_zone", self.rate.kill_rate_dead_zone),
            ("rate.closing_rate_band", self.rate.closing_rate_band),
            ("rate.descent_closing_rate_band", self.rate.descent_closing_rate_band),
            ("rate.kill_rate_band", self.rate.kill_rate_band),
            ("rate.learning_step_divisor", self.rate.learning_step_divisor),
            ("rate.bank_capture_tolerance", self.rate.bank_capture_tolerance),
            ("col.max_shift_rate", self.col.max_shift_rate),
            ("col.max_shift_distance", self.col.max_shift_distance),
            ("col.thrust_to_shift_ratio", self.col.thrust_to_shift_ratio),
            ("col.trim_dead_zone", self.col.trim_dead_zone),
            ("col.trim_speed", self.col.trim_speed),
            ("attitude.normal", self.attitude.normal),
            ("attitude.absolute_pitch_or_aoa", self.attitude.absolute_pitch_or_aoa),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite and positive, got {value}"),
                });
            }
        }
        if !self.col.neutral.is_finite() {
            return Err(ConfigError::Invalid {
                field: "col.neutral",
                reason: "must be finite".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.col.thrust_dead_zone) {
            return Err(ConfigError::Invalid {
                field: "col.thrust_dead_zone",
                reason: format!("must lie in [0, 1], got {}", self.col.thrust_dead_zone),
            });
        }
        let a = &self.attitude;
        if a.normal > a.absolute_pitch_or_aoa || a.normal > a.absolute_bank || a.absolute_bank > 90.0 {
            return Err(ConfigError::Invalid {
                field: "attitude",
                reason: "need normal <= absolute limits and absolute_bank <= 90".into(),
            });
        }
        Ok(())
    }
}
