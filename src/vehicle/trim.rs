use crate::config::ColLimits;

/// Centre-of-lift actuator: the host-side owner of the COL position the
/// autopilot shifts to trim pitch.
#[derive(Debug, Clone)]
pub struct CenterOfLiftActuator {
    pub limits: ColLimits,
    pub position: f64, // m
    pub auto_mode: bool,
    pub recentering: bool,
}

impl CenterOfLiftActuator {
    pub fn new(limits: ColLimits) -> Self {
        Self { position: limits.neutral, limits, auto_mode: false, recentering: false }
    }

    pub fn is_centered(&self) -> bool {
        self.position == self.limits.neutral
    }

    /// Apply an autopilot shift. Returns false if the shift was clamped or
    /// there is no hydraulic power to move the actuator.
    pub fn shift(&mut self, delta: f64, hydraulic_power: bool) -> bool {
        if !hydraulic_power {
            return false;
        }
        let wanted = self.position + delta;
        self.position = self.limits.clamp_position(wanted);
        self.position == wanted
    }

    /// A pilot shift is refused while an autopilot holds the actuator.
    pub fn manual_shift(&mut self, delta: f64, hydraulic_power: bool) -> bool {
        if self.auto_mode {
            return false;
        }
        self.recentering = false;
        self.shift(delta, hydraulic_power)
    }

    pub fn set_auto_mode(&mut self, on: bool) {
        self.auto_mode = on;
        if on {
            self.recentering = false;
        }
    }

    pub fn request_recenter(&mut self) {
        if !self.is_centered() {
            self.recentering = true;
        }
    }

    /// Advance an active recenter by one step. Moves toward neutral at the
    /// max shift rate and stops exactly on it.
    pub fn recenter_step(&mut self, dt: f64, hydraulic_power: bool) {
        if !self.recentering || !hydraulic_power {
            return;
        }
        let neutral = self.limits.neutral;
        let step = self.limits.max_shift_rate * dt;
        let offset = self.position - neutral;
        if offset.abs() <= step {
            self.position = neutral;
            self.recentering = false;
        } else {
            self.position -= step * offset.signum();
        }
    }
}
