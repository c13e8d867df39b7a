use nalgebra::Vector3;

use crate::config::ColLimits;
use crate::control::AutopilotMode;
use crate::vehicle::{CenterOfLiftActuator, ThrusterLevels, VehicleModel};

// ---------------------------------------------------------------------------
// Continuous plant state
// ---------------------------------------------------------------------------

/// Closed-loop plant state: point-mass motion in the vertical plane plus
/// three decoupled attitude axes, and the discrete ship systems.
#[derive(Debug, Clone)]
pub struct PlantState {
    pub time: f64,                 // s
    pub altitude: f64,             // m, gear compressed
    pub vertical_speed: f64,       // m/s, positive up
    pub ground_speed: f64,         // m/s, along track
    pub pitch: f64,                // deg
    pub bank: f64,                 // deg, (-180, 180]
    pub omega: Vector3<f64>,       // deg/s: x pitch, y yaw, z roll
    pub systems: Systems,
}

/// Time derivative of the continuous part of [`PlantState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Deriv {
    pub daltitude: f64,
    pub dvertical_speed: f64,
    pub dground_speed: f64,
    pub dpitch: f64,
    pub dbank: f64,
    pub domega: Vector3<f64>,
}

impl PlantState {
    /// A level ship at rest at `altitude` with `model`'s systems.
    pub fn at_rest(model: &VehicleModel, col: ColLimits, altitude: f64) -> Self {
        Self {
            time: 0.0,
            altitude,
            vertical_speed: 0.0,
            ground_speed: 0.0,
            pitch: 0.0,
            bank: 0.0,
            omega: Vector3::zeros(),
            systems: Systems::new(model, col),
        }
    }

    pub fn apply(&self, d: &Deriv, dt: f64) -> PlantState {
        PlantState {
            time: self.time + dt,
            altitude: self.altitude + d.daltitude * dt,
            vertical_speed: self.vertical_speed + d.dvertical_speed * dt,
            ground_speed: self.ground_speed + d.dground_speed * dt,
            pitch: self.pitch + d.dpitch * dt,
            bank: self.bank + d.dbank * dt,
            omega: self.omega + d.domega * dt,
            systems: self.systems.clone(),
        }
    }

    pub fn airspeed(&self) -> f64 {
        self.vertical_speed.hypot(self.ground_speed)
    }

    /// Fold bank back into (-180, 180] and keep pitch within +/-90.
    pub fn normalize_attitude(&mut self) {
        let mut bank = self.bank % 360.0;
        if bank > 180.0 {
            bank -= 360.0;
        } else if bank <= -180.0 {
            bank += 360.0;
        }
        self.bank = bank;
        self.pitch = self.pitch.clamp(-90.0, 90.0);
    }
}

// ---------------------------------------------------------------------------
// Ship systems
// ---------------------------------------------------------------------------

/// Discrete ship state the autopilots act on through the host.
#[derive(Debug, Clone)]
pub struct Systems {
    pub levels: ThrusterLevels,
    pub col: CenterOfLiftActuator,
    pub elevator_trim: f64,           // [-1, 1]
    pub elevator: f64,                // [-1, 1]
    pub rudder: f64,                  // [-1, 1]
    pub aileron: f64,                 // [-1, 1]
    pub elevators_operational: bool,
    pub apu_online: bool,
    pub apu_start_timer: Option<f64>, // s left until online
    pub apu_fuel: f64,                // kg
    pub hover_doors_open: bool,
    pub retro_doors_open: bool,
    pub ground_contact: bool,
    pub crashed: bool,
    pub crew_incapacitated: bool,
    pub mode: AutopilotMode,
    pub airspeed_hold: bool,
}

impl Systems {
    pub fn new(model: &VehicleModel, col: ColLimits) -> Self {
        Self {
            levels: ThrusterLevels::default(),
            col: CenterOfLiftActuator::new(col),
            elevator_trim: 0.0,
            elevator: 0.0,
            rudder: 0.0,
            aileron: 0.0,
            elevators_operational: true,
            apu_online: true,
            apu_start_timer: None,
            apu_fuel: model.apu_fuel,
            hover_doors_open: true,
            retro_doors_open: true,
            ground_contact: false,
            crashed: false,
            crew_incapacitated: false,
            mode: AutopilotMode::Off,
            airspeed_hold: false,
        }
    }

    pub fn hydraulic_power(&self) -> bool {
        self.apu_online
    }
}
