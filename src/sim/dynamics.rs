use nalgebra::Vector3;

use crate::physics::aerodynamics;
use crate::physics::atmosphere::{self, Atmo};
use crate::physics::gravity::gravity_accel;
use crate::vehicle::{ThrusterGroup, VehicleModel};
use super::state::{Deriv, PlantState};

/// Below this altitude with no climb the gear is on the ground, m.
pub const GROUND_TOLERANCE: f64 = 1e-6;
const ROLLING_FRICTION: f64 = 0.02;
/// Below this ground speed wheel friction is ignored, m/s.
const MIN_ROLLING_SPEED: f64 = 0.05;

// ---------------------------------------------------------------------------
// Air data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct AirData {
    pub atmo: Atmo,
    pub dynamic_pressure: f64, // Pa
    pub flight_path: f64,      // deg
    pub aoa: f64,              // deg
    pub gravity: f64,          // m/s^2
}

pub fn air_data(state: &PlantState) -> AirData {
    let atmo = atmosphere::isa(state.altitude);
    let flight_path = aerodynamics::flight_path_angle(state.vertical_speed, state.ground_speed);
    AirData {
        atmo,
        dynamic_pressure: atmo.dynamic_pressure(state.airspeed()),
        flight_path,
        aoa: aerodynamics::angle_of_attack(state.pitch, flight_path, state.bank),
        gravity: gravity_accel(state.altitude),
    }
}

pub fn is_grounded(state: &PlantState) -> bool {
    state.altitude <= GROUND_TOLERANCE && state.vertical_speed <= 0.0
}

// ---------------------------------------------------------------------------
// Forces (horizon frame, N)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Forces {
    pub weight: Vector3<f64>,
    pub lift: Vector3<f64>,
    pub drag: Vector3<f64>,
    pub thrust: Vector3<f64>,
    pub ground: Vector3<f64>,
}

impl Forces {
    pub fn net(&self) -> Vector3<f64> {
        self.weight + self.lift + self.drag + self.thrust + self.ground
    }
}

pub fn forces(state: &PlantState, model: &VehicleModel, air: &AirData) -> Forces {
    let q = air.dynamic_pressure;
    let weight = Vector3::new(0.0, -model.mass * air.gravity, 0.0);
    let lift = aerodynamics::lift_force(q, model.lift_area, air.aoa, state.bank, air.flight_path);
    let drag = aerodynamics::drag_force(q, model.drag_area, air.aoa, air.flight_path);
    let thrust = engine_thrust(state, model);

    let mut ground = Vector3::zeros();
    if is_grounded(state) {
        let airborne = weight + lift + drag + thrust;
        let normal = (-airborne.y).max(0.0);
        ground.y = normal;
        if state.ground_speed.abs() > MIN_ROLLING_SPEED {
            ground.z = -ROLLING_FRICTION * normal * state.ground_speed.signum();
        }
    }

    Forces { weight, lift, drag, thrust, ground }
}

/// Hover jets push along the body's up axis, main and retro along its nose.
fn engine_thrust(state: &PlantState, model: &VehicleModel) -> Vector3<f64> {
    let levels = &state.systems.levels;
    let (sp, cp) = state.pitch.to_radians().sin_cos();
    let cb = state.bank.to_radians().cos();

    let hover = levels.get(ThrusterGroup::Hover) * model.engines.hover;
    let axial = levels.get(ThrusterGroup::Main) * model.engines.main
        - levels.get(ThrusterGroup::Retro) * model.engines.retro;

    Vector3::new(0.0, hover * cp * cb, -hover * sp) + Vector3::new(0.0, axial * sp, axial * cp)
}

// ---------------------------------------------------------------------------
// Derivatives
// ---------------------------------------------------------------------------

pub fn derivatives(state: &PlantState, model: &VehicleModel) -> Deriv {
    let air = air_data(state);
    let f = forces(state, model, &air).net();
    let mut d = Deriv {
        daltitude: state.vertical_speed,
        dvertical_speed: f.y / model.mass,
        dground_speed: f.z / model.mass,
        ..Default::default()
    };
    if is_grounded(state) {
        // gear holds the attitude
        d.dvertical_speed = d.dvertical_speed.max(0.0);
        return d;
    }

    d.domega = angular_acceleration(state, model, air.dynamic_pressure);
    d.dpitch = state.omega.x * state.bank.to_radians().cos();
    d.dbank = -state.omega.z;
    d
}

/// Angular acceleration (deg/s^2) from the RCS, the airframe's pitch-down
/// moment, the centre of lift, trim and aerodynamic damping.
fn angular_acceleration(state: &PlantState, model: &VehicleModel, q: f64) -> Vector3<f64> {
    let sys = &state.systems;
    let l = &sys.levels;
    let pair = |a: ThrusterGroup, b: ThrusterGroup| l.get(a) - l.get(b);
    let rcs = model.rcs_authority.component_mul(&Vector3::new(
        pair(ThrusterGroup::PitchUp, ThrusterGroup::PitchDown),
        pair(ThrusterGroup::YawLeft, ThrusterGroup::YawRight),
        pair(ThrusterGroup::BankRight, ThrusterGroup::BankLeft),
    ));

    let q_kpa = q / 1000.0;
    let col_offset = sys.col.position - sys.col.limits.neutral;
    let pitch_aero = q_kpa
        * (model.col_pitch_authority * col_offset
            + model.trim_pitch_authority * (sys.elevator_trim + sys.elevator)
            - model.aero_pitch_moment);

    rcs + Vector3::new(pitch_aero, 0.0, 0.0)
        + aerodynamics::damping_moment(&state.omega, q, model.aero_damping)
}
