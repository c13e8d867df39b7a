use nalgebra::Vector3;

use super::thruster::ThrusterLevels;

/// Standard gravity, m/s^2.
pub const G0: f64 = 9.80665;

/// Rated maximum thrust per engine group, corrected for ambient pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineCapacity {
    pub hover: f64, // N
    pub main: f64,  // N
    pub retro: f64, // N
}

// ---------------------------------------------------------------------------
// Per-step vehicle state seen by the autopilots
// ---------------------------------------------------------------------------

/// Everything an autopilot reads in one step. The host builds one of these
/// per frame; the controllers never query the vehicle directly.
///
/// Force vectors are in the local horizon frame: +y up, +z forward.
#[derive(Debug, Clone)]
pub struct VehicleSnapshot {
    pub sim_time: f64,                   // s
    pub sim_dt: f64,                     // s, length of this step
    pub time_acceleration: f64,          // 1.0 = real time
    pub mass: f64,                       // kg
    pub pitch: f64,                      // deg
    pub bank: f64,                       // deg, (-180, 180]
    pub aoa: f64,                        // deg
    pub angular_velocity: Vector3<f64>,  // deg/s: x pitch, y yaw, z roll
    pub weight: Vector3<f64>,            // N
    pub lift: Vector3<f64>,              // N
    pub drag: Vector3<f64>,              // N
    pub net_force: Vector3<f64>,         // N, all forces including thrust
    pub thrust: Vector3<f64>,            // N
    pub ground_contact: bool,
    pub altitude: f64,                   // m, measured with gear compressed
    pub vertical_speed: f64,             // m/s, positive up
    pub airspeed: f64,                   // m/s
    pub dynamic_pressure: f64,           // Pa
    pub in_atmosphere: bool,
    pub max_thrust: EngineCapacity,
    pub thruster_levels: ThrusterLevels,
    pub rudder: f64,                     // [-1, 1]
    pub elevator_trim: f64,              // [-1, 1]
    pub elevators_operational: bool,
    pub center_of_lift: f64,             // m
    pub hydraulic_power: bool,
    pub apu_fuel: f64,                   // kg
    pub apu_starting: bool,
    pub hover_doors_open: bool,
    pub retro_doors_open: bool,
    pub crashed: bool,
    pub crew_incapacitated: bool,
}

impl VehicleSnapshot {
    /// Crashed or no conscious crew: every autopilot stays inert.
    pub fn is_unsafe(&self) -> bool {
        self.crashed || self.crew_incapacitated
    }

    pub fn is_inverted(&self) -> bool {
        self.bank.abs() > 90.0
    }
}

// ---------------------------------------------------------------------------
// Snapshot builder
// ---------------------------------------------------------------------------

/// Builds a snapshot of a level, stationary vehicle in vacuum and lets the
/// caller override individual fields.
pub struct SnapshotBuilder {
    snap: VehicleSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        let mass = 20_000.0;
        Self {
            snap: VehicleSnapshot {
                sim_time: 10.0,
                sim_dt: 0.025,
                time_acceleration: 1.0,
                mass,
                pitch: 0.0,
                bank: 0.0,
                aoa: 0.0,
                angular_velocity: Vector3::zeros(),
                weight: Vector3::new(0.0, -mass * G0, 0.0),
                lift: Vector3::zeros(),
                drag: Vector3::zeros(),
                net_force: Vector3::new(0.0, -mass * G0, 0.0),
                thrust: Vector3::zeros(),
                ground_contact: false,
                altitude: 1000.0,
                vertical_speed: 0.0,
                airspeed: 0.0,
                dynamic_pressure: 0.0,
                in_atmosphere: false,
                max_thrust: EngineCapacity { hover: 300_000.0, main: 400_000.0, retro: 70_000.0 },
                thruster_levels: ThrusterLevels::default(),
                rudder: 0.0,
                elevator_trim: 0.0,
                elevators_operational: true,
                center_of_lift: 0.0,
                hydraulic_power: true,
                apu_fuel: 100.0,
                apu_starting: false,
                hover_doors_open: true,
                retro_doors_open: true,
                crashed: false,
                crew_incapacitated: false,
            },
        }
    }

    /// Also rescales weight so it stays consistent with the new mass.
    pub fn mass(mut self, v: f64) -> Self {
        self.snap.weight = Vector3::new(0.0, -v * G0, 0.0);
        self.snap.mass = v;
        self
    }

    pub fn sim_time(mut self, v: f64) -> Self { self.snap.sim_time = v; self }
    pub fn sim_dt(mut self, v: f64) -> Self { self.snap.sim_dt = v; self }
    pub fn time_acceleration(mut self, v: f64) -> Self { self.snap.time_acceleration = v; self }
    pub fn pitch(mut self, v: f64) -> Self { self.snap.pitch = v; self }
    pub fn bank(mut self, v: f64) -> Self { self.snap.bank = v; self }
    pub fn aoa(mut self, v: f64) -> Self { self.snap.aoa = v; self }
    pub fn angular_velocity(mut self, v: Vector3<f64>) -> Self { self.snap.angular_velocity = v; self }
    pub fn weight(mut self, v: Vector3<f64>) -> Self { self.snap.weight = v; self }
    pub fn lift(mut self, v: Vector3<f64>) -> Self { self.snap.lift = v; self }
    pub fn drag(mut self, v: Vector3<f64>) -> Self { self.snap.drag = v; self }
    pub fn net_force(mut self, v: Vector3<f64>) -> Self { self.snap.net_force = v; self }
    pub fn thrust(mut self, v: Vector3<f64>) -> Self { self.snap.thrust = v; self }
    pub fn ground_contact(mut self, v: bool) -> Self { self.snap.ground_contact = v; self }
    pub fn altitude(mut self, v: f64) -> Self { self.snap.altitude = v; self }
    pub fn vertical_speed(mut self, v: f64) -> Self { self.snap.vertical_speed = v; self }
    pub fn airspeed(mut self, v: f64) -> Self { self.snap.airspeed = v; self }
    pub fn dynamic_pressure(mut self, v: f64) -> Self { self.snap.dynamic_pressure = v; self }
    pub fn in_atmosphere(mut self, v: bool) -> Self { self.snap.in_atmosphere = v; self }
    pub fn max_thrust(mut self, v: EngineCapacity) -> Self { self.snap.max_thrust = v; self }
    pub fn thruster_levels(mut self, v: ThrusterLevels) -> Self { self.snap.thruster_levels = v; self }
    pub fn rudder(mut self, v: f64) -> Self { self.snap.rudder = v; self }
    pub fn elevator_trim(mut self, v: f64) -> Self { self.snap.elevator_trim = v; self }
    pub fn elevators_operational(mut self, v: bool) -> Self { self.snap.elevators_operational = v; self }
    pub fn center_of_lift(mut self, v: f64) -> Self { self.snap.center_of_lift = v; self }
    pub fn hydraulic_power(mut self, v: bool) -> Self { self.snap.hydraulic_power = v; self }
    pub fn apu_fuel(mut self, v: f64) -> Self { self.snap.apu_fuel = v; self }
    pub fn apu_starting(mut self, v: bool) -> Self { self.snap.apu_starting = v; self }
    pub fn hover_doors_open(mut self, v: bool) -> Self { self.snap.hover_doors_open = v; self }
    pub fn retro_doors_open(mut self, v: bool) -> Self { self.snap.retro_doors_open = v; self }
    pub fn crashed(mut self, v: bool) -> Self { self.snap.crashed = v; self }
    pub fn crew_incapacitated(mut self, v: bool) -> Self { self.snap.crew_incapacitated = v; self }

    pub fn build(self) -> VehicleSnapshot {
        self.snap
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
