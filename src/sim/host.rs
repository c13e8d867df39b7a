use log::{debug, info};

use super::dynamics::{air_data, forces};
use super::state::{PlantState, Systems};
use crate::vehicle::{AutopilotCommand, VehicleModel, VehicleSnapshot};

/// APU fuel burn while running, kg/s.
const APU_FUEL_FLOW: f64 = 0.01;

// ---------------------------------------------------------------------------
// Plant -> autopilot
// ---------------------------------------------------------------------------

/// Build the per-step autopilot input from the plant.
pub fn snapshot(state: &PlantState, model: &VehicleModel, sim_dt: f64, time_acceleration: f64) -> VehicleSnapshot {
    let air = air_data(state);
    let f = forces(state, model, &air);
    let sys = &state.systems;
    VehicleSnapshot {
        sim_time: state.time,
        sim_dt,
        time_acceleration,
        mass: model.mass,
        pitch: state.pitch,
        bank: state.bank,
        aoa: air.aoa,
        angular_velocity: state.omega,
        weight: f.weight,
        lift: f.lift,
        drag: f.drag,
        net_force: f.net(),
        thrust: f.thrust,
        ground_contact: sys.ground_contact,
        altitude: state.altitude,
        vertical_speed: state.vertical_speed,
        airspeed: state.airspeed(),
        dynamic_pressure: air.dynamic_pressure,
        in_atmosphere: air.atmo.in_atmosphere(),
        max_thrust: model.engines,
        thruster_levels: sys.levels,
        rudder: sys.rudder,
        elevator_trim: sys.elevator_trim,
        elevators_operational: sys.elevators_operational,
        center_of_lift: sys.col.position,
        hydraulic_power: sys.hydraulic_power(),
        apu_fuel: sys.apu_fuel,
        apu_starting: sys.apu_start_timer.is_some(),
        hover_doors_open: sys.hover_doors_open,
        retro_doors_open: sys.retro_doors_open,
        crashed: sys.crashed,
        crew_incapacitated: sys.crew_incapacitated,
    }
}

// ---------------------------------------------------------------------------
// Autopilot -> plant
// ---------------------------------------------------------------------------

/// Carry out one autopilot command on the ship systems.
pub fn apply_command(sys: &mut Systems, cmd: &AutopilotCommand, model: &VehicleModel) {
    cmd.thrusters.apply_to(&mut sys.levels);

    if cmd.neutral_flight_controls {
        sys.elevator = 0.0;
        sys.rudder = 0.0;
        sys.aileron = 0.0;
    }

    if let Some(on) = cmd.col_auto_mode {
        if sys.col.auto_mode != on {
            debug!("centre of lift auto mode {}", if on { "on" } else { "off" });
        }
        sys.col.set_auto_mode(on);
    }
    if cmd.col_recenter {
        sys.col.request_recenter();
    }
    if cmd.col_shift != 0.0 {
        sys.col.shift(cmd.col_shift, sys.hydraulic_power());
    }
    if cmd.elevator_trim_delta != 0.0 {
        sys.elevator_trim = (sys.elevator_trim + cmd.elevator_trim_delta).clamp(-1.0, 1.0);
    }

    if cmd.start_apu && !sys.apu_online && sys.apu_start_timer.is_none() && sys.apu_fuel > 0.0 {
        info!("APU starting");
        sys.apu_start_timer = Some(model.apu_start_time);
    }
}

/// Advance the slow ship systems by `dt`: APU spool-up and fuel burn,
/// and any pending COL recenter.
pub fn update_systems(sys: &mut Systems, dt: f64) {
    if let Some(left) = sys.apu_start_timer {
        let left = left - dt;
        if left <= 0.0 {
            info!("APU online");
            sys.apu_start_timer = None;
            sys.apu_online = true;
        } else {
            sys.apu_start_timer = Some(left);
        }
    }

    if sys.apu_online {
        sys.apu_fuel = (sys.apu_fuel - APU_FUEL_FLOW * dt).max(0.0);
        if sys.apu_fuel == 0.0 {
            info!("APU shut down: fuel depleted");
            sys.apu_online = false;
        }
    }

    let powered = sys.hydraulic_power();
    sys.col.recenter_step(dt, powered);
}
