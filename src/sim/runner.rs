use log::{info, warn};
use nalgebra::Vector3;

use super::dynamics::GROUND_TOLERANCE;
use super::host;
use super::integrator::rk4_step;
use super::pilot::{apply_action, PilotEvent};
use super::state::PlantState;
use crate::control::AutopilotSuite;
use crate::vehicle::{AutopilotCommand, VehicleModel};

/// Sink rate beyond which gear contact is a crash, m/s.
pub const CRASH_VERTICAL_SPEED: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    pub dt: f64,                        // s of real time per step
    pub max_time: f64,                  // s of sim time
    pub time_acceleration: f64,         // initial factor
    pub stop_after_touchdown: Option<f64>, // s to keep running after contact
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { dt: 0.02, max_time: 300.0, time_acceleration: 1.0, stop_after_touchdown: None }
    }
}

// ---------------------------------------------------------------------------
// Ground contact
// ---------------------------------------------------------------------------

/// Put the ship on the gear if it reached the ground this step. Returns the
/// sink rate at contact when the gear just touched.
fn settle_on_ground(state: &mut PlantState) -> Option<f64> {
    let was_grounded = state.systems.ground_contact;
    if state.altitude > GROUND_TOLERANCE {
        state.systems.ground_contact = false;
        return None;
    }
    let sink = state.vertical_speed;
    state.altitude = 0.0;
    state.vertical_speed = state.vertical_speed.max(0.0);
    state.omega = Vector3::zeros();
    state.systems.ground_contact = true;
    (!was_grounded).then_some(sink)
}

// ---------------------------------------------------------------------------
// Closed-loop simulation
// ---------------------------------------------------------------------------

/// Fly `model` from `initial` with `suite` in the loop, applying the
/// scripted `pilot` inputs as their times come up. Returns the trajectory
/// and the autopilot command issued at each step.
pub fn simulate_with(
    model: &VehicleModel,
    config: &SimConfig,
    initial: PlantState,
    suite: &mut AutopilotSuite,
    pilot: &[PilotEvent],
) -> (Vec<PlantState>, Vec<AutopilotCommand>) {
    let mut schedule = pilot.to_vec();
    schedule.sort_by(|a, b| a.time.total_cmp(&b.time));
    let mut schedule = schedule.into_iter().peekable();

    let mut state = initial;
    state.systems.ground_contact = state.altitude <= GROUND_TOLERANCE;
    state.systems.mode = suite.state.mode();
    state.systems.airspeed_hold = suite.state.airspeed_hold_engaged();

    let cap = ((config.max_time / config.dt) as usize + 1).min(200_000);
    let mut trajectory = Vec::with_capacity(cap);
    let mut commands = Vec::with_capacity(cap);
    trajectory.push(state.clone());
    commands.push(AutopilotCommand::default());

    let mut time_acc = config.time_acceleration;
    let mut touchdown_time = None;

    while state.time < config.max_time {
        let step_dt = config.dt * time_acc;
        while let Some(event) = schedule.next_if(|e| e.time <= state.time) {
            let snap = host::snapshot(&state, model, step_dt, time_acc);
            time_acc = apply_action(&event.action, suite, &snap, &mut state.systems, time_acc);
        }
        let step_dt = config.dt * time_acc;

        let snap = host::snapshot(&state, model, step_dt, time_acc);
        let cmd = suite.step(&snap);
        host::apply_command(&mut state.systems, &cmd, model);
        state.systems.mode = suite.state.mode();
        state.systems.airspeed_hold = suite.state.airspeed_hold_engaged();

        state = rk4_step(&state, model, step_dt);
        host::update_systems(&mut state.systems, step_dt);
        state.normalize_attitude();

        if let Some(sink) = settle_on_ground(&mut state) {
            if sink < -CRASH_VERTICAL_SPEED {
                warn!("t={:.2}s crashed at {:.2} m/s", state.time, sink);
                state.systems.crashed = true;
            } else {
                info!("t={:.2}s touchdown at {:.2} m/s", state.time, sink);
            }
            touchdown_time.get_or_insert(state.time);
        }

        let crashed = state.systems.crashed;
        trajectory.push(state.clone());
        commands.push(cmd);

        if crashed {
            break;
        }
        if let (Some(settle), Some(t)) = (config.stop_after_touchdown, touchdown_time) {
            if state.time >= t + settle {
                break;
            }
        }
    }

    (trajectory, commands)
}

/// Simulate with a default-configured suite and no pilot inputs.
pub fn simulate(model: &VehicleModel, config: &SimConfig, initial: PlantState) -> (Vec<PlantState>, Vec<AutopilotCommand>) {
    let mut suite = AutopilotSuite::default();
    simulate_with(model, config, initial, &mut suite, &[])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColLimits;
    use crate::control::AutopilotMode;
    use crate::sim::pilot::PilotAction;
    use crate::vehicle::{presets, ThrusterGroup};

    #[test]
    fn unpowered_ship_falls_and_crashes() {
        let model = presets::delta_glider();
        let initial = PlantState::at_rest(&model, ColLimits::default(), 200.0);
        let config = SimConfig { max_time: 60.0, ..Default::default() };
        let (traj, _) = simulate(&model, &config, initial);
        let last = traj.last().unwrap();
        assert!(last.systems.crashed);
        assert_eq!(last.altitude, 0.0);
        assert!(last.time < 60.0);
    }

    #[test]
    fn pilot_events_fire_on_time() {
        let model = presets::delta_glider();
        let initial = PlantState::at_rest(&model, ColLimits::default(), 500.0);
        let config = SimConfig { max_time: 2.0, ..Default::default() };
        let mut suite = AutopilotSuite::default();
        let pilot = [PilotEvent::new(1.0, PilotAction::EngageDescentHold)];
        let (traj, cmds) = simulate_with(&model, &config, initial, &mut suite, &pilot);

        let engaged_at = traj.iter().find(|s| s.systems.mode == AutopilotMode::DescentHold).unwrap().time;
        assert!(engaged_at > 1.0 && engaged_at <= 1.05, "engaged at {engaged_at}");
        assert!(cmds.iter().any(|c| c.thrusters.get(ThrusterGroup::Hover).is_some()));
    }

    #[test]
    fn time_acceleration_stretches_steps() {
        let model = presets::delta_glider();
        let initial = PlantState::at_rest(&model, ColLimits::default(), 5_000.0);
        let config = SimConfig { max_time: 10.0, time_acceleration: 10.0, ..Default::default() };
        let (traj, _) = simulate(&model, &config, initial);
        assert!((traj[1].time - 0.2).abs() < 1e-12);
        assert!(traj.len() <= 52);
    }

    #[test]
    fn trajectory_and_commands_line_up() {
        let model = presets::delta_glider();
        let initial = PlantState::at_rest(&model, ColLimits::default(), 1_000.0);
        let config = SimConfig { max_time: 1.0, ..Default::default() };
        let (traj, cmds) = simulate(&model, &config, initial);
        assert_eq!(traj.len(), cmds.len());
    }
}
