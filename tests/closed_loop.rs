//! Closed-loop flights: the autopilot suite flying the simulated ship.

use xr_autopilot::config::AutopilotConfig;
use xr_autopilot::control::{AutopilotMode, AutopilotSuite};
use xr_autopilot::sim::event::{self, BankCaptureDetector, EventDetector, EventKind, TouchdownDetector};
use xr_autopilot::sim::scenario::presets;
use xr_autopilot::sim::{simulate_with, PilotAction, PilotEvent, PlantState, SimConfig};
use xr_autopilot::vehicle::{self, AdvisoryKind, AutopilotCommand, ThrusterGroup, VehicleModel, G0};

// =============================================================================
// Fixtures
// =============================================================================

struct Flight {
    trajectory: Vec<PlantState>,
    commands: Vec<AutopilotCommand>,
}

fn fly(model: &VehicleModel, sim: SimConfig, initial: PlantState, pilot: &[PilotEvent]) -> Flight {
    let mut suite = AutopilotSuite::new(AutopilotConfig::default());
    let (trajectory, commands) = simulate_with(model, &sim, initial, &mut suite, pilot);
    Flight { trajectory, commands }
}

/// A ship coasting high above the atmosphere.
fn in_vacuum(model: &VehicleModel) -> PlantState {
    PlantState::at_rest(model, AutopilotConfig::default().col, 150_000.0)
}

fn roll_to(pitch: f64, bank: f64) -> Vec<PilotEvent> {
    vec![
        PilotEvent::new(0.0, PilotAction::SetAttitude { pitch_or_aoa: pitch, bank, hold_aoa: false }),
        PilotEvent::new(0.0, PilotAction::EngageAttitudeHold),
    ]
}

// =============================================================================
// Descent hold
// =============================================================================

#[test]
fn autoland_touches_down_softly() {
    let scenario = presets::autoland(&AutopilotConfig::default());
    let mut suite = AutopilotSuite::default();
    let (trajectory, commands) = scenario.run(&mut suite);

    let mut detectors: Vec<Box<dyn EventDetector>> = vec![Box::new(TouchdownDetector)];
    let events = event::detect(&trajectory, &mut detectors);
    let sink = events
        .iter()
        .find_map(|e| match e.kind {
            EventKind::Touchdown { vertical_speed } => Some(vertical_speed),
            _ => None,
        })
        .expect("ship should land");
    assert!(sink > -0.5 && sink <= 0.0, "touchdown at {sink} m/s");

    let last = trajectory.last().unwrap();
    assert!(!last.systems.crashed);
    assert_eq!(last.systems.mode, AutopilotMode::Off);
    assert_eq!(last.systems.levels.get(ThrusterGroup::Hover), 0.0);
    assert!(last.systems.levels.attitude_idle());
    assert!(commands.iter().any(|c| c.advisories.iter().any(|a| a.kind == AdvisoryKind::Touchdown)));
    assert_eq!(suite.state.targets.descent_rate, 0.0);
}

#[test]
fn hover_level_does_not_depend_on_step_size() {
    let model = vehicle::presets::delta_glider();
    let initial = PlantState::at_rest(&model, AutopilotConfig::default().col, 500.0);
    let pilot = [PilotEvent::new(0.0, PilotAction::EngageDescentHold)];

    let coarse = fly(&model, SimConfig { dt: 0.02, max_time: 30.0, ..Default::default() }, initial.clone(), &pilot);
    let fine = fly(&model, SimConfig { dt: 0.01, max_time: 30.0, ..Default::default() }, initial, &pilot);

    let level = |f: &Flight| f.trajectory.last().unwrap().systems.levels.get(ThrusterGroup::Hover);
    let (a, b) = (level(&coarse), level(&fine));
    assert!((a - b).abs() < 1e-3, "hover {a} vs {b}");

    let hover_weight = 20_000.0 * G0 / 300_000.0;
    assert!((a - hover_weight).abs() < 2e-3, "hover {a}, expected about {hover_weight}");
    assert!(coarse.trajectory.last().unwrap().vertical_speed.abs() < 0.05);
}

#[test]
fn closing_hover_doors_drops_descent_hold() {
    let model = vehicle::presets::delta_glider();
    let initial = PlantState::at_rest(&model, AutopilotConfig::default().col, 800.0);
    let pilot = [
        PilotEvent::new(0.0, PilotAction::EngageDescentHold),
        PilotEvent::new(2.0, PilotAction::HoverDoors { open: false }),
    ];
    let flight = fly(&model, SimConfig { max_time: 4.0, ..Default::default() }, initial, &pilot);

    assert!(flight
        .commands
        .iter()
        .any(|c| c.advisories.iter().any(|a| a.kind == AdvisoryKind::HoverDoorsClosed)));
    let last = flight.trajectory.last().unwrap();
    assert_eq!(last.systems.mode, AutopilotMode::Off);
    assert_eq!(last.systems.levels.get(ThrusterGroup::Hover), 0.0);
    assert!(last.systems.levels.attitude_idle());
}

// =============================================================================
// Attitude hold
// =============================================================================

#[test]
fn attitude_hold_captures_bank_then_pitch() {
    let model = vehicle::presets::delta_glider();
    let flight = fly(&model, SimConfig { max_time: 60.0, ..Default::default() }, in_vacuum(&model), &roll_to(10.0, 30.0));

    let mut detectors: Vec<Box<dyn EventDetector>> = vec![Box::new(BankCaptureDetector::new(30.0, 1.0))];
    let events = event::detect(&flight.trajectory, &mut detectors);
    assert_eq!(events.len(), 1, "bank should be captured");

    let last = flight.trajectory.last().unwrap();
    assert!((last.bank - 30.0).abs() < 1.0, "bank {}", last.bank);
    assert!((last.pitch - 10.0).abs() < 1.0, "pitch {}", last.pitch);
    assert!(last.omega.norm() < 0.5, "still turning at {:?}", last.omega);
}

#[test]
fn attitude_capture_holds_across_frame_rates() {
    let model = vehicle::presets::delta_glider();
    for dt in [0.02, 0.05] {
        let flight = fly(
            &model,
            SimConfig { dt, max_time: 60.0, ..Default::default() },
            in_vacuum(&model),
            &roll_to(0.0, -40.0),
        );
        let last = flight.trajectory.last().unwrap();
        assert!((last.bank + 40.0).abs() < 1.0, "dt {dt}: bank {}", last.bank);
    }
}

/// Net nose-up RCS level averaged from `from` seconds on.
fn mean_net_pitch(flight: &Flight, from: f64) -> f64 {
    let net: Vec<f64> = flight
        .trajectory
        .iter()
        .filter(|s| s.time >= from)
        .map(|s| s.systems.levels.get(ThrusterGroup::PitchUp) - s.systems.levels.get(ThrusterGroup::PitchDown))
        .collect();
    net.iter().sum::<f64>() / net.len() as f64
}

#[test]
fn pitch_trim_does_not_depend_on_frame_time() {
    let model = vehicle::presets::delta_glider();
    let mut initial = PlantState::at_rest(&model, AutopilotConfig::default().col, 3_000.0);
    initial.ground_speed = 150.0;
    initial.pitch = 10.0;
    let pilot = [
        PilotEvent::new(0.0, PilotAction::SetAttitude { pitch_or_aoa: 10.0, bank: 0.0, hold_aoa: false }),
        PilotEvent::new(0.0, PilotAction::EngageAttitudeHold),
        PilotEvent::new(0.0, PilotAction::AirspeedHold(Some(150.0))),
    ];

    // both frames are longer than the 25 ms reference, so thrust is scaled down
    let runs: Vec<Flight> = [0.05, 0.1]
        .into_iter()
        .map(|dt| fly(&model, SimConfig { dt, max_time: 60.0, ..Default::default() }, initial.clone(), &pilot))
        .collect();

    let (a, b) = (mean_net_pitch(&runs[0], 30.0), mean_net_pitch(&runs[1], 30.0));
    assert!((a - b).abs() < 0.02, "mean net pitch {a} vs {b}");

    let col = |f: &Flight| f.trajectory.last().unwrap().systems.col.position;
    assert!((col(&runs[0]) - col(&runs[1])).abs() < 0.25, "COL {} vs {}", col(&runs[0]), col(&runs[1]));
    for f in &runs {
        let last = f.trajectory.last().unwrap();
        assert!((last.pitch - 10.0).abs() < 2.0, "pitch {}", last.pitch);
    }
}

#[test]
fn pilot_cannot_move_col_while_autopilot_owns_it() {
    let model = vehicle::presets::delta_glider();
    let mut pilot = roll_to(0.0, 0.0);
    pilot.extend([
        PilotEvent::new(1.0, PilotAction::ManualColShift(0.5)),
        PilotEvent::new(2.0, PilotAction::DisengageCustom),
        PilotEvent::new(3.0, PilotAction::ManualColShift(0.5)),
    ]);
    let flight = fly(&model, SimConfig { max_time: 4.0, ..Default::default() }, in_vacuum(&model), &pilot);

    for s in flight.trajectory.iter().filter(|s| s.time > 1.1 && s.time < 2.9) {
        assert_eq!(s.systems.col.position, 0.0, "shifted at t={}", s.time);
    }
    let last = flight.trajectory.last().unwrap();
    assert!(!last.systems.col.auto_mode);
    assert_eq!(last.systems.col.position, 0.5);
}

#[test]
fn releasing_attitude_hold_zeroes_the_jets() {
    let model = vehicle::presets::delta_glider();
    let mut pilot = roll_to(0.0, 60.0);
    pilot.push(PilotEvent::new(1.0, PilotAction::DisengageCustom));
    let flight = fly(&model, SimConfig { max_time: 3.0, ..Default::default() }, in_vacuum(&model), &pilot);

    assert!(flight.trajectory.iter().any(|s| s.time < 1.0 && !s.systems.levels.attitude_idle()));
    for s in flight.trajectory.iter().filter(|s| s.time > 1.1) {
        assert_eq!(s.systems.mode, AutopilotMode::Off);
        assert!(s.systems.levels.attitude_idle(), "jets still firing at t={}", s.time);
        assert!(!s.systems.col.auto_mode);
    }
}

#[test]
fn high_time_acceleration_freezes_the_jets() {
    let model = vehicle::presets::delta_glider();
    let mut pilot = roll_to(0.0, 60.0);
    pilot.push(PilotEvent::new(1.0, PilotAction::TimeAcceleration(150.0)));
    let flight = fly(&model, SimConfig { max_time: 60.0, ..Default::default() }, in_vacuum(&model), &pilot);

    let first = flight
        .commands
        .iter()
        .position(|c| c.telemetry.attitude_suspended)
        .expect("attitude hold should suspend above 100x");
    let frozen = flight.trajectory[first - 1].systems.levels;
    for (cmd, s) in flight.commands[first..].iter().zip(&flight.trajectory[first..]) {
        assert!(cmd.thrusters.is_empty());
        assert_eq!(s.systems.levels, frozen);
    }
}

#[test]
fn incapacitated_crew_leaves_the_ship_alone() {
    let model = vehicle::presets::delta_glider();
    let mut pilot = roll_to(0.0, 60.0);
    pilot.push(PilotEvent::new(1.0, PilotAction::IncapacitateCrew));
    let flight = fly(&model, SimConfig { max_time: 5.0, ..Default::default() }, in_vacuum(&model), &pilot);

    let first = flight
        .trajectory
        .iter()
        .position(|s| s.systems.crew_incapacitated)
        .unwrap();
    for cmd in &flight.commands[first + 1..] {
        assert!(cmd.is_inert());
    }
    let levels = flight.trajectory[first].systems.levels;
    assert!(flight.trajectory[first..].iter().all(|s| s.systems.levels == levels));
}

// =============================================================================
// Reentry and cruise
// =============================================================================

#[test]
fn reentry_learns_pitch_thrust_and_trims_with_col() {
    let scenario = presets::reentry(&AutopilotConfig::default());
    let mut suite = AutopilotSuite::default();
    let (trajectory, commands) = scenario.run(&mut suite);

    assert!(commands.iter().any(|c| c.telemetry.learning_thrust_frac > 0.0));
    assert!(trajectory.iter().any(|s| s.systems.col.position > 0.0), "COL should shift nose-up");
    assert!(trajectory.iter().all(|s| s.systems.col.position.abs() <= 4.115 + 1e-9));

    let window: Vec<f64> = trajectory
        .iter()
        .filter(|s| s.time >= 40.0 && s.time <= 60.0)
        .map(|s| xr_autopilot::sim::dynamics::air_data(s).aoa)
        .collect();
    let mean_error = window.iter().map(|a| (a - 30.0).abs()).sum::<f64>() / window.len() as f64;
    assert!(mean_error < 3.0, "mean AOA error {mean_error}");
}

#[test]
fn landing_drops_airspeed_hold() {
    let model = vehicle::presets::delta_glider();
    let mut initial = PlantState::at_rest(&model, AutopilotConfig::default().col, 30.0);
    initial.ground_speed = 60.0;
    let pilot = [
        PilotEvent::new(0.0, PilotAction::ToggleAirspeedHold { hold_current: true }),
        PilotEvent::new(0.0, PilotAction::AutoLand),
    ];
    let sim = SimConfig { max_time: 120.0, stop_after_touchdown: Some(1.0), ..Default::default() };
    let flight = fly(&model, sim, initial, &pilot);

    assert!(flight.trajectory.iter().any(|s| s.systems.airspeed_hold && !s.systems.ground_contact));
    let last = flight.trajectory.last().unwrap();
    assert!(last.systems.ground_contact);
    assert!(!last.systems.airspeed_hold);
    assert_eq!(last.systems.levels.get(ThrusterGroup::Main), 0.0);
    assert_eq!(last.systems.levels.get(ThrusterGroup::Retro), 0.0);
}

#[test]
fn cruise_holds_airspeed() {
    let scenario = presets::cruise(&AutopilotConfig::default());
    let mut suite = AutopilotSuite::default();
    let (trajectory, commands) = scenario.run(&mut suite);

    for s in trajectory.iter().filter(|s| s.time >= 50.0 && s.time <= 60.0) {
        assert!((s.airspeed() - 150.0).abs() < 5.0, "airspeed {} at t={}", s.airspeed(), s.time);
    }
    assert!(commands.iter().any(|c| c.thrusters.get(ThrusterGroup::Main).is_some_and(|l| l > 0.0)));
    assert!(!trajectory.last().unwrap().systems.crashed);
}
