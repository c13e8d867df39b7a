use std::env;
use std::error::Error;
use std::process;

use log::error;
use thiserror::Error;

use xr_autopilot::config::AutopilotConfig;
use xr_autopilot::control::AutopilotSuite;
use xr_autopilot::io::{self, FlightSummary};
use xr_autopilot::sim::event::{self, BankCaptureDetector, EventDetector, ModeChangeDetector, TouchdownDetector};
use xr_autopilot::sim::scenario::presets;
use xr_autopilot::sim::PlantState;
use xr_autopilot::vehicle::ThrusterGroup;

#[derive(Debug, Error)]
enum CliError {
    #[error("unknown scenario '{0}' (expected one of: {names})", names = presets::NAMES.join(", "))]
    UnknownScenario(String),
    #[error("option {0} needs a value")]
    MissingValue(String),
    #[error("unknown option {0}")]
    UnknownOption(String),
}

#[derive(Debug, Default)]
struct Options {
    scenario: Option<String>,
    config: Option<String>,
    csv: Option<String>,
    json: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, CliError> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--config" => &mut opts.config,
            "--csv" => &mut opts.csv,
            "--json" => &mut opts.json,
            _ if arg.starts_with("--") => return Err(CliError::UnknownOption(arg)),
            _ => {
                opts.scenario = Some(arg);
                continue;
            }
        };
        *slot = Some(args.next().ok_or_else(|| CliError::MissingValue(arg.clone()))?);
    }
    Ok(opts)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let opts = parse_args(env::args().skip(1))?;

    let config = match &opts.config {
        Some(path) => AutopilotConfig::load(path)?,
        None => AutopilotConfig::default(),
    };

    let name = opts.scenario.as_deref().unwrap_or("autoland");
    let scenario = presets::by_name(name, &config).ok_or_else(|| CliError::UnknownScenario(name.to_string()))?;

    // -----------------------------------------------------------------------
    // Fly
    // -----------------------------------------------------------------------
    let mut suite = AutopilotSuite::new(config);
    let (trajectory, commands) = scenario.run(&mut suite);

    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(TouchdownDetector),
        Box::new(ModeChangeDetector),
        Box::new(BankCaptureDetector::new(0.0, 1.0)),
    ];
    let events = event::detect(&trajectory, &mut detectors);

    let Some(summary) = FlightSummary::from_flight(scenario.name, &scenario.model, &trajectory, &commands, &events)
    else {
        return Ok(());
    };

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  XR AUTOPILOT: {} ({})", scenario.description, scenario.model.name);
    println!("====================================================================");
    println!();
    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &events {
        println!(
            "  t={:>7.2}s  alt={:>9.1}m  {}",
            e.time, e.state.altitude, e.kind
        );
    }
    println!();

    println!("  Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Flight time:   {:>9.1} s     Steps:        {:>8}", summary.flight_time, summary.steps);
    println!("  Final alt:     {:>9.1} m     Airspeed:     {:>8.1} m/s", summary.final_altitude, summary.final_airspeed);
    println!("  Final pitch:   {:>9.1}°      Bank:         {:>8.1}°", summary.final_pitch, summary.final_bank);
    println!("  Max q:         {:>9.0} Pa    COL offset:   {:>8.3} m", summary.max_dynamic_pressure, summary.max_col_offset);
    if let Some(v) = summary.touchdown_speed {
        println!("  Touchdown:     {:>9.2} m/s", v);
    }
    println!("  Warnings:      {:>9}       Mode at end:  {:>8}", summary.warnings, summary.final_mode);
    if summary.crashed {
        println!("  CRASHED");
    }
    println!();

    print_trace(&trajectory);

    if let Some(path) = &opts.csv {
        io::write_trace_file(path, &trajectory)?;
        println!("  Trace written to {path}");
    }
    if let Some(path) = &opts.json {
        io::write_summary_file(path, &summary)?;
        println!("  Summary written to {path}");
    }
    println!("====================================================================");
    println!();
    Ok(())
}

/// Sampled table of the flight, about 30 rows.
fn print_trace(trajectory: &[PlantState]) {
    println!("  Trace");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>7}  {:>7}  {:>6}  {:>6}  {:>5}  {:>6}  {:>12}",
        "t (s)", "alt (m)", "vs", "tas", "pitch", "bank", "hover", "col", "mode"
    );
    println!("  {}", "─".repeat(66));

    let sample_interval = (trajectory.len() / 30).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.1}  {:>7.2}  {:>7.1}  {:>6.1}  {:>6.1}  {:>5.2}  {:>6.2}  {:>12}",
            s.time,
            s.altitude,
            s.vertical_speed,
            s.airspeed(),
            s.pitch,
            s.bank,
            s.systems.levels.get(ThrusterGroup::Hover),
            s.systems.col.position,
            s.systems.mode.to_string(),
        );
    }
    println!();
}
