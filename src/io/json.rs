use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::dynamics::air_data;
use crate::sim::event::{EventKind, SimEvent};
use crate::sim::PlantState;
use crate::vehicle::{AutopilotCommand, Severity, VehicleModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub time: f64,
    pub description: String,
}

/// Summary statistics computed from a closed-loop flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub scenario: String,
    pub vehicle: String,
    pub steps: usize,
    pub flight_time: f64,
    pub final_altitude: f64,
    pub final_airspeed: f64,
    pub final_pitch: f64,
    pub final_bank: f64,
    pub final_mode: String,
    pub max_dynamic_pressure: f64,
    pub max_col_offset: f64,
    pub touchdown_speed: Option<f64>,
    pub crashed: bool,
    pub warnings: usize,
    pub events: Vec<EventRecord>,
}

impl FlightSummary {
    /// Compute the summary. `None` for an empty trajectory.
    pub fn from_flight(
        scenario: &str,
        model: &VehicleModel,
        trajectory: &[PlantState],
        commands: &[AutopilotCommand],
        events: &[SimEvent],
    ) -> Option<Self> {
        let last = trajectory.last()?;

        let max_dynamic_pressure = trajectory
            .iter()
            .map(|s| air_data(s).dynamic_pressure)
            .fold(0.0_f64, f64::max);

        let max_col_offset = trajectory
            .iter()
            .map(|s| (s.systems.col.position - s.systems.col.limits.neutral).abs())
            .fold(0.0_f64, f64::max);

        let touchdown_speed = events.iter().find_map(|e| match e.kind {
            EventKind::Touchdown { vertical_speed } => Some(vertical_speed),
            _ => None,
        });

        let warnings = commands
            .iter()
            .flat_map(|c| c.advisories.iter())
            .filter(|a| a.severity == Severity::Warning)
            .count();

        Some(FlightSummary {
            scenario: scenario.to_string(),
            vehicle: model.name.clone(),
            steps: trajectory.len(),
            flight_time: last.time,
            final_altitude: last.altitude,
            final_airspeed: last.airspeed(),
            final_pitch: last.pitch,
            final_bank: last.bank,
            final_mode: last.systems.mode.to_string(),
            max_dynamic_pressure,
            max_col_offset,
            touchdown_speed,
            crashed: last.systems.crashed,
            warnings,
            events: events
                .iter()
                .map(|e| EventRecord { time: e.time, description: e.kind.to_string() })
                .collect(),
        })
    }
}

/// Write flight summary as pretty-printed JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &FlightSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
