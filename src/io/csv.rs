use std::io::{self, Write};
use std::path::Path;

use crate::sim::dynamics::air_data;
use crate::sim::PlantState;
use crate::vehicle::ThrusterGroup;

const TRACE_GROUPS: [ThrusterGroup; 9] = [
    ThrusterGroup::Hover,
    ThrusterGroup::Main,
    ThrusterGroup::Retro,
    ThrusterGroup::PitchUp,
    ThrusterGroup::PitchDown,
    ThrusterGroup::BankLeft,
    ThrusterGroup::BankRight,
    ThrusterGroup::YawLeft,
    ThrusterGroup::YawRight,
];

/// Write a flight trace in CSV format.
///
/// Columns: time, altitude, vertical_speed, ground_speed, airspeed,
///          dynamic_pressure, pitch, bank, aoa, omega_x, omega_y, omega_z,
///          one level column per traced thruster group, col, elevator_trim,
///          mode, airspeed_hold, ground_contact
pub fn write_trace<W: Write>(writer: &mut W, trajectory: &[PlantState]) -> io::Result<()> {
    write!(
        writer,
        "time,altitude,vertical_speed,ground_speed,airspeed,dynamic_pressure,\
         pitch,bank,aoa,omega_x,omega_y,omega_z"
    )?;
    for group in TRACE_GROUPS {
        write!(writer, ",{group}")?;
    }
    writeln!(writer, ",col,elevator_trim,mode,airspeed_hold,ground_contact")?;

    for s in trajectory {
        let air = air_data(s);
        write!(
            writer,
            "{:.3},{:.3},{:.4},{:.3},{:.3},{:.1},{:.3},{:.3},{:.3},{:.4},{:.4},{:.4}",
            s.time,
            s.altitude,
            s.vertical_speed,
            s.ground_speed,
            s.airspeed(),
            air.dynamic_pressure,
            s.pitch,
            s.bank,
            air.aoa,
            s.omega.x, s.omega.y, s.omega.z,
        )?;
        for group in TRACE_GROUPS {
            write!(writer, ",{:.4}", s.systems.levels.get(group))?;
        }
        writeln!(
            writer,
            ",{:.4},{:.4},{},{},{}",
            s.systems.col.position,
            s.systems.elevator_trim,
            s.systems.mode,
            s.systems.airspeed_hold as u8,
            s.systems.ground_contact as u8,
        )?;
    }

    Ok(())
}

/// Write a flight trace to a CSV file at the given path.
pub fn write_trace_file(path: impl AsRef<Path>, trajectory: &[PlantState]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trace(&mut file, trajectory)?;
    file.flush()
}
