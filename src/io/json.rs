use std::io::{self, Write};

use crate::state::SimState;

/// Summary statistics computed from a recorded flight.
#[derive(Debug, Clone)]
pub struct FlightSummary {
    pub max_altitude: f64,
    pub max_speed: f64,
    pub max_mach: f64,
    pub max_qbar: f64,
    pub flight_time: f64,
    pub final_altitude: f64,
    pub final_speed: f64,
}

impl FlightSummary {
    /// Compute summary from trajectory data. Returns None for an empty
    /// trajectory.
    pub fn from_trajectory(trajectory: &[SimState]) -> Option<Self> {
        let last = trajectory.last()?;

        let max_altitude = trajectory
            .iter()
            .map(|s| s.altitude)
            .fold(f64::MIN, f64::max);
        let max_speed = trajectory.iter().map(|s| s.vt).fold(0.0_f64, f64::max);
        let max_mach = trajectory.iter().map(|s| s.mach).fold(0.0_f64, f64::max);
        let max_qbar = trajectory.iter().map(|s| s.qbar).fold(0.0_f64, f64::max);

        Some(FlightSummary {
            max_altitude,
            max_speed,
            max_mach,
            max_qbar,
            flight_time: last.sim_time,
            final_altitude: last.altitude,
            final_speed: last.vt,
        })
    }
}

/// Write a flight summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    aircraft_name: &str,
    summary: &FlightSummary,
) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"aircraft\": \"{}\",", aircraft_name)?;
    writeln!(writer, "  \"performance\": {{")?;
    writeln!(writer, "    \"max_altitude_m\": {:.2},", summary.max_altitude)?;
    writeln!(writer, "    \"max_speed_ms\": {:.2},", summary.max_speed)?;
    writeln!(writer, "    \"max_mach\": {:.3},", summary.max_mach)?;
    writeln!(writer, "    \"max_qbar_pa\": {:.2},", summary.max_qbar)?;
    writeln!(writer, "    \"flight_time_s\": {:.2},", summary.flight_time)?;
    writeln!(writer, "    \"final_altitude_m\": {:.2},", summary.final_altitude)?;
    writeln!(writer, "    \"final_speed_ms\": {:.2}", summary.final_speed)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write a flight summary JSON to a file.
pub fn write_summary_file(
    path: &str,
    aircraft_name: &str,
    summary: &FlightSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, aircraft_name, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{InitialConditions, SimState};

    fn simple_trajectory() -> Vec<SimState> {
        let base = SimState::with_initial(
            &InitialConditions {
                u: 60.0,
                altitude: 1_000.0,
                ..Default::default()
            },
            0.01,
        );
        let mut mid = base.clone();
        mid.sim_time = 10.0;
        mid.altitude = 2_500.0;
        mid.vt = 80.0;
        let mut end = base.clone();
        end.sim_time = 20.0;
        end.altitude = 1_200.0;
        end.vt = 55.0;
        vec![base, mid, end]
    }

    #[test]
    fn summary_finds_peaks_and_final_state() {
        let s = FlightSummary::from_trajectory(&simple_trajectory()).unwrap();
        assert!((s.max_altitude - 2_500.0).abs() < 0.1);
        assert!((s.max_speed - 80.0).abs() < 0.1);
        assert!((s.flight_time - 20.0).abs() < 0.1);
        assert!((s.final_altitude - 1_200.0).abs() < 0.1);
    }

    #[test]
    fn empty_trajectory_has_no_summary() {
        assert!(FlightSummary::from_trajectory(&[]).is_none());
    }

    #[test]
    fn json_output_is_valid() {
        let summary = FlightSummary::from_trajectory(&simple_trajectory()).unwrap();
        let mut buf = Vec::new();
        write_summary(&mut buf, "Trainer", &summary).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"aircraft\": \"Trainer\""));
        assert!(json.contains("\"max_altitude_m\""));
        assert!(json.contains("\"flight_time_s\""));
    }
}
