use std::io::{self, Write};

use crate::state::SimState;

/// Write the telemetry header row.
///
/// Columns: time, lat/lon (deg), altitude, body velocities, rates,
/// attitude (deg), air data, forces, moments, mass.
pub fn write_header<W: Write>(writer: &mut W) -> io::Result<()> {
    writeln!(
        writer,
        "time,lat_deg,lon_deg,alt_m,u,v,w,p,q,r,\
         phi_deg,theta_deg,psi_deg,alpha_deg,beta_deg,\
         vt,qbar,mach,fx,fy,fz,l,m,n,mass"
    )
}

/// Write one telemetry row for the current state. A host typically calls
/// this every tick, or at a decimated rate.
pub fn write_row<W: Write>(writer: &mut W, state: &SimState) -> io::Result<()> {
    writeln!(
        writer,
        "{:.4},{:.8},{:.8},{:.2},{:.4},{:.4},{:.4},{:.6},{:.6},{:.6},\
         {:.3},{:.3},{:.3},{:.3},{:.3},\
         {:.3},{:.3},{:.4},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.3}",
        state.sim_time,
        state.latitude.to_degrees(),
        state.longitude.to_degrees(),
        state.altitude,
        state.u,
        state.v,
        state.w,
        state.p,
        state.q,
        state.r,
        state.phi.to_degrees(),
        state.theta.to_degrees(),
        state.psi.to_degrees(),
        state.alpha.to_degrees(),
        state.beta.to_degrees(),
        state.vt,
        state.qbar,
        state.mach,
        state.forces.x,
        state.forces.y,
        state.forces.z,
        state.moments.x,
        state.moments.y,
        state.moments.z,
        state.mass,
    )
}

/// Write a recorded trajectory (header plus one row per state).
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[SimState]) -> io::Result<()> {
    write_header(writer)?;
    for state in trajectory {
        write_row(writer, state)?;
    }
    Ok(())
}

/// Write a recorded trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, trajectory: &[SimState]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::InitialConditions;

    #[test]
    fn csv_output_has_header_and_rows() {
        let a = SimState::with_initial(
            &InitialConditions {
                u: 50.0,
                altitude: 1_000.0,
                ..Default::default()
            },
            0.01,
        );
        let mut b = a.clone();
        b.sim_time = 0.01;
        let traj = vec![a, b];

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,"));
        assert_eq!(
            lines[0].split(',').count(),
            lines[1].split(',').count(),
            "row width should match the header"
        );
    }
}
