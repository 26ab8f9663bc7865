use flightdyn::io::json::FlightSummary;
use flightdyn::prelude::*;

fn main() {
    // -----------------------------------------------------------------------
    // Aircraft: "Kestrel" single-engine trainer
    // -----------------------------------------------------------------------
    let mut aircraft = AircraftBuilder::new("Kestrel")
        .geometry(Geometry {
            wing_area: 16.0,  // m^2
            wing_span: 10.0,  // m
            chord: 1.6,       // m
        })
        .empty_weight(6_000.0) // N
        .inertia(1_300.0, 2_500.0, 3_400.0, 80.0)
        // Lift: CL(alpha) table, dimensionalized by qbar * S
        .coefficient(
            AeroAxis::Lift,
            Coefficient::vector(
                "CLalpha",
                Selector::Alpha,
                vec![
                    [(-8.0_f64).to_radians(), -0.55],
                    [0.0, 0.25],
                    [8.0_f64.to_radians(), 1.05],
                    [14.0_f64.to_radians(), 1.45],
                    [18.0_f64.to_radians(), 1.20], // post-stall falloff
                ],
            )
            .scaled_by(Selector::DynamicPressure)
            .scaled_by(Selector::WingArea),
        )
        // Drag: CD(alpha, Mach) bilinear table
        .coefficient(
            AeroAxis::Drag,
            Coefficient::table(
                "CDtotal",
                Selector::Alpha,
                Selector::Mach,
                vec![(-8.0_f64).to_radians(), 0.0, 8.0_f64.to_radians(), 16.0_f64.to_radians()],
                vec![0.0, 0.4],
                vec![
                    vec![0.055, 0.060],
                    vec![0.032, 0.036],
                    vec![0.068, 0.075],
                    vec![0.150, 0.165],
                ],
            )
            .scaled_by(Selector::DynamicPressure)
            .scaled_by(Selector::WingArea),
        )
        // Static pitch stability and damping
        .coefficient(
            AeroAxis::Pitch,
            Coefficient::vector(
                "Cmalpha",
                Selector::Alpha,
                vec![[(-8.0_f64).to_radians(), 0.20], [0.0, 0.02], [16.0_f64.to_radians(), -0.38]],
            )
            .scaled_by(Selector::DynamicPressure)
            .scaled_by(Selector::WingArea)
            .scaled_by(Selector::Chord),
        )
        .coefficient(
            AeroAxis::Pitch,
            Coefficient::constant("Cmq", -0.45)
                .scaled_by(Selector::PitchRate)
                .scaled_by(Selector::DynamicPressure)
                .scaled_by(Selector::WingArea)
                .scaled_by(Selector::Chord),
        )
        .coefficient(
            AeroAxis::Pitch,
            Coefficient::constant("Cmde", -1.1)
                .scaled_by(Selector::Elevator)
                .scaled_by(Selector::DynamicPressure)
                .scaled_by(Selector::WingArea)
                .scaled_by(Selector::Chord),
        )
        // Weathercock stability and roll damping
        .coefficient(
            AeroAxis::Yaw,
            Coefficient::constant("Cnbeta", 0.09)
                .scaled_by(Selector::Beta)
                .scaled_by(Selector::DynamicPressure)
                .scaled_by(Selector::WingArea)
                .scaled_by(Selector::WingSpan),
        )
        .coefficient(
            AeroAxis::Roll,
            Coefficient::constant("Clp", -0.12)
                .scaled_by(Selector::RollRate)
                .scaled_by(Selector::DynamicPressure)
                .scaled_by(Selector::WingArea)
                .scaled_by(Selector::WingSpan),
        )
        .engine(
            EngineBuilder::new("O-360", EngineKind::Piston)
                .thrust_max(2_200.0)     // N
                .fuel_flow_max(0.018)    // kg/s at full power
                .build(),
        )
        .tank(Tank::new(TankKind::Fuel, 90.0, 80.0))
        .build();

    // -----------------------------------------------------------------------
    // Initial conditions: 55 m/s level cruise at 1500 m
    // -----------------------------------------------------------------------
    let ic = InitialConditions {
        u: 55.0,
        latitude: 37.62_f64.to_radians(),
        longitude: (-122.38_f64).to_radians(),
        altitude: 1_500.0,
        ..Default::default()
    };

    let dt = 1.0 / 120.0;
    let duration = 60.0;
    let mut state = SimState::with_initial(&ic, dt);
    state.throttle = 0.65;

    let aircraft_name = aircraft.name.clone();

    let mut scheduler = Scheduler::new();
    scheduler.schedule(Box::new(Atmosphere), 1);
    scheduler.schedule(Box::new(aircraft), 1);
    scheduler.schedule(Box::new(Eom::new()), 1);

    // -----------------------------------------------------------------------
    // Run
    // -----------------------------------------------------------------------
    let ticks = (duration / dt) as usize;
    let mut trajectory = Vec::with_capacity(ticks + 1);
    trajectory.push(state.clone());
    for _ in 0..ticks {
        scheduler.tick(&mut state);
        trajectory.push(state.clone());
    }

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    let summary = FlightSummary::from_trajectory(&trajectory)
        .expect("trajectory is never empty here");

    println!();
    println!("====================================================================");
    println!("  FLIGHT DYNAMICS SIMULATION — {}", aircraft_name);
    println!("====================================================================");
    println!();
    println!("  Setup");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Initial:   {:>6.1} m/s at {:>6.0} m     Throttle: {:.0}%",
        ic.u,
        ic.altitude,
        state.throttle * 100.0
    );
    println!(
        "  Timestep:  {:>8.4} s ({} Hz)         Duration: {:.0} s",
        dt,
        (1.0 / dt).round(),
        duration
    );
    println!();
    println!("  Performance");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Max altitude:  {:>8.0} m     Max airspeed: {:>6.1} m/s (Mach {:.3})",
        summary.max_altitude, summary.max_speed, summary.max_mach
    );
    println!(
        "  Max qbar:      {:>8.0} Pa    Final:        {:>6.1} m/s at {:.0} m",
        summary.max_qbar, summary.final_speed, summary.final_altitude
    );
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>9}  {:>8}  {:>8}  {:>8}",
        "t (s)", "alt (m)", "Vt (m/s)", "alpha°", "theta°", "mass(kg)"
    );
    println!("  {}", "─".repeat(60));

    let sample_interval = (trajectory.len() / 20).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>8.1}  {:>9.1}  {:>8.2}  {:>8.2}  {:>8.1}",
            s.sim_time,
            s.altitude,
            s.vt,
            s.alpha.to_degrees(),
            s.theta.to_degrees(),
            s.mass,
        );
    }

    println!();
    println!("  Simulation: {} ticks, dt={:.4} s", ticks, dt);
    println!("====================================================================");
    println!();
}
