use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::engine::Engine;
use super::tank::{Tank, TankKind};
use crate::aero::coefficient::Coefficient;
use crate::aero::Geometry;
use crate::sim::scheduler::Model;
use crate::state::{SimState, G0};

// ---------------------------------------------------------------------------
// Aerodynamic axes
// ---------------------------------------------------------------------------

/// The six coefficient groups. Lift/drag/side are resolved through the
/// aerodynamic angles into body axes; roll/pitch/yaw are already body-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AeroAxis {
    Lift,
    Drag,
    Side,
    Roll,
    Pitch,
    Yaw,
}

const AXES: usize = 6;

// ---------------------------------------------------------------------------
// Aircraft: engines, tanks, coefficient groups, geometry, mass
// ---------------------------------------------------------------------------

/// Owns every per-aircraft resource (arena-style: same lifetime as the
/// definition). Each tick it rebuilds the net body forces and moments and
/// refreshes mass as the tanks drain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub name: String,
    pub geometry: Geometry,
    pub empty_weight: f64,          // N
    pub cg_offset: Vector3<f64>,    // m, body frame
    pub eyepoint: Vector3<f64>,     // m, body frame
    inertia: [f64; 4],              // [Ixx, Iyy, Izz, Ixz], kg·m^2
    coefficients: [Vec<Coefficient>; AXES],
    engines: Vec<Engine>,
    tanks: Vec<Tank>,
}

impl Aircraft {
    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    /// Set every engine's commanded throttle. Synced from the shared
    /// state's throttle input at the top of every tick.
    pub fn set_throttles(&mut self, throttle: f64) {
        for engine in &mut self.engines {
            engine.throttle = throttle;
        }
    }

    /// Sum of one axis group's coefficient values.
    fn sum_axis(&self, axis: AeroAxis, state: &SimState) -> f64 {
        self.coefficients[axis as usize]
            .iter()
            .map(|c| c.value(state, &self.geometry))
            .sum()
    }

    /// Draw engine fuel/oxidizer from the selected tanks, flag starvation,
    /// and refresh weight and mass.
    fn update_mass(&mut self, state: &mut SimState) {
        let dt = state.dt;
        for engine in &mut self.engines {
            let mut shortage = 0.0;
            shortage += draw_evenly(&mut self.tanks, TankKind::Fuel, engine.fuel_need(dt));
            let oxidizer = engine.oxidizer_need(dt);
            if oxidizer > 0.0 {
                shortage += draw_evenly(&mut self.tanks, TankKind::Oxidizer, oxidizer);
            }
            engine.set_starved(shortage > 0.0);
        }

        let contents: f64 = self.tanks.iter().map(|t| t.contents).sum();
        state.weight = self.empty_weight + contents * G0;
        state.mass = state.weight / G0;
        state.ixx = self.inertia[0];
        state.iyy = self.inertia[1];
        state.izz = self.inertia[2];
        state.ixz = self.inertia[3];
    }

    /// Lift/drag/side sums resolved into body axes, moments added directly.
    fn update_aerodynamics(&self, state: &mut SimState) {
        let (sin_a, cos_a) = state.alpha.sin_cos();
        let (sin_b, cos_b) = state.beta.sin_cos();

        let lift = self.sum_axis(AeroAxis::Lift, state);
        let drag = self.sum_axis(AeroAxis::Drag, state);
        let side = self.sum_axis(AeroAxis::Side, state);

        state.forces.x += lift * sin_a - drag * cos_a - side * sin_b;
        state.forces.y += side * cos_b;
        state.forces.z += -lift * cos_a - drag * sin_a;

        state.moments.x += self.sum_axis(AeroAxis::Roll, state);
        state.moments.y += self.sum_axis(AeroAxis::Pitch, state);
        state.moments.z += self.sum_axis(AeroAxis::Yaw, state);
    }

    /// Weight resolved through the Euler angles into body axes.
    fn update_gravity(&self, state: &mut SimState) {
        let m = state.mass;
        let (sin_phi, cos_phi) = state.phi.sin_cos();
        let (sin_theta, cos_theta) = state.theta.sin_cos();
        state.forces.x += -G0 * sin_theta * m;
        state.forces.y += G0 * sin_phi * cos_theta * m;
        state.forces.z += G0 * cos_phi * cos_theta * m;
    }

    fn update_propulsion(&mut self, state: &mut SimState) {
        for engine in &mut self.engines {
            state.forces.x += engine.calc_thrust(state.density);
        }
    }

    /// Ground-reaction extension point; no gear physics in this core.
    fn update_gear(&mut self, _state: &mut SimState) {}
}

impl Model for Aircraft {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, state: &mut SimState) {
        state.update_air_data();
        state.forces = Vector3::zeros();
        state.moments = Vector3::zeros();

        // Controls flow through the state; throttle feeds the fuel draw
        // and thrust computations below
        self.set_throttles(state.throttle);

        self.update_mass(state);
        self.update_aerodynamics(state);
        self.update_gravity(state);
        self.update_propulsion(state);
        self.update_gear(state);
    }
}

/// Split a draw evenly across the selected tanks of the matching kind and
/// return the accumulated shortage. No eligible tank means the whole
/// request goes short.
fn draw_evenly(tanks: &mut [Tank], kind: TankKind, amount: f64) -> f64 {
    if amount <= 0.0 {
        return 0.0;
    }
    let eligible = tanks
        .iter()
        .filter(|t| t.selected && t.kind == kind)
        .count();
    if eligible == 0 {
        return amount;
    }
    let per_tank = amount / eligible as f64;
    tanks
        .iter_mut()
        .filter(|t| t.selected && t.kind == kind)
        .map(|t| t.reduce(per_tank))
        .sum()
}

// ---------------------------------------------------------------------------
// Aircraft builder
// ---------------------------------------------------------------------------

pub struct AircraftBuilder {
    name: String,
    geometry: Geometry,
    empty_weight: f64,
    cg_offset: Vector3<f64>,
    eyepoint: Vector3<f64>,
    inertia: [f64; 4],
    coefficients: [Vec<Coefficient>; AXES],
    engines: Vec<Engine>,
    tanks: Vec<Tank>,
}

impl AircraftBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: Geometry::default(),
            empty_weight: 6_000.0,
            cg_offset: Vector3::zeros(),
            eyepoint: Vector3::zeros(),
            inertia: [1_000.0, 1_500.0, 2_000.0, 0.0],
            coefficients: Default::default(),
            engines: vec![],
            tanks: vec![],
        }
    }

    pub fn geometry(mut self, v: Geometry) -> Self { self.geometry = v; self }
    pub fn empty_weight(mut self, v: f64) -> Self { self.empty_weight = v; self }
    pub fn cg_offset(mut self, v: Vector3<f64>) -> Self { self.cg_offset = v; self }
    pub fn eyepoint(mut self, v: Vector3<f64>) -> Self { self.eyepoint = v; self }

    pub fn inertia(mut self, ixx: f64, iyy: f64, izz: f64, ixz: f64) -> Self {
        self.inertia = [ixx, iyy, izz, ixz];
        self
    }

    pub fn coefficient(mut self, axis: AeroAxis, coeff: Coefficient) -> Self {
        self.coefficients[axis as usize].push(coeff);
        self
    }

    pub fn engine(mut self, engine: Engine) -> Self {
        self.engines.push(engine);
        self
    }

    pub fn tank(mut self, tank: Tank) -> Self {
        self.tanks.push(tank);
        self
    }

    pub fn build(self) -> Aircraft {
        Aircraft {
            name: self.name,
            geometry: self.geometry,
            empty_weight: self.empty_weight,
            cg_offset: self.cg_offset,
            eyepoint: self.eyepoint,
            inertia: self.inertia,
            coefficients: self.coefficients,
            engines: self.engines,
            tanks: self.tanks,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::aero::coefficient::Selector;
    use crate::state::InitialConditions;
    use crate::vehicle::engine::{EngineBuilder, EngineKind};

    fn state_at_alpha(alpha_deg: f64) -> SimState {
        let alpha = alpha_deg.to_radians();
        let mut state = SimState::with_initial(
            &InitialConditions {
                u: 50.0 * alpha.cos(),
                w: 50.0 * alpha.sin(),
                altitude: 1_000.0,
                ..Default::default()
            },
            0.01,
        );
        state.density = 0.08; // qbar = 100 Pa at Vt = 50 m/s
        state.sound_speed = 340.0;
        state
    }

    fn lift_only_aircraft() -> Aircraft {
        AircraftBuilder::new("test")
            .geometry(Geometry {
                wing_area: 200.0,
                ..Default::default()
            })
            .empty_weight(10_000.0)
            .coefficient(
                AeroAxis::Lift,
                Coefficient::vector(
                    "CLalpha",
                    Selector::Alpha,
                    vec![[0.0, 0.0], [10.0_f64.to_radians(), 1.0]],
                )
                .scaled_by(Selector::DynamicPressure)
                .scaled_by(Selector::WingArea),
            )
            .build()
    }

    #[test]
    fn table_lift_resolves_into_body_forces() {
        // CL = 0.5 at alpha = 5 deg, qbar = 100, S = 200 => lift 10 kN
        let mut aircraft = lift_only_aircraft();
        let mut state = state_at_alpha(5.0);
        aircraft.run(&mut state);

        let alpha = 5.0_f64.to_radians();
        let lift = 10_000.0;
        // theta = 0, so gravity only appears on the z axis
        assert_relative_eq!(state.forces.x, lift * alpha.sin(), epsilon = 1e-6);
        assert_relative_eq!(
            state.forces.z,
            -lift * alpha.cos() + state.mass * G0,
            epsilon = 1e-6
        );
        assert_relative_eq!(state.forces.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(state.moments.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn forces_are_rebuilt_not_accumulated() {
        let mut aircraft = lift_only_aircraft();
        let mut state = state_at_alpha(5.0);
        aircraft.run(&mut state);
        let first = state.forces;
        aircraft.run(&mut state);
        assert_relative_eq!(state.forces.x, first.x, epsilon = 1e-9);
        assert_relative_eq!(state.forces.z, first.z, epsilon = 1e-9);
    }

    #[test]
    fn gravity_follows_attitude() {
        let mut aircraft = AircraftBuilder::new("brick").empty_weight(9_806.65).build();
        let mut state = state_at_alpha(0.0);
        state.theta = 30.0_f64.to_radians();
        aircraft.run(&mut state);
        let m = state.mass;
        assert_relative_eq!(state.forces.x, -G0 * 0.5 * m, epsilon = 1e-6);
        assert_relative_eq!(
            state.forces.z,
            G0 * (3.0_f64.sqrt() / 2.0) * m,
            epsilon = 1e-6
        );
    }

    #[test]
    fn engine_starves_when_tanks_run_dry() {
        // One engine demanding 150 kg this tick from a 100 kg tank:
        // shortage 50, tank emptied, engine starved in the same tick.
        let mut aircraft = AircraftBuilder::new("thirsty")
            .engine(
                EngineBuilder::new("rocket", EngineKind::Rocket {
                    vac_thrust_max: 2400.0,
                    oxidizer_flow_max: 0.0,
                })
                .thrust_max(2000.0)
                .fuel_flow_max(150.0)
                .build(),
            )
            .tank(Tank::new(TankKind::Fuel, 100.0, 100.0))
            .build();

        let mut state = state_at_alpha(0.0);
        state.throttle = 1.0;
        state.dt = 1.0;
        aircraft.run(&mut state);

        assert!(aircraft.engines()[0].starved());
        assert!(aircraft.engines()[0].flameout);
        assert_eq!(aircraft.tanks()[0].contents, 0.0);
    }

    #[test]
    fn engine_recovers_when_fed() {
        let mut aircraft = AircraftBuilder::new("sipper")
            .engine(
                EngineBuilder::new("piston", EngineKind::Piston)
                    .thrust_max(3000.0)
                    .fuel_flow_max(0.01)
                    .build(),
            )
            .tank(Tank::new(TankKind::Fuel, 100.0, 100.0))
            .build();

        let mut state = state_at_alpha(0.0);
        state.throttle = 1.0;
        aircraft.run(&mut state);
        assert!(!aircraft.engines()[0].starved());
        assert!(aircraft.engines()[0].thrust() > 0.0);
    }

    #[test]
    fn state_throttle_drives_the_engines() {
        let mut aircraft = AircraftBuilder::new("throttled")
            .engine(
                EngineBuilder::new("piston", EngineKind::Piston)
                    .thrust_max(3000.0)
                    .fuel_flow_max(0.01)
                    .build(),
            )
            .tank(Tank::new(TankKind::Fuel, 100.0, 100.0))
            .build();

        let mut state = state_at_alpha(0.0);
        state.throttle = 1.0;
        aircraft.run(&mut state);
        assert_relative_eq!(aircraft.engines()[0].thrust(), 3000.0, epsilon = 1e-9);

        // Pulling the blackboard throttle back next tick is enough
        state.throttle = 0.0;
        aircraft.run(&mut state);
        assert_eq!(aircraft.engines()[0].thrust(), 0.0);
    }

    #[test]
    fn draw_splits_evenly_across_selected_tanks() {
        let mut tanks = vec![
            Tank::new(TankKind::Fuel, 100.0, 50.0),
            Tank::new(TankKind::Fuel, 100.0, 50.0),
            Tank::new(TankKind::Oxidizer, 100.0, 100.0),
        ];
        let shortage = draw_evenly(&mut tanks, TankKind::Fuel, 40.0);
        assert_eq!(shortage, 0.0);
        assert_relative_eq!(tanks[0].contents, 30.0, epsilon = 1e-12);
        assert_relative_eq!(tanks[1].contents, 30.0, epsilon = 1e-12);
        assert_eq!(tanks[2].contents, 100.0);
    }

    #[test]
    fn deselected_tanks_do_not_participate() {
        let mut full = Tank::new(TankKind::Fuel, 100.0, 100.0);
        full.selected = false;
        let mut tanks = vec![full, Tank::new(TankKind::Fuel, 100.0, 10.0)];
        let shortage = draw_evenly(&mut tanks, TankKind::Fuel, 30.0);
        assert_relative_eq!(shortage, 20.0, epsilon = 1e-12);
        assert_eq!(tanks[0].contents, 100.0);
        assert_eq!(tanks[1].contents, 0.0);
    }

    #[test]
    fn no_eligible_tank_means_full_shortage() {
        let mut tanks = vec![Tank::new(TankKind::Fuel, 100.0, 100.0)];
        assert_relative_eq!(
            draw_evenly(&mut tanks, TankKind::Oxidizer, 25.0),
            25.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn weight_tracks_tank_contents() {
        let mut aircraft = AircraftBuilder::new("tanker")
            .empty_weight(5_000.0)
            .tank(Tank::new(TankKind::Fuel, 200.0, 120.0))
            .build();
        let mut state = state_at_alpha(0.0);
        aircraft.run(&mut state);
        assert_relative_eq!(state.weight, 5_000.0 + 120.0 * G0, epsilon = 1e-9);
        assert_relative_eq!(state.mass, state.weight / G0, epsilon = 1e-12);
    }
}
