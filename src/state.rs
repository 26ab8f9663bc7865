use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // standard gravity, m/s^2
pub const EARTH_RADIUS: f64 = 6_371_000.0; // mean Earth radius, m

/// Below this airspeed the aerodynamic angles are undefined and held at zero.
const MIN_AIRSPEED: f64 = 0.1;

// ---------------------------------------------------------------------------
// Shared simulation state (the per-tick blackboard)
// ---------------------------------------------------------------------------

/// Every kinematic and dynamic quantity the update models read and write.
///
/// Allocated once at engine start and mutated in place every tick; no model
/// allocates per tick. Forces and moments are zeroed and rebuilt by the
/// aircraft aggregator before the integrator reads them; velocities, rates,
/// attitude and position persist across ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub sim_time: f64,                  // s
    pub dt: f64,                        // s, fixed timestep

    // Body-axis velocities (x forward, y right, z down)
    pub u: f64,                         // m/s
    pub v: f64,                         // m/s
    pub w: f64,                         // m/s

    // Body-axis angular rates
    pub p: f64,                         // rad/s, roll
    pub q: f64,                         // rad/s, pitch
    pub r: f64,                         // rad/s, yaw

    // Net body-axis force and moment, rebuilt every tick
    pub forces: Vector3<f64>,           // N   [Fx, Fy, Fz]
    pub moments: Vector3<f64>,          // N·m [L, M, N]

    // Attitude
    pub quat: UnitQuaternion<f64>,      // body→local rotation
    pub phi: f64,                       // rad, derived roll
    pub theta: f64,                     // rad, derived pitch
    pub psi: f64,                       // rad, derived heading

    // Geodetic position
    pub latitude: f64,                  // rad
    pub longitude: f64,                 // rad
    pub altitude: f64,                  // m above sea level

    // Air data
    pub alpha: f64,                     // rad, angle of attack
    pub beta: f64,                      // rad, sideslip
    pub alpha_dot: f64,                 // rad/s
    pub beta_dot: f64,                  // rad/s
    pub vt: f64,                        // m/s, true airspeed
    pub qbar: f64,                      // Pa, dynamic pressure
    pub mach: f64,
    pub density: f64,                   // kg/m^3, ambient
    pub sound_speed: f64,               // m/s, ambient

    // Mass properties
    pub mass: f64,                      // kg
    pub weight: f64,                    // N
    pub ixx: f64,                       // kg·m^2
    pub iyy: f64,
    pub izz: f64,
    pub ixz: f64,

    // Control inputs, written by the external control provider
    pub elevator: f64,                  // rad
    pub aileron: f64,                   // rad
    pub rudder: f64,                    // rad
    pub throttle: f64,                  // 0-1
}

impl SimState {
    /// Build the initial state from host-supplied initial conditions,
    /// deriving the quaternion from the Euler angles and the aerodynamic
    /// angles and airspeed from the body velocities.
    pub fn with_initial(ic: &InitialConditions, dt: f64) -> Self {
        let quat = UnitQuaternion::from_euler_angles(ic.phi, ic.theta, ic.psi);
        let vt = (ic.u * ic.u + ic.v * ic.v + ic.w * ic.w).sqrt();
        let (alpha, beta) = aero_angles(ic.u, ic.v, ic.w, vt);

        SimState {
            sim_time: 0.0,
            dt,
            u: ic.u,
            v: ic.v,
            w: ic.w,
            p: 0.0,
            q: 0.0,
            r: 0.0,
            forces: Vector3::zeros(),
            moments: Vector3::zeros(),
            quat,
            phi: ic.phi,
            theta: ic.theta,
            psi: ic.psi,
            latitude: ic.latitude,
            longitude: ic.longitude,
            altitude: ic.altitude,
            alpha,
            beta,
            alpha_dot: 0.0,
            beta_dot: 0.0,
            vt,
            qbar: 0.0,
            mach: 0.0,
            density: 0.0,
            sound_speed: 0.0,
            mass: 1.0,
            weight: G0,
            ixx: 1.0,
            iyy: 1.0,
            izz: 1.0,
            ixz: 0.0,
            elevator: 0.0,
            aileron: 0.0,
            rudder: 0.0,
            throttle: 0.0,
        }
    }

    /// Recompute Vt, alpha, beta (with finite-difference rates), qbar and
    /// Mach from the body velocities and the current ambient properties.
    pub fn update_air_data(&mut self) {
        let vt = (self.u * self.u + self.v * self.v + self.w * self.w).sqrt();
        let (alpha, beta) = aero_angles(self.u, self.v, self.w, vt);

        if self.dt > 0.0 {
            self.alpha_dot = (alpha - self.alpha) / self.dt;
            self.beta_dot = (beta - self.beta) / self.dt;
        }
        self.alpha = alpha;
        self.beta = beta;
        self.vt = vt;
        self.qbar = 0.5 * self.density * vt * vt;
        self.mach = if self.sound_speed > 0.0 {
            vt / self.sound_speed
        } else {
            0.0
        };
    }
}

impl Default for SimState {
    fn default() -> Self {
        SimState::with_initial(&InitialConditions::default(), 1.0 / 120.0)
    }
}

fn aero_angles(u: f64, v: f64, w: f64, vt: f64) -> (f64, f64) {
    if vt < MIN_AIRSPEED {
        return (0.0, 0.0);
    }
    let alpha = w.atan2(u);
    let beta = (v / vt).clamp(-1.0, 1.0).asin();
    (alpha, beta)
}

// ---------------------------------------------------------------------------
// Initial conditions (supplied by the external reset loader)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialConditions {
    pub u: f64,                         // m/s, body forward
    pub v: f64,                         // m/s, body right
    pub w: f64,                         // m/s, body down
    pub phi: f64,                       // rad
    pub theta: f64,                     // rad
    pub psi: f64,                       // rad
    pub latitude: f64,                  // rad
    pub longitude: f64,                 // rad
    pub altitude: f64,                  // m
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            u: 0.0,
            v: 0.0,
            w: 0.0,
            phi: 0.0,
            theta: 0.0,
            psi: 0.0,
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
