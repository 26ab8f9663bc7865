use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::sim::scheduler::Model;
use crate::state::{SimState, EARTH_RADIUS};

// ---------------------------------------------------------------------------
// 6DOF equations-of-motion integrator
// ---------------------------------------------------------------------------

/// cos(latitude) below this is treated as the pole singularity: the
/// longitude rate and the tan(latitude) transport terms are skipped.
const POLE_EPS: f64 = 1e-8;

/// Integrates the shared state's rotational, translational and positional
/// equations each tick using a second-order Adams–Bashforth scheme,
/// retaining the previous tick's derivatives. The first tick seeds the
/// retained derivatives with the current ones (one explicit-Euler step).
///
/// Reads forces, moments, mass and inertia the aircraft aggregator wrote
/// this tick; writes rates, attitude, body velocities and position.
#[derive(Debug, Clone)]
pub struct Eom {
    last_omega_dot: Vector3<f64>,   // body angular accelerations
    last_qdot: Quaternion<f64>,     // raw quaternion derivative
    last_vdot: Vector3<f64>,        // local (NED) accelerations
    last_pos_dot: Vector3<f64>,     // [lat rate, lon rate, alt rate]
    primed: bool,
}

impl Eom {
    pub fn new() -> Self {
        Self {
            last_omega_dot: Vector3::zeros(),
            last_qdot: Quaternion::new(0.0, 0.0, 0.0, 0.0),
            last_vdot: Vector3::zeros(),
            last_pos_dot: Vector3::zeros(),
            primed: false,
        }
    }
}

impl Default for Eom {
    fn default() -> Self {
        Self::new()
    }
}

/// One Adams–Bashforth-2 step: `x + dt/2 * (3*xdot - xdot_prev)`.
fn ab2(x: f64, xdot: f64, xdot_prev: f64, dt: f64) -> f64 {
    x + 0.5 * dt * (3.0 * xdot - xdot_prev)
}

fn ab2_vec(x: Vector3<f64>, xdot: Vector3<f64>, prev: Vector3<f64>, dt: f64) -> Vector3<f64> {
    x + (xdot * 3.0 - prev) * (0.5 * dt)
}

impl Model for Eom {
    fn name(&self) -> &str {
        "equations of motion"
    }

    fn run(&mut self, state: &mut SimState) {
        let dt = state.dt;

        // --- Stage 1: body-to-local rotation matrix from the quaternion ---
        let body_to_local = state.quat.to_rotation_matrix();

        // --- Stage 2: rotational state ---
        let omega = Vector3::new(state.p, state.q, state.r);
        let omega_dot = angular_accel(state, &omega);

        // Quaternion kinematics with the pre-update rates:
        // qdot = 0.5 * q ⊗ (0, p, q, r)
        let omega_quat = Quaternion::new(0.0, omega.x, omega.y, omega.z);
        let qdot = state.quat.quaternion() * omega_quat * 0.5;

        if !self.primed {
            self.last_omega_dot = omega_dot;
            self.last_qdot = qdot;
        }

        let omega_new = ab2_vec(omega, omega_dot, self.last_omega_dot, dt);
        state.p = omega_new.x;
        state.q = omega_new.y;
        state.r = omega_new.z;

        let q_raw = state.quat.quaternion() + (qdot * 3.0 - self.last_qdot) * (0.5 * dt);
        state.quat = UnitQuaternion::new_normalize(q_raw);
        let (phi, theta, psi) = state.quat.euler_angles();
        state.phi = phi;
        state.theta = theta;
        state.psi = psi;

        self.last_omega_dot = omega_dot;
        self.last_qdot = qdot;

        // --- Stage 3: translational state in local (north/east/down) axes ---
        let v_body = Vector3::new(state.u, state.v, state.w);
        let v_local = body_to_local * v_body;
        let f_local = body_to_local * state.forces;

        let radius = EARTH_RADIUS + state.altitude;
        let cos_lat = state.latitude.cos();
        let at_pole = cos_lat.abs() < POLE_EPS;

        let (vn, ve, vd) = (v_local.x, v_local.y, v_local.z);
        let mut accel = if state.mass > 0.0 {
            f_local / state.mass
        } else {
            Vector3::zeros()
        };

        // Spherical-earth transport corrections
        let tan_lat = if at_pole { 0.0 } else { state.latitude.tan() };
        accel.x += (vn * vd - ve * ve * tan_lat) / radius;
        accel.y += (ve * vd + vn * ve * tan_lat) / radius;
        accel.z += -(vn * vn + ve * ve) / radius;

        if !self.primed {
            self.last_vdot = accel;
        }
        let v_local_new = ab2_vec(v_local, accel, self.last_vdot, dt);
        self.last_vdot = accel;

        let v_body_new = body_to_local.transpose() * v_local_new;
        state.u = v_body_new.x;
        state.v = v_body_new.y;
        state.w = v_body_new.z;

        // --- Stage 4: geodetic position rates ---
        let lat_dot = v_local_new.x / radius;
        let lon_dot = if at_pole {
            0.0
        } else {
            v_local_new.y / (radius * cos_lat)
        };
        let alt_dot = -v_local_new.z;
        let pos_dot = Vector3::new(lat_dot, lon_dot, alt_dot);

        if !self.primed {
            self.last_pos_dot = pos_dot;
        }
        state.latitude = ab2(state.latitude, lat_dot, self.last_pos_dot.x, dt);
        if !at_pole {
            state.longitude = ab2(state.longitude, lon_dot, self.last_pos_dot.y, dt);
        }
        state.altitude = ab2(state.altitude, alt_dot, self.last_pos_dot.z, dt);
        self.last_pos_dot = pos_dot;

        self.primed = true;
    }
}

/// Rigid-body angular accelerations from the net moments and the inertia
/// tensor, with the Ixz cross-coupling terms. A degenerate inertia tensor
/// yields zero acceleration rather than a division blowup.
fn angular_accel(state: &SimState, omega: &Vector3<f64>) -> Vector3<f64> {
    let (ixx, iyy, izz, ixz) = (state.ixx, state.iyy, state.izz, state.ixz);
    let gamma = ixx * izz - ixz * ixz;
    if gamma.abs() < f64::EPSILON || iyy.abs() < f64::EPSILON {
        return Vector3::zeros();
    }

    let (p, q, r) = (omega.x, omega.y, omega.z);
    let (l, m, n) = (state.moments.x, state.moments.y, state.moments.z);

    let p_dot = (izz * l
        + ixz * n
        + ixz * (ixx - iyy + izz) * p * q
        + (izz * (iyy - izz) - ixz * ixz) * q * r)
        / gamma;
    let q_dot = (m + (izz - ixx) * p * r - ixz * (p * p - r * r)) / iyy;
    let r_dot = (ixz * l
        + ixx * n
        + (ixx * (ixx - iyy) + ixz * ixz) * p * q
        - ixz * (ixx - iyy + izz) * q * r)
        / gamma;

    Vector3::new(p_dot, q_dot, r_dot)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
