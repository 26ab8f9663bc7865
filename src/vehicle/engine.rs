use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Engine kinds and thrust computation
// ---------------------------------------------------------------------------

/// Sea-level standard density used for the rocket density-ratio blend.
const RHO_SL: f64 = 1.225;

/// Fixed first-order response constant for rocket thrust buildup.
const THRUST_RESPONSE: f64 = 0.2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum EngineKind {
    /// Vacuum max thrust (N) and sea-level max oxidizer flow (kg/s).
    Rocket {
        vac_thrust_max: f64,
        oxidizer_flow_max: f64,
    },
    Piston,
    TurboProp,
    TurboJet,
}

/// One powerplant. Thrust and fuel need are recomputed every tick; the
/// starved flag is set externally by the aircraft's fuel-draw outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub name: String,
    pub kind: EngineKind,
    pub thrust_max: f64,    // N, sea level
    pub fuel_flow_max: f64, // kg/s, sea level at full power
    pub throttle_min: f64,  // 0-1, below this a rocket flames out
    pub throttle_max: f64,  // 0-1
    pub throttle: f64,      // 0-1, commanded
    pct_power: f64,         // 0-1, last computed
    thrust: f64,            // N, last computed (first-order lag state)
    starved: bool,
    pub flameout: bool,
}

impl Engine {
    /// Compute this tick's thrust from the throttle and ambient density.
    pub fn calc_thrust(&mut self, density: f64) -> f64 {
        match self.kind {
            EngineKind::Rocket { vac_thrust_max, .. } => {
                if self.throttle < self.throttle_min || self.starved {
                    self.pct_power = 0.0;
                    self.thrust = 0.0;
                    self.flameout = true;
                } else {
                    self.flameout = false;
                    self.pct_power = self.commanded_power();
                    // Max available thrust rises toward the vacuum value as
                    // density falls off
                    let sigma = (density / RHO_SL).clamp(0.0, 1.0);
                    let available = vac_thrust_max + (self.thrust_max - vac_thrust_max) * sigma;
                    let desired = self.pct_power * available;
                    self.thrust += THRUST_RESPONSE * (desired - self.thrust);
                }
            }
            EngineKind::Piston | EngineKind::TurboProp | EngineKind::TurboJet => {
                // Throttle-proportional placeholder: monotonic in throttle,
                // bounded by max thrust, zero when starved
                if self.starved {
                    self.pct_power = 0.0;
                    self.thrust = 0.0;
                    self.flameout = true;
                } else {
                    self.flameout = false;
                    self.pct_power = self.commanded_power();
                    self.thrust = self.pct_power * self.thrust_max;
                }
            }
        }
        self.thrust
    }

    /// Fuel demanded over `dt`. Driven by the commanded throttle, not the
    /// starved flag: an empty tank keeps reporting shortage so the engine
    /// stays flamed out until fuel is available again.
    pub fn fuel_need(&self, dt: f64) -> f64 {
        self.fuel_flow_max * self.demand_power() * dt
    }

    /// Oxidizer demanded over `dt` (rockets only).
    pub fn oxidizer_need(&self, dt: f64) -> f64 {
        match self.kind {
            EngineKind::Rocket {
                oxidizer_flow_max, ..
            } => oxidizer_flow_max * self.demand_power() * dt,
            _ => 0.0,
        }
    }

    pub fn set_starved(&mut self, starved: bool) {
        self.starved = starved;
    }

    pub fn starved(&self) -> bool {
        self.starved
    }

    pub fn pct_power(&self) -> f64 {
        self.pct_power
    }

    pub fn thrust(&self) -> f64 {
        self.thrust
    }

    fn commanded_power(&self) -> f64 {
        if self.throttle_max > 0.0 {
            (self.throttle / self.throttle_max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn demand_power(&self) -> f64 {
        if matches!(self.kind, EngineKind::Rocket { .. }) && self.throttle < self.throttle_min {
            0.0
        } else {
            self.commanded_power()
        }
    }
}

// ---------------------------------------------------------------------------
// Engine builder
// ---------------------------------------------------------------------------

pub struct EngineBuilder {
    name: String,
    kind: EngineKind,
    thrust_max: f64,
    fuel_flow_max: f64,
    throttle_min: f64,
    throttle_max: f64,
}

impl EngineBuilder {
    pub fn new(name: impl Into<String>, kind: EngineKind) -> Self {
        Self {
            name: name.into(),
            kind,
            thrust_max: 1000.0,
            fuel_flow_max: 0.05,
            throttle_min: 0.0,
            throttle_max: 1.0,
        }
    }

    pub fn thrust_max(mut self, v: f64) -> Self { self.thrust_max = v; self }
    pub fn fuel_flow_max(mut self, v: f64) -> Self { self.fuel_flow_max = v; self }
    pub fn throttle_min(mut self, v: f64) -> Self { self.throttle_min = v; self }
    pub fn throttle_max(mut self, v: f64) -> Self { self.throttle_max = v; self }

    pub fn build(self) -> Engine {
        Engine {
            name: self.name,
            kind: self.kind,
            thrust_max: self.thrust_max,
            fuel_flow_max: self.fuel_flow_max,
            throttle_min: self.throttle_min,
            throttle_max: self.throttle_max,
            throttle: 0.0,
            pct_power: 0.0,
            thrust: 0.0,
            starved: false,
            flameout: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
