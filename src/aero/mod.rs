pub mod coefficient;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Aircraft reference geometry
// ---------------------------------------------------------------------------

/// Reference geometry used to dimensionalize aerodynamic coefficients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    pub wing_area: f64, // m^2
    pub wing_span: f64, // m
    pub chord: f64,     // m, mean aerodynamic chord
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            wing_area: 16.0,
            wing_span: 10.0,
            chord: 1.6,
        }
    }
}
