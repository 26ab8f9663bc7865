use serde::{Deserialize, Serialize};

use super::Geometry;
use crate::state::SimState;

// ---------------------------------------------------------------------------
// Lookup and scaling selectors (stable loader/evaluator contract)
// ---------------------------------------------------------------------------

/// Which simulation quantity a coefficient reads, either as the independent
/// variable of a table lookup or as one of its scaling multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    DynamicPressure,
    WingArea,
    WingSpan,
    Chord,
    Alpha,
    AlphaDot,
    Beta,
    BetaDot,
    RollRate,
    PitchRate,
    YawRate,
    Elevator,
    Aileron,
    Rudder,
    Mach,
    Altitude,
}

impl Selector {
    pub fn read(self, state: &SimState, geometry: &Geometry) -> f64 {
        match self {
            Selector::DynamicPressure => state.qbar,
            Selector::WingArea => geometry.wing_area,
            Selector::WingSpan => geometry.wing_span,
            Selector::Chord => geometry.chord,
            Selector::Alpha => state.alpha,
            Selector::AlphaDot => state.alpha_dot,
            Selector::Beta => state.beta,
            Selector::BetaDot => state.beta_dot,
            Selector::RollRate => state.p,
            Selector::PitchRate => state.q,
            Selector::YawRate => state.r,
            Selector::Elevator => state.elevator,
            Selector::Aileron => state.aileron,
            Selector::Rudder => state.rudder,
            Selector::Mach => state.mach,
            Selector::Altitude => state.altitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Coefficient data: constant, 1-D vector, 2-D table
// ---------------------------------------------------------------------------

/// Evaluation kinds. `Equation` is accepted from definition files but not
/// implemented here; it and `Unknown` evaluate to zero so a partially
/// specified aircraft still runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CoeffTable {
    /// Stored constant.
    Value(f64),
    /// (key, value) rows; keys monotonically non-decreasing.
    Vector(Vec<[f64; 2]>),
    /// Bilinear table: `data[i][j]` at `(row_keys[i], col_keys[j])`.
    Table {
        row_keys: Vec<f64>,
        col_keys: Vec<f64>,
        data: Vec<Vec<f64>>,
    },
    Equation,
    Unknown,
}

/// One named aerodynamic or propulsion term. Built once when a definition
/// is loaded, immutable thereafter, evaluated read-only every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub table: CoeffTable,
    /// Independent variable for the row lookup (Vector and Table kinds).
    pub row_lookup: Option<Selector>,
    /// Independent variable for the column lookup (Table kind only).
    pub col_lookup: Option<Selector>,
    /// Applied in order to the looked-up value.
    pub multipliers: Vec<Selector>,
}

impl Coefficient {
    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            table: CoeffTable::Value(value),
            row_lookup: None,
            col_lookup: None,
            multipliers: vec![],
        }
    }

    pub fn vector(name: impl Into<String>, lookup: Selector, rows: Vec<[f64; 2]>) -> Self {
        Self {
            name: name.into(),
            table: CoeffTable::Vector(rows),
            row_lookup: Some(lookup),
            col_lookup: None,
            multipliers: vec![],
        }
    }

    pub fn table(
        name: impl Into<String>,
        row_lookup: Selector,
        col_lookup: Selector,
        row_keys: Vec<f64>,
        col_keys: Vec<f64>,
        data: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            name: name.into(),
            table: CoeffTable::Table {
                row_keys,
                col_keys,
                data,
            },
            row_lookup: Some(row_lookup),
            col_lookup: Some(col_lookup),
            multipliers: vec![],
        }
    }

    /// Append a scaling multiplier (chainable).
    pub fn scaled_by(mut self, selector: Selector) -> Self {
        self.multipliers.push(selector);
        self
    }

    /// Current scaled value: table lookup times the ordered multiplier
    /// product. A missing lookup selector reads as 0.
    pub fn value(&self, state: &SimState, geometry: &Geometry) -> f64 {
        let base = match &self.table {
            CoeffTable::Value(c) => *c,
            CoeffTable::Vector(rows) => {
                let v = self.read_lookup(self.row_lookup, state, geometry);
                interp1(rows, v)
            }
            CoeffTable::Table {
                row_keys,
                col_keys,
                data,
            } => {
                let rv = self.read_lookup(self.row_lookup, state, geometry);
                let cv = self.read_lookup(self.col_lookup, state, geometry);
                interp2(row_keys, col_keys, data, rv, cv)
            }
            CoeffTable::Equation | CoeffTable::Unknown => 0.0,
        };

        self.multipliers
            .iter()
            .fold(base, |acc, m| acc * m.read(state, geometry))
    }

    fn read_lookup(
        &self,
        lookup: Option<Selector>,
        state: &SimState,
        geometry: &Geometry,
    ) -> f64 {
        lookup.map_or(0.0, |s| s.read(state, geometry))
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Index of the upper bracketing key: the first key >= v, clamped into the
/// valid interior `[1, len-1]`.
fn bracket(keys: impl Iterator<Item = f64> + ExactSizeIterator, v: f64) -> usize {
    let len = keys.len();
    let mut r = 1;
    for (i, key) in keys.enumerate().skip(1) {
        r = i;
        if key >= v {
            break;
        }
    }
    r.min(len - 1)
}

/// Interpolation factor between two keys; equal keys yield 1.0 so the upper
/// row wins instead of dividing by zero.
fn factor(lo: f64, hi: f64, v: f64) -> f64 {
    if hi == lo {
        1.0
    } else {
        (v - lo) / (hi - lo)
    }
}

/// Piecewise-linear lookup over (key, value) rows. The lookup value is
/// clamped into the key range, never extrapolated. Fewer than 2 rows, or a
/// key span that is not ascending, degrades to 0.
fn interp1(rows: &[[f64; 2]], v: f64) -> f64 {
    if rows.len() < 2 {
        return 0.0;
    }
    let (first, last) = (rows[0][0], rows[rows.len() - 1][0]);
    if !(first <= last) {
        return 0.0;
    }
    let v = v.clamp(first, last);
    let r = bracket(rows.iter().map(|row| row[0]), v);
    let f = factor(rows[r - 1][0], rows[r][0], v);
    rows[r - 1][1] + f * (rows[r][1] - rows[r - 1][1])
}

/// Bilinear lookup: bracket rows and columns independently, interpolate
/// along the row dimension at both bracketing columns, then blend by the
/// column factor. Degenerate dimensions, non-ascending key spans, or
/// mismatched data degrade to 0.
fn interp2(row_keys: &[f64], col_keys: &[f64], data: &[Vec<f64>], rv: f64, cv: f64) -> f64 {
    if row_keys.len() < 2 || col_keys.len() < 2 {
        return 0.0;
    }
    if data.len() != row_keys.len() || data.iter().any(|row| row.len() != col_keys.len()) {
        return 0.0;
    }
    let (r_lo, r_hi) = (row_keys[0], row_keys[row_keys.len() - 1]);
    let (c_lo, c_hi) = (col_keys[0], col_keys[col_keys.len() - 1]);
    if !(r_lo <= r_hi) || !(c_lo <= c_hi) {
        return 0.0;
    }

    let rv = rv.clamp(r_lo, r_hi);
    let cv = cv.clamp(c_lo, c_hi);
    let r = bracket(row_keys.iter().copied(), rv);
    let c = bracket(col_keys.iter().copied(), cv);
    let rf = factor(row_keys[r - 1], row_keys[r], rv);
    let cf = factor(col_keys[c - 1], col_keys[c], cv);

    let lo = data[r - 1][c - 1] + rf * (data[r][c - 1] - data[r - 1][c - 1]);
    let hi = data[r - 1][c] + rf * (data[r][c] - data[r - 1][c]);
    lo + cf * (hi - lo)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
