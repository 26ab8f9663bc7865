use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fuel / oxidizer tank
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankKind {
    Fuel,
    Oxidizer,
}

/// One reservoir. Engines draw from it through the aircraft aggregator;
/// only selected tanks participate in a draw cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub kind: TankKind,
    pub capacity: f64, // kg
    pub contents: f64, // kg
    pub selected: bool,
}

impl Tank {
    pub fn new(kind: TankKind, capacity: f64, contents: f64) -> Self {
        Self {
            kind,
            capacity,
            contents,
            selected: true,
        }
    }

    /// Draw `amount` from the tank, clamping contents at zero. Returns the
    /// shortage: the positive amount by which the request exceeded what was
    /// available, or 0 if fully satisfied.
    pub fn reduce(&mut self, amount: f64) -> f64 {
        let shortage = (amount - self.contents).max(0.0);
        self.contents = (self.contents - amount).max(0.0);
        shortage
    }

    pub fn percent_full(&self) -> f64 {
        if self.capacity > 0.0 {
            self.contents / self.capacity
        } else {
            0.0
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

    #[test]
    fn reduce_satisfied_draw_returns_no_shortage() {
        let mut t = Tank::new(TankKind::Fuel, 100.0, 80.0);
        let shortage = t.reduce(30.0);
        assert_eq!(shortage, 0.0);
        assert_relative_eq!(t.contents, 50.0, epsilon = 1e-12);
    }

    #[test]
    fn reduce_never_drives_contents_negative() {
        let mut t = Tank::new(TankKind::Fuel, 100.0, 100.0);
        let shortage = t.reduce(150.0);
        assert_relative_eq!(shortage, 50.0, epsilon = 1e-12);
        assert_eq!(t.contents, 0.0);
    }

    #[test]
    fn reduce_exact_draw_empties_tank() {
        let mut t = Tank::new(TankKind::Oxidizer, 40.0, 40.0);
        assert_eq!(t.reduce(40.0), 0.0);
        assert_eq!(t.contents, 0.0);
    }

    #[test]
    fn percent_full_tracks_contents() {
        let mut t = Tank::new(TankKind::Fuel, 200.0, 150.0);
        assert_relative_eq!(t.percent_full(), 0.75, epsilon = 1e-12);
        t.reduce(150.0);
        assert_eq!(t.percent_full(), 0.0);
    }

    #[test]
    fn zero_capacity_percent_full_is_zero() {
        let t = Tank::new(TankKind::Fuel, 0.0, 0.0);
        assert_eq!(t.percent_full(), 0.0);
    }
}
