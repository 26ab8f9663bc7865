use crate::sim::scheduler::Model;
use crate::state::{SimState, G0};

// ---------------------------------------------------------------------------
// Piecewise standard atmosphere (sea level to 86 km)
// ---------------------------------------------------------------------------

const R_AIR: f64 = 287.052_87; // specific gas constant for dry air, J/(kg·K)
const GAMMA: f64 = 1.4;        // ratio of specific heats

/// One altitude band: reference properties at the band base plus a
/// temperature lapse rate (zero for isothermal bands).
struct Band {
    base: f64,        // m, band base altitude
    temperature: f64, // K, at base
    pressure: f64,    // Pa, at base
    density: f64,     // kg/m^3, at base
    lapse: f64,       // K/m (0 = isothermal)
}

/// US Standard Atmosphere 1976 layers. The last band is a terminal clamp:
/// altitudes above its base return its reference values unchanged. Its
/// reference values are the 71 km gradient curve evaluated at 86 km, so the
/// clamp is continuous and density/pressure stay non-increasing through the
/// top edge.
static BANDS: [Band; 8] = [
    Band { base: 0.0,      temperature: 288.15, pressure: 101_325.0, density: 1.225_0,     lapse: -0.0065 },
    Band { base: 11_000.0, temperature: 216.65, pressure: 22_632.1,  density: 0.363_92,    lapse: 0.0 },
    Band { base: 20_000.0, temperature: 216.65, pressure: 5_474.89,  density: 0.088_035,   lapse: 0.001 },
    Band { base: 32_000.0, temperature: 228.65, pressure: 868.019,   density: 0.013_225,   lapse: 0.0028 },
    Band { base: 47_000.0, temperature: 270.65, pressure: 110.906,   density: 0.001_427_5, lapse: 0.0 },
    Band { base: 51_000.0, temperature: 270.65, pressure: 66.938_9,  density: 0.000_861_60, lapse: -0.0028 },
    Band { base: 71_000.0, temperature: 214.65, pressure: 3.956_42,  density: 0.000_064_211, lapse: -0.002 },
    Band { base: 86_000.0, temperature: 184.65, pressure: 0.302_32,  density: 0.000_005_703_8, lapse: 0.0 },
];

/// Clamp altitude into the modeled range and pick the containing band.
/// No extrapolation below the first band base or above the last.
fn band_at(altitude: f64) -> (&'static Band, f64) {
    let h = altitude.clamp(BANDS[0].base, BANDS[BANDS.len() - 1].base);
    let band = BANDS
        .iter()
        .rev()
        .find(|b| h >= b.base)
        .unwrap_or(&BANDS[0]);
    (band, h)
}

pub fn temperature(altitude: f64) -> f64 {
    let (band, h) = band_at(altitude);
    band.temperature + band.lapse * (h - band.base)
}

pub fn pressure(altitude: f64) -> f64 {
    let (band, h) = band_at(altitude);
    if band.lapse == 0.0 {
        // Isothermal band: exponential decay
        band.pressure * ((-G0 / (R_AIR * band.temperature)) * (h - band.base)).exp()
    } else {
        // Gradient band: power law in the temperature ratio
        let t = band.temperature + band.lapse * (h - band.base);
        band.pressure * (t / band.temperature).powf(-G0 / (band.lapse * R_AIR))
    }
}

pub fn density(altitude: f64) -> f64 {
    let (band, h) = band_at(altitude);
    if band.lapse == 0.0 {
        band.density * ((-G0 / (R_AIR * band.temperature)) * (h - band.base)).exp()
    } else {
        let t = band.temperature + band.lapse * (h - band.base);
        band.density * (t / band.temperature).powf(-G0 / (band.lapse * R_AIR) - 1.0)
    }
}

pub fn speed_of_sound(altitude: f64) -> f64 {
    (GAMMA * R_AIR * temperature(altitude)).sqrt()
}

// ---------------------------------------------------------------------------
// Scheduler model: writes ambient properties into the shared state
// ---------------------------------------------------------------------------

/// Per-tick atmosphere update. Runs before the aircraft aggregator so the
/// dynamic-pressure and Mach computations see the current altitude's air.
#[derive(Debug, Default)]
pub struct Atmosphere;

impl Model for Atmosphere {
    fn name(&self) -> &str {
        "atmosphere"
    }

    fn run(&mut self, state: &mut SimState) {
        state.density = density(state.altitude);
        state.sound_speed = speed_of_sound(state.altitude);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
