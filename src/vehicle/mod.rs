pub mod aircraft;
pub mod engine;
pub mod tank;

pub use aircraft::{AeroAxis, Aircraft, AircraftBuilder};
pub use engine::{Engine, EngineBuilder, EngineKind};
pub use tank::{Tank, TankKind};
