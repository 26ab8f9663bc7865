pub mod aero;
pub mod dynamics;
pub mod io;
pub mod physics;
pub mod sim;
pub mod state;
pub mod vehicle;

// Convenience re-exports for hosts driving the engine
pub mod prelude {
    pub use crate::aero::coefficient::{CoeffTable, Coefficient, Selector};
    pub use crate::aero::Geometry;
    pub use crate::dynamics::Eom;
    pub use crate::physics::atmosphere::Atmosphere;
    pub use crate::sim::{Model, Scheduler};
    pub use crate::state::{InitialConditions, SimState, EARTH_RADIUS, G0};
    pub use crate::vehicle::{
        AeroAxis, Aircraft, AircraftBuilder, Engine, EngineBuilder, EngineKind, Tank, TankKind,
    };
}
