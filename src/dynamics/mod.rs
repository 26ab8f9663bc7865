pub mod eom;

pub use eom::Eom;
