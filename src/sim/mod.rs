pub mod scheduler;

pub use scheduler::{Model, Scheduler};
