//! Domain models for the coverage tracker.

mod clinic;
mod visit;

pub use clinic::*;
pub use visit::*;
