//! Field observations: point findings with location, time and provenance.

pub mod filter;
pub mod model;
pub mod shapes;
