//! Areas of Interest: named regions carrying opaque GeoJSON.

pub mod model;
pub mod shapes;
