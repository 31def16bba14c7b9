//! CPU-side geometry: vertex formats and generators.

pub mod axes;
pub mod cube_volume;
pub mod vertex;
