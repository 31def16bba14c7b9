//! Render pipelines and their shared bind group layouts.

pub mod color;
pub mod companion;
pub mod layouts;
pub mod model;
pub mod scene;
