//! GPU resource creation helpers.

pub mod buffer;
pub mod dynamic;
pub mod model_buffer;
pub mod texture;
