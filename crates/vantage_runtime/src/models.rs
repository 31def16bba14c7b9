//! CPU-side render-model data and the asynchronous provider interface.
//!
//! The runtime's render-model service loads geometry and a diffuse texture in
//! the background; callers poll a status until the load settles.  This module
//! defines the polled interface; [`crate::cache`] turns it into a per-name
//! background task so the render loop never blocks on it.

use thiserror::Error;

/// Vertex layout of a render model as delivered by the provider.
///
/// `Pod` so the renderer can upload the slice without copying per field.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// RGBA8 diffuse texture of a render model.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A complete CPU-side render model: indexed triangle geometry plus one
/// diffuse texture.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u16>,
    pub texture: TextureData,
}

impl ModelData {
    /// Number of vertices the indexed draw covers.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Terminal failure reported by the provider for a specific model.
///
/// Never fatal: the device simply renders without a model.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("no render model named `{0}`")]
    UnknownModel(String),
    #[error("texture load failed for render model `{0}`: {1}")]
    Texture(String, String),
    #[error("render-model provider unavailable: {0}")]
    Unavailable(String),
}

/// One poll of an asynchronous model load.
pub enum LoadPoll {
    /// Still loading; poll again after a short sleep.
    Loading,
    Ready(ModelData),
    Failed(ProviderError),
}

/// The runtime's render-model service.
///
/// `poll_model` is called repeatedly from a cache worker thread until it
/// returns something other than [`LoadPoll::Loading`]; implementations must
/// be safe to poll from a thread other than the render thread.
pub trait ModelProvider: Send + Sync {
    fn poll_model(&self, name: &str) -> LoadPoll;
}
