//! GPU-resident render models and the uploader the model cache drives.

use std::sync::Arc;

use vantage_runtime::{ModelData, ModelUploader};

use crate::resources::{buffer, texture};

/// A render model uploaded to the GPU, shared between both eyes.
pub struct GpuModel {
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_count: u32,
    pub texture_bind_group: wgpu::BindGroup,
    pub name: String,
}

/// Turns runtime [`ModelData`] into a [`GpuModel`]. Owned by the renderer
/// and handed to the cache on every poll.
pub struct WgpuModelUploader {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    texture_layout: wgpu::BindGroupLayout,
    sampler: Arc<wgpu::Sampler>,
}

impl WgpuModelUploader {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        texture_layout: wgpu::BindGroupLayout,
        sampler: Arc<wgpu::Sampler>,
    ) -> Self {
        Self {
            device,
            queue,
            texture_layout,
            sampler,
        }
    }
}

impl ModelUploader<GpuModel> for WgpuModelUploader {
    fn upload(&self, name: &str, data: &ModelData) -> anyhow::Result<GpuModel> {
        let vertex_buffer = buffer::create_vertex_buffer(
            &self.device,
            &format!("{name} Vertices"),
            &data.vertices,
        );
        let index_buffer =
            buffer::create_index_buffer(&self.device, &format!("{name} Indices"), &data.indices);

        let tex = &data.texture;
        let gpu_texture = texture::upload_rgba8(
            &self.device,
            &self.queue,
            &format!("{name} Diffuse"),
            tex.width,
            tex.height,
            &tex.rgba,
        );
        let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let texture_bind_group = texture::texture_bind_group(
            &self.device,
            &self.texture_layout,
            &format!("{name} Texture"),
            &view,
            &self.sampler,
        );

        Ok(GpuModel {
            vertex_buffer,
            index_buffer,
            index_count: data.index_count(),
            texture_bind_group,
            name: name.to_owned(),
        })
    }
}
