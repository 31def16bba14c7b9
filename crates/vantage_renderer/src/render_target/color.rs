//! Multisampled color attachment plus its single-sample resolve texture.

use super::target::{COLOR_FORMAT, SAMPLE_COUNT};

pub struct ColorAttachment {
    msaa_view: wgpu::TextureView,
    resolve_texture: wgpu::Texture,
    resolve_view: wgpu::TextureView,
}

impl ColorAttachment {
    pub fn new(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let msaa = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} MSAA Color")),
            size,
            mip_level_count: 1,
            sample_count: SAMPLE_COUNT,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let resolve_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Resolve Color")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        Self {
            msaa_view: msaa.create_view(&wgpu::TextureViewDescriptor::default()),
            resolve_view: resolve_texture.create_view(&wgpu::TextureViewDescriptor::default()),
            resolve_texture,
        }
    }

    pub fn msaa_view(&self) -> &wgpu::TextureView {
        &self.msaa_view
    }

    pub fn resolve_view(&self) -> &wgpu::TextureView {
        &self.resolve_view
    }

    pub fn resolve_texture(&self) -> &wgpu::Texture {
        &self.resolve_texture
    }
}
