//! Per-eye camera uniform.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::resources::buffer;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// One eye's uniform buffer and its group-0 bind group.
pub struct EyeCamera {
    buffer: Arc<wgpu::Buffer>,
    bind_group: wgpu::BindGroup,
}

impl EyeCamera {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = buffer::create_uniform_buffer(
            device,
            label,
            &CameraUniform::new(Mat4::IDENTITY),
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    pub fn update(&self, queue: &wgpu::Queue, view_proj: Mat4) {
        buffer::update_uniform_buffer(queue, &self.buffer, &CameraUniform::new(view_proj));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
