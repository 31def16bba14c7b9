//! Per-draw model matrices packed into one uniform buffer.
//!
//! Each draw binds the same bind group with a dynamic offset; slots are
//! padded to the device's uniform alignment (256 on every backend we care
//! about).

use std::sync::Arc;

use glam::Mat4;

/// Fixed slot assignment for a frame.
pub const SLOT_STATIC: u32 = 0; // identity: cube volume, axes, point cloud frame mesh
pub const SLOT_HAND_LEFT: u32 = 1;
pub const SLOT_HAND_RIGHT: u32 = 2;

pub const SLOT_COUNT: u32 = 3;

fn align_up(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) / alignment * alignment
}

pub struct ModelBuffer {
    buffer: Arc<wgpu::Buffer>,
    stride: u64,
}

impl ModelBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = align_up(std::mem::size_of::<Mat4>() as u64, alignment);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Matrix Buffer"),
            size: stride * SLOT_COUNT as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer: Arc::new(buffer),
            stride,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, slot: u32, matrix: Mat4) {
        debug_assert!(slot < SLOT_COUNT);
        let cols = matrix.to_cols_array_2d();
        queue.write_buffer(
            &self.buffer,
            self.stride * slot as u64,
            bytemuck::cast_slice(&cols),
        );
    }

    pub fn offset(&self, slot: u32) -> u32 {
        (self.stride * slot as u64) as u32
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Size of one bound slot, for the bind group layout's binding size.
    pub fn slot_size() -> wgpu::BufferSize {
        wgpu::BufferSize::new(std::mem::size_of::<Mat4>() as u64).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::align_up;

    #[test]
    fn align_up_rounds_to_next_multiple() {
        assert_eq!(align_up(64, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
    }
}
