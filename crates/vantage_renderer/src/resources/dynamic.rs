//! A vertex buffer rewritten every frame, regrown when it overflows.

use std::marker::PhantomData;
use std::sync::Arc;

pub struct DynamicBuffer<T: bytemuck::Pod> {
    buffer: Arc<wgpu::Buffer>,
    capacity: usize,
    len: usize,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> DynamicBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, label, capacity),
            capacity,
            len: 0,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: usize) -> Arc<wgpu::Buffer> {
        Arc::new(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    /// Replaces the buffer contents. Doubles the allocation when `data`
    /// no longer fits.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.len() > self.capacity {
            let mut capacity = self.capacity.max(1);
            while capacity < data.len() {
                capacity *= 2;
            }
            log::debug!("regrowing '{}' to {} elements", self.label, capacity);
            self.buffer = Self::allocate(device, &self.label, capacity);
            self.capacity = capacity;
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len();
    }

    pub fn vertex_count(&self) -> u32 {
        self.len as u32
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
