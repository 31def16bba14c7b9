//! Mirrors the resolved eye textures onto the desktop window, split
//! left/right.

use std::sync::Arc;

use crate::geometry::vertex::CompanionVertex;
use crate::pipeline::{companion, layouts::PipelineLayouts};
use crate::render_target::EyeTargets;
use crate::resources::{buffer, texture};
use vantage_runtime::Eye;

// Two quads covering the window halves. The top of the screen samples v=0,
// matching the orientation of the offscreen eye passes.
const QUAD_VERTICES: [CompanionVertex; 8] = [
    // left half
    CompanionVertex { position: [-1.0, -1.0], tex_coord: [0.0, 1.0] },
    CompanionVertex { position: [0.0, -1.0], tex_coord: [1.0, 1.0] },
    CompanionVertex { position: [-1.0, 1.0], tex_coord: [0.0, 0.0] },
    CompanionVertex { position: [0.0, 1.0], tex_coord: [1.0, 0.0] },
    // right half
    CompanionVertex { position: [0.0, -1.0], tex_coord: [0.0, 1.0] },
    CompanionVertex { position: [1.0, -1.0], tex_coord: [1.0, 1.0] },
    CompanionVertex { position: [0.0, 1.0], tex_coord: [0.0, 0.0] },
    CompanionVertex { position: [1.0, 1.0], tex_coord: [1.0, 0.0] },
];

const QUAD_INDICES: [u16; 12] = [0, 1, 3, 0, 3, 2, 4, 5, 7, 4, 7, 6];

pub struct CompanionPass {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: Arc<wgpu::Buffer>,
    index_buffer: Arc<wgpu::Buffer>,
    eye_bind_groups: [wgpu::BindGroup; 2],
}

impl CompanionPass {
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        targets: &EyeTargets,
        sampler: &wgpu::Sampler,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let pipeline = companion::create(device, layouts, surface_format);
        let vertex_buffer =
            buffer::create_vertex_buffer(device, "Companion Quads", &QUAD_VERTICES);
        let index_buffer =
            buffer::create_index_buffer(device, "Companion Indices", &QUAD_INDICES);

        let eye_bind_groups = Eye::BOTH.map(|eye| {
            texture::texture_bind_group(
                device,
                &layouts.texture,
                &format!("Companion {eye:?} Eye"),
                targets.eye(eye).color().resolve_view(),
                sampler,
            )
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            eye_bind_groups,
        }
    }

    pub fn record(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Companion Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        pass.set_bind_group(0, &self.eye_bind_groups[Eye::Left as usize], &[]);
        pass.draw_indexed(0..6, 0, 0..1);
        pass.set_bind_group(0, &self.eye_bind_groups[Eye::Right as usize], &[]);
        pass.draw_indexed(6..12, 0, 0..1);
    }
}
