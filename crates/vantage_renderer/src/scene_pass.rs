//! Records one eye's scene pass.

use crate::frame::{DrawCall, Hand};
use crate::model::GpuModel;
use crate::pipeline::{color, layouts::PipelineLayouts, model, scene};
use crate::render_target::RenderTarget;
use crate::resources::model_buffer::{self, ModelBuffer};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Buffers and bind groups a single eye pass reads. Borrowed for the
/// duration of command recording only.
pub struct SceneBindings<'a> {
    pub camera: &'a wgpu::BindGroup,
    pub models: &'a ModelBuffer,
    pub model_bind_group: &'a wgpu::BindGroup,
    pub cube_buffer: &'a wgpu::Buffer,
    pub cube_texture: &'a wgpu::BindGroup,
    pub axis_buffer: &'a wgpu::Buffer,
    pub cloud_buffer: &'a wgpu::Buffer,
    pub mesh_buffer: &'a wgpu::Buffer,
    pub hand_models: [Option<&'a GpuModel>; 2],
}

pub struct ScenePass {
    scene_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,
    model_pipeline: wgpu::RenderPipeline,
}

impl ScenePass {
    pub fn new(device: &wgpu::Device, layouts: &PipelineLayouts) -> Self {
        Self {
            scene_pipeline: scene::create(device, layouts),
            line_pipeline: color::create(device, layouts, wgpu::PrimitiveTopology::LineList),
            point_pipeline: color::create(device, layouts, wgpu::PrimitiveTopology::PointList),
            mesh_pipeline: color::create(device, layouts, wgpu::PrimitiveTopology::TriangleList),
            model_pipeline: model::create(device, layouts),
        }
    }

    /// Clears, draws, and resolves one eye. The multisample resolve happens
    /// as part of the pass via the resolve attachment.
    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &RenderTarget,
        bindings: &SceneBindings<'_>,
        calls: &[DrawCall],
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color().msaa_view(),
                resolve_target: Some(target.color().resolve_view()),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth().view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, bindings.camera, &[]);
        let static_offset = bindings.models.offset(model_buffer::SLOT_STATIC);

        for call in calls {
            match *call {
                DrawCall::Cubes { vertex_count } => {
                    pass.set_pipeline(&self.scene_pipeline);
                    pass.set_bind_group(1, bindings.model_bind_group, &[static_offset]);
                    pass.set_bind_group(2, bindings.cube_texture, &[]);
                    pass.set_vertex_buffer(0, bindings.cube_buffer.slice(..));
                    pass.draw(0..vertex_count, 0..1);
                }
                DrawCall::Axes { vertex_count } => {
                    pass.set_pipeline(&self.line_pipeline);
                    pass.set_bind_group(1, bindings.model_bind_group, &[static_offset]);
                    pass.set_vertex_buffer(0, bindings.axis_buffer.slice(..));
                    pass.draw(0..vertex_count, 0..1);
                }
                DrawCall::PointCloud { vertex_count } => {
                    pass.set_pipeline(&self.point_pipeline);
                    pass.set_bind_group(1, bindings.model_bind_group, &[static_offset]);
                    pass.set_vertex_buffer(0, bindings.cloud_buffer.slice(..));
                    pass.draw(0..vertex_count, 0..1);
                }
                DrawCall::ColorMesh { vertex_count } => {
                    pass.set_pipeline(&self.mesh_pipeline);
                    pass.set_bind_group(1, bindings.model_bind_group, &[static_offset]);
                    pass.set_vertex_buffer(0, bindings.mesh_buffer.slice(..));
                    pass.draw(0..vertex_count, 0..1);
                }
                DrawCall::HandModel { hand } => {
                    let Some(gpu_model) = bindings.hand_models[hand.index()] else {
                        continue;
                    };
                    let slot = match hand {
                        Hand::Left => model_buffer::SLOT_HAND_LEFT,
                        Hand::Right => model_buffer::SLOT_HAND_RIGHT,
                    };
                    pass.set_pipeline(&self.model_pipeline);
                    pass.set_bind_group(1, bindings.model_bind_group, &[bindings.models.offset(slot)]);
                    pass.set_bind_group(2, &gpu_model.texture_bind_group, &[]);
                    pass.set_vertex_buffer(0, gpu_model.vertex_buffer.slice(..));
                    pass.set_index_buffer(gpu_model.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..gpu_model.index_count, 0, 0..1);
                }
            }
        }
    }
}
