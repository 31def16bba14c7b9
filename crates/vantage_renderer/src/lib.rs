//! Stereo rendering for the Vantage VR viewer.
//!
//! | Module          | Responsibility                                        |
//! |-----------------|-------------------------------------------------------|
//! | `context`       | Instance/adapter/device/queue bootstrap               |
//! | `camera`        | Per-eye view-projection uniform                       |
//! | `stereo`        | Eye projection and head-to-eye matrix bookkeeping     |
//! | `geometry`      | Vertex formats, cube volume and axis gizmo builders   |
//! | `resources`     | Buffers, textures, the per-draw model matrix table    |
//! | `render_target` | Offscreen MSAA eye targets with resolve textures      |
//! | `pipeline`      | Bind group layouts and render pipelines               |
//! | `frame`         | Draw-list planning from per-frame counts and flags    |
//! | `scene_pass`    | Records one eye's pass                                |
//! | `companion`     | Desktop mirror of the two resolved eye textures       |
//! | `model`         | GPU render models and the cache uploader              |

pub mod camera;
pub mod companion;
pub mod context;
pub mod frame;
pub mod geometry;
pub mod model;
pub mod pipeline;
pub mod render_target;
pub mod resources;
pub mod scene_pass;
pub mod stereo;

pub use context::{ContextError, RenderContext};
pub use frame::{build_draw_list, DrawCall, FrameState, Hand};
pub use geometry::cube_volume::CubeVolume;
pub use geometry::vertex::ColorVertex;
pub use model::{GpuModel, WgpuModelUploader};
pub use render_target::TargetError;
pub use stereo::StereoView;

use std::sync::Arc;

use glam::Mat4;
use vantage_runtime::{ColorSpace, Eye, SessionError, VrSession};

use camera::EyeCamera;
use companion::CompanionPass;
use pipeline::layouts::PipelineLayouts;
use render_target::EyeTargets;
use resources::dynamic::DynamicBuffer;
use resources::model_buffer::{self, ModelBuffer};
use resources::{buffer, texture};
use scene_pass::{SceneBindings, ScenePass};

const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

/// Owns every GPU object the stereo pipeline needs and records one frame's
/// command buffers. All buffers are created up front; only the dynamic
/// vertex buffers and uniforms are written per frame.
pub struct StereoRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    layouts: PipelineLayouts,
    targets: EyeTargets,
    cameras: [EyeCamera; 2],
    model_buffer: ModelBuffer,
    model_bind_group: wgpu::BindGroup,
    scene_pass: ScenePass,
    companion_pass: CompanionPass,
    sampler: Arc<wgpu::Sampler>,

    cube_buffer: Arc<wgpu::Buffer>,
    cube_vertex_count: u32,
    cube_texture: wgpu::BindGroup,

    axis_buffer: DynamicBuffer<ColorVertex>,
    cloud_buffer: DynamicBuffer<ColorVertex>,
    mesh_buffer: DynamicBuffer<ColorVertex>,

    view: StereoView,
}

impl StereoRenderer {
    pub fn new(
        context: &RenderContext,
        surface_format: wgpu::TextureFormat,
        session: &dyn VrSession,
        volume: CubeVolume,
        near: f32,
        far: f32,
    ) -> anyhow::Result<Self> {
        let device = context.device.clone();
        let queue = context.queue.clone();

        let layouts = PipelineLayouts::new(&device);
        let (width, height) = session.recommended_target_size();
        let targets = EyeTargets::new(&device, width, height)?;

        let cameras = [
            EyeCamera::new(&device, &layouts.camera, "Left Eye Camera"),
            EyeCamera::new(&device, &layouts.camera, "Right Eye Camera"),
        ];

        let model_buffer = ModelBuffer::new(&device);
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Matrices"),
            layout: &layouts.model,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: model_buffer.buffer(),
                    offset: 0,
                    size: Some(ModelBuffer::slot_size()),
                }),
            }],
        });
        model_buffer.write(&queue, model_buffer::SLOT_STATIC, Mat4::IDENTITY);

        let sampler = texture::create_sampler(&device);

        let cube_vertices = volume.build();
        let cube_buffer = buffer::create_vertex_buffer(&device, "Cube Volume", &cube_vertices);
        log::info!(
            "cube volume {}x{}x{}: {} vertices",
            volume.width,
            volume.height,
            volume.depth,
            cube_vertices.len()
        );

        let checker = texture::checker_rgba8(CHECKER_SIZE, CHECKER_CELL);
        let checker_texture = texture::upload_rgba8(
            &device,
            &queue,
            "Cube Checker",
            CHECKER_SIZE,
            CHECKER_SIZE,
            &checker,
        );
        let checker_view = checker_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let cube_texture = texture::texture_bind_group(
            &device,
            &layouts.texture,
            "Cube Texture",
            &checker_view,
            &sampler,
        );

        let scene_pass = ScenePass::new(&device, &layouts);
        let companion_pass =
            CompanionPass::new(&device, &layouts, &targets, &sampler, surface_format);

        let view = StereoView::from_session(session, near, far);

        Ok(Self {
            axis_buffer: DynamicBuffer::new(&device, "Controller Axes", 16),
            cloud_buffer: DynamicBuffer::new(&device, "Point Cloud", 1024),
            mesh_buffer: DynamicBuffer::new(&device, "Color Mesh", 256),
            device,
            queue,
            layouts,
            targets,
            cameras,
            model_buffer,
            model_bind_group,
            scene_pass,
            companion_pass,
            sampler,
            cube_buffer,
            cube_vertex_count: cube_vertices.len() as u32,
            cube_texture,
            view,
        })
    }

    /// Uploader handed to the model cache; shares this renderer's device,
    /// queue, and texture layout.
    pub fn model_uploader(&self) -> WgpuModelUploader {
        WgpuModelUploader::new(
            self.device.clone(),
            self.queue.clone(),
            self.layouts.texture.clone(),
            self.sampler.clone(),
        )
    }

    pub fn set_head(&mut self, head: Mat4) {
        self.view.set_head(head);
    }

    pub fn set_clip(&mut self, session: &dyn VrSession, near: f32, far: f32) {
        self.view.set_clip(session, near, far);
    }

    pub fn set_hand_pose(&self, hand: Hand, pose: Mat4) {
        let slot = match hand {
            Hand::Left => model_buffer::SLOT_HAND_LEFT,
            Hand::Right => model_buffer::SLOT_HAND_RIGHT,
        };
        self.model_buffer.write(&self.queue, slot, pose);
    }

    pub fn upload_axes(&mut self, vertices: &[ColorVertex]) {
        self.axis_buffer.write(&self.device, &self.queue, vertices);
    }

    pub fn upload_point_cloud(&mut self, vertices: &[ColorVertex]) {
        self.cloud_buffer.write(&self.device, &self.queue, vertices);
    }

    pub fn upload_color_mesh(&mut self, vertices: &[ColorVertex]) {
        self.mesh_buffer.write(&self.device, &self.queue, vertices);
    }

    pub fn cube_vertex_count(&self) -> u32 {
        self.cube_vertex_count
    }

    pub fn axis_vertex_count(&self) -> u32 {
        self.axis_buffer.vertex_count()
    }

    pub fn cloud_vertex_count(&self) -> u32 {
        self.cloud_buffer.vertex_count()
    }

    pub fn mesh_vertex_count(&self) -> u32 {
        self.mesh_buffer.vertex_count()
    }

    /// Records both eye passes into one command buffer. Camera uniforms are
    /// written first so the submission sees this frame's head pose.
    pub fn encode_stereo(
        &self,
        calls: &[DrawCall],
        hand_models: [Option<&GpuModel>; 2],
    ) -> wgpu::CommandBuffer {
        for eye in Eye::BOTH {
            self.cameras[eye as usize].update(&self.queue, self.view.view_projection(eye));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stereo Encoder"),
            });

        for eye in Eye::BOTH {
            let bindings = SceneBindings {
                camera: self.cameras[eye as usize].bind_group(),
                models: &self.model_buffer,
                model_bind_group: &self.model_bind_group,
                cube_buffer: &self.cube_buffer,
                cube_texture: &self.cube_texture,
                axis_buffer: self.axis_buffer.buffer(),
                cloud_buffer: self.cloud_buffer.buffer(),
                mesh_buffer: self.mesh_buffer.buffer(),
                hand_models,
            };
            self.scene_pass
                .record(&mut encoder, self.targets.eye(eye), &bindings, calls);
        }

        encoder.finish()
    }

    /// Hands both resolved eye textures to the compositor.
    pub fn submit_eyes(&self, session: &mut dyn VrSession) -> Result<(), SessionError> {
        for eye in Eye::BOTH {
            session.submit(
                eye,
                self.targets.eye(eye).color().resolve_texture(),
                ColorSpace::Gamma,
            )?;
        }
        Ok(())
    }

    /// Records the companion window mirror into its own command buffer.
    pub fn encode_companion(&self, surface_view: &wgpu::TextureView) -> wgpu::CommandBuffer {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Companion Encoder"),
            });
        self.companion_pass.record(&mut encoder, surface_view);
        encoder.finish()
    }
}
