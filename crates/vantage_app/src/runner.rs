//! The frame orchestrator: winit event loop plus the per-frame pipeline.

use std::path::Path;
use std::sync::Arc;

use vantage_core::TimeClock;
use vantage_renderer::{
    build_draw_list, geometry::axes, ColorVertex, CubeVolume, FrameState, GpuModel, Hand,
    StereoRenderer, WgpuModelUploader,
};
use vantage_runtime::{
    DeviceId, DeviceProperty, InputBackend, ModelCache, ModelProvider, ModelState, PoseTracker,
    VrSession,
};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::config::AppConfig;
use crate::graphics::GraphicsState;
use crate::hands::{HandActions, HandState};

const ACTION_MANIFEST: &str = "assets/vantage_actions.json";
const FPS_LOG_INTERVAL: u64 = 450; // every ~5 s at 90 Hz

/// Loop phase. `ShuttingDown` is terminal: no further frame work happens
/// after it is entered, resources are released by drop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    ShuttingDown,
}

pub struct Runner<B: VrSession + InputBackend> {
    config: AppConfig,
    backend: B,
    phase: Phase,

    window: Option<Arc<Window>>,
    graphics: Option<GraphicsState>,
    renderer: Option<StereoRenderer>,
    uploader: Option<WgpuModelUploader>,

    cache: ModelCache<GpuModel>,
    tracker: PoseTracker,
    actions: Option<HandActions>,
    hands: [HandState; 2],

    /// Set when startup fails inside the event loop; surfaced by [`run`].
    startup_error: Option<anyhow::Error>,

    show_cubes: bool,
    point_cloud: Vec<ColorVertex>,
    color_mesh: Vec<ColorVertex>,
    clock: TimeClock,
    frame_count: u64,
}

impl<B: VrSession + InputBackend> Runner<B> {
    pub fn new(config: AppConfig, backend: B, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            config,
            backend,
            phase: Phase::Running,
            window: None,
            graphics: None,
            renderer: None,
            uploader: None,
            cache: ModelCache::new(provider),
            tracker: PoseTracker::new(),
            actions: None,
            hands: [HandState::new(), HandState::new()],
            startup_error: None,
            show_cubes: true,
            point_cloud: Vec::new(),
            color_mesh: Vec::new(),
            clock: TimeClock::new(),
            frame_count: 0,
        }
    }

    /// Externally supplied point-cloud vertices; an empty slice removes the
    /// cloud from the scene.
    pub fn set_point_cloud(&mut self, vertices: Vec<ColorVertex>) {
        self.point_cloud = vertices;
    }

    pub fn set_color_mesh(&mut self, vertices: Vec<ColorVertex>) {
        self.color_mesh = vertices;
    }

    fn window_title(&self) -> String {
        let driver = self
            .backend
            .device_property(DeviceId::HMD, DeviceProperty::TrackingSystemName)
            .unwrap_or_else(|| "unknown".to_owned());
        let serial = self
            .backend
            .device_property(DeviceId::HMD, DeviceProperty::SerialNumber)
            .unwrap_or_else(|| "unknown".to_owned());
        format!("{} - {driver} {serial}", self.config.title)
    }

    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase == Phase::Running {
            log::info!("shutting down");
            self.phase = Phase::ShuttingDown;
        }
        event_loop.exit();
    }

    fn handle_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => self.shut_down(event_loop),
            Key::Character(c) if c.eq_ignore_ascii_case("q") => self.shut_down(event_loop),
            Key::Character(c) if c.eq_ignore_ascii_case("c") => {
                self.show_cubes = !self.show_cubes;
                log::info!("cube volume {}", if self.show_cubes { "shown" } else { "hidden" });
            }
            _ => {}
        }
    }

    fn drain_runtime_events(&mut self) {
        while let Some(event) = self.backend.poll_event() {
            log::info!("runtime event: {event:?}");
        }
    }

    /// Action refresh, haptic routing, and per-hand pose/model resolution.
    fn update_input(&mut self) {
        let Some(actions) = &self.actions else {
            return;
        };

        self.backend.update_actions(actions.set);

        if self.backend.digital_rising_edge(actions.hide_cubes).is_some() {
            self.show_cubes = !self.show_cubes;
        }
        actions.process_haptics(&mut self.backend);
        if let Some(stick) = self.backend.analog(actions.analog) {
            log::trace!("analog input: {stick:?}");
        }

        for hand in Hand::BOTH {
            let binding = &actions.bindings[hand.index()];
            let state = self.backend.pose_state(binding.pose);
            let wanted = self.hands[hand.index()].refresh(state, &self.backend);

            if let (Some(name), Some(uploader)) = (wanted, &self.uploader) {
                match self.cache.find_or_load(&name, uploader) {
                    ModelState::Ready(model) => self.hands[hand.index()].model = Some(model),
                    ModelState::Pending => {}
                    ModelState::Unavailable => {
                        // Logged by the cache; the hand renders without a
                        // model for the rest of the session.
                    }
                }
            }
        }
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(graphics), Some(renderer)) = (&mut self.graphics, &mut self.renderer) else {
            return;
        };

        // Dynamic geometry reflects this frame's poses.
        let mut hand_poses = Vec::new();
        for hand in Hand::BOTH {
            let state = &self.hands[hand.index()];
            if state.visible {
                hand_poses.push(state.pose);
                renderer.set_hand_pose(hand, state.pose);
            }
        }
        renderer.upload_axes(&axes::build(&hand_poses));
        renderer.upload_point_cloud(&self.point_cloud);
        renderer.upload_color_mesh(&self.color_mesh);

        let frame = FrameState {
            show_cubes: self.show_cubes,
            input_available: self.backend.input_available(),
            cube_vertices: renderer.cube_vertex_count(),
            axis_vertices: renderer.axis_vertex_count(),
            cloud_vertices: renderer.cloud_vertex_count(),
            mesh_vertices: renderer.mesh_vertex_count(),
            hand_renderable: [
                self.hands[0].visible && self.hands[0].model.is_some(),
                self.hands[1].visible && self.hands[1].model.is_some(),
            ],
        };
        let calls = build_draw_list(&frame);

        let hand_models = [
            self.hands[0].model.as_deref(),
            self.hands[1].model.as_deref(),
        ];
        let commands = renderer.encode_stereo(&calls, hand_models);
        graphics.context.queue.submit(Some(commands));

        if let Err(err) = renderer.submit_eyes(&mut self.backend) {
            log::error!("{err}");
        }

        // Companion mirror.
        let surface_frame = match graphics.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = (graphics.config.width, graphics.config.height);
                graphics.resize(w, h);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                self.shut_down(event_loop);
                return;
            }
            Err(err) => {
                log::warn!("dropped companion frame: {err}");
                return;
            }
        };
        let view = surface_frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        graphics
            .context
            .queue
            .submit(Some(renderer.encode_companion(&view)));
        surface_frame.present();

        if self.config.vsync && self.config.flush_workaround {
            // Drain the pipeline after present. Works around a stutter seen
            // with some drivers when the compositor and window vsync fight;
            // trades throughput for pacing stability.
            graphics.context.device.poll(wgpu::Maintain::Wait);
        }
    }
}

impl<B: VrSession + InputBackend> ApplicationHandler for Runner<B> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title(self.window_title())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.startup_error = Some(anyhow::anyhow!("window creation failed: {err}"));
                event_loop.exit();
                return;
            }
        };

        let graphics = match pollster::block_on(GraphicsState::new(
            window.clone(),
            self.config.width,
            self.config.height,
            self.config.vsync,
            self.config.gpu_debug,
        )) {
            Ok(graphics) => graphics,
            Err(err) => {
                self.startup_error = Some(err.context("graphics startup failed"));
                event_loop.exit();
                return;
            }
        };

        let renderer = match StereoRenderer::new(
            &graphics.context,
            graphics.config.format,
            &self.backend,
            CubeVolume::with_side(self.config.cube_volume),
            self.config.near_clip,
            self.config.far_clip,
        ) {
            Ok(renderer) => renderer,
            Err(err) => {
                self.startup_error = Some(err.context("renderer startup failed"));
                event_loop.exit();
                return;
            }
        };
        self.uploader = Some(renderer.model_uploader());

        match HandActions::resolve(&mut self.backend, Path::new(ACTION_MANIFEST)) {
            Ok(actions) => self.actions = Some(actions),
            Err(err) => {
                // Input degrades to nothing rather than aborting: the scene
                // still renders, hands stay hidden.
                log::error!("input setup failed: {err}");
            }
        }

        self.window = Some(window);
        self.graphics = Some(graphics);
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shut_down(event_loop),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event, event_loop),
            WindowEvent::Resized(size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.resize(size.width, size.height);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != Phase::Running {
            return;
        }

        self.drain_runtime_events();
        self.update_input();
        self.render_frame(event_loop);
        if self.phase != Phase::Running {
            return;
        }

        // Blocking pose wait: the runtime paces the loop to its refresh rate.
        self.tracker.update(&mut self.backend);
        if let Some(renderer) = &mut self.renderer {
            renderer.set_head(self.tracker.head());
        }

        let time = self.clock.tick();
        self.frame_count += 1;
        if self.frame_count % FPS_LOG_INTERVAL == 0 {
            log::debug!(
                "{:.1} fps, {} devices tracked [{}]",
                time.fps,
                self.tracker.valid_count(),
                self.tracker.class_summary()
            );
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

pub fn run<B: VrSession + InputBackend + 'static>(
    config: AppConfig,
    backend: B,
    provider: Arc<dyn ModelProvider>,
) -> anyhow::Result<()> {
    let mut runner = Runner::new(config, backend, provider);
    let event_loop = EventLoop::new()?;
    // Poll: the pose wait inside the frame does the pacing, not winit.
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut runner)?;
    match runner.startup_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
