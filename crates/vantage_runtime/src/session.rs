//! The `VrSession` trait — everything the frame loop asks of the HMD runtime.
//!
//! A backend owns the runtime session handle; dropping the backend releases
//! it (exactly once, enforced by ownership).  All methods are called from the
//! render thread only.

use glam::Mat4;
use thiserror::Error;

/// Opaque identity of a tracked device for the lifetime of the session.
///
/// The runtime guarantees identity stability across a session: a device that
/// disconnects and reconnects keeps its id.  The [`crate::tracker`] memo
/// table relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u32);

impl DeviceId {
    /// The head-mounted display always occupies identity 0.
    pub const HMD: DeviceId = DeviceId(0);
}

/// Kind of a tracked device.  Classification never changes for a given
/// [`DeviceId`] during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Hmd,
    Controller,
    GenericTracker,
    TrackingReference,
    Invalid,
}

impl DeviceClass {
    /// One-character tag used in the pose-class summary log line.
    pub fn tag(self) -> char {
        match self {
            DeviceClass::Hmd => 'H',
            DeviceClass::Controller => 'C',
            DeviceClass::GenericTracker => 'G',
            DeviceClass::TrackingReference => 'T',
            DeviceClass::Invalid => 'I',
        }
    }
}

/// String properties queryable per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceProperty {
    TrackingSystemName,
    SerialNumber,
    RenderModelName,
}

/// Left or right eye.  Render order is fixed: left first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];
}

/// Color space of a submitted eye texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gamma,
    Linear,
}

/// One device's pose for the upcoming frame, as delivered by `wait_poses`.
///
/// `pose` is the device-to-tracking transform and is only meaningful when
/// `valid` is set; stale poses must not be rendered.
#[derive(Debug, Clone, Copy)]
pub struct PoseSample {
    pub device: DeviceId,
    pub pose: Mat4,
    pub valid: bool,
}

impl PoseSample {
    /// Builds a sample from the runtime's native row-major 3×4 pose encoding.
    pub fn from_native(device: DeviceId, rows: [[f32; 4]; 3], valid: bool) -> Self {
        Self {
            device,
            pose: vantage_core::pose::from_rows_3x4(rows),
            valid,
        }
    }
}

/// Device lifecycle notifications drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEvent {
    DeviceActivated(DeviceId),
    DeviceDeactivated(DeviceId),
    DeviceUpdated(DeviceId),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("VR runtime initialisation failed: {0}")]
    Init(String),
    #[error("compositor rejected frame: {0}")]
    Submit(String),
}

/// Interface to the HMD runtime session.
pub trait VrSession {
    /// The runtime's recommended per-eye render target size in pixels.
    fn recommended_target_size(&self) -> (u32, u32);

    /// Queries a string property of a device.  `None` when the device does
    /// not expose the property (a normal, silent condition).
    fn device_property(&self, device: DeviceId, prop: DeviceProperty) -> Option<String>;

    /// Classifies a device.  Stable per [`DeviceId`] for the session.
    fn device_class(&self, device: DeviceId) -> DeviceClass;

    /// Per-eye projection matrix for the given clip planes.
    fn projection(&self, eye: Eye, near: f32, far: f32) -> Mat4;

    /// The fixed eye-to-head transform for the given eye.
    fn eye_to_head(&self, eye: Eye) -> Mat4;

    /// Drains one pending runtime event, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<RuntimeEvent>;

    /// Blocks until the runtime's pose data for the next frame is ready and
    /// fills `out` with one sample per tracked device.
    ///
    /// This is the primary frame-pacing synchronisation point: the call
    /// returns aligned with the runtime's target refresh rate.
    fn wait_poses(&mut self, out: &mut Vec<PoseSample>);

    /// Submits one eye's resolved texture to the compositor.
    fn submit(
        &mut self,
        eye: Eye,
        texture: &wgpu::Texture,
        color_space: ColorSpace,
    ) -> Result<(), SessionError>;

    /// Whether controller input is currently available (e.g. not captured by
    /// the runtime's own dashboard overlay).
    fn input_available(&self) -> bool;
}
