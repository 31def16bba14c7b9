//! The `InputBackend` trait — named actions resolved by the runtime.
//!
//! Actions (digital, analog, pose, haptic) are declared in a manifest file
//! and grouped into one action set.  The frame orchestrator resolves handles
//! once at startup and queries state by handle every frame.

use std::path::Path;

use glam::{Mat4, Vec2};
use thiserror::Error;

use crate::session::DeviceId;

/// Handle to a named input or output action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle(pub u64);

/// Handle to an action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionSetHandle(pub u64);

/// Handle to an input source (e.g. `/user/hand/left`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle(pub u64);

/// Result of a pose-action query for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PoseState {
    /// Device-to-tracking transform of the bound device.
    pub pose: Mat4,
    /// The tracked device the pose originates from, when the runtime can
    /// resolve it.  Used to look up the device's render-model name.
    pub device: Option<DeviceId>,
}

/// Parameters of a haptic vibration request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    pub duration_secs: f32,
    pub frequency_hz: f32,
    pub amplitude: f32,
}

impl HapticPulse {
    /// The pulse the orchestrator fires on the trigger action's rising edge.
    pub const TRIGGER: HapticPulse = HapticPulse {
        duration_secs: 1.0,
        frequency_hz: 4.0,
        amplitude: 1.0,
    };
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to load action manifest: {0}")]
    Manifest(String),
    #[error("unknown action path `{0}`")]
    UnknownAction(String),
}

/// Interface to the runtime's action-based input system.
pub trait InputBackend {
    /// Points the runtime at the action manifest.  Call once before
    /// resolving any handles.
    fn set_manifest_path(&mut self, path: &Path) -> Result<(), InputError>;

    fn action_handle(&mut self, path: &str) -> Result<ActionHandle, InputError>;
    fn action_set_handle(&mut self, path: &str) -> Result<ActionSetHandle, InputError>;
    fn source_handle(&mut self, path: &str) -> Result<SourceHandle, InputError>;

    /// Refreshes action state for the frame with the given set active.
    fn update_actions(&mut self, set: ActionSetHandle);

    /// Rising edge of a digital action this frame; returns the source that
    /// triggered it so the caller can route per-hand effects.
    fn digital_rising_edge(&mut self, action: ActionHandle) -> Option<SourceHandle>;

    /// Current value of an analog action, `None` while the action is inactive.
    fn analog(&mut self, action: ActionHandle) -> Option<Vec2>;

    /// Current pose of a pose action, `None` when inactive or invalid for
    /// this frame (the caller hides the hand's visuals, never errors).
    fn pose_state(&mut self, action: ActionHandle) -> Option<PoseState>;

    /// Fires a haptic pulse on an output action.
    fn trigger_haptic(&mut self, action: ActionHandle, pulse: HapticPulse);
}
