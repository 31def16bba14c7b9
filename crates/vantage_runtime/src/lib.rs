//! `vantage_runtime` — the boundary between Vantage and the VR runtime.
//!
//! The actual HMD runtime (compositor, input system, render-model service)
//! is an external collaborator.  This crate defines the traits Vantage talks
//! through and the per-frame machinery built on top of them:
//!
//! | Module    | Responsibility                                          |
//! |-----------|---------------------------------------------------------|
//! | `session` | `VrSession` trait: poses, events, projection, submit    |
//! | `input`   | `InputBackend` trait: actions, haptics, hand poses      |
//! | `models`  | `ModelProvider` trait + CPU-side render-model data      |
//! | `tracker` | Per-frame tracked-device pose table and head transform  |
//! | `cache`   | Deduplicating render-model cache with background loads  |
//! | `stub`    | Deterministic desktop backend (no hardware required)    |

pub mod cache;
pub mod input;
pub mod models;
pub mod session;
pub mod stub;
pub mod tracker;

pub use cache::{ModelCache, ModelState, ModelUploader};
pub use input::{ActionHandle, ActionSetHandle, HapticPulse, InputBackend, PoseState, SourceHandle};
pub use models::{LoadPoll, ModelData, ModelProvider, ModelVertex, ProviderError, TextureData};
pub use session::{
    ColorSpace, DeviceClass, DeviceId, DeviceProperty, Eye, PoseSample, RuntimeEvent,
    SessionError, VrSession,
};
pub use tracker::PoseTracker;
