//! Offscreen eye render targets.

mod color;
mod depth;
mod target;

pub use color::ColorAttachment;
pub use depth::{DepthAttachment, DEPTH_FORMAT};
pub use target::{EyeTargets, RenderTarget, TargetError, COLOR_FORMAT, SAMPLE_COUNT};
