//! Per-eye render target pairs.

use thiserror::Error;
use vantage_runtime::Eye;

use super::{ColorAttachment, DepthAttachment};

pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const SAMPLE_COUNT: u32 = 4;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("render target dimensions must be nonzero, got {width}x{height}")]
    ZeroSized { width: u32, height: u32 },
    #[error("render target {width}x{height} exceeds device limit {limit}")]
    TooLarge { width: u32, height: u32, limit: u32 },
}

/// One eye's attachments: MSAA color + depth, and the resolved texture the
/// compositor and companion window consume.
pub struct RenderTarget {
    color: ColorAttachment,
    depth: DepthAttachment,
    width: u32,
    height: u32,
}

impl RenderTarget {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, TargetError> {
        if width == 0 || height == 0 {
            return Err(TargetError::ZeroSized { width, height });
        }
        let limit = device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(TargetError::TooLarge {
                width,
                height,
                limit,
            });
        }

        Ok(Self {
            color: ColorAttachment::new(device, label, width, height),
            depth: DepthAttachment::new(device, label, width, height),
            width,
            height,
        })
    }

    pub fn color(&self) -> &ColorAttachment {
        &self.color
    }

    pub fn depth(&self) -> &DepthAttachment {
        &self.depth
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The stereo pair, both eyes sized to the headset's recommended resolution.
pub struct EyeTargets {
    left: RenderTarget,
    right: RenderTarget,
}

impl EyeTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, TargetError> {
        log::info!("eye render targets: {width}x{height}, {SAMPLE_COUNT}x MSAA");
        Ok(Self {
            left: RenderTarget::new(device, "Left Eye", width, height)?,
            right: RenderTarget::new(device, "Right Eye", width, height)?,
        })
    }

    pub fn eye(&self, eye: Eye) -> &RenderTarget {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }
}
