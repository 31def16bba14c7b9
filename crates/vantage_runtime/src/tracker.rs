//! Per-frame tracked-device pose table.
//!
//! `PoseTracker::update` is the blocking pacing point of the frame loop: it
//! waits on the runtime for the next frame's poses, refreshes the device
//! table and derives the head (camera) transform.  Absence or invalidity of
//! a device is a normal, silent condition.

use std::collections::HashMap;

use glam::Mat4;

use crate::session::{DeviceClass, DeviceId, PoseSample, VrSession};

/// Last-known state of one tracked device.
#[derive(Debug, Clone, Copy)]
pub struct TrackedDevice {
    /// Device-to-tracking transform; meaningful only while `valid`.
    pub pose: Mat4,
    /// Classification, memoized on first valid sighting.  Device identity is
    /// stable for the session, so the memo is never invalidated.
    pub class: Option<DeviceClass>,
    pub valid: bool,
}

/// Tracks every device's pose and the derived head transform, frame by frame.
pub struct PoseTracker {
    devices: HashMap<DeviceId, TrackedDevice>,
    /// Tracking-to-head transform (inverse of the HMD pose).  Retained
    /// unchanged across frames where the HMD pose is invalid.
    head: Mat4,
    valid_count: usize,
    last_logged_count: Option<usize>,
    class_summary: String,
    samples: Vec<PoseSample>,
}

impl PoseTracker {
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
            head: Mat4::IDENTITY,
            valid_count: 0,
            last_logged_count: None,
            class_summary: String::new(),
            samples: Vec::new(),
        }
    }

    /// Blocks on the runtime for the next frame's poses and refreshes the
    /// device table.  Never fails.
    pub fn update(&mut self, session: &mut dyn VrSession) {
        session.wait_poses(&mut self.samples);

        self.valid_count = 0;
        self.class_summary.clear();

        for sample in &self.samples {
            let entry = self.devices.entry(sample.device).or_insert(TrackedDevice {
                pose: Mat4::IDENTITY,
                class: None,
                valid: false,
            });
            entry.valid = sample.valid;
            if sample.valid {
                self.valid_count += 1;
                entry.pose = sample.pose;
                let class = *entry
                    .class
                    .get_or_insert_with(|| session.device_class(sample.device));
                self.class_summary.push(class.tag());
            }
        }

        if self.last_logged_count != Some(self.valid_count) {
            self.last_logged_count = Some(self.valid_count);
            log::debug!(
                "valid poses: {} ({})",
                self.valid_count,
                self.class_summary
            );
        }

        if let Some(hmd) = self.devices.get(&DeviceId::HMD) {
            if hmd.valid {
                self.head = hmd.pose.inverse();
            }
        }
    }

    /// Current tracking-to-head transform (the camera's view of the world).
    pub fn head(&self) -> Mat4 {
        self.head
    }

    pub fn device(&self, id: DeviceId) -> Option<&TrackedDevice> {
        self.devices.get(&id)
    }

    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// One class tag per valid device this frame, e.g. `"HCC"`.
    pub fn class_summary(&self) -> &str {
        &self.class_summary
    }
}

impl Default for PoseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{
        ColorSpace, DeviceProperty, Eye, RuntimeEvent, SessionError,
    };
    use glam::Vec3;
    use std::cell::Cell;
    use std::collections::VecDeque;

    /// Scripted session: pops one pose frame per `wait_poses` call and counts
    /// classification queries.
    struct ScriptedSession {
        frames: VecDeque<Vec<PoseSample>>,
        class_queries: Cell<usize>,
    }

    impl ScriptedSession {
        fn new(frames: Vec<Vec<PoseSample>>) -> Self {
            Self {
                frames: frames.into(),
                class_queries: Cell::new(0),
            }
        }
    }

    impl VrSession for ScriptedSession {
        fn recommended_target_size(&self) -> (u32, u32) {
            (64, 64)
        }
        fn device_property(&self, _: DeviceId, _: DeviceProperty) -> Option<String> {
            None
        }
        fn device_class(&self, device: DeviceId) -> DeviceClass {
            self.class_queries.set(self.class_queries.get() + 1);
            if device == DeviceId::HMD {
                DeviceClass::Hmd
            } else {
                DeviceClass::Controller
            }
        }
        fn projection(&self, _: Eye, _: f32, _: f32) -> Mat4 {
            Mat4::IDENTITY
        }
        fn eye_to_head(&self, _: Eye) -> Mat4 {
            Mat4::IDENTITY
        }
        fn poll_event(&mut self) -> Option<RuntimeEvent> {
            None
        }
        fn wait_poses(&mut self, out: &mut Vec<PoseSample>) {
            out.clear();
            if let Some(frame) = self.frames.pop_front() {
                out.extend(frame);
            }
        }
        fn submit(
            &mut self,
            _: Eye,
            _: &wgpu::Texture,
            _: ColorSpace,
        ) -> Result<(), SessionError> {
            Ok(())
        }
        fn input_available(&self) -> bool {
            true
        }
    }

    fn hmd_at(pos: Vec3, valid: bool) -> PoseSample {
        PoseSample {
            device: DeviceId::HMD,
            pose: Mat4::from_translation(pos),
            valid,
        }
    }

    #[test]
    fn head_is_inverse_of_hmd_pose() {
        let mut session =
            ScriptedSession::new(vec![vec![hmd_at(Vec3::new(0.0, 1.6, 0.0), true)]]);
        let mut tracker = PoseTracker::new();
        tracker.update(&mut session);
        let expected = Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0)).inverse();
        assert_eq!(tracker.head(), expected);
    }

    #[test]
    fn head_retained_while_hmd_invalid() {
        let pos = Vec3::new(1.0, 2.0, 3.0);
        let mut session = ScriptedSession::new(vec![
            vec![hmd_at(pos, true)],
            vec![hmd_at(Vec3::ZERO, false)],
            vec![],
        ]);
        let mut tracker = PoseTracker::new();
        tracker.update(&mut session);
        let head = tracker.head();
        tracker.update(&mut session);
        assert_eq!(tracker.head(), head);
        tracker.update(&mut session);
        assert_eq!(tracker.head(), head);
    }

    #[test]
    fn classification_is_memoized_per_device() {
        let controller = PoseSample {
            device: DeviceId(3),
            pose: Mat4::IDENTITY,
            valid: true,
        };
        let mut session = ScriptedSession::new(vec![
            vec![hmd_at(Vec3::ZERO, true), controller],
            vec![hmd_at(Vec3::ZERO, true), controller],
            vec![hmd_at(Vec3::ZERO, true), controller],
        ]);
        let mut tracker = PoseTracker::new();
        for _ in 0..3 {
            tracker.update(&mut session);
        }
        // One query per device, not per frame.
        assert_eq!(session.class_queries.get(), 2);
        assert_eq!(tracker.class_summary(), "HC");
        assert_eq!(tracker.valid_count(), 2);
    }

    #[test]
    fn invalid_device_keeps_table_entry() {
        let mut session = ScriptedSession::new(vec![
            vec![hmd_at(Vec3::ZERO, true)],
            vec![hmd_at(Vec3::ZERO, false)],
        ]);
        let mut tracker = PoseTracker::new();
        tracker.update(&mut session);
        tracker.update(&mut session);
        let hmd = tracker.device(DeviceId::HMD).expect("entry survives");
        assert!(!hmd.valid);
        assert_eq!(hmd.class, Some(DeviceClass::Hmd));
    }
}
