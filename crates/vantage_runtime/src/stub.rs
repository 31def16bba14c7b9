//! Deterministic desktop backend.
//!
//! Stands in for the real HMD runtime so the client runs (and the frame loop
//! can be tested) on a machine with no VR hardware: `wait_poses` paces the
//! loop to 90 Hz, the HMD sits at standing height, and two controllers bob
//! gently in front of it.  The model provider serves one built-in wand model
//! and reports every other name as unknown.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec2, Vec3};

use crate::input::{
    ActionHandle, ActionSetHandle, HapticPulse, InputBackend, InputError, PoseState, SourceHandle,
};
use crate::models::{LoadPoll, ModelData, ModelProvider, ModelVertex, ProviderError, TextureData};
use crate::session::{
    ColorSpace, DeviceClass, DeviceId, DeviceProperty, Eye, PoseSample, RuntimeEvent,
    SessionError, VrSession,
};

const FRAME_PERIOD: Duration = Duration::from_micros(11_111); // ~90 Hz
const IPD_METERS: f32 = 0.064;

const LEFT_HAND: DeviceId = DeviceId(1);
const RIGHT_HAND: DeviceId = DeviceId(2);

/// Desktop stand-in for the VR runtime session and input system.
pub struct StubSession {
    start: Instant,
    next_frame: Instant,
    events: VecDeque<RuntimeEvent>,
    /// Action path per handed-out handle, used to answer state queries.
    actions: Vec<String>,
    sources: Vec<String>,
}

impl StubSession {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            next_frame: now + FRAME_PERIOD,
            events: VecDeque::from([
                RuntimeEvent::DeviceActivated(LEFT_HAND),
                RuntimeEvent::DeviceActivated(RIGHT_HAND),
            ]),
            actions: Vec::new(),
            sources: Vec::new(),
        }
    }

    fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    fn hand_pose(&self, device: DeviceId) -> Mat4 {
        let side = if device == LEFT_HAND { -1.0 } else { 1.0 };
        let t = self.elapsed();
        // Slow bob so motion is visible in the companion window.
        let bob = (t * 1.3 + side).sin() * 0.03;
        Mat4::from_translation(Vec3::new(side * 0.22, 1.25 + bob, -0.35))
    }

    fn action_path(&self, handle: ActionHandle) -> Option<&str> {
        self.actions.get(handle.0 as usize).map(String::as_str)
    }
}

impl Default for StubSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VrSession for StubSession {
    fn recommended_target_size(&self) -> (u32, u32) {
        (1344, 1512)
    }

    fn device_property(&self, device: DeviceId, prop: DeviceProperty) -> Option<String> {
        match prop {
            DeviceProperty::TrackingSystemName => Some("vantage-stub".to_owned()),
            DeviceProperty::SerialNumber => Some(format!("STUB-{:04}", device.0)),
            DeviceProperty::RenderModelName => match device {
                LEFT_HAND | RIGHT_HAND => Some("stub_wand".to_owned()),
                _ => None,
            },
        }
    }

    fn device_class(&self, device: DeviceId) -> DeviceClass {
        match device {
            DeviceId::HMD => DeviceClass::Hmd,
            LEFT_HAND | RIGHT_HAND => DeviceClass::Controller,
            _ => DeviceClass::Invalid,
        }
    }

    fn projection(&self, _eye: Eye, near: f32, far: f32) -> Mat4 {
        // Real HMD projections are asymmetric per eye; a symmetric frustum is
        // close enough for a desktop preview.
        Mat4::perspective_rh(100f32.to_radians(), 1.0, near, far)
    }

    fn eye_to_head(&self, eye: Eye) -> Mat4 {
        let side = match eye {
            Eye::Left => -1.0,
            Eye::Right => 1.0,
        };
        Mat4::from_translation(Vec3::new(side * IPD_METERS / 2.0, 0.0, 0.0))
    }

    fn poll_event(&mut self) -> Option<RuntimeEvent> {
        self.events.pop_front()
    }

    fn wait_poses(&mut self, out: &mut Vec<PoseSample>) {
        // Pace the caller like the compositor's vsync-aligned pose delivery.
        let now = Instant::now();
        if self.next_frame > now {
            std::thread::sleep(self.next_frame - now);
        }
        self.next_frame += FRAME_PERIOD;
        if self.next_frame < Instant::now() {
            // Fell behind (load hitch); resynchronise instead of sprinting.
            self.next_frame = Instant::now() + FRAME_PERIOD;
        }

        out.clear();
        out.push(PoseSample {
            device: DeviceId::HMD,
            pose: Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0)),
            valid: true,
        });
        for device in [LEFT_HAND, RIGHT_HAND] {
            out.push(PoseSample {
                device,
                pose: self.hand_pose(device),
                valid: true,
            });
        }
    }

    fn submit(
        &mut self,
        _eye: Eye,
        _texture: &wgpu::Texture,
        _color_space: ColorSpace,
    ) -> Result<(), SessionError> {
        Ok(())
    }

    fn input_available(&self) -> bool {
        true
    }
}

impl InputBackend for StubSession {
    fn set_manifest_path(&mut self, _path: &Path) -> Result<(), InputError> {
        Ok(())
    }

    fn action_handle(&mut self, path: &str) -> Result<ActionHandle, InputError> {
        self.actions.push(path.to_owned());
        Ok(ActionHandle(self.actions.len() as u64 - 1))
    }

    fn action_set_handle(&mut self, _path: &str) -> Result<ActionSetHandle, InputError> {
        Ok(ActionSetHandle(0))
    }

    fn source_handle(&mut self, path: &str) -> Result<SourceHandle, InputError> {
        self.sources.push(path.to_owned());
        Ok(SourceHandle(self.sources.len() as u64 - 1))
    }

    fn update_actions(&mut self, _set: ActionSetHandle) {}

    fn digital_rising_edge(&mut self, _action: ActionHandle) -> Option<SourceHandle> {
        None
    }

    fn analog(&mut self, _action: ActionHandle) -> Option<Vec2> {
        None
    }

    fn pose_state(&mut self, action: ActionHandle) -> Option<PoseState> {
        let path = self.action_path(action)?;
        let device = if path.ends_with("hand_left") {
            LEFT_HAND
        } else if path.ends_with("hand_right") {
            RIGHT_HAND
        } else {
            return None;
        };
        Some(PoseState {
            pose: self.hand_pose(device),
            device: Some(device),
        })
    }

    fn trigger_haptic(&mut self, action: ActionHandle, pulse: HapticPulse) {
        log::debug!("stub haptic pulse on action {:?}: {:?}", action, pulse);
    }
}

// ── Model provider ───────────────────────────────────────────────────────────

/// Serves one built-in wand model, reporting `Loading` for a couple of polls
/// to exercise the cache's async path.
pub struct StubProvider {
    polls: Mutex<std::collections::HashMap<String, u32>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            polls: Mutex::new(std::collections::HashMap::new()),
        }
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelProvider for StubProvider {
    fn poll_model(&self, name: &str) -> LoadPoll {
        if !name.eq_ignore_ascii_case("stub_wand") {
            return LoadPoll::Failed(ProviderError::UnknownModel(name.to_owned()));
        }
        let mut polls = self.polls.lock().expect("poll table poisoned");
        let count = polls.entry(name.to_ascii_lowercase()).or_insert(0);
        *count += 1;
        if *count <= 2 {
            LoadPoll::Loading
        } else {
            LoadPoll::Ready(wand_model())
        }
    }
}

/// A narrow box, 14 cm long, pointing down local -Z like a controller grip.
fn wand_model() -> ModelData {
    let (hx, hy, z0, z1) = (0.02f32, 0.02f32, 0.04f32, -0.10f32);
    let v = |p: [f32; 3], n: [f32; 3], t: [f32; 2]| ModelVertex {
        position: p,
        normal: n,
        tex_coord: t,
    };

    #[rustfmt::skip]
    let vertices = vec![
        // front (z0, toward the user)
        v([-hx, -hy, z0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        v([ hx, -hy, z0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        v([ hx,  hy, z0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        v([-hx,  hy, z0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        // back (z1, pointer tip)
        v([-hx, -hy, z1], [0.0, 0.0, -1.0], [0.0, 1.0]),
        v([ hx, -hy, z1], [0.0, 0.0, -1.0], [1.0, 1.0]),
        v([ hx,  hy, z1], [0.0, 0.0, -1.0], [1.0, 0.0]),
        v([-hx,  hy, z1], [0.0, 0.0, -1.0], [0.0, 0.0]),
        // left
        v([-hx, -hy, z1], [-1.0, 0.0, 0.0], [0.0, 1.0]),
        v([-hx, -hy, z0], [-1.0, 0.0, 0.0], [1.0, 1.0]),
        v([-hx,  hy, z0], [-1.0, 0.0, 0.0], [1.0, 0.0]),
        v([-hx,  hy, z1], [-1.0, 0.0, 0.0], [0.0, 0.0]),
        // right
        v([ hx, -hy, z0], [1.0, 0.0, 0.0], [0.0, 1.0]),
        v([ hx, -hy, z1], [1.0, 0.0, 0.0], [1.0, 1.0]),
        v([ hx,  hy, z1], [1.0, 0.0, 0.0], [1.0, 0.0]),
        v([ hx,  hy, z0], [1.0, 0.0, 0.0], [0.0, 0.0]),
        // top
        v([-hx,  hy, z0], [0.0, 1.0, 0.0], [0.0, 1.0]),
        v([ hx,  hy, z0], [0.0, 1.0, 0.0], [1.0, 1.0]),
        v([ hx,  hy, z1], [0.0, 1.0, 0.0], [1.0, 0.0]),
        v([-hx,  hy, z1], [0.0, 1.0, 0.0], [0.0, 0.0]),
        // bottom
        v([-hx, -hy, z1], [0.0, -1.0, 0.0], [0.0, 1.0]),
        v([ hx, -hy, z1], [0.0, -1.0, 0.0], [1.0, 1.0]),
        v([ hx, -hy, z0], [0.0, -1.0, 0.0], [1.0, 0.0]),
        v([-hx, -hy, z0], [0.0, -1.0, 0.0], [0.0, 0.0]),
    ];

    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2,  2, 3, 0,
        4, 6, 5,  4, 7, 6,
        8, 9, 10, 8, 10, 11,
        12, 13, 14, 12, 14, 15,
        16, 17, 18, 16, 18, 19,
        20, 21, 22, 20, 22, 23,
    ];

    // 2x2 light grey checker so the texture path is visibly exercised.
    let texture = TextureData {
        width: 2,
        height: 2,
        rgba: vec![
            200, 200, 200, 255, 120, 120, 120, 255, //
            120, 120, 120, 255, 200, 200, 200, 255,
        ],
    };

    ModelData {
        vertices,
        indices,
        texture,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_serves_wand_after_loading_polls() {
        let provider = StubProvider::new();
        assert!(matches!(provider.poll_model("stub_wand"), LoadPoll::Loading));
        assert!(matches!(provider.poll_model("STUB_WAND"), LoadPoll::Loading));
        match provider.poll_model("stub_wand") {
            LoadPoll::Ready(data) => {
                assert_eq!(data.vertices.len(), 24);
                assert_eq!(data.index_count(), 36);
            }
            _ => panic!("expected the model on the third poll"),
        }
    }

    #[test]
    fn unknown_model_fails_immediately() {
        let provider = StubProvider::new();
        assert!(matches!(
            provider.poll_model("no_such_model"),
            LoadPoll::Failed(ProviderError::UnknownModel(_))
        ));
    }

    #[test]
    fn hand_pose_actions_resolve_to_devices() {
        let mut session = StubSession::new();
        let left = session
            .action_handle("/actions/vantage/in/hand_left")
            .unwrap();
        let state = session.pose_state(left).expect("left hand active");
        assert_eq!(state.device, Some(DeviceId(1)));
    }
}
