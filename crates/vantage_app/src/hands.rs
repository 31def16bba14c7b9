//! Per-hand controller state and action routing.

use std::path::Path;
use std::sync::Arc;

use glam::Mat4;
use vantage_renderer::Hand;
use vantage_runtime::{
    ActionHandle, ActionSetHandle, DeviceProperty, HapticPulse, InputBackend, PoseState,
    SourceHandle, VrSession,
};

use vantage_runtime::input::InputError;

/// The input handles of one hand.
pub struct HandBinding {
    pub pose: ActionHandle,
    pub haptic: ActionHandle,
    pub source: SourceHandle,
}

/// All action handles the frame loop queries, resolved once at startup.
pub struct HandActions {
    pub set: ActionSetHandle,
    pub hide_cubes: ActionHandle,
    pub trigger_haptic: ActionHandle,
    pub analog: ActionHandle,
    pub bindings: [HandBinding; 2],
}

impl HandActions {
    pub fn resolve(input: &mut dyn InputBackend, manifest: &Path) -> Result<Self, InputError> {
        input.set_manifest_path(manifest)?;

        let set = input.action_set_handle("/actions/vantage")?;
        let hide_cubes = input.action_handle("/actions/vantage/in/hide_cubes")?;
        let trigger_haptic = input.action_handle("/actions/vantage/in/trigger_haptic")?;
        let analog = input.action_handle("/actions/vantage/in/analog_input")?;

        let left = HandBinding {
            pose: input.action_handle("/actions/vantage/in/hand_left")?,
            haptic: input.action_handle("/actions/vantage/out/haptic_left")?,
            source: input.source_handle("/user/hand/left")?,
        };
        let right = HandBinding {
            pose: input.action_handle("/actions/vantage/in/hand_right")?,
            haptic: input.action_handle("/actions/vantage/out/haptic_right")?,
            source: input.source_handle("/user/hand/right")?,
        };

        Ok(Self {
            set,
            hide_cubes,
            trigger_haptic,
            analog,
            bindings: [left, right],
        })
    }

    /// Fires a pulse on the hand whose controller produced the trigger's
    /// rising edge this frame. The other hand is never pulsed.
    pub fn process_haptics(&self, input: &mut dyn InputBackend) {
        let Some(origin) = input.digital_rising_edge(self.trigger_haptic) else {
            return;
        };
        for hand in Hand::BOTH {
            let binding = &self.bindings[hand.index()];
            if binding.source == origin {
                input.trigger_haptic(binding.haptic, HapticPulse::TRIGGER);
            }
        }
    }
}

/// Last-known state of one hand controller, refreshed every frame.
pub struct HandState {
    pub pose: Mat4,
    pub visible: bool,
    pub model_name: Option<String>,
    pub model: Option<Arc<vantage_renderer::GpuModel>>,
}

impl HandState {
    pub fn new() -> Self {
        Self {
            pose: Mat4::IDENTITY,
            visible: false,
            model_name: None,
            model: None,
        }
    }

    /// Applies this frame's pose query. An inactive or invalid pose hides
    /// the hand until the next valid frame; it is not an error.
    ///
    /// Returns the render-model name to resolve when the bound device's
    /// model changed (or was seen for the first time).
    pub fn refresh(
        &mut self,
        state: Option<PoseState>,
        session: &dyn VrSession,
    ) -> Option<String> {
        let Some(state) = state else {
            self.visible = false;
            return None;
        };

        self.pose = state.pose;
        self.visible = true;

        let device = state.device?;
        let name = session.device_property(device, DeviceProperty::RenderModelName)?;
        if self.model_name.as_deref() != Some(name.as_str()) {
            log::info!("hand render model changed to `{name}`");
            self.model_name = Some(name.clone());
            self.model = None;
        }
        if self.model.is_none() {
            Some(name)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Input backend that records haptic requests and scripts one rising
    /// edge.
    struct RecordingInput {
        edge: Option<SourceHandle>,
        pulses: Vec<ActionHandle>,
    }

    impl InputBackend for RecordingInput {
        fn set_manifest_path(&mut self, _path: &Path) -> Result<(), InputError> {
            Ok(())
        }
        fn action_handle(&mut self, path: &str) -> Result<ActionHandle, InputError> {
            Ok(ActionHandle(path.len() as u64))
        }
        fn action_set_handle(&mut self, _path: &str) -> Result<ActionSetHandle, InputError> {
            Ok(ActionSetHandle(0))
        }
        fn source_handle(&mut self, path: &str) -> Result<SourceHandle, InputError> {
            Ok(SourceHandle(path.len() as u64))
        }
        fn update_actions(&mut self, _set: ActionSetHandle) {}
        fn digital_rising_edge(&mut self, _action: ActionHandle) -> Option<SourceHandle> {
            self.edge.take()
        }
        fn analog(&mut self, _action: ActionHandle) -> Option<Vec2> {
            None
        }
        fn pose_state(&mut self, _action: ActionHandle) -> Option<PoseState> {
            None
        }
        fn trigger_haptic(&mut self, action: ActionHandle, _pulse: HapticPulse) {
            self.pulses.push(action);
        }
    }

    #[test]
    fn left_trigger_pulses_only_the_left_hand() {
        let mut input = RecordingInput {
            edge: None,
            pulses: Vec::new(),
        };
        let actions =
            HandActions::resolve(&mut input, Path::new("demo.json")).expect("stub resolve");

        input.edge = Some(actions.bindings[Hand::Left.index()].source);
        actions.process_haptics(&mut input);

        assert_eq!(
            input.pulses,
            vec![actions.bindings[Hand::Left.index()].haptic]
        );
    }

    #[test]
    fn no_edge_means_no_pulse() {
        let mut input = RecordingInput {
            edge: None,
            pulses: Vec::new(),
        };
        let actions =
            HandActions::resolve(&mut input, Path::new("demo.json")).expect("stub resolve");
        actions.process_haptics(&mut input);
        assert!(input.pulses.is_empty());
    }
}
