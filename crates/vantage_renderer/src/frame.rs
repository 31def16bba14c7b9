//! Per-frame draw planning.
//!
//! The draw list is assembled from plain counts and flags before any pass
//! records commands, so empty buffers never reach the GPU as zero-length
//! draws.

/// Hand identity, also the model-matrix slot assignment for hand models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

/// What the scene pass should record this frame, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    Cubes { vertex_count: u32 },
    Axes { vertex_count: u32 },
    PointCloud { vertex_count: u32 },
    ColorMesh { vertex_count: u32 },
    HandModel { hand: Hand },
}

/// Everything the planner needs, already reduced to counts and flags.
#[derive(Debug, Clone, Copy)]
pub struct FrameState {
    pub show_cubes: bool,
    pub input_available: bool,
    pub cube_vertices: u32,
    pub axis_vertices: u32,
    pub cloud_vertices: u32,
    pub mesh_vertices: u32,
    /// Per hand: pose valid this frame and a model resident on the GPU.
    pub hand_renderable: [bool; 2],
}

pub fn build_draw_list(state: &FrameState) -> Vec<DrawCall> {
    let mut calls = Vec::new();

    if state.show_cubes && state.cube_vertices > 0 {
        calls.push(DrawCall::Cubes {
            vertex_count: state.cube_vertices,
        });
    }

    if state.input_available {
        if state.axis_vertices > 0 {
            calls.push(DrawCall::Axes {
                vertex_count: state.axis_vertices,
            });
        }
        if state.cloud_vertices > 0 {
            calls.push(DrawCall::PointCloud {
                vertex_count: state.cloud_vertices,
            });
        }
        if state.mesh_vertices > 0 {
            calls.push(DrawCall::ColorMesh {
                vertex_count: state.mesh_vertices,
            });
        }
    }

    for hand in Hand::BOTH {
        if state.hand_renderable[hand.index()] {
            calls.push(DrawCall::HandModel { hand });
        }
    }

    calls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FrameState {
        FrameState {
            show_cubes: true,
            input_available: true,
            cube_vertices: 36,
            axis_vertices: 16,
            cloud_vertices: 0,
            mesh_vertices: 0,
            hand_renderable: [false, false],
        }
    }

    #[test]
    fn empty_point_cloud_emits_no_draw() {
        let calls = build_draw_list(&base());
        assert!(!calls
            .iter()
            .any(|c| matches!(c, DrawCall::PointCloud { .. })));

        let mut with_cloud = base();
        with_cloud.cloud_vertices = 128;
        let calls = build_draw_list(&with_cloud);
        assert!(calls.contains(&DrawCall::PointCloud { vertex_count: 128 }));
    }

    #[test]
    fn cube_toggle_hides_the_volume() {
        let mut state = base();
        state.show_cubes = false;
        let calls = build_draw_list(&state);
        assert!(!calls.iter().any(|c| matches!(c, DrawCall::Cubes { .. })));
    }

    #[test]
    fn axes_require_input_availability() {
        let mut state = base();
        state.input_available = false;
        let calls = build_draw_list(&state);
        assert!(!calls.iter().any(|c| matches!(c, DrawCall::Axes { .. })));
    }

    #[test]
    fn hands_draw_independently() {
        let mut state = base();
        state.hand_renderable = [true, false];
        let calls = build_draw_list(&state);
        assert!(calls.contains(&DrawCall::HandModel { hand: Hand::Left }));
        assert!(!calls.contains(&DrawCall::HandModel { hand: Hand::Right }));
    }
}
