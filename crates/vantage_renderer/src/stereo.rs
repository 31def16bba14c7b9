//! Per-eye view and projection matrices.

use glam::Mat4;
use vantage_runtime::{Eye, VrSession};

/// Caches each eye's projection and head-to-eye transform so they are only
/// queried from the runtime when the clip planes change.
pub struct StereoView {
    projections: [Mat4; 2],
    head_to_eye: [Mat4; 2],
    head: Mat4,
    near: f32,
    far: f32,
}

impl StereoView {
    pub fn from_session(session: &dyn VrSession, near: f32, far: f32) -> Self {
        let mut view = Self::from_matrices(
            [
                session.projection(Eye::Left, near, far),
                session.projection(Eye::Right, near, far),
            ],
            [
                session.eye_to_head(Eye::Left).inverse(),
                session.eye_to_head(Eye::Right).inverse(),
            ],
            near,
            far,
        );
        view.head = Mat4::IDENTITY;
        view
    }

    /// Raw constructor; `head_to_eye` is the inverse of the eye-to-head
    /// transform the runtime reports.
    pub fn from_matrices(
        projections: [Mat4; 2],
        head_to_eye: [Mat4; 2],
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            projections,
            head_to_eye,
            head: Mat4::IDENTITY,
            near,
            far,
        }
    }

    /// Re-fetches the projections when the clip planes actually changed.
    pub fn set_clip(&mut self, session: &dyn VrSession, near: f32, far: f32) {
        if near == self.near && far == self.far {
            return;
        }
        self.near = near;
        self.far = far;
        self.projections = [
            session.projection(Eye::Left, near, far),
            session.projection(Eye::Right, near, far),
        ];
    }

    /// `head` is the world-from-head transform already inverted by the pose
    /// tracker, so it applies directly as the view matrix.
    pub fn set_head(&mut self, head: Mat4) {
        self.head = head;
    }

    pub fn view_projection(&self, eye: Eye) -> Mat4 {
        let i = eye as usize;
        self.projections[i] * self.head_to_eye[i] * self.head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn identity_eyes_reduce_to_projection_times_head() {
        let proj = Mat4::perspective_rh(1.5, 1.0, 0.1, 30.0);
        let head = Mat4::from_translation(Vec3::new(0.0, -1.6, 0.0));
        let mut view = StereoView::from_matrices(
            [proj, proj],
            [Mat4::IDENTITY, Mat4::IDENTITY],
            0.1,
            30.0,
        );
        view.set_head(head);

        let expected = proj * head;
        assert_eq!(view.view_projection(Eye::Left), expected);
        assert_eq!(view.view_projection(Eye::Right), expected);
    }

    #[test]
    fn eye_offset_shifts_the_view() {
        let proj = Mat4::perspective_rh(1.5, 1.0, 0.1, 30.0);
        let eye_to_head = Mat4::from_translation(Vec3::new(0.032, 0.0, 0.0));
        let view = StereoView::from_matrices(
            [proj, proj],
            [eye_to_head.inverse(), Mat4::IDENTITY],
            0.1,
            30.0,
        );

        let p = Vec4::new(0.0, 0.0, -1.0, 1.0);
        let left = view.view_projection(Eye::Left) * p;
        let right = view.view_projection(Eye::Right) * p;
        assert_ne!(left.x, right.x);
    }
}
