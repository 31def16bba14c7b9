//! Conversions from the VR runtime's native matrix encodings into `glam`.
//!
//! The runtime hands out rigid device poses as row-major 3×4 arrays (the
//! bottom row `[0, 0, 0, 1]` is implicit) and projections as row-major 4×4
//! arrays.  `glam::Mat4` is column-major, so both conversions transpose.

use glam::{Mat4, Vec4};

/// Converts a runtime-native rigid pose (row-major 3×4, implicit bottom row)
/// into a column-major `Mat4`.
pub fn from_rows_3x4(m: [[f32; 4]; 3]) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(m[0][0], m[1][0], m[2][0], 0.0),
        Vec4::new(m[0][1], m[1][1], m[2][1], 0.0),
        Vec4::new(m[0][2], m[1][2], m[2][2], 0.0),
        Vec4::new(m[0][3], m[1][3], m[2][3], 1.0),
    )
}

/// Converts a runtime-native projection matrix (row-major 4×4) into `Mat4`.
pub fn from_rows_4x4(m: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(m[0][0], m[1][0], m[2][0], m[3][0]),
        Vec4::new(m[0][1], m[1][1], m[2][1], m[3][1]),
        Vec4::new(m[0][2], m[1][2], m[2][2], m[3][2]),
        Vec4::new(m[0][3], m[1][3], m[2][3], m[3][3]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn identity_pose_converts_to_identity() {
        let rows = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        assert_eq!(from_rows_3x4(rows), Mat4::IDENTITY);
    }

    #[test]
    fn translation_lands_in_w_axis() {
        let rows = [
            [1.0, 0.0, 0.0, 1.5],
            [0.0, 1.0, 0.0, -2.0],
            [0.0, 0.0, 1.0, 3.0],
        ];
        let m = from_rows_3x4(rows);
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.5, -2.0, 3.0));
        // Rigid: transforming the origin yields the translation.
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(1.5, -2.0, 3.0));
    }

    #[test]
    fn projection_transposes_rows_to_cols() {
        let mut rows = [[0.0f32; 4]; 4];
        rows[0][3] = 7.0; // row 0, col 3
        let m = from_rows_4x4(rows);
        // Column-major cell (col 3, row 0).
        assert_eq!(m.w_axis.x, 7.0);
    }
}
