//! Controller axis gizmo: three colored axis segments plus a pointer ray.

use glam::{Mat4, Vec4};

use super::vertex::ColorVertex;

/// Line-list vertices for one axis gizmo per pose. Each pose contributes
/// eight vertices: three 5 cm axis segments from the controller origin and
/// one long pointer ray down -Z.
pub fn build(poses: &[Mat4]) -> Vec<ColorVertex> {
    let mut vertices = Vec::with_capacity(poses.len() * 8);

    for pose in poses {
        let center = *pose * Vec4::new(0.0, 0.0, 0.0, 1.0);
        for i in 0..3 {
            let mut color = [0.0f32; 3];
            color[i] = 1.0;
            let mut point = Vec4::new(0.0, 0.0, 0.0, 1.0);
            point[i] += 0.05;
            let point = *pose * point;

            vertices.push(ColorVertex {
                position: [center.x, center.y, center.z],
                color,
            });
            vertices.push(ColorVertex {
                position: [point.x, point.y, point.z],
                color,
            });
        }

        let start = *pose * Vec4::new(0.0, 0.0, -0.02, 1.0);
        let end = *pose * Vec4::new(0.0, 0.0, -39.0, 1.0);
        let color = [0.92, 0.92, 0.71];
        vertices.push(ColorVertex {
            position: [start.x, start.y, start.z],
            color,
        });
        vertices.push(ColorVertex {
            position: [end.x, end.y, end.z],
            color,
        });
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn eight_vertices_per_pose() {
        assert_eq!(build(&[]).len(), 0);
        assert_eq!(build(&[Mat4::IDENTITY]).len(), 8);
        assert_eq!(build(&[Mat4::IDENTITY, Mat4::IDENTITY]).len(), 16);
    }

    #[test]
    fn axis_segments_follow_the_pose() {
        let pose = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let verts = build(&[pose]);

        // Each axis segment starts at the translated origin.
        for i in 0..3 {
            assert_eq!(verts[i * 2].position, [1.0, 2.0, 3.0]);
        }
        // X axis endpoint, with the red channel set.
        assert_eq!(verts[1].position, [1.05, 2.0, 3.0]);
        assert_eq!(verts[1].color, [1.0, 0.0, 0.0]);

        // Pointer ray runs down -Z from just in front of the controller.
        assert_eq!(verts[6].position, [1.0, 2.0, 3.0 - 0.02]);
        assert_eq!(verts[7].position, [1.0, 2.0, 3.0 - 39.0]);
        assert_eq!(verts[7].color, [0.92, 0.92, 0.71]);
    }
}
