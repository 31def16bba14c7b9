//! Generator for the textured cube lattice that fills the scene.

use glam::{Mat4, Vec3, Vec4};

use super::vertex::SceneVertex;

/// Dimensions and spacing of the cube lattice. The lattice is centered on
/// the origin and rebuilt from scratch whenever these change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeVolume {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub scale: f32,
    pub spacing: f32,
}

impl Default for CubeVolume {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            depth: 20,
            scale: 0.3,
            spacing: 4.0,
        }
    }
}

impl CubeVolume {
    pub fn with_side(side: u32) -> Self {
        Self {
            width: side,
            height: side,
            depth: side,
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        (self.width * self.height * self.depth) as usize * 36
    }

    /// Builds the full lattice. Cubes are emitted in x-major, then y, then z
    /// order, each one translated from the previous by `spacing`.
    pub fn build(&self) -> Vec<SceneVertex> {
        let mut vertices = Vec::with_capacity(self.vertex_count());

        let mut mat = Mat4::from_scale(Vec3::splat(self.scale))
            * Mat4::from_translation(Vec3::new(
                -(self.width as f32) * self.spacing / 2.0,
                -(self.height as f32) * self.spacing / 2.0,
                -(self.depth as f32) * self.spacing / 2.0,
            ));

        for _z in 0..self.depth {
            for _y in 0..self.height {
                for _x in 0..self.width {
                    push_cube(mat, &mut vertices);
                    mat *= Mat4::from_translation(Vec3::new(self.spacing, 0.0, 0.0));
                }
                mat *= Mat4::from_translation(Vec3::new(
                    -(self.width as f32) * self.spacing,
                    self.spacing,
                    0.0,
                ));
            }
            mat *= Mat4::from_translation(Vec3::new(
                0.0,
                -(self.height as f32) * self.spacing,
                self.spacing,
            ));
        }

        vertices
    }
}

fn push_cube(mat: Mat4, vertices: &mut Vec<SceneVertex>) {
    let a = mat * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let b = mat * Vec4::new(1.0, 0.0, 0.0, 1.0);
    let c = mat * Vec4::new(1.0, 1.0, 0.0, 1.0);
    let d = mat * Vec4::new(0.0, 1.0, 0.0, 1.0);
    let e = mat * Vec4::new(0.0, 0.0, 1.0, 1.0);
    let f = mat * Vec4::new(1.0, 0.0, 1.0, 1.0);
    let g = mat * Vec4::new(1.0, 1.0, 1.0, 1.0);
    let h = mat * Vec4::new(0.0, 1.0, 1.0, 1.0);

    push_face(vertices, [e, f, g, g, h, e]); // front
    push_face(vertices, [b, a, d, d, c, b]); // back
    push_face(vertices, [h, g, c, c, d, h]); // top
    push_face(vertices, [a, b, f, f, e, a]); // bottom
    push_face(vertices, [a, e, h, h, d, a]); // left
    push_face(vertices, [f, b, c, c, g, f]); // right
}

fn push_face(vertices: &mut Vec<SceneVertex>, corners: [Vec4; 6]) {
    const UVS: [[f32; 2]; 6] = [
        [0.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
        [1.0, 0.0],
        [0.0, 0.0],
        [0.0, 1.0],
    ];
    for (corner, uv) in corners.iter().zip(UVS) {
        vertices.push(SceneVertex {
            position: [corner.x, corner.y, corner.z],
            tex_coord: uv,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_matches_dimensions() {
        let volume = CubeVolume {
            width: 3,
            height: 2,
            depth: 4,
            scale: 0.3,
            spacing: 4.0,
        };
        let verts = volume.build();
        assert_eq!(verts.len(), 3 * 2 * 4 * 36);
        assert_eq!(verts.len(), volume.vertex_count());
    }

    #[test]
    fn vertex_stride_is_five_floats() {
        assert_eq!(
            std::mem::size_of::<SceneVertex>(),
            5 * std::mem::size_of::<f32>()
        );
    }

    #[test]
    fn rebuild_is_deterministic() {
        let volume = CubeVolume::with_side(3);
        let first = volume.build();
        let second = volume.build();
        assert_eq!(
            bytemuck::cast_slice::<_, u8>(&first),
            bytemuck::cast_slice::<_, u8>(&second)
        );
    }

    #[test]
    fn first_vertex_is_transformed_front_corner() {
        let volume = CubeVolume {
            width: 2,
            height: 1,
            depth: 1,
            scale: 0.5,
            spacing: 2.0,
        };
        let verts = volume.build();
        assert_eq!(verts.len(), 72);

        let mat = Mat4::from_scale(Vec3::splat(0.5))
            * Mat4::from_translation(Vec3::new(-2.0, -1.0, -1.0));
        let expected = mat * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(verts[0].position, [expected.x, expected.y, expected.z]);
        assert_eq!(verts[0].tex_coord, [0.0, 1.0]);
    }
}
