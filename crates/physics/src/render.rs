//! Read-only geometry export for a renderer.
//!
//! Nothing here mutates simulation state. Vertex and instance types are
//! `Pod` so they can be uploaded as raw bytes.

use bytemuck::{Pod, Zeroable};
use glam::{DMat4, DQuat, DVec3};

use crate::bodies::{BodyHandle, BodySet};
use crate::body::RigidBody;

/// One vertex of a triangulated box in world space.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    pub position: [f32; 3],
}

/// Per-body snapshot for instanced drawing of a unit cube.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    /// World position of the body's center
    pub position: [f32; 3],
    /// Orientation as `[x, y, z, w]` (vector part first)
    pub orientation: [f32; 4],
    /// Full box edge lengths
    pub size: [f32; 3],
}

impl BodyInstance {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_body(body: &RigidBody) -> Self {
        let p = body.position();
        let q = body.orientation();
        let s = body.box_size();
        Self {
            position: [p.x as f32, p.y as f32, p.z as f32],
            orientation: [q.i as f32, q.j as f32, q.k as f32, q.r as f32],
            size: [s.x as f32, s.y as f32, s.z as f32],
        }
    }
}

/// The body's box as 36 world-space vertices (12 triangles).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn box_mesh(body: &RigidBody) -> Vec<RenderVertex> {
    body.box_vertices()
        .chunks_exact(3)
        .map(|v| RenderVertex { position: [v[0] as f32, v[1] as f32, v[2] as f32] })
        .collect()
}

/// Raw bytes of a vertex slice, ready for a vertex buffer.
#[must_use]
pub fn mesh_bytes(vertices: &[RenderVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Snapshots every live body.
#[must_use]
pub fn extract_instances(bodies: &BodySet) -> Vec<(BodyHandle, BodyInstance)> {
    bodies
        .iter()
        .map(|(handle, body)| (handle, BodyInstance::from_body(body)))
        .collect()
}

/// Column-major scale-rotation-translation matrix mapping a unit cube
/// centered at the origin onto the body's box.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn model_matrix(body: &RigidBody) -> [[f32; 4]; 4] {
    let p = body.position();
    let q = body.orientation();
    let s = body.box_size();
    let transform = DMat4::from_scale_rotation_translation(
        DVec3::new(s.x, s.y, s.z),
        DQuat::from_xyzw(q.i, q.j, q.k, q.r),
        DVec3::new(p.x, p.y, p.z),
    );
    transform.as_mat4().to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyShape, BOX_TRIANGLE_VERTICES};
    use crate::math::{Quaternion, Vector3};
    use glam::Vec3;

    fn sample() -> RigidBody {
        RigidBody::builder(BodyShape::cuboid(2.0, 4.0, 6.0))
            .position(Vector3::new(1.0, 2.0, 3.0))
            .orientation(Quaternion::from_axis_angle(Vector3::new(0.0, 1.0, 1.0), 0.9))
            .build()
            .unwrap()
    }

    #[test]
    fn mesh_has_one_vertex_per_triangle_corner() {
        let body = sample();
        let mesh = box_mesh(&body);
        assert_eq!(mesh.len(), BOX_TRIANGLE_VERTICES);
        assert_eq!(mesh_bytes(&mesh).len(), BOX_TRIANGLE_VERTICES * 12);
    }

    #[test]
    fn model_matrix_maps_unit_cube_onto_box_corners() {
        let body = sample();
        let m = glam::Mat4::from_cols_array_2d(&model_matrix(&body));
        let corner = m.transform_point3(Vec3::new(0.5, 0.5, 0.5));
        let expected = body.box_corners()[0];
        assert!((f64::from(corner.x) - expected.x).abs() < 1e-4);
        assert!((f64::from(corner.y) - expected.y).abs() < 1e-4);
        assert!((f64::from(corner.z) - expected.z).abs() < 1e-4);
    }

    #[test]
    fn instances_follow_body_set() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(sample());
        let b = bodies.insert(sample());
        bodies.remove(a);
        let instances = extract_instances(&bodies);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].0, b);
        assert_eq!(instances[0].1.size, [2.0, 4.0, 6.0]);
        assert_eq!(instances[0].1.position, [1.0, 2.0, 3.0]);
    }
}
