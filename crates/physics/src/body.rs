//! # Rigid Bodies
//!
//! [`RigidBody`] holds the full simulation state of one physical object:
//! constant mass properties, kinematic state, per-frame force and torque
//! accumulators and data derived from the current orientation.
//!
//! Bodies are created through [`RigidBody::builder`] (see [`crate::builder`]),
//! which computes the body-local inverse inertia tensor once from the shape.
//! Only inverse quantities are stored: an inverse mass of zero marks an
//! immovable body.

use crate::builder::RigidBodyBuilder;
use crate::math::{Matrix3, Matrix34, Quaternion, Vector3};

/// Geometry used for the inertia tensor and the render/collision box.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyShape {
    /// Zero-centered box with full edge lengths `size`.
    Box { size: Vector3 },
    /// Solid sphere. Collides and renders through its bounding box.
    Sphere { radius: f64 },
    /// Point cloud in world coordinates at construction time. The inertia
    /// tensor is taken about the body's initial position.
    Points(Vec<Vector3>),
}

impl BodyShape {
    #[must_use]
    pub const fn cuboid(x: f64, y: f64, z: f64) -> Self {
        Self::Box { size: Vector3::new(x, y, z) }
    }

    #[must_use]
    pub const fn cube(side: f64) -> Self {
        Self::cuboid(side, side, side)
    }
}

/// Corner signs of a zero-centered box, in the order used by
/// [`RigidBody::box_corners`].
pub(crate) const CORNER_SIGNS: [[f64; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
];

/// Corner indices of each box face, counter-clockwise seen from outside.
const FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3], // +z
    [4, 7, 6, 5], // -z
    [0, 3, 7, 4], // +x
    [1, 5, 6, 2], // -x
    [0, 4, 5, 1], // +y
    [3, 2, 6, 7], // -y
];

/// Number of vertices in the triangulated box returned by [`RigidBody::box_vertices`].
pub const BOX_TRIANGLE_VERTICES: usize = 36;

#[derive(Clone, Debug)]
pub struct RigidBody {
    // Constant physical properties
    pub(crate) inverse_mass: f64,
    pub(crate) angular_damping: f64,
    pub(crate) shape: BodyShape,
    pub(crate) box_size: Vector3,
    pub(crate) local_inverse_inertia: Matrix3,

    // Kinematic state
    pub(crate) position: Vector3,
    pub(crate) velocity: Vector3,
    pub(crate) acceleration: Vector3,
    pub(crate) orientation: Quaternion,
    pub(crate) angular_velocity: Vector3,
    pub(crate) angular_acceleration: Vector3,

    // Accumulators, cleared by `integrate`
    pub(crate) force_accumulator: Vector3,
    pub(crate) torque_accumulator: Vector3,

    // Derived from `orientation` by `compute_derived_data`
    pub(crate) transform_matrix: Matrix3,
    pub(crate) global_inverse_inertia: Matrix3,
}

impl RigidBody {
    #[must_use]
    pub fn builder(shape: BodyShape) -> RigidBodyBuilder {
        RigidBodyBuilder::new(shape)
    }

    /// Advances the body by `dt` seconds.
    ///
    /// Linear motion uses semi-implicit Euler on `force · inverse_mass`;
    /// angular motion applies the world-space inverse inertia tensor to the
    /// accumulated torque and damps the angular velocity by
    /// `angular_damping^dt`. Accumulators are cleared afterwards.
    pub fn integrate(&mut self, dt: f64) {
        self.acceleration = self.force_accumulator * self.inverse_mass;
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;

        self.angular_acceleration = self.global_inverse_inertia * self.torque_accumulator;
        self.angular_velocity =
            self.angular_velocity * self.angular_damping.powf(dt) + self.angular_acceleration * dt;
        self.orientation.update_orientation(self.angular_velocity, dt);

        self.compute_derived_data();
        self.clear_accumulators();
    }

    /// Recomputes the rotation matrix and the world-space inverse inertia
    /// tensor `R · I⁻¹ · Rᵀ` from the current orientation.
    pub fn compute_derived_data(&mut self) {
        self.transform_matrix = Matrix3::from_quaternion(self.orientation);
        self.global_inverse_inertia =
            self.transform_matrix * self.local_inverse_inertia * self.transform_matrix.transposed();
    }

    /// Adds a force acting through the center of mass.
    pub fn add_force(&mut self, force: Vector3) {
        self.force_accumulator += force;
    }

    /// Adds a force applied at a world-space point; the lever arm relative to
    /// the center of mass produces torque.
    pub fn add_force_at_point(&mut self, force: Vector3, point: Vector3) {
        let arm = point - self.position;
        self.force_accumulator += force;
        self.torque_accumulator += arm.cross(force);
    }

    /// Adds a force applied at a body-space point.
    pub fn add_force_at_body_point(&mut self, force: Vector3, point: Vector3) {
        let world_point = self.local_to_world_point(point);
        self.add_force_at_point(force, world_point);
    }

    pub fn clear_accumulators(&mut self) {
        self.force_accumulator = Vector3::ZERO;
        self.torque_accumulator = Vector3::ZERO;
    }

    /// Body-space point to world space using the current transform.
    #[must_use]
    pub fn local_to_world_point(&self, point: Vector3) -> Vector3 {
        point.local_to_world(&self.transform_matrix) + self.position
    }

    /// World-space point to body space using the current transform.
    #[must_use]
    pub fn world_to_local_point(&self, point: Vector3) -> Vector3 {
        (point - self.position).world_to_local(&self.transform_matrix)
    }

    /// Rotation and translation of the body as a single affine transform.
    #[must_use]
    pub fn world_transform(&self) -> Matrix34 {
        Matrix34::from_parts(&self.transform_matrix, self.position)
    }

    /// The eight corners of the body's box in world space.
    #[must_use]
    pub fn box_corners(&self) -> [Vector3; 8] {
        let half = self.box_size * 0.5;
        let transform = self.world_transform();
        CORNER_SIGNS.map(|s| transform.transform_point(half.component_product(Vector3::from(s))))
    }

    /// The box triangulated as 12 triangles: 36 world-space vertices
    /// flattened to 108 coordinates.
    #[must_use]
    pub fn box_vertices(&self) -> Vec<f64> {
        let corners = self.box_corners();
        FACES
            .iter()
            .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
            .flat_map(|index| corners[index].to_array())
            .collect()
    }

    #[must_use]
    pub fn is_immovable(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Mass of the body; infinite for immovable bodies.
    #[must_use]
    pub fn mass(&self) -> f64 {
        if self.is_immovable() {
            f64::INFINITY
        } else {
            1.0 / self.inverse_mass
        }
    }

    /// Whether the kinematic state is free of NaN and infinities.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.acceleration.is_finite()
            && self.orientation.is_finite()
            && self.angular_velocity.is_finite()
            && self.angular_acceleration.is_finite()
    }

    #[must_use]
    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    #[must_use]
    pub fn angular_damping(&self) -> f64 {
        self.angular_damping
    }

    #[must_use]
    pub fn shape(&self) -> &BodyShape {
        &self.shape
    }

    /// Full edge lengths of the box used for collision and rendering.
    #[must_use]
    pub fn box_size(&self) -> Vector3 {
        self.box_size
    }

    #[must_use]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    #[must_use]
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    #[must_use]
    pub fn acceleration(&self) -> Vector3 {
        self.acceleration
    }

    #[must_use]
    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    #[must_use]
    pub fn angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    #[must_use]
    pub fn angular_acceleration(&self) -> Vector3 {
        self.angular_acceleration
    }

    #[must_use]
    pub fn force_accumulator(&self) -> Vector3 {
        self.force_accumulator
    }

    #[must_use]
    pub fn torque_accumulator(&self) -> Vector3 {
        self.torque_accumulator
    }

    #[must_use]
    pub fn transform_matrix(&self) -> &Matrix3 {
        &self.transform_matrix
    }

    #[must_use]
    pub fn local_inverse_inertia(&self) -> &Matrix3 {
        &self.local_inverse_inertia
    }

    #[must_use]
    pub fn global_inverse_inertia(&self) -> &Matrix3 {
        &self.global_inverse_inertia
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vector3) {
        self.acceleration = acceleration;
    }

    /// Replaces the orientation (normalized) and refreshes derived data.
    pub fn set_orientation(&mut self, orientation: Quaternion) {
        self.orientation = orientation.normalized();
        self.compute_derived_data();
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: Vector3) {
        self.angular_velocity = angular_velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn unit_cube() -> RigidBody {
        RigidBody::builder(BodyShape::cube(2.0)).mass(1.0).build().unwrap()
    }

    #[test]
    fn integrate_applies_inverse_mass() {
        let mut body = RigidBody::builder(BodyShape::cube(1.0)).mass(4.0).build().unwrap();
        body.add_force(Vector3::new(8.0, 0.0, 0.0));
        body.integrate(0.5);
        assert!((body.acceleration().x - 2.0).abs() < EPS);
        assert!((body.velocity().x - 1.0).abs() < EPS);
        assert!((body.position().x - 0.5).abs() < EPS);
        assert_eq!(body.force_accumulator(), Vector3::ZERO);
        assert_eq!(body.torque_accumulator(), Vector3::ZERO);
    }

    #[test]
    fn off_center_force_produces_torque() {
        let mut body = unit_cube();
        body.add_force_at_point(Vector3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(body.force_accumulator(), Vector3::Y);
        assert_eq!(body.torque_accumulator(), Vector3::Z);

        body.integrate(0.1);
        assert!(body.angular_velocity().z > 0.0);
        assert!(body.orientation().k > 0.0);
    }

    #[test]
    fn body_point_force_uses_current_orientation() {
        let mut body = unit_cube();
        body.set_orientation(Quaternion::from_axis_angle(Vector3::Z, FRAC_PI_2));
        body.set_position(Vector3::new(5.0, 0.0, 0.0));
        // Body-space +x lies along world +y after the quarter turn.
        body.add_force_at_body_point(Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        let torque = body.torque_accumulator();
        assert!((torque - Vector3::new(0.0, 0.0, -1.0)).norm() < EPS, "{torque}");
    }

    #[test]
    fn zero_timestep_is_a_noop_on_state() {
        let mut body = RigidBody::builder(BodyShape::cube(1.0))
            .velocity(Vector3::new(1.0, 2.0, 3.0))
            .angular_velocity(Vector3::new(0.0, 1.0, 0.0))
            .build()
            .unwrap();
        let before = body.clone();
        body.add_force(Vector3::new(10.0, 0.0, 0.0));
        body.integrate(0.0);
        assert_eq!(body.position(), before.position());
        assert_eq!(body.velocity(), before.velocity());
        assert_eq!(body.orientation(), before.orientation());
        assert_eq!(body.angular_velocity(), before.angular_velocity());
        assert!(body.is_finite());
    }

    #[test]
    fn global_inertia_follows_orientation() {
        let mut body = RigidBody::builder(BodyShape::cuboid(1.0, 4.0, 2.0)).mass(3.0).build().unwrap();
        body.set_orientation(Quaternion::from_axis_angle(Vector3::new(1.0, -1.0, 0.5), 0.8));
        let r = *body.transform_matrix();
        let expected = r * *body.local_inverse_inertia() * r.transposed();
        assert!(body.global_inverse_inertia().max_abs_diff(&expected) < EPS);

        // Repeated derivation does not accumulate.
        body.compute_derived_data();
        body.compute_derived_data();
        assert!(body.global_inverse_inertia().max_abs_diff(&expected) < EPS);
    }

    #[test]
    fn box_corners_are_rotated_and_translated() {
        let mut body = RigidBody::builder(BodyShape::cuboid(2.0, 4.0, 6.0)).build().unwrap();
        body.set_position(Vector3::new(10.0, 0.0, 0.0));
        body.set_orientation(Quaternion::from_axis_angle(Vector3::Z, FRAC_PI_2));
        let corners = body.box_corners();
        // Local (+1, +2, +3) maps to (-2, +1, +3) under the quarter turn.
        assert!((corners[0] - Vector3::new(8.0, 1.0, 3.0)).norm() < EPS);
        for c in corners {
            let local = body.world_to_local_point(c);
            assert!((local.x.abs() - 1.0).abs() < EPS);
            assert!((local.y.abs() - 2.0).abs() < EPS);
            assert!((local.z.abs() - 3.0).abs() < EPS);
        }
    }

    #[test]
    fn box_vertices_form_outward_triangles() {
        let mut body = RigidBody::builder(BodyShape::cuboid(1.0, 2.0, 3.0))
            .position(Vector3::new(1.0, -2.0, 0.5))
            .build()
            .unwrap();
        body.set_orientation(Quaternion::from_axis_angle(Vector3::new(0.3, 1.0, 0.2), 1.0));
        let before = body.clone();
        let flat = body.box_vertices();
        assert_eq!(flat.len(), BOX_TRIANGLE_VERTICES * 3);

        let center = body.position();
        for tri in flat.chunks_exact(9) {
            let a = Vector3::new(tri[0], tri[1], tri[2]);
            let b = Vector3::new(tri[3], tri[4], tri[5]);
            let c = Vector3::new(tri[6], tri[7], tri[8]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid - center) > 0.0);
        }
        assert_eq!(body.position(), before.position());
        assert_eq!(body.orientation(), before.orientation());
    }

    #[test]
    fn immovable_body_reports_infinite_mass() {
        let body = RigidBody::builder(BodyShape::cube(1.0)).immovable().build().unwrap();
        assert!(body.is_immovable());
        assert_eq!(body.mass(), f64::INFINITY);
        assert_eq!(*body.local_inverse_inertia(), Matrix3::ZERO);
    }
}
