//! # Rigid Body Builder
//!
//! Validates construction parameters and derives the constant mass
//! properties of a [`RigidBody`] from its [`BodyShape`].

use crate::body::{BodyShape, RigidBody};
use crate::error::PhysicsError;
use crate::math::{Matrix3, Quaternion, Vector3};

const DEFAULT_ANGULAR_DAMPING: f64 = 0.9;

#[derive(Clone, Debug)]
pub struct RigidBodyBuilder {
    shape: BodyShape,
    /// `None` builds an immovable body.
    mass: Option<f64>,
    angular_damping: f64,
    position: Vector3,
    velocity: Vector3,
    acceleration: Vector3,
    orientation: Quaternion,
    angular_velocity: Vector3,
}

impl RigidBodyBuilder {
    #[must_use]
    pub fn new(shape: BodyShape) -> Self {
        Self {
            shape,
            mass: Some(1.0),
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            acceleration: Vector3::ZERO,
            orientation: Quaternion::IDENTITY,
            angular_velocity: Vector3::ZERO,
        }
    }

    #[must_use]
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Infinite mass: zero inverse mass and zero inverse inertia.
    #[must_use]
    pub fn immovable(mut self) -> Self {
        self.mass = None;
        self
    }

    /// Fraction of angular velocity kept per second.
    #[must_use]
    pub fn angular_damping(mut self, damping: f64) -> Self {
        self.angular_damping = damping;
        self
    }

    #[must_use]
    pub fn position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    #[must_use]
    pub fn acceleration(mut self, acceleration: Vector3) -> Self {
        self.acceleration = acceleration;
        self
    }

    #[must_use]
    pub fn orientation(mut self, orientation: Quaternion) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn angular_velocity(mut self, angular_velocity: Vector3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Validates the parameters and builds the body with its derived data
    /// computed.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidMass`] for a non-finite or non-positive
    /// mass, [`PhysicsError::InvalidDamping`] for damping outside `[0, 1]`
    /// and [`PhysicsError::InvalidShape`] for degenerate geometry.
    pub fn build(self) -> Result<RigidBody, PhysicsError> {
        if !(0.0..=1.0).contains(&self.angular_damping) {
            return Err(PhysicsError::InvalidDamping(self.angular_damping));
        }
        validate_shape(&self.shape)?;

        let (inverse_mass, local_inverse_inertia) = match self.mass {
            None => (0.0, Matrix3::ZERO),
            Some(mass) if mass.is_finite() && mass > 0.0 => {
                let inertia = inertia_tensor(&self.shape, mass, self.position);
                (1.0 / mass, inertia.reversed())
            }
            Some(mass) => return Err(PhysicsError::InvalidMass(mass)),
        };

        let mut body = RigidBody {
            inverse_mass,
            angular_damping: self.angular_damping,
            box_size: box_extents(&self.shape, self.position),
            shape: self.shape,
            local_inverse_inertia,
            position: self.position,
            velocity: self.velocity,
            acceleration: self.acceleration,
            orientation: self.orientation.normalized(),
            angular_velocity: self.angular_velocity,
            angular_acceleration: Vector3::ZERO,
            force_accumulator: Vector3::ZERO,
            torque_accumulator: Vector3::ZERO,
            transform_matrix: Matrix3::IDENTITY,
            global_inverse_inertia: Matrix3::ZERO,
        };
        body.compute_derived_data();
        Ok(body)
    }
}

fn validate_shape(shape: &BodyShape) -> Result<(), PhysicsError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    match shape {
        BodyShape::Box { size } => {
            if !(positive(size.x) && positive(size.y) && positive(size.z)) {
                return Err(PhysicsError::InvalidShape("box sizes must be finite and positive"));
            }
        }
        BodyShape::Sphere { radius } => {
            if !positive(*radius) {
                return Err(PhysicsError::InvalidShape("sphere radius must be finite and positive"));
            }
        }
        BodyShape::Points(points) => {
            if points.is_empty() {
                return Err(PhysicsError::InvalidShape("point cloud is empty"));
            }
            if !points.iter().all(|p| p.is_finite()) {
                return Err(PhysicsError::InvalidShape("point cloud contains non-finite points"));
            }
        }
    }
    Ok(())
}

/// Body-space inertia tensor for `mass`. Point clouds are measured about
/// `origin`.
#[allow(clippy::cast_precision_loss)]
fn inertia_tensor(shape: &BodyShape, mass: f64, origin: Vector3) -> Matrix3 {
    match shape {
        BodyShape::Box { size } => {
            let s = size.component_product(*size);
            Matrix3::from_diagonal(Vector3::new(s.y + s.z, s.x + s.z, s.x + s.y) * (mass / 12.0))
        }
        BodyShape::Sphere { radius } => {
            Matrix3::from_diagonal(Vector3::splat(0.4 * mass * radius * radius))
        }
        BodyShape::Points(points) => {
            let weight = mass / points.len() as f64;
            let mut tensor = Matrix3::ZERO;
            for p in points {
                let Vector3 { x, y, z } = *p - origin;
                tensor += Matrix3::from_rows(
                    [y * y + z * z, -x * y, -x * z],
                    [-x * y, x * x + z * z, -y * z],
                    [-x * z, -y * z, x * x + y * y],
                ) * weight;
            }
            tensor
        }
    }
}

/// Full edge lengths of the box that stands in for the shape in collision
/// and rendering.
fn box_extents(shape: &BodyShape, origin: Vector3) -> Vector3 {
    match shape {
        BodyShape::Box { size } => *size,
        BodyShape::Sphere { radius } => Vector3::splat(2.0 * radius),
        BodyShape::Points(points) => {
            let half = points.iter().fold(Vector3::ZERO, |acc, p| {
                let d = *p - origin;
                Vector3::new(acc.x.max(d.x.abs()), acc.y.max(d.y.abs()), acc.z.max(d.z.abs()))
            });
            half * 2.0
        }
    }
}
