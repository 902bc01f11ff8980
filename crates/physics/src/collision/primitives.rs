//! Collision geometry: infinite planes and oriented boxes.

use crate::bodies::BodyHandle;
use crate::body::{RigidBody, CORNER_SIGNS};
use crate::math::{Matrix34, Vector3};

/// Half-space boundary `normal · p = -offset`.
///
/// A point is inside (penetrating) when `normal · p ≤ -offset`, so the normal
/// points away from the solid side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanePrimitive {
    normal: Vector3,
    offset: f64,
}

impl PlanePrimitive {
    /// The normal is normalized on construction.
    #[must_use]
    pub fn new(normal: Vector3, offset: f64) -> Self {
        Self { normal: normal.normalized(), offset }
    }

    #[must_use]
    pub const fn normal(&self) -> Vector3 {
        self.normal
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// `normal · p + offset`; negative or zero means inside.
    #[must_use]
    pub fn signed_distance(&self, point: Vector3) -> f64 {
        self.normal.dot(point) + self.offset
    }

    #[must_use]
    pub fn contains(&self, point: Vector3) -> bool {
        self.signed_distance(point) <= 0.0
    }

    /// Planes have no vertices.
    #[must_use]
    pub fn vertices(&self) -> Vec<Vector3> {
        Vec::new()
    }
}

/// A body's box placed in the world by the body's current transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxPrimitive {
    pub body: BodyHandle,
    pub half_sizes: Vector3,
    pub transform: Matrix34,
}

impl BoxPrimitive {
    #[must_use]
    pub fn from_body(handle: BodyHandle, body: &RigidBody) -> Self {
        Self {
            body: handle,
            half_sizes: body.box_size() * 0.5,
            transform: body.world_transform(),
        }
    }

    /// The eight world-space corners.
    #[must_use]
    pub fn vertices(&self) -> [Vector3; 8] {
        CORNER_SIGNS.map(|s| {
            self.transform
                .transform_point(self.half_sizes.component_product(Vector3::from(s)))
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Plane,
    Box,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Primitive {
    Plane(PlanePrimitive),
    Box(BoxPrimitive),
}

impl Primitive {
    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Plane(_) => PrimitiveKind::Plane,
            Self::Box(_) => PrimitiveKind::Box,
        }
    }

    #[must_use]
    pub fn vertices(&self) -> Vec<Vector3> {
        match self {
            Self::Plane(plane) => plane.vertices(),
            Self::Box(cuboid) => cuboid.vertices().to_vec(),
        }
    }
}

impl From<PlanePrimitive> for Primitive {
    fn from(plane: PlanePrimitive) -> Self {
        Self::Plane(plane)
    }
}

impl From<BoxPrimitive> for Primitive {
    fn from(cuboid: BoxPrimitive) -> Self {
        Self::Box(cuboid)
    }
}
