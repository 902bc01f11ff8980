//! # Collision Detection
//!
//! Collision detection runs in two phases against the four fixed world
//! boundary planes:
//!
//! - **Broad phase** ([`Octree`]): box corners are bucketed by octant and each
//!   leaf reports `(point, boundary)` candidates for the boundaries it may lie
//!   next to.
//! - **Narrow phase** ([`generate_contact_vertex_plane`]): each candidate is
//!   tested against its plane and penetrating points become [`Contact`]s.
//!
//! Contacts are detected and reported only; no response impulse is applied.

mod box_plane;
mod octree;
mod primitives;

pub use box_plane::*;
pub use octree::*;
pub use primitives::*;

use crate::bodies::BodyHandle;
use crate::math::Vector3;

/// A single point of interpenetration.
///
/// `penetration` is positive when the point lies inside the surface it was
/// tested against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    point: Vector3,
    normal: Vector3,
    penetration: f64,
}

impl Contact {
    #[must_use]
    pub const fn new(point: Vector3, normal: Vector3, penetration: f64) -> Self {
        Self { point, normal, penetration }
    }

    /// World-space contact point.
    #[must_use]
    pub const fn point(&self) -> Vector3 {
        self.point
    }

    /// Unit normal pointing out of the surface that was hit.
    #[must_use]
    pub const fn normal(&self) -> Vector3 {
        self.normal
    }

    #[must_use]
    pub const fn penetration(&self) -> f64 {
        self.penetration
    }
}

/// One of the four world boundary planes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Boundary {
    Top,
    Right,
    Bottom,
    Left,
}

impl Boundary {
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];
}

/// A contact tagged with the body and boundary that produced it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyContact {
    pub body: BodyHandle,
    pub boundary: Boundary,
    pub contact: Contact,
}
