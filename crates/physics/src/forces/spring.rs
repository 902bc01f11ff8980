use tracing::warn;

use crate::bodies::{BodyHandle, BodySet};
use crate::math::Vector3;

use super::ForceGenerator;

/// Hooke's-law spring between an anchor on the acted-on body and an anchor
/// on `other`.
///
/// Anchors are in body space. The spring only pushes on the body it is
/// registered for; register a mirrored spring on `other` for a two-sided
/// connection. A spring whose `other` is its own body does nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spring {
    pub local_anchor: Vector3,
    pub other: BodyHandle,
    pub other_anchor: Vector3,
    pub elasticity: f64,
    pub rest_length: f64,
}

impl Spring {
    #[must_use]
    pub const fn new(
        local_anchor: Vector3,
        other: BodyHandle,
        other_anchor: Vector3,
        elasticity: f64,
        rest_length: f64,
    ) -> Self {
        Self { local_anchor, other, other_anchor, elasticity, rest_length }
    }
}

impl ForceGenerator for Spring {
    fn update_force(&self, body: BodyHandle, bodies: &mut BodySet, _dt: f64) {
        let Some((body, other)) = bodies.get_pair_mut(body, self.other) else {
            if bodies.contains(body) && !bodies.contains(self.other) {
                warn!(body = %body, other = %self.other, "spring endpoint no longer exists");
            }
            return;
        };
        let other_anchor = other.local_to_world_point(self.other_anchor);
        let anchor = body.local_to_world_point(self.local_anchor);

        let delta = anchor - other_anchor;
        let extension = delta.norm() - self.rest_length;
        let force = delta.normalized() * (-self.elasticity * extension);
        body.add_force_at_point(force, anchor);
    }

    fn dependencies(&self) -> &[BodyHandle] {
        std::slice::from_ref(&self.other)
    }
}
