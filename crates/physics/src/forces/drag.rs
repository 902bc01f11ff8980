use crate::bodies::{BodyHandle, BodySet};

use super::ForceGenerator;

/// Velocity-opposing drag with linear (`k1`) and quadratic (`k2`) terms.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Drag {
    pub k1: f64,
    pub k2: f64,
}

impl Drag {
    #[must_use]
    pub const fn new(k1: f64, k2: f64) -> Self {
        Self { k1, k2 }
    }
}

impl ForceGenerator for Drag {
    fn update_force(&self, body: BodyHandle, bodies: &mut BodySet, _dt: f64) {
        let Some(body) = bodies.get_mut(body) else {
            return;
        };
        let velocity = body.velocity();
        let speed = velocity.norm();
        if speed == 0.0 {
            return;
        }
        let magnitude = self.k1 * speed + self.k2 * speed * speed;
        body.add_force(velocity.normalized() * -magnitude);
    }
}
