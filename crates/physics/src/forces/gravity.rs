use crate::bodies::{BodyHandle, BodySet};
use crate::math::Vector3;

use super::ForceGenerator;

/// Uniform gravitational acceleration.
///
/// The force is scaled by the body's mass so every movable body accelerates
/// at exactly `gravity`. Immovable bodies are left alone.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gravity {
    pub gravity: Vector3,
}

impl Gravity {
    #[must_use]
    pub const fn new(gravity: Vector3) -> Self {
        Self { gravity }
    }
}

impl ForceGenerator for Gravity {
    fn update_force(&self, body: BodyHandle, bodies: &mut BodySet, _dt: f64) {
        let Some(body) = bodies.get_mut(body) else {
            return;
        };
        if body.is_immovable() {
            return;
        }
        let mass = body.mass();
        body.add_force(self.gravity * mass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyShape, RigidBody};

    #[test]
    fn acceleration_is_independent_of_mass() {
        let mut bodies = BodySet::new();
        let light = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).mass(1.0).build().unwrap());
        let heavy = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).mass(8.0).build().unwrap());
        let gravity = Gravity::new(Vector3::new(0.0, -20.0, 0.0));

        for handle in [light, heavy] {
            gravity.update_force(handle, &mut bodies, 1.0);
            bodies.get_mut(handle).unwrap().integrate(1.0);
        }
        assert_eq!(bodies.get(light).unwrap().velocity(), Vector3::new(0.0, -20.0, 0.0));
        assert_eq!(bodies.get(heavy).unwrap().velocity(), Vector3::new(0.0, -20.0, 0.0));
    }

    #[test]
    fn immovable_bodies_receive_no_force() {
        let mut bodies = BodySet::new();
        let wall = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).immovable().build().unwrap());
        Gravity::new(Vector3::new(0.0, -20.0, 0.0)).update_force(wall, &mut bodies, 1.0);
        assert_eq!(bodies.get(wall).unwrap().force_accumulator(), Vector3::ZERO);
    }
}
