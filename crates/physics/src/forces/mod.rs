//! # Force Generators
//!
//! A [`ForceGenerator`] writes into a body's force and torque accumulators
//! and nothing else. The [`ForceRegister`] pairs generators with the bodies
//! they act on for the current frame; the engine fills it, applies it once
//! and clears it before the next frame.

mod drag;
mod gravity;
mod spring;

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::bodies::{BodyHandle, BodySet};

pub use drag::Drag;
pub use gravity::Gravity;
pub use spring::Spring;

/// Adds forces to one body per call.
pub trait ForceGenerator: Send + Sync {
    /// Accumulates this generator's contribution on `body` for a step of `dt`
    /// seconds. Missing bodies are ignored.
    fn update_force(&self, body: BodyHandle, bodies: &mut BodySet, dt: f64);

    /// Bodies other than the acted-on one whose state the generator reads.
    fn dependencies(&self) -> &[BodyHandle] {
        &[]
    }
}

/// A generator bound to the body it acts on.
#[derive(Clone)]
pub struct ForceRecord {
    pub body: BodyHandle,
    pub generator: Arc<dyn ForceGenerator>,
}

impl ForceRecord {
    #[must_use]
    pub fn new(body: BodyHandle, generator: Arc<dyn ForceGenerator>) -> Self {
        Self { body, generator }
    }

    /// True if removing `body` leaves this record with nothing to act on or
    /// nothing to read from.
    #[must_use]
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body == body || self.generator.dependencies().contains(&body)
    }

    /// True while the acted-on body and every dependency still resolve.
    #[must_use]
    pub fn is_live(&self, bodies: &BodySet) -> bool {
        bodies.contains(self.body)
            && self.generator.dependencies().iter().all(|&h| bodies.contains(h))
    }
}

impl fmt::Debug for ForceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForceRecord").field("body", &self.body).finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ForceRegister {
    records: Vec<ForceRecord>,
}

impl ForceRegister {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, body: BodyHandle, generator: Arc<dyn ForceGenerator>) {
        self.records.push(ForceRecord::new(body, generator));
    }

    pub fn push(&mut self, record: ForceRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Runs every record in insertion order. Records whose body no longer
    /// exists are skipped.
    pub fn update_all_forces(&self, bodies: &mut BodySet, dt: f64) {
        for record in &self.records {
            if !bodies.contains(record.body) {
                trace!(body = %record.body, "skipping force record for removed body");
                continue;
            }
            record.generator.update_force(record.body, bodies, dt);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ForceRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyShape, RigidBody};
    use crate::math::Vector3;

    struct Constant(Vector3);

    impl ForceGenerator for Constant {
        fn update_force(&self, body: BodyHandle, bodies: &mut BodySet, _dt: f64) {
            if let Some(body) = bodies.get_mut(body) {
                body.add_force(self.0);
            }
        }
    }

    #[test]
    fn register_applies_records_and_skips_removed_bodies() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build().unwrap());
        let b = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build().unwrap());

        let push: Arc<dyn ForceGenerator> = Arc::new(Constant(Vector3::X));
        let mut register = ForceRegister::new();
        register.add(a, Arc::clone(&push));
        register.add(a, Arc::clone(&push));
        register.add(b, push);
        assert_eq!(register.len(), 3);

        bodies.remove(b);
        register.update_all_forces(&mut bodies, 0.1);
        assert_eq!(bodies.get(a).unwrap().force_accumulator(), Vector3::new(2.0, 0.0, 0.0));

        register.clear();
        assert!(register.is_empty());
    }
}
