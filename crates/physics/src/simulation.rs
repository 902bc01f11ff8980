//! # Physics Engine
//!
//! [`PhysicsEngine`] advances a [`BodySet`] by one frame. Each call to
//! [`PhysicsEngine::update`] runs the same ordered stages:
//!
//! 1. generate forces: gravity and drag for every body, plus persistent
//!    records such as springs
//! 2. apply forces into the body accumulators
//! 3. integrate every body, restoring any body whose state became non-finite
//! 4. broad phase: rebuild the octree from every body's box corners
//! 5. narrow phase: test each candidate point against its boundary plane
//! 6. report contacts and clear the force register

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::bodies::{BodyHandle, BodySet};
use crate::collision::{
    generate_contact_vertex_plane, BodyContact, BoundaryMask, BoundingBox, BoxPrimitive, Candidate,
    Octree, Primitive, WorldBounds,
};
use crate::error::PhysicsError;
use crate::forces::{Drag, ForceGenerator, ForceRecord, ForceRegister, Gravity};
use crate::math::Vector3;

/// Static engine configuration, fixed for the lifetime of an engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Acceleration applied to every movable body.
    pub gravity: Vector3,
    /// Drag coefficient proportional to speed.
    pub linear_drag: f64,
    /// Drag coefficient proportional to squared speed.
    pub quadratic_drag: f64,
    /// Boundary planes tested by the narrow phase.
    pub bounds: WorldBounds,
    /// Region covered by the broad-phase octree root. The planes in `bounds`
    /// may lie anywhere relative to it.
    pub region: BoundingBox,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, -20.0, 0.0),
            linear_drag: 0.5,
            quadratic_drag: 0.05,
            bounds: WorldBounds::default(),
            region: BoundingBox::default(),
        }
    }
}

/// Outcome of one [`PhysicsEngine::update`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub contacts: Vec<BodyContact>,
    /// Number of `(point, boundary)` pairs produced by the broad phase.
    pub candidates: usize,
    /// Bodies whose integration produced non-finite state this frame. Their
    /// state was rolled back to the start of the frame.
    pub unstable_bodies: Vec<BodyHandle>,
}

impl FrameReport {
    #[must_use]
    pub fn contacts_for(&self, body: BodyHandle) -> impl Iterator<Item = &BodyContact> {
        self.contacts.iter().filter(move |c| c.body == body)
    }

    /// Deepest penetration reported this frame, if any.
    #[must_use]
    pub fn max_penetration(&self) -> Option<f64> {
        self.contacts
            .iter()
            .map(|c| c.contact.penetration())
            .max_by(f64::total_cmp)
    }
}

pub struct PhysicsEngine {
    config: EngineConfig,
    gravity: Arc<dyn ForceGenerator>,
    drag: Arc<dyn ForceGenerator>,
    persistent_records: Vec<ForceRecord>,
    register: ForceRegister,
    octree: Octree,
    frame: u64,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PhysicsEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            gravity: Arc::new(Gravity::new(config.gravity)),
            drag: Arc::new(Drag::new(config.linear_drag, config.quadratic_drag)),
            persistent_records: Vec::new(),
            register: ForceRegister::new(),
            octree: Octree::new(config.region),
            frame: 0,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of completed frames.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// The broad-phase octree as built by the last frame.
    #[must_use]
    pub const fn octree(&self) -> &Octree {
        &self.octree
    }

    /// Registers a generator that acts on `body` every frame until the body
    /// is removed or [`PhysicsEngine::remove_force_records`] is called.
    pub fn add_force_record(&mut self, body: BodyHandle, generator: Arc<dyn ForceGenerator>) {
        self.persistent_records.push(ForceRecord::new(body, generator));
    }

    /// Drops every persistent record acting on `body` or reading from it.
    pub fn remove_force_records(&mut self, body: BodyHandle) {
        self.persistent_records.retain(|record| !record.involves(body));
    }

    pub fn clear_force_records(&mut self) {
        self.persistent_records.clear();
    }

    #[must_use]
    pub fn force_records(&self) -> &[ForceRecord] {
        &self.persistent_records
    }

    /// Runs one frame of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimestep`] if `dt` is negative or not
    /// finite. No body is touched in that case.
    pub fn update(&mut self, bodies: &mut BodySet, dt: f64) -> Result<FrameReport, PhysicsError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimestep(dt));
        }

        self.generate_forces(bodies);
        self.register.update_all_forces(bodies, dt);
        let unstable_bodies = Self::integrate_bodies(bodies, dt);
        self.update_broad_phase(bodies);
        let candidates = self.octree.retrieve(&self.config.bounds, BoundaryMask::ALL);
        let contacts = self.detect_contacts(&candidates);

        self.frame += 1;
        debug!(
            frame = self.frame,
            dt,
            bodies = bodies.len(),
            forces = self.register.len(),
            candidates = candidates.len(),
            contacts = contacts.len(),
            "physics frame"
        );
        for contact in &contacts {
            trace!(
                body = %contact.body,
                boundary = ?contact.boundary,
                point = %contact.contact.point(),
                penetration = contact.contact.penetration(),
                "contact"
            );
        }
        self.register.clear();

        Ok(FrameReport { contacts, candidates: candidates.len(), unstable_bodies })
    }

    fn generate_forces(&mut self, bodies: &BodySet) {
        for handle in bodies.handles() {
            self.register.add(handle, Arc::clone(&self.gravity));
            self.register.add(handle, Arc::clone(&self.drag));
        }
        self.persistent_records.retain(|record| {
            let live = record.is_live(bodies);
            if !live {
                debug!(body = %record.body, "dropping force record with a removed body");
            }
            live
        });
        for record in &self.persistent_records {
            self.register.push(record.clone());
        }
    }

    /// Integrates each body on its own; a body that ends up with non-finite
    /// state is restored to its pre-step state and reported.
    fn integrate_bodies(bodies: &mut BodySet, dt: f64) -> Vec<BodyHandle> {
        let mut unstable = Vec::new();
        for (handle, body) in bodies.iter_mut() {
            let snapshot = body.clone();
            body.integrate(dt);
            if !body.is_finite() {
                warn!(body = %handle, "non-finite state after integration, restoring previous state");
                *body = snapshot;
                body.clear_accumulators();
                unstable.push(handle);
            }
        }
        unstable
    }

    fn update_broad_phase(&mut self, bodies: &BodySet) {
        self.octree.clear();
        for (handle, body) in bodies.iter() {
            self.octree
                .insert_primitive(&Primitive::Box(BoxPrimitive::from_body(handle, body)));
        }
    }

    fn detect_contacts(&self, candidates: &[Candidate]) -> Vec<BodyContact> {
        candidates
            .iter()
            .filter_map(|candidate| {
                let plane = self.config.bounds.plane(candidate.boundary);
                generate_contact_vertex_plane(candidate.point, plane).map(|contact| BodyContact {
                    body: candidate.body,
                    boundary: candidate.boundary,
                    contact,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyShape, RigidBody};
    use crate::collision::Boundary;

    fn no_drag() -> EngineConfig {
        EngineConfig { linear_drag: 0.0, quadratic_drag: 0.0, ..EngineConfig::default() }
    }

    #[test]
    fn rejects_invalid_timesteps() {
        let mut engine = PhysicsEngine::default();
        let mut bodies = BodySet::new();
        assert_eq!(
            engine.update(&mut bodies, -0.1).unwrap_err(),
            PhysicsError::InvalidTimestep(-0.1)
        );
        assert!(engine.update(&mut bodies, f64::NAN).is_err());
        assert!(engine.update(&mut bodies, f64::INFINITY).is_err());
        assert_eq!(engine.frame(), 0);
    }

    #[test]
    fn empty_world_runs_every_stage() {
        let mut engine = PhysicsEngine::default();
        let mut bodies = BodySet::new();
        let report = engine.update(&mut bodies, 1.0 / 60.0).unwrap();
        assert_eq!(report, FrameReport::default());
        assert_eq!(engine.frame(), 1);
    }

    #[test]
    fn falling_body_eventually_hits_the_floor() {
        let mut engine = PhysicsEngine::new(no_drag());
        let mut bodies = BodySet::new();
        let cube = bodies.insert(
            RigidBody::builder(BodyShape::cube(10.0))
                .position(Vector3::new(0.0, -40.0, 0.0))
                .build()
                .unwrap(),
        );

        let mut reports = Vec::new();
        for _ in 0..60 {
            reports.push(engine.update(&mut bodies, 1.0 / 30.0).unwrap());
        }
        let hit = reports
            .iter()
            .find(|r| r.contacts_for(cube).any(|c| c.boundary == Boundary::Bottom))
            .expect("cube never reached the floor");
        assert!(hit.max_penetration().unwrap() >= 0.0);
        assert!(hit.contacts.iter().all(|c| c.contact.normal() == Vector3::Y));
    }

    #[test]
    fn persistent_records_are_dropped_with_their_body() {
        let mut engine = PhysicsEngine::new(no_drag());
        let mut bodies = BodySet::new();
        let a = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build().unwrap());
        let b = bodies.insert(
            RigidBody::builder(BodyShape::cube(1.0))
                .position(Vector3::new(4.0, 0.0, 0.0))
                .build()
                .unwrap(),
        );
        let spring = crate::forces::Spring::new(Vector3::ZERO, b, Vector3::ZERO, 1.0, 1.0);
        engine.add_force_record(a, Arc::new(spring));
        assert_eq!(engine.force_records().len(), 1);

        engine.update(&mut bodies, 0.01).unwrap();
        assert!(bodies.get(a).unwrap().velocity().x > 0.0);

        bodies.remove(a);
        engine.update(&mut bodies, 0.01).unwrap();
        assert!(engine.force_records().is_empty());
    }

    #[test]
    fn partner_removed_from_the_set_drops_the_record() {
        let mut engine = PhysicsEngine::new(no_drag());
        let mut bodies = BodySet::new();
        let a = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build().unwrap());
        let b = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build().unwrap());
        let spring = crate::forces::Spring::new(Vector3::ZERO, b, Vector3::ZERO, 1.0, 1.0);
        engine.add_force_record(a, Arc::new(spring));

        bodies.remove(b);
        engine.update(&mut bodies, 0.01).unwrap();
        assert!(engine.force_records().is_empty());
        assert_eq!(bodies.get(a).unwrap().velocity().x, 0.0);
    }

    #[test]
    fn ground_plane_inside_the_region_reports_every_penetrating_corner() {
        let ground = crate::collision::PlanePrimitive::new(Vector3::Y, 0.0);
        let config = EngineConfig {
            bounds: WorldBounds { bottom: ground, ..WorldBounds::default() },
            ..no_drag()
        };
        let mut engine = PhysicsEngine::new(config);
        let mut bodies = BodySet::new();
        let cube = bodies.insert(
            RigidBody::builder(BodyShape::cube(10.0))
                .immovable()
                .position(Vector3::new(20.0, 0.0, 20.0))
                .build()
                .unwrap(),
        );

        let report = engine.update(&mut bodies, 0.0).unwrap();
        let floor: Vec<_> =
            report.contacts_for(cube).filter(|c| c.boundary == Boundary::Bottom).collect();
        let expected = crate::collision::generate_contacts_vertex_face(
            &ground,
            &BoxPrimitive::from_body(cube, bodies.get(cube).unwrap()),
        );
        assert_eq!(expected.len(), 4);
        assert_eq!(floor.len(), expected.len());
        assert!(floor.iter().all(|c| c.contact.penetration() == 5.0));
    }

    #[test]
    fn removing_a_spring_partner_drops_the_record() {
        let mut engine = PhysicsEngine::new(no_drag());
        let mut bodies = BodySet::new();
        let a = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build().unwrap());
        let b = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build().unwrap());
        let spring = crate::forces::Spring::new(Vector3::ZERO, b, Vector3::ZERO, 1.0, 1.0);
        engine.add_force_record(a, Arc::new(spring));

        engine.remove_force_records(b);
        assert!(engine.force_records().is_empty());
    }
}
