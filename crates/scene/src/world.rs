use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use physics::{BodyHandle, BodySet, FrameReport, PhysicsEngine, RigidBody, Spring, Vector3};
use tracing::{debug, info, warn};

use crate::{BodyDef, EventAction, Scene, SpringDef};

/// What the caller should do after an event has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    Quit,
}

/// Bodies and engine built from a [`Scene`], with bodies addressable by
/// their scene id.
pub struct World {
    pub bodies: BodySet,
    pub engine: PhysicsEngine,
    ids: HashMap<String, BodyHandle>,
}

impl World {
    /// # Errors
    ///
    /// Fails on duplicate ids, invalid bodies or springs naming unknown
    /// bodies.
    pub fn from_scene(scene: Scene) -> Result<Self> {
        let mut world = Self {
            bodies: BodySet::new(),
            engine: PhysicsEngine::new(scene.config.engine_config()),
            ids: HashMap::new(),
        };
        for def in &scene.bodies {
            world.spawn(def)?;
        }
        for spring in &scene.springs {
            world.add_spring(spring)?;
        }
        info!(
            bodies = world.bodies.len(),
            springs = world.engine.force_records().len(),
            "scene loaded"
        );
        Ok(world)
    }

    #[must_use]
    pub fn handle(&self, id: &str) -> Option<BodyHandle> {
        self.ids.get(id).copied()
    }

    #[must_use]
    pub fn body(&self, id: &str) -> Option<&RigidBody> {
        self.handle(id).and_then(|h| self.bodies.get(h))
    }

    /// Scene id of a live body.
    #[must_use]
    pub fn id_of(&self, handle: BodyHandle) -> Option<&str> {
        self.ids
            .iter()
            .find(|&(_, &h)| h == handle)
            .map(|(id, _)| id.as_str())
    }

    /// Ids of all live bodies, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Builds and inserts a body.
    ///
    /// # Errors
    ///
    /// Fails if the id is already taken or the body parameters are invalid.
    pub fn spawn(&mut self, def: &BodyDef) -> Result<BodyHandle> {
        if self.ids.contains_key(&def.id) {
            bail!("duplicate body id '{}'", def.id);
        }
        let handle = self.bodies.insert(def.build()?);
        self.ids.insert(def.id.clone(), handle);
        debug!(id = %def.id, handle = %handle, "spawned body");
        Ok(handle)
    }

    /// Removes a body together with the springs acting on it.
    pub fn remove(&mut self, id: &str) -> Option<RigidBody> {
        let handle = self.ids.remove(id)?;
        self.engine.remove_force_records(handle);
        let body = self.bodies.remove(handle);
        debug!(id, handle = %handle, "removed body");
        body
    }

    /// Registers a spring on `def.body` (and on `def.other` when
    /// bidirectional).
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown.
    pub fn add_spring(&mut self, def: &SpringDef) -> Result<()> {
        let lookup = |id: &str| {
            self.handle(id)
                .ok_or_else(|| anyhow!("spring references unknown body '{id}'"))
        };
        let body = lookup(&def.body)?;
        let other = lookup(&def.other)?;
        let (anchor, other_anchor) = (Vector3::from(def.anchor), Vector3::from(def.other_anchor));

        self.engine.add_force_record(
            body,
            Arc::new(Spring::new(anchor, other, other_anchor, def.elasticity, def.rest_length)),
        );
        if def.bidirectional {
            self.engine.add_force_record(
                other,
                Arc::new(Spring::new(other_anchor, body, anchor, def.elasticity, def.rest_length)),
            );
        }
        Ok(())
    }

    /// Applies a scripted event. Removing an unknown id is logged and
    /// otherwise ignored.
    ///
    /// # Errors
    ///
    /// Fails if a spawned box is invalid or reuses an id.
    pub fn apply(&mut self, action: &EventAction) -> Result<EventOutcome> {
        match action {
            EventAction::SpawnBox { id, size, pos, vel, mass } => {
                self.spawn(&BodyDef::cuboid(id, *size, *pos, *vel, *mass))?;
            }
            EventAction::Remove { id } => {
                if self.remove(id).is_none() {
                    warn!(id = %id, "remove event names no live body");
                }
            }
            EventAction::Quit => return Ok(EventOutcome::Quit),
        }
        Ok(EventOutcome::Continue)
    }

    /// Advances the world by one frame.
    ///
    /// # Errors
    ///
    /// Fails on an invalid timestep.
    pub fn step(&mut self, dt: f64) -> Result<FrameReport> {
        Ok(self.engine.update(&mut self.bodies, dt)?)
    }
}
