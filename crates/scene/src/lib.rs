#![deny(clippy::all, clippy::pedantic)]
//! # Scene Descriptions
//!
//! A scene is a JSON document listing the engine configuration, the bodies
//! to create, springs between them and scripted events keyed by frame
//! number. [`Scene::into_world`] turns it into a ready-to-step [`World`].
//!
//! ```json
//! {
//!   "config": { "gravity": [0, -20, 0] },
//!   "bodies": [
//!     { "id": "floor", "shape": "box", "size": [80, 4, 80], "pos": [0, -45, 0], "immovable": true },
//!     { "id": "crate", "shape": "box", "size": [10, 10, 10], "pos": [0, 20, 0], "mass": 2.0 }
//!   ],
//!   "springs": [{ "body": "crate", "other": "floor", "elasticity": 4.0, "rest_length": 30.0 }],
//!   "events": [{ "frame": 120, "action": "quit" }]
//! }
//! ```

mod world;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use physics::{BodyShape, BoundingBox, EngineConfig, Quaternion, RigidBody, Vector3, WorldBounds};
use serde::Deserialize;

pub use world::{EventOutcome, World};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Scene {
    #[serde(default)]
    pub config: SceneConfig,
    pub bodies: Vec<BodyDef>,
    #[serde(default)]
    pub springs: Vec<SpringDef>,
    #[serde(default)]
    pub events: Vec<EventDef>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub gravity: [f64; 3],
    pub linear_drag: f64,
    pub quadratic_drag: f64,
    /// Walls sit at `±world_half_extent` on x and y; the octree covers the
    /// same cube.
    pub world_half_extent: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            gravity: engine.gravity.to_array(),
            linear_drag: engine.linear_drag,
            quadratic_drag: engine.quadratic_drag,
            world_half_extent: 50.0,
        }
    }
}

impl SceneConfig {
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        let h = self.world_half_extent;
        EngineConfig {
            gravity: Vector3::from(self.gravity),
            linear_drag: self.linear_drag,
            quadratic_drag: self.quadratic_drag,
            bounds: WorldBounds::symmetric(h),
            region: BoundingBox::new(-h, -h, -h, 2.0 * h, 2.0 * h, 2.0 * h),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyDef {
    pub id: String,
    #[serde(flatten)]
    pub shape: ShapeDef,
    /// Defaults to 1 when absent. Ignored for immovable bodies.
    #[serde(default)]
    pub mass: Option<f64>,
    #[serde(default)]
    pub immovable: bool,
    #[serde(default)]
    pub pos: [f64; 3],
    #[serde(default)]
    pub vel: [f64; 3],
    #[serde(default)]
    pub orientation: Option<OrientationDef>,
    #[serde(default)]
    pub angular_vel: [f64; 3],
    #[serde(default)]
    pub angular_damping: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "shape")]
pub enum ShapeDef {
    #[serde(rename = "box")]
    Box { size: [f64; 3] },
    #[serde(rename = "sphere")]
    Sphere { radius: f64 },
    /// Points in scene coordinates; inertia and the collision box are
    /// measured about the body's `pos`.
    #[serde(rename = "points")]
    Points { points: Vec<[f64; 3]> },
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum OrientationDef {
    AxisAngle { axis: [f64; 3], angle: f64 },
    Quaternion { r: f64, i: f64, j: f64, k: f64 },
}

impl OrientationDef {
    #[must_use]
    pub fn to_quaternion(self) -> Quaternion {
        match self {
            Self::AxisAngle { axis, angle } => Quaternion::from_axis_angle(Vector3::from(axis), angle),
            Self::Quaternion { r, i, j, k } => Quaternion::new(r, i, j, k).normalized(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SpringDef {
    pub body: String,
    pub other: String,
    #[serde(default)]
    pub anchor: [f64; 3],
    #[serde(default)]
    pub other_anchor: [f64; 3],
    pub elasticity: f64,
    pub rest_length: f64,
    /// Also registers the mirrored spring acting on `other`.
    #[serde(default)]
    pub bidirectional: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EventDef {
    pub frame: u64,
    #[serde(flatten)]
    pub action: EventAction,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EventAction {
    SpawnBox {
        id: String,
        size: [f64; 3],
        #[serde(default)]
        pos: [f64; 3],
        #[serde(default)]
        vel: [f64; 3],
        #[serde(default)]
        mass: Option<f64>,
    },
    Remove {
        id: String,
    },
    Quit,
}

impl BodyDef {
    /// A movable box, as spawned by events.
    #[must_use]
    pub fn cuboid(id: &str, size: [f64; 3], pos: [f64; 3], vel: [f64; 3], mass: Option<f64>) -> Self {
        Self {
            id: id.to_owned(),
            shape: ShapeDef::Box { size },
            mass,
            immovable: false,
            pos,
            vel,
            orientation: None,
            angular_vel: [0.0; 3],
            angular_damping: None,
        }
    }

    /// Builds the rigid body this definition describes.
    ///
    /// # Errors
    ///
    /// Fails when the physical parameters are rejected by the body builder.
    pub fn build(&self) -> Result<RigidBody> {
        let shape = match &self.shape {
            ShapeDef::Box { size } => BodyShape::Box { size: Vector3::from(*size) },
            ShapeDef::Sphere { radius } => BodyShape::Sphere { radius: *radius },
            ShapeDef::Points { points } => {
                BodyShape::Points(points.iter().copied().map(Vector3::from).collect())
            }
        };

        let mut builder = RigidBody::builder(shape)
            .position(Vector3::from(self.pos))
            .velocity(Vector3::from(self.vel))
            .angular_velocity(Vector3::from(self.angular_vel));
        builder = if self.immovable {
            builder.immovable()
        } else {
            builder.mass(self.mass.unwrap_or(1.0))
        };
        if let Some(orientation) = self.orientation {
            builder = builder.orientation(orientation.to_quaternion());
        }
        if let Some(damping) = self.angular_damping {
            builder = builder.angular_damping(damping);
        }
        builder.build().with_context(|| format!("invalid body '{}'", self.id))
    }
}

impl FromStr for Scene {
    type Err = anyhow::Error;

    fn from_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse scene")
    }
}

impl Scene {
    /// Reads and parses a scene file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene file {}", path.display()))?;
        json.parse::<Self>()
            .with_context(|| format!("in scene file {}", path.display()))
    }

    /// Builds the bodies, engine and springs.
    ///
    /// # Errors
    ///
    /// Fails on duplicate body ids, invalid body parameters or springs that
    /// name unknown bodies.
    pub fn into_world(self) -> Result<World> {
        World::from_scene(self)
    }
}
