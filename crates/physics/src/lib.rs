#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::float_cmp,
    clippy::many_single_char_names,
    clippy::suboptimal_flops
)]
//! # Cubeworld Physics Engine
//!
//! A small real-time rigid-body engine: bodies with mass, orientation and box
//! geometry are integrated under accumulated forces, and their corners are
//! tested against four fixed world boundary planes.
//!
//! ## Key Components
//!
//! -   **Math:** [`Vector3`], [`Quaternion`], [`Matrix3`] and [`Matrix34`] in
//!     double precision, in the [`math`] module.
//! -   **Bodies:** [`RigidBody`] holds mass properties and kinematic state and
//!     integrates itself. Bodies live in a [`BodySet`] and are addressed by
//!     [`BodyHandle`].
//! -   **Forces:** [`ForceGenerator`] implementations ([`Gravity`], [`Drag`],
//!     [`Spring`]) write into body accumulators through a [`ForceRegister`].
//! -   **Collision:** an [`Octree`] broad phase over box corners feeds a
//!     vertex-face narrow phase producing [`Contact`]s.
//! -   **Engine:** [`PhysicsEngine`] runs the per-frame pipeline and returns a
//!     [`FrameReport`].
//!
//! ## Usage
//!
//! ```rust
//! use physics::{BodySet, BodyShape, PhysicsEngine, RigidBody, Vector3};
//!
//! let mut bodies = BodySet::new();
//! let cube = bodies.insert(
//!     RigidBody::builder(BodyShape::cube(10.0))
//!         .mass(2.0)
//!         .position(Vector3::new(0.0, 20.0, 0.0))
//!         .build()?,
//! );
//!
//! let mut engine = PhysicsEngine::default();
//! for _ in 0..60 {
//!     let report = engine.update(&mut bodies, 1.0 / 60.0)?;
//!     for contact in report.contacts_for(cube) {
//!         println!("{:?} penetrated by {}", contact.boundary, contact.contact.penetration());
//!     }
//! }
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod bodies;
pub mod body;
pub mod builder;
pub mod collision;
pub mod error;
pub mod forces;
pub mod math;
pub mod render;
pub mod simulation;

pub use bodies::{BodyHandle, BodySet};
pub use body::{BodyShape, RigidBody};
pub use builder::RigidBodyBuilder;
pub use collision::{
    BodyContact, Boundary, BoundaryMask, BoundingBox, BoxPrimitive, Candidate, Contact, Octree,
    PlanePrimitive, Primitive, PrimitiveKind, WorldBounds,
};
pub use error::PhysicsError;
pub use forces::{Drag, ForceGenerator, ForceRecord, ForceRegister, Gravity, Spring};
pub use math::{Matrix3, Matrix34, Quaternion, Vector3};
pub use render::{BodyInstance, RenderVertex};
pub use simulation::{EngineConfig, FrameReport, PhysicsEngine};
