use std::sync::Arc;

use physics::{
    BodySet, BodyShape, EngineConfig, PhysicsEngine, Quaternion, RigidBody, Spring, Vector3,
};

#[test]
fn immovable_bodies_never_move() -> anyhow::Result<()> {
    let mut bodies = BodySet::new();
    let wall = bodies.insert(
        RigidBody::builder(BodyShape::cuboid(4.0, 20.0, 4.0))
            .immovable()
            .position(Vector3::new(-30.0, 0.0, 0.0))
            .orientation(Quaternion::from_axis_angle(Vector3::Y, 0.3))
            .build()?,
    );
    let before = bodies.get(wall).unwrap().clone();
    let mut engine = PhysicsEngine::default();

    for _ in 0..500 {
        let report = engine.update(&mut bodies, 1.0 / 60.0)?;
        assert!(report.unstable_bodies.is_empty());
    }

    let after = bodies.get(wall).unwrap();
    assert_eq!(after.position(), before.position());
    assert_eq!(after.orientation(), before.orientation());
    assert_eq!(after.velocity(), Vector3::ZERO);
    Ok(())
}

#[test]
fn zero_timestep_frames_leave_bodies_unchanged() -> anyhow::Result<()> {
    let mut bodies = BodySet::new();
    let cube = bodies.insert(
        RigidBody::builder(BodyShape::cube(2.0))
            .velocity(Vector3::new(1.0, 2.0, 3.0))
            .angular_velocity(Vector3::new(0.5, 0.0, 0.0))
            .build()?,
    );
    let before = bodies.get(cube).unwrap().clone();
    let mut engine = PhysicsEngine::default();
    for _ in 0..10 {
        engine.update(&mut bodies, 0.0)?;
    }
    let after = bodies.get(cube).unwrap();
    assert_eq!(after.position(), before.position());
    assert_eq!(after.velocity(), before.velocity());
    assert_eq!(after.orientation(), before.orientation());
    Ok(())
}

#[test]
fn broken_body_is_rolled_back_without_affecting_others() -> anyhow::Result<()> {
    let mut bodies = BodySet::new();
    let healthy = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build()?);
    let broken = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build()?);
    bodies
        .get_mut(broken)
        .unwrap()
        .set_velocity(Vector3::new(f64::MAX, 0.0, 0.0));
    let broken_before = bodies.get(broken).unwrap().position();

    let mut engine = PhysicsEngine::new(EngineConfig { linear_drag: 0.0, ..EngineConfig::default() });
    let report = engine.update(&mut bodies, 1.0 / 60.0)?;

    assert_eq!(report.unstable_bodies, vec![broken]);
    assert_eq!(bodies.get(broken).unwrap().position(), broken_before);
    assert!(bodies.get(healthy).unwrap().velocity().y < 0.0);
    Ok(())
}

#[test]
fn spring_pulls_bodies_together() -> anyhow::Result<()> {
    let config = EngineConfig { gravity: Vector3::ZERO, ..EngineConfig::default() };
    let mut bodies = BodySet::new();
    let a = bodies.insert(RigidBody::builder(BodyShape::cube(1.0)).build()?);
    let b = bodies.insert(
        RigidBody::builder(BodyShape::cube(1.0)).position(Vector3::new(10.0, 0.0, 0.0)).build()?,
    );
    let mut engine = PhysicsEngine::new(config);
    engine.add_force_record(a, Arc::new(Spring::new(Vector3::ZERO, b, Vector3::ZERO, 5.0, 2.0)));
    engine.add_force_record(b, Arc::new(Spring::new(Vector3::ZERO, a, Vector3::ZERO, 5.0, 2.0)));

    let start = 10.0;
    for _ in 0..10 {
        engine.update(&mut bodies, 0.01)?;
    }
    let gap = bodies.get(b).unwrap().position().x - bodies.get(a).unwrap().position().x;
    assert!(gap < start);
    // Equal masses under mirrored springs keep the midpoint fixed.
    let mid = (bodies.get(b).unwrap().position().x + bodies.get(a).unwrap().position().x) / 2.0;
    assert!((mid - 5.0).abs() < 1e-9);
    Ok(())
}
