use glam::{DQuat, DVec3};
use physics::{Matrix3, Quaternion, Vector3};

fn to_glam(q: Quaternion) -> DQuat {
    DQuat::from_xyzw(q.i, q.j, q.k, q.r)
}

#[test]
fn rotation_agrees_with_glam() {
    let rotations = [
        (Vector3::X, 0.3),
        (Vector3::Y, -1.2),
        (Vector3::Z, 2.0),
        (Vector3::new(1.0, 1.0, 0.0), 0.75),
        (Vector3::new(-0.2, 0.4, 0.9), 3.0),
    ];
    let v = Vector3::new(1.5, -2.0, 0.25);
    for (axis, angle) in rotations {
        let q = Quaternion::from_axis_angle(axis, angle);
        let a = axis.normalized();
        let reference = DQuat::from_axis_angle(DVec3::new(a.x, a.y, a.z), angle);
        assert!(to_glam(q).abs_diff_eq(reference, 1e-12));

        let ours = Matrix3::from_quaternion(q) * v;
        let theirs = reference * DVec3::new(v.x, v.y, v.z);
        assert!((ours.x - theirs.x).abs() < 1e-12);
        assert!((ours.y - theirs.y).abs() < 1e-12);
        assert!((ours.z - theirs.z).abs() < 1e-12);
    }
}

#[test]
fn composition_order_agrees_with_glam() {
    let a = Quaternion::from_axis_angle(Vector3::X, 0.5);
    let b = Quaternion::from_axis_angle(Vector3::Z, -0.8);
    assert!(to_glam(a * b).abs_diff_eq(to_glam(a) * to_glam(b), 1e-12));
}
