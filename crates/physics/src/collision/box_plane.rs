//! Vertex-face contact generation between boxes and planes.

use super::{BoxPrimitive, Contact, PlanePrimitive, Primitive};
use crate::math::Vector3;

/// Tests one vertex against a plane.
///
/// A vertex with `normal · v ≤ -offset` yields a contact halfway between the
/// vertex and its projection on the plane, with penetration
/// `-(normal · v + offset)`.
#[must_use]
pub fn generate_contact_vertex_plane(vertex: Vector3, plane: &PlanePrimitive) -> Option<Contact> {
    let distance = plane.signed_distance(vertex);
    if distance > 0.0 {
        return None;
    }
    let penetration = -distance;
    let point = vertex + plane.normal() * (penetration * 0.5);
    Some(Contact::new(point, plane.normal(), penetration))
}

/// One contact per box corner lying inside the plane.
#[must_use]
pub fn generate_contacts_vertex_face(plane: &PlanePrimitive, cuboid: &BoxPrimitive) -> Vec<Contact> {
    cuboid
        .vertices()
        .into_iter()
        .filter_map(|vertex| generate_contact_vertex_plane(vertex, plane))
        .collect()
}

/// Contacts between two primitives in either order. Only plane/box pairs
/// produce contacts.
#[must_use]
pub fn generate_contacts(a: &Primitive, b: &Primitive) -> Vec<Contact> {
    match (a, b) {
        (Primitive::Plane(plane), Primitive::Box(cuboid))
        | (Primitive::Box(cuboid), Primitive::Plane(plane)) => {
            generate_contacts_vertex_face(plane, cuboid)
        }
        _ => Vec::new(),
    }
}
