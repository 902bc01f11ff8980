//! Octree broad phase over box corners.
//!
//! Every node covers a [`BoundingBox`] and is either a leaf holding
//! `(body, point)` entries or split into eight children. A leaf splits once it
//! holds more than [`MAX_RIGIDBODY_BY_LEVEL`] entries, unless it already sits
//! at [`MAX_LEVELS`]; leaves at the deepest level grow without bound.
//!
//! Octant index bits: bit 0 is set above the x midpoint (right), bit 1 above
//! the y midpoint (top) and bit 2 above the z midpoint (far). Points exactly on
//! a midpoint go to the lower side. Insertion and retrieval use the same
//! [`Octree::get_index`].
//!
//! Retrieval drops a boundary for a subtree only when no point routed into
//! that subtree can lie on the plane's solid side. The test uses the span of
//! points the octant tests can send there, not the child region, so planes
//! need not sit on the region's faces and points outside the root are still
//! found.

use std::mem;

use super::{Boundary, PlanePrimitive, Primitive};
use crate::bodies::BodyHandle;
use crate::math::Vector3;

pub const MAX_RIGIDBODY_BY_LEVEL: usize = 1;
pub const MAX_LEVELS: usize = 8;

const RIGHT_BIT: usize = 0b001;
const TOP_BIT: usize = 0b010;
const FAR_BIT: usize = 0b100;

/// Axis-aligned region given by its minimum corner and its extents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(-50.0, -50.0, -50.0, 100.0, 100.0, 100.0)
    }
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, width: f64, height: f64, depth: f64) -> Self {
        Self { x, y, z, width, height, depth }
    }

    #[must_use]
    pub fn center(&self) -> Vector3 {
        Vector3::new(
            self.x + self.width * 0.5,
            self.y + self.height * 0.5,
            self.z + self.depth * 0.5,
        )
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Vector3) -> bool {
        (self.x..=self.x + self.width).contains(&p.x)
            && (self.y..=self.y + self.height).contains(&p.y)
            && (self.z..=self.z + self.depth).contains(&p.z)
    }

    /// The sub-region for octant `index`, using the octant index bits.
    #[must_use]
    pub fn octant(&self, index: usize) -> Self {
        let (w, h, d) = (self.width * 0.5, self.height * 0.5, self.depth * 0.5);
        let pick = |bit: usize, half: f64| if index & bit == 0 { 0.0 } else { half };
        Self::new(
            self.x + pick(RIGHT_BIT, w),
            self.y + pick(TOP_BIT, h),
            self.z + pick(FAR_BIT, d),
            w,
            h,
            d,
        )
    }
}

/// The four fixed planes bounding the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldBounds {
    pub top: PlanePrimitive,
    pub right: PlanePrimitive,
    pub bottom: PlanePrimitive,
    pub left: PlanePrimitive,
}

impl Default for WorldBounds {
    /// Walls enclosing `[-50, 50]` on x and y, normals pointing inward.
    fn default() -> Self {
        Self::symmetric(50.0)
    }
}

impl WorldBounds {
    /// Walls at `±half_extent` on the x and y axes.
    #[must_use]
    pub fn symmetric(half_extent: f64) -> Self {
        Self {
            top: PlanePrimitive::new(Vector3::new(0.0, -1.0, 0.0), half_extent),
            right: PlanePrimitive::new(Vector3::new(-1.0, 0.0, 0.0), half_extent),
            bottom: PlanePrimitive::new(Vector3::new(0.0, 1.0, 0.0), half_extent),
            left: PlanePrimitive::new(Vector3::new(1.0, 0.0, 0.0), half_extent),
        }
    }

    #[must_use]
    pub const fn plane(&self, boundary: Boundary) -> &PlanePrimitive {
        match boundary {
            Boundary::Top => &self.top,
            Boundary::Right => &self.right,
            Boundary::Bottom => &self.bottom,
            Boundary::Left => &self.left,
        }
    }
}

/// Which boundaries a node may still be adjacent to during retrieval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundaryMask {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl BoundaryMask {
    pub const ALL: Self = Self { top: true, right: true, bottom: true, left: true };
    pub const NONE: Self = Self { top: false, right: false, bottom: false, left: false };

    #[must_use]
    pub const fn contains(self, boundary: Boundary) -> bool {
        match boundary {
            Boundary::Top => self.top,
            Boundary::Right => self.right,
            Boundary::Bottom => self.bottom,
            Boundary::Left => self.left,
        }
    }

    /// Keeps the boundaries whose planes `reach` can touch.
    fn narrowed(self, bounds: &WorldBounds, reach: Reach) -> Self {
        let keep = |boundary| self.contains(boundary) && reach.touches(bounds.plane(boundary));
        Self {
            top: keep(Boundary::Top),
            right: keep(Boundary::Right),
            bottom: keep(Boundary::Bottom),
            left: keep(Boundary::Left),
        }
    }
}

/// Closed box holding every point that can be routed into a subtree. Sides
/// that face out of the root are unbounded.
#[derive(Copy, Clone, Debug)]
struct Reach {
    min: Vector3,
    max: Vector3,
}

impl Reach {
    const UNBOUNDED: Self = Self {
        min: Vector3::splat(f64::NEG_INFINITY),
        max: Vector3::splat(f64::INFINITY),
    };

    fn child(self, mid: Vector3, index: usize) -> Self {
        let (mut min, mut max) = (self.min, self.max);
        if index & RIGHT_BIT == 0 {
            max.x = mid.x;
        } else {
            min.x = mid.x;
        }
        if index & TOP_BIT == 0 {
            max.y = mid.y;
        } else {
            min.y = mid.y;
        }
        if index & FAR_BIT == 0 {
            max.z = mid.z;
        } else {
            min.z = mid.z;
        }
        Self { min, max }
    }

    /// Whether some point of the box satisfies `normal · p + offset ≤ 0`.
    fn touches(self, plane: &PlanePrimitive) -> bool {
        // Zero components are skipped so infinite sides never meet a zero.
        let lowest = |normal: f64, min: f64, max: f64| {
            if normal > 0.0 {
                normal * min
            } else if normal < 0.0 {
                normal * max
            } else {
                0.0
            }
        };
        let n = plane.normal();
        lowest(n.x, self.min.x, self.max.x)
            + lowest(n.y, self.min.y, self.max.y)
            + lowest(n.z, self.min.z, self.max.z)
            + plane.offset()
            <= 0.0
    }
}

/// A point that may touch a boundary plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate {
    pub body: BodyHandle,
    pub point: Vector3,
    pub boundary: Boundary,
}

#[derive(Debug)]
enum Node {
    Leaf(Vec<(BodyHandle, Vector3)>),
    Split(Box<[Octree; 8]>),
}

#[derive(Debug)]
pub struct Octree {
    level: usize,
    region: BoundingBox,
    node: Node,
}

impl Octree {
    /// An empty root node at level 0.
    #[must_use]
    pub fn new(region: BoundingBox) -> Self {
        Self::with_level(region, 0)
    }

    #[must_use]
    pub fn with_level(region: BoundingBox, level: usize) -> Self {
        Self { level, region, node: Node::Leaf(Vec::new()) }
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn bounds(&self) -> &BoundingBox {
        &self.region
    }

    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self.node, Node::Split(_))
    }

    /// Entries held directly by this node; empty once split.
    #[must_use]
    pub fn entries(&self) -> &[(BodyHandle, Vector3)] {
        match &self.node {
            Node::Leaf(entries) => entries,
            Node::Split(_) => &[],
        }
    }

    #[must_use]
    pub fn children(&self) -> Option<&[Self; 8]> {
        match &self.node {
            Node::Leaf(_) => None,
            Node::Split(children) => Some(children),
        }
    }

    /// Total number of entries in the subtree.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.node {
            Node::Leaf(entries) => entries.len(),
            Node::Split(children) => children.iter().map(Self::len).sum(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries and children.
    pub fn clear(&mut self) {
        self.node = Node::Leaf(Vec::new());
    }

    /// Octant of `point` relative to this node's midpoint. Points outside the
    /// region land in the nearest octant.
    #[must_use]
    pub fn get_index(&self, point: Vector3) -> usize {
        let mid = self.region.center();
        let mut index = 0;
        if point.x > mid.x {
            index |= RIGHT_BIT;
        }
        if point.y > mid.y {
            index |= TOP_BIT;
        }
        if point.z > mid.z {
            index |= FAR_BIT;
        }
        debug_assert!(index < 8);
        index
    }

    /// Inserts the corners of box primitives. Planes contribute nothing.
    pub fn insert_primitive(&mut self, primitive: &Primitive) {
        if let Primitive::Box(cuboid) = primitive {
            for vertex in cuboid.vertices() {
                self.insert(cuboid.body, vertex);
            }
        }
    }

    pub fn insert(&mut self, body: BodyHandle, point: Vector3) {
        let index = self.get_index(point);
        match &mut self.node {
            Node::Split(children) => children[index].insert(body, point),
            Node::Leaf(entries) => {
                entries.push((body, point));
                if entries.len() > MAX_RIGIDBODY_BY_LEVEL && self.level < MAX_LEVELS {
                    self.split();
                }
            }
        }
    }

    /// Replaces this leaf with eight children and moves its entries into them.
    fn split(&mut self) {
        let level = self.level + 1;
        let region = self.region;
        let children = Box::new(std::array::from_fn(|i| Self::with_level(region.octant(i), level)));
        let Node::Leaf(entries) = mem::replace(&mut self.node, Node::Split(children)) else {
            return;
        };
        for (body, point) in entries {
            self.insert(body, point);
        }
    }

    /// The leaf whose region `point` falls into.
    #[must_use]
    pub fn leaf_for(&self, point: Vector3) -> &Self {
        match &self.node {
            Node::Leaf(_) => self,
            Node::Split(children) => children[self.get_index(point)].leaf_for(point),
        }
    }

    /// Candidates for every boundary in `mask`. Each point is paired with
    /// every boundary in `mask` whose plane its subtree can reach, so every
    /// penetrating `(point, boundary)` pair is among the candidates.
    #[must_use]
    pub fn retrieve(&self, bounds: &WorldBounds, mask: BoundaryMask) -> Vec<Candidate> {
        let mut out = Vec::new();
        self.retrieve_into(bounds, mask, Reach::UNBOUNDED, &mut out);
        out
    }

    fn retrieve_into(
        &self,
        bounds: &WorldBounds,
        mask: BoundaryMask,
        reach: Reach,
        out: &mut Vec<Candidate>,
    ) {
        match &self.node {
            Node::Leaf(entries) => {
                for &(body, point) in entries {
                    out.extend(
                        Boundary::ALL
                            .into_iter()
                            .filter(|&boundary| mask.contains(boundary))
                            .map(|boundary| Candidate { body, point, boundary }),
                    );
                }
            }
            Node::Split(children) => {
                let mid = self.region.center();
                for (index, child) in children.iter().enumerate() {
                    let child_reach = reach.child(mid, index);
                    let child_mask = mask.narrowed(bounds, child_reach);
                    if child_mask != BoundaryMask::NONE {
                        child.retrieve_into(bounds, child_mask, child_reach, out);
                    }
                }
            }
        }
    }
}
