//! # Body Storage
//!
//! [`BodySet`] owns every [`RigidBody`] in the world. Bodies are addressed by
//! [`BodyHandle`], an index plus a generation counter, so a handle kept
//! after its body was removed resolves to `None` instead of aliasing a
//! newer body that reused the slot.

use std::fmt;

use crate::body::RigidBody;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: usize,
    generation: u32,
}

impl BodyHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    body: Option<RigidBody>,
}

#[derive(Clone, Debug, Default)]
pub struct BodySet {
    slots: Vec<Slot>,
    free: Vec<usize>,
    len: usize,
}

impl BodySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `body`, reusing a free slot when one exists.
    pub fn insert(&mut self, body: RigidBody) -> BodyHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.body = Some(body);
            return BodyHandle { index, generation: slot.generation };
        }
        let index = self.slots.len();
        self.slots.push(Slot { generation: 0, body: Some(body) });
        BodyHandle { index, generation: 0 }
    }

    /// Removes and returns the body; the handle becomes stale.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(body)
    }

    #[must_use]
    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_ref())
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_mut())
    }

    /// Two distinct bodies borrowed mutably at once. `None` if either handle
    /// is stale or both name the same body.
    pub fn get_pair_mut(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        if a.index == b.index || self.get(a).is_none() || self.get(b).is_none() {
            return None;
        }
        let (low, high, swapped) = if a.index < b.index { (a, b, false) } else { (b, a, true) };
        let (head, tail) = self.slots.split_at_mut(high.index);
        let first = head[low.index].body.as_mut()?;
        let second = tail[0].body.as_mut()?;
        Some(if swapped { (second, first) } else { (first, second) })
    }

    #[must_use]
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handles of all live bodies in slot order.
    #[must_use]
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.body
                .as_ref()
                .map(|body| (BodyHandle { index, generation: slot.generation }, body))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut RigidBody)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.body
                .as_mut()
                .map(|body| (BodyHandle { index, generation }, body))
        })
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.body.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyShape;
    use crate::math::Vector3;

    fn body_at(x: f64) -> RigidBody {
        RigidBody::builder(BodyShape::cube(1.0))
            .position(Vector3::new(x, 0.0, 0.0))
            .build()
            .unwrap()
    }

    #[test]
    fn stale_handles_do_not_alias_reused_slots() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(body_at(1.0));
        let b = bodies.insert(body_at(2.0));
        assert_eq!(bodies.len(), 2);

        assert!(bodies.remove(a).is_some());
        assert!(bodies.remove(a).is_none());
        assert!(bodies.get(a).is_none());

        let c = bodies.insert(body_at(3.0));
        assert_eq!(c.index(), a.index());
        assert_ne!(c, a);
        assert!(bodies.get(a).is_none());
        assert_eq!(bodies.get(c).unwrap().position().x, 3.0);
        assert_eq!(bodies.get(b).unwrap().position().x, 2.0);
        assert_eq!(bodies.len(), 2);
    }

    #[test]
    fn pair_borrow_preserves_argument_order() {
        let mut bodies = BodySet::new();
        let a = bodies.insert(body_at(1.0));
        let b = bodies.insert(body_at(2.0));
        let (second, first) = bodies.get_pair_mut(b, a).unwrap();
        assert_eq!(second.position().x, 2.0);
        assert_eq!(first.position().x, 1.0);
        assert!(bodies.get_pair_mut(a, a).is_none());
    }

    #[test]
    fn iteration_skips_removed_bodies() {
        let mut bodies = BodySet::new();
        let handles: Vec<_> = (0..4).map(|i| bodies.insert(body_at(f64::from(i)))).collect();
        bodies.remove(handles[1]);
        let xs: Vec<f64> = bodies.iter().map(|(_, b)| b.position().x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 3.0]);
        assert_eq!(bodies.handles(), vec![handles[0], handles[2], handles[3]]);

        bodies.clear();
        assert!(bodies.is_empty());
        assert!(bodies.get(handles[0]).is_none());
    }
}
