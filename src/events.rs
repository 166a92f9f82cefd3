use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::trace;

use crate::alloc::{Allocator, EntityKind};
use crate::error::{Result, TessError};
use crate::Real;

/// A position on the sweep plane.
///
/// The ordering is by `s` and then by `t`: the sweep line advances
/// along `s`. Implements `Ord` and `Eq` even though `f64` doesn't; all
/// sweep points are built from validated, finite input so the ordering
/// is total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub s: Real,
    pub t: Real,
}

impl SweepPoint {
    #[inline]
    pub fn new(s: Real, t: Real) -> Self {
        debug_assert!(s.is_finite(), "sweep point requires a finite s-coordinate");
        debug_assert!(t.is_finite(), "sweep point requires a finite t-coordinate");
        SweepPoint { s, t }
    }
}

/// Lexicographic ordering by `s` and then by `t`.
impl PartialOrd for SweepPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.s.partial_cmp(&other.s) {
            Some(Ordering::Equal) => self.t.partial_cmp(&other.t),
            o => o,
        }
    }
}

/// Derive `Ord` from `PartialOrd` and expect to not fail.
impl Ord for SweepPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// We derive `Eq` manually to not require `Real: Eq`.
impl Eq for SweepPoint {}

/// Handle to a queued event, valid until the event is extracted or
/// removed.
///
/// Ordered by position, then by insertion sequence so that events at
/// the same point come out in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct EventHandle {
    point: SweepPoint,
    seq: u64,
}

/// Min-priority queue of vertex events.
///
/// Events occupy slots reserved from the allocator up front: one per
/// input vertex plus `max(8, extra_vertices)` for intersections. Every
/// insertion uses up a slot; once they are gone the queue asks the
/// allocator to reallocate.
pub(crate) struct EventQueue {
    events: BTreeMap<EventHandle, usize>,
    seq: u64,
    slots: usize,
}

impl EventQueue {
    pub fn with_slots(alloc: &mut dyn Allocator, slots: usize) -> Result<Self> {
        if !alloc.alloc(EntityKind::Event, slots) {
            return Err(TessError::AllocationFailure {
                kind: EntityKind::Event,
                slots,
            });
        }
        Ok(EventQueue {
            events: BTreeMap::new(),
            seq: 0,
            slots,
        })
    }

    pub fn insert(
        &mut self,
        alloc: &mut dyn Allocator,
        point: SweepPoint,
        vertex: usize,
    ) -> Result<EventHandle> {
        if self.seq as usize >= self.slots {
            self.grow(alloc)?;
        }
        let handle = EventHandle {
            point,
            seq: self.seq,
        };
        self.seq += 1;
        self.events.insert(handle, vertex);
        Ok(handle)
    }

    fn grow(&mut self, alloc: &mut dyn Allocator) -> Result<()> {
        if !alloc.can_realloc() {
            return Err(TessError::GrowthUnsupported {
                kind: EntityKind::Event,
                slots: self.slots,
            });
        }
        let slots = self.slots.max(8) * 2;
        if !alloc.realloc(EntityKind::Event, self.slots, slots) {
            return Err(TessError::AllocationFailure {
                kind: EntityKind::Event,
                slots,
            });
        }
        trace!("event queue grown to {slots} slots");
        self.slots = slots;
        Ok(())
    }

    /// Vertex of the next event, without removing it.
    pub fn minimum(&self) -> Option<usize> {
        self.events.values().next().copied()
    }

    pub fn extract_min(&mut self) -> Option<usize> {
        let handle = *self.events.keys().next()?;
        self.events.remove(&handle)
    }

    /// Cancel a pending event. Stale handles are ignored.
    pub fn remove(&mut self, handle: EventHandle) -> Option<usize> {
        self.events.remove(&handle)
    }

    pub fn release(&mut self, alloc: &mut dyn Allocator) {
        alloc.free(EntityKind::Event, self.slots);
        self.events.clear();
        self.slots = 0;
    }
}
