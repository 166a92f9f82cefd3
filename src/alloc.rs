//! Pluggable allocation strategy.
//!
//! Entities (vertices, half-edge pairs, faces, dictionary nodes, active
//! regions and event slots) live in [`Slab`] pools. A pool never grows
//! on its own: it claims whole buckets of slots from an [`Allocator`],
//! which may refuse. Freed slots are recycled through the slab's free
//! list and only returned to the allocator when the pool is released.
//!
//! Per-instance state (what the C world would call "user data") is just
//! the allocator value itself, so independent tessellators on separate
//! threads never share anything.
use std::fmt;
use std::ops::{Index, IndexMut};

use log::trace;
use slab::Slab;

use crate::error::{Result, TessError};

/// Kinds of entities the tessellator asks storage for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vertex,
    Edge,
    Face,
    DictNode,
    Region,
    Event,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Vertex,
        EntityKind::Edge,
        EntityKind::Face,
        EntityKind::DictNode,
        EntityKind::Region,
        EntityKind::Event,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Vertex => "vertex",
            EntityKind::Edge => "edge",
            EntityKind::Face => "face",
            EntityKind::DictNode => "dictionary node",
            EntityKind::Region => "active region",
            EntityKind::Event => "event",
        };
        f.write_str(name)
    }
}

/// Allocation strategy consulted whenever a pool needs more slots.
///
/// `alloc` and `realloc` return `false` to signal failure. An allocator
/// that returns `false` from [`can_realloc`](Allocator::can_realloc)
/// disables dynamic growth of the event queue: intersections beyond
/// [`AllocatorConfig::extra_vertices`] then fail with
/// [`TessError::GrowthUnsupported`].
pub trait Allocator: Send {
    /// Claim a fresh block of `slots` entities of `kind`.
    fn alloc(&mut self, kind: EntityKind, slots: usize) -> bool;

    /// Grow a block from `old_slots` to `new_slots`.
    fn realloc(&mut self, kind: EntityKind, old_slots: usize, new_slots: usize) -> bool;

    /// Return a block of `slots` entities of `kind`.
    fn free(&mut self, kind: EntityKind, slots: usize);

    fn can_realloc(&self) -> bool {
        true
    }
}

/// Default heap-backed allocator.
///
/// Keeps per-kind accounting of claimed slots and optionally enforces
/// a total slot budget.
#[derive(Debug, Clone, Default)]
pub struct HeapAllocator {
    live: [usize; 6],
    peak: usize,
    limit: Option<usize>,
    fixed: bool,
}

impl HeapAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that refuses to claim more than `limit` slots in
    /// total.
    pub fn with_limit(limit: usize) -> Self {
        HeapAllocator {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Disable reallocation (dynamic event-queue growth).
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Slots currently claimed for `kind`.
    #[must_use]
    pub fn live(&self, kind: EntityKind) -> usize {
        self.live[kind.index()]
    }

    /// Slots currently claimed across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.live.iter().sum()
    }

    /// Largest total ever claimed at once.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak
    }

    fn claim(&mut self, kind: EntityKind, slots: usize) -> bool {
        let total = self.total() + slots;
        if matches!(self.limit, Some(limit) if total > limit) {
            return false;
        }
        self.live[kind.index()] += slots;
        self.peak = self.peak.max(total);
        true
    }
}

impl Allocator for HeapAllocator {
    fn alloc(&mut self, kind: EntityKind, slots: usize) -> bool {
        self.claim(kind, slots)
    }

    fn realloc(&mut self, kind: EntityKind, old_slots: usize, new_slots: usize) -> bool {
        if self.fixed {
            return false;
        }
        self.claim(kind, new_slots.saturating_sub(old_slots))
    }

    fn free(&mut self, kind: EntityKind, slots: usize) {
        let live = &mut self.live[kind.index()];
        *live = live.saturating_sub(slots);
    }

    fn can_realloc(&self) -> bool {
        !self.fixed
    }
}

const MIN_BUCKET: usize = 16;
const MAX_BUCKET: usize = 4096;

/// Bucket sizes per entity kind, and the number of extra event slots
/// reserved for intersection vertices.
///
/// A bucket size of zero selects the default; other values are clamped
/// to `16..=4096`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub mesh_edge_bucket_size: usize,
    pub mesh_vertex_bucket_size: usize,
    pub mesh_face_bucket_size: usize,
    pub dict_node_bucket_size: usize,
    pub region_bucket_size: usize,
    pub extra_vertices: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        AllocatorConfig {
            mesh_edge_bucket_size: 512,
            mesh_vertex_bucket_size: 512,
            mesh_face_bucket_size: 256,
            dict_node_bucket_size: 512,
            region_bucket_size: 256,
            extra_vertices: 0,
        }
    }
}

impl AllocatorConfig {
    /// Use the same bucket size for every entity kind.
    #[must_use]
    pub fn with_bucket_size(mut self, size: usize) -> Self {
        self.mesh_edge_bucket_size = size;
        self.mesh_vertex_bucket_size = size;
        self.mesh_face_bucket_size = size;
        self.dict_node_bucket_size = size;
        self.region_bucket_size = size;
        self
    }

    #[must_use]
    pub fn with_extra_vertices(mut self, extra: usize) -> Self {
        self.extra_vertices = extra;
        self
    }

    /// Effective bucket size for `kind`.
    pub fn bucket_size(&self, kind: EntityKind) -> usize {
        let defaults = AllocatorConfig::default();
        let (size, default) = match kind {
            EntityKind::Vertex => (self.mesh_vertex_bucket_size, defaults.mesh_vertex_bucket_size),
            EntityKind::Edge => (self.mesh_edge_bucket_size, defaults.mesh_edge_bucket_size),
            EntityKind::Face => (self.mesh_face_bucket_size, defaults.mesh_face_bucket_size),
            EntityKind::DictNode => (self.dict_node_bucket_size, defaults.dict_node_bucket_size),
            EntityKind::Region => (self.region_bucket_size, defaults.region_bucket_size),
            EntityKind::Event => return self.extra_vertices.max(8),
        };
        if size == 0 {
            default
        } else {
            size.clamp(MIN_BUCKET, MAX_BUCKET)
        }
    }
}

/// Slab of entities that claims storage bucket by bucket.
pub(crate) struct Pool<T> {
    slab: Slab<T>,
    kind: EntityKind,
    bucket: usize,
    reserved: usize,
}

impl<T> Pool<T> {
    pub fn new(kind: EntityKind, config: &AllocatorConfig) -> Self {
        Pool {
            slab: Slab::new(),
            kind,
            bucket: config.bucket_size(kind),
            reserved: 0,
        }
    }

    /// Claimed slots not holding an entity.
    #[inline]
    pub fn spare(&self) -> usize {
        self.reserved - self.slab.len()
    }

    /// Claim buckets until at least `additional` inserts cannot fail.
    pub fn reserve(&mut self, alloc: &mut dyn Allocator, additional: usize) -> Result<()> {
        while self.spare() < additional {
            if !alloc.alloc(self.kind, self.bucket) {
                return Err(TessError::AllocationFailure {
                    kind: self.kind,
                    slots: self.bucket,
                });
            }
            trace!("claimed {} {} slots", self.bucket, self.kind);
            self.reserved += self.bucket;
            self.slab.reserve(self.bucket);
        }
        Ok(())
    }

    /// Store `value`, claiming a new bucket first if every reserved
    /// slot is taken.
    pub fn insert(&mut self, alloc: &mut dyn Allocator, value: T) -> Result<usize> {
        self.reserve(alloc, 1)?;
        Ok(self.slab.insert(value))
    }

    pub fn remove(&mut self, key: usize) -> T {
        self.slab.remove(key)
    }

    #[inline]
    pub fn contains(&self, key: usize) -> bool {
        self.slab.contains(key)
    }

    /// Drop every entity and hand the claimed buckets back.
    pub fn release(&mut self, alloc: &mut dyn Allocator) {
        if self.reserved > 0 {
            alloc.free(self.kind, self.reserved);
        }
        self.slab.clear();
        self.reserved = 0;
    }
}

impl<T> Index<usize> for Pool<T> {
    type Output = T;

    #[inline]
    fn index(&self, key: usize) -> &T {
        &self.slab[key]
    }
}

impl<T> IndexMut<usize> for Pool<T> {
    #[inline]
    fn index_mut(&mut self, key: usize) -> &mut T {
        &mut self.slab[key]
    }
}
