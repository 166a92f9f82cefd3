//! Sweep-line tessellation of arbitrary polygons.
//!
//! Decomposes closed contours, which may be concave, self-intersecting,
//! nested or overlapping, into simple output primitives:
//!
//! 1. triangles or convex polygons of bounded size,
//! 1. the same, together with the adjacency between them,
//! 1. or the boundary loops of the interior.
//!
//! The interior is the set of regions whose winding number satisfies
//! a [`WindingRule`]. Contours may live on any plane in 3D; they are
//! projected along a given or computed normal first.
//!
//! # Usage
//!
//! ```rust
//! use geo_tess::{ElementType, Tessellator, WindingRule, TESS_UNDEF};
//!
//! let mut tess = Tessellator::new();
//! // A bow tie crossing itself at (1, 1).
//! tess.add_contour_2d(&[[0., 0.], [2., 2.], [2., 0.], [0., 2.]])
//!     .unwrap();
//! tess.tessellate(WindingRule::NonZero, ElementType::Polygons, 3, 2, None)
//!     .unwrap();
//!
//! assert_eq!(tess.element_count(), 2);
//! // The crossing is a new vertex, not one of the input.
//! let new = tess.vertex_indices().iter().filter(|&&i| i == TESS_UNDEF);
//! assert_eq!(new.count(), 1);
//! ```
//!
//! # Algorithm
//!
//! The contours are linked into a half-edge mesh. A sweep over the
//! vertices, in lexicographic order of their projection, keeps the
//! edges crossing the sweep line in an ordered dictionary, splits
//! edges where they intersect and computes the winding number of
//! every region. Interior regions come out monotone and are then
//! triangulated directly, and optionally merged back into convex
//! polygons.
//!
//! All storage is drawn from an [`Allocator`] in buckets, so a
//! tessellation can be bounded or fail cleanly with a
//! [`TessError`] instead of aborting.

mod error;
pub use error::{Result, TessError};

mod alloc;
pub use alloc::{Allocator, AllocatorConfig, EntityKind, HeapAllocator};

mod events;
mod geom;
mod mesh;
mod active;
mod sweep;
mod monotone;
mod project;
mod output;

mod tess;
pub use tess::{ElementType, Tessellator, WindingRule};

mod convert;

/// Floating point type of all coordinates.
pub type Real = f64;

/// Index marking the absence of a vertex or polygon in the output.
pub const TESS_UNDEF: u32 = u32::MAX;

/// Most values a vertex may carry.
pub const MAX_DIMENSIONS: usize = 12;

/// Largest accepted coordinate magnitude.
pub const MAX_COORD: Real = 1e150;

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;
