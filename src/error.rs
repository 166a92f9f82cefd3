use thiserror::Error;

use crate::alloc::EntityKind;
use crate::Real;

/// Errors reported by the [`Tessellator`](crate::Tessellator).
///
/// Near-coincident geometry met during the sweep is repaired in place
/// and never shows up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TessError {
    /// The allocator refused to hand out another block of slots.
    #[error("allocator refused {slots} {kind} slots")]
    AllocationFailure { kind: EntityKind, slots: usize },

    /// The event queue ran out of reserved slots and the allocator
    /// cannot reallocate.
    #[error("event queue is full ({slots} slots) and the allocator cannot grow it")]
    GrowthUnsupported { kind: EntityKind, slots: usize },

    /// Nothing left to tessellate.
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A coordinate that is not finite, or too large to be compared
    /// robustly (see [`MAX_COORD`](crate::MAX_COORD)).
    #[error("coordinate {value} of input vertex {index} is out of range")]
    InvalidCoordinate { index: u32, value: Real },
}

/// Convenience type alias for results using [`TessError`].
pub type Result<T> = std::result::Result<T, TessError>;
