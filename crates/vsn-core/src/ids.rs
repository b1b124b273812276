//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into backing `Vec`s, but callers should prefer the index
//! helpers for clarity.
//!
//! `VertexId` is **1-based** — road-network configuration files number their
//! vertices from 1, and keeping the external numbering end to end avoids a
//! translation layer at every text boundary.  Its backing-array position is
//! `slot() == id - 1`.  All other IDs are plain 0-based indices.

use std::fmt;

/// Generate a typed 0-based ID wrapper around a `u32`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identifier of a virtual-graph segment descriptor in the schedule
    /// table.  Assigned monotonically; never reused within one run.
    pub struct SegmentId;
}

typed_id! {
    /// Identifier of a sensor deployed on a road segment.
    pub struct SensorId;
}

typed_id! {
    /// Index of a physical (unsubdivided) road-network edge in the edge
    /// registry.
    pub struct PhysEdgeId;
}

// ── VertexId ──────────────────────────────────────────────────────────────────

/// 1-based stable identifier of a graph vertex.
///
/// The value `0` never names a vertex; [`VertexId::INVALID`] doubles as the
/// "no predecessor" marker in shortest-path records.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexId(pub u32);

impl VertexId {
    /// Sentinel meaning "no valid vertex".
    pub const INVALID: VertexId = VertexId(u32::MAX);

    /// 0-based position of this vertex in the node array (`id - 1`).
    #[inline(always)]
    pub fn slot(self) -> usize {
        debug_assert!(self.0 >= 1, "VertexId 0 is not a valid vertex");
        (self.0 - 1) as usize
    }

    /// Inverse of [`slot`](Self::slot).
    #[inline(always)]
    pub fn from_slot(slot: usize) -> VertexId {
        VertexId(slot as u32 + 1)
    }
}

impl Default for VertexId {
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
