//! `vsn-core` — foundational types for the `vsn_topo` routing core.
//!
//! This crate is a dependency of every other `vsn-*` crate.  It intentionally
//! has no `vsn-*` dependencies and no mandatory external ones (`serde` is
//! optional).
//!
//! # What lives here
//!
//! | Module  | Contents                                                |
//! |---------|---------------------------------------------------------|
//! | [`ids`] | `VertexId`, `SegmentId`, `SensorId`, `PhysEdgeId`       |
//! | [`geo`] | `Point`, Euclidean distance, linear interpolation       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.     |

pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::Point;
pub use ids::{PhysEdgeId, SegmentId, SensorId, VertexId};
