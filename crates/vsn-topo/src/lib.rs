//! `vsn-topo` — schedule table, edge registry, and hole restructuring.
//!
//! This crate sits on top of [`vsn_graph`]: it owns the three-way aggregate
//! of graph store, per-edge schedule table, and physical-edge registry, and
//! keeps them mutually consistent as sensing holes appear and grow.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`schedule`] | `ScheduleTable`, `SegmentDescriptor`, sensor occupancy   |
//! | [`registry`] | `EdgeRegistry`, sub-edges, hole-endpoint markers         |
//! | [`network`]  | `RoadNetwork` aggregate, `RoadNetworkBuilder`            |
//! | [`mutator`]  | `apply_sensing_hole`, `HoleUpdate`                       |
//! | [`loader`]   | CSV road-network loading                                 |
//! | [`error`]    | `TopoError`, `TopoResult<T>`                             |

pub mod error;
pub mod loader;
pub mod mutator;
pub mod network;
pub mod registry;
pub mod schedule;


pub use error::{TopoError, TopoResult};
pub use loader::{load_network_csv, load_network_readers};
pub use mutator::HoleUpdate;
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use registry::{EdgeRegistry, HoleEndpoint, PhysicalEdge, Subedge};
pub use schedule::{
    Direction, ScheduleTable, SegmentDescriptor, SegmentKind, SensorEntry, OFFSET_EPS,
};
