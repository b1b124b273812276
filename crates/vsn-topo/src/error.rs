//! Topology-subsystem error type.
//!
//! Every variant is a hard failure for the call that produced it: the
//! restructuring engine performs no partial rollback, so after an error the
//! caller must treat the graph/table/registry triple as poisoned.

use thiserror::Error;

use vsn_core::{PhysEdgeId, SegmentId};
use vsn_graph::GraphError;

/// Errors produced by `vsn-topo`.
#[derive(Debug, Error)]
pub enum TopoError {
    #[error("hole range [{left}, {right}] is invalid on an edge of length {length}")]
    InvalidHoleRange { left: f64, right: f64, length: f64 },

    #[error("sensor occupancy list of segment {0} failed its consistency check")]
    InconsistentSensorList(SegmentId),

    #[error("segment {0} not found in schedule table")]
    SegmentNotFound(SegmentId),

    #[error("physical edge {0} not found in registry")]
    EdgeNotFound(PhysEdgeId),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type TopoResult<T> = Result<T, TopoError>;
