//! Graph-subsystem error type.

use thiserror::Error;

use vsn_core::VertexId;

/// Errors produced by `vsn-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex {0} not found in graph")]
    NotFound(VertexId),

    #[error("{0} and {1} are not adjacent")]
    NotAdjacent(VertexId, VertexId),

    #[error("cannot free {0}: it still has incident edges")]
    NonZeroDegree(VertexId),

    #[error("heap underflow: extract_min on an empty heap")]
    Underflow,

    #[error("decrease_key at heap index {index} would increase the key ({current} -> {requested})")]
    KeyIncreased {
        index:     usize,
        current:   f64,
        requested: f64,
    },

    #[error("no path from {from} to {to}")]
    NoPath { from: VertexId, to: VertexId },
}

pub type GraphResult<T> = Result<T, GraphError>;
