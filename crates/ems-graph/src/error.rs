//! Graph-subsystem error type.

use thiserror::Error;

use ems_core::LocationId;

/// Errors produced by `ems-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A location ID outside the map was referenced.
    #[error("location {0} not found in city graph")]
    InvalidLocation(LocationId),

    /// A malformed edge weight (negative entry, or a self-loop weight).
    #[error("invalid weight {weight} for road ({u}, {v})")]
    InvalidWeight { u: LocationId, v: LocationId, weight: i64 },

    /// No path exists between two locations.  Callers must recover locally
    /// (exclude the pair from assignment); this is never fatal to a run.
    #[error("no route from {from} to {to}")]
    Unreachable { from: LocationId, to: LocationId },

    /// Malformed map data at construction time (asymmetric or non-square
    /// matrix, dangling IDs).  Fatal: raised before any simulation tick runs.
    #[error("malformed map: {0}")]
    MalformedMap(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
