//! Bellman-Ford relaxation over small directed weighted graphs.
//!
//! The crate computes shortest (MINIMIZE) or longest (MAXIMIZE) distances
//! from a source node, flags improving cycles instead of looping on them,
//! records a replayable trace of every relaxation per pass, and
//! reconstructs optimal paths from the resulting predecessor map.
//!
//! Everything runs eagerly on the calling thread; the trace is complete
//! before the caller sees the result, so playback is purely a presentation
//! concern.

pub mod config;
pub mod error;
pub mod graph;
pub mod solver;

pub use config::{EdgeSpec, GraphSpec};
pub use error::{RelaxError, Result};
pub use graph::Graph;
pub use solver::{
    DiscardTrace, EdgeUpdate, Mode, PathFinder, RelaxationEngine, Run, TraceRecord, TraceSink,
    Value,
};
