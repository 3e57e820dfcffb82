//! The solver.
//!
//! Responsible for:
//! - Running the Bellman-Ford relaxation loop (minimize or maximize) and
//!   detecting improving cycles
//! - Emitting a replayable per-pass trace through a caller-supplied sink
//! - Reconstructing paths from the predecessor map

mod paths;
mod relax;
mod trace;

pub use paths::{path_cost, PathFinder};
pub use relax::{Mode, RelaxationEngine, Run, Value};
pub use trace::{DiscardTrace, EdgeUpdate, TraceRecord, TraceSink};
