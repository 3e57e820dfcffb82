//! Crate-level error taxonomy.
//!
//! A detected improving cycle is deliberately NOT in here: the engine reports
//! it as a boolean on [`Run`](crate::solver::Run) because it is an answer,
//! not a failure. Only conditions that abort an operation are errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelaxError {
    /// The requested source node is not part of the graph. Fatal to the run;
    /// nothing is computed.
    // The field cannot be called `source`: thiserror reserves that name for
    // an error cause.
    #[error("source node '{label}' is not in the graph")]
    InvalidSource { label: String },

    /// The predecessor map loops back on itself. Only possible when the
    /// engine flagged an improving cycle and a path reconstruction was
    /// attempted anyway. Fatal to path reconstruction; the engine's run
    /// result remains inspectable.
    #[error("predecessor chain revisits '{node}' (improving cycle in the map)")]
    CyclicPredecessors { node: String },

    /// Problem with a graph description file.
    #[error("invalid graph description: {0}")]
    Description(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, RelaxError>;
