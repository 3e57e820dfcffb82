//! Per-pass relaxation traces.
//!
//! The engine computes eagerly; playback is the caller's business. A record
//! is emitted once per executed pass (even a pass that changed nothing) and
//! is immutable after emission.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Value;

/// One improving relaxation: edge `from → to` with `weight` moved the
/// target's value from `previous` to `current`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeUpdate {
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub previous: Value,
    pub current: Value,
}

/// Everything that happened during one pass over the edge list.
///
/// `values` is the full value map as it stood at the end of the pass;
/// `updates` are in edge-scan order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// 1-based pass index.
    pub pass: usize,
    pub values: BTreeMap<String, Value>,
    pub updates: Vec<EdgeUpdate>,
}

impl TraceRecord {
    pub fn changed(&self) -> bool {
        !self.updates.is_empty()
    }
}

/// Where the engine sends trace records. Emission order is pass order; the
/// engine does not care whether records are collected, streamed or dropped.
pub trait TraceSink {
    fn record(&mut self, record: TraceRecord);
}

impl TraceSink for Vec<TraceRecord> {
    fn record(&mut self, record: TraceRecord) {
        self.push(record);
    }
}

/// Sink for callers that only want the final result.
pub struct DiscardTrace;

impl TraceSink for DiscardTrace {
    fn record(&mut self, _record: TraceRecord) {}
}
