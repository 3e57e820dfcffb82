//! Bellman-Ford relaxation.
//!
//! One loop serves both directions: MINIMIZE relaxes toward smaller values
//! (shortest paths), MAXIMIZE toward larger ones (longest paths / maximum
//! value). The skeleton is identical; only the comparison flips.
//!
//! Determinism is load-bearing here. Edges are scanned in declared order,
//! only strict improvements commit, and an equal candidate never overwrites
//! an earlier predecessor. Two runs on the same graph produce identical
//! results and identical traces.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{RelaxError, Result};
use crate::graph::Graph;

use super::trace::{EdgeUpdate, TraceRecord, TraceSink};

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Shortest paths; unreached nodes sit at +∞.
    Minimize,
    /// Longest paths; unreached nodes sit at -∞.
    Maximize,
}

impl Mode {
    /// Does `candidate` strictly improve on `current`?
    ///
    /// An unreached value is improved by any candidate, which is exactly the
    /// `+∞ > x` / `-∞ < x` comparison the sentinel stands in for. Strict
    /// inequality only: ties keep the incumbent.
    fn improves(self, candidate: f64, current: Value) -> bool {
        match current {
            Value::Unreached => true,
            Value::Reached(v) => match self {
                Mode::Minimize => candidate < v,
                Mode::Maximize => candidate > v,
            },
        }
    }

    /// Display convention for the unreached sentinel.
    pub fn unreached_symbol(self) -> &'static str {
        match self {
            Mode::Minimize => "∞",
            Mode::Maximize => "-∞",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Minimize
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Minimize => write!(f, "MINIMIZE"),
            Mode::Maximize => write!(f, "MAXIMIZE"),
        }
    }
}

/// A node's value during and after a run.
///
/// The sentinel is an explicit variant rather than a floating-point infinity:
/// an edge whose origin is `Unreached` is never relaxed, so no arithmetic is
/// ever done on the sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Unreached,
    Reached(f64),
}

impl Value {
    pub fn is_unreached(&self) -> bool {
        matches!(self, Value::Unreached)
    }

    pub fn reached(&self) -> Option<f64> {
        match self {
            Value::Reached(v) => Some(*v),
            Value::Unreached => None,
        }
    }

    /// User-facing rendering; the sentinel becomes an infinity symbol.
    pub fn render(&self, mode: Mode) -> String {
        match self {
            Value::Reached(v) => format!("{v}"),
            Value::Unreached => mode.unreached_symbol().to_string(),
        }
    }
}

// Serialized as a plain number, with `null` for the sentinel. Keeps JSON
// exports readable and avoids IEEE infinity in the wire form.
impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Reached(v) => serializer.serialize_some(v),
            Value::Unreached => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Option::<f64>::deserialize(deserializer)? {
            Some(v) => Value::Reached(v),
            None => Value::Unreached,
        })
    }
}

/// Terminal snapshot of a relaxation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    /// Final value per node. When `cycle_detected` is set this is a single
    /// un-validated snapshot, not a fixed point.
    pub values: BTreeMap<String, Value>,
    /// Which node last produced each node's current value; `None` means the
    /// node was never improved from the source.
    pub predecessors: BTreeMap<String, Option<String>>,
    /// An improving cycle exists (negative under MINIMIZE, positive under
    /// MAXIMIZE). Not an error: callers branch on it.
    pub cycle_detected: bool,
}

impl Run {
    pub fn value(&self, node: &str) -> Option<Value> {
        self.values.get(node).copied()
    }
}

/// The relaxation engine. Borrows the graph, owns nothing else; every run
/// allocates fresh value and predecessor maps.
pub struct RelaxationEngine<'a> {
    graph: &'a Graph,
    mode: Mode,
}

impl<'a> RelaxationEngine<'a> {
    pub fn new(graph: &'a Graph, mode: Mode) -> Self {
        Self { graph, mode }
    }

    /// Run to completion from `source`, emitting one trace record per
    /// executed pass through `sink`.
    ///
    /// Up to `|V| - 1` passes, each a single scan of the edge list in
    /// declared order, with early exit once a pass changes nothing. A final
    /// detection-only scan sets the cycle flag without mutating anything and
    /// without emitting a record.
    pub fn run(&self, source: &str, sink: &mut dyn TraceSink) -> Result<Run> {
        if !self.graph.contains(source) {
            return Err(RelaxError::InvalidSource {
                label: source.to_string(),
            });
        }

        let mut values: BTreeMap<String, Value> = self
            .graph
            .nodes()
            .map(|n| (n.to_string(), Value::Unreached))
            .collect();
        let mut predecessors: BTreeMap<String, Option<String>> = self
            .graph
            .nodes()
            .map(|n| (n.to_string(), None))
            .collect();
        values.insert(source.to_string(), Value::Reached(0.0));

        let pass_limit = self.graph.node_count().saturating_sub(1);

        for pass in 1..=pass_limit {
            let mut updates = Vec::new();

            for edge in self.graph.edges() {
                // An unreached origin never relaxes anything.
                let Value::Reached(origin) = values[edge.from] else {
                    continue;
                };
                let candidate = origin + edge.weight;
                let previous = values[edge.to];
                if !self.mode.improves(candidate, previous) {
                    continue;
                }
                let current = Value::Reached(candidate);
                values.insert(edge.to.to_string(), current);
                predecessors.insert(edge.to.to_string(), Some(edge.from.to_string()));
                debug!(
                    "pass {}: {} = {} + {} = {} (was {})",
                    pass,
                    edge.to,
                    origin,
                    edge.weight,
                    candidate,
                    previous.render(self.mode)
                );
                updates.push(EdgeUpdate {
                    from: edge.from.to_string(),
                    to: edge.to.to_string(),
                    weight: edge.weight,
                    previous,
                    current,
                });
            }

            let changed = !updates.is_empty();
            sink.record(TraceRecord {
                pass,
                values: values.clone(),
                updates,
            });

            if !changed {
                debug!("pass {pass}: no updates, converged");
                break;
            }
        }

        // Detection-only scan: if any edge still improves its target after
        // the pass budget, an improving cycle exists. No mutation, no trace.
        let mut cycle_detected = false;
        for edge in self.graph.edges() {
            if let Value::Reached(origin) = values[edge.from] {
                if self.mode.improves(origin + edge.weight, values[edge.to]) {
                    cycle_detected = true;
                    break;
                }
            }
        }
        if cycle_detected {
            warn!(
                "graph contains a {} weight cycle; values are not a fixed point",
                match self.mode {
                    Mode::Minimize => "negative",
                    Mode::Maximize => "positive",
                }
            );
        }

        Ok(Run {
            values,
            predecessors,
            cycle_detected,
        })
    }

    /// `run` with the trace collected into a vector for the caller.
    pub fn run_collected(&self, source: &str) -> Result<(Run, Vec<TraceRecord>)> {
        let mut trace = Vec::new();
        let run = self.run(source, &mut trace)?;
        Ok((run, trace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six_node_graph() -> Graph {
        let mut g = Graph::new();
        for i in 1..=6 {
            g.add_node(format!("x{i}"));
        }
        g.add_edge("x1", "x2", 5.0);
        g.add_edge("x1", "x3", 3.0);
        g.add_edge("x2", "x4", 2.0);
        g.add_edge("x3", "x2", 1.0);
        g.add_edge("x3", "x4", 6.0);
        g.add_edge("x3", "x5", 7.0);
        g.add_edge("x4", "x6", 4.0);
        g.add_edge("x5", "x6", 2.0);
        g
    }

    #[test]
    fn shortest_paths_six_nodes() {
        let g = six_node_graph();
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run, _) = engine.run_collected("x1").unwrap();

        assert!(!run.cycle_detected);
        let expect = [
            ("x1", 0.0),
            ("x2", 4.0),
            ("x3", 3.0),
            ("x4", 6.0),
            ("x5", 10.0),
            ("x6", 10.0),
        ];
        for (node, dist) in expect {
            assert_eq!(run.values[node], Value::Reached(dist), "node {node}");
        }
        assert_eq!(run.predecessors["x2"], Some("x3".to_string()));
        assert_eq!(run.predecessors["x6"], Some("x4".to_string()));
        assert_eq!(run.predecessors["x1"], None);
    }

    #[test]
    fn longest_paths_six_nodes() {
        let g = six_node_graph();
        let engine = RelaxationEngine::new(&g, Mode::Maximize);
        let (run, _) = engine.run_collected("x1").unwrap();

        assert!(!run.cycle_detected);
        assert_eq!(run.values["x4"], Value::Reached(9.0));
        assert_eq!(run.values["x6"], Value::Reached(13.0));
        assert_eq!(run.predecessors["x6"], Some("x4".to_string()));
    }

    #[test]
    fn trace_replays_every_pass() {
        let g = six_node_graph();
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (_, trace) = engine.run_collected("x1").unwrap();

        // Pass 1 and 2 improve, pass 3 changes nothing and stops the loop.
        assert_eq!(trace.len(), 3);
        assert!(trace[0].changed());
        assert!(trace[1].changed());
        assert!(!trace[2].changed());
        assert_eq!(trace[0].pass, 1);
        assert_eq!(trace[2].pass, 3);

        // Within pass 1, x2 is improved twice: directly, then via x3. Both
        // updates appear in edge-scan order.
        let pass1: Vec<&EdgeUpdate> =
            trace[0].updates.iter().filter(|u| u.to == "x2").collect();
        assert_eq!(pass1.len(), 2);
        assert_eq!(pass1[0].previous, Value::Unreached);
        assert_eq!(pass1[0].current, Value::Reached(5.0));
        assert_eq!(pass1[1].previous, Value::Reached(5.0));
        assert_eq!(pass1[1].current, Value::Reached(4.0));

        // The snapshot is taken after the pass's updates.
        assert_eq!(trace[0].values["x2"], Value::Reached(4.0));
        assert_eq!(trace[1].values["x4"], Value::Reached(6.0));
    }

    #[test]
    fn pass_limit_bounds_trace_length() {
        // Two nodes: at most |V| - 1 = 1 pass, so exactly one record even
        // though the pass made updates.
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run, trace) = engine.run_collected("a").unwrap();

        assert_eq!(trace.len(), 1);
        assert_eq!(run.values["b"], Value::Reached(1.0));
        assert!(!run.cycle_detected);
    }

    #[test]
    fn negative_cycle_is_flagged_not_fatal() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("b", "c", 1.0);
        g.add_edge("c", "b", -3.0);
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run, _) = engine.run_collected("a").unwrap();

        assert!(run.cycle_detected);
    }

    #[test]
    fn positive_cycle_under_maximize() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("b", "c", 1.0);
        g.add_edge("c", "b", 3.0);
        let engine = RelaxationEngine::new(&g, Mode::Maximize);
        let run = engine.run("a", &mut crate::solver::DiscardTrace).unwrap();

        assert!(run.cycle_detected);
    }

    #[test]
    fn non_positive_weights_maximize_converges() {
        let mut g = Graph::new();
        g.add_edge("a", "b", -1.0);
        g.add_edge("b", "c", -2.0);
        g.add_edge("a", "c", -4.0);
        let engine = RelaxationEngine::new(&g, Mode::Maximize);
        let (run, _) = engine.run_collected("a").unwrap();

        assert!(!run.cycle_detected);
        assert_eq!(run.values["b"], Value::Reached(-1.0));
        assert_eq!(run.values["c"], Value::Reached(-3.0));
    }

    #[test]
    fn ties_keep_the_first_predecessor() {
        // a→b direct costs 2; a→m→b also costs 2 but is scanned later and
        // must not steal the predecessor.
        let mut g = Graph::new();
        g.add_edge("a", "b", 2.0);
        g.add_edge("a", "m", 1.0);
        g.add_edge("m", "b", 1.0);
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run, _) = engine.run_collected("a").unwrap();

        assert_eq!(run.values["b"], Value::Reached(2.0));
        assert_eq!(run.predecessors["b"], Some("a".to_string()));
    }

    #[test]
    fn unreachable_nodes_stay_at_the_sentinel() {
        let mut g = Graph::new();
        g.add_node("x1");
        g.add_node("x2");
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run, trace) = engine.run_collected("x1").unwrap();

        assert_eq!(run.values["x2"], Value::Unreached);
        assert_eq!(run.predecessors["x2"], None);
        assert!(!run.cycle_detected);
        // The single scheduled pass executes, changes nothing, and is traced.
        assert_eq!(trace.len(), 1);
        assert!(!trace[0].changed());
    }

    #[test]
    fn single_node_graph_runs_zero_passes() {
        let mut g = Graph::new();
        g.add_node("only");
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run, trace) = engine.run_collected("only").unwrap();

        assert!(trace.is_empty());
        assert_eq!(run.values["only"], Value::Reached(0.0));
        assert!(!run.cycle_detected);
    }

    #[test]
    fn self_loops_are_inert_unless_improving() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("a", "a", 2.0);
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run, _) = engine.run_collected("a").unwrap();
        assert_eq!(run.values["a"], Value::Reached(0.0));
        assert!(!run.cycle_detected);

        // A negative self-loop is itself an improving cycle.
        let mut g = Graph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("a", "a", -1.0);
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run, _) = engine.run_collected("a").unwrap();
        assert!(run.cycle_detected);
    }

    #[test]
    fn invalid_source_computes_nothing() {
        let g = six_node_graph();
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let mut trace = Vec::new();
        let err = engine.run("nope", &mut trace).unwrap_err();

        assert!(matches!(err, RelaxError::InvalidSource { .. }));
        assert_eq!(err.to_string(), "source node 'nope' is not in the graph");
        assert!(trace.is_empty());
    }

    #[test]
    fn runs_are_deterministic() {
        let g = six_node_graph();
        let engine = RelaxationEngine::new(&g, Mode::Minimize);
        let (run_a, trace_a) = engine.run_collected("x1").unwrap();
        let (run_b, trace_b) = engine.run_collected("x1").unwrap();

        assert_eq!(run_a, run_b);
        assert_eq!(trace_a, trace_b);
    }

    #[test]
    fn sentinel_renders_as_infinity() {
        assert_eq!(Value::Unreached.render(Mode::Minimize), "∞");
        assert_eq!(Value::Unreached.render(Mode::Maximize), "-∞");
        assert_eq!(Value::Reached(10.0).render(Mode::Minimize), "10");
        assert_eq!(Value::Reached(2.5).render(Mode::Minimize), "2.5");
    }
}
