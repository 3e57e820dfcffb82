//! Graph construction.
//!
//! A directed weighted multigraph over string node labels. Edges keep their
//! insertion order, which is also the scan order of every relaxation pass.
//! Reordering edges changes which predecessor wins a tie, so the order is
//! part of the graph's identity, not an implementation detail.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::info;

use crate::solver::Mode;

/// One directed edge in declared order, resolved back to labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub weight: f64,
}

/// The relaxation graph.
///
/// Backed by a petgraph `DiGraph` with label↔index maps on the side, so the
/// solver can scan raw indices while callers speak in labels. Parallel edges
/// and self-loops are stored as-is; the relaxation rule decides whether they
/// ever matter.
pub struct Graph {
    graph: DiGraph<String, f64>,
    label_to_node: HashMap<String, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            label_to_node: HashMap::new(),
        }
    }

    /// Register a node. Idempotent: re-adding an existing label is a no-op.
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeIndex {
        self.get_or_create_node(label.into())
    }

    /// Append one directed edge. Endpoints are registered on first sight, so
    /// an edge list alone is enough to describe a graph.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>, weight: f64) {
        let a = self.get_or_create_node(from.into());
        let b = self.get_or_create_node(to.into());
        self.graph.add_edge(a, b, weight);
    }

    fn get_or_create_node(&mut self, label: String) -> NodeIndex {
        if let Some(&node) = self.label_to_node.get(&label) {
            return node;
        }
        let node = self.graph.add_node(label.clone());
        self.label_to_node.insert(label, node);
        node
    }

    pub fn contains(&self, label: &str) -> bool {
        self.label_to_node.contains_key(label)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node labels in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges in declared order. This is the per-pass scan order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.graph.edge_references().map(|e| Edge {
            from: self.graph[e.source()].as_str(),
            to: self.graph[e.target()].as_str(),
            weight: *e.weight(),
        })
    }

    /// Best declared weight between an ordered pair, under the given mode.
    ///
    /// With parallel edges the relaxation only ever commits the improving
    /// one, so path-cost accounting picks the minimum (or maximum) weight.
    pub fn weight_between(&self, from: &str, to: &str, mode: Mode) -> Option<f64> {
        let mut best: Option<f64> = None;
        for edge in self.edges() {
            if edge.from != from || edge.to != to {
                continue;
            }
            best = Some(match best {
                None => edge.weight,
                Some(b) => match mode {
                    Mode::Minimize => b.min(edge.weight),
                    Mode::Maximize => b.max(edge.weight),
                },
            });
        }
        best
    }

    pub fn log_summary(&self) {
        info!(
            "Graph built: {} nodes, {} edges",
            self.node_count(),
            self.edge_count()
        );
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
