//! Graph description files.
//!
//! A run is described by a small TOML document: the node set, the edge list
//! in relaxation-scan order, a source node, an optional target, and the
//! optimization mode. Edge order in the file is preserved all the way into
//! the engine.
//!
//! ```toml
//! nodes = ["x1", "x2", "x3"]
//! source = "x1"
//! target = "x3"
//! mode = "minimize"
//!
//! [[edges]]
//! from = "x1"
//! to = "x2"
//! weight = 5.0
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{RelaxError, Result};
use crate::graph::Graph;
use crate::solver::Mode;

/// One edge entry in a description file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

/// A complete graph description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub mode: Mode,
}

impl GraphSpec {
    /// Load a description from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a description from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let spec: Self = toml::from_str(content)?;
        Ok(spec)
    }

    /// Save the description to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check the description for internal consistency.
    ///
    /// The graph layer would happily auto-register undeclared endpoints, but
    /// in a description file an undeclared label is almost always a typo, so
    /// it is rejected here.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(RelaxError::Description("node list is empty".to_string()));
        }
        if !self.nodes.contains(&self.source) {
            return Err(RelaxError::InvalidSource {
                label: self.source.clone(),
            });
        }
        if let Some(target) = &self.target {
            if !self.nodes.contains(target) {
                return Err(RelaxError::Description(format!(
                    "target '{target}' is not a declared node"
                )));
            }
        }
        for edge in &self.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !self.nodes.contains(endpoint) {
                    return Err(RelaxError::Description(format!(
                        "edge {} → {} references undeclared node '{endpoint}'",
                        edge.from, edge.to
                    )));
                }
            }
            if !edge.weight.is_finite() {
                return Err(RelaxError::Description(format!(
                    "edge {} → {} has non-finite weight",
                    edge.from, edge.to
                )));
            }
        }
        Ok(())
    }

    /// Build the relaxation graph: nodes in declared order, then edges in
    /// declared order.
    pub fn build(&self) -> Graph {
        let mut graph = Graph::new();
        for node in &self.nodes {
            graph.add_node(node.clone());
        }
        for edge in &self.edges {
            graph.add_edge(edge.from.clone(), edge.to.clone(), edge.weight);
        }
        graph
    }
}
