//! Path reconstruction over a predecessor map.
//!
//! The map is single-valued per node, so a well-formed map yields exactly one
//! backward walk. The enumeration in [`PathFinder::all_optimal`] is still
//! written against the backward relation as a whole, so upgrading the map to
//! hold a set of equally-optimal predecessors would only touch
//! `predecessors_of`.
//!
//! A run that flagged an improving cycle can leave the map cyclic. Both
//! entry points guard against that and fail with `CyclicPredecessors`
//! instead of walking forever.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{RelaxError, Result};
use crate::graph::Graph;

use super::Mode;

/// Walks a predecessor map produced by a relaxation run.
pub struct PathFinder<'a> {
    predecessors: &'a BTreeMap<String, Option<String>>,
}

impl<'a> PathFinder<'a> {
    pub fn new(predecessors: &'a BTreeMap<String, Option<String>>) -> Self {
        Self { predecessors }
    }

    /// Walk backward from `target` to `source` and return the path
    /// source-first. `Ok(None)` means the target is unreachable: the walk
    /// hit a node with no predecessor (or a node the run never saw) before
    /// reaching the source.
    pub fn reconstruct(&self, source: &str, target: &str) -> Result<Option<Vec<String>>> {
        let mut reversed = Vec::new();
        let mut visited = HashSet::new();
        let mut current = target;

        while current != source {
            if !visited.insert(current.to_string()) {
                return Err(RelaxError::CyclicPredecessors {
                    node: current.to_string(),
                });
            }
            reversed.push(current.to_string());
            current = match self.predecessors.get(current) {
                Some(Some(prev)) => prev,
                _ => return Ok(None),
            };
        }

        reversed.push(source.to_string());
        reversed.reverse();
        Ok(Some(reversed))
    }

    /// Enumerate every distinct source-to-target sequence consistent with
    /// the predecessor relation, deduplicated, source-first. Empty when no
    /// backward walk reaches the source.
    ///
    /// With today's single-valued map this returns at most one path, the
    /// same one `reconstruct` finds.
    pub fn all_optimal(&self, source: &str, target: &str) -> Result<Vec<Vec<String>>> {
        let mut found = BTreeSet::new();
        let mut suffix = vec![target.to_string()];
        // Any simple path fits in |V| nodes; needing more means the map
        // loops.
        let budget = self.predecessors.len().max(1);
        self.explore(source, target, &mut suffix, budget, &mut found)?;
        Ok(found.into_iter().collect())
    }

    fn explore(
        &self,
        source: &str,
        node: &str,
        suffix: &mut Vec<String>,
        budget: usize,
        found: &mut BTreeSet<Vec<String>>,
    ) -> Result<()> {
        if node == source {
            let mut path = suffix.clone();
            path.reverse();
            found.insert(path);
            return Ok(());
        }
        if budget == 0 {
            return Err(RelaxError::CyclicPredecessors {
                node: node.to_string(),
            });
        }
        for prev in self.predecessors_of(node) {
            suffix.push(prev.to_string());
            self.explore(source, prev, suffix, budget - 1, found)?;
            suffix.pop();
        }
        Ok(())
    }

    fn predecessors_of(&self, node: &str) -> impl Iterator<Item = &str> {
        self.predecessors
            .get(node)
            .and_then(|p| p.as_deref())
            .into_iter()
    }
}

/// Total weight along consecutive pairs of `path`, using the best declared
/// edge per hop. `None` if some hop has no declared edge.
pub fn path_cost(graph: &Graph, mode: Mode, path: &[String]) -> Option<f64> {
    let mut total = 0.0;
    for pair in path.windows(2) {
        total += graph.weight_between(&pair[0], &pair[1], mode)?;
    }
    Some(total)
}
