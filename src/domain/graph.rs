//! Subject dependency graph
//!
//! Directed graph over subject names with cycle-safe edge insertion and a
//! deterministic topological study path. Uses petgraph for graph storage and
//! cycle checks.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Adding dependency would create a cycle: {0} -> {1}")]
    CycleDetected(String, String),

    #[error("Subject cannot depend on itself: {0}")]
    SelfDependency(String),

    #[error("Dependency graph contains a cycle")]
    Inconsistent,
}

/// Dependency graph over subjects
///
/// Nodes are materialized on first appearance in an edge; a subject with no
/// edges does not participate in the study path.
#[derive(Debug, Default)]
pub struct SubjectGraph {
    /// Edge `prerequisite -> dependent` means the prerequisite is studied first
    graph: DiGraph<String, ()>,

    /// Map from subject name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl SubjectGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, subject: &str) -> NodeIndex {
        if let Some(idx) = self.node_map.get(subject) {
            return *idx;
        }
        let idx = self.graph.add_node(subject.to_string());
        self.node_map.insert(subject.to_string(), idx);
        idx
    }

    /// Adds the edge `prerequisite -> dependent`.
    ///
    /// Returns `Ok(true)` if the edge was inserted, `Ok(false)` if it already
    /// existed (a no-op, not an error). Rejects self-loops and any edge that
    /// would create a cycle, leaving the graph unchanged.
    pub fn add_dependency(
        &mut self,
        prerequisite: &str,
        dependent: &str,
    ) -> Result<bool, GraphError> {
        if prerequisite == dependent {
            return Err(GraphError::SelfDependency(prerequisite.to_string()));
        }

        let pre_idx = self.node(prerequisite);
        let dep_idx = self.node(dependent);

        if self.graph.find_edge(pre_idx, dep_idx).is_some() {
            return Ok(false);
        }

        let edge = self.graph.add_edge(pre_idx, dep_idx, ());
        if is_cyclic_directed(&self.graph) {
            self.graph.remove_edge(edge);
            return Err(GraphError::CycleDetected(
                prerequisite.to_string(),
                dependent.to_string(),
            ));
        }

        Ok(true)
    }

    /// Removes the edge `prerequisite -> dependent`, returning whether it existed
    pub fn remove_dependency(&mut self, prerequisite: &str, dependent: &str) -> bool {
        let (Some(pre_idx), Some(dep_idx)) = (
            self.node_map.get(prerequisite),
            self.node_map.get(dependent),
        ) else {
            return false;
        };

        match self.graph.find_edge(*pre_idx, *dep_idx) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    /// Re-inserts an edge removed by undo.
    ///
    /// Skips the cycle check: the graph was acyclic when this exact edge was
    /// last present and has not been mutated since the matching undo.
    pub(crate) fn restore_dependency(&mut self, prerequisite: &str, dependent: &str) {
        let pre_idx = self.node(prerequisite);
        let dep_idx = self.node(dependent);
        if self.graph.find_edge(pre_idx, dep_idx).is_none() {
            self.graph.add_edge(pre_idx, dep_idx, ());
        }
    }

    /// Returns true if the edge `prerequisite -> dependent` exists
    pub fn contains_dependency(&self, prerequisite: &str, dependent: &str) -> bool {
        match (
            self.node_map.get(prerequisite),
            self.node_map.get(dependent),
        ) {
            (Some(pre), Some(dep)) => self.graph.find_edge(*pre, *dep).is_some(),
            _ => false,
        }
    }

    /// Returns the number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Computes the study path: a topological ordering of every subject that
    /// participates in at least one edge.
    ///
    /// Kahn's algorithm with alphabetical selection among zero-in-degree
    /// subjects, so the result is reproducible for identical inputs. Returns
    /// an empty path when no edges exist. Insertion keeps the graph acyclic,
    /// but the query re-verifies and reports `Inconsistent` rather than
    /// returning a truncated ordering.
    pub fn study_path(&self) -> Result<Vec<String>, GraphError> {
        let participating: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_undirected(idx).next().is_some())
            .collect();

        if participating.is_empty() {
            return Ok(Vec::new());
        }

        let mut in_degree: HashMap<NodeIndex, usize> = participating
            .iter()
            .map(|&idx| {
                (
                    idx,
                    self.graph.neighbors_directed(idx, Direction::Incoming).count(),
                )
            })
            .collect();

        // Min-heap on subject name for the alphabetical tie-break
        let mut ready: BinaryHeap<Reverse<(String, NodeIndex)>> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&idx, _)| Reverse((self.graph[idx].clone(), idx)))
            .collect();

        let mut path = Vec::with_capacity(participating.len());
        while let Some(Reverse((name, idx))) = ready.pop() {
            path.push(name);
            for next in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse((self.graph[next].clone(), next)));
                    }
                }
            }
        }

        if path.len() != participating.len() {
            return Err(GraphError::Inconsistent);
        }

        Ok(path)
    }
}
