//! The index state: graph and chronological index, updated as one value

use crate::chrono_index::ChronoIndex;
use crate::graph::Graph;
use crate::model::{Attrs, NodeKey, Timestamp};

/// Whole index state threaded through every coordinator call.
///
/// Entry nodes are only created and destroyed through [`IndexState::insert_entry`]
/// and [`IndexState::remove_entry`], which touch the graph and the
/// chronological index together.
#[derive(Debug, Clone, Default)]
pub struct IndexState {
    graph: Graph,
    chrono: ChronoIndex,
}

impl IndexState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable graph access for facet derivation. Must not be used to add or
    /// remove entry nodes.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn chrono(&self) -> &ChronoIndex {
        &self.chrono
    }

    pub fn entry(&self, ts: Timestamp) -> Option<&Attrs> {
        self.graph.attrs(&NodeKey::Entry(ts))
    }

    pub fn has_entry(&self, ts: Timestamp) -> bool {
        self.graph.has_node(&NodeKey::Entry(ts))
    }

    pub fn entry_count(&self) -> usize {
        self.chrono.len()
    }

    /// Insert (or overwrite) the entry node and record its timestamp.
    pub fn insert_entry(&mut self, ts: Timestamp, attrs: Attrs) {
        self.graph.add_nodes_with_attrs([(NodeKey::Entry(ts), attrs)]);
        self.chrono.insert(ts);
    }

    /// Remove the entry node with its incident edges and forget its
    /// timestamp. Returns the removed attributes.
    pub fn remove_entry(&mut self, ts: Timestamp) -> Option<Attrs> {
        let removed = self.graph.remove_nodes([NodeKey::Entry(ts)]).pop()?;
        self.chrono.remove(ts);
        Some(removed.attrs)
    }
}
