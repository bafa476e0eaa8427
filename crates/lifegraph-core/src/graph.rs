//! Graph store wrapping petgraph::StableDiGraph, addressed by content-derived keys

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::model::*;

/// Labeled directed multigraph of entries and their derived index nodes.
///
/// Edges are a set: re-inserting an existing `(source, target, label)` is a
/// no-op. Removing a node drops every incident edge with it.
#[derive(Clone)]
pub struct Graph {
    inner: StableDiGraph<GraphNode, Option<EdgeLabel>>,
    index: HashMap<NodeKey, NodeIndex>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Ensure each key exists. Existing attributes are left alone.
    pub fn add_nodes<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = NodeKey>,
    {
        for key in keys {
            let idx = self.slot(&key);
            self.inner[idx].placeholder = false;
        }
    }

    /// Create each node, or overwrite its attributes if it already exists.
    pub fn add_nodes_with_attrs<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = (NodeKey, Attrs)>,
    {
        for (key, attrs) in nodes {
            let idx = self.slot(&key);
            let node = &mut self.inner[idx];
            node.attrs = attrs;
            node.placeholder = false;
        }
    }

    /// Insert edges. Missing endpoints get a placeholder node so the edge can
    /// be recorded before its target is indexed.
    pub fn add_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = Edge>,
    {
        for edge in edges {
            let source = self.slot(&edge.source);
            let target = self.slot(&edge.target);
            if self.find_edge_index(source, target, edge.label).is_none() {
                self.inner.add_edge(source, target, edge.label);
            }
        }
    }

    /// Whether a node with this key has been inserted (placeholders excluded).
    pub fn has_node(&self, key: &NodeKey) -> bool {
        self.materialized(key).is_some()
    }

    /// Attributes of a node, or `None` if it does not exist.
    pub fn attrs(&self, key: &NodeKey) -> Option<&Attrs> {
        self.materialized(key).map(|idx| &self.inner[idx].attrs)
    }

    /// Whether the exact edge is present.
    pub fn has_edge(&self, edge: &Edge) -> bool {
        match (self.index.get(&edge.source), self.index.get(&edge.target)) {
            (Some(&source), Some(&target)) => {
                self.find_edge_index(source, target, edge.label).is_some()
            }
            _ => false,
        }
    }

    /// All edges matching the filter. Anchored on the source or target node
    /// when the filter names one, otherwise a full scan.
    pub fn find_edges(&self, filter: &EdgeFilter) -> Vec<Edge> {
        let anchor = match (&filter.source, &filter.target) {
            (Some(source), _) => Some((source, Direction::Outgoing)),
            (None, Some(target)) => Some((target, Direction::Incoming)),
            (None, None) => None,
        };

        let candidates: Vec<EdgeIndex> = match anchor {
            Some((key, direction)) => match self.index.get(key) {
                Some(&idx) => self
                    .inner
                    .edges_directed(idx, direction)
                    .map(|edge_ref| edge_ref.id())
                    .collect(),
                None => return Vec::new(),
            },
            None => self.inner.edge_indices().collect(),
        };

        candidates
            .into_iter()
            .filter_map(|id| self.edge(id))
            .filter(|edge| filter.matches(edge))
            .collect()
    }

    /// Number of edges matching the filter.
    pub fn count_edges(&self, filter: &EdgeFilter) -> usize {
        self.find_edges(filter).len()
    }

    /// Remove nodes and all their incident edges. Unknown keys and
    /// placeholders are ignored. Returns the removed nodes.
    pub fn remove_nodes<I>(&mut self, keys: I) -> Vec<GraphNode>
    where
        I: IntoIterator<Item = NodeKey>,
    {
        let mut removed = Vec::new();
        for key in keys {
            let Some(idx) = self.materialized(&key) else {
                continue;
            };
            let neighbors: Vec<NodeIndex> = self.inner.neighbors_undirected(idx).collect();
            self.index.remove(&key);
            if let Some(node) = self.inner.remove_node(idx) {
                removed.push(node);
            }
            for neighbor in neighbors {
                self.prune_placeholder(neighbor);
            }
        }
        removed
    }

    /// Number of inserted nodes (placeholders excluded).
    pub fn node_count(&self) -> usize {
        self.all_nodes().count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all inserted nodes.
    pub fn all_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
            .filter(|node| !node.placeholder)
    }

    /// Iterate over all edges.
    pub fn all_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.inner.edge_indices().filter_map(move |id| self.edge(id))
    }

    /// Keys of all inserted nodes of one kind.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &NodeKey> {
        self.all_nodes()
            .map(|node| &node.key)
            .filter(move |key| key.kind() == kind)
    }

    fn materialized(&self, key: &NodeKey) -> Option<NodeIndex> {
        self.index
            .get(key)
            .copied()
            .filter(|&idx| self.inner.node_weight(idx).is_some_and(|n| !n.placeholder))
    }

    /// Index of the node for `key`, creating a placeholder if absent.
    fn slot(&mut self, key: &NodeKey) -> NodeIndex {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.inner.add_node(GraphNode {
            key: key.clone(),
            attrs: Attrs::new(),
            placeholder: true,
        });
        self.index.insert(key.clone(), idx);
        idx
    }

    fn find_edge_index(
        &self,
        source: NodeIndex,
        target: NodeIndex,
        label: Option<EdgeLabel>,
    ) -> Option<EdgeIndex> {
        self.inner
            .edges_directed(source, Direction::Outgoing)
            .filter(|edge_ref| *edge_ref.weight() == label)
            .map(|edge_ref| edge_ref.id())
            .find(|&id| {
                self.inner
                    .edge_endpoints(id)
                    .is_some_and(|(_, t)| t == target)
            })
    }

    fn edge(&self, id: EdgeIndex) -> Option<Edge> {
        let (source, target) = self.inner.edge_endpoints(id)?;
        let label = *self.inner.edge_weight(id)?;
        Some(Edge {
            source: self.inner.node_weight(source)?.key.clone(),
            target: self.inner.node_weight(target)?.key.clone(),
            label,
        })
    }

    /// Drop a placeholder once nothing points at it any more.
    fn prune_placeholder(&mut self, idx: NodeIndex) {
        let Some(node) = self.inner.node_weight(idx) else {
            return;
        };
        if !node.placeholder || self.inner.neighbors_undirected(idx).next().is_some() {
            return;
        }
        let key = node.key.clone();
        self.inner.remove_node(idx);
        self.index.remove(&key);
        tracing::trace!(node = %key, "dropped unreferenced placeholder");
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
