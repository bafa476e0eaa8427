//! Read-side lookups over an index state

use std::collections::BTreeSet;

use lifegraph_core::{CalendarDay, Container, Edge, EdgeFilter, EdgeLabel, IndexState, NodeKey, NodeKind, Timestamp};
use serde::Serialize;

use crate::facets::facet_name;
use crate::gc::COLLECTIBLE_KINDS;

/// A facet node with how many entries carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub key: NodeKey,
    /// Display text (original casing) where recorded.
    pub label: String,
    pub entries: usize,
}

/// Entries carrying the facet, oldest first.
pub fn entries_for_facet(state: &IndexState, facet: &NodeKey) -> Vec<Timestamp> {
    let found: BTreeSet<Timestamp> = state
        .graph()
        .find_edges(&EdgeFilter::outgoing(facet.clone()).labeled(EdgeLabel::Contains))
        .into_iter()
        .filter_map(|edge| edge.target.as_entry())
        .collect();
    found.into_iter().collect()
}

/// Entries tagged with `tag` (any casing, `#` optional), public or private.
pub fn entries_for_tag(state: &IndexState, tag: &str) -> Vec<Timestamp> {
    let Some(name) = facet_name(tag, '#') else {
        return Vec::new();
    };
    let mut found: BTreeSet<Timestamp> = entries_for_facet(state, &NodeKey::Tag(name.clone())).into_iter().collect();
    found.extend(entries_for_facet(state, &NodeKey::PrivateTag(name)));
    found.into_iter().collect()
}

/// Entries mentioning `mention` (any casing, `@` optional).
pub fn entries_for_mention(state: &IndexState, mention: &str) -> Vec<Timestamp> {
    facet_name(mention, '@')
        .map(|name| entries_for_facet(state, &NodeKey::Mention(name)))
        .unwrap_or_default()
}

/// Facets grouped under a container with their usage, most used first.
pub fn facet_counts(state: &IndexState, container: Container) -> Vec<FacetCount> {
    let graph = state.graph();
    let mut counts: Vec<FacetCount> = graph
        .find_edges(&EdgeFilter::outgoing(NodeKey::Container(container)))
        .into_iter()
        .map(|edge| {
            let label = graph
                .attrs(&edge.target)
                .and_then(|attrs| attrs.get("val"))
                .map(|val| match val.as_str() {
                    Some(s) => s.to_string(),
                    None => val.to_string(),
                })
                .unwrap_or_else(|| edge.target.to_string());
            FacetCount {
                entries: entries_for_facet(state, &edge.target).len(),
                key: edge.target,
                label,
            }
        })
        .collect();
    counts.sort_by(|a, b| b.entries.cmp(&a.entries).then_with(|| a.key.cmp(&b.key)));
    counts
}

/// Entries dated on `day`, found through the calendar tree.
pub fn entries_on_day(state: &IndexState, day: CalendarDay) -> Vec<Timestamp> {
    entries_via(state, EdgeFilter::outgoing(day.day_key()).labeled(EdgeLabel::Date), |e| e.target)
}

/// Comments whose parent is `ts`, oldest first.
pub fn comments_for(state: &IndexState, ts: Timestamp) -> Vec<Timestamp> {
    entries_via(state, EdgeFilter::incoming(NodeKey::Entry(ts)).labeled(EdgeLabel::Comment), |e| e.source)
}

/// Entries `ts` links to, explicitly or through a visit.
pub fn links_from(state: &IndexState, ts: Timestamp) -> Vec<Timestamp> {
    entries_via(state, EdgeFilter::outgoing(NodeKey::Entry(ts)).labeled(EdgeLabel::Linked), |e| e.target)
}

/// The `n` newest entries, newest first.
pub fn latest(state: &IndexState, n: usize) -> Vec<Timestamp> {
    state.chrono().latest(n)
}

fn entries_via(
    state: &IndexState,
    filter: EdgeFilter,
    end: impl Fn(Edge) -> NodeKey,
) -> Vec<Timestamp> {
    let found: BTreeSet<Timestamp> = state
        .graph()
        .find_edges(&filter)
        .into_iter()
        .map(end)
        .filter(|key| state.graph().has_node(key))
        .filter_map(|key| key.as_entry())
        .collect();
    found.into_iter().collect()
}

/// A broken index invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Violation {
    /// A tag or mention node with no entry carrying it.
    OrphanFacet(NodeKey),
    /// An entry node missing from the chronological index.
    UnindexedEntry(Timestamp),
    /// A chronological index timestamp with no entry node.
    StaleTimestamp(Timestamp),
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::OrphanFacet(key) => write!(f, "orphan facet {}", key),
            Violation::UnindexedEntry(ts) => write!(f, "entry {} missing from chronological index", ts),
            Violation::StaleTimestamp(ts) => write!(f, "chronological index holds {} with no entry", ts),
        }
    }
}

/// Check the orphan and chronological-mirror invariants.
pub fn check_invariants(state: &IndexState) -> Vec<Violation> {
    let graph = state.graph();
    let mut violations = Vec::new();

    for kind in COLLECTIBLE_KINDS {
        for key in graph.nodes_of_kind(kind) {
            if graph.count_edges(&EdgeFilter::outgoing(key.clone()).labeled(EdgeLabel::Contains)) == 0 {
                violations.push(Violation::OrphanFacet(key.clone()));
            }
        }
    }

    let entries: BTreeSet<Timestamp> = graph
        .nodes_of_kind(NodeKind::Entry)
        .filter_map(NodeKey::as_entry)
        .collect();
    let indexed: BTreeSet<Timestamp> = state.chrono().iter().collect();
    violations.extend(entries.difference(&indexed).copied().map(Violation::UnindexedEntry));
    violations.extend(indexed.difference(&entries).copied().map(Violation::StaleTimestamp));
    violations
}
