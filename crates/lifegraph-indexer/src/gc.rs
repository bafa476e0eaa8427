//! Entry removal and orphan sweep

use lifegraph_core::{Attrs, EdgeFilter, EdgeLabel, EntryView, Graph, IndexState, NodeKey, NodeKind, Timestamp};
use tracing::debug;

use crate::facets::facet_name;

/// Facet kinds the sweep reclaims. Activity, consumption and calendar nodes
/// are never collected and accumulate for the life of the index.
pub const COLLECTIBLE_KINDS: [NodeKind; 3] = [NodeKind::Tag, NodeKind::PrivateTag, NodeKind::Mention];

pub fn is_collectible(kind: NodeKind) -> bool {
    COLLECTIBLE_KINDS.contains(&kind)
}

/// Remove the entry at `ts` and reclaim any tag or mention node left without
/// a `CONTAINS` edge. Returns the removed attributes, or `None` (and leaves
/// the state untouched) if no entry exists there.
pub fn remove_node(state: &mut IndexState, ts: Timestamp) -> Option<Attrs> {
    let entry_key = NodeKey::Entry(ts);
    if !state.graph().has_node(&entry_key) {
        return None;
    }

    // Facets actually attached right now, in addition to those the stored
    // fields name.
    let attached: Vec<NodeKey> = state
        .graph()
        .find_edges(&EdgeFilter::incoming(entry_key).labeled(EdgeLabel::Contains))
        .into_iter()
        .map(|edge| edge.source)
        .filter(|key| is_collectible(key.kind()))
        .collect();

    let attrs = state.remove_entry(ts)?;
    let mut candidates = facet_keys(&attrs);
    candidates.extend(attached);
    let swept = sweep_orphans(state.graph_mut(), candidates);
    debug!(entry = ts, swept, "removed entry");
    Some(attrs)
}

/// Remove every collectible candidate that no longer has a `CONTAINS` edge.
/// Returns how many nodes were removed.
pub fn sweep_orphans<I>(graph: &mut Graph, candidates: I) -> usize
where
    I: IntoIterator<Item = NodeKey>,
{
    let mut removed = 0;
    for key in candidates {
        if !is_collectible(key.kind()) || !graph.has_node(&key) {
            continue;
        }
        let references = graph.count_edges(&EdgeFilter::outgoing(key.clone()).labeled(EdgeLabel::Contains));
        if references == 0 {
            debug!(node = %key, "reclaiming orphaned facet");
            removed += graph.remove_nodes([key]).len();
        }
    }
    removed
}

/// Tag and mention keys named by an entry's fields. Tags are checked under
/// both the public and private kind since routing depends on the whole tag set.
fn facet_keys(attrs: &Attrs) -> Vec<NodeKey> {
    let entry = EntryView::new(attrs);
    let tags = entry.tags().into_iter().filter_map(|raw| facet_name(raw, '#'));
    let mentions = entry.mentions().into_iter().filter_map(|raw| facet_name(raw, '@'));

    let mut keys = Vec::new();
    for name in tags {
        keys.push(NodeKey::Tag(name.clone()));
        keys.push(NodeKey::PrivateTag(name));
    }
    keys.extend(mentions.map(NodeKey::Mention));
    keys
}
