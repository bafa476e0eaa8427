//! Entry-to-entry references: explicit `LINKED` and comment `COMMENT` edges

use lifegraph_core::{Edge, EdgeLabel, IndexState, NodeKey};
use tracing::warn;

use super::{DeriveContext, DeriveInput, FacetDeriver};

/// One `LINKED` edge per listed id whose entry exists, the entry itself
/// included. Missing targets are logged and skipped.
pub struct ExplicitLinkDeriver;

impl FacetDeriver for ExplicitLinkDeriver {
    fn name(&self) -> &'static str {
        "explicit-link"
    }

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, _ctx: &DeriveContext<'_>) {
        for target in input.entry.linked_entries() {
            let target_key = NodeKey::Entry(target);
            if !state.graph().has_node(&target_key) {
                warn!(entry = input.ts, target, "linked entry does not exist, skipping link");
                continue;
            }
            state.graph_mut().add_edges([Edge::labeled(
                NodeKey::Entry(input.ts),
                target_key,
                EdgeLabel::Linked,
            )]);
        }
    }
}

/// `COMMENT` edge to the declared parent. The parent need not exist yet; the
/// edge becomes traversable once it is indexed.
pub struct ParentReferenceDeriver;

impl FacetDeriver for ParentReferenceDeriver {
    fn name(&self) -> &'static str {
        "parent-reference"
    }

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, _ctx: &DeriveContext<'_>) {
        if let Some(parent) = input.entry.comment_for() {
            state.graph_mut().add_edges([Edge::labeled(
                NodeKey::Entry(input.ts),
                NodeKey::Entry(parent),
                EdgeLabel::Comment,
            )]);
        }
    }
}
