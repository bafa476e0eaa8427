//! Implicit link from an entry to the visit it was captured during

use lifegraph_core::{Edge, EdgeLabel, EntryView, IndexState, NodeKey, Timestamp};
use tracing::debug;

use super::{DeriveContext, DeriveInput, FacetDeriver};
use crate::collaborators::{Collaborators, TimestampGuard, VisitWindow};

pub struct VisitLinkDeriver;

impl FacetDeriver for VisitLinkDeriver {
    fn name(&self) -> &'static str {
        "implicit-visit-link"
    }

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, ctx: &DeriveContext<'_>) {
        let Some(visit) = find_visit(state, input, ctx.collaborators) else {
            return;
        };
        debug!(entry = input.ts, visit, "linked entry to enclosing visit");
        state.graph_mut().add_edges([Edge::labeled(
            NodeKey::Entry(input.ts),
            NodeKey::Entry(visit),
            EdgeLabel::Linked,
        )]);
    }
}

fn find_visit(state: &IndexState, input: &DeriveInput<'_>, collaborators: &Collaborators) -> Option<Timestamp> {
    let candidates = collaborators
        .day_index
        .day_range_entries(state, input.day)
        .into_iter()
        .filter(|&id| id != input.ts)
        .filter_map(|id| {
            let attrs = state.entry(id)?;
            EntryView::new(attrs)
                .is_visit()
                .then(|| (id, collaborators.visits.visit_window(attrs)))
        });
    select_visit(input.ts, candidates, collaborators.guard.as_ref())
}

/// First candidate, in the order given, whose window strictly contains `ts`
/// and whose departure is plausible.
pub fn select_visit<I>(ts: Timestamp, candidates: I, guard: &dyn TimestampGuard) -> Option<Timestamp>
where
    I: IntoIterator<Item = (Timestamp, VisitWindow)>,
{
    candidates
        .into_iter()
        .find(|(_, window)| window.contains(ts) && guard.is_plausible_timestamp(window.departure))
        .map(|(id, _)| id)
}
