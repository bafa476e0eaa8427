//! Calendar hierarchy: year → month → day → entry

use lifegraph_core::{Attrs, CalendarDay, Edge, EdgeLabel, IndexState, NodeKey};

use super::{DeriveContext, DeriveInput, FacetDeriver};

pub struct TimelineDeriver;

impl FacetDeriver for TimelineDeriver {
    fn name(&self) -> &'static str {
        "timeline"
    }

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, _ctx: &DeriveContext<'_>) {
        let day = input.day;
        let (year_key, month_key, day_key) = (day.year_key(), day.month_key(), day.day_key());

        let graph = state.graph_mut();
        graph.add_nodes_with_attrs([
            (year_key.clone(), calendar_attrs(&day, 1)),
            (month_key.clone(), calendar_attrs(&day, 2)),
            (day_key.clone(), calendar_attrs(&day, 3)),
        ]);
        graph.add_edges([
            Edge::unlabeled(year_key, month_key.clone()),
            Edge::unlabeled(month_key, day_key.clone()),
            Edge::labeled(day_key, NodeKey::Entry(input.ts), EdgeLabel::Date),
        ]);
    }
}

/// Identifying fields of a calendar node, down to `depth` (1 = year).
fn calendar_attrs(day: &CalendarDay, depth: usize) -> Attrs {
    let parts = [
        ("year", i64::from(day.year())),
        ("month", i64::from(day.month())),
        ("day", i64::from(day.day())),
    ];
    parts
        .into_iter()
        .take(depth)
        .map(|(field, value)| (field.to_string(), value.into()))
        .collect()
}
