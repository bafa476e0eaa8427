//! Activity and consumption facets: container → type node, type → entry

use lifegraph_core::{Attrs, Container, Edge, EdgeLabel, IndexState, NodeKey, Timestamp};
use serde_json::Value;

use super::{value_key, DeriveContext, DeriveInput, FacetDeriver};

pub struct ActivityDeriver;

impl FacetDeriver for ActivityDeriver {
    fn name(&self) -> &'static str {
        "activity"
    }

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, _ctx: &DeriveContext<'_>) {
        if let Some(activity) = input.entry.activity() {
            categorize(
                state,
                input.ts,
                Container::Activities,
                NodeKey::Activity(value_key(activity)),
                activity,
            );
        }
    }
}

pub struct ConsumptionDeriver;

impl FacetDeriver for ConsumptionDeriver {
    fn name(&self) -> &'static str {
        "consumption"
    }

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, _ctx: &DeriveContext<'_>) {
        if let Some(consumption) = input.entry.consumption() {
            categorize(
                state,
                input.ts,
                Container::ConsumptionTypes,
                NodeKey::Consumption(value_key(consumption)),
                consumption,
            );
        }
    }
}

fn categorize(state: &mut IndexState, ts: Timestamp, container: Container, key: NodeKey, value: &Value) {
    let container_key = NodeKey::Container(container);
    let mut attrs = Attrs::new();
    attrs.insert("val".to_string(), value.clone());

    let graph = state.graph_mut();
    graph.add_nodes_with_attrs([(container_key.clone(), container.attrs()), (key.clone(), attrs)]);
    graph.add_edges([
        Edge::unlabeled(container_key, key.clone()),
        Edge::labeled(key, NodeKey::Entry(ts), EdgeLabel::Contains),
    ]);
}
