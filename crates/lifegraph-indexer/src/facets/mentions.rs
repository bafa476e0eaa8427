//! Mention facet: same shape as hashtags, single container

use lifegraph_core::{Attrs, Container, Edge, EdgeLabel, IndexState, NodeKey};

use super::{facet_name, DeriveContext, DeriveInput, FacetDeriver};

pub struct MentionDeriver;

impl FacetDeriver for MentionDeriver {
    fn name(&self) -> &'static str {
        "mentions"
    }

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, _ctx: &DeriveContext<'_>) {
        let mentions = input.entry.mentions();
        if mentions.is_empty() {
            return;
        }
        let container_key = NodeKey::Container(Container::Mentions);
        let graph = state.graph_mut();
        graph.add_nodes_with_attrs([(container_key.clone(), Container::Mentions.attrs())]);

        for raw in mentions {
            let Some(name) = facet_name(raw, '@') else {
                continue;
            };
            let key = NodeKey::Mention(name);
            let mut attrs = Attrs::new();
            attrs.insert("val".to_string(), raw.trim().into());
            graph.add_nodes_with_attrs([(key.clone(), attrs)]);
            graph.add_edges([
                Edge::labeled(key.clone(), NodeKey::Entry(input.ts), EdgeLabel::Contains),
                Edge::labeled(container_key.clone(), key, EdgeLabel::Is),
            ]);
        }
    }
}
