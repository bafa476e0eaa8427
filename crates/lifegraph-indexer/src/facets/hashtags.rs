//! Hashtag facet: tag → entry `CONTAINS`, container → tag `IS`

use lifegraph_core::{Attrs, Container, Edge, EdgeLabel, IndexState, NodeKey};
use tracing::debug;

use super::{facet_name, DeriveContext, DeriveInput, FacetDeriver};

pub struct HashtagDeriver;

impl FacetDeriver for HashtagDeriver {
    fn name(&self) -> &'static str {
        "hashtags"
    }

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, ctx: &DeriveContext<'_>) {
        let tags: Vec<(String, &str)> = input
            .entry
            .tags()
            .into_iter()
            .filter_map(|raw| facet_name(raw, '#').map(|name| (name, raw)))
            .collect();
        if tags.is_empty() {
            return;
        }

        // Privacy is decided per entry: one private tag routes all of them.
        let private = tags.iter().any(|(name, _)| ctx.private_tags.contains(name));
        let container = if private {
            Container::PrivateHashtags
        } else {
            Container::Hashtags
        };
        let container_key = NodeKey::Container(container);

        let graph = state.graph_mut();
        graph.add_nodes_with_attrs([(container_key.clone(), container.attrs())]);

        for (name, raw) in tags {
            let key = if private {
                NodeKey::PrivateTag(name)
            } else {
                NodeKey::Tag(name)
            };
            let mut attrs = Attrs::new();
            attrs.insert("val".to_string(), raw.trim().into());
            graph.add_nodes_with_attrs([(key.clone(), attrs)]);
            graph.add_edges([
                Edge::labeled(key.clone(), NodeKey::Entry(input.ts), EdgeLabel::Contains),
                Edge::labeled(container_key.clone(), key, EdgeLabel::Is),
            ]);
        }
        debug!(entry = input.ts, private, "derived hashtags");
    }
}
