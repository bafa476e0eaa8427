//! Facet derivers: each reads one entry and attaches the index nodes and
//! edges it implies

pub mod categories;
pub mod hashtags;
pub mod links;
pub mod mentions;
pub mod timeline;
pub mod visits;

use std::collections::HashSet;

use lifegraph_core::{CalendarDay, EntryView, IndexState, Timestamp};
use serde_json::Value;

use crate::collaborators::Collaborators;

/// The entry being derived from.
#[derive(Debug, Clone, Copy)]
pub struct DeriveInput<'a> {
    pub ts: Timestamp,
    pub day: CalendarDay,
    pub entry: EntryView<'a>,
}

/// Indexer-wide settings a deriver may consult.
#[derive(Debug, Clone, Copy)]
pub struct DeriveContext<'a> {
    /// Normalized private vocabulary.
    pub private_tags: &'a HashSet<String>,
    pub collaborators: &'a Collaborators,
}

/// One facet of an entry. Applying a deriver twice to the same entry yields
/// the same edge set as applying it once; an absent field is a no-op.
pub trait FacetDeriver: Send + Sync {
    fn name(&self) -> &'static str;

    fn derive(&self, state: &mut IndexState, input: &DeriveInput<'_>, ctx: &DeriveContext<'_>);
}

/// Every deriver in the order the upsert coordinator runs them.
pub fn pipeline() -> Vec<Box<dyn FacetDeriver>> {
    vec![
        Box::new(hashtags::HashtagDeriver),
        Box::new(mentions::MentionDeriver),
        Box::new(links::ExplicitLinkDeriver),
        Box::new(timeline::TimelineDeriver),
        Box::new(categories::ActivityDeriver),
        Box::new(categories::ConsumptionDeriver),
        Box::new(visits::VisitLinkDeriver),
        Box::new(links::ParentReferenceDeriver),
    ]
}

/// Identity form of a tag or mention: trimmed, leading sigil stripped,
/// lower-cased. `None` for blank input.
pub fn facet_name(raw: &str, sigil: char) -> Option<String> {
    let name = raw.trim();
    let name = name.strip_prefix(sigil).unwrap_or(name).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_lowercase())
    }
}

/// Identity form of a structured facet value such as an activity. Strings key
/// by their text; anything else by its canonical JSON.
pub fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}
