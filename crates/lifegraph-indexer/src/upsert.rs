//! Upsert coordinator: remove-then-rebuild of one entry and its facets

use lifegraph_core::{fields, merge, Attrs, CalendarDay, EntryView, IndexError, IndexState, NodeKey, Timestamp};
use tracing::debug;

use crate::config::{IndexerConfig, UpdateMode};
use crate::facets::{DeriveContext, DeriveInput, FacetDeriver};
use crate::gc;
use crate::text;

/// Insert or merge-update the entry at `ts`.
///
/// The stored attributes become `merge(old, partial)`. All facet edges of the
/// previous version are dropped (with an orphan sweep) before the derivers
/// run again, so no edge outlives the field value it came from. Which fields
/// the derivers see is governed by [`UpdateMode`].
///
/// Fails only when `ts` cannot be placed on the calendar, and then before
/// anything is modified.
pub fn add_node(
    state: &mut IndexState,
    ts: Timestamp,
    partial: Attrs,
    config: &IndexerConfig,
    derivers: &[Box<dyn FacetDeriver>],
    ctx: &DeriveContext<'_>,
) -> Result<(), IndexError> {
    let day = CalendarDay::from_timestamp(ts)?;

    let mut merged = merge(state.graph().attrs(&NodeKey::Entry(ts)), &partial);
    merged
        .entry(fields::TIMESTAMP.to_string())
        .or_insert_with(|| ts.into());

    let replaced = gc::remove_node(state, ts).is_some();
    state.insert_entry(ts, merged.clone());

    let source = match config.update_mode {
        UpdateMode::Replace => partial,
        UpdateMode::Additive => merged,
    };
    // Inline text facets feed derivation only; the stored entry keeps the
    // caller's fields.
    let source = if config.extract_text_facets {
        text::with_text_facets(source)
    } else {
        source
    };
    let input = DeriveInput {
        ts,
        day,
        entry: EntryView::new(&source),
    };
    for deriver in derivers {
        deriver.derive(state, &input, ctx);
    }

    debug!(entry = ts, replaced, day = %day, "indexed entry");
    Ok(())
}
