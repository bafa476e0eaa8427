//! Entry indexing engine: facet derivation, upsert, and garbage collection

pub mod collaborators;
pub mod config;
pub mod facets;
pub mod gc;
pub mod query;
pub mod text;
pub mod upsert;


use std::collections::HashSet;

use lifegraph_core::{Attrs, EntryView, IndexError, IndexState, Timestamp};
use serde::Serialize;
use tracing::{info, warn};

pub use collaborators::{
    ChronoDayIndex, Collaborators, DayIndex, FieldVisitWindow, TimestampBounds, TimestampGuard,
    VisitWindow, VisitWindowSource,
};
pub use config::{ConfigError, IndexerConfig, UpdateMode};
pub use facets::{DeriveContext, DeriveInput, FacetDeriver};
pub use gc::COLLECTIBLE_KINDS;
pub use query::{FacetCount, Violation};

/// Owner of one index state. All mutation goes through here, one call at a
/// time; reads borrow the state.
pub struct Indexer {
    state: IndexState,
    config: IndexerConfig,
    private_tags: HashSet<String>,
    collaborators: Collaborators,
    derivers: Vec<Box<dyn FacetDeriver>>,
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("entries", &self.state.entry_count())
            .field("config", &self.config)
            .finish()
    }
}

/// Outcome of a batch import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub indexed: usize,
    pub failed: usize,
}

impl Indexer {
    pub fn new(config: IndexerConfig) -> Self {
        let collaborators = Collaborators::from_config(&config);
        Self::with_collaborators(config, collaborators)
    }

    pub fn with_collaborators(config: IndexerConfig, collaborators: Collaborators) -> Self {
        Self {
            state: IndexState::new(),
            private_tags: config.private_vocabulary(),
            config,
            collaborators,
            derivers: facets::pipeline(),
        }
    }

    pub fn state(&self) -> &IndexState {
        &self.state
    }

    pub fn into_state(self) -> IndexState {
        self.state
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Upsert the entry at `ts` with the fields in `partial`.
    pub fn add_node(&mut self, ts: Timestamp, partial: Attrs) -> Result<(), IndexError> {
        let ctx = DeriveContext {
            private_tags: &self.private_tags,
            collaborators: &self.collaborators,
        };
        upsert::add_node(&mut self.state, ts, partial, &self.config, &self.derivers, &ctx)
    }

    /// Upsert an entry keyed by its own `timestamp` field.
    pub fn add_entry(&mut self, entry: Attrs) -> Result<Timestamp, IndexError> {
        let ts = EntryView::new(&entry)
            .timestamp()
            .ok_or(IndexError::MissingTimestamp)?;
        self.add_node(ts, entry)?;
        Ok(ts)
    }

    /// Delete the entry at `ts`. A missing entry is a no-op.
    pub fn remove_node(&mut self, ts: Timestamp) -> Option<Attrs> {
        gc::remove_node(&mut self.state, ts)
    }

    /// Upsert a batch of entries in order. A failing entry is logged and
    /// counted; the rest of the batch still goes in.
    pub fn import<I>(&mut self, entries: I) -> ImportSummary
    where
        I: IntoIterator<Item = Attrs>,
    {
        let mut summary = ImportSummary::default();
        for entry in entries {
            match self.add_entry(entry) {
                Ok(_) => summary.indexed += 1,
                Err(e) => {
                    warn!("Skipping entry: {}", e);
                    summary.failed += 1;
                }
            }
        }
        info!(
            "Imported {} entries ({} failed), {} nodes, {} edges",
            summary.indexed,
            summary.failed,
            self.state.graph().node_count(),
            self.state.graph().edge_count()
        );
        summary
    }
}

impl Default for Indexer {
    fn default() -> Self {
        Self::new(IndexerConfig::default())
    }
}
