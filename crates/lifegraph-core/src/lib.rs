//! Lifegraph Core — entry graph data model, graph store, and chronological index

pub mod calendar;
pub mod chrono_index;
pub mod entry;
pub mod error;
pub mod graph;
pub mod model;
pub mod state;

#[cfg(test)]
pub mod tests;

pub use calendar::{CalendarDay, MILLIS_PER_DAY};
pub use chrono_index::ChronoIndex;
pub use entry::{fields, merge, EntryView};
pub use error::IndexError;
pub use graph::Graph;
pub use model::{Attrs, Container, Edge, EdgeFilter, EdgeLabel, GraphNode, NodeKey, NodeKind, Timestamp};
pub use state::IndexState;
