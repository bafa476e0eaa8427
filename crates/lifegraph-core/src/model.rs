//! Core data structures for the entry graph

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;

/// Milliseconds since the Unix epoch. Also the identity of an entry.
pub type Timestamp = i64;

/// Attribute mapping carried by every node.
pub type Attrs = serde_json::Map<String, serde_json::Value>;

/// Singleton grouping nodes, one per facet category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Container {
    Hashtags,
    PrivateHashtags,
    Mentions,
    Activities,
    ConsumptionTypes,
}

impl Container {
    pub fn as_str(&self) -> &'static str {
        match self {
            Container::Hashtags => "hashtags",
            Container::PrivateHashtags => "private-hashtags",
            Container::Mentions => "mentions",
            Container::Activities => "activities",
            Container::ConsumptionTypes => "consumption-types",
        }
    }

    /// Attributes stored on the container node itself.
    pub fn attrs(&self) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.insert("container".to_string(), self.as_str().into());
        attrs
    }
}

/// Identity of a node. Facet keys are content-derived, so deriving the same
/// facet from two entries lands on the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKey {
    // ── Entries ─────────────────────────────────────────────
    Entry(Timestamp),

    // ── Facets ──────────────────────────────────────────────
    Tag(String),
    PrivateTag(String),
    Mention(String),
    Activity(String),
    Consumption(String),

    // ── Calendar hierarchy ──────────────────────────────────
    Year(i32),
    Month { year: i32, month: u32 },
    Day(CalendarDay),

    // ── Grouping ────────────────────────────────────────────
    Container(Container),
}

/// Discriminant of a [`NodeKey`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Entry,
    Tag,
    PrivateTag,
    Mention,
    Activity,
    Consumption,
    Year,
    Month,
    Day,
    Container,
}

impl NodeKey {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeKey::Entry(_) => NodeKind::Entry,
            NodeKey::Tag(_) => NodeKind::Tag,
            NodeKey::PrivateTag(_) => NodeKind::PrivateTag,
            NodeKey::Mention(_) => NodeKind::Mention,
            NodeKey::Activity(_) => NodeKind::Activity,
            NodeKey::Consumption(_) => NodeKind::Consumption,
            NodeKey::Year(_) => NodeKind::Year,
            NodeKey::Month { .. } => NodeKind::Month,
            NodeKey::Day(_) => NodeKind::Day,
            NodeKey::Container(_) => NodeKind::Container,
        }
    }

    /// The entry timestamp, if this key names an entry.
    pub fn as_entry(&self) -> Option<Timestamp> {
        match self {
            NodeKey::Entry(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, NodeKey::Entry(_))
    }
}

impl From<Container> for NodeKey {
    fn from(container: Container) -> Self {
        NodeKey::Container(container)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Entry(ts) => write!(f, "entry:{ts}"),
            NodeKey::Tag(name) => write!(f, "tag:{name}"),
            NodeKey::PrivateTag(name) => write!(f, "private-tag:{name}"),
            NodeKey::Mention(name) => write!(f, "mention:{name}"),
            NodeKey::Activity(value) => write!(f, "activity:{value}"),
            NodeKey::Consumption(value) => write!(f, "consumption:{value}"),
            NodeKey::Year(year) => write!(f, "timeline-year:{year:04}"),
            NodeKey::Month { year, month } => write!(f, "timeline-month:{year:04}-{month:02}"),
            NodeKey::Day(day) => write!(f, "timeline-day:{day}"),
            NodeKey::Container(container) => write!(f, "container:{}", container.as_str()),
        }
    }
}

/// Relationship carried by a labeled edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeLabel {
    /// Facet node → entry carrying that facet.
    Contains,
    /// Container → facet node of its category.
    Is,
    /// Calendar day → entry that happened on it.
    Date,
    /// Comment entry → parent entry.
    Comment,
    /// Entry → referenced entry, explicit or inferred.
    Linked,
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EdgeLabel::Contains => "CONTAINS",
            EdgeLabel::Is => "IS",
            EdgeLabel::Date => "DATE",
            EdgeLabel::Comment => "COMMENT",
            EdgeLabel::Linked => "LINKED",
        };
        f.write_str(label)
    }
}

/// A directed edge with an optional relationship label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeKey,
    pub target: NodeKey,
    pub label: Option<EdgeLabel>,
}

impl Edge {
    pub fn labeled(source: NodeKey, target: NodeKey, label: EdgeLabel) -> Self {
        Edge {
            source,
            target,
            label: Some(label),
        }
    }

    pub fn unlabeled(source: NodeKey, target: NodeKey) -> Self {
        Edge {
            source,
            target,
            label: None,
        }
    }
}

/// Edge query by source, target and/or label. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeFilter {
    pub source: Option<NodeKey>,
    pub target: Option<NodeKey>,
    pub label: Option<EdgeLabel>,
}

impl EdgeFilter {
    pub fn outgoing(source: NodeKey) -> Self {
        EdgeFilter {
            source: Some(source),
            ..Default::default()
        }
    }

    pub fn incoming(target: NodeKey) -> Self {
        EdgeFilter {
            target: Some(target),
            ..Default::default()
        }
    }

    pub fn labeled(mut self, label: EdgeLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn matches(&self, edge: &Edge) -> bool {
        self.source.as_ref().is_none_or(|s| *s == edge.source)
            && self.target.as_ref().is_none_or(|t| *t == edge.target)
            && self.label.is_none_or(|l| edge.label == Some(l))
    }
}

/// A node as stored in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub key: NodeKey,
    pub attrs: Attrs,
    /// Stand-in created for the far end of an edge whose node does not exist
    /// yet. Not visible through `has_node`/`attrs`.
    pub placeholder: bool,
}
