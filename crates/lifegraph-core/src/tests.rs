//! Unit tests for lifegraph-core module

use crate::*;
use insta::assert_snapshot;
use serde_json::json;

fn attrs(value: serde_json::Value) -> Attrs {
    value.as_object().cloned().unwrap_or_default()
}

fn tag(name: &str) -> NodeKey {
    NodeKey::Tag(name.to_string())
}

#[test]
fn test_node_key_structural_equality() {
    let a = NodeKey::Month { year: 2023, month: 4 };
    let b = NodeKey::Month { year: 2023, month: 4 };
    assert_eq!(a, b);
    assert_ne!(tag("coffee"), NodeKey::PrivateTag("coffee".to_string()));
    assert_ne!(tag("coffee"), NodeKey::Mention("coffee".to_string()));
}

#[test]
fn test_node_key_display() {
    let day = CalendarDay::new(2023, 4, 12).unwrap();
    assert_snapshot!(day.day_key().to_string(), @"timeline-day:2023-04-12");
    assert_snapshot!(day.month_key().to_string(), @"timeline-month:2023-04");
    assert_snapshot!(NodeKey::Container(Container::PrivateHashtags).to_string(), @"container:private-hashtags");
}

#[test]
fn test_add_nodes_keeps_existing_attrs() {
    let mut graph = Graph::new();
    graph.add_nodes_with_attrs([(tag("coffee"), attrs(json!({"val": "#Coffee"})))]);
    graph.add_nodes([tag("coffee"), tag("tea")]);

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.attrs(&tag("coffee")).unwrap()["val"], json!("#Coffee"));
    assert!(graph.attrs(&tag("tea")).unwrap().is_empty());
    assert!(graph.attrs(&tag("juice")).is_none());
}

#[test]
fn test_add_nodes_with_attrs_overwrites() {
    let mut graph = Graph::new();
    graph.add_nodes_with_attrs([(NodeKey::Entry(1), attrs(json!({"md": "a"})))]);
    graph.add_nodes_with_attrs([(NodeKey::Entry(1), attrs(json!({"md": "b"})))]);

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.attrs(&NodeKey::Entry(1)).unwrap()["md"], json!("b"));
}

#[test]
fn test_edge_insertion_is_a_set_union() {
    let mut graph = Graph::new();
    graph.add_nodes([tag("x"), NodeKey::Entry(1)]);
    let edge = Edge::labeled(tag("x"), NodeKey::Entry(1), EdgeLabel::Contains);

    graph.add_edges([edge.clone(), edge.clone()]);
    graph.add_edges([edge.clone()]);
    assert_eq!(graph.edge_count(), 1);

    // A different label between the same nodes is a distinct edge.
    graph.add_edges([Edge::unlabeled(tag("x"), NodeKey::Entry(1))]);
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.has_edge(&edge));
}

#[test]
fn test_find_edges_by_source_target_and_label() {
    let mut graph = Graph::new();
    let hashtags = NodeKey::Container(Container::Hashtags);
    graph.add_nodes([hashtags.clone(), tag("x"), tag("y"), NodeKey::Entry(1), NodeKey::Entry(2)]);
    graph.add_edges([
        Edge::labeled(hashtags.clone(), tag("x"), EdgeLabel::Is),
        Edge::labeled(hashtags.clone(), tag("y"), EdgeLabel::Is),
        Edge::labeled(tag("x"), NodeKey::Entry(1), EdgeLabel::Contains),
        Edge::labeled(tag("x"), NodeKey::Entry(2), EdgeLabel::Contains),
        Edge::labeled(tag("y"), NodeKey::Entry(2), EdgeLabel::Contains),
    ]);

    assert_eq!(graph.count_edges(&EdgeFilter::outgoing(hashtags.clone()).labeled(EdgeLabel::Is)), 2);
    assert_eq!(graph.count_edges(&EdgeFilter::outgoing(tag("x")).labeled(EdgeLabel::Contains)), 2);
    assert_eq!(graph.count_edges(&EdgeFilter::incoming(NodeKey::Entry(2))), 2);
    assert_eq!(graph.count_edges(&EdgeFilter::default().labeled(EdgeLabel::Contains)), 3);
    assert!(graph.find_edges(&EdgeFilter::outgoing(tag("missing"))).is_empty());

    let incoming = graph.find_edges(&EdgeFilter::incoming(NodeKey::Entry(1)));
    assert_eq!(incoming, vec![Edge::labeled(tag("x"), NodeKey::Entry(1), EdgeLabel::Contains)]);
}

#[test]
fn test_remove_nodes_cascades_edges() {
    let mut graph = Graph::new();
    graph.add_nodes([tag("x"), NodeKey::Entry(1)]);
    graph.add_edges([Edge::labeled(tag("x"), NodeKey::Entry(1), EdgeLabel::Contains)]);

    let removed = graph.remove_nodes([NodeKey::Entry(1), NodeKey::Entry(99)]);
    assert_eq!(removed.len(), 1);
    assert!(!graph.has_node(&NodeKey::Entry(1)));
    assert!(graph.has_node(&tag("x")));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_dangling_edge_survives_until_target_is_inserted() {
    let mut graph = Graph::new();
    graph.add_nodes([NodeKey::Entry(200)]);
    let comment = Edge::labeled(NodeKey::Entry(200), NodeKey::Entry(100), EdgeLabel::Comment);
    graph.add_edges([comment.clone()]);

    assert!(!graph.has_node(&NodeKey::Entry(100)));
    assert_eq!(graph.node_count(), 1);
    assert!(graph.has_edge(&comment));

    // Removing a placeholder through the public API is a no-op.
    assert!(graph.remove_nodes([NodeKey::Entry(100)]).is_empty());
    assert!(graph.has_edge(&comment));

    graph.add_nodes_with_attrs([(NodeKey::Entry(100), attrs(json!({"md": "parent"})))]);
    assert!(graph.has_node(&NodeKey::Entry(100)));
    assert!(graph.has_edge(&comment));
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn test_placeholder_dropped_with_last_edge() {
    let mut graph = Graph::new();
    graph.add_nodes([NodeKey::Entry(200)]);
    graph.add_edges([Edge::labeled(NodeKey::Entry(200), NodeKey::Entry(100), EdgeLabel::Comment)]);

    graph.remove_nodes([NodeKey::Entry(200)]);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.all_nodes().count(), 0);

    // The key is free again and can be inserted normally.
    graph.add_nodes([NodeKey::Entry(100)]);
    assert!(graph.has_node(&NodeKey::Entry(100)));
}

#[test]
fn test_nodes_of_kind() {
    let mut graph = Graph::new();
    graph.add_nodes([tag("a"), tag("b"), NodeKey::Mention("m".into()), NodeKey::Entry(5)]);
    let mut tags: Vec<_> = graph.nodes_of_kind(NodeKind::Tag).cloned().collect();
    tags.sort();
    assert_eq!(tags, vec![tag("a"), tag("b")]);
}

#[test]
fn test_state_keeps_graph_and_chrono_in_step() {
    let mut state = IndexState::new();
    state.insert_entry(100, attrs(json!({"md": "a"})));
    state.insert_entry(50, attrs(json!({"md": "b"})));

    assert_eq!(state.chrono().iter().collect::<Vec<_>>(), vec![50, 100]);
    assert!(state.has_entry(100));

    let removed = state.remove_entry(100).unwrap();
    assert_eq!(removed["md"], json!("a"));
    assert!(!state.has_entry(100));
    assert!(!state.chrono().contains(100));
    assert!(state.remove_entry(100).is_none());
    assert_eq!(state.entry_count(), 1);
}

#[test]
fn test_calendar_day_from_timestamp() {
    // 2023-04-12T10:00:00Z
    let day = CalendarDay::from_timestamp(1_681_293_600_000).unwrap();
    assert_eq!((day.year(), day.month(), day.day()), (2023, 4, 12));
    assert_eq!(day.to_string(), "2023-04-12");
    assert_eq!("2023-04-12".parse::<CalendarDay>().unwrap(), day);

    let (start, end) = day.bounds();
    assert_eq!(end - start, MILLIS_PER_DAY);
    assert_eq!(CalendarDay::from_timestamp(start).unwrap(), day);
    assert_ne!(CalendarDay::from_timestamp(end).unwrap(), day);
}

#[test]
fn test_calendar_day_rejects_out_of_range_timestamps() {
    assert_eq!(
        CalendarDay::from_timestamp(i64::MAX),
        Err(IndexError::InvalidTimestamp(i64::MAX))
    );
    assert!(CalendarDay::from_timestamp(-1).is_ok());
    assert!(CalendarDay::new(2023, 2, 30).is_none());
}

#[test]
fn test_edge_label_serialization() {
    let json = serde_json::to_string(&EdgeLabel::Contains).unwrap();
    assert_eq!(json, "\"CONTAINS\"");
    let back: EdgeLabel = serde_json::from_str(&json).unwrap();
    assert_eq!(back, EdgeLabel::Contains);
}
