//! Typed read access to an entry's attribute mapping, and the upsert merge

use serde_json::Value;

use crate::model::{Attrs, Timestamp};

/// Well-known entry field names.
pub mod fields {
    pub const TIMESTAMP: &str = "timestamp";
    pub const TAGS: &str = "tags";
    pub const MENTIONS: &str = "mentions";
    pub const MARKDOWN: &str = "md";
    pub const ACTIVITY: &str = "activity";
    pub const CONSUMPTION: &str = "consumption";
    pub const COMMENT_FOR: &str = "comment_for";
    pub const LINKED_ENTRIES: &str = "linked_entries";
    pub const ARRIVAL_TIMESTAMP: &str = "arrival_timestamp";
    pub const DEPARTURE_TIMESTAMP: &str = "departure_timestamp";
    pub const DEPARTURE_DATE: &str = "departure_date";
}

/// Borrowed view over an entry's attributes. Malformed values read as absent.
#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a> {
    attrs: &'a Attrs,
}

impl<'a> EntryView<'a> {
    pub fn new(attrs: &'a Attrs) -> Self {
        EntryView { attrs }
    }

    pub fn attrs(&self) -> &'a Attrs {
        self.attrs
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        self.int_field(fields::TIMESTAMP)
    }

    pub fn tags(&self) -> Vec<&'a str> {
        self.strings(fields::TAGS)
    }

    pub fn mentions(&self) -> Vec<&'a str> {
        self.strings(fields::MENTIONS)
    }

    pub fn markdown(&self) -> Option<&'a str> {
        self.attrs.get(fields::MARKDOWN).and_then(Value::as_str)
    }

    pub fn activity(&self) -> Option<&'a Value> {
        self.present(fields::ACTIVITY)
    }

    pub fn consumption(&self) -> Option<&'a Value> {
        self.present(fields::CONSUMPTION)
    }

    pub fn comment_for(&self) -> Option<Timestamp> {
        self.int_field(fields::COMMENT_FOR)
    }

    pub fn linked_entries(&self) -> Vec<Timestamp> {
        match self.attrs.get(fields::LINKED_ENTRIES) {
            Some(Value::Array(items)) => items.iter().filter_map(as_timestamp).collect(),
            Some(single) => as_timestamp(single).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Visit entries are recognised by carrying a departure date.
    pub fn is_visit(&self) -> bool {
        self.present(fields::DEPARTURE_DATE).is_some()
    }

    /// Integer field, accepting JSON integers and digit strings.
    pub fn int_field(&self, name: &str) -> Option<Timestamp> {
        self.attrs.get(name).and_then(as_timestamp)
    }

    fn present(&self, name: &str) -> Option<&'a Value> {
        self.attrs.get(name).filter(|v| !v.is_null())
    }

    fn strings(&self, name: &str) -> Vec<&'a str> {
        match self.attrs.get(name) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

fn as_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Last-write-wins merge: fields of `update` replace those of `old`, fields
/// only present in `old` survive.
pub fn merge(old: Option<&Attrs>, update: &Attrs) -> Attrs {
    let mut merged = old.cloned().unwrap_or_default();
    for (field, value) in update {
        merged.insert(field.clone(), value.clone());
    }
    merged
}
