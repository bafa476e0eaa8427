//! Hashtags and mentions written inline in an entry's markdown body

use std::sync::LazyLock;

use lifegraph_core::{fields, Attrs, EntryView};
use regex::Regex;
use serde_json::Value;

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w#&/])(#\w[\w-]*)").expect("valid hashtag pattern"));
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w@])(@\w+)").expect("valid mention pattern"));

/// `#tags` in order of first appearance, deduplicated case-insensitively.
pub fn hashtags(text: &str) -> Vec<String> {
    collect(&HASHTAG, text)
}

/// `@mentions` in order of first appearance, deduplicated case-insensitively.
pub fn mentions(text: &str) -> Vec<String> {
    collect(&MENTION, text)
}

fn collect(pattern: &Regex, text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|token| seen.insert(token.to_lowercase()))
        .collect()
}

/// Fill in `tags` / `mentions` from the markdown body when the entry does not
/// declare them.
pub fn with_text_facets(mut entry: Attrs) -> Attrs {
    let Some(md) = EntryView::new(&entry).markdown().map(str::to_owned) else {
        return entry;
    };
    for (field, found) in [(fields::TAGS, hashtags(&md)), (fields::MENTIONS, mentions(&md))] {
        if entry.contains_key(field) || found.is_empty() {
            continue;
        }
        entry.insert(
            field.to_string(),
            Value::Array(found.into_iter().map(Value::String).collect()),
        );
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_hashtags() {
        let text = "#Morning coffee with #friends, then #coffee again.\nNot a tag: a#b or C#";
        assert_eq!(hashtags(text), vec!["#Morning", "#friends", "#coffee"]);
    }

    #[test]
    fn test_hashtags_dedup_case_insensitive() {
        assert_eq!(hashtags("#Run #run #RUN"), vec!["#Run"]);
    }

    #[test]
    fn test_extracts_mentions() {
        let text = "lunch with @alice and @Bob_K; mail me at me@example.com";
        assert_eq!(mentions(text), vec!["@alice", "@Bob_K"]);
    }

    #[test]
    fn test_explicit_fields_take_precedence() {
        let entry = json!({"md": "#a @b", "tags": ["#z"]}).as_object().cloned().unwrap();
        let enriched = with_text_facets(entry);
        assert_eq!(enriched["tags"], json!(["#z"]));
        assert_eq!(enriched["mentions"], json!(["@b"]));
    }

    #[test]
    fn test_no_markdown_is_untouched() {
        let entry = json!({"timestamp": 1}).as_object().cloned().unwrap();
        assert_eq!(with_text_facets(entry.clone()), entry);
    }
}
