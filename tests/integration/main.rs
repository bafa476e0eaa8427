//! Integration tests for Lifegraph
//!
//! These tests drive the CLI binary and the indexer together over entry files on disk.

use std::io::Write;
use std::process::{Command, Output};

use lifegraph_core::{CalendarDay, NodeKey};
use lifegraph_indexer::{query, Indexer, IndexerConfig, UpdateMode};
use serde_json::json;
use tempfile::NamedTempFile;

// 2023-04-12T08:00:00Z and 10:00:00Z
const AT_0800: i64 = 1_681_286_400_000;
const AT_1000: i64 = 1_681_293_600_000;
// 2023-04-13T09:00:00Z
const NEXT_DAY: i64 = 1_681_376_400_000;

fn lifegraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lifegraph"))
        .args(args)
        .env_remove("LIFEGRAPH_CONFIG")
        .output()
        .expect("Failed to execute lifegraph")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn journal_lines() -> NamedTempFile {
    let lines = [
        json!({"timestamp": AT_0800, "md": "breakfast", "tags": ["#coffee"], "departure_date": AT_1000 + 3_600_000}),
        json!({"timestamp": AT_1000, "md": "photo of the bay\nsecond line", "tags": ["#Coffee", "#bay"]}),
        json!({"timestamp": NEXT_DAY, "md": "diary", "tags": ["#secret", "#bay"], "comment_for": AT_1000}),
    ];
    let body: Vec<String> = lines.iter().map(|v| v.to_string()).collect();
    write_file(&body.join("\n"))
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = lifegraph(&["--help"]);
    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("lifegraph"));
    assert!(text.contains("import"));

    let version = stdout(&lifegraph(&["version"]));
    assert!(version.starts_with("Lifegraph v"));
}

#[test]
fn test_import_prints_summary() {
    let journal = journal_lines();
    let output = lifegraph(&["import", journal.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("3 entries, 0 failed"));
}

#[test]
fn test_import_counts_bad_timestamps() {
    let journal = write_file(&json!([{"timestamp": AT_0800}, {"timestamp": i64::MAX}, {"md": "no time"}]).to_string());
    let output = lifegraph(&["import", journal.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("1 entries, 2 failed"));
}

#[test]
fn test_tags_hide_private_vocabulary_by_default() {
    let journal = journal_lines();
    let config = write_file("private_tags = [\"#secret\"]\n");
    let path = journal.path().to_str().unwrap();

    let public = stdout(&lifegraph(&["--config", config.path().to_str().unwrap(), "tags", path]));
    let lines: Vec<&str> = public.lines().map(str::trim).collect();
    assert_eq!(lines, vec!["2  #Coffee", "1  #bay"]);

    let all = stdout(&lifegraph(&["--config", config.path().to_str().unwrap(), "tags", "--private", path]));
    assert!(all.contains("#secret"));
}

#[test]
fn test_day_lists_entries_in_order() {
    let journal = journal_lines();
    let output = lifegraph(&["day", "2023-04-12", journal.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "2023-04-12T08:00:00Z  breakfast\n2023-04-12T10:00:00Z  photo of the bay\n"
    );
}

#[test]
fn test_day_rejects_bad_date() {
    let journal = journal_lines();
    let output = lifegraph(&["day", "2023-13-40", journal.path().to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_check_passes_on_consistent_index() {
    let journal = journal_lines();
    let output = lifegraph(&["check", journal.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "ok: 3 entries");
}

#[test]
fn test_config_from_environment() {
    let journal = journal_lines();
    let config = write_file("private_tags = [\"#bay\"]\n");
    let output = Command::new(env!("CARGO_BIN_EXE_lifegraph"))
        .args(["tags", journal.path().to_str().unwrap()])
        .env("LIFEGRAPH_CONFIG", config.path())
        .output()
        .unwrap();
    // Only the breakfast entry is free of #bay, so only its tag stays public.
    let lines: Vec<String> = stdout(&output).lines().map(|l| l.trim().to_string()).collect();
    assert_eq!(lines, vec!["1  #coffee".to_string()]);
}

#[test]
fn test_missing_config_file_fails() {
    let journal = journal_lines();
    let output = lifegraph(&["--config", "/nonexistent/lifegraph.toml", "import", journal.path().to_str().unwrap()]);
    assert!(!output.status.success());
}

/// Reindexing a whole journal, deleting half, and re-adding it leaves a consistent index.
#[test]
fn test_journal_lifecycle() {
    let config = IndexerConfig::from_toml_str("private_tags = [\"#secret\"]\nupdate_mode = \"additive\"\n").unwrap();
    assert_eq!(config.update_mode, UpdateMode::Additive);

    let mut indexer = Indexer::new(config);
    let entries: Vec<_> = (0..24)
        .map(|hour| {
            let tag = if hour % 5 == 0 { "#secret" } else { "#hour" };
            json!({
                "timestamp": AT_0800 + hour * 3_600_000,
                "md": format!("log @Sam {}", hour),
                "tags": [tag, format!("#h{}", hour % 3)],
            })
            .as_object()
            .cloned()
            .unwrap()
        })
        .collect();

    let summary = indexer.import(entries.clone());
    assert_eq!(summary.indexed, 24);
    assert!(query::check_invariants(indexer.state()).is_empty());

    for hour in (0..24).step_by(2) {
        indexer.remove_node(AT_0800 + hour * 3_600_000);
    }
    assert!(query::check_invariants(indexer.state()).is_empty());
    assert_eq!(indexer.state().entry_count(), 12);

    indexer.import(entries);
    assert!(query::check_invariants(indexer.state()).is_empty());
    assert_eq!(query::latest(indexer.state(), 1), vec![AT_0800 + 23 * 3_600_000]);
    assert_eq!(query::entries_for_mention(indexer.state(), "@sam").len(), 24);

    let day = CalendarDay::from_timestamp(AT_0800).unwrap();
    assert_eq!(query::entries_on_day(indexer.state(), day).len(), 16);
    assert!(indexer.state().graph().has_node(&NodeKey::PrivateTag("secret".to_string())));
}
