//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, SecondsFormat};
use lifegraph_core::{Attrs, CalendarDay, Container, Timestamp};
use lifegraph_indexer::{query, Indexer, IndexerConfig};
use rayon::prelude::*;
use serde_json::Value;

const CONFIG_ENV: &str = "LIFEGRAPH_CONFIG";

/// Resolve the indexer config: explicit path, then `$LIFEGRAPH_CONFIG`, then defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<IndexerConfig> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => IndexerConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(IndexerConfig::default()),
    }
}

pub fn import(config: IndexerConfig, files: &[PathBuf]) -> anyhow::Result<()> {
    let (indexer, failed) = index_files(config, files)?;
    let state = indexer.state();
    println!(
        "{} entries, {} failed, {} nodes, {} edges",
        state.entry_count(),
        failed,
        state.graph().node_count(),
        state.graph().edge_count()
    );
    Ok(())
}

pub fn tags(config: IndexerConfig, files: &[PathBuf], private: bool) -> anyhow::Result<()> {
    let (indexer, _) = index_files(config, files)?;
    let mut containers = vec![Container::Hashtags];
    if private {
        containers.push(Container::PrivateHashtags);
    }
    for container in containers {
        for count in query::facet_counts(indexer.state(), container) {
            println!("{:>6}  {}", count.entries, count.label);
        }
    }
    Ok(())
}

pub fn day(config: IndexerConfig, date: &str, files: &[PathBuf]) -> anyhow::Result<()> {
    let day: CalendarDay = date
        .parse()
        .with_context(|| format!("invalid date {:?}, expected YYYY-MM-DD", date))?;
    let (indexer, _) = index_files(config, files)?;
    for ts in query::entries_on_day(indexer.state(), day) {
        let md = indexer
            .state()
            .entry(ts)
            .and_then(|attrs| attrs.get("md"))
            .and_then(Value::as_str)
            .unwrap_or("");
        println!("{}  {}", format_timestamp(ts), first_line(md));
    }
    Ok(())
}

pub fn check(config: IndexerConfig, files: &[PathBuf]) -> anyhow::Result<()> {
    let (indexer, _) = index_files(config, files)?;
    let violations = query::check_invariants(indexer.state());
    if violations.is_empty() {
        println!("ok: {} entries", indexer.state().entry_count());
        return Ok(());
    }
    for violation in &violations {
        println!("{}", violation);
    }
    anyhow::bail!("{} invariant violations", violations.len())
}

/// Parse every file and index the entries in file order.
/// Returns the indexer and the number of entries that failed to index.
fn index_files(config: IndexerConfig, files: &[PathBuf]) -> anyhow::Result<(Indexer, usize)> {
    let mut indexer = Indexer::new(config);
    let mut failed = 0;
    for path in files {
        let entries = read_entries(path)?;
        tracing::info!("Read {} entries from {}", entries.len(), path.display());
        failed += indexer.import(entries).failed;
    }
    Ok((indexer, failed))
}

/// Read a JSON array of entries, or one entry object per line.
pub fn read_entries(path: &Path) -> anyhow::Result<Vec<Attrs>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_entries(&source).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_entries(source: &str) -> anyhow::Result<Vec<Attrs>> {
    if source.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(source)?;
        return Ok(values.into_iter().filter_map(into_entry).collect());
    }

    // JSON-lines: parse in parallel, keep file order
    let lines: Vec<&str> = source.lines().collect();
    let parsed: Vec<Option<Attrs>> = lines
        .par_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| match serde_json::from_str::<Value>(line) {
            Ok(value) => into_entry(value),
            Err(e) => {
                tracing::warn!("Skipping line {}: {}", n + 1, e);
                None
            }
        })
        .collect();
    Ok(parsed.into_iter().flatten().collect())
}

fn into_entry(value: Value) -> Option<Attrs> {
    match value {
        Value::Object(attrs) => Some(attrs),
        other => {
            tracing::warn!("Skipping non-object entry: {}", other);
            None
        }
    }
}

fn format_timestamp(ts: Timestamp) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ts.to_string())
}

fn first_line(md: &str) -> &str {
    md.lines().next().unwrap_or("")
}
