use crate::cli::InputFormat;
use crate::domain::constants::BYTES_PER_MB;
use crate::domain::error::{HarnessError, HarnessResult};
use crate::domain::models::LoadReport;
use serde_json::Value;
use std::path::Path;
use std::time::Instant;

pub struct LoadedDocument {
    /// JSON Lines input is gathered into an array, so record `n` is `/n`.
    pub root: Value,
    pub report: LoadReport,
}

/// `auto` picks lines for `.jsonl`/`.ndjson`, otherwise standard with a lines fallback.
pub fn resolve_format(path: &Path, format: InputFormat) -> InputFormat {
    match format {
        InputFormat::Auto => match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") | Some("ndjson") => InputFormat::Lines,
            _ => InputFormat::Auto,
        },
        other => other,
    }
}

/// Settles `auto` for inputs that are not loaded into a tree.
pub fn sniff_format(path: &Path, text: &str, format: InputFormat) -> InputFormat {
    match resolve_format(path, format) {
        InputFormat::Auto => {
            if serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok() {
                InputFormat::Standard
            } else {
                InputFormat::Lines
            }
        }
        other => other,
    }
}

pub fn read_input(path: &Path) -> HarnessResult<String> {
    std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))
}

/// Non-blank lines with their 1-based line numbers.
pub fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn parse_lines(path: &Path, text: &str) -> HarnessResult<Value> {
    let mut out = Vec::new();
    for (line, record) in records(text) {
        let value = serde_json::from_str(record).map_err(|source| HarnessError::InvalidRecord {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        out.push(value);
    }
    Ok(Value::Array(out))
}

fn parse_standard(path: &Path, text: &str) -> HarnessResult<Value> {
    serde_json::from_str(text).map_err(|source| HarnessError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_document(path: &Path, format: InputFormat) -> HarnessResult<LoadedDocument> {
    let text = read_input(path)?;
    let start = Instant::now();
    let (root, format) = match resolve_format(path, format) {
        InputFormat::Standard => (parse_standard(path, &text)?, InputFormat::Standard),
        InputFormat::Lines => (parse_lines(path, &text)?, InputFormat::Lines),
        InputFormat::Auto => match parse_standard(path, &text) {
            Ok(root) => (root, InputFormat::Standard),
            Err(err) => {
                tracing::debug!(%err, "not a single JSON value, retrying as JSON Lines");
                (parse_lines(path, &text)?, InputFormat::Lines)
            }
        },
    };
    let parse_ms = start.elapsed().as_secs_f64() * 1000.0;

    let records = match (&root, format) {
        (Value::Array(items), InputFormat::Lines) => items.len(),
        _ => 1,
    };
    let report = LoadReport {
        path: path.display().to_string(),
        format,
        bytes: text.len(),
        records,
        parse_ms,
        approx_memory_mb: approx_value_bytes(&root) as f64 / BYTES_PER_MB,
    };
    tracing::info!(
        path = %report.path,
        records = report.records,
        parse_ms = report.parse_ms,
        "document loaded"
    );
    Ok(LoadedDocument { root, report })
}

/// Rough heap + inline footprint of a parsed tree.
pub fn approx_value_bytes(value: &Value) -> usize {
    let node = std::mem::size_of::<Value>();
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => node,
        Value::String(s) => node + s.capacity(),
        Value::Array(items) => {
            node + (items.capacity() - items.len()) * node
                + items.iter().map(approx_value_bytes).sum::<usize>()
        }
        Value::Object(map) => {
            node + map
                .iter()
                .map(|(k, v)| std::mem::size_of::<String>() + k.capacity() + approx_value_bytes(v))
                .sum::<usize>()
        }
    }
}
