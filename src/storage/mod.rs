//! Persistence layer.
//!
//! Appends each cycle's selected analyses to a JSON history file.
//! SQLite can be added later for querying across runs, but a flat JSON
//! array is sufficient for the audit-trail requirement.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::types::TokenAnalysis;

/// Default history file path.
const DEFAULT_HISTORY_FILE: &str = "pulse_history.json";

/// One persisted analysis, tagged with the cycle that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub timestamp: DateTime<Utc>,
    pub cycle: u64,
    pub analysis: TokenAnalysis,
}

/// Append a cycle's selections to the history file.
///
/// The file holds a single JSON array; it is read, extended, and
/// rewritten whole. Fine for the volumes involved (a handful of
/// records per hour).
pub fn append_history(records: &[AnalysisRecord], path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_HISTORY_FILE);

    let mut history = if Path::new(path).exists() {
        let json = std::fs::read_to_string(path)
            .context(format!("Failed to read history from {path}"))?;
        serde_json::from_str::<Vec<AnalysisRecord>>(&json)
            .context(format!("Failed to parse history from {path}"))?
    } else {
        Vec::new()
    };

    history.extend_from_slice(records);

    let json = serde_json::to_string_pretty(&history)
        .context("Failed to serialise analysis history")?;
    std::fs::write(path, &json)
        .context(format!("Failed to write history to {path}"))?;

    debug!(path, added = records.len(), total = history.len(), "History appended");
    Ok(())
}

/// Load the full analysis history.
/// Returns an empty vec if the file doesn't exist (fresh start).
pub fn load_history(path: Option<&str>) -> Result<Vec<AnalysisRecord>> {
    let path = path.unwrap_or(DEFAULT_HISTORY_FILE);

    if !Path::new(path).exists() {
        info!(path, "No history file found, starting fresh");
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read history from {path}"))?;
    let history: Vec<AnalysisRecord> = serde_json::from_str(&json)
        .context(format!("Failed to parse history from {path}"))?;

    info!(path, records = history.len(), "History loaded from disk");
    Ok(history)
}

/// Delete the history file (for testing or reset).
pub fn delete_history(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_HISTORY_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .context(format!("Failed to delete history file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
