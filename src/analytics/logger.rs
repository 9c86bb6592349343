use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Request log entry (JSONL analytics)
// ---------------------------------------------------------------------------

/// One line of the request log (`~/.wave/ai-log.jsonl`).
///
/// Written for every `/wave-ai` request, successful or not, and read back
/// by the reporter for `wave stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiLogEntry {
    pub timestamp: String,
    /// `"copy"` or `"strategy"`.
    pub category: String,
    /// Copy type for copy requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_type: Option<String>,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub latency_ms: u64,
    /// Characters in the generated text; 0 on failure.
    #[serde(default)]
    pub response_chars: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl AiLogEntry {
    pub fn succeeded(
        category: &str,
        copy_type: Option<&str>,
        latency_ms: u64,
        response: &str,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            category: category.to_string(),
            copy_type: copy_type.map(str::to_string),
            success: true,
            latency_ms,
            response_chars: response.chars().count(),
            error: None,
        }
    }

    pub fn failed(category: &str, latency_ms: u64, error: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            category: category.to_string(),
            copy_type: None,
            success: false,
            latency_ms,
            response_chars: 0,
            error: Some(error.to_string()),
        }
    }

    /// `category/copy_type` for copy requests, the bare category otherwise.
    pub fn kind(&self) -> String {
        match &self.copy_type {
            Some(ct) => format!("{}/{}", self.category, ct),
            None => self.category.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append `entry` to the configured log. Does nothing when logging is
/// disabled; write failures are dropped so a full disk never fails a request.
pub fn log_ai_request(config: &LoggingConfig, entry: &AiLogEntry) {
    if !config.enabled {
        return;
    }
    let Some(path) = ai_log_path(config) else {
        return;
    };
    let _ = append_log_entry(&path, entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read every entry in the log at `path`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_entries(path: &Path) -> Vec<AiLogEntry> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<AiLogEntry>(&line).ok())
        .collect()
}

/// Keep entries from the last `days` days before `now`; `None` keeps all.
pub fn since_days(entries: Vec<AiLogEntry>, days: Option<u32>, now: DateTime<Utc>) -> Vec<AiLogEntry> {
    let Some(days) = days else {
        return entries;
    };

    let cutoff = now - chrono::Duration::days(i64::from(days));
    entries
        .into_iter()
        .filter(|e| {
            DateTime::parse_from_rfc3339(&e.timestamp)
                .map(|ts| ts.with_timezone(&Utc) >= cutoff)
                .unwrap_or(false)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(path: &Path, entry: &AiLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// The configured log path, or `~/.wave/ai-log.jsonl`.
pub fn ai_log_path(config: &LoggingConfig) -> Option<PathBuf> {
    config
        .path
        .clone()
        .or_else(|| dirs::home_dir().map(|home| home.join(".wave").join("ai-log.jsonl")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(path: &Path) -> LoggingConfig {
        LoggingConfig {
            enabled: true,
            path: Some(path.to_path_buf()),
        }
    }

    #[test]
    fn appends_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("log.jsonl");
        let config = config_at(&path);

        log_ai_request(&config, &AiLogEntry::succeeded("copy", Some("email"), 3, "olá"));
        log_ai_request(&config, &AiLogEntry::failed("strategy", 1, "bad json"));

        let entries = read_entries(&path);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].response_chars, 3);
        assert_eq!(entries[0].kind(), "copy/email");
        assert!(!entries[1].success);
        assert_eq!(entries[1].error.as_deref(), Some("bad json"));
    }

    #[test]
    fn disabled_logging_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let config = LoggingConfig {
            enabled: false,
            ..config_at(&path)
        };
        log_ai_request(&config, &AiLogEntry::succeeded("copy", None, 0, "x"));
        assert!(!path.exists());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let good = serde_json::to_string(&AiLogEntry::succeeded("copy", None, 2, "ok")).unwrap();
        fs::write(&path, format!("not json\n{good}\n{{\"partial\":\n")).unwrap();
        assert_eq!(read_entries(&path).len(), 1);
    }

    #[test]
    fn missing_file_is_empty() {
        assert!(read_entries(Path::new("/definitely/not/here.jsonl")).is_empty());
    }

    #[test]
    fn since_days_filters_by_timestamp() {
        let now = Utc::now();
        let at = |days_ago: i64| AiLogEntry {
            timestamp: (now - chrono::Duration::days(days_ago)).to_rfc3339(),
            ..AiLogEntry::succeeded("strategy", None, 0, "")
        };
        let entries = vec![at(0), at(3), at(10)];
        assert_eq!(since_days(entries.clone(), Some(7), now).len(), 2);
        assert_eq!(since_days(entries, None, now).len(), 3);
    }
}
