//! Aggregation of the request log for `wave stats`.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use crate::analytics::logger::{self, AiLogEntry};
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Aggregated stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub total_requests: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success_pct: f64,
    pub avg_latency_ms: f64,
    pub total_response_chars: usize,
    pub kind_stats: Vec<KindStat>,
    pub daily: Vec<DailyStat>,
}

/// Per request kind (`copy/<type>` or `strategy`).
#[derive(Debug, Clone, Serialize)]
pub struct KindStat {
    pub kind: String,
    pub count: usize,
    pub failures: usize,
    pub avg_latency_ms: f64,
    pub avg_response_chars: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyStat {
    pub date: String,
    pub requests: usize,
    pub failures: usize,
}

// ---------------------------------------------------------------------------
// Stats computation
// ---------------------------------------------------------------------------

/// Stats over the configured log, optionally limited to the last `days` days.
pub fn compute_stats(config: &LoggingConfig, days: Option<u32>) -> Stats {
    let entries = logger::ai_log_path(config)
        .map(|path| logger::read_entries(&path))
        .unwrap_or_default();
    build_stats(&logger::since_days(entries, days, Utc::now()))
}

pub fn build_stats(entries: &[AiLogEntry]) -> Stats {
    if entries.is_empty() {
        return Stats::default();
    }

    let total_requests = entries.len();
    let succeeded = entries.iter().filter(|e| e.success).count();

    Stats {
        total_requests,
        succeeded,
        failed: total_requests - succeeded,
        success_pct: succeeded as f64 / total_requests as f64 * 100.0,
        avg_latency_ms: mean(entries.iter().map(|e| e.latency_ms as f64)),
        total_response_chars: entries.iter().map(|e| e.response_chars).sum(),
        kind_stats: compute_kind_stats(entries),
        daily: compute_daily(entries),
    }
}

/// Group by kind; most requested first, ties by name.
fn compute_kind_stats(entries: &[AiLogEntry]) -> Vec<KindStat> {
    let mut groups: HashMap<String, Vec<&AiLogEntry>> = HashMap::new();
    for entry in entries {
        groups.entry(entry.kind()).or_default().push(entry);
    }

    let mut stats: Vec<KindStat> = groups
        .into_iter()
        .map(|(kind, group)| KindStat {
            kind,
            count: group.len(),
            failures: group.iter().filter(|e| !e.success).count(),
            avg_latency_ms: mean(group.iter().map(|e| e.latency_ms as f64)),
            avg_response_chars: mean(group.iter().map(|e| e.response_chars as f64)),
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.kind.cmp(&b.kind)));
    stats
}

/// Requests per calendar day (UTC date prefix of the timestamp), oldest first.
fn compute_daily(entries: &[AiLogEntry]) -> Vec<DailyStat> {
    let mut daily: HashMap<String, (usize, usize)> = HashMap::new();
    for entry in entries {
        let date = entry.timestamp.get(..10).unwrap_or("unknown").to_string();
        let slot = daily.entry(date).or_default();
        slot.0 += 1;
        if !entry.success {
            slot.1 += 1;
        }
    }

    let mut days: Vec<DailyStat> = daily
        .into_iter()
        .map(|(date, (requests, failures))| DailyStat {
            date,
            requests,
            failures,
        })
        .collect();
    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
