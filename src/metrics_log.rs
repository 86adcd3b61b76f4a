// Metrics sinks for finished games
//
// A finished game hands its finalized MoveMetric rows to a sink. Sinks are
// append-only and keep only the first row for each move coordinate of a
// session. The file sink writes one JSON object per line; write failures are
// logged and swallowed so they never reach game state.

use log::{error, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Arc;

use crate::metrics::MoveMetric;
use crate::types::Position;

/// Destination for finalized move metrics
pub trait MetricsSink: Send + Sync {
    fn record(&self, metrics: &[MoveMetric]);
}

/// Keeps the first metric seen for each (session, move) pair, in order
pub fn dedup_by_move(metrics: &[MoveMetric]) -> Vec<&MoveMetric> {
    let mut seen: HashSet<(&str, Position)> = HashSet::new();
    metrics
        .iter()
        .filter(|m| seen.insert((m.session_id.as_str(), m.position)))
        .collect()
}

/// A single line of the JSONL metrics log
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MetricsLogEntry {
    #[serde(flatten)]
    pub metric: MoveMetric,
    pub recorded_at: String,
}

/// JSONL file sink
/// Uses Arc<Mutex<File>> so clones handed to blocking tasks share one handle
#[derive(Clone)]
pub struct MetricsLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl MetricsLogger {
    /// Creates a new metrics logger
    /// If enabled is true, opens the log file for appending (creating it if needed)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)
        {
            Ok(file) => {
                info!("Metrics logging enabled: {}", log_file_path);
                MetricsLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to open metrics log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled metrics logger (no-op)
    pub fn disabled() -> Self {
        MetricsLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn write_entries(&self, metrics: &[&MoveMetric]) {
        let mut file_guard = self.file.lock();
        let file = match file_guard.as_mut() {
            Some(file) => file,
            None => return,
        };

        let recorded_at = chrono::Utc::now().to_rfc3339();
        let mut buffer = String::new();

        for metric in metrics {
            let entry = MetricsLogEntry {
                metric: (*metric).clone(),
                recorded_at: recorded_at.clone(),
            };
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    buffer.push_str(&json_line);
                    buffer.push('\n');
                }
                Err(e) => error!("Failed to serialize metrics entry: {}", e),
            }
        }

        if let Err(e) = file.write_all(buffer.as_bytes()) {
            error!("Failed to write metrics entries: {}", e);
        } else if let Err(e) = file.flush() {
            error!("Failed to flush metrics log: {}", e);
        }
    }
}

impl MetricsSink for MetricsLogger {
    fn record(&self, metrics: &[MoveMetric]) {
        if !self.enabled || metrics.is_empty() {
            return;
        }
        let unique = dedup_by_move(metrics);
        self.write_entries(&unique);
    }
}

/// In-process sink, handy for tests and tools
#[derive(Default)]
pub struct MemorySink {
    rows: Mutex<Vec<MoveMetric>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<MoveMetric> {
        self.rows.lock().clone()
    }
}

impl MetricsSink for MemorySink {
    fn record(&self, metrics: &[MoveMetric]) {
        let mut rows = self.rows.lock();
        rows.extend(dedup_by_move(metrics).into_iter().cloned());
    }
}
