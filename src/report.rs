// Metrics report module for analyzing the JSONL metrics log
//
// This module provides functionality to:
// 1. Parse the JSONL metrics log written by MetricsLogger
// 2. Group rows by board size and pruning mode
// 3. Summarize latency, memory, timeouts and game outcomes per group

use log::info;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::metrics_log::MetricsLogEntry;
use crate::types::{GameOutcome, PruningMode};

/// Restricts a report to one board size and/or pruning mode
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportFilter {
    pub board_size: Option<usize>,
    pub pruning_mode: Option<PruningMode>,
}

impl ReportFilter {
    fn matches(&self, entry: &MetricsLogEntry) -> bool {
        self.board_size.map_or(true, |s| s == entry.metric.board_size)
            && self
                .pruning_mode
                .map_or(true, |m| m == entry.metric.pruning_mode)
    }
}

/// Aggregate statistics for one (board size, pruning mode) group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub board_size: usize,
    pub pruning_mode: PruningMode,
    pub moves: usize,
    pub sessions: usize,
    pub mean_time_ms: f64,
    pub max_time_ms: f64,
    pub mean_memory_kb: f64,
    pub timeouts: usize,
    pub human_wins: usize,
    pub computer_wins: usize,
    pub draws: usize,
}

/// Loads all log entries from a JSONL file
pub fn load_log_file<P: AsRef<Path>>(log_path: P) -> Result<Vec<MetricsLogEntry>, String> {
    let file =
        File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

        if line.trim().is_empty() {
            continue;
        }

        let entry: MetricsLogEntry = serde_json::from_str(&line)
            .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

        entries.push(entry);
    }

    info!("Loaded {} metrics entries", entries.len());
    Ok(entries)
}

/// Groups entries by board size then pruning mode
pub fn summarize(entries: &[MetricsLogEntry], filter: &ReportFilter) -> Vec<GroupStats> {
    let mut groups: BTreeMap<(usize, PruningMode), Vec<&MetricsLogEntry>> = BTreeMap::new();
    for entry in entries.iter().filter(|e| filter.matches(e)) {
        groups
            .entry((entry.metric.board_size, entry.metric.pruning_mode))
            .or_default()
            .push(entry);
    }

    groups
        .into_iter()
        .map(|((board_size, pruning_mode), rows)| {
            let moves = rows.len();
            let total_time: f64 = rows.iter().map(|r| r.metric.time_taken_ms).sum();
            let total_memory: f64 = rows.iter().map(|r| r.metric.memory_used_kb).sum();
            let max_time_ms = rows
                .iter()
                .map(|r| r.metric.time_taken_ms)
                .fold(0.0, f64::max);
            let timeouts = rows.iter().filter(|r| r.metric.timed_out).count();

            // One outcome per session; rows of a session share the result code
            let mut outcomes: HashMap<&str, Option<GameOutcome>> = HashMap::new();
            for row in &rows {
                outcomes
                    .entry(row.metric.session_id.as_str())
                    .or_insert_with(|| row.metric.outcome());
            }
            let count = |wanted: GameOutcome| {
                outcomes
                    .values()
                    .filter(|o| **o == Some(wanted))
                    .count()
            };

            GroupStats {
                board_size,
                pruning_mode,
                moves,
                sessions: outcomes.len(),
                mean_time_ms: total_time / moves as f64,
                max_time_ms,
                mean_memory_kb: total_memory / moves as f64,
                timeouts,
                human_wins: count(GameOutcome::HumanWin),
                computer_wins: count(GameOutcome::ComputerWin),
                draws: count(GameOutcome::Draw),
            }
        })
        .collect()
}

/// Prints a report of grouped statistics
pub fn print_report(stats: &[GroupStats]) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("                    SEARCH METRICS REPORT");
    println!("═══════════════════════════════════════════════════════════");

    if stats.is_empty() {
        println!("No matching metrics.\n");
        return;
    }

    let total_moves: usize = stats.iter().map(|s| s.moves).sum();
    let total_sessions: usize = stats.iter().map(|s| s.sessions).sum();
    println!("Sessions:       {}", total_sessions);
    println!("Move Rows:      {}", total_moves);
    println!("═══════════════════════════════════════════════════════════\n");

    for group in stats {
        println!(
            "{}x{} {} ({} sessions, {} rows)",
            group.board_size, group.board_size, group.pruning_mode, group.sessions, group.moves
        );
        println!(
            "  Time:     {:.2}ms avg, {:.2}ms max",
            group.mean_time_ms, group.max_time_ms
        );
        println!("  Memory:   {:.2}KB avg", group.mean_memory_kb);
        println!("  Timeouts: {}", group.timeouts);
        println!(
            "  Outcomes: human {} / computer {} / draw {}\n",
            group.human_wins, group.computer_wins, group.draws
        );
    }
}
