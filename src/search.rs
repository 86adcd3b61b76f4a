//! Depth- and time-bounded minimax with alpha-beta pruning
//!
//! The computer maximizes and the human minimizes. Every root candidate gets
//! its own fresh window and its own soft deadline. Each recursive call checks,
//! in this order:
//! 1. the deadline has passed → 0
//! 2. the position is won, lost or drawn → +10 / -10 / 0
//! 3. the depth limit is reached → 0
//!
//! Children are expanded row-major and the root keeps the first candidate that
//! strictly improves the best score, so ties go to the top-left-most cell.

use log::{debug, info};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::time::{Duration, Instant};

use crate::board::{Board, DRAW_SCORE};
use crate::config::Config;
use crate::metrics::MemoryProbe;
use crate::types::{Player, Position, PruningMode};

/// Bounds applied to every root candidate's search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub timeout: Duration,
}

impl SearchLimits {
    /// Depth limit from the board-size table, timeout from `[search]`
    pub fn for_board(size: usize, config: &Config) -> Self {
        SearchLimits {
            max_depth: config.depth_limits.for_board_size(size),
            timeout: config.search.timeout(),
        }
    }
}

/// How the root candidates are actually evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecutionStrategy {
    /// One candidate after another on the calling thread
    Sequential,
    /// Candidates spread over the rayon pool, best move reduced under a lock
    ParallelRoot,
}

/// What happened while searching a single root candidate
#[derive(Debug, Clone)]
pub struct CandidateReport {
    pub position: Position,
    pub score: i32,
    pub elapsed: Duration,
    pub peak_memory_kb: f64,
    pub nodes: u64,
    pub cutoffs: u64,
    pub timed_out: bool,
}

/// Result of a full root search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// None only when the board had no empty cell
    pub best_move: Option<Position>,
    pub best_score: i32,
    /// One report per empty cell, in row-major order
    pub candidates: Vec<CandidateReport>,
}

#[derive(Debug, Clone)]
pub struct Searcher {
    limits: SearchLimits,
    mode: PruningMode,
    min_cpus_for_parallel: usize,
}

impl Searcher {
    pub fn new(limits: SearchLimits, mode: PruningMode, min_cpus_for_parallel: usize) -> Self {
        Searcher {
            limits,
            mode,
            min_cpus_for_parallel,
        }
    }

    pub fn from_config(size: usize, mode: PruningMode, config: &Config) -> Self {
        Self::new(
            SearchLimits::for_board(size, config),
            mode,
            config.strategy.min_cpus_for_parallel,
        )
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Chooses the computer's move on `board`.
    ///
    /// The board is handed back unchanged; all speculative placements are undone.
    pub fn get_best_move(&self, board: &mut Board) -> SearchOutcome {
        let start_time = Instant::now();
        let strategy = self.determine_strategy();

        let outcome = match strategy {
            ExecutionStrategy::Sequential => self.sequential_search(board),
            ExecutionStrategy::ParallelRoot => self.parallel_search(board),
        };

        let nodes: u64 = outcome.candidates.iter().map(|c| c.nodes).sum();
        let timeouts = outcome.candidates.iter().filter(|c| c.timed_out).count();
        match outcome.best_move {
            Some(best) => info!(
                "{:?} search on {}x{} (depth {}): chose {} score {} after {} candidates, {} nodes, {} timeouts, {}ms",
                strategy,
                board.size(),
                board.size(),
                self.limits.max_depth,
                best,
                outcome.best_score,
                outcome.candidates.len(),
                nodes,
                timeouts,
                start_time.elapsed().as_millis()
            ),
            None => info!("No empty cell left to search"),
        }

        outcome
    }

    fn determine_strategy(&self) -> ExecutionStrategy {
        match self.mode {
            PruningMode::Sequential => ExecutionStrategy::Sequential,
            PruningMode::Parallel => {
                let cpus = rayon::current_num_threads();
                if cpus >= self.min_cpus_for_parallel {
                    ExecutionStrategy::ParallelRoot
                } else {
                    info!(
                        "Parallel mode requested but only {} threads available (need {}), searching sequentially",
                        cpus, self.min_cpus_for_parallel
                    );
                    ExecutionStrategy::Sequential
                }
            }
        }
    }

    fn sequential_search(&self, board: &mut Board) -> SearchOutcome {
        let mut best_move = None;
        let mut best_score = i32::MIN;
        let mut candidates = Vec::new();

        for pos in board.empty_positions() {
            let report = Self::evaluate_candidate(self.limits, board, pos);
            if report.score > best_score {
                best_score = report.score;
                best_move = Some(pos);
            }
            candidates.push(report);
        }

        SearchOutcome {
            best_move,
            best_score,
            candidates,
        }
    }

    fn parallel_search(&self, board: &Board) -> SearchOutcome {
        let positions = board.empty_positions();
        let limits = self.limits;
        // (row-major index, score) of the best candidate so far
        let best: Mutex<Option<(usize, i32)>> = Mutex::new(None);

        let candidates: Vec<CandidateReport> = positions
            .par_iter()
            .enumerate()
            .map(|(order, &pos)| {
                let mut local = board.clone();
                let report = Self::evaluate_candidate(limits, &mut local, pos);

                let mut leader = best.lock();
                let improves = match *leader {
                    None => true,
                    Some((best_order, best_score)) => {
                        report.score > best_score
                            || (report.score == best_score && order < best_order)
                    }
                };
                if improves {
                    *leader = Some((order, report.score));
                }

                report
            })
            .collect();

        match best.into_inner() {
            Some((order, score)) => SearchOutcome {
                best_move: Some(positions[order]),
                best_score: score,
                candidates,
            },
            None => SearchOutcome {
                best_move: None,
                best_score: i32::MIN,
                candidates,
            },
        }
    }

    fn evaluate_candidate(limits: SearchLimits, board: &mut Board, pos: Position) -> CandidateReport {
        let probe = MemoryProbe::start();
        let mut search = AlphaBeta::new(limits);

        let score = {
            let mut placed = board.speculate(pos, Player::Computer);
            search.minimax(&mut placed, 0, false, i32::MIN, i32::MAX)
        };

        let report = CandidateReport {
            position: pos,
            score,
            elapsed: search.started.elapsed(),
            peak_memory_kb: probe.peak_kb(),
            nodes: search.nodes,
            cutoffs: search.cutoffs,
            timed_out: search.timed_out,
        };

        debug!(
            "Candidate {}: score {} ({} nodes, {} cutoffs, timed out: {}, {}µs)",
            report.position,
            report.score,
            report.nodes,
            report.cutoffs,
            report.timed_out,
            report.elapsed.as_micros()
        );

        report
    }
}

/// Recursive minimax state for one root candidate
struct AlphaBeta {
    limits: SearchLimits,
    started: Instant,
    nodes: u64,
    cutoffs: u64,
    timed_out: bool,
}

impl AlphaBeta {
    fn new(limits: SearchLimits) -> Self {
        AlphaBeta {
            limits,
            started: Instant::now(),
            nodes: 0,
            cutoffs: 0,
            timed_out: false,
        }
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if self.started.elapsed() > self.limits.timeout {
            self.timed_out = true;
            return DRAW_SCORE;
        }

        let score = board.evaluate();
        if score != DRAW_SCORE || board.is_full() {
            return score;
        }

        if depth >= self.limits.max_depth {
            return DRAW_SCORE;
        }

        let mover = if maximizing {
            Player::Computer
        } else {
            Player::Human
        };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let n = board.size();

        'rows: for row in 0..n {
            for col in 0..n {
                let pos = Position::new(row, col);
                if !board.is_empty_at(pos) {
                    continue;
                }

                let score = {
                    let mut placed = board.speculate(pos, mover);
                    self.minimax(&mut placed, depth + 1, !maximizing, alpha, beta)
                };

                if maximizing {
                    best = best.max(score);
                    alpha = alpha.max(best);
                } else {
                    best = best.min(score);
                    beta = beta.min(best);
                }

                if beta <= alpha {
                    self.cutoffs += 1;
                    break 'rows;
                }
            }
        }

        best
    }
}
