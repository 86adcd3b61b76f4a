//! A single human-vs-computer game and the metrics it produces

use log::{debug, info};
use rand::Rng;

use crate::board::Board;
use crate::config::Config;
use crate::error::GameError;
use crate::metrics::{duration_ms, MoveMetric};
use crate::search::{SearchOutcome, Searcher};
use crate::types::{GameOutcome, Player, Position, PruningMode, TerminalState};

const SESSION_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SESSION_ID_LENGTH: usize = 11;

/// Opaque token correlating the metric rows of one game
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    (0..SESSION_ID_LENGTH)
        .map(|_| SESSION_ID_ALPHABET[rng.random_range(0..SESSION_ID_ALPHABET.len())] as char)
        .collect()
}

/// Owns the board, the search settings and the metric log of one game.
///
/// Not internally synchronized: drive a session from one thread at a time.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: String,
    board: Board,
    pruning_mode: PruningMode,
    searcher: Searcher,
    metrics: Vec<MoveMetric>,
    outcome: Option<GameOutcome>,
}

impl GameSession {
    /// Starts a game on an empty `size`×`size` board
    pub fn new(size: usize, pruning_mode: PruningMode, config: &Config) -> Result<Self, GameError> {
        if !config.board.accepts(size) {
            return Err(GameError::InvalidBoardSize {
                size,
                min: config.board.min_size,
                max: config.board.max_size,
            });
        }

        let session = GameSession {
            id: generate_session_id(),
            board: Board::new(size),
            pruning_mode,
            searcher: Searcher::from_config(size, pruning_mode, config),
            metrics: Vec::new(),
            outcome: None,
        };

        info!(
            "Session {}: new {}x{} game ({}, depth limit {})",
            session.id,
            size,
            size,
            pruning_mode,
            session.depth_limit()
        );

        Ok(session)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn win_length(&self) -> usize {
        self.board.win_length()
    }

    pub fn pruning_mode(&self) -> PruningMode {
        self.pruning_mode
    }

    pub fn depth_limit(&self) -> u8 {
        self.searcher.limits().max_depth
    }

    /// Final outcome once the game has ended
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Metrics captured so far and not yet drained
    pub fn metrics(&self) -> &[MoveMetric] {
        &self.metrics
    }

    /// Places the human's mark. Returns false, leaving the board untouched, if
    /// the cell is occupied or off the board or the game is already over.
    pub fn submit_human_move(&mut self, row: usize, col: usize) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        if !self.board.place(row, col, Player::Human) {
            debug!("Session {}: rejected human move ({}, {})", self.id, row, col);
            return false;
        }
        self.settle();
        true
    }

    pub fn is_terminal(&self) -> TerminalState {
        let winner = if self.board.is_winner(Player::Human) {
            Some(Player::Human)
        } else if self.board.is_winner(Player::Computer) {
            Some(Player::Computer)
        } else {
            None
        };

        TerminalState {
            winner,
            draw: winner.is_none() && self.board.is_full(),
        }
    }

    /// Searches for and plays the computer's reply
    ///
    /// # Errors
    /// `GameError::GameOver` if the game is already decided or the board is full.
    pub fn computer_move(&mut self) -> Result<Position, GameError> {
        if self.is_terminal().is_over() {
            return Err(GameError::GameOver);
        }

        let outcome = self.searcher.get_best_move(&mut self.board);
        self.record(&outcome);

        let best = outcome.best_move.ok_or(GameError::GameOver)?;
        self.board.place(best.row, best.col, Player::Computer);
        self.settle();

        Ok(best)
    }

    /// Hands over every captured metric, leaving the session's log empty
    pub fn drain_metrics(&mut self) -> Vec<MoveMetric> {
        std::mem::take(&mut self.metrics)
    }

    fn record(&mut self, outcome: &SearchOutcome) {
        for candidate in &outcome.candidates {
            self.metrics.push(MoveMetric {
                session_id: self.id.clone(),
                board_size: self.board.size(),
                pruning_mode: self.pruning_mode,
                position: candidate.position,
                score: candidate.score,
                time_taken_ms: duration_ms(candidate.elapsed),
                memory_used_kb: candidate.peak_memory_kb,
                nodes: candidate.nodes,
                cutoffs: candidate.cutoffs,
                timed_out: candidate.timed_out,
                result: None,
            });
        }
    }

    /// Stamps the result code on the metric log once the game ends
    fn settle(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(outcome) = self.is_terminal().outcome() {
            info!("Session {}: game over ({})", self.id, outcome.as_str());
            for metric in &mut self.metrics {
                metric.finalize(outcome);
            }
            self.outcome = Some(outcome);
        }
    }
}
