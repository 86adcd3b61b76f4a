// Game service behind the HTTP front end
//
// The Bot owns every live session and the metrics sink. Each session sits
// behind its own lock, so one game is never driven from two threads, while
// different games proceed independently. The CPU-bound search runs on tokio's
// blocking pool so the async executor is never stalled.

use log::info;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::GameError;
use crate::metrics_log::{MetricsLogger, MetricsSink};
use crate::session::GameSession;
use crate::types::{NewGameRequest, Position};

type SharedSession = Arc<Mutex<GameSession>>;

/// Tic-Tac-Toe service with methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    sessions: Mutex<HashMap<String, SharedSession>>,
    sink: Arc<dyn MetricsSink>,
}

impl Bot {
    /// Creates a new Bot writing metrics where the configuration says
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let logger = MetricsLogger::new(config.metrics.enabled, &config.metrics.log_file_path);
        Self::with_sink(config, Arc::new(logger))
    }

    /// Creates a Bot that reports finished games to `sink`
    pub fn with_sink(config: Config, sink: Arc<dyn MetricsSink>) -> Self {
        Bot {
            config,
            sessions: Mutex::new(HashMap::new()),
            sink,
        }
    }

    /// Returns service metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "game": "tic-tac-toe",
            "min_size": self.config.board.min_size,
            "max_size": self.config.board.max_size,
            "pruning_modes": ["Sequential", "Parallel"],
        })
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Starts a game
    /// Corresponds to POST /games endpoint
    pub fn new_game(&self, request: &NewGameRequest) -> Result<Value, GameError> {
        let session = GameSession::new(request.size, request.pruning_mode, &self.config)?;
        let summary = Self::describe(&session);

        self.sessions
            .lock()
            .insert(session.id().to_string(), Arc::new(Mutex::new(session)));

        Ok(summary)
    }

    /// Current board and status of a game
    /// Corresponds to GET /games/<id> endpoint
    pub fn state(&self, id: &str) -> Result<Value, GameError> {
        let session = self.session(id)?;
        let game = session.lock();
        Ok(Self::describe(&game))
    }

    /// Applies the human move and, if the game goes on, the computer's reply.
    /// A game that ends on this turn is removed once its metrics are flushed.
    /// Corresponds to POST /games/<id>/move endpoint
    pub async fn play_turn(&self, id: &str, row: usize, col: usize) -> Result<Value, GameError> {
        let session = self.session(id)?;
        let sink = self.sink.clone();

        let response = tokio::task::spawn_blocking(move || {
            Self::play_turn_blocking(&session, sink.as_ref(), row, col)
        })
        .await
        .map_err(|e| GameError::SearchTask(e.to_string()))??;

        if response["over"] == true {
            self.sessions.lock().remove(id);
            info!(
                "Session {} finished, {} still active",
                id,
                self.active_sessions()
            );
        }

        Ok(response)
    }

    /// Discards a game; metrics of unfinished games are dropped
    /// Corresponds to DELETE /games/<id> endpoint
    pub fn end(&self, id: &str) -> Result<Value, GameError> {
        let session = self
            .sessions
            .lock()
            .remove(id)
            .ok_or_else(|| GameError::UnknownSession(id.to_string()))?;

        let mut game = session.lock();
        let unreported = game.drain_metrics().len();
        info!(
            "GAME ENDED: session {} ({} unreported metrics dropped)",
            id, unreported
        );

        Ok(Self::describe(&game))
    }

    fn session(&self, id: &str) -> Result<SharedSession, GameError> {
        self.sessions
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::UnknownSession(id.to_string()))
    }

    fn play_turn_blocking(
        session: &Mutex<GameSession>,
        sink: &dyn MetricsSink,
        row: usize,
        col: usize,
    ) -> Result<Value, GameError> {
        let mut game = session.lock();
        let position = Position::new(row, col);

        if game.is_terminal().is_over() {
            return Err(GameError::GameOver);
        }
        if !game.board().in_bounds(position) {
            return Err(GameError::OutOfBounds {
                position,
                size: game.size(),
            });
        }
        if !game.submit_human_move(row, col) {
            return Err(GameError::CellOccupied { position });
        }

        let computer_move = if game.is_terminal().is_over() {
            None
        } else {
            Some(game.computer_move()?)
        };

        if game.is_terminal().is_over() {
            let metrics = game.drain_metrics();
            info!(
                "Session {}: reporting {} metrics to sink",
                game.id(),
                metrics.len()
            );
            sink.record(&metrics);
        }

        let mut response = Self::describe(&game);
        response["human_move"] = json!(position);
        response["computer_move"] = json!(computer_move);
        Ok(response)
    }

    fn describe(game: &GameSession) -> Value {
        let terminal = game.is_terminal();
        json!({
            "id": game.id(),
            "size": game.size(),
            "win_length": game.win_length(),
            "pruning_mode": game.pruning_mode(),
            "depth_limit": game.depth_limit(),
            "board": game.board().rows(),
            "over": terminal.is_over(),
            "winner": terminal.winner,
            "outcome": terminal.outcome().map(|o| o.as_str()),
        })
    }
}
