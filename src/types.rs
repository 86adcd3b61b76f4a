// Core game types and HTTP API bodies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// State of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Human,
    Computer,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Human => 'X',
            Cell::Computer => 'O',
        }
    }
}

/// The two sides of a game. The human always plays X and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Human,
    Computer,
}

impl Player {
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Human => Cell::Human,
            Player::Computer => Cell::Computer,
        }
    }
}

/// Zero-based board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Search execution strategy requested for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PruningMode {
    /// Root candidates evaluated one after another on the calling thread
    #[serde(alias = "sequential")]
    Sequential,
    /// Root candidates split across the rayon pool
    #[serde(alias = "parallel")]
    Parallel,
}

impl PruningMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PruningMode::Sequential => "Sequential",
            PruningMode::Parallel => "Parallel",
        }
    }
}

impl FromStr for PruningMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(PruningMode::Sequential),
            "parallel" => Ok(PruningMode::Parallel),
            _ => Err(format!("Invalid pruning mode: {}", s)),
        }
    }
}

impl fmt::Display for PruningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of a game, encoded as the metrics result code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    HumanWin,
    ComputerWin,
    Draw,
}

impl GameOutcome {
    /// 0 = human win, 1 = computer win, 2 = draw
    pub fn code(self) -> u8 {
        match self {
            GameOutcome::HumanWin => 0,
            GameOutcome::ComputerWin => 1,
            GameOutcome::Draw => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GameOutcome::HumanWin),
            1 => Some(GameOutcome::ComputerWin),
            2 => Some(GameOutcome::Draw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameOutcome::HumanWin => "human_win",
            GameOutcome::ComputerWin => "computer_win",
            GameOutcome::Draw => "draw",
        }
    }
}

/// Answer to "is the game over?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TerminalState {
    pub winner: Option<Player>,
    pub draw: bool,
}

impl TerminalState {
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.draw
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match (self.winner, self.draw) {
            (Some(Player::Human), _) => Some(GameOutcome::HumanWin),
            (Some(Player::Computer), _) => Some(GameOutcome::ComputerWin),
            (None, true) => Some(GameOutcome::Draw),
            (None, false) => None,
        }
    }
}

/// POST /games request body
#[derive(Deserialize, Serialize, Debug)]
pub struct NewGameRequest {
    pub size: usize,
    pub pruning_mode: PruningMode,
}

/// POST /games/<id>/move request body
#[derive(Deserialize, Serialize, Debug)]
pub struct MoveRequest {
    pub row: usize,
    pub col: usize,
}
