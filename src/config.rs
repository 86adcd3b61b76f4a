// Configuration module for reading TicTacToe.toml
// Holds the search budget, depth table, board bounds and metrics sink settings

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Smallest board the engine plays on
pub const MIN_BOARD_SIZE: usize = 3;
/// Largest board the engine plays on
pub const MAX_BOARD_SIZE: usize = 10;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub depth_limits: DepthLimitsConfig,
    pub board: BoardConfig,
    pub strategy: StrategyConfig,
    pub metrics: MetricsConfig,
}

/// Search time budget
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub timeout_ms: u64,
}

impl SearchConfig {
    /// Soft deadline applied to each root candidate
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Maximum search ply per board size band
#[derive(Debug, Deserialize, Clone)]
pub struct DepthLimitsConfig {
    pub small_board: u8,
    pub medium_board: u8,
    pub large_board: u8,
    pub huge_board: u8,
}

impl DepthLimitsConfig {
    /// Maps a board size to its depth limit
    ///
    /// Larger boards get shallower searches since exhaustive search is infeasible there.
    pub fn for_board_size(&self, size: usize) -> u8 {
        match size {
            0..=3 => self.small_board,
            4..=5 => self.medium_board,
            6 => self.large_board,
            _ => self.huge_board,
        }
    }
}

/// Accepted board dimensions
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub min_size: usize,
    pub max_size: usize,
}

impl BoardConfig {
    pub fn accepts(&self, size: usize) -> bool {
        (self.min_size..=self.max_size).contains(&size)
    }

    /// Narrows the configured bounds to the sizes the engine supports
    fn clamp_to_supported(&mut self) {
        let min = self.min_size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        let max = self.max_size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        if (min, max) != (self.min_size, self.max_size) {
            log::warn!(
                "Board bounds {}..={} outside supported {}..={}, using {}..={}",
                self.min_size,
                self.max_size,
                MIN_BOARD_SIZE,
                MAX_BOARD_SIZE,
                min,
                max
            );
        }
        self.min_size = min;
        self.max_size = max;
    }
}

/// Strategy selection constants
#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    pub min_cpus_for_parallel: usize,
}

/// Metrics sink configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TicTacToe.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text; board bounds are clamped to 3..=10
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let mut config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.board.clamp_to_supported();
        Ok(config)
    }

    /// Loads default configuration from TicTacToe.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("TicTacToe.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in TicTacToe.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig { timeout_ms: 2000 },
            depth_limits: DepthLimitsConfig {
                small_board: 9,
                medium_board: 4,
                large_board: 3,
                huge_board: 2,
            },
            board: BoardConfig {
                min_size: MIN_BOARD_SIZE,
                max_size: MAX_BOARD_SIZE,
            },
            strategy: StrategyConfig {
                min_cpus_for_parallel: 2,
            },
            metrics: MetricsConfig {
                enabled: true,
                log_file_path: "tic_tac_toe_metrics.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load TicTacToe.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }

    /// Loads from an explicit path when given, otherwise the default file
    pub fn load_from_or_default(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::from_file(p).unwrap_or_else(|e| {
                log::warn!("Could not load {} ({}), using hardcoded defaults", p, e);
                Self::default_hardcoded()
            }),
            None => Self::load_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_table_matches_board_bands() {
        let depth = Config::default_hardcoded().depth_limits;
        assert_eq!(depth.for_board_size(3), 9);
        assert_eq!(depth.for_board_size(4), 4);
        assert_eq!(depth.for_board_size(5), 4);
        assert_eq!(depth.for_board_size(6), 3);
        assert_eq!(depth.for_board_size(7), 2);
        assert_eq!(depth.for_board_size(10), 2);
    }

    #[test]
    fn test_board_bounds() {
        let board = Config::default_hardcoded().board;
        assert!(!board.accepts(2));
        assert!(board.accepts(3));
        assert!(board.accepts(10));
        assert!(!board.accepts(11));
    }

    #[test]
    fn test_board_bounds_from_file_are_clamped() {
        let contents = fs::read_to_string("TicTacToe.toml").expect("TicTacToe.toml should exist");
        let widened = contents
            .replace("min_size = 3", "min_size = 0")
            .replace("max_size = 10", "max_size = 30");

        let config = Config::from_toml_str(&widened).unwrap();
        assert_eq!(config.board.min_size, MIN_BOARD_SIZE);
        assert_eq!(config.board.max_size, MAX_BOARD_SIZE);
        assert!(!config.board.accepts(0));
        assert!(!config.board.accepts(30));

        let narrowed = contents.replace("max_size = 10", "max_size = 5");
        let config = Config::from_toml_str(&narrowed).unwrap();
        assert!(config.board.accepts(5));
        assert!(!config.board.accepts(6));
    }

    #[test]
    fn test_timeout_conversion() {
        let config = Config::default_hardcoded();
        assert_eq!(config.search.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_toml_can_be_parsed() {
        let result = Config::from_file("TicTacToe.toml");
        assert!(
            result.is_ok(),
            "Failed to parse TicTacToe.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config =
            Config::from_file("TicTacToe.toml").expect("TicTacToe.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(file_config.search.timeout_ms, hardcoded.search.timeout_ms);

        assert_eq!(
            file_config.depth_limits.small_board,
            hardcoded.depth_limits.small_board
        );
        assert_eq!(
            file_config.depth_limits.medium_board,
            hardcoded.depth_limits.medium_board
        );
        assert_eq!(
            file_config.depth_limits.large_board,
            hardcoded.depth_limits.large_board
        );
        assert_eq!(
            file_config.depth_limits.huge_board,
            hardcoded.depth_limits.huge_board
        );

        assert_eq!(file_config.board.min_size, hardcoded.board.min_size);
        assert_eq!(file_config.board.max_size, hardcoded.board.max_size);

        assert_eq!(
            file_config.strategy.min_cpus_for_parallel,
            hardcoded.strategy.min_cpus_for_parallel
        );

        assert_eq!(file_config.metrics.enabled, hardcoded.metrics.enabled);
        assert_eq!(
            file_config.metrics.log_file_path,
            hardcoded.metrics.log_file_path
        );
    }

    #[test]
    fn test_missing_file_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_path_falls_back() {
        let config = Config::load_from_or_default(Some("nonexistent.toml"));
        assert_eq!(config.search.timeout_ms, 2000);
    }
}
