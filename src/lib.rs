// Library exports for the Tic-Tac-Toe engine
// This allows the server, the terminal game and the report tool to share the core logic

pub mod board;
pub mod bot;
pub mod config;
pub mod error;
pub mod metrics;
pub mod metrics_log;
pub mod report;
pub mod search;
pub mod session;
pub mod types;
