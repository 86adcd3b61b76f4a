// Interactive terminal game against the minimax engine
//
// Usage:
//   cargo run --bin play -- [options]
//
// Options:
//   --size <N>        Board size, 3 to 10 (default: 3)
//   --mode <mode>     sequential or parallel (default: sequential)
//   --config <path>   Path to TicTacToe.toml (default: TicTacToe.toml)

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use tic_tac_toe_minimax::config::Config;
use tic_tac_toe_minimax::metrics::TrackingAllocator;
use tic_tac_toe_minimax::metrics_log::{MetricsLogger, MetricsSink};
use tic_tac_toe_minimax::session::GameSession;
use tic_tac_toe_minimax::types::{GameOutcome, PruningMode};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn print_usage() {
    eprintln!("Tic-Tac-Toe");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  play [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --size <N>              Board size, 3 to 10 (default: 3)");
    eprintln!("  --mode <MODE>           'sequential' or 'parallel' (default: sequential)");
    eprintln!("  --config <path>         Path to TicTacToe.toml (default: TicTacToe.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("You play X and move first. Enter moves as '<row> <col>', or 'q' to quit.");
}

/// Parses "<row> <col>" (comma or whitespace separated)
fn parse_move(line: &str) -> Result<(usize, usize), String> {
    let parts: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 2 {
        return Err(format!("Expected '<row> <col>', got '{}'", line.trim()));
    }

    let row = parts[0]
        .parse::<usize>()
        .map_err(|e| format!("Invalid row '{}': {}", parts[0], e))?;
    let col = parts[1]
        .parse::<usize>()
        .map_err(|e| format!("Invalid column '{}': {}", parts[1], e))?;
    Ok((row, col))
}

fn main() {
    // Search logs go to stderr; keep them quiet unless asked for
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let mut size = 3;
    let mut mode = PruningMode::Sequential;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--size", Some(v)) => {
                size = v.parse::<usize>().unwrap_or_else(|e| {
                    eprintln!("Error: invalid board size '{}': {}", v, e);
                    process::exit(1)
                });
            }
            ("--mode", Some(v)) => {
                mode = v.parse::<PruningMode>().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1)
                });
            }
            ("--config", Some(v)) => {
                config_path = Some(v.clone());
            }
            (flag, None) if flag.starts_with("--") => {
                eprintln!("Error: {} requires an argument", flag);
                process::exit(1);
            }
            (other, _) => {
                eprintln!("Error: Unknown option '{}'", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 2;
    }

    let config = Config::load_from_or_default(config_path.as_deref());
    let sink = MetricsLogger::new(config.metrics.enabled, &config.metrics.log_file_path);

    let mut session = match GameSession::new(size, mode, &config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!(
        "{}x{} board, {} in a row wins, {} search to depth {}",
        size,
        size,
        session.win_length(),
        mode,
        session.depth_limit()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.is_terminal().is_over() {
        println!("\n{}", session.board());
        print!("Your move (row col): ");
        if io::stdout().flush().is_err() {
            break;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        let (row, col) = match parse_move(&line) {
            Ok(m) => m,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if !session.submit_human_move(row, col) {
            println!("({}, {}) is not available", row, col);
            continue;
        }
        if session.is_terminal().is_over() {
            break;
        }

        match session.computer_move() {
            Ok(pos) => println!("Computer plays {}", pos),
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    println!("\n{}", session.board());
    match session.outcome() {
        Some(GameOutcome::HumanWin) => println!("You win!"),
        Some(GameOutcome::ComputerWin) => println!("Computer wins!"),
        Some(GameOutcome::Draw) => println!("It's a draw!"),
        None => {
            println!("Game abandoned");
            return;
        }
    }

    sink.record(&session.drain_metrics());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("1 2"), Ok((1, 2)));
        assert_eq!(parse_move(" 0,3 \n"), Ok((0, 3)));
        assert!(parse_move("1").is_err());
        assert!(parse_move("a b").is_err());
    }
}
