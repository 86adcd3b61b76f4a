// Standalone report tool for the JSONL search metrics log
//
// Usage:
//   cargo run --bin metrics_report -- <log_file> [options]
//
// Options:
//   --size <N>             Only include N×N games
//   --mode <mode>          Only include Sequential or Parallel games

use std::env;
use std::process;

use tic_tac_toe_minimax::report::{self, ReportFilter};
use tic_tac_toe_minimax::types::PruningMode;

fn print_usage() {
    eprintln!("Tic-Tac-Toe Metrics Report");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  metrics_report <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --size <N>              Only include N×N games");
    eprintln!("  --mode <MODE>           Only include 'sequential' or 'parallel' games");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Summarize everything");
    eprintln!("  metrics_report tic_tac_toe_metrics.jsonl");
    eprintln!();
    eprintln!("  # Only parallel 4x4 games");
    eprintln!("  metrics_report tic_tac_toe_metrics.jsonl --size 4 --mode parallel");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut filter = ReportFilter::default();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--size" => {
                let value = args.get(i + 1).unwrap_or_else(|| {
                    eprintln!("Error: --size requires an argument");
                    process::exit(1)
                });
                match value.parse::<usize>() {
                    Ok(size) => filter.board_size = Some(size),
                    Err(e) => {
                        eprintln!("Error: invalid board size '{}': {}", value, e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--mode" => {
                let value = args.get(i + 1).unwrap_or_else(|| {
                    eprintln!("Error: --mode requires an argument");
                    process::exit(1)
                });
                match value.parse::<PruningMode>() {
                    Ok(mode) => filter.pruning_mode = Some(mode),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let entries = match report::load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Metrics log file: {}", log_file);
    println!("Loaded {} entries", entries.len());

    let stats = report::summarize(&entries, &filter);
    report::print_report(&stats);
}
