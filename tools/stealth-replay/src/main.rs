//! stealth-replay: run a stealth scenario headlessly and print what happened.
//!
//! Usage:
//!   stealth-replay run --scenario courtyard.json
//!   stealth-replay run --scenario courtyard.json --events-only

mod scenario;

use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "stealth-replay: headless stealth scenario runner\n\
         \n\
         Commands:\n\
         \n\
         run       Run a scenario and print the event log and final snapshot as JSON\n\
         \n\
           --scenario <path>  Scenario JSON file\n\
           --events-only      Print only the event log\n\
         \n\
         Logging goes to stderr; set RUST_LOG=debug to trace spotter transitions.\n\
         \n\
         Examples:\n\
         \n\
           stealth-replay run --scenario tools/stealth-replay/scenarios/courtyard.json\n\
           RUST_LOG=stealth_ai=debug stealth-replay run --scenario courtyard.json --events-only\n"
    );
}

fn parse_scenario_path(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == "--scenario" && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let path = match parse_scenario_path(args) {
        Some(p) => p,
        None => {
            eprintln!("Error: --scenario <path> is required");
            process::exit(1);
        }
    };

    let scenario = match Scenario::from_file(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading {}: {e}", path.display());
            process::exit(1);
        }
    };

    let report = match scenario.run() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error running scenario: {e}");
            process::exit(1);
        }
    };

    let output = if has_flag(args, "--events-only") {
        serde_json::to_string_pretty(&report.events)
    } else {
        serde_json::to_string_pretty(&report)
    };
    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing report: {e}");
            process::exit(1);
        }
    }
}
