//! Headless Sabacc table
//!
//! Usage: cargo run -p sabacc_session --bin sabacc-table -- [--games N] [--seed S] [--fast]
//!
//! Prints every game event as a JSON line. `RUST_LOG` and `SABACC_LOG_FORMAT`
//! control the log output on stderr.

use sabacc_ai::autopilot::ThresholdPlayer;
use sabacc_session::{run_table, EventBus, Pacing, SessionConfig, SessionManager};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    sabacc_session::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let mut games = 1u32;
    let mut config = SessionConfig::default();
    let mut pacing = Pacing::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" | "-n" => {
                games = parse_value(&args, i, "--games");
                i += 2;
            }
            "--seed" | "-s" => {
                config.seed = Some(parse_value(&args, i, "--seed"));
                i += 2;
            }
            "--ai" => {
                config.ai_version = parse_value(&args, i, "--ai");
                i += 2;
            }
            "--fast" => {
                pacing = Pacing::immediate();
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_help();
                std::process::exit(1);
            }
        }
    }

    let manager = SessionManager::new(Arc::new(EventBus::new()), pacing);
    let player = ThresholdPlayer::default();
    let mut print_event = |event: &sabacc_session::GameEvent| match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("Error: cannot encode event: {}", e),
    };
    let summary = run_table(&manager, config, games, &player, &mut print_event).await?;

    eprintln!(
        "Table: {} games player {} dealer {}",
        summary.games, summary.player_wins, summary.dealer_wins
    );
    Ok(())
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let Some(raw) = args.get(i + 1) else {
        eprintln!("Error: {} requires a value", flag);
        std::process::exit(1);
    };
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value for {}: {}", flag, raw);
        std::process::exit(1);
    })
}

fn print_help() {
    println!("Headless Sabacc table");
    println!();
    println!("Usage: sabacc-table [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -n, --games <N>    Games to play (default: 1)");
    println!("  -s, --seed <S>     Seed for the first game; game n uses S + n");
    println!("      --ai <NAME>    Dealer policy (default: baseline)");
    println!("      --fast         Run continuations without pacing delays");
    println!("  -h, --help         Show this help");
}
