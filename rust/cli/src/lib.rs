//! # Sabacc CLI Library
//!
//! Terminal front-end for the Sabacc engine. The binary is a thin wrapper
//! around [`run`], which parses arguments and dispatches to a subcommand.
//!
//! ## Available Subcommands
//!
//! - `play`: Play interactive games against the dealer
//! - `sim`: Autoplay many games and record them as JSONL
//! - `deal`: Deal one game and show both opening hands
//! - `stats`: Summarize recorded games
//! - `cfg`: Show the resolved configuration
//! - `rng`: Print a sample from the seeded random source

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{Commands, SabaccCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_play_command, handle_rng_command,
    handle_sim_command, handle_stats_command,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "sim", "deal", "stats", "cfg", "rng"];

/// Parse `args` and run the chosen subcommand.
///
/// Returns the process exit code: `0` on success, `2` on any error and `130`
/// when interactive input closed mid-game.
///
/// ```
/// use std::io;
/// let args = vec!["sabacc", "deal", "--seed", "42"];
/// let code = sabacc_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match SabaccCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Play { games, seed, ai } => {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(games, seed, ai, out, err, &mut stdin_lock)
        }
        Commands::Sim {
            games,
            output,
            seed,
            threshold,
        } => handle_sim_command(games, output, seed, threshold, out, err),
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Rng { seed } => handle_rng_command(seed, out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            if writeln!(err, "Error: {}", e).is_err() {
                return exit_code::ERROR;
            }
            e.exit_code()
        }
    }
}

fn report_parse_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout and succeed.
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let mut usage = format!(
        "{}\nSabacc CLI\nUsage: sabacc <command> [options]\n\nCommands:\n",
        e
    );
    for c in COMMANDS {
        usage.push_str(&format!("  {}\n", c));
    }
    usage.push_str("\nFor full help, run: sabacc --help");
    let _ = writeln!(err, "{}", usage);
    exit_code::ERROR
}
