//! Command-line surface of the `sabacc` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sabacc", version, about = "Sabacc against the dealer, in the terminal")]
pub struct SabaccCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play interactive games against the dealer
    Play {
        /// Number of games to play
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        games: Option<u32>,
        /// Seed for the first game; later games use seed + n
        #[arg(long)]
        seed: Option<u64>,
        /// Dealer policy (defaults to the configured ai_version)
        #[arg(long)]
        ai: Option<String>,
    },
    /// Autoplay many games and write their records as JSONL
    Sim {
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        games: u64,
        /// Destination file; records are appended
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        /// Total below which the autopilot keeps drawing
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=23))]
        threshold: Option<i32>,
    },
    /// Deal one game and show both opening hands
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Summarize JSONL game records (a file or a directory of them)
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
    /// Print a sample from the seeded random source
    Rng {
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Play { .. } => "play",
            Commands::Sim { .. } => "sim",
            Commands::Deal { .. } => "deal",
            Commands::Stats { .. } => "stats",
            Commands::Cfg => "cfg",
            Commands::Rng { .. } => "rng",
        }
    }
}
