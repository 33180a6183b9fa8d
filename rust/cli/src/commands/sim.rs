//! Simulation command: autoplay many games and record them.
//!
//! The player seat is driven by the threshold autopilot, the dealer by the
//! configured policy. Game `n` uses `seed + n`. With `--output`, every game
//! is appended to a JSONL file as a [`GameRecord`](sabacc_engine::logger::GameRecord).
//!
//! # Environment Variables
//!
//! - `SABACC_SIM_BREAK_AFTER`: stop after N games and exit as interrupted

use crate::commands::{dealer_for, load_config};
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;
use sabacc_ai::PlayerPolicy;
use sabacc_ai::autopilot::ThresholdPlayer;
use sabacc_engine::coin::{CoinToss, RandomCoin};
use sabacc_engine::dealer::DealerPolicy;
use sabacc_engine::engine::Engine;
use sabacc_engine::game::{GameConfig, Phase, Resolution};
use sabacc_engine::logger::GameLogger;
use sabacc_engine::player::{PlayerAction, Side};
use std::io::Write;
use std::path::PathBuf;

pub const BREAK_AFTER_ENV: &str = "SABACC_SIM_BREAK_AFTER";

// The autopilot always stands eventually; this only guards against a
// policy that keeps offering rejected actions.
const MAX_PLAYER_STEPS: usize = 32;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimSummary {
    pub games: u64,
    pub player_wins: u64,
    pub dealer_wins: u64,
    pub coin_tosses: u64,
    pub shifts: u64,
}

/// Handle the sim command.
///
/// * `games` - number of games, at least 1
/// * `output` - JSONL file the records are appended to
/// * `seed` - base seed, falling back to the configured seed, then the OS
/// * `threshold` - autopilot draw threshold, falling back to the configuration
pub fn handle_sim_command(
    games: u64,
    output: Option<String>,
    seed: Option<u64>,
    threshold: Option<i32>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }
    let cfg = load_config(err)?;
    let dealer = dealer_for(&cfg.ai_version, err)?;
    let pilot = ThresholdPlayer::new(threshold.unwrap_or(cfg.player_threshold));
    let base_seed = seed.or(cfg.seed).unwrap_or_else(rand::random);

    let mut logger = match output.map(PathBuf::from) {
        Some(path) => {
            if path.to_string_lossy().ends_with(".zst") {
                let msg = "sim writes plain JSONL; compress the file afterwards";
                ui::write_error(err, msg)?;
                return Err(CliError::InvalidInput(msg.to_string()));
            }
            if let Err(e) = ensure_parent_dir(&path) {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
            match GameLogger::append(&path) {
                Ok(logger) => Some(logger),
                Err(e) => {
                    ui::write_error(err, &format!("Failed to open output file: {}", e))?;
                    return Err(CliError::Io(e));
                }
            }
        }
        None => None,
    };

    let break_after = std::env::var(BREAK_AFTER_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok());

    let mut coin = RandomCoin::new_with_seed(base_seed.rotate_left(32));
    let mut summary = SimSummary::default();
    for n in 0..games {
        let engine = simulate_game(
            base_seed.wrapping_add(n),
            cfg.game_config(),
            &pilot,
            dealer.as_ref(),
            &mut coin,
        )?;
        tally(&mut summary, &engine);

        if let Some(logger) = logger.as_mut() {
            let mut record = engine.game_record(logger.next_id());
            record.meta = Some(serde_json::json!({
                "dealer": dealer.name(),
                "player": pilot.name(),
                "threshold": pilot.threshold(),
            }));
            logger.write(&record)?;
        }
        if let Some(limit) = break_after
            && summary.games == limit
            && summary.games < games
        {
            writeln!(out, "Interrupted: saved {}/{}", summary.games, games)?;
            return Err(CliError::Interrupted(format!(
                "saved {}/{}",
                summary.games, games
            )));
        }
    }

    writeln!(
        out,
        "Simulated: {} games (seed {}) player {} dealer {} coin tosses {} shifts {}",
        summary.games,
        base_seed,
        summary.player_wins,
        summary.dealer_wins,
        summary.coin_tosses,
        summary.shifts
    )?;
    Ok(())
}

/// Plays one game to the end: autopilot turn, dealer turn, shift, coin toss.
pub fn simulate_game(
    seed: u64,
    config: GameConfig,
    pilot: &dyn PlayerPolicy,
    dealer: &dyn DealerPolicy,
    coin: &mut dyn CoinToss,
) -> Result<Engine, CliError> {
    let mut engine = Engine::with_config(Some(seed), config)?;
    let mut steps = 0;
    while engine.state().phase == Phase::PlayerTurn {
        let action = if steps < MAX_PLAYER_STEPS {
            pilot.next_action(engine.state())
        } else {
            PlayerAction::Stand
        };
        engine.apply_player_action(action)?;
        steps += 1;
    }
    engine.play_out(dealer, coin)?;
    Ok(engine)
}

fn tally(summary: &mut SimSummary, engine: &Engine) {
    summary.games += 1;
    if let Phase::Finished { winner, resolution } = engine.state().phase {
        match winner {
            Side::Player => summary.player_wins += 1,
            Side::Dealer => summary.dealer_wins += 1,
        }
        if matches!(resolution, Resolution::CoinToss(_)) {
            summary.coin_tosses += 1;
        }
    }
    if engine.shift_applied() {
        summary.shifts += 1;
    }
}
