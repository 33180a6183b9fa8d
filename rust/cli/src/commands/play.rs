//! # Play Command
//!
//! Interactive Sabacc against the dealer. The player's turn is read from
//! stdin one line at a time; once the player stands, the dealer turn, the
//! shift roll and any coin toss run back to back and the result is printed.
//!
//! Seeds come from `--seed`, then the configured seed, then the OS. Game `n`
//! (0-based) of a session uses `seed + n`, so a run can be replayed exactly.

use crate::commands::{dealer_for, load_config};
use crate::error::CliError;
use crate::formatters::{
    format_action, format_choices, format_dealer_action, format_hand, format_result, format_table,
    format_total,
};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, parse_player_action};
use sabacc_engine::coin::{CoinToss, RandomCoin};
use sabacc_engine::dealer::DealerPolicy;
use sabacc_engine::engine::{ActionOutcome, Engine};
use sabacc_engine::game::Phase;
use sabacc_engine::player::Side;
use sabacc_engine::rules::legal_player_actions;
use std::io::{BufRead, Write};

#[derive(Debug, Default)]
struct Tally {
    player: u32,
    dealer: u32,
}

enum GameEnd {
    Finished(Side),
    Quit,
}

/// Play `games` games (default 1) against the dealer policy `ai` (default:
/// the configured `ai_version`).
pub fn handle_play_command(
    games: Option<u32>,
    seed: Option<u64>,
    ai: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = load_config(err)?;
    let games = games.unwrap_or(1);
    if games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }
    let dealer_name = ai.unwrap_or_else(|| cfg.ai_version.clone());
    let dealer = dealer_for(&dealer_name, err)?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let mut coin = RandomCoin::new_with_seed(seed.rotate_left(32));

    writeln!(
        out,
        "play: games={} seed={} dealer={}",
        games,
        seed,
        dealer.name()
    )?;

    let mut tally = Tally::default();
    for n in 0..games {
        writeln!(out, "\nGame {}", n + 1)?;
        let engine = Engine::with_config(Some(seed.wrapping_add(n as u64)), cfg.game_config())?;
        match play_game(engine, dealer.as_ref(), &mut coin, stdin, out, err)? {
            GameEnd::Finished(Side::Player) => tally.player += 1,
            GameEnd::Finished(Side::Dealer) => tally.dealer += 1,
            GameEnd::Quit => {
                writeln!(out, "Quit.")?;
                break;
            }
        }
    }

    writeln!(out, "\nScore: player {} - dealer {}", tally.player, tally.dealer)?;
    Ok(())
}

fn play_game(
    mut engine: Engine,
    dealer: &dyn DealerPolicy,
    coin: &mut dyn CoinToss,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<GameEnd, CliError> {
    while engine.state().phase == Phase::PlayerTurn {
        show_player_view(&engine, out)?;
        ui::prompt(out, &format_choices(&legal_player_actions(engine.state())))?;

        let Some(line) = read_stdin_line(stdin) else {
            return Err(CliError::Interrupted("input closed mid-game".to_string()));
        };
        match parse_player_action(&line) {
            ParseResult::Action(action) => match engine.apply_player_action(action)? {
                ActionOutcome::Applied => writeln!(out, "You: {}", format_action(&action))?,
                ActionOutcome::Ignored(reason) => {
                    ui::write_error(err, &format!("Invalid action: {}", reason))?
                }
            },
            ParseResult::Quit => return Ok(GameEnd::Quit),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }

    if let Some(report) = engine.run_dealer_turn(dealer)? {
        for step in &report.steps {
            writeln!(out, "Dealer {}", format_dealer_action(step))?;
        }
        if report.hit_cap {
            writeln!(out, "Dealer reached the action limit")?;
        }
    }
    if let Some(shift) = engine.run_shift()?
        && shift.applied
    {
        writeln!(out, "Sabacc Shift! Every unlocked card changed.")?;
    }
    if let Some(winner) = engine.settle_tie_break(coin)? {
        writeln!(out, "Tie. The coin lands for the {}.", winner)?;
    }

    let state = engine.state();
    writeln!(out, "{}", format_table(state))?;
    writeln!(out, "{}", state.message)?;
    match (state.phase, format_result(state)) {
        (Phase::Finished { winner, .. }, Some(line)) => {
            writeln!(out, "{}", line)?;
            Ok(GameEnd::Finished(winner))
        }
        _ => Err(CliError::Engine(format!(
            "game stopped in phase {}",
            state.phase
        ))),
    }
}

/// The player sees their own hand; the dealer's cards stay face down.
fn show_player_view(engine: &Engine, out: &mut dyn Write) -> std::io::Result<()> {
    let state = engine.state();
    writeln!(out, "{}", state.message)?;
    writeln!(
        out,
        "Your hand: {}  | {}",
        format_hand(&state.player),
        format_total(state.player.hand())
    )?;
    writeln!(
        out,
        "Dealer holds {} cards. Deck: {} cards",
        state.dealer.hand().len(),
        state.deck.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_play(input: &str, games: u32, seed: u64) -> (Result<(), CliError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(input.as_bytes().to_vec());
        let result = handle_play_command(
            Some(games),
            Some(seed),
            Some("baseline".into()),
            &mut out,
            &mut err,
            &mut stdin,
        );
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn standing_finishes_the_game() {
        let (result, out, _) = run_play("stand\n", 1, 42);
        assert!(result.is_ok());
        assert!(out.contains("You: stand"));
        assert!(out.contains("Winner: "));
        assert!(out.contains("Score: player"));
    }

    #[test]
    fn prompt_offers_only_legal_moves() {
        let (result, out, _) = run_play("lock 1\nstand\n", 1, 5);
        assert!(result.is_ok());
        assert!(out.contains("Action (draw / exchange <1|2> / lock <1|2> / stand / q): "));
        // The locked first card can no longer be exchanged or relocked.
        assert!(out.contains("Action (draw / exchange <2> / lock <2> / stand / q): "));
    }

    #[test]
    fn quit_stops_without_error() {
        let (result, out, _) = run_play("q\n", 3, 7);
        assert!(result.is_ok());
        assert!(out.contains("Quit."));
        assert!(!out.contains("Game 2"));
    }

    #[test]
    fn closed_input_is_an_interruption() {
        let (result, _, _) = run_play("draw\n", 1, 7);
        assert!(matches!(result, Err(CliError::Interrupted(_))));
    }

    #[test]
    fn bad_input_is_reported_and_reprompted() {
        let (result, _, err) = run_play("fold\nlock 9\nstand\n", 1, 3);
        assert!(result.is_ok());
        assert!(err.contains("Unrecognized action 'fold'"));
        assert!(err.contains("Invalid action:"));
    }

    #[test]
    fn same_seed_same_transcript() {
        let (_, a, _) = run_play("draw\nstand\n", 1, 99);
        let (_, b, _) = run_play("draw\nstand\n", 1, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_dealer_policy_is_rejected() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(Vec::new());
        let result = handle_play_command(
            None,
            Some(1),
            Some("oracle".into()),
            &mut out,
            &mut err,
            &mut stdin,
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(String::from_utf8(err).unwrap().contains("oracle"));
    }
}
