//! Statistics over recorded games.
//!
//! Reads `GameRecord` JSONL (plain or `.jsonl.zst`, a single file or a
//! directory tree) and prints a JSON summary: games, wins per side, how games
//! were decided, shifts and the recorded time span.
//!
//! Records are also checked for consistency: the stored totals must match the
//! final hands, and a winner needs a resolution. Any mismatch is reported and
//! turns the exit code into an error after the summary is printed.

use crate::error::CliError;
use crate::io_utils::{is_history_file, read_text_auto};
use crate::ui;
use chrono::{DateTime, FixedOffset};
use sabacc_engine::game::Resolution;
use sabacc_engine::hand::compute_total;
use sabacc_engine::logger::GameRecord;
use sabacc_engine::player::Side;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Default)]
struct StatsState {
    games: u64,
    unfinished: u64,
    player_wins: u64,
    dealer_wins: u64,
    shifts: u64,
    reasons: BTreeMap<String, u64>,
    first_ts: Option<DateTime<FixedOffset>>,
    last_ts: Option<DateTime<FixedOffset>>,
    skipped: u64,
    corrupted: u64,
    stats_ok: bool,
}

pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let mut state = StatsState {
        stats_ok: true,
        ..StatsState::default()
    };

    if path.is_dir() {
        let mut stack = vec![path.to_path_buf()];
        while let Some(d) = stack.pop() {
            let Ok(rd) = std::fs::read_dir(&d) else {
                continue;
            };
            for e in rd.filter_map(Result::ok) {
                let p = e.path();
                if p.is_dir() {
                    stack.push(p);
                } else if is_history_file(&p) {
                    match read_text_auto(&p.to_string_lossy()) {
                        Ok(content) => consume_content(&content, &mut state, err)?,
                        Err(_) => state.corrupted += 1,
                    }
                }
            }
        }
    } else {
        match read_text_auto(&input) {
            Ok(s) => consume_content(&s, &mut state, err)?,
            Err(e) => {
                ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
                return Err(CliError::Config(format!("Failed to read {}: {}", input, e)));
            }
        }
    }

    if state.corrupted > 0 {
        ui::write_error(
            err,
            &format!("Skipped {} corrupted record(s)", state.corrupted),
        )?;
    }
    if state.skipped > 0 {
        ui::write_error(
            err,
            &format!("Discarded {} incomplete final line(s)", state.skipped),
        )?;
    }
    if !path.is_dir() && state.games == 0 && (state.corrupted > 0 || state.skipped > 0) {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let summary = serde_json::json!({
        "games": state.games,
        "unfinished": state.unfinished,
        "winners": { "player": state.player_wins, "dealer": state.dealer_wins },
        "resolutions": state.reasons,
        "shifts": state.shifts,
        "first_ts": state.first_ts.map(|t| t.to_rfc3339()),
        "last_ts": state.last_ts.map(|t| t.to_rfc3339()),
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;

    if state.stats_ok {
        Ok(())
    } else {
        Err(CliError::InvalidInput("Inconsistent game records".to_string()))
    }
}

fn consume_content(
    content: &str,
    state: &mut StatsState,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let has_trailing_nl = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    for (i, line) in lines.iter().enumerate() {
        let rec: GameRecord = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(_) => {
                // A truncated last line is what an interrupted writer leaves behind.
                if i == lines.len() - 1 && !has_trailing_nl {
                    state.skipped += 1;
                } else {
                    state.corrupted += 1;
                }
                continue;
            }
        };

        if let Some(problem) = inconsistency(&rec) {
            state.stats_ok = false;
            ui::write_error(err, &format!("Game {}: {}", rec.game_id, problem))?;
            continue;
        }
        record_game(state, &rec);
    }
    Ok(())
}

fn inconsistency(rec: &GameRecord) -> Option<String> {
    if compute_total(&rec.final_player_hand) != rec.player_total {
        return Some(format!(
            "player_total {} does not match the final hand",
            rec.player_total
        ));
    }
    if compute_total(&rec.final_dealer_hand) != rec.dealer_total {
        return Some(format!(
            "dealer_total {} does not match the final hand",
            rec.dealer_total
        ));
    }
    if rec.winner.is_some() != rec.resolution.is_some() {
        return Some("winner and resolution must be recorded together".to_string());
    }
    None
}

fn record_game(state: &mut StatsState, rec: &GameRecord) {
    state.games += 1;
    match rec.winner {
        Some(Side::Player) => state.player_wins += 1,
        Some(Side::Dealer) => state.dealer_wins += 1,
        None => state.unfinished += 1,
    }
    if rec.shift_applied {
        state.shifts += 1;
    }
    if let Some(resolution) = rec.resolution {
        let key = match resolution {
            Resolution::Decided(reason) => reason_key(&reason),
            Resolution::CoinToss(_) => "coin_toss".to_string(),
        };
        *state.reasons.entry(key).or_default() += 1;
    }
    if let Some(ts) = rec
        .ts
        .as_deref()
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
    {
        if state.first_ts.is_none_or(|first| ts < first) {
            state.first_ts = Some(ts);
        }
        if state.last_ts.is_none_or(|last| ts > last) {
            state.last_ts = Some(ts);
        }
    }
}

// Same spelling the records use on disk.
fn reason_key<T: serde::Serialize>(reason: &T) -> String {
    serde_json::to_value(reason)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
