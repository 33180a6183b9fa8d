use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::Resolution;
use crate::player::Side;

/// What a seat did, with the cards involved.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RecordedAction {
    Draw { card: Card },
    Exchange { index: usize, discarded: Card, drawn: Card },
    Lock { index: usize, card: Card },
    Stand,
    /// Dealer turn cut off by the action cap
    ActionCap,
    /// Dealer step the rules refused, which ends the dealer's turn
    Rejected { reason: String },
}

/// Records a single action taken during a game.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Seat that acted
    pub side: Side,
    /// The action with the cards it touched
    pub action: RecordedAction,
}

/// Complete record of one game, serialized as a JSONL line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Unique identifier for this game (format: YYYYMMDD-NNNNNN)
    pub game_id: String,
    /// RNG seed the engine was built with (enables deterministic replay)
    pub seed: Option<u64>,
    pub initial_player_hand: Vec<Card>,
    pub initial_dealer_hand: Vec<Card>,
    /// Chronological list of all actions
    pub actions: Vec<ActionRecord>,
    /// Whether a Sabacc Shift fired this round
    pub shift_applied: bool,
    pub final_player_hand: Vec<Card>,
    pub final_dealer_hand: Vec<Card>,
    pub player_total: i32,
    pub dealer_total: i32,
    /// Winner, absent while the game is unfinished
    pub winner: Option<Side>,
    #[serde(default)]
    pub resolution: Option<Resolution>,
    /// Timestamp when the game was recorded (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Additional metadata (extensible JSON object)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

pub fn format_game_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends game records to a JSONL file, one record per line.
pub struct GameLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl GameLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::open(path, false)
    }

    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::open(path, true)
    }

    fn open<P: AsRef<Path>>(path: P, append: bool) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_game_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &GameRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
