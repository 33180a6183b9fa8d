use std::fs;
use std::path::PathBuf;

use sabacc_engine::coin::FixedCoin;
use sabacc_engine::dealer::StandingDealer;
use sabacc_engine::engine::Engine;
use sabacc_engine::logger::{GameLogger, GameRecord, RecordedAction};
use sabacc_engine::player::{PlayerAction, Side};

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    p
}

fn finished_record(seed: u64, id: &str) -> GameRecord {
    let mut eng = Engine::new(Some(seed)).expect("deal");
    eng.apply_player_action(PlayerAction::Draw).expect("draw");
    eng.apply_player_action(PlayerAction::Lock(0)).expect("lock");
    eng.apply_player_action(PlayerAction::Stand).expect("stand");
    eng.play_out(&StandingDealer, &mut FixedCoin(Side::Player))
        .expect("finish");
    eng.game_record(id.to_string())
}

#[test]
fn writes_jsonl_with_lf_only() {
    let path = tmp_path("gamelog");
    let mut logger = GameLogger::create(&path).expect("create logger");
    logger
        .write(&finished_record(1, "20250102-000001"))
        .expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    let _ = fs::remove_file(&path);
}

#[test]
fn sequential_ids_increment() {
    let mut logger = GameLogger::with_seq_for_test("20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
}

#[test]
fn record_round_trips_through_file() {
    let path = tmp_path("gamelog_rt");
    let rec = finished_record(2, "20250102-000002");
    {
        let mut logger = GameLogger::create(&path).expect("create logger");
        logger.write(&rec).expect("write");
    }
    let content = fs::read_to_string(&path).expect("read");
    let line = content.lines().next().expect("one line");
    let parsed: GameRecord = serde_json::from_str(line).expect("parse");
    assert!(parsed.ts.is_some());
    assert_eq!(parsed.game_id, rec.game_id);
    assert_eq!(parsed.final_player_hand, rec.final_player_hand);
    assert_eq!(parsed.winner, rec.winner);
    assert!(matches!(
        parsed.actions[0].action,
        RecordedAction::Draw { .. }
    ));
    let _ = fs::remove_file(&path);
}

#[test]
fn ts_is_preserved_when_present() {
    let path = tmp_path("gamelog_ts");
    let mut rec = finished_record(3, "20250102-000003");
    rec.ts = Some("2025-01-02T03:04:05Z".to_string());
    {
        let mut logger = GameLogger::create(&path).expect("create logger");
        logger.write(&rec).expect("write");
    }
    let content = fs::read_to_string(&path).expect("read");
    let v: serde_json::Value = serde_json::from_str(content.trim_end()).expect("json");
    assert_eq!(v["ts"], "2025-01-02T03:04:05Z");
    let _ = fs::remove_file(&path);
}

#[test]
fn append_keeps_earlier_lines() {
    let path = tmp_path("gamelog_append");
    {
        let mut logger = GameLogger::create(&path).expect("create");
        logger.write(&finished_record(4, "a")).expect("write");
    }
    {
        let mut logger = GameLogger::append(&path).expect("append");
        logger.write(&finished_record(5, "b")).expect("write");
    }
    let content = fs::read_to_string(&path).expect("read");
    assert_eq!(content.lines().count(), 2);
    let _ = fs::remove_file(&path);
}

#[test]
fn record_lists_actions_by_side() {
    let rec = finished_record(6, "x");
    let sides: Vec<Side> = rec.actions.iter().map(|a| a.side).collect();
    assert_eq!(
        sides,
        vec![Side::Player, Side::Player, Side::Player, Side::Dealer]
    );
    assert_eq!(rec.initial_player_hand.len(), 2);
    assert_eq!(rec.final_player_hand.len(), 3);
    assert!(rec.resolution.is_some());
}
