use sabacc_cli::run;
use sabacc_engine::logger::GameRecord;
use std::fs;
use tempfile::tempdir;

struct CliResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

fn run_cli(args: &[&str]) -> CliResult {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let argv = std::iter::once("sabacc").chain(args.iter().copied());
    let exit_code = run(argv, &mut out, &mut err);
    CliResult {
        exit_code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

fn read_records(path: &std::path::Path) -> Vec<GameRecord> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn deal_is_deterministic_per_seed() {
    let a = run_cli(&["deal", "--seed", "31337"]);
    let b = run_cli(&["deal", "--seed", "31337"]);
    let c = run_cli(&["deal", "--seed", "31338"]);
    assert_eq!(a.exit_code, 0);
    assert_eq!(a.stdout, b.stdout);
    assert_ne!(a.stdout, c.stdout);
}

#[test]
fn sim_records_every_game() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("runs").join("games.jsonl");
    let path_str = path.to_string_lossy().into_owned();

    let res = run_cli(&["sim", "--games", "12", "--seed", "9", "--output", &path_str]);
    assert_eq!(res.exit_code, 0, "stderr={}", res.stderr);
    assert!(res.stdout.starts_with("Simulated: 12 games (seed 9)"));

    let records = read_records(&path);
    assert_eq!(records.len(), 12);
    for (i, rec) in records.iter().enumerate() {
        assert_eq!(rec.seed, Some(9 + i as u64));
        assert!(rec.winner.is_some());
        assert!(rec.resolution.is_some());
        assert!(rec.ts.is_some());
        assert!(rec.final_player_hand.len() <= 5);
        assert!(rec.final_dealer_hand.len() <= 5);
        assert_eq!(rec.meta.as_ref().unwrap()["dealer"], "BaselineDealer");
    }
}

#[test]
fn sim_is_reproducible_apart_from_ids_and_timestamps() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.jsonl");
    let second = dir.path().join("b.jsonl");
    for path in [&first, &second] {
        let p = path.to_string_lossy().into_owned();
        assert_eq!(run_cli(&["sim", "--games", "5", "--seed", "77", "--output", &p]).exit_code, 0);
    }

    let strip = |mut r: GameRecord| {
        r.ts = None;
        r.game_id.clear();
        r
    };
    let a: Vec<_> = read_records(&first).into_iter().map(strip).collect();
    let b: Vec<_> = read_records(&second).into_iter().map(strip).collect();
    assert_eq!(a, b);
}

#[test]
fn sim_appends_to_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    let p = path.to_string_lossy().into_owned();
    assert_eq!(run_cli(&["sim", "--games", "2", "--seed", "1", "--output", &p]).exit_code, 0);
    assert_eq!(run_cli(&["sim", "--games", "3", "--seed", "2", "--output", &p]).exit_code, 0);
    assert_eq!(read_records(&path).len(), 5);
}

#[test]
fn stats_summarizes_sim_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    let p = path.to_string_lossy().into_owned();
    assert_eq!(run_cli(&["sim", "--games", "20", "--seed", "4", "--output", &p]).exit_code, 0);

    let res = run_cli(&["stats", "--input", &p]);
    assert_eq!(res.exit_code, 0, "stderr={}", res.stderr);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["games"], 20);
    assert_eq!(json["unfinished"], 0);
    let wins = json["winners"]["player"].as_u64().unwrap() + json["winners"]["dealer"].as_u64().unwrap();
    assert_eq!(wins, 20);
    assert!(json["shifts"].as_u64().unwrap() <= 20);
}

#[test]
fn stats_reads_a_directory_of_runs() {
    let dir = tempdir().unwrap();
    for (name, seed) in [("a.jsonl", "1"), ("b.jsonl", "100")] {
        let p = dir.path().join(name).to_string_lossy().into_owned();
        assert_eq!(run_cli(&["sim", "--games", "3", "--seed", seed, "--output", &p]).exit_code, 0);
    }
    let res = run_cli(&["stats", "--input", &dir.path().to_string_lossy()]);
    assert_eq!(res.exit_code, 0);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["games"], 6);
}

#[test]
fn sim_rejects_zero_games() {
    let res = run_cli(&["sim", "--games", "0"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Usage: sabacc"));
}

#[test]
fn missing_stats_input_fails() {
    let res = run_cli(&["stats", "--input", "/definitely/not/here.jsonl"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Failed to read"));
}

#[test]
fn version_flag_succeeds() {
    let res = run_cli(&["--version"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("sabacc"));
}
