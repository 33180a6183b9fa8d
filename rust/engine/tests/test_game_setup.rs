use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sabacc_engine::cards::{build_deck, UNIVERSE_SIZE};
use sabacc_engine::deck::shuffle;
use sabacc_engine::engine::Engine;
use sabacc_engine::game::{initialize_game, GamePhase, Phase};
use sabacc_engine::player::Side;

#[test]
fn opening_deal_alternates_starting_with_player() {
    let seed = 2024;
    let shuffled = shuffle(&build_deck(), &mut ChaCha20Rng::seed_from_u64(seed));
    let state = initialize_game(&mut ChaCha20Rng::seed_from_u64(seed)).expect("deal");

    assert_eq!(state.player.hand(), &[shuffled[0], shuffled[2]]);
    assert_eq!(state.dealer.hand(), &[shuffled[1], shuffled[3]]);
    assert_eq!(state.deck, shuffled[4..].to_vec());
}

#[test]
fn fresh_game_starts_on_player_turn() {
    let eng = Engine::new(Some(5)).expect("deal");
    let state = eng.state();
    assert_eq!(state.phase, Phase::PlayerTurn);
    assert_eq!(state.current_turn(), Side::Player);
    assert_eq!(state.game_phase(), GamePhase::Playing);
    assert_eq!(state.winner(), None);
    assert_eq!(state.deck.len(), UNIVERSE_SIZE - 4);
    assert!(state.player.locked_card().is_none());
    assert!(!state.player.has_stood());
    assert!(!state.message.is_empty());
    state.check_invariants().expect("invariants");
}

#[test]
fn same_seed_same_game() {
    let a = Engine::new(Some(77)).expect("deal");
    let b = Engine::new(Some(77)).expect("deal");
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.seed(), 77);
}

#[test]
fn unseeded_engine_records_its_seed() {
    let eng = Engine::new(None).expect("deal");
    let replay = Engine::new(Some(eng.seed())).expect("deal");
    assert_eq!(eng.snapshot(), replay.snapshot());
}
