use sabacc_engine::coin::FixedCoin;
use sabacc_engine::dealer::StandingDealer;
use sabacc_engine::engine::{ActionOutcome, Engine};
use sabacc_engine::errors::GameError;
use sabacc_engine::game::{GameConfig, GamePhase, Phase, Resolution};
use sabacc_engine::player::{PlayerAction, Side};
use sabacc_session::{EventBus, GameEvent, Pacing, SessionConfig, SessionManager};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn manager(pacing: Pacing) -> (Arc<EventBus>, SessionManager) {
    let bus = Arc::new(EventBus::new());
    let sessions = SessionManager::new(Arc::clone(&bus), pacing);
    (bus, sessions)
}

fn seeded(seed: u64) -> SessionConfig {
    SessionConfig {
        seed: Some(seed),
        ..SessionConfig::default()
    }
}

fn no_shift() -> GameConfig {
    GameConfig {
        shift_probability: 0.0,
        ..GameConfig::default()
    }
}

/// First seed whose opening hands tie when both sides stand pat.
fn tied_seed() -> u64 {
    (0..5000u64)
        .find(|&seed| {
            let mut eng = Engine::with_config(Some(seed), no_shift()).expect("deal");
            eng.apply_player_action(PlayerAction::Stand).expect("stand");
            eng.run_dealer_turn(&StandingDealer).expect("dealer");
            eng.run_shift().expect("shift");
            matches!(eng.state().phase, Phase::TieBreakPending { .. })
        })
        .expect("some seed ties")
}

#[tokio::test(start_paused = true)]
async fn dealer_waits_for_its_delay() {
    let (_bus, sessions) = manager(Pacing::default());
    let id = sessions.create_session(seeded(3)).expect("create");

    sessions
        .process_action(&id, PlayerAction::Stand)
        .expect("stand");

    sleep(Duration::from_millis(999)).await;
    assert_eq!(sessions.state(&id).expect("state").phase, Phase::DealerTurn);

    sleep(Duration::from_millis(2)).await;
    assert_eq!(
        sessions.state(&id).expect("state").phase,
        Phase::ShiftPending
    );

    sleep(Duration::from_millis(2000)).await;
    assert_ne!(
        sessions.state(&id).expect("state").game_phase(),
        GamePhase::Playing
    );

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(
        sessions.state(&id).expect("state").game_phase(),
        GamePhase::Finished
    );
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_pending_dealer_turn() {
    let (_bus, sessions) = manager(Pacing::default());
    let id = sessions.create_session(seeded(4)).expect("create");
    sessions
        .process_action(&id, PlayerAction::Stand)
        .expect("stand");

    sleep(Duration::from_millis(500)).await;
    let fresh = sessions.reset_game(&id, Some(40)).expect("reset");

    sleep(Duration::from_secs(10)).await;
    let state = sessions.state(&id).expect("state");
    assert_eq!(state, fresh);
    assert_eq!(state.phase, Phase::PlayerTurn);
    assert_eq!(sessions.get_session(&id).expect("session").generation(), 1);
}

#[tokio::test(start_paused = true)]
async fn reset_mid_chain_stops_the_chain() {
    let (_bus, sessions) = manager(Pacing::default());
    let id = sessions.create_session(seeded(5)).expect("create");
    sessions
        .process_action(&id, PlayerAction::Stand)
        .expect("stand");

    // Dealer has run, shift is scheduled.
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(
        sessions.state(&id).expect("state").phase,
        Phase::ShiftPending
    );

    sessions.reset_game(&id, Some(50)).expect("reset");
    sleep(Duration::from_secs(10)).await;
    assert_eq!(sessions.state(&id).expect("state").phase, Phase::PlayerTurn);
}

#[tokio::test(start_paused = true)]
async fn events_follow_the_round() {
    let (bus, sessions) = manager(Pacing::default());
    let id = sessions.create_session(seeded(6)).expect("create");
    let mut sub = bus.subscribe(id.clone());

    sessions
        .process_action(&id, PlayerAction::Draw)
        .expect("draw");
    sessions
        .process_action(&id, PlayerAction::Stand)
        .expect("stand");
    sleep(Duration::from_secs(10)).await;

    let kinds: Vec<&str> = sub.drain().iter().map(GameEvent::kind).collect();
    assert_eq!(&kinds[..4], &["player_acted", "player_acted", "dealer_acted", "shift_resolved"]);
    assert_eq!(kinds.last(), Some(&"game_finished"));
}

#[tokio::test(start_paused = true)]
async fn actions_during_dealer_delay_are_ignored() {
    let (bus, sessions) = manager(Pacing::default());
    let id = sessions.create_session(seeded(7)).expect("create");
    let mut sub = bus.subscribe(id.clone());
    sessions
        .process_action(&id, PlayerAction::Stand)
        .expect("stand");

    let outcome = sessions
        .process_action(&id, PlayerAction::Draw)
        .expect("draw");
    assert!(matches!(
        outcome,
        ActionOutcome::Ignored(GameError::OutOfTurn { .. })
    ));
    let events = sub.drain();
    assert!(matches!(events.last(), Some(GameEvent::ActionIgnored { .. })));
}

#[tokio::test(start_paused = true)]
async fn tie_is_settled_by_the_coin() {
    let (bus, sessions) = manager(Pacing::immediate());
    let config = SessionConfig {
        seed: Some(tied_seed()),
        game: no_shift(),
        ..SessionConfig::default()
    };
    let id = sessions
        .create_session_with(
            config,
            Box::new(StandingDealer),
            Box::new(FixedCoin(Side::Dealer)),
        )
        .expect("create");
    let mut sub = bus.subscribe(id.clone());

    sessions
        .process_action(&id, PlayerAction::Stand)
        .expect("stand");
    sleep(Duration::from_millis(10)).await;

    let state = sessions.state(&id).expect("state");
    assert!(matches!(
        state.phase,
        Phase::Finished {
            winner: Side::Dealer,
            resolution: Resolution::CoinToss(_)
        }
    ));
    let events = sub.drain();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::CoinTossed { winner: Side::Dealer, .. })));
}

#[tokio::test]
async fn sessions_are_independent() {
    let (_bus, sessions) = manager(Pacing::immediate());
    let a = sessions.create_session(seeded(8)).expect("create");
    let b = sessions.create_session(seeded(8)).expect("create");
    assert_ne!(a, b);
    assert_eq!(
        sessions.state(&a).expect("a"),
        sessions.state(&b).expect("b")
    );

    sessions
        .process_action(&a, PlayerAction::Lock(0))
        .expect("lock");
    assert!(sessions.state(&a).expect("a").player.locked_card().is_some());
    assert!(sessions.state(&b).expect("b").player.locked_card().is_none());
}

#[tokio::test(start_paused = true)]
async fn table_plays_paced_games_to_the_end() {
    let (bus, sessions) = manager(Pacing::default());
    let player = sabacc_ai::autopilot::ThresholdPlayer::default();
    let mut kinds = Vec::new();
    let mut record = |event: &GameEvent| kinds.push(event.kind());

    let summary = sabacc_session::run_table(&sessions, seeded(11), 3, &player, &mut record)
        .await
        .expect("table");

    assert_eq!(summary.games, 3);
    assert_eq!(summary.player_wins + summary.dealer_wins, 3);
    assert_eq!(kinds.iter().filter(|k| **k == "game_finished").count(), 3);
    assert_eq!(kinds.iter().filter(|k| **k == "game_reset").count(), 2);
    assert!(sessions.active_sessions().is_empty());
    assert_eq!(bus.subscriber_count(), 0);
}
