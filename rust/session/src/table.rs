//! Headless table: a player policy sits in the player seat of a session, so
//! the paced dealer, shift and coin-toss continuations run exactly as they
//! would behind a renderer.

use crate::events::GameEvent;
use crate::session::{SessionConfig, SessionError, SessionManager};
use sabacc_ai::PlayerPolicy;
use sabacc_engine::engine::ActionOutcome;
use sabacc_engine::game::Phase;
use sabacc_engine::player::{PlayerAction, Side};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSummary {
    pub games: u32,
    pub player_wins: u32,
    pub dealer_wins: u32,
}

/// Plays `games` games in one session and hands every event to `on_event`
/// in order. When `config.seed` is set, game `n` is dealt from `seed + n`.
///
/// The session is deleted afterwards.
pub async fn run_table(
    manager: &SessionManager,
    config: SessionConfig,
    games: u32,
    player: &dyn PlayerPolicy,
    on_event: &mut dyn FnMut(&GameEvent),
) -> Result<TableSummary, SessionError> {
    let base_seed = config.seed;
    let session_id = manager.create_session(config)?;
    let mut events = manager.event_bus().subscribe(session_id.clone());
    let mut summary = TableSummary::default();

    for n in 0..games {
        if n > 0 {
            let seed = base_seed.map(|s| s.wrapping_add(u64::from(n)));
            manager.reset_game(&session_id, seed)?;
        }

        loop {
            let state = manager.state(&session_id)?;
            if state.phase != Phase::PlayerTurn {
                break;
            }
            let action = player.next_action(&state);
            if let ActionOutcome::Ignored(reason) = manager.process_action(&session_id, action)? {
                tracing::warn!(
                    session_id = %session_id,
                    player = player.name(),
                    ?action,
                    %reason,
                    "policy chose an illegal action, standing instead"
                );
                manager.process_action(&session_id, PlayerAction::Stand)?;
            }
        }

        let winner = loop {
            let event = events
                .receiver()
                .recv()
                .await
                .ok_or(SessionError::EventsClosed)?;
            on_event(&event);
            match event {
                GameEvent::GameFinished { winner, .. } => break winner,
                GameEvent::Error { message, .. } => {
                    return Err(SessionError::Continuation(message));
                }
                _ => {}
            }
        };

        summary.games += 1;
        match winner {
            Side::Player => summary.player_wins += 1,
            Side::Dealer => summary.dealer_wins += 1,
        }
        tracing::info!(session_id = %session_id, game = n, %winner, "table game finished");
    }

    manager.delete_session(&session_id)?;
    Ok(summary)
}
