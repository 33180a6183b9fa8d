use crate::events::{EventBus, GameEvent};
use crate::pacing::{Continuation, Pacing};
use chrono::{DateTime, Utc};
use sabacc_ai::create_ai;
use sabacc_engine::coin::{CoinToss, RandomCoin};
use sabacc_engine::dealer::DealerPolicy;
use sabacc_engine::engine::{ActionOutcome, Engine};
use sabacc_engine::errors::GameError;
use sabacc_engine::game::{GameConfig, GameState, Phase};
use sabacc_engine::player::PlayerAction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub type SessionId = String;

/// How a session builds its games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub seed: Option<u64>,
    pub ai_version: String,
    pub game: GameConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ai_version: "baseline".to_string(),
            game: GameConfig::default(),
        }
    }
}

/// What happened when a scheduled continuation fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationOutcome {
    /// The step ran; `next` is scheduled after it
    Applied { next: Option<Continuation> },
    /// The game was reset since the step was scheduled
    Stale,
    /// The game was not in the phase the step expects
    Skipped,
}

#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<GameSession>>>,
    event_bus: Arc<EventBus>,
    pacing: Pacing,
}

impl SessionManager {
    pub fn new(event_bus: Arc<EventBus>, pacing: Pacing) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            event_bus,
            pacing,
        }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    /// Starts a session with the dealer named by `config.ai_version` and a
    /// randomly seeded coin.
    pub fn create_session(&self, config: SessionConfig) -> Result<SessionId, SessionError> {
        let dealer = create_ai(&config.ai_version)
            .ok_or_else(|| SessionError::UnknownPolicy(config.ai_version.clone()))?;
        let coin = Box::new(RandomCoin::new_with_seed(rand::random()));
        self.create_session_with(config, dealer, coin)
    }

    /// Starts a session with explicit dealer and coin collaborators.
    pub fn create_session_with(
        &self,
        config: SessionConfig,
        dealer: Box<dyn DealerPolicy>,
        coin: Box<dyn CoinToss>,
    ) -> Result<SessionId, SessionError> {
        let id = Uuid::new_v4().to_string();

        tracing::info!(
            session_id = %id,
            seed = ?config.seed,
            dealer = dealer.name(),
            "creating new game session"
        );

        let session = Arc::new(GameSession::new(id.clone(), config, dealer, coin)?);
        let state = session.snapshot()?;

        {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.insert(id.clone(), Arc::clone(&session));
        }

        self.event_bus.broadcast(
            &id,
            GameEvent::GameStarted {
                session_id: id.clone(),
                generation: session.generation(),
                state,
            },
        );

        Ok(id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Arc<GameSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    pub fn state(&self, session_id: &SessionId) -> Result<GameState, SessionError> {
        self.get_session(session_id)?.snapshot()
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions
            .read()
            .map(|guard| guard.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Applies a player action. Standing schedules the dealer's turn on the
    /// current tokio runtime.
    pub fn process_action(
        &self,
        session_id: &SessionId,
        action: PlayerAction,
    ) -> Result<ActionOutcome, SessionError> {
        Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let session = self.get_session(session_id)?;
        let (outcome, state, generation) = session.apply_player_action(action)?;

        match &outcome {
            ActionOutcome::Applied => {
                let hand_over = state.phase == Phase::DealerTurn;
                self.event_bus.broadcast(
                    session_id,
                    GameEvent::PlayerActed {
                        session_id: session_id.clone(),
                        action,
                        state,
                    },
                );
                if hand_over {
                    let displaced = schedule_continuation(
                        session,
                        Arc::clone(&self.event_bus),
                        self.pacing,
                        Continuation::DealerTurn,
                        generation,
                    )?;
                    if let Some(handle) = displaced {
                        handle.abort();
                    }
                }
            }
            ActionOutcome::Ignored(reason) => {
                self.event_bus.broadcast(
                    session_id,
                    GameEvent::ActionIgnored {
                        session_id: session_id.clone(),
                        action,
                        reason: reason.to_string(),
                    },
                );
            }
        }

        Ok(outcome)
    }

    /// Replaces the session's game with a fresh one. Continuations scheduled
    /// for the old game are cancelled and, should one still fire, ignored.
    pub fn reset_game(
        &self,
        session_id: &SessionId,
        seed: Option<u64>,
    ) -> Result<GameState, SessionError> {
        let session = self.get_session(session_id)?;
        let (generation, state) = session.reset(seed)?;
        self.event_bus.broadcast(
            session_id,
            GameEvent::GameReset {
                session_id: session_id.clone(),
                generation,
                state: state.clone(),
            },
        );
        Ok(state)
    }

    pub fn delete_session(&self, session_id: &SessionId) -> Result<(), SessionError> {
        let removed = {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.remove(session_id)
        };
        match removed {
            Some(session) => {
                session.retire();
                self.event_bus.drop_session(session_id);
                tracing::info!(session_id = %session_id, "session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(session_id.clone())),
        }
    }
}

/// Spawns `step` after its pacing delay, tagged with `generation`: the
/// generation of the game that asked for it. Nothing is spawned when that game
/// has been reset in the meantime. The task chains the next step when it
/// finishes.
///
/// Returns the pending handle the new task displaced. A chained step displaces
/// the task running it, so only callers outside a continuation abort it.
pub(crate) fn schedule_continuation(
    session: Arc<GameSession>,
    bus: Arc<EventBus>,
    pacing: Pacing,
    step: Continuation,
    generation: u64,
) -> Result<Option<JoinHandle<()>>, SessionError> {
    let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

    // Held until the handle is installed: reset swaps the engine and cancels
    // pending work under the same lock.
    let _engine = session.lock_engine()?;
    let current = session.generation();
    if generation != current {
        tracing::debug!(
            session_id = %session.id(),
            ?step,
            generation,
            current,
            "stale continuation not scheduled"
        );
        return Ok(None);
    }
    let delay = pacing.delay(step);

    tracing::debug!(
        session_id = %session.id(),
        generation,
        ?step,
        delay_ms = delay.as_millis() as u64,
        "continuation scheduled"
    );

    let task_session = Arc::clone(&session);
    let handle = runtime.spawn(async move {
        tokio::time::sleep(delay).await;
        let session_id = task_session.id().clone();
        match task_session.run_continuation(step, generation, &bus) {
            Ok(ContinuationOutcome::Applied { next: Some(next) }) => {
                if let Err(err) =
                    schedule_continuation(task_session, Arc::clone(&bus), pacing, next, generation)
                {
                    tracing::error!(session_id = %session_id, error = %err, "failed to chain continuation");
                    bus.broadcast(
                        &session_id,
                        GameEvent::Error {
                            session_id: session_id.clone(),
                            message: err.to_string(),
                        },
                    );
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::error!(session_id = %session_id, ?step, error = %err, "continuation failed");
                bus.broadcast(
                    &session_id,
                    GameEvent::Error {
                        session_id: session_id.clone(),
                        message: err.to_string(),
                    },
                );
            }
        }
    });
    Ok(session.replace_pending(handle))
}

/// One player's table: the engine, its collaborators and the generation
/// token that invalidates continuations across resets.
pub struct GameSession {
    id: SessionId,
    config: SessionConfig,
    engine: Mutex<Engine>,
    dealer: Box<dyn DealerPolicy>,
    coin: Mutex<Box<dyn CoinToss>>,
    generation: AtomicU64,
    pending: Mutex<Option<JoinHandle<()>>>,
    created_at: DateTime<Utc>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("dealer", &self.dealer.name())
            .field("generation", &self.generation())
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl GameSession {
    fn new(
        id: SessionId,
        config: SessionConfig,
        dealer: Box<dyn DealerPolicy>,
        coin: Box<dyn CoinToss>,
    ) -> Result<Self, SessionError> {
        let engine = Engine::with_config(config.seed, config.game)?;
        Ok(Self {
            id,
            config,
            engine: Mutex::new(engine),
            dealer,
            coin: Mutex::new(coin),
            generation: AtomicU64::new(0),
            pending: Mutex::new(None),
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Result<GameState, SessionError> {
        Ok(self.lock_engine()?.snapshot())
    }

    pub fn seed(&self) -> Result<u64, SessionError> {
        Ok(self.lock_engine()?.seed())
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    fn apply_player_action(
        &self,
        action: PlayerAction,
    ) -> Result<(ActionOutcome, GameState, u64), SessionError> {
        let mut engine = self.lock_engine()?;
        let generation = self.generation();
        let outcome = engine.apply_player_action(action)?;
        tracing::debug!(session_id = %self.id, ?action, ?outcome, "player action processed");
        Ok((outcome, engine.snapshot(), generation))
    }

    /// Runs one scheduled step if `generation` is still current.
    pub fn run_continuation(
        &self,
        step: Continuation,
        generation: u64,
        bus: &EventBus,
    ) -> Result<ContinuationOutcome, SessionError> {
        let mut engine = self.lock_engine()?;

        // Checked under the engine lock: reset swaps the engine while holding it.
        let current = self.generation();
        if generation != current {
            tracing::debug!(
                session_id = %self.id,
                ?step,
                generation,
                current,
                "stale continuation ignored"
            );
            return Ok(ContinuationOutcome::Stale);
        }

        let outcome = match step {
            Continuation::DealerTurn => match engine.run_dealer_turn(self.dealer.as_ref())? {
                None => ContinuationOutcome::Skipped,
                Some(report) => {
                    bus.broadcast(
                        &self.id,
                        GameEvent::DealerActed {
                            session_id: self.id.clone(),
                            steps: report.steps,
                            state: engine.snapshot(),
                        },
                    );
                    ContinuationOutcome::Applied {
                        next: Some(Continuation::Shift),
                    }
                }
            },
            Continuation::Shift => match engine.run_shift()? {
                None => ContinuationOutcome::Skipped,
                Some(report) => {
                    bus.broadcast(
                        &self.id,
                        GameEvent::ShiftResolved {
                            session_id: self.id.clone(),
                            applied: report.applied,
                            state: engine.snapshot(),
                        },
                    );
                    if matches!(engine.state().phase, Phase::TieBreakPending { .. }) {
                        ContinuationOutcome::Applied {
                            next: Some(Continuation::CoinToss),
                        }
                    } else {
                        self.announce_finish(&engine, bus);
                        ContinuationOutcome::Applied { next: None }
                    }
                }
            },
            Continuation::CoinToss => {
                let mut coin = self.coin.lock().map_err(|_| SessionError::StoragePoisoned)?;
                match engine.settle_tie_break(&mut **coin)? {
                    None => ContinuationOutcome::Skipped,
                    Some(winner) => {
                        bus.broadcast(
                            &self.id,
                            GameEvent::CoinTossed {
                                session_id: self.id.clone(),
                                winner,
                            },
                        );
                        self.announce_finish(&engine, bus);
                        ContinuationOutcome::Applied { next: None }
                    }
                }
            }
        };

        tracing::debug!(session_id = %self.id, ?step, generation, ?outcome, "continuation ran");
        Ok(outcome)
    }

    fn announce_finish(&self, engine: &Engine, bus: &EventBus) {
        if let Phase::Finished { winner, resolution } = engine.state().phase {
            bus.broadcast(
                &self.id,
                GameEvent::GameFinished {
                    session_id: self.id.clone(),
                    winner,
                    resolution,
                    state: engine.snapshot(),
                },
            );
        }
    }

    fn reset(&self, seed: Option<u64>) -> Result<(u64, GameState), SessionError> {
        let fresh = Engine::with_config(seed, self.config.game)?;
        let mut engine = self.lock_engine()?;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.cancel_pending();
        *engine = fresh;
        tracing::info!(
            session_id = %self.id,
            generation,
            seed = engine.seed(),
            "game reset"
        );
        Ok((generation, engine.snapshot()))
    }

    /// Invalidates and cancels outstanding work before the session is dropped.
    fn retire(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cancel_pending();
    }

    fn replace_pending(&self, handle: JoinHandle<()>) -> Option<JoinHandle<()>> {
        let mut guard = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        guard.replace(handle)
    }

    fn cancel_pending(&self) {
        let mut guard = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, Engine>, SessionError> {
        self.engine.lock().map_err(|_| SessionError::StoragePoisoned)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Unknown dealer policy: {0}")]
    UnknownPolicy(String),
    #[error("No tokio runtime available to schedule continuations")]
    NoRuntime,
    #[error("Session storage poisoned")]
    StoragePoisoned,
    #[error("Event stream closed")]
    EventsClosed,
    #[error("Continuation failed: {0}")]
    Continuation(String),
    #[error("Game engine error: {0}")]
    Engine(#[from] GameError),
}
