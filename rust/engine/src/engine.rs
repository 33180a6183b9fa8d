use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::Card;
use crate::coin::CoinToss;
use crate::dealer::{DealerAction, DealerPolicy};
use crate::deck::{draw, exchange};
use crate::errors::GameError;
use crate::game::{initialize_game, GameConfig, GameState, Phase, Resolution};
use crate::hand::compute_total;
use crate::logger::{ActionRecord, GameRecord, RecordedAction};
use crate::outcome::{resolve_outcome, Outcome};
use crate::player::{Player, PlayerAction, Side};
use crate::rules::validate_player_action;
use crate::shift::{perform_shift, roll_shift};

/// Result of offering an action to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    /// The action was not legal here; the snapshot is unchanged
    Ignored(GameError),
}

/// Steps the dealer took during its turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DealerTurnReport {
    pub steps: Vec<DealerAction>,
    /// True when the turn ended because the action cap was reached
    pub hit_cap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftReport {
    pub applied: bool,
    pub outcome: Outcome,
}

/// Turn controller for one game of Sabacc.
///
/// Owns the current [`GameState`] snapshot and the game's random source.
/// Every transition builds a new snapshot and swaps it in; nothing hands out
/// mutable access to the state.
///
/// # Examples
///
/// ```
/// use sabacc_engine::coin::FixedCoin;
/// use sabacc_engine::dealer::StandingDealer;
/// use sabacc_engine::engine::Engine;
/// use sabacc_engine::game::GamePhase;
/// use sabacc_engine::player::{PlayerAction, Side};
///
/// let mut engine = Engine::new(Some(12345)).expect("deal");
/// engine.apply_player_action(PlayerAction::Draw).expect("draw");
/// engine.apply_player_action(PlayerAction::Stand).expect("stand");
///
/// let state = engine
///     .play_out(&StandingDealer, &mut FixedCoin(Side::Player))
///     .expect("finish");
/// assert_eq!(state.game_phase(), GamePhase::Finished);
/// ```
#[derive(Debug)]
pub struct Engine {
    state: GameState,
    rng: ChaCha20Rng,
    seed: u64,
    config: GameConfig,
    initial_hands: (Vec<Card>, Vec<Card>),
    actions: Vec<ActionRecord>,
    shift_applied: bool,
}

impl Engine {
    pub fn new(seed: Option<u64>) -> Result<Self, GameError> {
        Self::with_config(seed, GameConfig::default())
    }

    pub fn with_config(seed: Option<u64>, config: GameConfig) -> Result<Self, GameError> {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state = initialize_game(&mut rng)?;
        tracing::debug!(seed, "dealt new game");
        Ok(Self {
            initial_hands: (state.player.hand().to_vec(), state.dealer.hand().to_vec()),
            state,
            rng,
            seed,
            config,
            actions: Vec::new(),
            shift_applied: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    /// Applies a player action. Illegal actions are ignored and leave the
    /// snapshot untouched; only engine faults surface as `Err`.
    pub fn apply_player_action(&mut self, action: PlayerAction) -> Result<ActionOutcome, GameError> {
        if let Err(e) = validate_player_action(&self.state, action) {
            tracing::debug!(?action, phase = %self.state.phase, reason = %e, "player action rejected");
            return Ok(ActionOutcome::Ignored(e));
        }

        let result = match action {
            PlayerAction::Draw => self.seat_draw(Side::Player),
            PlayerAction::Exchange(index) => self.seat_exchange(Side::Player, index),
            PlayerAction::Lock(index) => self.seat_lock(Side::Player, index),
            PlayerAction::Stand => {
                let mut next = self.state.clone();
                next.player = next.player.stood();
                next.phase = Phase::DealerTurn;
                next.message = "You stand. Dealer's turn.".to_string();
                Ok((next, RecordedAction::Stand))
            }
        };

        match result {
            Ok((next, record)) => {
                self.commit(next)?;
                self.record(Side::Player, record);
                Ok(ActionOutcome::Applied)
            }
            Err(e) if e.is_engine_fault() => Err(e),
            Err(e) => {
                tracing::debug!(?action, reason = %e, "player action ignored");
                Ok(ActionOutcome::Ignored(e))
            }
        }
    }

    /// Lets the dealer act until it stands or reaches the action cap, then
    /// moves on to the shift. Returns `None` when it is not the dealer's turn.
    pub fn run_dealer_turn(
        &mut self,
        policy: &dyn DealerPolicy,
    ) -> Result<Option<DealerTurnReport>, GameError> {
        if self.state.phase != Phase::DealerTurn {
            return Ok(None);
        }

        let mut report = DealerTurnReport::default();
        let mut end = RecordedAction::ActionCap;
        for _ in 0..self.config.dealer_action_cap {
            let decision = policy.decide_with_lock(
                self.state.dealer.hand(),
                self.state.dealer.locked_index(),
                self.state.player.hand(),
                &mut self.rng,
            );
            report.steps.push(decision);
            tracing::debug!(dealer = policy.name(), ?decision, "dealer decision");

            let rejected = match decision {
                DealerAction::Stand => {
                    end = RecordedAction::Stand;
                    break;
                }
                DealerAction::Draw { count } => {
                    let mut rejected = None;
                    for _ in 0..count {
                        if let Some(e) = self.apply_dealer_step(|eng| eng.seat_draw(Side::Dealer))? {
                            rejected = Some(e);
                            break;
                        }
                    }
                    rejected
                }
                DealerAction::Exchange { index } => {
                    self.apply_dealer_step(|eng| eng.seat_exchange(Side::Dealer, index))?
                }
                DealerAction::Lock { index } => {
                    self.apply_dealer_step(|eng| eng.seat_lock(Side::Dealer, index))?
                }
            };
            if let Some(e) = rejected {
                tracing::debug!(?decision, reason = %e, "dealer step rejected, ending turn");
                end = RecordedAction::Rejected {
                    reason: e.to_string(),
                };
                break;
            }
        }
        report.hit_cap = end == RecordedAction::ActionCap;

        let mut next = self.state.clone();
        next.dealer = next.dealer.stood();
        next.phase = Phase::ShiftPending;
        next.message = "Dealer is done. A Sabacc Shift may occur...".to_string();
        self.commit(next)?;
        self.record(Side::Dealer, end);
        Ok(Some(report))
    }

    /// Rolls for a Sabacc Shift, then ranks the hands. Returns `None` when no
    /// shift is pending.
    pub fn run_shift(&mut self) -> Result<Option<ShiftReport>, GameError> {
        if self.state.phase != Phase::ShiftPending {
            return Ok(None);
        }

        let applied = roll_shift(&mut self.rng, self.config.shift_probability);
        let mut next = self.state.clone();
        if applied {
            let player_hand =
                perform_shift(next.player.hand(), next.player.locked_card(), &mut self.rng);
            let dealer_hand =
                perform_shift(next.dealer.hand(), next.dealer.locked_card(), &mut self.rng);
            next.player = next.player.with_replaced_hand(player_hand);
            next.dealer = next.dealer.with_replaced_hand(dealer_hand);
            tracing::info!(seed = self.seed, "sabacc shift applied");
        }

        let outcome = resolve_outcome(next.player.hand(), next.dealer.hand());
        next.phase = match outcome {
            Outcome::Winner { side, reason } => Phase::Finished {
                winner: side,
                resolution: Resolution::Decided(reason),
            },
            Outcome::NeedsTieBreak(reason) => Phase::TieBreakPending { reason },
        };
        next.message = describe(&next.phase, applied);
        self.commit(next)?;
        self.shift_applied = applied;
        self.log_finish();
        Ok(Some(ShiftReport { applied, outcome }))
    }

    /// Hands an undecidable game to the coin toss. Returns `None` when no
    /// tie-break is pending.
    pub fn settle_tie_break(&mut self, coin: &mut dyn CoinToss) -> Result<Option<Side>, GameError> {
        let Phase::TieBreakPending { reason } = self.state.phase else {
            return Ok(None);
        };
        let winner = coin.toss();
        let mut next = self.state.clone();
        next.phase = Phase::Finished {
            winner,
            resolution: Resolution::CoinToss(reason),
        };
        next.message = describe(&next.phase, self.shift_applied);
        self.commit(next)?;
        self.log_finish();
        Ok(Some(winner))
    }

    /// Runs the dealer turn, the shift and any tie-break back to back.
    pub fn play_out(
        &mut self,
        policy: &dyn DealerPolicy,
        coin: &mut dyn CoinToss,
    ) -> Result<&GameState, GameError> {
        self.run_dealer_turn(policy)?;
        self.run_shift()?;
        self.settle_tie_break(coin)?;
        Ok(&self.state)
    }

    /// Whether the shift roll fired this game.
    pub fn shift_applied(&self) -> bool {
        self.shift_applied
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state.phase, Phase::Finished { .. })
    }

    pub fn game_record(&self, game_id: String) -> GameRecord {
        let (winner, resolution) = match self.state.phase {
            Phase::Finished { winner, resolution } => (Some(winner), Some(resolution)),
            _ => (None, None),
        };
        GameRecord {
            game_id,
            seed: Some(self.seed),
            initial_player_hand: self.initial_hands.0.clone(),
            initial_dealer_hand: self.initial_hands.1.clone(),
            actions: self.actions.clone(),
            shift_applied: self.shift_applied,
            final_player_hand: self.state.player.hand().to_vec(),
            final_dealer_hand: self.state.dealer.hand().to_vec(),
            player_total: compute_total(self.state.player.hand()),
            dealer_total: compute_total(self.state.dealer.hand()),
            winner,
            resolution,
            ts: None,
            meta: None,
        }
    }

    fn apply_dealer_step<F>(&mut self, step: F) -> Result<Option<GameError>, GameError>
    where
        F: FnOnce(&Self) -> Result<(GameState, RecordedAction), GameError>,
    {
        match step(self) {
            Ok((next, record)) => {
                self.commit(next)?;
                self.record(Side::Dealer, record);
                Ok(None)
            }
            Err(e) if e.is_engine_fault() => Err(e),
            Err(e) => Ok(Some(e)),
        }
    }

    fn seat_draw(&self, side: Side) -> Result<(GameState, RecordedAction), GameError> {
        let seat = self.state.seat(side);
        if seat.is_full() {
            return Err(GameError::HandFull);
        }
        let (card, deck) = draw(&self.state.deck)?;
        let mut next = self.state.clone();
        next.deck = deck;
        *seat_mut(&mut next, side) = seat.receive(card)?;
        next.message = format!("{} drew a card.", capitalized(side));
        Ok((next, RecordedAction::Draw { card }))
    }

    fn seat_exchange(
        &self,
        side: Side,
        index: usize,
    ) -> Result<(GameState, RecordedAction), GameError> {
        let seat = self.state.seat(side);
        if seat.locked_index() == Some(index) {
            return Err(GameError::LockedCard { index });
        }
        let ex = exchange(seat.hand(), index, &self.state.deck)?;
        let drawn = ex.hand[index];
        let mut next = self.state.clone();
        next.deck = ex.deck;
        *seat_mut(&mut next, side) = seat.with_replaced_hand(ex.hand);
        next.message = format!("{} exchanged a card.", capitalized(side));
        Ok((
            next,
            RecordedAction::Exchange {
                index,
                discarded: ex.discarded,
                drawn,
            },
        ))
    }

    fn seat_lock(&self, side: Side, index: usize) -> Result<(GameState, RecordedAction), GameError> {
        let seat = self.state.seat(side);
        let locked = seat.lock(index)?;
        let card = seat.hand()[index];
        let mut next = self.state.clone();
        *seat_mut(&mut next, side) = locked;
        next.message = format!("{} placed a card in the interference field.", capitalized(side));
        Ok((next, RecordedAction::Lock { index, card }))
    }

    fn commit(&mut self, next: GameState) -> Result<(), GameError> {
        if self.state.phase.is_after(&next.phase) {
            return Err(GameError::InvariantViolation(format!(
                "phase regressed from {} to {}",
                self.state.phase, next.phase
            )));
        }
        if cfg!(debug_assertions) {
            next.check_invariants()?;
        }
        self.state = next;
        Ok(())
    }

    fn record(&mut self, side: Side, action: RecordedAction) {
        self.actions.push(ActionRecord { side, action });
    }

    fn log_finish(&self) {
        if let Phase::Finished { winner, resolution } = self.state.phase {
            tracing::info!(
                seed = self.seed,
                %winner,
                %resolution,
                player_total = compute_total(self.state.player.hand()),
                dealer_total = compute_total(self.state.dealer.hand()),
                "game finished"
            );
        }
    }
}

fn seat_mut(state: &mut GameState, side: Side) -> &mut Player {
    match side {
        Side::Player => &mut state.player,
        Side::Dealer => &mut state.dealer,
    }
}

fn capitalized(side: Side) -> &'static str {
    match side {
        Side::Player => "Player",
        Side::Dealer => "Dealer",
    }
}

fn describe(phase: &Phase, shifted: bool) -> String {
    let prefix = if shifted { "Sabacc Shift! " } else { "" };
    match phase {
        Phase::Finished { winner, resolution } => {
            format!("{}{} wins: {}.", prefix, capitalized(*winner), resolution)
        }
        Phase::TieBreakPending { reason } => {
            format!("{}Tie ({}). Tossing a coin...", prefix, reason)
        }
        other => format!("{}{}", prefix, other),
    }
}
