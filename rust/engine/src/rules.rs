use crate::errors::GameError;
use crate::game::{GameState, Phase};
use crate::player::{Player, PlayerAction as A};

/// Checks whether a seat may take `action` given its own hand.
///
/// Deck exhaustion is not checked here; drawing from an empty deck is an
/// engine fault and surfaces from the deck operations themselves.
///
/// # Arguments
///
/// * `seat` - The acting seat
/// * `action` - The action the seat wishes to perform
///
/// # Returns
///
/// `Ok(())` if the action is legal, otherwise the user-facing reason it is not.
///
/// # Errors
///
/// * [`GameError::HandFull`] - Drawing with five cards already in hand
/// * [`GameError::InvalidIndex`] - Exchange or lock index out of range
/// * [`GameError::LockedCard`] - Exchanging the card in the interference field
/// * [`GameError::AlreadyLocked`] - Locking the card that is already locked
pub fn validate_seat_action(seat: &Player, action: A) -> Result<(), GameError> {
    let len = seat.hand().len();
    match action {
        A::Draw if seat.is_full() => Err(GameError::HandFull),
        A::Draw | A::Stand => Ok(()),
        A::Exchange(index) | A::Lock(index) if index >= len => {
            Err(GameError::InvalidIndex { index, len })
        }
        A::Exchange(index) if seat.locked_index() == Some(index) => {
            Err(GameError::LockedCard { index })
        }
        A::Exchange(_) => Ok(()),
        A::Lock(index) if seat.locked_index() == Some(index) => {
            Err(GameError::AlreadyLocked { index })
        }
        A::Lock(_) => Ok(()),
    }
}

/// Checks a player action against the phase and the player's hand.
pub fn validate_player_action(state: &GameState, action: A) -> Result<(), GameError> {
    if state.phase != Phase::PlayerTurn {
        return Err(GameError::OutOfTurn {
            phase: state.phase.to_string(),
        });
    }
    validate_seat_action(&state.player, action)
}

/// Every action the player could take right now, in hand order.
pub fn legal_player_actions(state: &GameState) -> Vec<A> {
    if state.phase != Phase::PlayerTurn {
        return Vec::new();
    }
    let len = state.player.hand().len();
    let mut candidates = vec![A::Draw];
    candidates.extend((0..len).map(A::Exchange));
    candidates.extend((0..len).map(A::Lock));
    candidates.push(A::Stand);
    candidates
        .into_iter()
        .filter(|a| validate_seat_action(&state.player, *a).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::build_deck;

    fn seat(n: usize) -> Player {
        Player::with_hand(build_deck().into_iter().take(n).collect())
    }

    #[test]
    fn legal_actions_follow_hand_and_phase() {
        let mut state = GameState {
            deck: Vec::new(),
            player: seat(5),
            dealer: Player::default(),
            phase: Phase::PlayerTurn,
            message: String::new(),
        };
        let legal = legal_player_actions(&state);
        assert!(!legal.contains(&A::Draw));
        assert_eq!(legal.iter().filter(|a| matches!(a, A::Exchange(_))).count(), 5);
        assert_eq!(legal.last(), Some(&A::Stand));

        state.player = state.player.lock(2).unwrap();
        let legal = legal_player_actions(&state);
        assert!(!legal.contains(&A::Exchange(2)));
        assert!(!legal.contains(&A::Lock(2)));
        assert!(legal.contains(&A::Lock(1)));

        state.phase = Phase::DealerTurn;
        assert!(legal_player_actions(&state).is_empty());
    }

    #[test]
    fn full_hand_cannot_draw() {
        assert_eq!(validate_seat_action(&seat(5), A::Draw), Err(GameError::HandFull));
        assert_eq!(validate_seat_action(&seat(4), A::Draw), Ok(()));
    }

    #[test]
    fn indices_are_bounds_checked() {
        assert_eq!(
            validate_seat_action(&seat(2), A::Exchange(2)),
            Err(GameError::InvalidIndex { index: 2, len: 2 })
        );
        assert_eq!(
            validate_seat_action(&seat(2), A::Lock(7)),
            Err(GameError::InvalidIndex { index: 7, len: 2 })
        );
    }

    #[test]
    fn locked_card_rules() {
        let locked = seat(3).lock(1).unwrap();
        assert_eq!(
            validate_seat_action(&locked, A::Exchange(1)),
            Err(GameError::LockedCard { index: 1 })
        );
        assert_eq!(
            validate_seat_action(&locked, A::Lock(1)),
            Err(GameError::AlreadyLocked { index: 1 })
        );
        assert_eq!(validate_seat_action(&locked, A::Lock(0)), Ok(()));
        assert_eq!(validate_seat_action(&locked, A::Exchange(2)), Ok(()));
    }
}
