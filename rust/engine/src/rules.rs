use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::game::HandState;
use crate::player::{Player, PlayerAction as A};

/// An action that has passed validation, with the chip amounts resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips to pay; less than the amount owed when the stack runs out.
    Call(u32),
    /// New street bet for the raiser.
    Raise { to: u32, all_in: bool },
}

/// What the seat to act may do right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub seat: usize,
    pub can_check: bool,
    /// Chips a call costs, already capped at the stack.
    pub call_amount: u32,
    pub call_is_all_in: bool,
    /// Raise target bounds, absent when raising is not possible.
    pub min_raise_to: Option<u32>,
    pub max_raise_to: Option<u32>,
}

impl LegalActions {
    pub fn can_raise(&self) -> bool {
        self.max_raise_to.is_some()
    }
}

/// Validates a requested action for `player` against the street state.
///
/// `opponents_can_respond` is false when every other contender is all-in;
/// raising is then pointless and rejected.
///
/// # Errors
///
/// Returns an illegal-action [`GameError`] (see [`GameError::is_illegal_action`])
/// when the request breaks a betting rule. Nothing is mutated either way.
///
/// # Examples
///
/// ```
/// use holdem_engine::game::HandState;
/// use holdem_engine::player::{Player, PlayerAction};
/// use holdem_engine::rules::{validate_action, ValidatedAction};
///
/// let mut hand = HandState::new();
/// hand.current_bet = 40;
/// hand.min_raise_to = 80;
/// let player = Player::bot(1, "Bot", 1_000);
///
/// assert_eq!(
///     validate_action(&player, &hand, true, PlayerAction::Call),
///     Ok(ValidatedAction::Call(40))
/// );
/// assert!(validate_action(&player, &hand, true, PlayerAction::Raise(60)).is_err());
/// ```
pub fn validate_action(
    player: &Player,
    hand: &HandState,
    opponents_can_respond: bool,
    action: A,
) -> Result<ValidatedAction, GameError> {
    if player.folded {
        return Err(GameError::PlayerAlreadyFolded);
    }
    if player.all_in || player.chips == 0 {
        return Err(GameError::PlayerAllIn);
    }

    let to_call = player.to_call(hand.current_bet);
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Call if to_call == 0 => Ok(ValidatedAction::Check),
        A::Call => Ok(ValidatedAction::Call(to_call.min(player.chips))),
        A::Raise(target) => {
            let max_to = player.current_street_bet + player.chips;
            if max_to <= hand.current_bet {
                return Err(GameError::InsufficientChips);
            }
            if !opponents_can_respond {
                return Err(GameError::RaiseNotAllowed);
            }
            if target >= max_to {
                Ok(ValidatedAction::Raise {
                    to: max_to,
                    all_in: true,
                })
            } else if target < hand.min_raise_to {
                Err(GameError::InvalidBetAmount {
                    amount: target,
                    minimum: hand.min_raise_to.min(max_to),
                })
            } else {
                Ok(ValidatedAction::Raise {
                    to: target,
                    all_in: false,
                })
            }
        }
    }
}

pub fn legal_actions(
    seat: usize,
    player: &Player,
    hand: &HandState,
    opponents_can_respond: bool,
) -> LegalActions {
    let to_call = player.to_call(hand.current_bet);
    let call_amount = to_call.min(player.chips);
    let max_to = player.current_street_bet + player.chips;
    let raise = (opponents_can_respond && max_to > hand.current_bet)
        .then(|| (hand.min_raise_to.min(max_to), max_to));

    LegalActions {
        seat,
        can_check: to_call == 0,
        call_amount,
        call_is_all_in: to_call > 0 && call_amount == player.chips,
        min_raise_to: raise.map(|(min, _)| min),
        max_raise_to: raise.map(|(_, max)| max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn street(current_bet: u32, min_raise_to: u32) -> HandState {
        let mut hand = HandState::new();
        hand.current_bet = current_bet;
        hand.min_raise_to = min_raise_to;
        hand
    }

    #[test]
    fn call_with_nothing_owed_is_a_check() {
        let p = Player::bot(1, "Bot", 500);
        let va = validate_action(&p, &street(0, 40), true, A::Call).unwrap();
        assert_eq!(va, ValidatedAction::Check);
    }

    #[test]
    fn short_stack_raise_is_capped_as_all_in() {
        let mut p = Player::bot(1, "Bot", 70);
        p.current_street_bet = 0;
        let hand = street(40, 80);
        let va = validate_action(&p, &hand, true, A::Raise(500)).unwrap();
        assert_eq!(va, ValidatedAction::Raise { to: 70, all_in: true });

        let legal = legal_actions(1, &p, &hand, true);
        assert_eq!(legal.min_raise_to, Some(70));
        assert_eq!(legal.max_raise_to, Some(70));
    }

    #[test]
    fn cannot_raise_when_stack_only_covers_the_call() {
        let p = Player::bot(1, "Bot", 30);
        let hand = street(40, 80);
        assert_eq!(
            validate_action(&p, &hand, true, A::Raise(80)),
            Err(GameError::InsufficientChips)
        );
        let legal = legal_actions(1, &p, &hand, true);
        assert!(!legal.can_raise());
        assert_eq!(legal.call_amount, 30);
        assert!(legal.call_is_all_in);
    }

    #[test]
    fn raise_against_only_all_in_opponents_is_rejected() {
        let p = Player::bot(1, "Bot", 1_000);
        assert_eq!(
            validate_action(&p, &street(40, 80), false, A::Raise(200)),
            Err(GameError::RaiseNotAllowed)
        );
    }

    #[test]
    fn folded_and_all_in_players_cannot_act() {
        let mut p = Player::bot(1, "Bot", 100);
        p.folded = true;
        assert_eq!(
            validate_action(&p, &street(0, 40), true, A::Fold),
            Err(GameError::PlayerAlreadyFolded)
        );
        let mut q = Player::bot(2, "Bot", 0);
        q.folded = false;
        q.all_in = true;
        assert_eq!(
            validate_action(&q, &street(0, 40), true, A::Call),
            Err(GameError::PlayerAllIn)
        );
    }
}
