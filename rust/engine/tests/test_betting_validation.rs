use holdem_engine::errors::GameError;
use holdem_engine::game::HandState;
use holdem_engine::player::{Player, PlayerAction as A};
use holdem_engine::rules::{legal_actions, validate_action, ValidatedAction};

fn facing(current_bet: u32, min_raise_to: u32) -> HandState {
    let mut hand = HandState::new();
    hand.current_bet = current_bet;
    hand.min_raise_to = min_raise_to;
    hand.last_raise_size = min_raise_to - current_bet;
    hand
}

#[test]
fn raise_below_minimum_is_invalid() {
    let p = Player::bot(1, "Bot", 10_000);
    let err = validate_action(&p, &facing(100, 200), true, A::Raise(150)).unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidBetAmount {
            amount: 150,
            minimum: 200
        }
    );
    assert!(err.is_illegal_action());
}

#[test]
fn raise_over_stack_becomes_allin() {
    let p = Player::bot(1, "Bot", 50);
    let va = validate_action(&p, &facing(0, 40), true, A::Raise(100)).unwrap();
    assert_eq!(va, ValidatedAction::Raise { to: 50, all_in: true });
}

#[test]
fn call_with_insufficient_stack_is_partial_call() {
    let p = Player::bot(1, "Bot", 60);
    let va = validate_action(&p, &facing(100, 200), true, A::Call).unwrap();
    assert_eq!(va, ValidatedAction::Call(60));
}

#[test]
fn short_all_in_below_min_raise_is_allowed() {
    // to_call=100, min_raise_to=200, stack=130: the whole stack is a short raise
    let p = Player::bot(1, "Bot", 130);
    let legal = legal_actions(1, &p, &facing(100, 200), true);
    assert_eq!(legal.min_raise_to, Some(130));
    assert_eq!(legal.max_raise_to, Some(130));

    let va = validate_action(&p, &facing(100, 200), true, A::Raise(130)).unwrap();
    assert_eq!(va, ValidatedAction::Raise { to: 130, all_in: true });
}

#[test]
fn big_blind_option_can_check() {
    let mut bb = Player::bot(2, "BB", 960);
    bb.current_street_bet = 40;
    let legal = legal_actions(2, &bb, &facing(40, 80), true);
    assert!(legal.can_check);
    assert_eq!(legal.call_amount, 0);
    assert_eq!(legal.min_raise_to, Some(80));
    assert_eq!(legal.max_raise_to, Some(1_000));
}
