//! One street of betting: turn order, applying validated actions, and deciding
//! when the street is over.

use crate::game::{next_seat_where, HandState};
use crate::player::Player;
use crate::rules::ValidatedAction;

/// Where a street stands after the latest action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreetStatus {
    /// This seat acts next.
    Action(usize),
    /// Everyone else folded; the seat takes the pot without a showdown.
    FoldOut(usize),
    /// Betting is closed and at least two contenders can keep betting.
    Complete,
    /// Betting is closed and at most one contender can still bet, so the rest
    /// of the board is dealt without further action.
    RunOut,
}

pub fn needs_to_act(player: &Player, current_bet: u32) -> bool {
    player.is_eligible()
        && (!player.acted_this_street || player.current_street_bet < current_bet)
}

/// Next seat after `after` that still owes a decision this street.
pub fn next_to_act(players: &[Player], after: usize, current_bet: u32) -> Option<usize> {
    next_seat_where(players, after, |p| needs_to_act(p, current_bet))
}

/// True when some other seat could still call or re-raise.
pub fn opponents_can_respond(players: &[Player], seat: usize) -> bool {
    players
        .iter()
        .enumerate()
        .any(|(idx, p)| idx != seat && p.is_eligible())
}

pub fn street_status(players: &[Player], hand: &HandState, after: usize) -> StreetStatus {
    let contenders: Vec<usize> = players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_contender())
        .map(|(idx, _)| idx)
        .collect();
    if let [only] = contenders.as_slice() {
        return StreetStatus::FoldOut(*only);
    }

    if let Some(seat) = next_to_act(players, after, hand.current_bet) {
        return StreetStatus::Action(seat);
    }

    let can_bet = contenders
        .iter()
        .filter(|&&idx| players[idx].is_eligible())
        .count();
    if can_bet <= 1 {
        StreetStatus::RunOut
    } else {
        StreetStatus::Complete
    }
}

/// Moves a forced bet into the pot. Returns what was actually posted.
pub fn post_blind(player: &mut Player, hand: &mut HandState, amount: u32) -> u32 {
    let paid = player.commit(amount);
    hand.pot += paid;
    paid
}

/// Applies an already validated action for `seat`.
pub fn apply_action(
    players: &mut [Player],
    hand: &mut HandState,
    seat: usize,
    action: ValidatedAction,
    big_blind: u32,
) {
    match action {
        ValidatedAction::Fold => players[seat].folded = true,
        ValidatedAction::Check => {}
        ValidatedAction::Call(amount) => {
            hand.pot += players[seat].commit(amount);
        }
        ValidatedAction::Raise { to, .. } => {
            let player = &mut players[seat];
            let owed = to.saturating_sub(player.current_street_bet);
            hand.pot += player.commit(owed);

            let raise_size = to.saturating_sub(hand.current_bet);
            if to >= hand.min_raise_to {
                hand.last_raise_size = raise_size;
                hand.min_raise_to = to + raise_size.max(big_blind);
            } else {
                // incomplete all-in raise: the raise increment stays as it was
                hand.min_raise_to = hand
                    .min_raise_to
                    .max(to + hand.last_raise_size.max(big_blind));
            }
            hand.current_bet = hand.current_bet.max(to);

            for (idx, other) in players.iter_mut().enumerate() {
                if idx != seat && other.is_eligible() {
                    other.acted_this_street = false;
                }
            }
        }
    }
    players[seat].acted_this_street = true;
}

/// Clears street bets before the next street is dealt.
pub fn reset_for_street(players: &mut [Player], hand: &mut HandState, big_blind: u32) {
    for p in players.iter_mut() {
        p.current_street_bet = 0;
        p.acted_this_street = false;
    }
    hand.current_bet = 0;
    hand.last_raise_size = big_blind;
    hand.min_raise_to = big_blind;
}
