use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::Player;

/// Betting phase of a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Street that follows this one and the number of board cards it reveals.
    pub fn next(self) -> Option<(Street, usize)> {
        match self {
            Street::PreFlop => Some((Street::Flop, 3)),
            Street::Flop => Some((Street::Turn, 1)),
            Street::Turn => Some((Street::River, 1)),
            Street::River | Street::Showdown => None,
        }
    }
}

/// Lifecycle of a table, one hand at a time.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TablePhase {
    Lobby,
    Dealing,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    Payout,
    TableOver,
}

impl TablePhase {
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            TablePhase::PreFlop | TablePhase::Flop | TablePhase::Turn | TablePhase::River
        )
    }
}

impl From<Street> for TablePhase {
    fn from(street: Street) -> Self {
        match street {
            Street::PreFlop => TablePhase::PreFlop,
            Street::Flop => TablePhase::Flop,
            Street::Turn => TablePhase::Turn,
            Street::River => TablePhase::River,
            Street::Showdown => TablePhase::Showdown,
        }
    }
}

/// Shared per-hand state.
///
/// Invariants: `pot` equals the sum of every seat's `total_hand_contribution`,
/// and `current_bet` equals the highest `current_street_bet` among seats that
/// have not folded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandState {
    pub hand_number: u64,
    pub street: Street,
    pub board: Vec<Card>,
    pub pot: u32,
    pub current_bet: u32,
    pub min_raise_to: u32,
    pub last_raise_size: u32,
    pub dealer_seat_index: usize,
}

impl HandState {
    pub fn new() -> Self {
        Self {
            hand_number: 0,
            street: Street::PreFlop,
            board: Vec::with_capacity(5),
            pot: 0,
            current_bet: 0,
            min_raise_to: 0,
            last_raise_size: 0,
            dealer_seat_index: 0,
        }
    }
}

impl Default for HandState {
    fn default() -> Self {
        Self::new()
    }
}

/// First seat strictly after `from` (wrapping, `from` itself checked last)
/// matching `pred`.
pub fn next_seat_where<F>(players: &[Player], from: usize, pred: F) -> Option<usize>
where
    F: Fn(&Player) -> bool,
{
    let n = players.len();
    (1..=n)
        .map(|offset| (from + offset) % n)
        .find(|&idx| pred(&players[idx]))
}

/// Seats in table order starting just after `from`.
pub fn seats_after(n: usize, from: usize) -> impl Iterator<Item = usize> {
    (1..=n).map(move |offset| (from + offset) % n)
}

pub fn funded_seats(players: &[Player]) -> usize {
    players.iter().filter(|p| p.has_chips()).count()
}
