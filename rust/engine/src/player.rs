use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::HandScore;

/// An action requested for the seat whose turn it is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Give up the hand.
    Fold,
    /// Check when nothing is owed, otherwise call (capped at the stack).
    Call,
    /// Raise the street bet to the given total.
    Raise(u32),
}

/// Default stack for computer-controlled seats.
pub const STARTING_STACK: u32 = 2_000;

/// A seat at the table. Seats keep their index for the life of the table;
/// per-hand fields are reset by [`Player::reset_for_hand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    pub is_human: bool,
    pub name: String,
    pub chips: u32,
    pub hole_cards: Vec<Card>,
    pub current_street_bet: u32,
    pub total_hand_contribution: u32,
    pub folded: bool,
    pub all_in: bool,
    pub acted_this_street: bool,
    pub status_label: String,
    pub hand_score: Option<HandScore>,
}

impl Player {
    pub fn new(id: usize, name: impl Into<String>, chips: u32, is_human: bool) -> Self {
        Self {
            id,
            is_human,
            name: name.into(),
            chips,
            hole_cards: Vec::with_capacity(2),
            current_street_bet: 0,
            total_hand_contribution: 0,
            folded: chips == 0,
            all_in: false,
            acted_this_street: false,
            status_label: String::new(),
            hand_score: None,
        }
    }

    pub fn human(id: usize, name: impl Into<String>, chips: u32) -> Self {
        Self::new(id, name, chips, true)
    }

    pub fn bot(id: usize, name: impl Into<String>, chips: u32) -> Self {
        Self::new(id, name, chips, false)
    }

    /// Clears cards and bets. A seat without chips sits the hand out.
    pub fn reset_for_hand(&mut self) {
        self.hole_cards.clear();
        self.current_street_bet = 0;
        self.total_hand_contribution = 0;
        self.folded = self.chips == 0;
        self.all_in = false;
        self.acted_this_street = false;
        self.hand_score = None;
        self.status_label = if self.folded {
            "Out".to_string()
        } else {
            String::new()
        };
    }

    /// Still holding cards in this hand (possibly all-in).
    pub fn is_contender(&self) -> bool {
        !self.folded
    }

    /// Can still make a betting decision.
    pub fn is_eligible(&self) -> bool {
        !self.folded && !self.all_in && self.chips > 0
    }

    pub fn has_chips(&self) -> bool {
        self.chips > 0
    }

    pub fn give_card(&mut self, c: Card) {
        self.hole_cards.push(c);
    }

    /// Moves up to `amount` chips from the stack into the pot and returns what
    /// was actually paid. Emptying the stack marks the seat all-in.
    pub fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.current_street_bet += paid;
        self.total_hand_contribution += paid;
        if self.chips == 0 {
            self.all_in = true;
        }
        paid
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.chips = self.chips.saturating_add(amount);
    }

    pub fn to_call(&self, current_bet: u32) -> u32 {
        current_bet.saturating_sub(self.current_street_bet)
    }
}
