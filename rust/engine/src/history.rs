use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::Street;
use crate::hand::HandScore;
use crate::rules::ValidatedAction;

/// What a seat did, with chip amounts resolved.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    SmallBlind { amount: u32 },
    BigBlind { amount: u32 },
    Fold,
    Check,
    Call { amount: u32 },
    Raise { to: u32, all_in: bool },
}

impl From<ValidatedAction> for ActionKind {
    fn from(action: ValidatedAction) -> Self {
        match action {
            ValidatedAction::Fold => ActionKind::Fold,
            ValidatedAction::Check => ActionKind::Check,
            ValidatedAction::Call(amount) => ActionKind::Call { amount },
            ValidatedAction::Raise { to, all_in } => ActionKind::Raise { to, all_in },
        }
    }
}

/// Records a single action during the current hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub street: Street,
    pub kind: ActionKind,
    /// Chosen by the turn timer rather than the seat.
    #[serde(default)]
    pub timed_out: bool,
}

/// A hand revealed at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShownHand {
    pub seat: usize,
    pub cards: Vec<Card>,
    pub score: HandScore,
}

/// Information about the showdown phase when hands are revealed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    pub hands: Vec<ShownHand>,
    /// Seats that won a layer another shown hand competed for.
    pub winners: Vec<usize>,
    /// e.g. "split pot"
    #[serde(default)]
    pub notes: Option<String>,
}
