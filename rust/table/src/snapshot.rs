//! Read-only views of a table, filtered for the human seat.

use holdem_engine::cards::Card;
use holdem_engine::engine::Engine;
use holdem_engine::game::{Street, TablePhase};
use holdem_engine::rules::LegalActions;
use serde::{Deserialize, Serialize};

use crate::events::TableId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: usize,
    pub name: String,
    pub is_human: bool,
    pub chips: u32,
    pub current_street_bet: u32,
    pub total_hand_contribution: u32,
    pub folded: bool,
    pub all_in: bool,
    pub is_dealer: bool,
    pub status_label: String,
    /// `None` while the cards are face down.
    pub hole_cards: Option<Vec<Card>>,
    pub hand_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub table_id: TableId,
    pub hand_number: u64,
    pub phase: TablePhase,
    pub street: Street,
    pub board: Vec<Card>,
    pub pot: u32,
    pub current_bet: u32,
    pub min_raise_to: u32,
    pub active_seat: Option<usize>,
    pub seats: Vec<SeatView>,
    /// Present only while the human seat is to act.
    pub legal_actions: Option<LegalActions>,
    /// Time left on the human seat's turn.
    pub turn_deadline_ms: Option<u64>,
}

impl TableSnapshot {
    /// Builds the human seat's view of `engine`. Computer hole cards stay
    /// hidden unless the last hand reached a showdown they took part in.
    pub fn capture(table_id: &TableId, engine: &Engine, turn_deadline_ms: Option<u64>) -> Self {
        let hand = engine.hand();
        let phase = engine.phase();
        let reveal = matches!(
            phase,
            TablePhase::Showdown | TablePhase::Payout | TablePhase::TableOver
        ) && engine
            .last_result()
            .is_some_and(|r| r.went_to_showdown && r.hand_number == hand.hand_number);

        let seats = engine
            .players()
            .iter()
            .enumerate()
            .map(|(seat, p)| {
                let shown = p.is_human || (reveal && p.hand_score.is_some());
                SeatView {
                    seat,
                    name: p.name.clone(),
                    is_human: p.is_human,
                    chips: p.chips,
                    current_street_bet: p.current_street_bet,
                    total_hand_contribution: p.total_hand_contribution,
                    folded: p.folded,
                    all_in: p.all_in,
                    is_dealer: engine.dealer_seat() == Some(seat),
                    status_label: p.status_label.clone(),
                    hole_cards: shown.then(|| p.hole_cards.clone()),
                    hand_description: if shown {
                        p.hand_score.as_ref().map(|s| s.describe())
                    } else {
                        None
                    },
                }
            })
            .collect();

        let active_seat = engine.current_player();
        let human_turn = active_seat.is_some() && active_seat == engine.human_seat();

        Self {
            table_id: table_id.clone(),
            hand_number: hand.hand_number,
            phase,
            street: hand.street,
            board: hand.board.clone(),
            pot: hand.pot,
            current_bet: hand.current_bet,
            min_raise_to: hand.min_raise_to,
            active_seat,
            seats,
            legal_actions: if human_turn { engine.legal_actions() } else { None },
            turn_deadline_ms: if human_turn { turn_deadline_ms } else { None },
        }
    }

    pub fn human(&self) -> Option<&SeatView> {
        self.seats.iter().find(|s| s.is_human)
    }

    pub fn is_human_turn(&self) -> bool {
        self.legal_actions.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::engine::{Progress, TableConfig};
    use holdem_engine::player::{Player, PlayerAction};

    fn engine() -> Engine {
        let players = vec![
            Player::human(0, "You", 1_000),
            Player::bot(1, "Ava", 1_000),
            Player::bot(2, "Milo", 1_000),
        ];
        Engine::new(TableConfig::default(), players, Some(3)).unwrap()
    }

    #[test]
    fn hides_computer_cards_during_play() {
        let mut engine = engine();
        engine.start_hand().unwrap();
        let snap = TableSnapshot::capture(&"t".to_string(), &engine, Some(1_000));

        assert_eq!(snap.hand_number, 1);
        assert_eq!(snap.pot, 60);
        assert_eq!(snap.human().unwrap().hole_cards.as_ref().unwrap().len(), 2);
        for seat in snap.seats.iter().filter(|s| !s.is_human) {
            assert!(seat.hole_cards.is_none());
        }
    }

    #[test]
    fn legal_actions_only_on_human_turn() {
        let mut engine = engine();
        // three-handed the dealer (seat 0, human) opens pre-flop
        let progress = engine.start_hand().unwrap();
        assert_eq!(progress, Progress::AwaitingAction(0));
        let snap = TableSnapshot::capture(&"t".to_string(), &engine, Some(500));
        assert!(snap.is_human_turn());
        assert_eq!(snap.turn_deadline_ms, Some(500));

        engine.apply_action(0, PlayerAction::Call).unwrap();
        let snap = TableSnapshot::capture(&"t".to_string(), &engine, Some(500));
        assert_eq!(snap.active_seat, Some(1));
        assert!(!snap.is_human_turn());
        assert_eq!(snap.turn_deadline_ms, None);
    }

    #[test]
    fn fold_out_keeps_cards_hidden() {
        let mut engine = engine();
        engine.start_hand().unwrap();
        engine.apply_action(0, PlayerAction::Fold).unwrap();
        let progress = engine.apply_action(1, PlayerAction::Fold).unwrap();
        assert!(matches!(progress, Progress::HandComplete(_)));

        let snap = TableSnapshot::capture(&"t".to_string(), &engine, None);
        assert!(snap.seats.iter().filter(|s| !s.is_human).all(|s| s.hole_cards.is_none()));
    }
}
