//! Baseline AI implementation.
//!
//! Scores the seat's holding on a 0..1 scale, weighs it against the price of
//! continuing, and mixes in a little randomness so the bots are not fully
//! predictable.

use holdem_engine::betting::opponents_can_respond;
use holdem_engine::cards::Card;
use holdem_engine::engine::Engine;
use holdem_engine::hand::evaluate_best_of_seven;
use holdem_engine::player::PlayerAction;
use holdem_engine::rules::{LegalActions, legal_actions};
use rand::{Rng, RngCore};

use crate::AIOpponent;

/// Weight of each hand category, `HighCard` first.
const CATEGORY_WEIGHT: [f64; 9] = [0.18, 0.38, 0.55, 0.66, 0.74, 0.80, 0.88, 0.95, 0.98];

/// Everything the policy looks at for one decision.
#[derive(Debug, Clone)]
pub struct Situation<'a> {
    pub hole_cards: &'a [Card],
    pub board: &'a [Card],
    pub pot: u32,
    pub current_bet: u32,
    pub chips: u32,
    /// Chips this seat already put in during the hand.
    pub committed: u32,
    pub legal: LegalActions,
}

impl<'a> Situation<'a> {
    pub fn from_engine(engine: &'a Engine, seat: usize) -> Option<Self> {
        let players = engine.players();
        let player = players.get(seat)?;
        let hand = engine.hand();
        Some(Self {
            hole_cards: &player.hole_cards,
            board: &hand.board,
            pot: hand.pot,
            current_bet: hand.current_bet,
            chips: player.chips,
            committed: player.total_hand_contribution,
            legal: legal_actions(seat, player, hand, opponents_can_respond(players, seat)),
        })
    }

    fn to_call(&self) -> u32 {
        self.legal.call_amount
    }
}

/// Rule-based opponent driven by hand strength and pot odds.
///
/// ```rust
/// use holdem_ai::baseline::BaselineAI;
/// use holdem_ai::AIOpponent;
///
/// let ai = BaselineAI::new();
/// assert_eq!(ai.name(), "BaselineAI");
/// ```
#[derive(Debug, Clone)]
pub struct BaselineAI;

impl BaselineAI {
    pub fn new() -> Self {
        Self
    }

    /// Pre-flop strength of two hole cards on a 0..1 scale.
    pub fn evaluate_preflop_strength(hole_cards: [Card; 2]) -> f64 {
        let (a, b) = (hole_cards[0].value(), hole_cards[1].value());
        let (high, low) = if a >= b { (a, b) } else { (b, a) };
        let high_s = f64::from(high - 2) / 12.0;
        let low_s = f64::from(low - 2) / 12.0;

        let mut strength = 0.10 + 0.38 * high_s + 0.17 * low_s;
        if high == low {
            strength += 0.28 + 0.10 * high_s;
        }
        if hole_cards[0].suit == hole_cards[1].suit {
            strength += 0.06;
        }
        match high - low {
            1 => strength += 0.05,
            2 => strength += 0.02,
            gap if gap >= 5 => strength -= 0.08,
            _ => {}
        }
        strength.clamp(0.04, 0.98)
    }

    /// Post-flop strength from the best hand the seat can make so far.
    pub fn evaluate_postflop_strength(hole_cards: &[Card], board: &[Card]) -> f64 {
        let cards: Vec<Card> = hole_cards.iter().chain(board).copied().collect();
        let score = evaluate_best_of_seven(&cards);
        let weight = CATEGORY_WEIGHT[usize::from(score.category.index())];
        let lead = score.tiebreak.first().copied().unwrap_or(2).max(2);
        let kicker = f64::from(lead - 2) / 12.0 * 0.08;
        (weight + kicker).clamp(0.05, 0.98)
    }

    /// Share of the final pot a call would pay for.
    pub fn calculate_pot_odds(pot: u32, to_call: u32) -> f64 {
        if to_call == 0 {
            return 0.0;
        }
        f64::from(to_call) / f64::from(pot + to_call)
    }

    /// Chance of a bet when checking is free.
    fn open_probability(strength: f64) -> f64 {
        (0.8 * strength - 0.15).clamp(0.0, 0.7)
    }

    fn fold_threshold(strength: f64, pot_odds: f64, commitment: f64) -> f64 {
        (0.30 + 0.6 * pot_odds - 0.7 * strength - 0.2 * commitment).clamp(0.08, 0.86)
    }

    fn raise_target(situation: &Situation<'_>, strength: f64) -> Option<u32> {
        let (min, max) = (situation.legal.min_raise_to?, situation.legal.max_raise_to?);
        let size = f64::from(situation.pot) * (0.25 + 0.55 * strength);
        let rounded = ((size / 10.0).round() * 10.0) as u32;
        Some((situation.current_bet + rounded).clamp(min, max))
    }

    fn strength(situation: &Situation<'_>) -> Option<f64> {
        match situation.hole_cards {
            [a, b] if situation.board.is_empty() => Some(Self::evaluate_preflop_strength([*a, *b])),
            [_, _] => Some(Self::evaluate_postflop_strength(
                situation.hole_cards,
                situation.board,
            )),
            _ => None,
        }
    }

    /// Picks an action for `situation`. The result is always legal there.
    pub fn decide(situation: &Situation<'_>, rng: &mut dyn RngCore) -> PlayerAction {
        let Some(strength) = Self::strength(situation) else {
            return if situation.legal.can_check {
                PlayerAction::Call
            } else {
                PlayerAction::Fold
            };
        };

        if situation.to_call() == 0 {
            let roll: f64 = rng.random();
            if roll < Self::open_probability(strength) {
                if let Some(target) = Self::raise_target(situation, strength) {
                    return PlayerAction::Raise(target);
                }
            }
            return PlayerAction::Call;
        }

        let pot_odds = Self::calculate_pot_odds(situation.pot, situation.to_call());
        let commitment = if situation.chips + situation.committed == 0 {
            0.0
        } else {
            f64::from(situation.committed) / f64::from(situation.chips + situation.committed)
        };
        let draw: f64 = rng.random();
        if draw < Self::fold_threshold(strength, pot_odds, commitment) && strength < 0.72 {
            return PlayerAction::Fold;
        }

        let roll: f64 = rng.random();
        if strength > 0.65 && roll < 0.32 {
            if let Some(target) = Self::raise_target(situation, strength) {
                return PlayerAction::Raise(target);
            }
        }
        PlayerAction::Call
    }
}

impl Default for BaselineAI {
    fn default() -> Self {
        Self::new()
    }
}

impl AIOpponent for BaselineAI {
    fn get_action(&self, engine: &Engine, seat: usize, rng: &mut dyn RngCore) -> PlayerAction {
        match Situation::from_engine(engine, seat) {
            Some(situation) => Self::decide(&situation, rng),
            None => PlayerAction::Fold,
        }
    }

    fn name(&self) -> &str {
        "BaselineAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::cards::parse_cards;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn hole(s: &str) -> [Card; 2] {
        parse_cards(s).unwrap().try_into().unwrap()
    }

    fn situation<'a>(hole_cards: &'a [Card], board: &'a [Card], legal: LegalActions) -> Situation<'a> {
        Situation {
            hole_cards,
            board,
            pot: 200,
            current_bet: legal.call_amount,
            chips: 1_000,
            committed: 0,
            legal,
        }
    }

    fn facing(call_amount: u32, raise: Option<(u32, u32)>) -> LegalActions {
        LegalActions {
            seat: 1,
            can_check: call_amount == 0,
            call_amount,
            call_is_all_in: false,
            min_raise_to: raise.map(|r| r.0),
            max_raise_to: raise.map(|r| r.1),
        }
    }

    #[test]
    fn test_preflop_strength_ordering() {
        let aces = BaselineAI::evaluate_preflop_strength(hole("Ah As"));
        let ak_suited = BaselineAI::evaluate_preflop_strength(hole("Ah Kh"));
        let ak_offsuit = BaselineAI::evaluate_preflop_strength(hole("Ah Ks"));
        let trash = BaselineAI::evaluate_preflop_strength(hole("7h 2s"));
        assert!(aces > ak_suited);
        assert!(ak_suited > ak_offsuit);
        assert!(ak_offsuit > trash);
        assert!((0.04..=0.98).contains(&trash));
        assert!((aces - 0.98).abs() < 1e-9);
    }

    #[test]
    fn test_postflop_strength_follows_category() {
        let board = parse_cards("Ad Kc Qh 7s 2d").unwrap();
        let trips = BaselineAI::evaluate_postflop_strength(&hole("Ah As"), &board);
        let nothing = BaselineAI::evaluate_postflop_strength(&hole("9c 3h"), &board);
        assert!(trips > 0.66 && trips < 0.75);
        assert!(nothing < 0.30);
    }

    #[test]
    fn test_pot_odds_calculation() {
        assert!((BaselineAI::calculate_pot_odds(100, 50) - 0.333).abs() < 0.01);
        assert_eq!(BaselineAI::calculate_pot_odds(100, 0), 0.0);
    }

    #[test]
    fn test_strong_hand_never_folds() {
        let cards = hole("Ah As");
        let board = parse_cards("Ad Ac 7h").unwrap();
        let s = situation(&cards, &board, facing(400, Some((800, 1_000))));
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..200 {
            assert_ne!(BaselineAI::decide(&s, &mut rng), PlayerAction::Fold);
        }
    }

    #[test]
    fn test_decisions_stay_within_legal_bounds() {
        let cards = hole("Kh Kd");
        let s = situation(&cards, &[], facing(0, Some((40, 1_000))));
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut raised = false;
        for _ in 0..300 {
            match BaselineAI::decide(&s, &mut rng) {
                PlayerAction::Raise(to) => {
                    raised = true;
                    assert!((40..=1_000).contains(&to));
                    assert_eq!(to % 10, 0);
                }
                PlayerAction::Call => {}
                PlayerAction::Fold => panic!("never folds when checking is free"),
            }
        }
        assert!(raised);
    }

    #[test]
    fn test_no_raise_when_raising_is_illegal() {
        let cards = hole("Ah As");
        let s = situation(&cards, &[], facing(100, None));
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        for _ in 0..200 {
            assert!(!matches!(BaselineAI::decide(&s, &mut rng), PlayerAction::Raise(_)));
        }
    }

    #[test]
    fn test_handles_missing_hole_cards() {
        let s = situation(&[], &[], facing(40, None));
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(BaselineAI::decide(&s, &mut rng), PlayerAction::Fold);
    }
}
