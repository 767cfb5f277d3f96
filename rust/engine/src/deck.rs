use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// A deck owned by exactly one hand. Cards are taken from the top (the end of
/// the vector), and an exhausted deck is never refilled mid-hand.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Fresh 52-card deck with a uniform Fisher–Yates permutation drawn from `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Self { cards }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Deck in a caller-chosen order; the last card is dealt first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Stacked deck where `top_first[0]` is dealt first. Used to script hands.
    pub fn stacked(top_first: &[Card]) -> Self {
        let mut cards: Vec<Card> = full_deck()
            .into_iter()
            .filter(|c| !top_first.contains(c))
            .collect();
        cards.extend(top_first.iter().rev().copied());
        Self { cards }
    }

    pub fn deal_card(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    pub fn burn_card(&mut self) -> Result<(), GameError> {
        self.deal_card().map(|_| ())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}
