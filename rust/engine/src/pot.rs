//! Side-pot construction and distribution.
//!
//! The pot is cut into layers at every distinct contribution level. A layer is
//! contested only by seats that reached its level and have not folded; folded
//! contributors forfeit their share to whoever wins the layer.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::hand::{compare_hand_scores, HandScore};
use crate::player::Player;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    /// Contribution level that closes this layer.
    pub level: u32,
    pub amount: u32,
    /// Seats that may win this layer.
    pub eligible: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotManager {
    seats: usize,
    pots: Vec<SidePot>,
}

impl PotManager {
    /// Builds layers where every contributor is eligible.
    pub fn from_contributions<I>(contributions: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let entries: Vec<(u32, bool)> = contributions.into_iter().map(|c| (c, true)).collect();
        Self::build(&entries)
    }

    /// Builds layers from a finished hand: folded seats feed the pot but
    /// cannot win any part of it.
    pub fn from_players(players: &[Player]) -> Self {
        let entries: Vec<(u32, bool)> = players
            .iter()
            .map(|p| (p.total_hand_contribution, !p.folded))
            .collect();
        Self::build(&entries)
    }

    fn build(entries: &[(u32, bool)]) -> Self {
        let mut levels: Vec<u32> = entries
            .iter()
            .map(|&(c, _)| c)
            .filter(|&c| c > 0)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots = Vec::with_capacity(levels.len());
        let mut previous = 0;
        for level in levels {
            let reached: Vec<usize> = entries
                .iter()
                .enumerate()
                .filter(|(_, &(c, _))| c >= level)
                .map(|(seat, _)| seat)
                .collect();
            let eligible = reached
                .iter()
                .copied()
                .filter(|&seat| entries[seat].1)
                .collect();
            pots.push(SidePot {
                level,
                amount: (level - previous) * reached.len() as u32,
                eligible,
            });
            previous = level;
        }

        Self {
            seats: entries.len(),
            pots,
        }
    }

    pub fn pots(&self) -> &[SidePot] {
        &self.pots
    }

    pub fn main_pot(&self) -> u32 {
        self.pots.first().map(|p| p.amount).unwrap_or(0)
    }

    pub fn side_pots(&self) -> Vec<u32> {
        self.pots.iter().skip(1).map(|p| p.amount).collect()
    }

    pub fn total(&self) -> u32 {
        self.pots.iter().map(|p| p.amount).sum()
    }

    /// Splits every layer among its best eligible hands and returns the
    /// payout per seat.
    ///
    /// `scores[seat]` must be set for every eligible seat. Odd chips left by
    /// a split go one at a time to the tied winners in `odd_chip_order`
    /// (table order starting left of the dealer). A layer nobody can win is
    /// folded into the nearest lower layer that has eligible seats.
    pub fn distribute(&self, scores: &[Option<HandScore>], odd_chip_order: &[usize]) -> Vec<u32> {
        let mut payouts = vec![0u32; self.seats];
        for award in self.awards(scores, odd_chip_order) {
            let share = award.amount / award.winners.len() as u32;
            let mut remainder = award.amount % award.winners.len() as u32;
            for seat in award.winners {
                payouts[seat] += share;
                if remainder > 0 {
                    payouts[seat] += 1;
                    remainder -= 1;
                }
            }
        }
        payouts
    }

    /// Per-layer outcome behind [`PotManager::distribute`]. Layers with no
    /// scored seat are already merged away; every award has a winner.
    pub fn awards(&self, scores: &[Option<HandScore>], odd_chip_order: &[usize]) -> Vec<LayerAward> {
        let mut merged: Vec<SidePot> = Vec::with_capacity(self.pots.len());
        let mut carry = 0;
        for pot in &self.pots {
            let has_eligible = pot
                .eligible
                .iter()
                .any(|&seat| scores.get(seat).is_some_and(Option::is_some));
            match (has_eligible, merged.last_mut()) {
                (true, _) => {
                    let mut pot = pot.clone();
                    pot.amount += std::mem::take(&mut carry);
                    merged.push(pot);
                }
                (false, Some(lower)) => lower.amount += pot.amount,
                (false, None) => carry += pot.amount,
            }
        }

        merged
            .iter()
            .filter_map(|pot| {
                let winners = layer_winners(pot, scores, odd_chip_order);
                if winners.is_empty() {
                    return None;
                }
                let scored = pot
                    .eligible
                    .iter()
                    .filter(|&&seat| scores.get(seat).is_some_and(Option::is_some))
                    .count();
                Some(LayerAward {
                    amount: pot.amount,
                    winners,
                    contested: scored > 1,
                })
            })
            .collect()
    }
}

/// One layer of the pot after showdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerAward {
    pub amount: u32,
    /// Best eligible seats, in odd-chip order.
    pub winners: Vec<usize>,
    /// More than one shown hand competed for the layer. An uncontested layer
    /// is a return of unmatched chips, not a win.
    pub contested: bool,
}

// Best eligible seats of a layer, sorted by position in `odd_chip_order`.
fn layer_winners(pot: &SidePot, scores: &[Option<HandScore>], odd_chip_order: &[usize]) -> Vec<usize> {
    let scored: Vec<(usize, &HandScore)> = pot
        .eligible
        .iter()
        .filter_map(|&seat| scores.get(seat).and_then(Option::as_ref).map(|s| (seat, s)))
        .collect();
    let Some(best) = scored.iter().map(|&(_, s)| s).max_by(|a, b| compare_hand_scores(a, b)) else {
        return Vec::new();
    };

    let mut winners: Vec<usize> = scored
        .iter()
        .filter(|&&(_, s)| compare_hand_scores(s, best) == Ordering::Equal)
        .map(|&(seat, _)| seat)
        .collect();
    winners.sort_by_key(|seat| {
        odd_chip_order
            .iter()
            .position(|s| s == seat)
            .unwrap_or(usize::MAX)
    });
    winners
}
