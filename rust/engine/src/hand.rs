use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

/// Evaluated strength of a poker hand: category first, then `tiebreak`
/// values compared left to right.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandScore {
    pub category: Category,
    pub tiebreak: Vec<u8>,
}

impl HandScore {
    pub fn new(category: Category, tiebreak: Vec<u8>) -> Self {
        Self { category, tiebreak }
    }

    /// Human readable description for status labels, e.g. "Full House, Kings full of Sevens".
    pub fn describe(&self) -> String {
        let rank = |i: usize| self.tiebreak.get(i).copied().and_then(Rank::from_u8);
        match (self.category, rank(0), rank(1)) {
            (Category::OnePair, Some(p), _) => format!("Pair of {}", p.plural()),
            (Category::TwoPair, Some(hi), Some(lo)) => {
                format!("Two Pair, {} and {}", hi.plural(), lo.plural())
            }
            (Category::ThreeOfAKind, Some(t), _) => format!("Three {}", t.plural()),
            (Category::FullHouse, Some(t), Some(p)) => {
                format!("Full House, {} full of {}", t.plural(), p.plural())
            }
            (Category::FourOfAKind, Some(q), _) => format!("Four {}", q.plural()),
            (Category::Straight, Some(hi), _) => format!("Straight, {} high", hi),
            (Category::StraightFlush, Some(Rank::Ace), _) => "Royal Flush".to_string(),
            (Category::StraightFlush, Some(hi), _) => format!("Straight Flush, {} high", hi),
            (Category::Flush, Some(hi), _) => format!("Flush, {} high", hi),
            (Category::HighCard, Some(hi), _) => format!("High Card {}", hi),
            (category, _, _) => category.name().to_string(),
        }
    }
}

impl Ord for HandScore {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_hand_scores(self, other)
    }
}

impl PartialOrd for HandScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Scores exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandScore {
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let mut values: Vec<u8> = cards.iter().map(Card::value).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    match (straight_high(&values), flush) {
        (Some(high), true) => HandScore::new(Category::StraightFlush, vec![high]),
        (straight, flush) => {
            let groups = rank_groups(&values);
            let counts: Vec<u8> = groups.iter().map(|&(count, _)| count).collect();
            let ranked: Vec<u8> = groups.iter().map(|&(_, value)| value).collect();
            match counts.as_slice() {
                [4, ..] => HandScore::new(Category::FourOfAKind, ranked),
                [3, 2] => HandScore::new(Category::FullHouse, ranked),
                _ if flush => HandScore::new(Category::Flush, values),
                _ if straight.is_some() => {
                    HandScore::new(Category::Straight, straight.into_iter().collect())
                }
                _ => score_groups(&groups),
            }
        }
    }
}

/// Best score over every five-card subset of up to seven cards. With fewer
/// than five cards only pairs, trips and quads can be formed.
pub fn evaluate_best_of_seven(cards: &[Card]) -> HandScore {
    let n = cards.len();
    if n < 5 {
        let mut values: Vec<u8> = cards.iter().map(Card::value).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        return score_groups(&rank_groups(&values));
    }

    let mut best: Option<HandScore> = None;
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        let score =
                            evaluate_five(&[cards[a], cards[b], cards[c], cards[d], cards[e]]);
                        if best.as_ref().map_or(true, |current| score > *current) {
                            best = Some(score);
                        }
                    }
                }
            }
        }
    }
    best.unwrap_or_else(|| HandScore::new(Category::HighCard, Vec::new()))
}

/// Category first, then tiebreak values in order; a missing value counts as 0.
/// `Equal` signals a split.
pub fn compare_hand_scores(a: &HandScore, b: &HandScore) -> Ordering {
    a.category.cmp(&b.category).then_with(|| {
        let len = a.tiebreak.len().max(b.tiebreak.len());
        (0..len)
            .map(|i| {
                let x = a.tiebreak.get(i).copied().unwrap_or(0);
                let y = b.tiebreak.get(i).copied().unwrap_or(0);
                x.cmp(&y)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

// `values` must be sorted descending.
fn straight_high(values: &[u8]) -> Option<u8> {
    let mut distinct = values.to_vec();
    distinct.dedup();
    if distinct.len() != 5 {
        return None;
    }
    if distinct[0] - distinct[4] == 4 {
        return Some(distinct[0]);
    }
    // wheel: A-2-3-4-5 plays as five high
    if distinct == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

// (count, value) pairs ordered by count then value, both descending.
fn rank_groups(values: &[u8]) -> Vec<(u8, u8)> {
    let mut counts = [0u8; 15];
    for &v in values {
        counts[v as usize] += 1;
    }
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (counts[v as usize], v))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    groups
}

fn score_groups(groups: &[(u8, u8)]) -> HandScore {
    let counts: Vec<u8> = groups.iter().map(|&(count, _)| count).collect();
    let ranked: Vec<u8> = groups.iter().map(|&(_, value)| value).collect();
    let category = match counts.as_slice() {
        [4, ..] => Category::FourOfAKind,
        [3, 2, ..] => Category::FullHouse,
        [3, ..] => Category::ThreeOfAKind,
        [2, 2, ..] => Category::TwoPair,
        [2, ..] => Category::OnePair,
        _ => Category::HighCard,
    };
    HandScore::new(category, ranked)
}
