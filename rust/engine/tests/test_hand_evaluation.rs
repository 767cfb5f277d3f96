use std::cmp::Ordering;

use holdem_engine::cards::{parse_cards, Card};
use holdem_engine::deck::Deck;
use holdem_engine::hand::{compare_hand_scores, evaluate_best_of_seven, evaluate_five, Category};

fn five(s: &str) -> [Card; 5] {
    let cards = parse_cards(s).unwrap();
    cards.try_into().unwrap()
}

fn best(s: &str) -> holdem_engine::hand::HandScore {
    evaluate_best_of_seven(&parse_cards(s).unwrap())
}

#[test]
fn detects_royal_flush() {
    let hs = best("Th Jh Qh Kh Ah 2c 3d");
    assert_eq!(hs.category, Category::StraightFlush);
    assert_eq!(hs.tiebreak, vec![14]);
    assert_eq!(hs.describe(), "Royal Flush");
}

#[test]
fn wheel_is_a_five_high_straight() {
    let hs = evaluate_five(&five("Ah 2c 3d 4s 5h"));
    assert_eq!(hs.category, Category::Straight);
    assert_eq!(hs.tiebreak, vec![5]);

    let six_high = evaluate_five(&five("2c 3d 4s 5h 6c"));
    assert!(compare_hand_scores(&six_high, &hs).is_gt());
}

#[test]
fn trips_and_two_pairs_pick_the_best_full_house() {
    let hs = best("2s 2h 7d 7c Ks Kd Kh");
    assert_eq!(hs.category, Category::FullHouse);
    assert_eq!(hs.tiebreak, vec![13, 7]);
}

#[test]
fn category_ordering_is_correct() {
    let ordered = [
        "Ac Kd 9h 7s 3c 2d 8h",
        "Ac Ad 9h 7s 3c Jd 8h",
        "Ac Ad 9h 9s 3c Jd 8h",
        "Ac Ad Ah 9s 3c Jd 8h",
        "5c 6d 7h 8s 9c Jd Kh",
        "2h 7h Jh Qh 9h Ac Kd",
        "Kc Kd Kh Qc Qd 2h 3s",
        "Ac Ad Ah As Kc Qd 2h",
        "5h 6h 7h 8h 9h Ac Kd",
    ];
    let scores: Vec<_> = ordered.iter().map(|s| best(s)).collect();
    for (idx, score) in scores.iter().enumerate() {
        assert_eq!(score.category.index() as usize, idx, "{}", ordered[idx]);
    }
    for pair in scores.windows(2) {
        assert!(compare_hand_scores(&pair[1], &pair[0]).is_gt());
    }
}

#[test]
fn kickers_break_ties_and_identical_ranks_split() {
    let a = best("Ac Ad Kh 9s 3c 2d 7h");
    let b = best("As Ah Qh 9c 3d 2s 7c");
    assert!(compare_hand_scores(&a, &b).is_gt());

    // both play the board
    let c = best("2c 3d Ts Js Qs Ks As");
    let d = best("4c 5d Ts Js Qs Ks As");
    assert_eq!(compare_hand_scores(&c, &d), Ordering::Equal);
}

#[test]
fn best_of_seven_dominates_every_five_card_subset() {
    for seed in 0..40 {
        let mut deck = Deck::new_with_seed(seed);
        let cards: Vec<Card> = (0..7).map(|_| deck.deal_card().unwrap()).collect();
        let best = evaluate_best_of_seven(&cards);

        let mut matched = false;
        for skip_a in 0..7 {
            for skip_b in skip_a + 1..7 {
                let subset: Vec<Card> = (0..7)
                    .filter(|&i| i != skip_a && i != skip_b)
                    .map(|i| cards[i])
                    .collect();
                let subset: [Card; 5] = subset.try_into().unwrap();
                let score = evaluate_five(&subset);
                assert!(compare_hand_scores(&best, &score).is_ge());
                matched |= compare_hand_scores(&best, &score).is_eq();
            }
        }
        assert!(matched, "best score must come from some subset");
    }
}

#[test]
fn comparison_is_a_strict_weak_ordering() {
    let scores: Vec<_> = (100..160)
        .map(|seed| {
            let mut deck = Deck::new_with_seed(seed);
            let cards: Vec<Card> = (0..7).map(|_| deck.deal_card().unwrap()).collect();
            evaluate_best_of_seven(&cards)
        })
        .collect();

    for a in &scores {
        assert_eq!(compare_hand_scores(a, a), Ordering::Equal);
        for b in &scores {
            assert_eq!(compare_hand_scores(a, b), compare_hand_scores(b, a).reverse());
            if a.category != b.category {
                assert_eq!(compare_hand_scores(a, b), a.category.cmp(&b.category));
            }
            for c in &scores {
                if compare_hand_scores(a, b).is_lt() && compare_hand_scores(b, c).is_lt() {
                    assert!(compare_hand_scores(a, c).is_lt());
                }
            }
        }
    }
}
