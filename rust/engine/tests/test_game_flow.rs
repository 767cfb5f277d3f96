use holdem_engine::cards::{parse_cards, Card};
use holdem_engine::deck::Deck;
use holdem_engine::engine::{Engine, Progress, TableConfig};
use holdem_engine::game::{Street, TablePhase};
use holdem_engine::history::ActionKind;
use holdem_engine::player::{Player, PlayerAction};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn table(stacks: &[u32], seed: u64) -> Engine {
    let players = stacks
        .iter()
        .enumerate()
        .map(|(i, &chips)| {
            if i == 0 {
                Player::human(i, "You", chips)
            } else {
                Player::bot(i, format!("Bot {i}"), chips)
            }
        })
        .collect();
    Engine::new(TableConfig::default(), players, Some(seed)).unwrap()
}

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).unwrap()
}

#[test]
fn scripted_hand_reaches_showdown_and_pays_the_best_hand() {
    let mut eng = table(&[1_000, 1_000, 1_000], 5);
    // deal order: seat 1, 2, 0, twice; then burn/flop, burn/turn, burn/river
    eng.set_next_deck(Deck::stacked(&cards(
        "Kc 7s Ah Kd 2c Ad 5s Ks 9h 4c 6s 3d 8c Jh",
    )));

    assert_eq!(eng.start_hand().unwrap(), Progress::AwaitingAction(0));
    assert_eq!(eng.players()[0].hole_cards, cards("Ah Ad"));
    eng.apply_action(0, PlayerAction::Call).unwrap();
    eng.apply_action(1, PlayerAction::Call).unwrap();
    let mut progress = eng.apply_action(2, PlayerAction::Call).unwrap();
    assert_eq!(eng.phase(), TablePhase::Flop);
    assert_eq!(eng.hand().board, cards("Ks 9h 4c"));

    // post-flop action starts left of the dealer
    while let Progress::AwaitingAction(seat) = progress {
        progress = eng.apply_action(seat, PlayerAction::Call).unwrap();
    }
    let Progress::HandComplete(result) = progress else {
        panic!("hand should be over");
    };

    assert!(result.went_to_showdown);
    assert_eq!(result.board, cards("Ks 9h 4c 3d Jh"));
    assert_eq!(result.pot, 120);
    assert_eq!(result.winners, vec![1]);
    assert_eq!(result.payouts, vec![0, 120, 0]);
    assert_eq!(result.deltas, vec![-40, 80, -40]);
    assert_eq!(eng.deck_remaining(), 52 - 6 - 3 - 5);
    assert!(eng.players()[1].status_label.starts_with("Winner"));
    assert_eq!(eng.phase(), TablePhase::Payout);

    let checks = eng
        .actions()
        .iter()
        .filter(|a| a.street == Street::River && a.kind == ActionKind::Check)
        .count();
    assert_eq!(checks, 3);
}

#[test]
fn fold_out_pays_the_whole_pot_without_evaluation() {
    let mut eng = table(&[1_000, 1_000, 1_000], 11);
    eng.start_hand().unwrap();
    eng.apply_action(0, PlayerAction::Raise(120)).unwrap();
    eng.apply_action(1, PlayerAction::Fold).unwrap();
    let progress = eng.apply_action(2, PlayerAction::Fold).unwrap();

    let Progress::HandComplete(result) = progress else {
        panic!("expected fold-out");
    };
    assert!(!result.went_to_showdown);
    assert_eq!(result.pot, 180);
    assert_eq!(result.payouts[0], 180);
    assert_eq!(result.deltas, vec![60, -20, -40]);
    assert!(eng.players().iter().all(|p| p.hand_score.is_none()));
    assert!(result.board.is_empty());
}

#[test]
fn short_all_in_example_returns_nothing_to_the_loser() {
    let mut eng = table(&[60, 600], 2);
    // heads-up: dealer seat 0 posts SB; seat 1 is dealt first
    eng.set_next_deck(Deck::stacked(&cards(
        "7c Ah 2d As 5s Kd 9s 4c 6s 3h 8c Jd",
    )));
    assert_eq!(eng.start_hand().unwrap(), Progress::AwaitingAction(0));
    eng.apply_action(0, PlayerAction::Raise(60)).unwrap();

    // nobody is left to respond to a raise
    let legal = eng.legal_actions().unwrap();
    assert_eq!(legal.seat, 1);
    assert!(!legal.can_raise());
    assert_eq!(legal.call_amount, 20);

    let Progress::HandComplete(result) = eng.apply_action(1, PlayerAction::Call).unwrap() else {
        panic!("board should run out");
    };
    assert_eq!(result.board.len(), 5);
    assert_eq!(result.payouts, vec![120, 0]);
    assert_eq!(eng.players()[0].chips, 120);
    assert_eq!(eng.players()[1].chips, 540);
}

#[test]
fn returned_excess_is_not_counted_as_a_win() {
    let mut eng = table(&[60, 1_000, 1_000], 4);
    eng.set_next_deck(Deck::stacked(&cards(
        "Kc 7s Ah 8d 2c Ad 5s Ks 9h 4c 6s 3d 8c Jh",
    )));
    assert_eq!(eng.start_hand().unwrap(), Progress::AwaitingAction(0));
    eng.apply_action(0, PlayerAction::Raise(60)).unwrap();
    eng.apply_action(1, PlayerAction::Raise(300)).unwrap();
    let Progress::HandComplete(result) = eng.apply_action(2, PlayerAction::Fold).unwrap() else {
        panic!("board should run out");
    };

    assert_eq!(result.payouts, vec![160, 240, 0]);
    assert_eq!(result.winners, vec![0]);
    let showdown = result.showdown.as_ref().unwrap();
    assert_eq!(showdown.winners, vec![0]);
    assert_eq!(showdown.notes, None);
    assert!(eng.players()[0].status_label.starts_with("Winner - "));
    assert!(eng.players()[1].status_label.starts_with("Loser - "));
    assert_eq!(eng.players()[2].status_label, "Fold");
}

#[test]
fn tied_hands_are_labelled_as_a_split() {
    let mut eng = table(&[1_000, 1_000], 6);
    // both seats play the broadway straight on the board
    eng.set_next_deck(Deck::stacked(&cards(
        "2c 3d 4h 5s 9c Ah Kd Qs 8c Jc 7d Tc",
    )));
    assert_eq!(eng.start_hand().unwrap(), Progress::AwaitingAction(0));
    let mut progress = eng.apply_action(0, PlayerAction::Call).unwrap();
    while let Progress::AwaitingAction(seat) = progress {
        progress = eng.apply_action(seat, PlayerAction::Call).unwrap();
    }
    let Progress::HandComplete(result) = progress else {
        panic!("hand should be over");
    };

    assert_eq!(result.winners, vec![0, 1]);
    assert_eq!(result.payouts, vec![40, 40]);
    let notes = result.showdown.as_ref().and_then(|s| s.notes.as_deref());
    assert_eq!(notes, Some("split pot"));
    assert!(eng.players().iter().all(|p| p.status_label.starts_with("Split - ")));
}

#[test]
fn random_play_keeps_pot_and_chip_invariants() {
    let stacks = [600, 900, 1_200, 300];
    let total: u32 = stacks.iter().sum();
    let mut eng = table(&stacks, 77);
    let mut rng = ChaCha20Rng::seed_from_u64(77);

    for _ in 0..150 {
        let mut progress = eng.start_hand().unwrap();
        if progress == Progress::TableOver {
            break;
        }
        let mut last_min = (eng.hand().street, eng.hand().min_raise_to);

        while let Progress::AwaitingAction(seat) = progress {
            let legal = eng.legal_actions().unwrap();
            let roll: f64 = rng.random();
            let action = match (legal.min_raise_to, legal.max_raise_to) {
                _ if roll < 0.1 => PlayerAction::Fold,
                (Some(min), Some(max)) if roll > 0.75 => PlayerAction::Raise(rng.random_range(min..=max)),
                _ => PlayerAction::Call,
            };
            progress = eng.apply_action(seat, action).unwrap();

            let hand = eng.hand();
            let players = eng.players();
            if matches!(progress, Progress::AwaitingAction(_)) {
                let contributed: u32 = players.iter().map(|p| p.total_hand_contribution).sum();
                assert_eq!(hand.pot, contributed);
                assert_eq!(players.iter().map(|p| p.chips).sum::<u32>() + hand.pot, total);
                let max_bet = players.iter().map(|p| p.current_street_bet).max().unwrap();
                assert_eq!(hand.current_bet, max_bet);
                if hand.street == last_min.0 {
                    assert!(hand.min_raise_to >= last_min.1);
                }
                last_min = (hand.street, hand.min_raise_to);
            }
        }

        let Progress::HandComplete(result) = progress else {
            panic!("hand ended without a result");
        };
        assert_eq!(result.payouts.iter().sum::<u32>(), result.pot);
        assert_eq!(result.deltas.iter().sum::<i64>(), 0);
        assert_eq!(eng.players().iter().map(|p| p.chips).sum::<u32>(), total);
    }
}
