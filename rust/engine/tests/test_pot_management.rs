use holdem_engine::hand::{Category, HandScore};
use holdem_engine::player::Player;
use holdem_engine::pot::PotManager;

fn seats(contributions: &[u32]) -> Vec<Player> {
    contributions
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let mut p = Player::bot(i, format!("P{i}"), 1_000);
            p.total_hand_contribution = c;
            p
        })
        .collect()
}

fn pair_of(value: u8) -> Option<HandScore> {
    Some(HandScore::new(Category::OnePair, vec![value, 9, 5, 3]))
}

#[test]
fn heads_up_simple_side_pot() {
    let pm = PotManager::from_contributions([500, 1000]);
    assert_eq!(pm.main_pot(), 1000);
    assert_eq!(pm.side_pots(), &[500]);
}

#[test]
fn equal_stacks_no_side_pot() {
    let pm = PotManager::from_contributions([1000, 1000]);
    assert_eq!(pm.main_pot(), 2000);
    assert!(pm.side_pots().is_empty());
}

#[test]
fn short_all_in_winner_cannot_take_the_excess() {
    // A is all-in for 60, B put in 600 and loses the showdown
    let players = seats(&[60, 600]);
    let pm = PotManager::from_players(&players);
    assert_eq!(pm.main_pot(), 120);
    assert_eq!(pm.side_pots(), &[540]);
    assert_eq!(pm.pots()[1].eligible, vec![1]);

    let payouts = pm.distribute(&[pair_of(14), pair_of(2)], &[1, 0]);
    assert_eq!(payouts, vec![120, 540]);
}

#[test]
fn three_way_layers_respect_eligibility_and_conserve_chips() {
    let mut players = seats(&[100, 300, 300, 50]);
    players[3].folded = true;
    let pm = PotManager::from_players(&players);
    assert_eq!(pm.total(), 750);
    assert_eq!(pm.main_pot(), 200);
    assert_eq!(pm.side_pots(), &[150, 400]);
    assert!(pm.pots().iter().all(|p| !p.eligible.contains(&3)));

    // shortest stack has the best hand, seat 2 beats seat 1 for the rest
    let scores = vec![pair_of(14), pair_of(3), pair_of(10), None];
    let payouts = pm.distribute(&scores, &[1, 2, 3, 0]);
    assert_eq!(payouts, vec![350, 0, 400, 0]);
    assert_eq!(payouts.iter().sum::<u32>(), 750);
}

#[test]
fn odd_chip_goes_left_of_the_dealer() {
    let pm = PotManager::from_contributions([25, 25, 25]);
    let scores = vec![pair_of(8), pair_of(8), None];
    // dealer is seat 0, so seat 1 is first in order
    let payouts = pm.distribute(&scores, &[1, 2, 0]);
    assert_eq!(payouts, vec![37, 38, 0]);
}
