use holdem_ai::create_ai;
use holdem_engine::engine::{Engine, Progress, TableConfig};
use holdem_engine::player::Player;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bots(count: usize, chips: u32) -> Vec<Player> {
    (0..count)
        .map(|i| Player::bot(i, format!("Bot {i}"), chips))
        .collect()
}

#[test]
fn baseline_only_makes_legal_moves() {
    let ai = create_ai("baseline");
    for seed in 0..6u64 {
        let mut engine = Engine::new(TableConfig::default(), bots(6, 800), Some(seed)).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let total: u32 = engine.players().iter().map(|p| p.chips).sum();

        for _ in 0..40 {
            let mut progress = engine.start_hand().unwrap();
            while let Progress::AwaitingAction(seat) = progress {
                let action = ai.get_action(&engine, seat, &mut rng);
                progress = engine
                    .apply_action(seat, action)
                    .unwrap_or_else(|e| panic!("seed {seed}: {action:?} rejected: {e}"));
            }
            assert_eq!(engine.players().iter().map(|p| p.chips).sum::<u32>(), total);
            if progress == Progress::TableOver || engine.is_table_over() {
                break;
            }
        }
    }
}

#[test]
fn same_seed_replays_the_same_table() {
    let run = |seed: u64| {
        let ai = create_ai("baseline");
        let mut engine = Engine::new(TableConfig::default(), bots(4, 1_000), Some(seed)).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        for _ in 0..10 {
            let mut progress = engine.start_hand().unwrap();
            while let Progress::AwaitingAction(seat) = progress {
                let action = ai.get_action(&engine, seat, &mut rng);
                progress = engine.apply_action(seat, action).unwrap();
            }
            if engine.is_table_over() {
                break;
            }
        }
        engine.players().iter().map(|p| p.chips).collect::<Vec<_>>()
    };
    assert_eq!(run(9), run(9));
}
