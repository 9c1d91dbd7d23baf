//! Property tests: card conservation, scoring invariants, AI optimality.

use proptest::prelude::*;

use thirty_one::{
    choose_discard, evaluate_hand, Card, Difficulty, GameBuilder, GameEngine, GameRng, Phase,
    Rank, Suit,
};

fn all_cards() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            cards.push(Card::new(suit, rank));
        }
    }
    cards
}

fn difficulty_strategy() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

fn kept_score(hand: &[Card], skip: usize) -> u32 {
    let kept: Vec<Card> = hand
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, c)| *c)
        .collect();
    evaluate_hand(&kept).score
}

proptest! {
    #[test]
    fn evaluate_hand_is_order_invariant(
        hand in proptest::sample::subsequence(all_cards(), 1..=4),
        seed in any::<u64>(),
    ) {
        let reference = evaluate_hand(&hand);
        let mut shuffled = hand.clone();
        let mut rng = GameRng::new(seed);

        for _ in 0..8 {
            rng.shuffle(&mut shuffled);
            prop_assert_eq!(evaluate_hand(&shuffled), reference);
        }
    }

    #[test]
    fn evaluate_hand_returns_true_best_suit_sum(
        hand in proptest::sample::subsequence(all_cards(), 0..=4),
    ) {
        let mut best = 0u32;
        for suit in Suit::ALL {
            let total: u32 = hand
                .iter()
                .filter(|c| c.suit == suit)
                .map(|c| c.value())
                .sum();
            best = best.max(total);
        }

        let result = evaluate_hand(&hand);
        prop_assert_eq!(result.score, best);
        if let Some(suit) = result.suit {
            let winning: u32 = hand
                .iter()
                .filter(|c| c.suit == suit)
                .map(|c| c.value())
                .sum();
            prop_assert_eq!(winning, best);
        } else {
            prop_assert_eq!(best, 0);
        }
    }

    #[test]
    fn hard_discard_is_never_dominated(
        hand in proptest::sample::subsequence(all_cards(), 4),
        seed in any::<u64>(),
    ) {
        let mut rng = GameRng::new(seed);
        let index = choose_discard(&hand, Difficulty::Hard, &mut rng);

        let chosen = kept_score(&hand, index);
        for other in 0..hand.len() {
            prop_assert!(
                chosen >= kept_score(&hand, other),
                "discarding {} ({} pts kept) is dominated by discarding {} ({} pts kept)",
                index,
                chosen,
                other,
                kept_score(&hand, other),
            );
        }
    }

    #[test]
    fn choose_discard_index_is_always_valid(
        hand in proptest::sample::subsequence(all_cards(), 4),
        seed in any::<u64>(),
        difficulty in difficulty_strategy(),
    ) {
        let mut rng = GameRng::new(seed);
        let index = choose_discard(&hand, difficulty, &mut rng);
        prop_assert!(index < hand.len());
    }
}

fn total_cards(engine: &GameEngine) -> usize {
    engine.stock_size()
        + engine.discard_size()
        + engine.players().iter().map(|p| p.hand().len()).sum::<usize>()
}

fn check_hand_size_invariant(engine: &GameEngine) {
    match engine.phase() {
        Phase::PlayerTurn => {
            // Everyone is back to 3 cards between actions.
            for player in engine.players() {
                let expected = if player.is_eliminated() { 0 } else { 3 };
                assert_eq!(player.hand().len(), expected);
            }
        }
        Phase::Discarding => {
            // Exactly one 4-card hand, and it belongs to the drawer.
            let four_handed: Vec<_> = engine
                .players()
                .iter()
                .enumerate()
                .filter(|(_, p)| p.hand().len() == 4)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(four_handed, vec![engine.current_player_id().index()]);
        }
        _ => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn cards_are_conserved_across_whole_games(
        seed in any::<u64>(),
        opponents in 1usize..=3,
        difficulty in difficulty_strategy(),
    ) {
        let mut engine = GameBuilder::new()
            .opponents(opponents)
            .difficulty(difficulty)
            .build(seed);
        engine.start();

        for _ in 0..1_500 {
            prop_assert_eq!(total_cards(&engine), 52);
            check_hand_size_invariant(&engine);

            match engine.phase() {
                Phase::GameOver | Phase::Setup => break,
                Phase::RoundEnd => engine.proceed_after_round(),
                Phase::PlayerTurn | Phase::Discarding => {
                    if engine.current_player().is_human() && !engine.is_busy() {
                        match engine.phase() {
                            Phase::PlayerTurn => {
                                if engine.turns_played() < 2 || engine.knock().is_err() {
                                    let _ = engine.draw_from_stock();
                                }
                            }
                            Phase::Discarding => {
                                let _ = engine.discard(0);
                            }
                            _ => {}
                        }
                    } else if !engine.step() {
                        break;
                    }
                }
            }
        }

        prop_assert_eq!(total_cards(&engine), 52);
    }
}
