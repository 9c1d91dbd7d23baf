//! Turn decisions for AI opponents.
//!
//! The policy is stateless: every decision is a pure function of the
//! player's hand, the visible discard top, and the round context, with the
//! difficulty preset selecting thresholds. The only randomness is the easy
//! preset's occasional sloppy discard, fed by the engine's dedicated AI
//! RNG stream.
//!
//! ## Decision order
//!
//! 1. Knock, if nobody has knocked, at least 2 turns have been played,
//!    and the hand score meets the difficulty's knock threshold.
//! 2. Take the visible discard when the best single-card swap improves
//!    the score by at least the difficulty's take threshold - or, at any
//!    improvement, when the swap completes an instant win.
//! 3. Otherwise draw blind from the stock.

use crate::cards::{Card, Suit};
use crate::core::{Difficulty, GameRng, Player};
use crate::scoring;

/// Where a draw takes its card from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawSource {
    /// The face-down stock.
    Stock,
    /// The face-up discard pile.
    DiscardPile,
}

/// What the AI wants to do with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDecision {
    /// Declare a knock (only produced for suit-uniform hands; see below).
    Knock,
    /// Draw a card, optionally with the hand position the draw is meant
    /// to replace (set when taking the discard for a planned swap).
    Draw {
        source: DrawSource,
        planned_discard: Option<usize>,
    },
}

/// Knock and round context visible to the policy.
#[derive(Clone, Copy, Debug)]
pub struct TurnContext {
    pub difficulty: Difficulty,
    /// Whether any player has already knocked this round.
    pub someone_knocked: bool,
    /// Completed turns (discards and knocks) so far this round.
    pub turns_played: u32,
}

/// Minimum hand score before the AI will knock.
const fn knock_threshold(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 29,
        Difficulty::Medium => 27,
        Difficulty::Hard => 25,
    }
}

/// Minimum score improvement before the AI takes the visible discard.
const fn take_threshold(difficulty: Difficulty) -> i32 {
    match difficulty {
        Difficulty::Easy => 5,
        Difficulty::Medium => 3,
        Difficulty::Hard => 1,
    }
}

/// Knock thresholds never drop below 22. A two-suit 3-card hand caps at
/// A+10 = 21, so any score meeting the threshold is a suit-uniform hand
/// and the knock is always legal.
const DESPERATE_FLOOR: u32 = 22;

/// Decide the AI's turn: knock, take the discard, or draw from stock.
#[must_use]
pub fn decide_action(player: &Player, discard_top: Option<Card>, ctx: &TurnContext) -> TurnDecision {
    let current_score = player.hand_score().score;

    // Desperate play: lower the knock bar on the last life.
    let threshold = knock_threshold(ctx.difficulty);
    let effective_threshold = if player.lives() == 1 {
        threshold.saturating_sub(3).max(DESPERATE_FLOOR)
    } else {
        threshold
    };

    if !ctx.someone_knocked && ctx.turns_played >= 2 && current_score >= effective_threshold {
        return TurnDecision::Knock;
    }

    if let Some(candidate) = discard_top {
        let best = best_swap(player.hand(), candidate);
        if best.improvement >= take_threshold(ctx.difficulty) {
            return TurnDecision::Draw {
                source: DrawSource::DiscardPile,
                planned_discard: Some(best.discard_index),
            };
        }

        // Take the discard regardless of improvement if a swap wins.
        for index in 0..player.hand().len() {
            let mut test: Vec<Card> = player.hand().to_vec();
            test[index] = candidate;
            if scoring::is_instant_win(&test) {
                return TurnDecision::Draw {
                    source: DrawSource::DiscardPile,
                    planned_discard: Some(index),
                };
            }
        }
    }

    TurnDecision::Draw { source: DrawSource::Stock, planned_discard: None }
}

/// Pick which of the 4 cards to discard after a draw.
pub fn choose_discard(hand: &[Card], difficulty: Difficulty, rng: &mut GameRng) -> usize {
    // Easy AI sometimes makes suboptimal discards.
    if difficulty == Difficulty::Easy && rng.gen_bool(0.2) {
        return rng.gen_range_usize(0..hand.len());
    }

    // Hard AI rescores every removal and keeps the first-found best.
    if difficulty == Difficulty::Hard {
        let mut best_index = 0;
        let mut best_score = 0;
        for index in 0..hand.len() {
            let remaining: Vec<Card> = without_index(hand, index);
            let score = scoring::evaluate_hand(&remaining).score;
            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }
        return best_index;
    }

    // Medium/easy: shed the lowest card outside the target suit.
    let target = target_suit(hand);
    let mut worst: Option<(usize, u32)> = None;
    for (index, card) in hand.iter().enumerate() {
        if Some(card.suit) == target {
            continue;
        }
        if worst.is_none_or(|(_, value)| card.value() < value) {
            worst = Some((index, card.value()));
        }
    }

    // Every card is target suit: shed the lowest overall.
    let fallback = || {
        hand.iter()
            .enumerate()
            .min_by_key(|(_, card)| card.value())
            .map(|(index, _)| index)
            .unwrap_or(0)
    };

    worst.map_or_else(fallback, |(index, _)| index)
}

struct Swap {
    improvement: i32,
    discard_index: usize,
}

/// Best score improvement from swapping `candidate` into each position.
fn best_swap(hand: &[Card], candidate: Card) -> Swap {
    let current = scoring::evaluate_hand(hand).score as i32;

    let mut best = Swap { improvement: i32::MIN, discard_index: 0 };
    for index in 0..hand.len() {
        let mut test: Vec<Card> = hand.to_vec();
        test[index] = candidate;
        let improvement = scoring::evaluate_hand(&test).score as i32 - current;
        if improvement > best.improvement {
            best = Swap { improvement, discard_index: index };
        }
    }
    best
}

/// Suit carrying the highest total value in the hand.
fn target_suit(hand: &[Card]) -> Option<Suit> {
    scoring::evaluate_hand(hand).suit
}

fn without_index(hand: &[Card], index: usize) -> Vec<Card> {
    hand.iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, card)| *card)
        .collect()
}
