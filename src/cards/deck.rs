//! The face-down stock: an ordered pile of the 52 cards.
//!
//! The deck is owned by the round engine for the current round. The top of
//! the stock is the *end* of the vec, so `draw` is a pop. Shuffling takes
//! the engine's seeded [`GameRng`] so a configured game replays
//! identically.

use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;

use super::card::{Card, Rank, Suit};

/// An ordered draw pile (top = last element).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Create a full, ordered 52-card deck.
    #[must_use]
    pub fn new() -> Self {
        let mut deck = Self { cards: Vec::with_capacity(52) };
        deck.reset();
        deck
    }

    /// Rebuild the full ordered 52-card sequence.
    pub fn reset(&mut self) {
        self.cards.clear();
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                self.cards.push(Card::new(suit, rank));
            }
        }
    }

    /// Uniform in-place shuffle.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Remove and return the top card, or `None` if the stock is empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Append cards to the stock (discard-pile recycling).
    pub fn add_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    /// Number of cards left in the stock.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Whether the stock is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_deck_has_52_distinct_cards() {
        let mut deck = Deck::new();
        let mut seen = HashSet::new();

        while let Some(card) = deck.draw() {
            assert!(seen.insert(card), "duplicate card {card}");
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn test_draw_removes_from_top() {
        let mut deck = Deck::new();
        // The ordered deck ends with the king of spades.
        assert_eq!(deck.draw(), Some(Card::new(Suit::Spades, Rank::King)));
        assert_eq!(deck.remaining(), 51);
    }

    #[test]
    fn test_draw_from_empty_is_none() {
        let mut deck = Deck::new();
        for _ in 0..52 {
            assert!(deck.draw().is_some());
        }
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), None);
    }

    #[test]
    fn test_shuffle_preserves_card_set() {
        let mut rng = GameRng::new(42);
        let mut deck = Deck::new();
        deck.shuffle(&mut rng);

        let mut cards: Vec<Card> = Vec::new();
        while let Some(card) = deck.draw() {
            cards.push(card);
        }
        let unique: HashSet<Card> = cards.iter().copied().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn test_shuffle_is_deterministic() {
        let order = |seed: u64| {
            let mut rng = GameRng::new(seed);
            let mut deck = Deck::new();
            deck.shuffle(&mut rng);
            let mut cards = Vec::new();
            while let Some(card) = deck.draw() {
                cards.push(card);
            }
            cards
        };

        assert_eq!(order(7), order(7));
        assert_ne!(order(7), order(8));
    }

    #[test]
    fn test_add_cards_appends_to_top() {
        let mut deck = Deck::new();
        for _ in 0..52 {
            deck.draw();
        }

        let recycled = [
            Card::new(Suit::Hearts, Rank::Two),
            Card::new(Suit::Clubs, Rank::Nine),
        ];
        deck.add_cards(recycled);

        assert_eq!(deck.remaining(), 2);
        assert_eq!(deck.draw(), Some(Card::new(Suit::Clubs, Rank::Nine)));
        assert_eq!(deck.draw(), Some(Card::new(Suit::Hearts, Rank::Two)));
    }

    #[test]
    fn test_reset_restores_full_deck() {
        let mut rng = GameRng::new(1);
        let mut deck = Deck::new();
        deck.shuffle(&mut rng);
        for _ in 0..30 {
            deck.draw();
        }

        deck.reset();
        assert_eq!(deck.remaining(), 52);
    }
}
