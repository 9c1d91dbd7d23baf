//! Player identity and per-participant state.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier, 0-based around the table (seat 0 is the
//! human).
//!
//! ## Player
//!
//! Hand, life count, and knock flag for one participant. Players are
//! created once per game and never removed; elimination derives from the
//! life count reaching zero.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Card;
use crate::scoring::{self, HandScore};

/// Seat identifier around the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One participant: hand, lives, and knock state.
///
/// The hand holds at most 4 cards (3 between turns, 4 while the player is
/// choosing a discard), so it lives in a `SmallVec` and never touches the
/// heap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    name: String,
    is_human: bool,
    hand: SmallVec<[Card; 4]>,
    lives: u8,
    knocked: bool,
}

impl Player {
    /// Create the human player.
    #[must_use]
    pub fn human(name: impl Into<String>, lives: u8) -> Self {
        Self::new(name, true, lives)
    }

    /// Create an AI player.
    #[must_use]
    pub fn ai(name: impl Into<String>, lives: u8) -> Self {
        Self::new(name, false, lives)
    }

    fn new(name: impl Into<String>, is_human: bool, lives: u8) -> Self {
        Self {
            name: name.into(),
            is_human,
            hand: SmallVec::new(),
            lives,
            knocked: false,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this seat is controlled by the human.
    #[must_use]
    pub fn is_human(&self) -> bool {
        self.is_human
    }

    /// Current hand (3 cards between turns, 4 while discarding).
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Whether this player has knocked this round.
    #[must_use]
    pub fn has_knocked(&self) -> bool {
        self.knocked
    }

    /// Whether this player is out of the game.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.lives == 0
    }

    /// Append a card to the hand.
    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Remove and return the card at `index`.
    ///
    /// Callers must pass an in-range index; the engine validates indices
    /// at its API boundary before calling through.
    pub fn remove_card(&mut self, index: usize) -> Card {
        assert!(index < self.hand.len(), "discard index {index} out of range");
        self.hand.remove(index)
    }

    /// Best same-suit total of the current hand.
    #[must_use]
    pub fn hand_score(&self) -> HandScore {
        scoring::evaluate_hand(&self.hand)
    }

    /// Whether the current hand contains the winning A+10+face trio.
    #[must_use]
    pub fn has_instant_win(&self) -> bool {
        scoring::is_instant_win(&self.hand)
    }

    /// Lose one life, floored at zero.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Clear hand and knock flag at the start of a round.
    pub fn reset_for_round(&mut self) {
        self.hand.clear();
        self.knocked = false;
    }

    pub(crate) fn set_knocked(&mut self) {
        self.knocked = true;
    }
}
