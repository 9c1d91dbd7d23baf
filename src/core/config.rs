//! Game configuration: difficulty presets and table constants.

use serde::{Deserialize, Serialize};

/// Lives each player starts the game with.
pub const STARTING_LIVES: u8 = 3;

/// Roster of AI opponent names, seated in order.
pub const AI_NAMES: [&str; 3] = ["Alice", "Bob", "Charlie"];

/// AI difficulty preset.
///
/// Difficulty shifts the AI's knock threshold, how much improvement it
/// demands before taking the visible discard, and how carefully it picks
/// its own discard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{name}")
    }
}

/// Immutable configuration of a running game.
///
/// Captured by [`GameBuilder::build`](crate::engine::GameBuilder::build)
/// and retrievable from the engine for display or replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of AI opponents (1-3).
    pub opponents: usize,
    /// AI difficulty preset.
    pub difficulty: Difficulty,
    /// Lives each player starts with.
    pub starting_lives: u8,
    /// Seed for the shuffle and AI randomness streams.
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_display() {
        assert_eq!(format!("{}", Difficulty::Easy), "easy");
        assert_eq!(format!("{}", Difficulty::Medium), "medium");
        assert_eq!(format!("{}", Difficulty::Hard), "hard");
    }

    #[test]
    fn test_config_serialization() {
        let config = GameConfig {
            opponents: 3,
            difficulty: Difficulty::Medium,
            starting_lives: STARTING_LIVES,
            seed: 42,
        };

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
