//! Core engine types: players, RNG, configuration.
//!
//! The fundamental building blocks shared by the scoring, AI, and engine
//! modules.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{Difficulty, GameConfig, AI_NAMES, STARTING_LIVES};
pub use player::{Player, PlayerId};
pub use rng::GameRng;
