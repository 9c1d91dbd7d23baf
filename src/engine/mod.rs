//! The round/turn engine: orchestration, events, and scheduling.
//!
//! ## Key Types
//!
//! - `GameBuilder` / `GameEngine`: construction and the action API
//! - `Phase` / `ActionError`: the state machine and its rejections
//! - `GameObserver` / `CardAnimator`: the renderer-facing callback seam
//! - `RoundSummary` / `InstantWinSummary`: terminal-round payloads

pub mod events;
pub mod game;

mod scheduler;

pub use events::{
    AnimationStatus, CardAnimator, GameObserver, InstantWinSummary, MessageKind, NullAnimator,
    NullObserver, PlayerResult, RoundSummary,
};
pub use game::{ActionError, GameBuilder, GameEngine, Phase};
