//! # thirty-one
//!
//! Engine for the card game Thirty-One ("Scat"): players hold 3-card
//! hands, draw and discard to chase a single-suit point total, may knock
//! to force a final round, and lose a life when they hold the lowest
//! score. One human and up to three AI opponents play until one player
//! remains.
//!
//! ## Design Principles
//!
//! 1. **Headless core**: Rendering, input wiring, and animation timing
//!    live behind the [`GameObserver`] / [`CardAnimator`] capability
//!    traits. With no renderer attached the engine runs synchronously.
//!
//! 2. **Deterministic replay**: All randomness (shuffles, AI jitter,
//!    easy-AI sloppiness) flows from one configured seed through named
//!    [`GameRng`] context streams.
//!
//! 3. **Explicit scheduling**: Every pause is a queued `{delay, task}`
//!    pair. Hosts map delays to real timers; tests drain the queue with
//!    zero delay.
//!
//! ## Modules
//!
//! - `cards`: Suits, ranks, cards, and the draw pile
//! - `scoring`: Pure hand evaluation and the instant-win predicate
//! - `core`: Players, RNG, configuration
//! - `ai`: Difficulty-parameterized turn decisions
//! - `engine`: The round/turn state machine and its callback surface
//!
//! ## Example
//!
//! ```
//! use thirty_one::{Difficulty, GameBuilder, Phase};
//!
//! let mut game = GameBuilder::new()
//!     .opponents(2)
//!     .difficulty(Difficulty::Hard)
//!     .build(42);
//!
//! game.start();
//! assert!(matches!(game.phase(), Phase::PlayerTurn | Phase::RoundEnd));
//! ```

pub mod ai;
pub mod cards;
pub mod core;
pub mod engine;
pub mod scoring;

// Re-export commonly used types
pub use crate::cards::{Card, Deck, Rank, Suit, SuitColor};

pub use crate::core::{Difficulty, GameConfig, GameRng, Player, PlayerId, AI_NAMES, STARTING_LIVES};

pub use crate::scoring::{evaluate_hand, is_all_same_suit, is_instant_win, HandScore};

pub use crate::ai::{choose_discard, decide_action, DrawSource, TurnContext, TurnDecision};

pub use crate::engine::{
    ActionError, AnimationStatus, CardAnimator, GameBuilder, GameEngine, GameObserver,
    InstantWinSummary, MessageKind, NullAnimator, NullObserver, Phase, PlayerResult, RoundSummary,
};
