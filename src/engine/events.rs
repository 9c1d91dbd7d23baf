//! The engine's outward-facing callback surface.
//!
//! Two capability traits connect the engine to a renderer:
//!
//! - [`GameObserver`] receives state-change and narration notifications,
//!   always *after* the mutation they describe.
//! - [`CardAnimator`] lets a renderer animate AI draws and discards. An
//!   implementation may return [`AnimationStatus::Deferred`] to pause the
//!   AI sequence and resume it later through
//!   [`GameEngine::animation_complete`](super::GameEngine::animation_complete).
//!
//! Both traits default every method to a no-op, so a headless engine
//! (tests, simulations) proceeds synchronously with no renderer attached.

use crate::ai::DrawSource;
use crate::cards::Card;
use crate::core::{Player, PlayerId};
use crate::scoring::HandScore;

/// Advisory message category, for styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Knock,
}

/// One active player's hand and score at round end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerResult {
    pub player: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    pub score: HandScore,
}

/// Outcome of a normally-completed round.
///
/// Every player tied at the minimum score loses one life.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub results: Vec<PlayerResult>,
    pub losers: Vec<PlayerId>,
    pub lowest_score: u32,
}

/// Outcome of a round ended by an instant win.
///
/// No score comparison happens: everyone but the winner loses a life.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstantWinSummary {
    pub winner: PlayerId,
    pub results: Vec<PlayerResult>,
}

/// Renderer-facing notifications. All methods default to no-ops.
pub trait GameObserver {
    /// Fired after every mutation a renderer must reflect.
    fn on_state_change(&mut self) {}

    /// Fired when a new round begins (clear transient per-round UI).
    fn on_round_start(&mut self, round_number: u32) {
        let _ = round_number;
    }

    /// Advisory text for display.
    fn on_message(&mut self, text: &str, kind: MessageKind) {
        let _ = (text, kind);
    }

    /// Per-turn narration for one player. `knock_persistent` marks the
    /// line as a knock banner that should outlive the turn.
    fn on_player_action(&mut self, name: &str, text: &str, knock_persistent: bool) {
        let _ = (name, text, knock_persistent);
    }

    /// A round completed by scoring.
    fn on_round_end(&mut self, summary: &RoundSummary) {
        let _ = summary;
    }

    /// A round ended by the A+10+face trio.
    fn on_instant_win(&mut self, summary: &InstantWinSummary) {
        let _ = summary;
    }

    /// The game is over; `None` means nobody survived.
    fn on_game_over(&mut self, winner: Option<&Player>) {
        let _ = winner;
    }
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// Whether an animation finished inside the hook or will finish later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationStatus {
    /// The hook completed (or nothing animates); the engine proceeds.
    Complete,
    /// The renderer will call
    /// [`GameEngine::animation_complete`](super::GameEngine::animation_complete)
    /// exactly once when the visual transition ends.
    Deferred,
}

/// Visual-transition hooks for AI card movement.
///
/// The default implementations report [`AnimationStatus::Complete`], so an
/// absent renderer never stalls the engine.
pub trait CardAnimator {
    /// An AI player drew `card` from `source`.
    fn animate_draw(&mut self, player: PlayerId, card: Card, source: DrawSource) -> AnimationStatus {
        let _ = (player, card, source);
        AnimationStatus::Complete
    }

    /// An AI player discarded `card`.
    fn animate_discard(&mut self, player: PlayerId, card: Card) -> AnimationStatus {
        let _ = (player, card);
        AnimationStatus::Complete
    }
}

/// Animator that never animates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAnimator;

impl CardAnimator for NullAnimator {}
