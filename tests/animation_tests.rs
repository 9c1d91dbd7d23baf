//! The animation seam: deferred completion, busy gating, resumption.
//!
//! A renderer that animates returns `Deferred` from the animator hooks and
//! calls `animation_complete` when the visual transition ends. While the
//! sequence is parked, no human action may slip in.

use std::cell::RefCell;
use std::rc::Rc;

use thirty_one::{
    ActionError, AnimationStatus, Card, CardAnimator, DrawSource, GameBuilder, GameEngine,
    Phase, PlayerId,
};

/// Records hook calls and defers every animation.
#[derive(Clone, Default)]
struct DeferringAnimator {
    calls: Rc<RefCell<Vec<String>>>,
}

impl DeferringAnimator {
    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CardAnimator for DeferringAnimator {
    fn animate_draw(&mut self, player: PlayerId, _card: Card, source: DrawSource) -> AnimationStatus {
        self.calls.borrow_mut().push(format!("draw:{player}:{source:?}"));
        AnimationStatus::Deferred
    }

    fn animate_discard(&mut self, player: PlayerId, _card: Card) -> AnimationStatus {
        self.calls.borrow_mut().push(format!("discard:{player}"));
        AnimationStatus::Deferred
    }
}

/// Run the human's first turn and step into the first AI draw, which the
/// deferring animator parks. Returns `None` for seeds where an instant
/// win or AI knock cuts the sequence short.
fn park_on_ai_draw(seed: u64) -> Option<(GameEngine, DeferringAnimator)> {
    let animator = DeferringAnimator::default();
    let mut engine = GameBuilder::new()
        .opponents(2)
        .animator(Box::new(animator.clone()))
        .build(seed);
    engine.start();

    if engine.phase() != Phase::PlayerTurn || !engine.current_player().is_human() {
        return None;
    }
    engine.draw_from_stock().ok()?;
    if engine.phase() != Phase::Discarding {
        return None;
    }
    engine.discard(0).ok()?;

    // The first AI turn never knocks (fewer than 2 turns played), so
    // stepping runs its draw, which the animator defers.
    while engine.step() {}

    if engine.phase() == Phase::Discarding && engine.is_busy() && !animator.calls().is_empty() {
        Some((engine, animator))
    } else {
        None
    }
}

fn find_parked_game() -> (GameEngine, DeferringAnimator) {
    for seed in 0..100u64 {
        if let Some(found) = park_on_ai_draw(seed) {
            return found;
        }
    }
    panic!("no seed reached a deferred AI draw animation");
}

#[test]
fn test_deferred_draw_blocks_actions() {
    let (mut engine, animator) = find_parked_game();

    assert_eq!(animator.calls().len(), 1);
    assert!(animator.calls()[0].starts_with("draw:"));

    // Phase guards fire for the turn actions, the busy gate for discard.
    assert_eq!(engine.draw_from_stock(), Err(ActionError::WrongPhase));
    assert_eq!(engine.draw_from_discard(), Err(ActionError::WrongPhase));
    assert_eq!(engine.knock(), Err(ActionError::WrongPhase));
    assert_eq!(engine.discard(0), Err(ActionError::Busy));
}

#[test]
fn test_completion_resumes_the_sequence() {
    let (mut engine, animator) = find_parked_game();
    let turns_before = engine.turns_played();

    // Finish the draw animation: the engine picks the AI discard and
    // pauses on the 4-card reveal.
    engine.animation_complete();
    assert!(engine.is_busy());
    assert!(engine.next_delay().is_some());

    // The reveal pause elapses; the discard animation parks the sequence
    // again.
    assert!(engine.step());
    assert_eq!(animator.calls().len(), 2);
    assert!(animator.calls()[1].starts_with("discard:"));
    assert!(engine.is_busy());

    // Finish the discard animation: the turn completes and play moves on.
    engine.animation_complete();
    assert_eq!(engine.turns_played(), turns_before + 1);
    assert!(!engine.is_busy() || engine.phase() != Phase::Discarding);
}

#[test]
fn test_extra_completion_calls_are_noops() {
    let (mut engine, _animator) = find_parked_game();

    engine.animation_complete();
    let turns = engine.turns_played();
    let phase = engine.phase();

    // Nothing is parked now; extra calls must not re-run the resume task.
    engine.animation_complete();
    engine.animation_complete();

    assert_eq!(engine.turns_played(), turns);
    assert_eq!(engine.phase(), phase);
}

#[test]
fn test_default_animator_never_parks() {
    for seed in 0..5u64 {
        let mut engine = GameBuilder::new().opponents(2).build(seed);
        engine.start();

        if engine.phase() != Phase::PlayerTurn || !engine.current_player().is_human() {
            continue;
        }
        if engine.draw_from_stock().is_err() || engine.phase() != Phase::Discarding {
            continue;
        }
        let _ = engine.discard(0);

        // With the no-op animator the queue drains to the next human
        // turn or a round boundary; the engine is never left parked.
        engine.run_until_idle();
        assert!(
            !engine.is_busy(),
            "seed {seed}: engine parked without a deferring animator"
        );
        return;
    }
}
