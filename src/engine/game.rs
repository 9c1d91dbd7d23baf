//! The round/turn orchestrator.
//!
//! `GameEngine` owns the deck, the discard pile, the players, and the
//! phase state machine; it drives the AI policy and surfaces everything a
//! renderer needs through [`GameObserver`] / [`CardAnimator`].
//!
//! ## Phases
//!
//! ```text
//! Setup -> PlayerTurn <-> Discarding -> PlayerTurn ... -> RoundEnd
//!                                                          |  ^
//!                                  (next round via proceed) |  | (instant win short-circuits
//!                                                           v  |  from either turn phase)
//!                                                       GameOver
//! ```
//!
//! ## Driving the engine
//!
//! Pauses (knock display, inter-player delay, AI think time) are queued
//! tasks, not timers. Hosts arm a timer for [`GameEngine::next_delay`] and
//! then call [`GameEngine::step`]; tests call
//! [`GameEngine::run_until_idle`] for zero-delay execution. The `busy`
//! flag is the sole mutual exclusion: it rejects human actions while an AI
//! turn (or the knock pause) is in flight.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::{self, DrawSource, TurnContext, TurnDecision};
use crate::cards::{Card, Deck};
use crate::core::{Difficulty, GameConfig, GameRng, Player, PlayerId, AI_NAMES, STARTING_LIVES};
use crate::scoring;

use super::events::{
    AnimationStatus, CardAnimator, GameObserver, InstantWinSummary, MessageKind, NullAnimator,
    NullObserver, PlayerResult, RoundSummary,
};
use super::scheduler::{EngineTask, TaskQueue};

/// Display pause after a knock before the turn advances.
const KNOCK_PAUSE: Duration = Duration::from_millis(1500);
/// Pause between players so actions linger on screen.
const TURN_PAUSE: Duration = Duration::from_millis(1000);
/// Pause showing an AI's 4-card hand before it discards.
const REVEAL_PAUSE: Duration = Duration::from_millis(400);
/// AI think delay: base plus up to `AI_THINK_JITTER_MS` of jitter.
const AI_THINK_BASE_MS: u64 = 400;
const AI_THINK_JITTER_MS: u64 = 300;

/// Where the state machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Built but not started.
    Setup,
    /// The current player may draw or knock.
    PlayerTurn,
    /// The current player holds 4 cards and must discard one.
    Discarding,
    /// Scores are settled; waiting on `proceed_after_round`.
    RoundEnd,
    /// One player (or nobody) is left.
    GameOver,
}

/// Why an action was rejected. State is never mutated on rejection.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not legal in the current phase")]
    WrongPhase,
    #[error("another player's turn is still resolving")]
    Busy,
    #[error("someone has already knocked this round")]
    AlreadyKnocked,
    #[error("all 3 cards must share a suit to knock")]
    MixedSuitHand,
    #[error("no card is available to draw")]
    NoCardAvailable,
    #[error("discard index {0} is out of range")]
    IndexOutOfRange(usize),
}

/// Builder for a [`GameEngine`].
pub struct GameBuilder {
    opponents: usize,
    difficulty: Difficulty,
    starting_lives: u8,
    human_name: String,
    observer: Box<dyn GameObserver>,
    animator: Box<dyn CardAnimator>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            opponents: 3,
            difficulty: Difficulty::Medium,
            starting_lives: STARTING_LIVES,
            human_name: "You".to_string(),
            observer: Box::new(NullObserver),
            animator: Box::new(NullAnimator),
        }
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of AI opponents (1-3).
    pub fn opponents(mut self, count: usize) -> Self {
        assert!((1..=AI_NAMES.len()).contains(&count), "Opponent count must be 1-3");
        self.opponents = count;
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn starting_lives(mut self, lives: u8) -> Self {
        assert!(lives > 0, "Players need at least 1 life");
        self.starting_lives = lives;
        self
    }

    pub fn human_name(mut self, name: impl Into<String>) -> Self {
        self.human_name = name.into();
        self
    }

    /// Attach a renderer-facing observer (defaults to a no-op).
    pub fn observer(mut self, observer: Box<dyn GameObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Attach a card animator (defaults to a no-op).
    pub fn animator(mut self, animator: Box<dyn CardAnimator>) -> Self {
        self.animator = animator;
        self
    }

    /// Build the engine. The seed feeds two independent streams, one for
    /// shuffles and one for AI randomness, so a seeded game replays
    /// identically.
    #[must_use]
    pub fn build(self, seed: u64) -> GameEngine {
        let mut players = Vec::with_capacity(self.opponents + 1);
        players.push(Player::human(self.human_name, self.starting_lives));
        for name in AI_NAMES.iter().take(self.opponents) {
            players.push(Player::ai(*name, self.starting_lives));
        }

        let root = GameRng::new(seed);

        GameEngine {
            config: GameConfig {
                opponents: self.opponents,
                difficulty: self.difficulty,
                starting_lives: self.starting_lives,
                seed,
            },
            players,
            deck: Deck::new(),
            discard_pile: Vec::new(),
            current: 0,
            knocker: None,
            turns_after_knock: 0,
            turns_played: 0,
            round_number: 0,
            phase: Phase::Setup,
            busy: false,
            shuffle_rng: root.for_context("shuffle"),
            ai_rng: root.for_context("ai"),
            queue: TaskQueue::new(),
            awaiting_animation: None,
            observer: self.observer,
            animator: self.animator,
        }
    }
}

/// The round/turn state machine and its owned table state.
pub struct GameEngine {
    config: GameConfig,
    players: Vec<Player>,
    deck: Deck,
    discard_pile: Vec<Card>,
    current: usize,
    knocker: Option<usize>,
    turns_after_knock: u32,
    turns_played: u32,
    round_number: u32,
    phase: Phase,
    busy: bool,
    shuffle_rng: GameRng,
    ai_rng: GameRng,
    queue: TaskQueue,
    awaiting_animation: Option<EngineTask>,
    observer: Box<dyn GameObserver>,
    animator: Box<dyn CardAnimator>,
}

impl GameEngine {
    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Round counter, 1-based once the game starts.
    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Completed turns (discards and knocks) this round.
    #[must_use]
    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    #[must_use]
    pub fn current_player_id(&self) -> PlayerId {
        PlayerId::new(self.current as u8)
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// Seats still in the game.
    #[must_use]
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_eliminated())
            .map(|(i, _)| PlayerId::new(i as u8))
            .collect()
    }

    /// Top of the discard pile.
    #[must_use]
    pub fn discard_top(&self) -> Option<Card> {
        self.discard_pile.last().copied()
    }

    #[must_use]
    pub fn stock_size(&self) -> usize {
        self.deck.remaining()
    }

    #[must_use]
    pub fn discard_size(&self) -> usize {
        self.discard_pile.len()
    }

    /// Who knocked this round, if anyone.
    #[must_use]
    pub fn knocker(&self) -> Option<PlayerId> {
        self.knocker.map(|i| PlayerId::new(i as u8))
    }

    /// Whether an AI sequence (or knock pause) is holding the table.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // === Scheduling ===

    /// Display pause before the next queued task, if any is pending.
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.queue.next_delay()
    }

    /// Execute the next queued task immediately. Returns whether one ran.
    pub fn step(&mut self) -> bool {
        match self.queue.pop() {
            Some(scheduled) => {
                self.run_task(scheduled.task);
                true
            }
            None => false,
        }
    }

    /// Zero-delay scheduler: drain the queue until nothing is pending.
    ///
    /// Stops while a deferred animation holds the sequence; resume with
    /// [`GameEngine::animation_complete`].
    pub fn run_until_idle(&mut self) {
        while self.step() {}
    }

    /// Resume the AI sequence parked behind a deferred animation.
    ///
    /// Must be called exactly once per deferred animation; extra calls
    /// are no-ops.
    pub fn animation_complete(&mut self) {
        if let Some(task) = self.awaiting_animation.take() {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: EngineTask) {
        match task {
            EngineTask::AdvanceTurn => self.advance_turn(),
            EngineTask::AiTurn => self.ai_turn(),
            EngineTask::AiDiscard { index, source } => self.ai_discard(index, source),
            EngineTask::AfterAiDraw { planned, source } => self.after_ai_draw(planned, source),
            EngineTask::FinishAiTurn { line } => self.finish_ai_turn(line),
        }
    }

    // === Game lifecycle ===

    /// Start the game: deal the first round. No-op unless in `Setup`.
    pub fn start(&mut self) {
        if self.phase != Phase::Setup {
            return;
        }
        self.start_round();
    }

    /// Settle a finished round: game over when at most one player
    /// remains, otherwise deal the next round. No-op outside `RoundEnd`.
    pub fn proceed_after_round(&mut self) {
        if self.phase != Phase::RoundEnd {
            return;
        }
        if self.active_count() <= 1 {
            self.finish_game();
            return;
        }
        self.start_round();
    }

    fn start_round(&mut self) {
        self.round_number += 1;
        self.knocker = None;
        self.turns_after_knock = 0;
        self.turns_played = 0;
        self.discard_pile.clear();

        for player in &mut self.players {
            player.reset_for_round();
        }

        self.deck.reset();
        self.deck.shuffle(&mut self.shuffle_rng);
        debug!(
            "round {} starts with {} active players",
            self.round_number,
            self.active_count()
        );

        // Deal 3 cards to each active player, a card at a time around the
        // table.
        for _ in 0..3 {
            for idx in 0..self.players.len() {
                if self.players[idx].is_eliminated() {
                    continue;
                }
                let card = self.deck.draw().expect("a fresh stock covers the deal");
                self.players[idx].add_card(card);
            }
        }

        // Flip one card to seed the discard pile.
        let flip = self.deck.draw().expect("a fresh stock covers the deal");
        self.discard_pile.push(flip);

        // A dealt 31 ends the round before anyone acts.
        for idx in 0..self.players.len() {
            if !self.players[idx].is_eliminated() && self.players[idx].has_instant_win() {
                self.handle_instant_win(idx);
                return;
            }
        }

        self.current = self.next_active_after(self.players.len() - 1);
        self.phase = Phase::PlayerTurn;
        self.observer.on_round_start(self.round_number);
        self.emit_state_change();
        let text = format!("Round {} begins!", self.round_number);
        self.emit_message(&text, MessageKind::Info);

        if !self.players[self.current].is_human() {
            self.schedule_ai_turn(Duration::ZERO);
        }
    }

    // === Player actions ===

    /// Draw the top card of the stock into the current player's hand.
    ///
    /// Recycles the discard pile into the stock first when the stock is
    /// empty; with at most one discard left there is nothing to draw.
    pub fn draw_from_stock(&mut self) -> Result<Card, ActionError> {
        self.check_can_act()?;
        self.ensure_stock();
        let card = self.deck.draw().ok_or(ActionError::NoCardAvailable)?;
        Ok(self.take_drawn_card(card))
    }

    /// Draw the visible top card of the discard pile.
    pub fn draw_from_discard(&mut self) -> Result<Card, ActionError> {
        self.check_can_act()?;
        let card = self.discard_pile.pop().ok_or(ActionError::NoCardAvailable)?;
        Ok(self.take_drawn_card(card))
    }

    /// Discard the card at `index` from the current 4-card hand and end
    /// the turn. Out-of-range indices are rejected, never clamped.
    pub fn discard(&mut self, index: usize) -> Result<Card, ActionError> {
        if self.phase != Phase::Discarding {
            return Err(ActionError::WrongPhase);
        }
        if self.busy {
            return Err(ActionError::Busy);
        }
        if index >= self.players[self.current].hand().len() {
            return Err(ActionError::IndexOutOfRange(index));
        }

        let card = self.players[self.current].remove_card(index);
        self.discard_pile.push(card);
        self.turns_played += 1;
        self.advance_turn();
        Ok(card)
    }

    /// Declare a knock: every other active player gets one final turn.
    ///
    /// Legal only with a suit-uniform hand and while nobody has knocked;
    /// a human's mixed-suit attempt also gets an advisory message.
    pub fn knock(&mut self) -> Result<(), ActionError> {
        if self.phase != Phase::PlayerTurn {
            return Err(ActionError::WrongPhase);
        }
        if self.busy {
            return Err(ActionError::Busy);
        }
        if self.knocker.is_some() {
            return Err(ActionError::AlreadyKnocked);
        }
        if !scoring::is_all_same_suit(self.players[self.current].hand()) {
            if self.players[self.current].is_human() {
                self.emit_message(
                    "You can only knock if all 3 cards are the same suit!",
                    MessageKind::Info,
                );
            }
            return Err(ActionError::MixedSuitHand);
        }

        self.do_knock();
        Ok(())
    }

    fn check_can_act(&self) -> Result<(), ActionError> {
        if self.phase != Phase::PlayerTurn {
            return Err(ActionError::WrongPhase);
        }
        if self.busy {
            return Err(ActionError::Busy);
        }
        Ok(())
    }

    fn take_drawn_card(&mut self, card: Card) -> Card {
        let idx = self.current;
        self.players[idx].add_card(card);

        if self.players[idx].has_instant_win() {
            self.auto_discard_for_instant_win(idx);
            self.handle_instant_win(idx);
            return card;
        }

        self.phase = Phase::Discarding;
        self.emit_state_change();
        card
    }

    fn do_knock(&mut self) {
        let idx = self.current;
        self.knocker = Some(idx);
        self.players[idx].set_knocked();
        self.turns_after_knock = 0;
        self.turns_played += 1;
        // Hold the table until the knock pause elapses.
        self.busy = true;

        let name = self.players[idx].name().to_owned();
        debug!("{name} knocks on turn {}", self.turns_played);
        let text = format!("{name} knocks!");
        self.emit_message(&text, MessageKind::Knock);
        if !self.players[idx].is_human() {
            self.observer.on_player_action(&name, "KNOCKS!", true);
        }
        self.emit_state_change();

        self.queue.push(EngineTask::AdvanceTurn, KNOCK_PAUSE);
    }

    // === AI turn sequence ===

    fn ai_turn(&mut self) {
        let idx = self.current;
        if self.players[idx].is_human() || self.players[idx].is_eliminated() {
            return;
        }

        let ctx = TurnContext {
            difficulty: self.config.difficulty,
            someone_knocked: self.knocker.is_some(),
            turns_played: self.turns_played,
        };
        let decision = ai::decide_action(&self.players[idx], self.discard_top(), &ctx);

        let (source, planned) = match decision {
            TurnDecision::Knock => {
                // The policy's 22-point knock floor is out of reach for a
                // mixed-suit hand, so this cannot be rejected.
                let _ = self.knock();
                return;
            }
            TurnDecision::Draw { source, planned_discard } => (source, planned_discard),
        };

        self.busy = true;

        let (card, actual_source) = match source {
            DrawSource::DiscardPile if !self.discard_pile.is_empty() => {
                (self.discard_pile.pop(), DrawSource::DiscardPile)
            }
            _ => {
                self.ensure_stock();
                (self.deck.draw(), DrawSource::Stock)
            }
        };
        let Some(card) = card else {
            self.busy = false;
            return;
        };
        self.players[idx].add_card(card);

        if self.players[idx].has_instant_win() {
            self.busy = false;
            self.auto_discard_for_instant_win(idx);
            self.handle_instant_win(idx);
            return;
        }

        self.phase = Phase::Discarding;

        match self.animator.animate_draw(PlayerId::new(idx as u8), card, actual_source) {
            AnimationStatus::Complete => self.after_ai_draw(planned, actual_source),
            AnimationStatus::Deferred => {
                self.awaiting_animation =
                    Some(EngineTask::AfterAiDraw { planned, source: actual_source });
            }
        }
    }

    /// The drawn card is in the hand and on screen; pick the discard and
    /// pause briefly so the 4-card hand is visible.
    fn after_ai_draw(&mut self, planned: Option<usize>, source: DrawSource) {
        self.emit_state_change();

        let idx = self.current;
        let chosen = match planned {
            Some(index) => index,
            None => ai::choose_discard(
                self.players[idx].hand(),
                self.config.difficulty,
                &mut self.ai_rng,
            ),
        };
        // The planned index targeted the pre-draw hand; clamp to the
        // 4-card hand.
        let index = chosen.min(self.players[idx].hand().len() - 1);

        self.queue.push(EngineTask::AiDiscard { index, source }, REVEAL_PAUSE);
    }

    fn ai_discard(&mut self, index: usize, source: DrawSource) {
        let idx = self.current;
        let card = self.players[idx].remove_card(index);
        self.discard_pile.push(card);
        self.turns_played += 1;

        let drew = match source {
            DrawSource::Stock => "Drew from stock",
            DrawSource::DiscardPile => "Drew from discard",
        };
        let line = format!("{drew} \u{b7} Discarded {card}");

        match self.animator.animate_discard(PlayerId::new(idx as u8), card) {
            AnimationStatus::Complete => self.finish_ai_turn(line),
            AnimationStatus::Deferred => {
                self.awaiting_animation = Some(EngineTask::FinishAiTurn { line });
            }
        }
    }

    fn finish_ai_turn(&mut self, line: String) {
        self.busy = false;
        let name = self.players[self.current].name().to_owned();
        self.observer.on_player_action(&name, &line, false);
        self.emit_state_change();
        self.advance_turn();
    }

    fn schedule_ai_turn(&mut self, lead_in: Duration) {
        let jitter = self.ai_rng.gen_range_usize(0..AI_THINK_JITTER_MS as usize) as u64;
        let think = Duration::from_millis(AI_THINK_BASE_MS + jitter);
        self.queue.push(EngineTask::AiTurn, lead_in + think);
    }

    // === Turn and round resolution ===

    fn advance_turn(&mut self) {
        self.busy = false;
        self.current = self.next_active_after(self.current);
        // The knocker sits out the final go-around.
        if self.knocker == Some(self.current) {
            self.current = self.next_active_after(self.current);
        }

        if self.knocker.is_some() {
            self.turns_after_knock += 1;
            let others = self.active_count().saturating_sub(1) as u32;
            if self.turns_after_knock > others {
                self.end_round();
                return;
            }
        }

        self.phase = Phase::PlayerTurn;
        self.emit_state_change();

        if !self.players[self.current].is_human() {
            self.schedule_ai_turn(TURN_PAUSE);
        }
    }

    fn end_round(&mut self) {
        self.phase = Phase::RoundEnd;

        let results = self.collect_results();
        let lowest = results.iter().map(|r| r.score.score).min().unwrap_or(0);
        let losers: Vec<PlayerId> = results
            .iter()
            .filter(|r| r.score.score == lowest)
            .map(|r| r.player)
            .collect();

        for loser in &losers {
            self.players[loser.index()].lose_life();
        }

        debug!("round {} ends; lowest score {lowest}", self.round_number);
        self.emit_state_change();

        let summary = RoundSummary { results, losers, lowest_score: lowest };
        self.observer.on_round_end(&summary);
    }

    fn handle_instant_win(&mut self, winner: usize) {
        self.phase = Phase::RoundEnd;
        let results = self.collect_results();

        for (idx, player) in self.players.iter_mut().enumerate() {
            if idx != winner && !player.is_eliminated() {
                player.lose_life();
            }
        }

        debug!(
            "{} hits 31; round {} ends instantly",
            self.players[winner].name(),
            self.round_number
        );
        self.emit_state_change();

        let summary = InstantWinSummary { winner: PlayerId::new(winner as u8), results };
        self.observer.on_instant_win(&summary);
    }

    /// Drop the one card of the 4 that is not part of the winning trio.
    fn auto_discard_for_instant_win(&mut self, idx: usize) {
        if self.players[idx].hand().len() <= 3 {
            return;
        }
        for index in 0..self.players[idx].hand().len() {
            let remaining: Vec<Card> = self.players[idx]
                .hand()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, c)| *c)
                .collect();
            if scoring::is_instant_win(&remaining) {
                let card = self.players[idx].remove_card(index);
                self.discard_pile.push(card);
                return;
            }
        }
    }

    fn finish_game(&mut self) {
        self.phase = Phase::GameOver;
        match self.players.iter().position(|p| !p.is_eliminated()) {
            Some(idx) => {
                debug!("game over; {} wins", self.players[idx].name());
                self.observer.on_game_over(Some(&self.players[idx]));
            }
            None => {
                debug!("game over with no survivor");
                self.observer.on_game_over(None);
            }
        }
    }

    // === Helpers ===

    fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_eliminated()).count()
    }

    /// Next non-eliminated seat after `from`, cyclically.
    fn next_active_after(&self, from: usize) -> usize {
        let len = self.players.len();
        let mut idx = from;
        for _ in 0..len {
            idx = (idx + 1) % len;
            if !self.players[idx].is_eliminated() {
                return idx;
            }
        }
        from
    }

    /// When the stock runs dry, recycle all but the top discard into a
    /// freshly shuffled stock. With one or zero discards the stock stays
    /// empty.
    fn ensure_stock(&mut self) {
        if !self.deck.is_empty() {
            return;
        }
        if self.discard_pile.len() <= 1 {
            return;
        }

        let top = self.discard_pile.pop().expect("pile holds at least two cards");
        debug!("recycling {} discards into the stock", self.discard_pile.len());
        self.deck.add_cards(self.discard_pile.drain(..));
        self.discard_pile.push(top);
        self.deck.shuffle(&mut self.shuffle_rng);
    }

    fn collect_results(&self) -> Vec<PlayerResult> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_eliminated())
            .map(|(i, p)| PlayerResult {
                player: PlayerId::new(i as u8),
                name: p.name().to_owned(),
                hand: p.hand().to_vec(),
                score: p.hand_score(),
            })
            .collect()
    }

    fn emit_state_change(&mut self) {
        self.observer.on_state_change();
    }

    fn emit_message(&mut self, text: &str, kind: MessageKind) {
        self.observer.on_message(text, kind);
    }
}
