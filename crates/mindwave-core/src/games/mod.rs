//! Mini-game engines.
//!
//! All three games share one shape: a state machine advanced by periodic
//! `tick()` calls, an owned set of pending deadlines, and a score
//! accumulator. Scheduled future transitions (sequence playback steps, the
//! reflex arming delay, cooldowns) are stored deadlines checked in `tick()`
//! and cleared by `reset()`/`stop()`, so a reset can never race a stale
//! timer callback.

pub mod pacer;
pub mod reflex;
pub mod sequence;

pub use pacer::{PacerEngine, PacerPhase};
pub use reflex::{ReflexEngine, ReflexMode};
pub use sequence::{SequenceEngine, SequenceMode, SYMBOL_COUNT};

use crate::events::Event;

/// The single user-facing input operation.
///
/// The pacer and reflex games take a bare press; the sequence game takes
/// the index of the pressed symbol pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Press,
    Symbol(u8),
}

/// Common surface of the three game engines.
///
/// Engines are single-threaded: the caller delivers one event at a time
/// (a tick or an input) and observes the resulting transition event, so no
/// two transitions for the same engine ever run concurrently.
pub trait MiniGame: Send {
    /// Begin (or restart) the game from its initial state.
    fn start(&mut self) -> Option<Event>;

    /// Advance time. Called periodically by the owning tick source.
    /// No-op while the game is stopped.
    fn tick(&mut self) -> Option<Event>;

    /// Deliver a user input. Inputs arriving outside an accepting state
    /// are silently dropped, never an error.
    fn input(&mut self, input: GameInput) -> Option<Event>;

    /// Restart from scratch, cancelling any pending scheduled transition.
    fn reset(&mut self) -> Option<Event>;

    /// Freeze the game. State stays readable; idempotent.
    fn stop(&mut self) -> Option<Event>;

    /// Current score.
    fn score(&self) -> u32;

    /// Immutable state snapshot for the display layer.
    fn snapshot(&self) -> Event;
}
