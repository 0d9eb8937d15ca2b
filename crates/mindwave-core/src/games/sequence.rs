//! Color-memory sequence engine.
//!
//! Alternates a non-interactive playback state with an interactive input
//! state. The sequence grows by one symbol per level; validation is
//! positional and incremental, so a wrong symbol fails the round the
//! instant it is pressed, resetting level and score. Repeats within a
//! sequence are allowed: every draw is an independent uniform pick from
//! the four-symbol set.
//!
//! Playback and the post-completion advance delay are stored deadlines
//! checked in `tick()`; `reset()` clears them, so a reset can never be
//! overtaken by a stale level-advance.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::SequenceConfig;
use crate::events::Event;
use crate::games::{GameInput, MiniGame};
use crate::rng::RandomSource;

/// Size of the symbol set (four color pads).
pub const SYMBOL_COUNT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceMode {
    /// Playback in progress; input is rejected.
    Showing,
    /// The player is reproducing the sequence.
    AwaitingInput,
    /// Level completed; waiting out the delay before the next one.
    AdvancePending,
}

/// Position within the playback timeline.
#[derive(Debug, Clone, Copy)]
struct PlaybackCursor {
    /// Index into the sequence being shown.
    step: usize,
    /// Whether the symbol is in its lit window (vs. the gap after it).
    lit: bool,
    /// Deadline for the next lit/gap toggle.
    next_at_ms: u64,
}

/// Memory-game state machine.
pub struct SequenceEngine {
    config: SequenceConfig,
    sequence: Vec<u8>,
    user_input: Vec<u8>,
    level: u32,
    score: u32,
    mode: SequenceMode,
    playback: Option<PlaybackCursor>,
    advance_at_ms: Option<u64>,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
    running: bool,
}

impl SequenceEngine {
    pub fn new(config: SequenceConfig, rng: Box<dyn RandomSource>) -> Self {
        Self::with_clock(config, rng, Box::new(SystemClock))
    }

    /// Construct with an explicit clock (tests inject a manual one).
    pub fn with_clock(
        config: SequenceConfig,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            sequence: Vec::new(),
            user_input: Vec::new(),
            level: 1,
            score: 0,
            mode: SequenceMode::Showing,
            playback: None,
            advance_at_ms: None,
            rng,
            clock,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> SequenceMode {
        self.mode
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    pub fn input_len(&self) -> usize {
        self.user_input.len()
    }

    /// Symbol currently lit during playback, if any.
    pub fn active_symbol(&self) -> Option<u8> {
        match (self.mode, self.playback) {
            (SequenceMode::Showing, Some(cursor)) if cursor.lit => {
                self.sequence.get(cursor.step).copied()
            }
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Generate a fresh `level`-long sequence and begin playback.
    fn start_level(&mut self, level: u32) {
        self.level = level;
        self.sequence = (0..level)
            .map(|_| self.rng.next_bound(SYMBOL_COUNT as u32) as u8)
            .collect();
        self.user_input.clear();
        self.mode = SequenceMode::Showing;
        self.advance_at_ms = None;
        self.playback = Some(PlaybackCursor {
            step: 0,
            lit: true,
            next_at_ms: self.clock.now_ms() + self.config.symbol_active_ms,
        });
    }

    /// Drive the playback timeline; returns the finish event when the last
    /// gap closes.
    fn tick_playback(&mut self, now_ms: u64) -> Option<Event> {
        let mut cursor = self.playback?;
        // A coarse tick can cross several lit/gap boundaries at once.
        while now_ms >= cursor.next_at_ms {
            if cursor.lit {
                cursor.lit = false;
                cursor.next_at_ms += self.config.symbol_gap_ms;
            } else {
                cursor.step += 1;
                if cursor.step >= self.sequence.len() {
                    self.playback = None;
                    self.mode = SequenceMode::AwaitingInput;
                    return Some(Event::PlaybackFinished {
                        level: self.level,
                        at: Utc::now(),
                    });
                }
                cursor.lit = true;
                cursor.next_at_ms += self.config.symbol_active_ms;
            }
        }
        self.playback = Some(cursor);
        None
    }
}

impl MiniGame for SequenceEngine {
    fn start(&mut self) -> Option<Event> {
        self.score = 0;
        self.running = true;
        self.start_level(1);
        Some(Event::PlaybackStarted {
            level: 1,
            at: Utc::now(),
        })
    }

    fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        let now_ms = self.clock.now_ms();
        match self.mode {
            SequenceMode::Showing => self.tick_playback(now_ms),
            SequenceMode::AwaitingInput => None,
            SequenceMode::AdvancePending => {
                if now_ms >= self.advance_at_ms? {
                    let next = self.level + 1;
                    self.start_level(next);
                    return Some(Event::LevelAdvanced {
                        level: next,
                        at: Utc::now(),
                    });
                }
                None
            }
        }
    }

    fn input(&mut self, input: GameInput) -> Option<Event> {
        let symbol = match input {
            GameInput::Symbol(s) if s < SYMBOL_COUNT => s,
            // Bare presses and out-of-range pads mean nothing here.
            _ => return None,
        };
        if !self.running || self.mode != SequenceMode::AwaitingInput {
            // Rejected, not an error: playback and the advance window do
            // not accept input.
            return None;
        }

        self.user_input.push(symbol);
        let position = self.user_input.len() - 1;
        let expected = self.sequence[position];

        if expected != symbol {
            // Mismatch: back to level 1 with a fresh sequence, immediately.
            self.score = 0;
            self.start_level(1);
            return Some(Event::SequenceFailed {
                position,
                expected,
                got: symbol,
                at: Utc::now(),
            });
        }

        if self.user_input.len() == self.sequence.len() {
            let points = self.level * 10;
            self.score += points;
            self.mode = SequenceMode::AdvancePending;
            self.playback = None;
            self.advance_at_ms = Some(self.clock.now_ms() + self.config.advance_delay_ms);
            return Some(Event::SequenceCompleted {
                level: self.level,
                points,
                score: self.score,
                at: Utc::now(),
            });
        }

        None
    }

    fn reset(&mut self) -> Option<Event> {
        // Overrides any in-flight mismatch/advance delay.
        self.score = 0;
        self.running = true;
        self.start_level(1);
        Some(Event::GameReset { at: Utc::now() })
    }

    fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        self.playback = None;
        self.advance_at_ms = None;
        Some(Event::GameStopped { at: Utc::now() })
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn snapshot(&self) -> Event {
        Event::SequenceSnapshot {
            mode: self.mode,
            level: self.level,
            score: self.score,
            sequence_len: self.sequence.len(),
            input_len: self.user_input.len(),
            active_symbol: self.active_symbol(),
            at: Utc::now(),
        }
    }
}
