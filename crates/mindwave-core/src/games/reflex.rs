//! Reaction-time engine.
//!
//! Each round waits a randomized delay, arms the stimulus, then measures
//! the latency of the player's press. A press during the waiting window is
//! an early click: a short penalty cooldown and the same round restarts.
//! A valid press scores inversely to latency, clamped at zero.
//!
//! The arming delay and cooldown are stored deadlines checked in `tick()`;
//! `reset()` clears them, so a stale arming timer can never fire against a
//! freshly reset game.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::ReflexConfig;
use crate::events::Event;
use crate::games::{GameInput, MiniGame};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflexMode {
    /// Randomized delay before the stimulus; a press here is early.
    Waiting,
    /// Stimulus live; a press here scores.
    Armed,
    /// Post-press pause; presses are ignored.
    Cooldown,
}

/// Reaction-game state machine.
pub struct ReflexEngine {
    config: ReflexConfig,
    round: u32,
    score: u32,
    mode: ReflexMode,
    /// Set only while `mode == Armed`.
    armed_at_ms: Option<u64>,
    /// Defined after the first valid press; survives into later rounds.
    last_latency_ms: Option<u64>,
    /// Deadline for the Waiting -> Armed transition.
    arm_at_ms: Option<u64>,
    /// Deadline for leaving Cooldown.
    cooldown_until_ms: Option<u64>,
    /// Whether leaving Cooldown increments the round (false after an
    /// early click: the same round is retried).
    advance_after_cooldown: bool,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
    running: bool,
}

impl ReflexEngine {
    pub fn new(config: ReflexConfig, rng: Box<dyn RandomSource>) -> Self {
        Self::with_clock(config, rng, Box::new(SystemClock))
    }

    /// Construct with an explicit clock (tests inject a manual one).
    pub fn with_clock(
        config: ReflexConfig,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            round: 1,
            score: 0,
            mode: ReflexMode::Waiting,
            armed_at_ms: None,
            last_latency_ms: None,
            arm_at_ms: None,
            cooldown_until_ms: None,
            advance_after_cooldown: false,
            rng,
            clock,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> ReflexMode {
        self.mode
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn last_latency_ms(&self) -> Option<u64> {
        self.last_latency_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Enter the waiting window with a fresh random arming delay in
    /// `[min_arm_delay_ms, max_arm_delay_ms)`.
    fn start_round(&mut self) {
        let window = (self.config.max_arm_delay_ms - self.config.min_arm_delay_ms) as u32;
        let delay = self.config.min_arm_delay_ms + self.rng.next_bound(window) as u64;
        self.mode = ReflexMode::Waiting;
        self.armed_at_ms = None;
        self.cooldown_until_ms = None;
        self.advance_after_cooldown = false;
        self.arm_at_ms = Some(self.clock.now_ms() + delay);
    }
}

impl MiniGame for ReflexEngine {
    fn start(&mut self) -> Option<Event> {
        self.round = 1;
        self.score = 0;
        self.last_latency_ms = None;
        self.running = true;
        self.start_round();
        Some(Event::RoundStarted {
            round: self.round,
            at: Utc::now(),
        })
    }

    fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        let now_ms = self.clock.now_ms();
        match self.mode {
            ReflexMode::Waiting => {
                if now_ms >= self.arm_at_ms? {
                    self.mode = ReflexMode::Armed;
                    self.arm_at_ms = None;
                    self.armed_at_ms = Some(now_ms);
                    return Some(Event::RoundArmed {
                        round: self.round,
                        at: Utc::now(),
                    });
                }
                None
            }
            ReflexMode::Armed => None,
            ReflexMode::Cooldown => {
                if now_ms >= self.cooldown_until_ms? {
                    if self.advance_after_cooldown {
                        self.round += 1;
                    }
                    self.start_round();
                    return Some(Event::RoundStarted {
                        round: self.round,
                        at: Utc::now(),
                    });
                }
                None
            }
        }
    }

    fn input(&mut self, _input: GameInput) -> Option<Event> {
        // Any pad counts as a press here.
        if !self.running {
            return None;
        }
        let now_ms = self.clock.now_ms();
        match self.mode {
            ReflexMode::Waiting => {
                // Early click: no score change, no round change. Cool down
                // and retry the same round.
                self.mode = ReflexMode::Cooldown;
                self.arm_at_ms = None;
                self.advance_after_cooldown = false;
                self.cooldown_until_ms = Some(now_ms + self.config.cooldown_ms);
                Some(Event::EarlyInput {
                    round: self.round,
                    at: Utc::now(),
                })
            }
            ReflexMode::Armed => {
                let armed_at = self.armed_at_ms.take()?;
                let latency_ms = now_ms.saturating_sub(armed_at);
                let points = self.config.latency_budget_ms.saturating_sub(latency_ms) as u32;
                self.last_latency_ms = Some(latency_ms);
                self.score += points;
                self.mode = ReflexMode::Cooldown;
                self.advance_after_cooldown = true;
                self.cooldown_until_ms = Some(now_ms + self.config.cooldown_ms);
                Some(Event::ReflexScored {
                    round: self.round,
                    latency_ms,
                    points,
                    score: self.score,
                    at: Utc::now(),
                })
            }
            ReflexMode::Cooldown => None,
        }
    }

    fn reset(&mut self) -> Option<Event> {
        self.round = 1;
        self.score = 0;
        self.last_latency_ms = None;
        self.running = true;
        self.start_round();
        Some(Event::GameReset { at: Utc::now() })
    }

    fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        // Invalidate pending deadlines; the rest of the state stays
        // readable (frozen).
        self.running = false;
        self.arm_at_ms = None;
        self.cooldown_until_ms = None;
        Some(Event::GameStopped { at: Utc::now() })
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn snapshot(&self) -> Event {
        Event::ReflexSnapshot {
            mode: self.mode,
            round: self.round,
            score: self.score,
            last_latency_ms: self.last_latency_ms,
            at: Utc::now(),
        }
    }
}
