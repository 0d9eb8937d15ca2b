//! Game transition events.
//!
//! Every state change in an engine produces an `Event`. The display layer
//! (CLI, GUI shell) consumes them as they happen and can request a fresh
//! snapshot event at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::games::reflex::ReflexMode;
use crate::games::sequence::SequenceMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // ── Pacer ────────────────────────────────────────────────────────
    PacerStarted {
        phase_name: String,
        at: DateTime<Utc>,
    },
    /// Progress completed a phase; the gauge wrapped to the next phase.
    PhaseAdvanced {
        phase_index: usize,
        phase_name: String,
        cycles: u32,
        at: DateTime<Utc>,
    },
    PacerSnapshot {
        running: bool,
        phase_index: usize,
        phase_name: String,
        /// 0.0 .. 100.0 progress within the current phase.
        progress_pct: f64,
        cycles: u32,
        at: DateTime<Utc>,
    },

    // ── Sequence ─────────────────────────────────────────────────────
    /// A fresh sequence was generated and playback began.
    PlaybackStarted {
        level: u32,
        at: DateTime<Utc>,
    },
    /// Playback finished; the game now accepts input.
    PlaybackFinished {
        level: u32,
        at: DateTime<Utc>,
    },
    /// The full sequence was reproduced correctly.
    SequenceCompleted {
        level: u32,
        points: u32,
        score: u32,
        at: DateTime<Utc>,
    },
    /// A symbol did not match; level and score were reset.
    SequenceFailed {
        position: usize,
        expected: u8,
        got: u8,
        at: DateTime<Utc>,
    },
    /// The post-completion delay elapsed and the next level began.
    LevelAdvanced {
        level: u32,
        at: DateTime<Utc>,
    },
    SequenceSnapshot {
        mode: SequenceMode,
        level: u32,
        score: u32,
        sequence_len: usize,
        input_len: usize,
        /// Symbol currently lit during playback, if any.
        active_symbol: Option<u8>,
        at: DateTime<Utc>,
    },

    // ── Reflex ───────────────────────────────────────────────────────
    /// A round entered its randomized waiting window.
    RoundStarted {
        round: u32,
        at: DateTime<Utc>,
    },
    /// The waiting delay elapsed; the stimulus is live.
    RoundArmed {
        round: u32,
        at: DateTime<Utc>,
    },
    /// Input arrived before arming: penalty cooldown, same round.
    EarlyInput {
        round: u32,
        at: DateTime<Utc>,
    },
    /// Valid input; latency measured and scored.
    ReflexScored {
        round: u32,
        latency_ms: u64,
        points: u32,
        score: u32,
        at: DateTime<Utc>,
    },
    ReflexSnapshot {
        mode: ReflexMode,
        round: u32,
        score: u32,
        last_latency_ms: Option<u64>,
        at: DateTime<Utc>,
    },

    // ── Shared ───────────────────────────────────────────────────────
    GameReset {
        at: DateTime<Utc>,
    },
    GameStopped {
        at: DateTime<Utc>,
    },
}
