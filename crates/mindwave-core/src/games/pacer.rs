//! Breathing pacer engine.
//!
//! Cycles through a fixed table of timed phases (by default Inhale / Hold /
//! Exhale) indefinitely, advancing a progress gauge each tick. There is no
//! failure path: the pacer only reacts to ticks, and `cycles` -- one per
//! completed phase -- is its score.
//!
//! Progress is tracked as whole elapsed milliseconds within the current
//! phase rather than a float accumulator, so phase boundaries land exactly
//! on tick counts: 110 ticks of 100 ms over a 4000/3000/4000 table is
//! exactly three phase completions.

use chrono::Utc;

use crate::config::PacerConfig;
use crate::events::Event;
use crate::games::{GameInput, MiniGame};

/// A named breathing phase with its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacerPhase {
    pub name: String,
    pub duration_ms: u64,
}

/// Breathing pacer state machine.
#[derive(Debug, Clone)]
pub struct PacerEngine {
    phases: Vec<PacerPhase>,
    tick_interval_ms: u64,
    phase_index: usize,
    /// Elapsed milliseconds within the current phase, in [0, duration).
    phase_elapsed_ms: u64,
    cycles: u32,
    running: bool,
}

impl PacerEngine {
    /// Build from config. The phase table is assumed validated
    /// ([`crate::Config::validate`] rejects empty tables and zero
    /// durations).
    pub fn new(config: &PacerConfig) -> Self {
        let phases = config
            .phases
            .iter()
            .map(|p| PacerPhase {
                name: p.name.clone(),
                duration_ms: p.duration_ms,
            })
            .collect();
        Self {
            phases,
            tick_interval_ms: config.tick_interval_ms,
            phase_index: 0,
            phase_elapsed_ms: 0,
            cycles: 0,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn current_phase(&self) -> &PacerPhase {
        &self.phases[self.phase_index]
    }

    /// 0.0 .. 100.0 progress within the current phase. Never reaches 100:
    /// the gauge wraps to 0 the moment it would complete.
    pub fn progress_pct(&self) -> f64 {
        100.0 * self.phase_elapsed_ms as f64 / self.current_phase().duration_ms as f64
    }

    /// Completed phases since start. One increment per phase boundary, not
    /// per full breath cycle.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl MiniGame for PacerEngine {
    fn start(&mut self) -> Option<Event> {
        self.phase_index = 0;
        self.phase_elapsed_ms = 0;
        self.cycles = 0;
        self.running = true;
        Some(Event::PacerStarted {
            phase_name: self.current_phase().name.clone(),
            at: Utc::now(),
        })
    }

    fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.phase_elapsed_ms += self.tick_interval_ms;
        if self.phase_elapsed_ms >= self.current_phase().duration_ms {
            // Duration is re-read after the wrap: each phase is timed
            // independently.
            self.phase_elapsed_ms = 0;
            self.phase_index = (self.phase_index + 1) % self.phases.len();
            self.cycles += 1;
            return Some(Event::PhaseAdvanced {
                phase_index: self.phase_index,
                phase_name: self.current_phase().name.clone(),
                cycles: self.cycles,
                at: Utc::now(),
            });
        }
        None
    }

    fn input(&mut self, _input: GameInput) -> Option<Event> {
        // The pacer has no interactive input; it only reacts to ticks.
        None
    }

    fn reset(&mut self) -> Option<Event> {
        self.start();
        Some(Event::GameReset { at: Utc::now() })
    }

    fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        // State stays readable (frozen) after stop.
        self.running = false;
        Some(Event::GameStopped { at: Utc::now() })
    }

    fn score(&self) -> u32 {
        self.cycles
    }

    fn snapshot(&self) -> Event {
        Event::PacerSnapshot {
            running: self.running,
            phase_index: self.phase_index,
            phase_name: self.current_phase().name.clone(),
            progress_pct: self.progress_pct(),
            cycles: self.cycles,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PacerConfig;

    fn engine() -> PacerEngine {
        let mut engine = PacerEngine::new(&PacerConfig::default());
        engine.start();
        engine
    }

    #[test]
    fn full_breath_cycle_takes_exactly_110_ticks() {
        // 4000 + 3000 + 4000 ms at 100 ms per tick.
        let mut engine = engine();
        for _ in 0..109 {
            engine.tick();
        }
        assert_eq!(engine.cycles(), 2);
        engine.tick();
        assert_eq!(engine.cycles(), 3);
        assert_eq!(engine.phase_index(), 0);
        assert_eq!(engine.progress_pct(), 0.0);
    }

    #[test]
    fn progress_stays_in_range() {
        let mut engine = engine();
        for _ in 0..500 {
            engine.tick();
            let p = engine.progress_pct();
            assert!((0.0..100.0).contains(&p), "progress out of range: {p}");
            assert!(engine.phase_index() < 3);
        }
    }

    #[test]
    fn duration_is_reread_after_wrap() {
        let mut engine = engine();
        // Inhale: 4000 ms = 40 ticks.
        for _ in 0..40 {
            engine.tick();
        }
        assert_eq!(engine.phase_index(), 1);
        assert_eq!(engine.current_phase().name, "Hold");
        // Hold: 3000 ms = 30 ticks, not 40.
        for _ in 0..30 {
            engine.tick();
        }
        assert_eq!(engine.phase_index(), 2);
        assert_eq!(engine.cycles(), 2);
    }

    #[test]
    fn phase_advance_emits_event() {
        let mut engine = engine();
        for _ in 0..39 {
            assert!(engine.tick().is_none());
        }
        match engine.tick() {
            Some(Event::PhaseAdvanced {
                phase_index,
                cycles,
                ..
            }) => {
                assert_eq!(phase_index, 1);
                assert_eq!(cycles, 1);
            }
            other => panic!("expected PhaseAdvanced, got {other:?}"),
        }
    }

    #[test]
    fn stop_freezes_state_and_is_idempotent() {
        let mut engine = engine();
        for _ in 0..45 {
            engine.tick();
        }
        let index = engine.phase_index();
        let progress = engine.progress_pct();

        assert!(engine.stop().is_some());
        assert!(engine.stop().is_none());

        engine.tick();
        assert_eq!(engine.phase_index(), index);
        assert_eq!(engine.progress_pct(), progress);
        assert_eq!(engine.cycles(), 1);
    }

    #[test]
    fn input_is_ignored() {
        let mut engine = engine();
        assert!(engine.input(GameInput::Press).is_none());
        assert_eq!(engine.cycles(), 0);
    }

    #[test]
    fn score_is_cycle_count() {
        let mut engine = engine();
        for _ in 0..110 {
            engine.tick();
        }
        assert_eq!(engine.score(), 3);
    }
}
