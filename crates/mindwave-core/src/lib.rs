//! # MindWave Core Library
//!
//! This library provides the core logic for MindWave's mindfulness
//! mini-games. It implements a CLI-first philosophy where every game is
//! fully operable via a standalone CLI binary, with any graphical shell
//! being a thin display layer over the same core library.
//!
//! ## Architecture
//!
//! - **Game engines**: wall-clock-based state machines. Each engine is
//!   driven by `tick()` calls and a single user input operation; it never
//!   spawns threads of its own.
//! - **Tick source**: the periodic driver that calls `tick()` for a running
//!   session. Exactly one tick source exists per active session.
//! - **Session**: the façade that owns one engine plus its tick source and
//!   forwards every transition event to the display layer.
//!
//! ## Key Components
//!
//! - [`PacerEngine`]: breathing pacer cycling through timed phases
//! - [`SequenceEngine`]: color-memory game with growing random sequences
//! - [`ReflexEngine`]: reaction-time game scoring inverse to latency
//! - [`GameSession`]: engine façade wiring a tick source to an engine
//! - [`Config`]: TOML-backed timing configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod games;
pub mod rng;
pub mod session;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, PacerConfig, ReflexConfig, SequenceConfig};
pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use games::{GameInput, MiniGame};
pub use games::pacer::{PacerEngine, PacerPhase};
pub use games::reflex::{ReflexEngine, ReflexMode};
pub use games::sequence::{SequenceEngine, SequenceMode, SYMBOL_COUNT};
pub use rng::{PcgRandom, RandomSource, ScriptedRandom};
pub use session::GameSession;
pub use tick::TickSource;
