//! Engine façade wiring a game to its tick source.
//!
//! A `GameSession` owns exactly one engine and the one `TickSource` driving
//! it. Every transition -- tick-produced or input-produced -- happens under
//! the session mutex, so the engine processes one event at a time to
//! completion; there is no other parallelism. Tick-produced events are
//! forwarded to the display layer through the channel supplied at
//! construction.

use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::events::Event;
use crate::games::{GameInput, MiniGame};
use crate::tick::TickSource;

/// A running game: engine + owned ticker + event channel.
pub struct GameSession<G: MiniGame + 'static> {
    game: Arc<Mutex<G>>,
    ticker: Option<TickSource>,
}

impl<G: MiniGame + 'static> GameSession<G> {
    /// Start the game and spawn its tick source.
    ///
    /// Fails with [`crate::CoreError::Init`] if the host cannot provide the
    /// timing thread.
    pub fn start(
        mut game: G,
        tick_interval_ms: u64,
        events: mpsc::Sender<Event>,
    ) -> Result<Self> {
        if let Some(event) = game.start() {
            let _ = events.send(event);
        }
        let game = Arc::new(Mutex::new(game));
        let worker = Arc::clone(&game);
        let ticker = TickSource::spawn(tick_interval_ms, move || {
            let event = lock(&worker).tick();
            if let Some(event) = event {
                let _ = events.send(event);
            }
        })?;
        Ok(Self {
            game,
            ticker: Some(ticker),
        })
    }

    /// Deliver the single user input operation.
    pub fn input(&self, input: GameInput) -> Option<Event> {
        lock(&self.game).input(input)
    }

    /// Restart the game, overriding any pending scheduled transition.
    pub fn reset(&self) -> Option<Event> {
        lock(&self.game).reset()
    }

    /// Immutable state snapshot.
    pub fn snapshot(&self) -> Event {
        lock(&self.game).snapshot()
    }

    pub fn score(&self) -> u32 {
        lock(&self.game).score()
    }

    /// Stop the ticker and freeze the game. Idempotent; state stays
    /// readable afterwards.
    pub fn stop(&mut self) -> Option<Event> {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
        lock(&self.game).stop()
    }
}

impl<G: MiniGame + 'static> Drop for GameSession<G> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Lock, recovering the guard if a panicking tick poisoned the mutex.
fn lock<G>(game: &Arc<Mutex<G>>) -> MutexGuard<'_, G> {
    game.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
