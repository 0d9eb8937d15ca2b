//! Periodic tick source.
//!
//! The game engines are wall-clock state machines with no threads of their
//! own -- something has to call `tick()` periodically. `TickSource` is that
//! driver: a worker thread firing a callback at a fixed interval until
//! stopped. Exactly one tick source exists per active game session, and it
//! never outlives its owner (`Drop` stops it).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{CoreError, Result};

/// Owned periodic timer firing a callback every `interval_ms`.
pub struct TickSource {
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TickSource {
    /// Spawn the ticker thread.
    ///
    /// Returns [`CoreError::Init`] if the host cannot spawn the thread.
    /// Firing begins one full interval after spawn.
    pub fn spawn<F>(interval_ms: u64, mut on_tick: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop_flag);
        let interval = Duration::from_millis(interval_ms.max(1));

        let handle = std::thread::Builder::new()
            .name("mindwave-tick".into())
            .spawn(move || {
                while !flag.load(Ordering::SeqCst) {
                    std::thread::park_timeout(interval);
                    // Re-check after the sleep so no new tick begins once
                    // stop() has been requested.
                    if flag.load(Ordering::SeqCst) {
                        break;
                    }
                    on_tick();
                }
            })
            .map_err(CoreError::Init)?;

        Ok(Self {
            stop_flag,
            handle: Some(handle),
        })
    }

    /// Stop ticking. Idempotent.
    ///
    /// Joins the worker thread, so after this returns no new tick can
    /// begin. A tick already in flight when stop is requested completes.
    /// Must not be called from within the tick callback.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }

    /// Whether the ticker is still running.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn fires_until_stopped() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let mut ticker = TickSource::spawn(1, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        std::thread::sleep(Duration::from_millis(50));
        ticker.stop();
        let fired = count.load(Ordering::SeqCst);
        assert!(fired > 0, "expected at least one tick, got {fired}");

        // No new tick may begin after stop returns.
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), fired);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut ticker = TickSource::spawn(1, || {}).unwrap();
        ticker.stop();
        assert!(!ticker.is_running());
        ticker.stop();
        assert!(!ticker.is_running());
    }

    #[test]
    fn drop_stops_the_thread() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        {
            let _ticker = TickSource::spawn(1, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
            std::thread::sleep(Duration::from_millis(10));
        }
        let fired = count.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), fired);
    }
}
