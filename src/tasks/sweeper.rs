//! Cache Sweeper
//!
//! Background thread that periodically evicts stale cache entries.
//!
//! Eviction only removes entries a bounded lookup would already treat as
//! missing, so sweeping never changes what clients see. It only bounds
//! memory held by keys nobody reads again.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, RecvTimeoutError, Sender};

use crate::error::Result;
use crate::store::KeyValueStore;

/// Owns the sweeper thread; stopping or dropping it ends the thread
pub struct SweeperHandle {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender disconnects the channel and wakes the thread
        drop(self.stop.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn a thread that evicts entries older than `max_age` every `interval`
///
/// `on_sweep` is called after every pass with the number of evicted entries.
pub fn spawn_sweeper<F>(
    cache: Arc<KeyValueStore>,
    max_age: Duration,
    interval: Duration,
    mut on_sweep: F,
) -> Result<SweeperHandle>
where
    F: FnMut(usize) + Send + 'static,
{
    let (stop_tx, stop_rx) = bounded::<()>(0);

    let thread = thread::Builder::new()
        .name("tierkv-sweeper".to_string())
        .spawn(move || {
            tracing::info!(
                "Starting cache sweeper: interval={:?}, max_age={:?}",
                interval,
                max_age
            );

            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let removed = cache.evict_older_than(max_age);
                        if removed > 0 {
                            tracing::debug!("Cache sweep: evicted {} stale entries", removed);
                        }
                        on_sweep(removed);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            tracing::info!("Cache sweeper stopped");
        })?;

    Ok(SweeperHandle {
        stop: Some(stop_tx),
        thread: Some(thread),
    })
}
