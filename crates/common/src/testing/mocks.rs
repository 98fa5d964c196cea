//! Mock implementations of common traits

#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::observability::{ContextListener, ContextSnapshot};
use crate::resilience::Sleeper;

/// [`Sleeper`] that records requested delays instead of waiting
///
/// Each call yields once so other tasks still get a chance to run, which
/// keeps cancellation tests meaningful.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.delays.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().push(delay);
        tokio::task::yield_now().await;
    }
}

/// [`ContextListener`] counting releases and keeping the last snapshot
#[derive(Debug, Default)]
pub struct CountingContextListener {
    count: AtomicUsize,
    last: Mutex<Option<ContextSnapshot>>,
}

impl CountingContextListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a context was released
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<ContextSnapshot> {
        self.last.lock().clone()
    }
}

impl ContextListener for CountingContextListener {
    fn on_release(&self, snapshot: &ContextSnapshot) {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sleeper_records_in_order() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_millis(100)).await;
        sleeper.sleep(Duration::from_millis(200)).await;

        assert_eq!(sleeper.delays(), vec![Duration::from_millis(100), Duration::from_millis(200)]);
        assert_eq!(sleeper.total(), Duration::from_millis(300));
    }
}
