use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Anything the poll loop can re-fetch. Implementations swallow their own errors.
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    async fn refresh(&self);
}

/// Shortest period the loop accepts.
pub const MIN_PERIOD: Duration = Duration::from_millis(100);

/// Owns a running poll task.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// A token that stops the loop when cancelled, for wiring into other shutdown paths.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the loop, including a refresh in flight, and waits for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            tracing::error!(error = %err, "poll task ended abnormally");
        }
    }
}

/// Calls `target.refresh()` every `period`, first one period from now.
///
/// Fixed period, no jitter, no backoff. A slow refresh delays the following
/// ticks instead of bunching them.
pub fn spawn_poll<R: Refresh>(target: Arc<R>, period: Duration) -> PollHandle {
    let period = period.max(MIN_PERIOD);
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(period_ms = period.as_millis() as u64, "poll loop started");

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            tokio::select! {
                _ = token.cancelled() => break,
                _ = target.refresh() => {}
            }
        }

        tracing::debug!("poll loop stopped");
    });

    PollHandle { cancel, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Refresh for Counter {
        async fn refresh(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Stuck;

    #[async_trait]
    impl Refresh for Stuck {
        async fn refresh(&self) {
            std::future::pending::<()>().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_once_per_period() {
        let counter = Arc::new(Counter::default());
        let handle = spawn_poll(counter.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 3);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_the_loop() {
        let counter = Arc::new(Counter::default());
        let handle = spawn_poll(counter.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(31)).await;
        handle.stop().await;

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_interrupts_a_stuck_refresh() {
        let handle = spawn_poll(Arc::new(Stuck), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(!handle.is_finished());
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_token_stops_the_loop() {
        let counter = Arc::new(Counter::default());
        let handle = spawn_poll(counter.clone(), Duration::from_secs(10));

        handle.cancel_token().cancel();
        tokio::time::sleep(Duration::from_secs(100)).await;

        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
        assert!(handle.is_finished());
    }
}
