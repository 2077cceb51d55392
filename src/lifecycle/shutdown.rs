//! Shutdown coordination.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The server task subscribes; the lifecycle controller triggers once when a
/// termination signal arrives.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of racing the drain against the hard deadline.
#[derive(Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Drain finished inside the deadline.
    Clean,
    /// Drain finished inside the deadline but reported an error.
    Failed(String),
    /// The deadline fired first.
    DeadlineExceeded,
}

/// Race an in-progress drain against a one-shot deadline.
///
/// Whichever side finishes first decides the outcome; the losing future is
/// dropped, so a won race leaves no timer behind to fire later.
pub async fn race_drain<F, E>(drain: F, deadline: Duration) -> DrainOutcome
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    tokio::select! {
        result = drain => match result {
            Ok(()) => DrainOutcome::Clean,
            Err(err) => DrainOutcome::Failed(err.to_string()),
        },
        _ = tokio::time::sleep(deadline) => DrainOutcome::DeadlineExceeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_all_subscribers() {
        let shutdown = Shutdown::new();
        let mut first = shutdown.subscribe();
        let mut second = shutdown.subscribe();

        shutdown.trigger();

        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_trigger_without_subscribers_is_harmless() {
        Shutdown::new().trigger();
    }

    #[tokio::test]
    async fn test_fast_drain_wins_the_race() {
        let outcome = race_drain(
            async { Ok::<(), std::io::Error>(()) },
            Duration::from_secs(15),
        )
        .await;
        assert_eq!(outcome, DrainOutcome::Clean);
    }

    #[tokio::test]
    async fn test_slow_drain_loses_the_race() {
        let outcome = race_drain(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<(), std::io::Error>(())
            },
            Duration::from_millis(20),
        )
        .await;
        assert_eq!(outcome, DrainOutcome::DeadlineExceeded);
    }

    #[tokio::test]
    async fn test_drain_error_is_reported() {
        let outcome = race_drain(
            async {
                Err::<(), _>(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "listener gone",
                ))
            },
            Duration::from_secs(15),
        )
        .await;
        assert_eq!(outcome, DrainOutcome::Failed("listener gone".to_string()));
    }

    #[tokio::test]
    async fn test_drain_inside_deadline_is_clean() {
        // Drain takes a fraction of the deadline, like a healthy server.
        let outcome = race_drain(
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<(), std::io::Error>(())
            },
            Duration::from_secs(15),
        )
        .await;
        assert_eq!(outcome, DrainOutcome::Clean);
    }
}
