//! Shutdown and deadline handling for in-flight requests.
//!
//! [`SigDown`] listens for OS shutdown signals (SIGTERM/SIGINT on Unix,
//! Ctrl+C on Windows) and an optional deadline, and cancels the
//! [`CancellationToken`] handed to transports when either fires.

use std::time::Duration;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Cancels a token on SIGTERM / SIGINT / Ctrl+C or after a deadline.
#[derive(Debug)]
pub struct SigDown {
    task_tracker: TaskTracker,
    cancellation_token: CancellationToken,
}

impl SigDown {
    /// Spawns the listener. It stops on its own once the token is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] if signal registration fails.
    #[allow(clippy::unnecessary_wraps)]
    pub fn try_new(deadline: Option<Duration>) -> Result<Self, std::io::Error> {
        let cancellation_token = CancellationToken::new();
        let token = cancellation_token.clone();
        let task_tracker = TaskTracker::new();

        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep(deadline).await,
                None => std::future::pending().await,
            }
        };

        #[cfg(unix)]
        {
            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;
            task_tracker.spawn(async move {
                tokio::select! {
                    () = token.cancelled() => return,
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                    () = expired => {},
                }
                token.cancel();
            });
        }

        #[cfg(windows)]
        {
            task_tracker.spawn(async move {
                tokio::select! {
                    () = token.cancelled() => return,
                    _ = tokio::signal::ctrl_c() => {},
                    () = expired => {},
                }
                token.cancel();
            });
        }

        task_tracker.close();
        Ok(Self {
            task_tracker,
            cancellation_token,
        })
    }

    /// Returns a clone of the token to pass to transports.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Stops listening and waits for the listener task to exit.
    pub async fn release(self) {
        self.cancellation_token.cancel();
        self.task_tracker.wait().await;
    }
}
