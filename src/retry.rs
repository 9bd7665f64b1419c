//! Fixed-wait retry policy shared by the classifier and the router.

use std::future::Future;
use std::time::Duration;

use crate::error::TriageError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or attempts are exhausted. `on_retry` fires
    /// before each sleep with the 1-based attempt number and the error that
    /// triggered the retry; the last error propagates unchanged.
    pub async fn run<T, F, Fut, C>(&self, mut op: F, mut on_retry: C) -> Result<T, TriageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TriageError>>,
        C: FnMut(u32, &TriageError),
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_attempts && error.is_retryable() => {
                    on_retry(attempt, &error);
                    tokio::time::sleep(self.wait).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// `run` with the standard warning log as the retry callback.
    pub async fn run_logged<T, F, Fut>(&self, context: &str, op: F) -> Result<T, TriageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TriageError>>,
    {
        let retries = self.max_attempts.saturating_sub(1);
        self.run(op, |attempt, error| {
            tracing::warn!(
                "retry request ({}/{}) - wait {}s - {} failed: {}",
                attempt,
                retries,
                self.wait.as_secs(),
                context,
                error
            );
        })
        .await
    }
}
