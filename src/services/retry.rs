use crate::errors::TransportError;
use crate::services::config::PipelineConfig;
use crate::services::logger::Logger;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Backoff waits go through this seam so tests can observe them.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Exponential backoff on transient statuses: `base * 2^attempt`, no jitter.
///
/// The attempt counter lives inside a single `run` call, so every top-level
/// request starts from zero. Failures without an HTTP status (DNS, refused
/// connections, timeouts) are returned immediately.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    base_delay_ms: u64,
    statuses: Vec<u16>,
    sleeper: Arc<dyn Sleeper>,
    logger: Logger,
}

impl RetryPolicy {
    pub fn new(config: &PipelineConfig, sleeper: Arc<dyn Sleeper>, logger: &Logger) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            statuses: config.retry_statuses.clone(),
            sleeper,
            logger: logger.child("retry"),
        }
    }

    pub fn is_retryable(&self, err: &TransportError) -> bool {
        err.status()
            .map(|status| self.statuses.contains(&status))
            .unwrap_or(false)
    }

    pub fn delay_for(&self, attempt: usize) -> Duration {
        let factor = 2u64.saturating_pow(attempt.min(u32::MAX as usize) as u32);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 0;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !self.is_retryable(&err) || attempt >= self.max_retries {
                return Err(err);
            }
            let delay = self.delay_for(attempt);
            self.logger.warn(
                "HTTP retry",
                Some(&serde_json::json!({
                    "attempt": attempt + 1,
                    "status": err.status(),
                    "delay_ms": delay.as_millis() as u64,
                })),
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}
