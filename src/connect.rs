//! Connection manager: bounded retry with a fixed delay, then give up.

use crate::store::Store;
use async_trait::async_trait;
use std::time::Duration;

/// Default number of connection attempts
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
/// Default delay between connection attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Opens sessions against a store. One call is one attempt.
#[async_trait]
pub trait Connector: Sync {
    type Session: Store;

    /// Human-readable target for log lines, e.g. `host:5432/db`.
    fn target(&self) -> String;

    async fn connect(&self) -> anyhow::Result<Self::Session>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_CONNECT_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// A session plus the attempt number that produced it.
pub struct Connected<S> {
    pub session: S,
    pub attempts: u32,
}

/// Connect with configurable retries.
///
/// Each failed attempt is logged at error level and followed by
/// `policy.delay` of sleep, except after the last one. When every attempt
/// fails the returned error names the target, the attempt count and the last
/// underlying failure.
pub async fn connect_with_retries<C: Connector>(
    connector: &C,
    policy: RetryPolicy,
) -> anyhow::Result<Connected<C::Session>> {
    let max_attempts = policy.max_attempts.max(1);
    let target = connector.target();
    tracing::info!("Attempting to connect to PostgreSQL at {}...", target);

    let mut last_error = None;

    for attempt in 1..=max_attempts {
        tracing::info!("Attempt {}/{}...", attempt, max_attempts);
        match connector.connect().await {
            Ok(session) => {
                tracing::info!("Connected to PostgreSQL at {}", target);
                return Ok(Connected { session, attempts: attempt });
            }
            Err(e) => {
                tracing::error!(
                    "Connection failed (attempt {}/{}): {:#}",
                    attempt,
                    max_attempts,
                    e
                );
                last_error = Some(e);
                if attempt < max_attempts {
                    tracing::info!("Retrying in {:?}...", policy.delay);
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    tracing::error!("Giving up: failed to connect after {} attempts", max_attempts);
    let last = match last_error {
        Some(e) => format!("{e:#}"),
        None => "no attempt was made".to_string(),
    };
    Err(anyhow::anyhow!(
        "Failed to connect to PostgreSQL at '{}' after {} attempts. Last error: {}",
        target,
        max_attempts,
        last
    ))
}
