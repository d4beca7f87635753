use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::agents::UserAgentPool;
use crate::config::{ARCHIVE_DELAY_RANGE, MAX_ATTEMPTS};
use crate::error::Result;

/// Outcome of one attempt, before retry policy is applied.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid JSON body: {0}")]
    Body(String),
}

/// One GET attempt carrying a single User-Agent header. `Ok` only for an
/// HTTP 200 with a decodable JSON body; everything else is a failed attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(
        &self,
        url: &str,
        user_agent: &str,
    ) -> std::result::Result<serde_json::Value, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        user_agent: &str,
    ) -> std::result::Result<serde_json::Value, TransportError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}

/// Injectable clock so tests run the retry and politeness delays without
/// real waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry policy for one URL: attempt ceiling plus an optional uniform
/// seconds range slept between failed attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Option<(f64, f64)>,
}

impl RetryPolicy {
    /// Archive listings back off between failed attempts.
    pub fn archive() -> Self {
        Self { max_attempts: MAX_ATTEMPTS, backoff: Some(ARCHIVE_DELAY_RANGE) }
    }

    /// Detail fetches retry immediately. The asymmetry with the archive path
    /// is intended; see DESIGN.md.
    pub fn detail() -> Self {
        Self { max_attempts: MAX_ATTEMPTS, backoff: None }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Success(serde_json::Value),
    Exhausted,
}

/// Uniform random duration within an inclusive seconds range.
pub fn jitter(rng: &mut StdRng, range: (f64, f64)) -> Duration {
    Duration::from_secs_f64(rng.gen_range(range.0..=range.1))
}

/// Retry-with-rotating-identity primitive. Each attempt draws a fresh
/// User-Agent outside `excluded`; a failed attempt adds its identity to
/// `excluded` and sleeps the policy backoff before the next one. Knows
/// nothing about archive vs. detail semantics — the caller records failures.
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    sleeper: &dyn Sleeper,
    agents: &mut UserAgentPool,
    rng: &mut StdRng,
    excluded: &mut HashSet<String>,
    policy: &RetryPolicy,
    url: &str,
) -> FetchOutcome {
    for attempt in 1..=policy.max_attempts {
        let agent = agents.next(excluded);
        match transport.get_json(url, &agent).await {
            Ok(payload) => return FetchOutcome::Success(payload),
            Err(e) => {
                debug!("attempt {attempt}/{} failed for {url}: {e}", policy.max_attempts);
                excluded.insert(agent);
                if attempt < policy.max_attempts {
                    if let Some(range) = policy.backoff {
                        sleeper.sleep(jitter(rng, range)).await;
                    }
                }
            }
        }
    }
    FetchOutcome::Exhausted
}
