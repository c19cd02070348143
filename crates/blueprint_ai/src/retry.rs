//! Retry logic with exponential backoff for HTTP API calls.
//!
//! Retries on transient errors (429 rate limit, 5xx server errors, network
//! timeouts). Does NOT retry on client errors (400, 401, 403, 404).

use crate::llm::AiError;
use anyhow::Result;
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for each subsequent delay.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

/// Execute an async HTTP operation with retry logic.
///
/// Returns the successful `Response`. Auth failures surface as
/// `AiError::MissingApiKey`, exhausted rate limits as `AiError::RateLimited`,
/// everything else as `AiError::Upstream`.
pub async fn with_retry<F, Fut>(
    config: &RetryConfig,
    provider_name: &str,
    operation: F,
) -> Result<Response, AiError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<Response>>,
{
    let mut delay = config.initial_delay;
    let mut last_error = None;
    let mut rate_limited = false;

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    if attempt > 1 {
                        tracing::info!("{} succeeded on attempt {}", provider_name, attempt);
                    }
                    return Ok(response);
                }

                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                    return Err(AiError::MissingApiKey);
                }

                if !is_retryable_status(status) {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(AiError::Upstream(anyhow::anyhow!(
                        "{} API error ({}): {}",
                        provider_name,
                        status,
                        error_text
                    )));
                }

                rate_limited = status == StatusCode::TOO_MANY_REQUESTS;
                let error_text = response.text().await.unwrap_or_default();
                tracing::warn!(
                    "{} returned {} on attempt {}/{}: {}",
                    provider_name,
                    status,
                    attempt,
                    config.max_attempts,
                    error_text.chars().take(200).collect::<String>()
                );
                last_error = Some(format!("{} ({}): {}", provider_name, status, error_text));
            }
            Err(e) => {
                rate_limited = false;
                tracing::warn!(
                    "{} network error on attempt {}/{}: {}",
                    provider_name,
                    attempt,
                    config.max_attempts,
                    e
                );
                last_error = Some(format!("{}: {}", provider_name, e));
            }
        }

        if attempt < config.max_attempts {
            let jitter = Duration::from_millis(rand_jitter());
            let sleep_time = delay + jitter;

            tracing::info!(
                "{} retrying in {:.1}s (attempt {}/{})",
                provider_name,
                sleep_time.as_secs_f64(),
                attempt + 1,
                config.max_attempts
            );

            tokio::time::sleep(sleep_time).await;

            delay = Duration::from_secs_f64(
                (delay.as_secs_f64() * config.backoff_factor).min(config.max_delay.as_secs_f64()),
            );
        }
    }

    if rate_limited {
        return Err(AiError::RateLimited);
    }
    Err(AiError::Upstream(anyhow::anyhow!(
        "All {} retry attempts exhausted. Last error: {}",
        config.max_attempts,
        last_error.unwrap_or_else(|| "unknown".to_string())
    )))
}

/// Simple jitter: random 0-500ms using timestamp as poor-man's random.
fn rand_jitter() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 500) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::REQUEST_TIMEOUT));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
    }
}
