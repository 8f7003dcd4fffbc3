//! Retrying LLM wrapper with exponential backoff.
//!
//! Wraps any `LlmPort` so that narration survives brief outages of the model
//! server. Requests that can never succeed (auth failures, bad requests) fail fast.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmResponse};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Caps exponential growth
    pub max_delay_ms: u64,
    /// Fraction (0.0-1.0) of the delay randomized either way
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            jitter_factor: 0.2,
        }
    }
}

pub struct ResilientLlmClient {
    inner: Arc<dyn LlmPort>,
    config: RetryConfig,
}

impl ResilientLlmClient {
    pub fn new(inner: Arc<dyn LlmPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`, capped, with jitter.
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let exponential = self
            .config
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    /// Client errors (4xx other than 429) fail fast; transport errors, 5xx
    /// and unparseable responses are retried.
    fn is_retryable(error: &LlmError) -> bool {
        match error {
            LlmError::RequestFailed(msg) => match http_status(msg) {
                Some(status) => !(400..500).contains(&status) || status == 429,
                None => true,
            },
            LlmError::InvalidResponse(_) => true,
        }
    }
}

/// Leading status code of a `"{status}: {body}"` failure message.
fn http_status(message: &str) -> Option<u16> {
    let (status, _) = message.split_once(':')?;
    status.trim().parse().ok()
}

#[async_trait]
impl LlmPort for ResilientLlmClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut attempt = 0;
        loop {
            let error = match self.inner.generate(request.clone()).await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(attempt = attempt + 1, "LLM request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) => e,
            };

            if !Self::is_retryable(&error) {
                tracing::error!(error = %error, "LLM request failed with non-retryable error");
                return Err(error);
            }
            if attempt >= self.config.max_retries {
                tracing::error!(
                    attempts = attempt + 1,
                    error = %error,
                    "LLM request failed after all retry attempts"
                );
                return Err(error);
            }

            attempt += 1;
            let delay = self.calculate_delay(attempt);
            tracing::warn!(
                attempt,
                max_retries = self.config.max_retries,
                delay_ms = delay,
                error = %error,
                "LLM request failed, retrying"
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{FinishReason, MockLlmPort};
    use mockall::Sequence;

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 10,
            jitter_factor: 0.0,
        }
    }

    fn ok(content: &str) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse {
            content: content.to_string(),
            finish_reason: FinishReason::Stop,
            usage: None,
        })
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let mut llm = MockLlmPort::new();
        let mut seq = Sequence::new();
        llm.expect_generate()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(LlmError::RequestFailed("connection reset".into())));
        llm.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ok("The torch flickers."));

        let client = ResilientLlmClient::new(Arc::new(llm), fast_config(3));
        let response = client
            .generate(LlmRequest::new(vec![]))
            .await
            .expect("eventually succeeds");
        assert_eq!(response.content, "The torch flickers.");
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(3)
            .returning(|_| Err(LlmError::InvalidResponse("truncated".into())));

        let client = ResilientLlmClient::new(Arc::new(llm), fast_config(2));
        assert!(client.generate(LlmRequest::new(vec![])).await.is_err());
    }

    #[tokio::test]
    async fn auth_errors_are_not_retried() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Err(LlmError::RequestFailed("401: unauthorized".into())));

        let client = ResilientLlmClient::new(Arc::new(llm), fast_config(3));
        assert!(client.generate(LlmRequest::new(vec![])).await.is_err());
    }

    #[tokio::test]
    async fn unknown_model_is_not_retried() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Err(LlmError::RequestFailed("404: model \"llama9\" not found".into())));

        let client = ResilientLlmClient::new(Arc::new(llm), fast_config(3));
        assert!(client.generate(LlmRequest::new(vec![])).await.is_err());
    }

    #[tokio::test]
    async fn server_errors_are_retried_whatever_the_body_says() {
        let mut llm = MockLlmPort::new();
        let mut seq = Sequence::new();
        llm.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(LlmError::RequestFailed("500: load took 400ms too long".into())));
        llm.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ok("The fog lifts."));

        let client = ResilientLlmClient::new(Arc::new(llm), fast_config(3));
        let response = client.generate(LlmRequest::new(vec![])).await.expect("retried");
        assert_eq!(response.content, "The fog lifts.");
    }

    #[test]
    fn only_client_errors_other_than_rate_limits_are_fatal() {
        let retryable = |msg: &str| {
            ResilientLlmClient::is_retryable(&LlmError::RequestFailed(msg.to_string()))
        };
        assert!(!retryable("400: bad request"));
        assert!(!retryable("422: unprocessable"));
        assert!(retryable("429: slow down"));
        assert!(retryable("503: overloaded"));
        assert!(retryable("error sending request for url (http://localhost:11434/v1)"));
    }

    #[test]
    fn backoff_doubles_until_capped() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_ms: 1000,
            max_delay_ms: 5000,
            jitter_factor: 0.0,
        };
        let client = ResilientLlmClient::new(Arc::new(MockLlmPort::new()), config);
        let delays: Vec<_> = (1..=4).map(|n| client.calculate_delay(n)).collect();
        assert_eq!(delays, [1000, 2000, 4000, 5000]);
    }
}
