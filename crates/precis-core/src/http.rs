use serde::Serialize;
use std::thread;
use std::time::Duration;
use ureq::{Agent, Error as UreqError};

use crate::ProviderError;

const TIMEOUT_CONNECT: Duration = Duration::from_secs(5);
const TIMEOUT_RESOLVE: Duration = Duration::from_secs(5);

const RETRY_BASE_MS: u64 = 200;

/// Raw reply from a POST, with status codes returned as values.
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub fn build_agent(timeout: Duration) -> Agent {
    let config = Agent::config_builder()
        .timeout_global(Some(timeout))
        .timeout_resolve(Some(TIMEOUT_RESOLVE.min(timeout)))
        .timeout_connect(Some(TIMEOUT_CONNECT.min(timeout)))
        .http_status_as_error(false)
        .build();
    config.into()
}

pub fn should_retry(err: &UreqError) -> bool {
    matches!(
        err,
        UreqError::Timeout(_)
            | UreqError::Io(_)
            | UreqError::HostNotFound
            | UreqError::ConnectionFailed
            | UreqError::TooManyRedirects
            | UreqError::RedirectFailed
    )
}

pub fn should_retry_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

pub fn retry_delay(attempt: usize) -> Duration {
    let shift = attempt.min(6) as u32;
    let delay = RETRY_BASE_MS.saturating_mul(1_u64 << shift);
    Duration::from_millis(delay)
}

pub fn map_transport_error(err: UreqError) -> ProviderError {
    match err {
        UreqError::Timeout(kind) => ProviderError::Timeout(kind.to_string()),
        other => ProviderError::Network(other.to_string()),
    }
}

/// POST a JSON body with bearer auth, retrying transient failures.
///
/// The last retryable status is returned as a reply rather than an error so
/// the caller can read the provider's message out of the body.
pub fn post_json_with_retry<T: Serialize>(
    agent: &Agent,
    url: &str,
    bearer: &str,
    body: &T,
    max_retries: usize,
) -> Result<HttpReply, ProviderError> {
    let auth = format!("Bearer {bearer}");
    let mut attempt = 0;
    loop {
        let result = agent
            .post(url)
            .header("Authorization", &auth)
            .send_json(body);

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response
                    .into_body()
                    .read_to_string()
                    .map_err(map_transport_error)?;
                if should_retry_status(status) && attempt < max_retries {
                    tracing::warn!(status, attempt, "provider returned retryable status");
                    thread::sleep(retry_delay(attempt));
                    attempt += 1;
                    continue;
                }
                return Ok(HttpReply { status, body });
            }
            Err(err) => {
                if should_retry(&err) && attempt < max_retries {
                    tracing::warn!(error = %err, attempt, "request failed, retrying");
                    thread::sleep(retry_delay(attempt));
                    attempt += 1;
                    continue;
                }
                return Err(map_transport_error(err));
            }
        }
    }
}
