//! Client-side error type shared by the HTTP-backed capabilities.
//!
//! These errors never cross the capability boundary: implementations catch
//! them and produce degraded outcomes with fallback payloads instead.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use thiserror::Error;

/// Error raised by the OpenAI and Tavily clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be built or the payload was unusable.
    #[error("API call failed: {0}")]
    ExecutionFailed(String),

    /// The remote service answered with a failure, or transport broke down.
    #[error("API process error: {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The response arrived but could not be interpreted.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Maps a reqwest transport error (connect/timeout/etc.) before any
    /// HTTP status is available.
    pub(crate) fn transport(service: &str, err: reqwest::Error) -> Self {
        ApiError::ProcessError {
            status_code: None,
            message: format!("{service} request failed: {err}"),
            is_retryable: err.is_connect() || err.is_timeout(),
            retry_after: None,
        }
    }

    /// Maps a non-success HTTP status plus an extracted error message.
    pub(crate) fn http(status: StatusCode, message: String, retry_after: Option<Duration>) -> Self {
        ApiError::ProcessError {
            status_code: Some(status.as_u16()),
            message,
            is_retryable: is_retryable_status(status),
            retry_after,
        }
    }
}

pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

pub(crate) fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // Retry-After HTTP-date parsing is omitted; seconds form only
    value.parse::<u64>().ok().map(Duration::from_secs)
}
