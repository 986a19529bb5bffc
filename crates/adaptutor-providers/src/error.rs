//! Provider error types.

use thiserror::Error;

/// Errors that can occur when interacting with a content-generation backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (missing or invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The backend answered but produced no text.
    #[error("empty response from {0}")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Errors that retrying the same request cannot fix.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    pub(crate) fn from_send(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else {
            ProviderError::NetworkError(e.to_string())
        }
    }

    pub(crate) fn parse_failure(e: impl std::fmt::Display) -> Self {
        ProviderError::ApiError {
            status: 0,
            message: format!("failed to parse response: {e}"),
        }
    }
}

/// Map an HTTP error status to a [`ProviderError`], passing successful
/// responses through untouched.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            * 1000;
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        401 | 403 => ProviderError::AuthenticationFailed(body),
        404 => ProviderError::ModelNotFound(format!("{model}: {body}")),
        _ => ProviderError::ApiError {
            status,
            message: body,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("x".into()).is_permanent());
        assert!(!ProviderError::RateLimited { retry_after_ms: 10 }.is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
        assert!(!ProviderError::EmptyResponse("gemini".into()).is_permanent());
    }

    #[test]
    fn messages() {
        assert_eq!(
            ProviderError::RateLimited {
                retry_after_ms: 5000
            }
            .to_string(),
            "rate limited, retry after 5000ms"
        );
        assert_eq!(
            ProviderError::ApiError {
                status: 500,
                message: "boom".into()
            }
            .to_string(),
            "API error (HTTP 500): boom"
        );
    }
}
