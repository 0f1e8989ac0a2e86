use thiserror::Error;

/// The single error kind every adapter entry point returns.
///
/// Each variant carries the human-readable cause. Transport and parse
/// errors raised deep inside a pipeline are folded into one of these at the
/// adapter boundary, so callers never see a raw `reqwest` or `serde` error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// The resource id could not be derived from the given input.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An outbound HTTP call failed: non-success status, transport error,
    /// timeout, or an unreadable body.
    #[error("fetch failed: {0}")]
    FetchFailure(String),

    /// The intermediary page did not carry an anti-forgery token.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The remote service explicitly reported the resource as unavailable.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// The external media-extraction tool could not be run or failed.
    #[error("external tool failed: {0}")]
    ExternalTool(String),
}

impl AcquireError {
    /// Wrap an internal `anyhow` chain as a fetch failure, keeping every cause.
    pub fn fetch(err: impl std::fmt::Display) -> Self {
        Self::FetchFailure(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_cause() {
        let err = AcquireError::MissingCredential("no csrf meta tag".into());
        assert_eq!(err.to_string(), "missing credential: no csrf meta tag");
    }

    #[test]
    fn test_fetch_wraps_as_fetch_failure() {
        assert_eq!(
            AcquireError::fetch("HTTP 503 Service Unavailable for https://example.com"),
            AcquireError::FetchFailure("HTTP 503 Service Unavailable for https://example.com".into())
        );
    }
}
