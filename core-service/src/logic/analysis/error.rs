use thiserror::Error;

/// Analysis service client errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Service did not answer: connection refused, DNS failure, timeout
    #[error("analysis service unreachable: {0}")]
    Unreachable(String),

    /// Service answered but the payload was unusable
    #[error("analysis service sent a bad response: {0}")]
    BadResponse(String),
}

impl AnalysisError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::Unreachable(format!("request timed out ({})", err))
        } else if err.is_decode() {
            AnalysisError::BadResponse(err.to_string())
        } else {
            AnalysisError::Unreachable(err.to_string())
        }
    }
}
