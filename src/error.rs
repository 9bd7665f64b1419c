#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("config error: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("auth error: {0}")]
    Auth(String),
    #[error("request timeout: {0}")]
    Timeout(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl TriageError {
    /// Configuration problems are caller mistakes; everything else may be a
    /// transient service fault and is eligible for another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl From<reqwest::Error> for TriageError {
    fn from(value: reqwest::Error) -> Self {
        // The request URL carries the `key` query parameter; strip it before
        // the error text can reach logs.
        let value = value.without_url();
        if value.is_timeout() {
            return Self::Timeout(value.to_string());
        }
        Self::Request(value.to_string())
    }
}

impl From<std::io::Error> for TriageError {
    fn from(value: std::io::Error) -> Self {
        Self::Request(value.to_string())
    }
}
