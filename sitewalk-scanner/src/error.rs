use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ScanError {
    /// Transport failures and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScanError::HttpError(_) => true,
            ScanError::Status(code) => *code >= 500,
            ScanError::InvalidUrl(_) | ScanError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
