use log::debug;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A single rejected field of a news draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewsError {
    /// Network/connectivity issues (refused, DNS, timeout)
    #[error("Transport Error: {0}")]
    Transport(String),

    /// Non-success status from the news store
    #[error("Server Error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The news store does not know the requested article
    #[error("Not Found: {0}")]
    NotFound(String),

    /// Response body could not be decoded
    #[error("Decode Error: {0}")]
    Decode(String),

    /// Identifier is not a valid non-zero integer
    #[error("Invalid Id: {0}")]
    InvalidId(String),

    /// Draft rejected by the creation form rules
    #[error("Validation Error: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    /// Configuration errors
    #[error("Config Error: {0}")]
    Config(String),
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for NewsError {
    fn from(err: serde_json::Error) -> Self {
        NewsError::Decode(format!("JSON serialization/deserialization error: {}", err))
    }
}

impl From<reqwest::Error> for NewsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return NewsError::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::NOT_FOUND {
                return NewsError::NotFound(err.to_string());
            }
            return NewsError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        NewsError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for NewsError {
    fn from(err: url::ParseError) -> Self {
        NewsError::Config(format!("Invalid URL: {}", err))
    }
}

impl NewsError {
    /// Determines if a failed load is worth one more attempt
    pub fn should_retry(&self) -> bool {
        match self {
            NewsError::Transport(_) => true,
            NewsError::Server { status, .. } => *status >= 500,
            NewsError::NotFound(_) => false,
            NewsError::Decode(_) => false,
            NewsError::InvalidId(_) => false,
            NewsError::Validation(_) => false,
            NewsError::Config(_) => false,
        }
    }

    /// Categorizes error for logging
    pub fn categorize(&self) -> ErrorCategory {
        match self {
            NewsError::Transport(_) => ErrorCategory::Network,
            NewsError::Server { .. } => ErrorCategory::Server,
            NewsError::NotFound(_) => ErrorCategory::NotFound,
            NewsError::Decode(_) => ErrorCategory::Data,
            NewsError::InvalidId(_) | NewsError::Validation(_) => ErrorCategory::Input,
            NewsError::Config(_) => ErrorCategory::Configuration,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NewsError::NotFound(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    NotFound,
    Data,
    Input,
    Configuration,
}

/// Retry policy with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Calculate delay for a given attempt (exponential backoff)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2_u128.saturating_pow(attempt - 1);
        let delay_ms = self.base_delay.as_millis().saturating_mul(factor);
        let delay = Duration::from_millis(delay_ms.min(self.max_delay.as_millis()) as u64);

        debug!("Retry attempt {}: delay = {:?}", attempt, delay);
        delay
    }

    /// Whether another attempt is allowed after `attempt` failed ones.
    pub fn allows(&self, attempt: u32, err: &NewsError) -> bool {
        attempt <= self.max_retries && err.should_retry()
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
