use crate::error::NewsError;
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8414";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_ms: u64,
    pub query_retry: u32,
    pub query_retry_delay_ms: u64,
    pub query_cache_capacity: u64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            api_url: env::var("NEWS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            request_timeout_ms: env::var("NEWS_API_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10_000),
            query_retry: env::var("QUERY_RETRY")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            query_retry_delay_ms: env::var("QUERY_RETRY_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            query_cache_capacity: env::var("QUERY_CACHE_CAPACITY")
                .unwrap_or_else(|_| "256".to_string())
                .parse()
                .unwrap_or(256),
            log_level: Self::log_level_from_env(),
        }
    }

    /// `LOG_LEVEL`, readable before the rest of the configuration is loaded
    /// so logging can be up while it is validated.
    pub fn log_level_from_env() -> String {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
    }

    /// Config pointing at `api_url` with no retry delay, for tests.
    pub fn test_default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_ms: 2000,
            query_retry: 1,
            query_retry_delay_ms: 0,
            query_cache_capacity: 64,
            log_level: "debug".to_string(),
        }
    }

    /// Normalizes and checks the loaded values.
    pub fn validate(mut self) -> Result<Self, NewsError> {
        let trimmed = self.api_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(NewsError::Config("NEWS_API_URL cannot be empty".to_string()));
        }
        let parsed = Url::parse(&trimmed)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(NewsError::Config(format!(
                "NEWS_API_URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.cannot_be_a_base() {
            return Err(NewsError::Config(format!(
                "NEWS_API_URL is not a base address: {}",
                trimmed
            )));
        }
        self.api_url = trimmed;

        if self.query_retry > 1 {
            log::warn!(
                "QUERY_RETRY={} exceeds the retry budget, clamping to 1",
                self.query_retry
            );
            self.query_retry = 1;
        }
        if self.query_cache_capacity == 0 {
            return Err(NewsError::Config(
                "QUERY_CACHE_CAPACITY must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.query_retry_delay_ms)
    }

    pub fn log_settings(&self) {
        log::info!("Application Configuration Loaded: {:?}", self);
    }
}
