//! HTTP implementation of [`NewsStore`]
//!
//! Talks JSON to the news service:
//!
//! | Operation | Method | Path          |
//! |-----------|--------|---------------|
//! | list      | GET    | `/news`       |
//! | get one   | GET    | `/news/{id}`  |
//! | create    | POST   | `/news`       |
//! | delete    | DELETE | `/news/{id}`  |

use crate::config::Config;
use crate::error::{NewsError, Result};
use crate::news::model::{CreatedNews, NewsDraft, NewsItem};
use crate::news::store::NewsStore;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

const NEWS_ENDPOINT: &str = "news";
const USER_AGENT: &str = concat!("newsguru/", env!("CARGO_PKG_VERSION"));

pub struct HttpNewsStore {
    client: Client,
    base_url: String,
}

impl HttpNewsStore {
    /// Builds a store client for `config.api_url` with the configured request timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NewsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, NEWS_ENDPOINT)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, NEWS_ENDPOINT, id)
    }

    /// Turns a non-success status into the matching error, leaving successes untouched.
    async fn check_status(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(NewsError::NotFound(format!("{}: {}", what, text)));
        }
        Err(NewsError::Server {
            status: status.as_u16(),
            message: format!("{}: {}", what, text),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| NewsError::Decode(format!("Failed to parse {} response: {}", what, e)))
    }
}

#[async_trait]
impl NewsStore for HttpNewsStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_all(&self) -> Result<Vec<NewsItem>> {
        let url = self.collection_url();
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response, "GET /news").await?;
        let items: Vec<NewsItem> = Self::read_json(response, "news list").await?;

        debug!("Received {} news items", items.len());
        Ok(items)
    }

    async fn fetch_one(&self, id: i64) -> Result<NewsItem> {
        let url = self.item_url(id);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response, &format!("GET /news/{}", id)).await?;
        Self::read_json(response, "news item").await
    }

    async fn create(&self, draft: &NewsDraft) -> Result<CreatedNews> {
        let url = self.collection_url();
        debug!("POST {} ({:?})", url, draft.title);

        let response = self.client.post(&url).json(draft).send().await?;
        let response = Self::check_status(response, "POST /news").await?;
        Self::read_json(response, "create").await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;
        Self::check_status(response, &format!("DELETE /news/{}", id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_built_from_base() {
        let store = HttpNewsStore::with_client(Client::new(), "http://localhost:8414/");
        assert_eq!(store.base_url(), "http://localhost:8414");
        assert_eq!(store.collection_url(), "http://localhost:8414/news");
        assert_eq!(store.item_url(42), "http://localhost:8414/news/42");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_a_transport_error() {
        let mut config = Config::test_default();
        // Port 9 (discard) is closed on test machines; connection is refused quickly.
        config.api_url = "http://127.0.0.1:9".to_string();
        let store = HttpNewsStore::new(&config).unwrap();

        let err = store.fetch_all().await.unwrap_err();
        assert!(matches!(err, NewsError::Transport(_)), "got {:?}", err);
    }
}
