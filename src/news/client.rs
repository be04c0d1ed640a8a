//! Compatibility surface over a [`NewsStore`].
//!
//! Each operation absorbs every failure at its own boundary, logs it, and
//! returns an empty / absent / `false` result instead. Code that needs to
//! tell the failure kinds apart should go through [`NewsClient::store`].

use crate::error::NewsError;
use crate::news::model::{parse_news_id, CreatedNews, NewsDraft, NewsItem};
use crate::news::store::{submit_draft, NewsStore};
use log::{debug, error, info};
use std::sync::Arc;

#[derive(Clone)]
pub struct NewsClient {
    store: Arc<dyn NewsStore>,
}

impl NewsClient {
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self { store }
    }

    /// The typed store behind this client.
    pub fn store(&self) -> Arc<dyn NewsStore> {
        Arc::clone(&self.store)
    }

    /// All articles, or an empty list if the fetch failed for any reason.
    pub async fn list_all(&self) -> Vec<NewsItem> {
        match self.store.fetch_all().await {
            Ok(items) => items,
            Err(e) => {
                error!("Error fetching news ({:?}): {}", e.categorize(), e);
                Vec::new()
            }
        }
    }

    /// One article, or `None` when it is missing or the fetch failed.
    /// Id `0` never names an article and is answered without a request.
    pub async fn get_by_id(&self, id: i64) -> Option<NewsItem> {
        if id == 0 {
            debug!("{}", NewsError::InvalidId(id.to_string()));
            return None;
        }
        match self.store.fetch_one(id).await {
            Ok(item) => Some(item),
            Err(e) => {
                error!("Error fetching news with id {} ({:?}): {}", id, e.categorize(), e);
                None
            }
        }
    }

    /// Like [`get_by_id`](Self::get_by_id) for a raw route segment. A segment
    /// that is not a valid id is answered with `None` without a request.
    pub async fn get_by_segment(&self, raw: &str) -> Option<NewsItem> {
        match parse_news_id(raw) {
            Some(id) => self.get_by_id(id).await,
            None => {
                debug!("{}", NewsError::InvalidId(raw.to_string()));
                None
            }
        }
    }

    /// Submits `draft`, filling in `published_at` / `updated_at` with the
    /// current time when they are missing.
    pub async fn create(&self, draft: NewsDraft) -> Option<CreatedNews> {
        match submit_draft(self.store.as_ref(), draft).await {
            Ok(created) => Some(created),
            Err(e) => {
                error!("Error creating news ({:?}): {}", e.categorize(), e);
                None
            }
        }
    }

    /// `true` only when the store confirmed the delete.
    pub async fn delete_by_id(&self, id: i64) -> bool {
        match self.store.delete(id).await {
            Ok(()) => {
                info!("Deleted news {}", id);
                true
            }
            Err(e) => {
                error!("Error deleting news with id {} ({:?}): {}", id, e.categorize(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockNewsStore;
    use chrono::{DateTime, Utc};

    fn draft() -> NewsDraft {
        NewsDraft::new("Five letters", "x".repeat(25), "Al", "Tech")
    }

    #[tokio::test]
    async fn test_list_all_swallows_transport_failure() {
        let store = Arc::new(MockNewsStore::new());
        store.set_offline(true);
        let client = NewsClient::new(store.clone());

        assert!(client.list_all().await.is_empty());
        assert_eq!(store.counts().fetch_all, 1);
    }

    #[tokio::test]
    async fn test_get_by_id_absent_when_missing() {
        let store = Arc::new(MockNewsStore::new());
        let client = NewsClient::new(store);
        assert_eq!(client.get_by_id(404).await, None);
    }

    #[tokio::test]
    async fn test_get_by_id_zero_issues_no_request() {
        let store = Arc::new(MockNewsStore::new());
        let client = NewsClient::new(store.clone());

        assert_eq!(client.get_by_id(0).await, None);
        assert_eq!(store.counts().fetch_one, 0);
    }

    #[tokio::test]
    async fn test_get_by_segment_skips_invalid_ids() {
        let store = Arc::new(MockNewsStore::new());
        let client = NewsClient::new(store.clone());

        for raw in ["abc", "0", ""] {
            assert_eq!(client.get_by_segment(raw).await, None);
        }
        assert_eq!(store.counts().total(), 0);

        assert_eq!(client.get_by_segment("5").await, None);
        assert_eq!(store.counts().fetch_one, 1);
    }

    #[tokio::test]
    async fn test_create_stamps_missing_timestamps() {
        let store = Arc::new(MockNewsStore::new());
        let client = NewsClient::new(store.clone());

        let before = Utc::now();
        let created = client.create(draft()).await.expect("create succeeds");
        let after = Utc::now();

        let submitted = store.last_submitted().expect("draft recorded");
        for stamp in [&submitted.published_at, &submitted.updated_at] {
            let at = DateTime::parse_from_rfc3339(stamp.as_deref().unwrap())
                .unwrap()
                .with_timezone(&Utc);
            // Millisecond precision on the wire.
            assert!(at >= before - chrono::Duration::milliseconds(1));
            assert!(at <= after);
        }
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_create_absent_when_offline() {
        let store = Arc::new(MockNewsStore::new());
        store.set_offline(true);
        let client = NewsClient::new(store);
        assert!(client.create(draft()).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_twice_reports_false_second_time() {
        let store = Arc::new(MockNewsStore::new());
        let client = NewsClient::new(store.clone());
        let created = client.create(draft()).await.unwrap();

        assert!(client.delete_by_id(created.id).await);
        assert!(!client.delete_by_id(created.id).await);
        assert_eq!(store.counts().delete, 2);
    }
}
