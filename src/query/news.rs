//! Typed news queries and mutations on top of [`QueryCache`].
//!
//! Reads go through the cache under `"news"` / `"news:<id>"`. Mutations go
//! straight to the store and, once the store confirms them, invalidate the
//! keys they made stale.

use super::{QueryCache, QueryData, QueryKey, QueryObserver, QueryState};
use crate::error::{NewsError, Result};
use crate::news::model::{CreatedNews, NewsDraft, NewsItem};
pub use crate::news::model::parse_news_id;
use crate::news::store::{submit_draft, NewsStore};
use log::{error, info};
use std::sync::Arc;

#[derive(Clone)]
pub struct NewsQueries {
    store: Arc<dyn NewsStore>,
    cache: QueryCache,
}

impl NewsQueries {
    pub fn new(store: Arc<dyn NewsStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn store(&self) -> Arc<dyn NewsStore> {
        Arc::clone(&self.store)
    }

    /// The `"news"` query.
    pub async fn list(&self) -> QueryState<Arc<Vec<NewsItem>>> {
        let store = &self.store;
        let state = self
            .cache
            .fetch(QueryKey::NewsList, || async move {
                store
                    .fetch_all()
                    .await
                    .map(|items| QueryData::NewsList(Arc::new(items)))
            })
            .await;
        narrow(state, QueryKey::NewsList, QueryData::into_list)
    }

    /// The `"news:<id>"` query. Disabled for id `0`, which names no article.
    pub async fn item(&self, id: i64) -> QueryState<Arc<NewsItem>> {
        if id == 0 {
            return QueryState::Disabled;
        }
        let store = &self.store;
        let state = self
            .cache
            .fetch(QueryKey::NewsItem(id), || async move {
                store
                    .fetch_one(id)
                    .await
                    .map(|item| QueryData::NewsItem(Arc::new(item)))
            })
            .await;
        narrow(state, QueryKey::NewsItem(id), QueryData::into_item)
    }

    /// The detail query for a raw route segment; disabled when it is not a valid id.
    pub async fn item_by_segment(&self, raw: &str) -> QueryState<Arc<NewsItem>> {
        match parse_news_id(raw) {
            Some(id) => self.item(id).await,
            None => QueryState::Disabled,
        }
    }

    pub fn observe_list(&self) -> QueryObserver {
        self.cache.observe(QueryKey::NewsList)
    }

    pub fn observe_item(&self, id: i64) -> QueryObserver {
        self.cache.observe(QueryKey::NewsItem(id))
    }

    /// Validates and submits `draft`, filling in missing timestamps.
    /// On success the `"news"` key is invalidated.
    pub async fn create(&self, draft: NewsDraft) -> Result<CreatedNews> {
        draft.validate()?;
        match submit_draft(self.store.as_ref(), draft).await {
            Ok(created) => {
                self.cache.invalidate_news_list();
                Ok(created)
            }
            Err(e) => {
                error!("Error creating news: {}", e);
                Err(e)
            }
        }
    }

    /// Deletes article `id`. On success both `"news"` and `"news:<id>"` are invalidated.
    pub async fn delete(&self, id: i64) -> Result<()> {
        match self.store.delete(id).await {
            Ok(()) => {
                info!("Deleted news {}", id);
                self.cache.invalidate_news_list();
                self.cache.invalidate_news_item(id);
                Ok(())
            }
            Err(e) => {
                error!("Error deleting news with id {}: {}", id, e);
                Err(e)
            }
        }
    }
}

/// Turns the untyped cache state into the shape the key is expected to hold.
fn narrow<T>(
    state: QueryState<QueryData>,
    key: QueryKey,
    extract: fn(QueryData) -> Option<T>,
) -> QueryState<T> {
    match state {
        QueryState::Disabled => QueryState::Disabled,
        QueryState::Idle => QueryState::Idle,
        QueryState::Loading => QueryState::Loading,
        QueryState::Error(err) => QueryState::Error(err),
        QueryState::Data(data) => match extract(data) {
            Some(value) => QueryState::Data(value),
            None => QueryState::Error(NewsError::Decode(format!(
                "{} holds a value of the wrong shape",
                key
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetryPolicy;
    use crate::testing::{sample_item, MockNewsStore};
    use std::time::Duration;

    fn queries(store: Arc<MockNewsStore>) -> NewsQueries {
        let cache = QueryCache::new(16, RetryPolicy::new(1, Duration::ZERO, Duration::ZERO));
        NewsQueries::new(store, cache)
    }

    #[tokio::test]
    async fn test_invalid_segment_issues_no_request() {
        let store = Arc::new(MockNewsStore::new());
        let queries = queries(store.clone());

        for raw in ["abc", "0", "", "NaN"] {
            assert_eq!(queries.item_by_segment(raw).await, QueryState::Disabled);
        }
        assert_eq!(store.counts().total(), 0);
    }

    #[tokio::test]
    async fn test_item_zero_is_disabled() {
        let store = Arc::new(MockNewsStore::new());
        let queries = queries(store.clone());

        assert_eq!(queries.item(0).await, QueryState::Disabled);
        assert_eq!(store.counts().total(), 0);
        assert_eq!(queries.cache().tracked_keys(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_list_queries_hit_store_once() {
        let store = Arc::new(MockNewsStore::with_items(vec![
            sample_item(1, "First story", "Tech"),
            sample_item(2, "Second story", "World"),
        ]));
        store.set_latency(Duration::from_millis(40));
        let queries = queries(store.clone());

        let (a, b) = tokio::join!(queries.list(), queries.list());

        assert_eq!(store.counts().fetch_all, 1);
        assert_eq!(a, b);
        assert_eq!(a.data().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_invalidates_list_and_item() {
        let store = Arc::new(MockNewsStore::with_items(vec![
            sample_item(1, "First story", "Tech"),
            sample_item(2, "Second story", "World"),
        ]));
        let queries = queries(store.clone());

        assert!(queries.item(1).await.data().is_some());
        assert_eq!(queries.list().await.data().unwrap().len(), 2);

        queries.delete(1).await.unwrap();

        let list = queries.list().await;
        let ids: Vec<_> = list.data().unwrap().iter().map(|n| n.news_id).collect();
        assert_eq!(ids, vec![Some(2)]);
        assert!(queries.item(1).await.error().unwrap().is_not_found());
        assert_eq!(store.counts().fetch_all, 2);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_cache() {
        let store = Arc::new(MockNewsStore::with_items(vec![sample_item(1, "First story", "Tech")]));
        let queries = queries(store.clone());
        queries.list().await;

        assert!(queries.delete(99).await.unwrap_err().is_not_found());
        assert!(queries.cache().state(&QueryKey::NewsList).data().is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_without_request() {
        let store = Arc::new(MockNewsStore::new());
        let queries = queries(store.clone());

        let err = queries
            .create(NewsDraft::new("Hi", "short", "A", "T"))
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Validation(_)));
        assert_eq!(store.counts().create, 0);
    }

    #[tokio::test]
    async fn test_create_invalidates_list() {
        let store = Arc::new(MockNewsStore::new());
        let queries = queries(store.clone());
        assert!(queries.list().await.data().unwrap().is_empty());

        let created = queries
            .create(NewsDraft::new("Five letters", "x".repeat(25), "Al", "Tech"))
            .await
            .unwrap();

        let list = queries.list().await;
        let items = list.data().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].news_id, Some(created.id));
    }
}
