//! In-memory news store for tests
//!
//! Behaves like the remote service (ids assigned from 1, 404 for unknown ids)
//! and records how many requests each operation received so tests can assert
//! on deduplication and on requests that must never be made.

use crate::error::{NewsError, Result};
use crate::news::model::{CreatedNews, NewsDraft, NewsItem};
use crate::news::store::NewsStore;
use crate::utils::now_iso8601;
use async_trait::async_trait;
use log::debug;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Requests received per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCounts {
    pub fetch_all: usize,
    pub fetch_one: usize,
    pub create: usize,
    pub delete: usize,
}

impl RequestCounts {
    pub fn total(&self) -> usize {
        self.fetch_all + self.fetch_one + self.create + self.delete
    }
}

#[derive(Default)]
struct Counters {
    fetch_all: AtomicUsize,
    fetch_one: AtomicUsize,
    create: AtomicUsize,
    delete: AtomicUsize,
}

#[derive(Default)]
struct Inner {
    items: BTreeMap<i64, NewsItem>,
    next_id: i64,
    last_submitted: Option<NewsDraft>,
}

#[derive(Default)]
pub struct MockNewsStore {
    inner: Mutex<Inner>,
    counters: Counters,
    offline: AtomicBool,
    latency_ms: AtomicU64,
}

impl MockNewsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `items`; ids are kept when present, assigned otherwise.
    pub fn with_items(items: impl IntoIterator<Item = NewsItem>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for mut item in items {
                let id = match item.news_id {
                    Some(id) => id,
                    None => inner.next_id + 1,
                };
                inner.next_id = inner.next_id.max(id);
                item.news_id = Some(id);
                inner.items.insert(id, item);
            }
        }
        store
    }

    /// While offline every request fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay applied to every request before it is answered.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn counts(&self) -> RequestCounts {
        RequestCounts {
            fetch_all: self.counters.fetch_all.load(Ordering::SeqCst),
            fetch_one: self.counters.fetch_one.load(Ordering::SeqCst),
            create: self.counters.create.load(Ordering::SeqCst),
            delete: self.counters.delete.load(Ordering::SeqCst),
        }
    }

    /// The payload of the most recent create request, exactly as received.
    pub fn last_submitted(&self) -> Option<NewsDraft> {
        self.lock().last_submitted.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panicking test must not poison the store for the assertions that follow.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn answer(&self, counter: &AtomicUsize, what: &str) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            debug!("Mock store offline, failing {}", what);
            return Err(NewsError::Transport(format!(
                "{}: connection refused (mock store offline)",
                what
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl NewsStore for MockNewsStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_all(&self) -> Result<Vec<NewsItem>> {
        self.answer(&self.counters.fetch_all, "GET /news").await?;
        Ok(self.lock().items.values().cloned().collect())
    }

    async fn fetch_one(&self, id: i64) -> Result<NewsItem> {
        self.answer(&self.counters.fetch_one, "GET /news/{id}").await?;
        self.lock()
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| NewsError::NotFound(format!("news {} does not exist", id)))
    }

    async fn create(&self, draft: &NewsDraft) -> Result<CreatedNews> {
        self.answer(&self.counters.create, "POST /news").await?;
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.last_submitted = Some(draft.clone());
        inner
            .items
            .insert(id, draft.clone().into_item(id, &now_iso8601()));
        Ok(CreatedNews {
            id,
            message: "News created successfully".to_string(),
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.answer(&self.counters.delete, "DELETE /news/{id}").await?;
        match self.lock().items.remove(&id) {
            Some(_) => Ok(()),
            None => Err(NewsError::NotFound(format!("news {} does not exist", id))),
        }
    }
}
