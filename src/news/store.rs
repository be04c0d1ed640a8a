use crate::error::Result;
use crate::news::model::{CreatedNews, NewsDraft, NewsItem};
use crate::utils::now_iso8601;
use async_trait::async_trait;
use log::info;

/// The remote service of record for news articles.
///
/// Every call maps to exactly one request against the store: no retries and
/// no caching happen at this level. Failures come back as a typed
/// [`NewsError`](crate::error::NewsError) so callers can tell a missing
/// article from an unreachable store.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// `GET /news`
    async fn fetch_all(&self) -> Result<Vec<NewsItem>>;

    /// `GET /news/{id}`
    async fn fetch_one(&self, id: i64) -> Result<NewsItem>;

    /// `POST /news`. The draft is sent as given; timestamp defaults are the
    /// caller's job.
    async fn create(&self, draft: &NewsDraft) -> Result<CreatedNews>;

    /// `DELETE /news/{id}`
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Fills missing `published_at` / `updated_at` with the current time and
/// submits `draft` to `store`.
pub async fn submit_draft(store: &dyn NewsStore, draft: NewsDraft) -> Result<CreatedNews> {
    let draft = draft.stamped(&now_iso8601());
    let created = store.create(&draft).await?;
    info!(
        "Created news {} via {} store ({})",
        created.id,
        store.name(),
        created.message
    );
    Ok(created)
}
