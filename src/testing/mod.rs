//! Test doubles shared by unit and integration tests.

pub mod mock_store;

pub use mock_store::{MockNewsStore, RequestCounts};

use crate::news::model::NewsItem;

/// A persisted article with fixed timestamps, for seeding stores.
pub fn sample_item(id: i64, title: &str, category: &str) -> NewsItem {
    NewsItem {
        news_id: Some(id),
        title: title.to_string(),
        body: format!("{} body text that is long enough.\nSecond paragraph.", title),
        author_name: "Jane Doe".to_string(),
        category: category.to_string(),
        published_at: "2024-05-01T09:30:00.000Z".to_string(),
        updated_at: Some("2024-05-01T09:30:00.000Z".to_string()),
    }
}
