//! Keyed query state shared by every view.
//!
//! A query is identified by a [`QueryKey`]. Concurrent fetches of the same key
//! share one load; the last successful result is served until the key is
//! invalidated or its last observer goes away.

pub mod cache;
pub mod news;

pub use cache::{CacheStats, QueryCache, QueryObserver};
pub use news::{parse_news_id, NewsQueries};

use crate::error::NewsError;
use crate::news::model::NewsItem;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full article list, `"news"`
    NewsList,
    /// One article, `"news:<id>"`
    NewsItem(i64),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::NewsList => write!(f, "news"),
            QueryKey::NewsItem(id) => write!(f, "news:{}", id),
        }
    }
}

/// Value held for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    NewsList(Arc<Vec<NewsItem>>),
    NewsItem(Arc<NewsItem>),
}

impl QueryData {
    pub fn into_list(self) -> Option<Arc<Vec<NewsItem>>> {
        match self {
            QueryData::NewsList(items) => Some(items),
            QueryData::NewsItem(_) => None,
        }
    }

    pub fn into_item(self) -> Option<Arc<NewsItem>> {
        match self {
            QueryData::NewsItem(item) => Some(item),
            QueryData::NewsList(_) => None,
        }
    }
}

/// What a consumer of a key can observe.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// The query is switched off and will not issue a request
    Disabled,
    /// Nothing has been fetched yet, or the key was invalidated
    Idle,
    Loading,
    Error(NewsError),
    Data(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&NewsError> {
        match self {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            QueryState::Disabled => QueryState::Disabled,
            QueryState::Idle => QueryState::Idle,
            QueryState::Loading => QueryState::Loading,
            QueryState::Error(err) => QueryState::Error(err),
            QueryState::Data(data) => QueryState::Data(f(data)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(QueryKey::NewsList.to_string(), "news");
        assert_eq!(QueryKey::NewsItem(12).to_string(), "news:12");
    }

    #[test]
    fn test_state_map_keeps_non_data_variants() {
        let loading: QueryState<u8> = QueryState::Loading;
        assert!(loading.map(|v| v + 1).is_loading());

        let data = QueryState::Data(1u8).map(|v| v + 1);
        assert_eq!(data.data(), Some(&2));

        let err: QueryState<u8> = QueryState::Error(NewsError::NotFound("x".into()));
        assert!(err.map(|v| v).error().unwrap().is_not_found());
    }
}
