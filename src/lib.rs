pub mod app;
pub mod config;
pub mod error;
pub mod news;
pub mod query;
pub mod testing; // Test doubles, also used by tests/
pub mod utils;
pub mod views;

pub use app::NewsApp;
pub use config::Config;
pub use error::{NewsError, Result};
pub use news::{HttpNewsStore, NewsClient, NewsDraft, NewsItem, NewsStore};
pub use query::{NewsQueries, QueryCache, QueryKey, QueryState};
