pub mod client;
pub mod http;
pub mod model;
pub mod store;

pub use client::NewsClient;
pub use http::HttpNewsStore;
pub use model::{CreatedNews, NewsDraft, NewsItem};
pub use store::NewsStore;
