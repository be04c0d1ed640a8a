//! Wiring of store, query cache, client and notifications into one front end.

use crate::config::Config;
use crate::error::Result;
use crate::news::{HttpNewsStore, NewsClient, NewsStore};
use crate::query::{NewsQueries, QueryCache};
use crate::views::{Notifier, Page, Route, Screen};
use log::{debug, info};
use std::sync::Arc;

pub struct NewsApp {
    config: Arc<Config>,
    queries: NewsQueries,
    client: NewsClient,
    notifier: Notifier,
}

impl NewsApp {
    /// Front end talking HTTP to `config.api_url`.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let store = HttpNewsStore::new(&config)?;
        info!("News store: {} at {}", store.name(), store.base_url());
        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: Arc<Config>, store: Arc<dyn NewsStore>) -> Self {
        let cache = QueryCache::from_config(&config);
        Self {
            queries: NewsQueries::new(Arc::clone(&store), cache),
            client: NewsClient::new(store),
            notifier: Notifier::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn queries(&self) -> &NewsQueries {
        &self.queries
    }

    /// The error-swallowing compatibility client over the same store. Views
    /// and the CLI go through [`queries`](Self::queries) instead; this is for
    /// callers that want the plain list / get / create / delete surface.
    pub fn client(&self) -> &NewsClient {
        &self.client
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Mounts the view for `path`. It stays mounted until the page is dropped.
    pub fn navigate(&self, path: &str) -> Page {
        let route = Route::parse(path);
        debug!("Navigating to {} ({:?})", path, route);
        Page::mount(&self.queries, &route)
    }

    /// Mounts, renders and unmounts the view for `path`.
    pub async fn open(&self, path: &str) -> Screen {
        self.navigate(path).render(&self.notifier).await
    }
}
