//! Article list (`/`).

use crate::news::model::NewsItem;
use crate::query::{NewsQueries, QueryObserver, QueryState};
use crate::views::notify::Notifier;
use crate::views::route::Route;
use itertools::Itertools;
use std::fmt;

pub const LOAD_FAILED: &str = "Failed to load news. Please try again later.";

/// Distinct categories of `items`, in the order they first appear.
pub fn categories(items: &[NewsItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.category.clone())
        .unique()
        .collect()
}

/// A list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsCard {
    pub news_id: Option<i64>,
    pub title: String,
    pub category: String,
    pub author_name: String,
    pub preview: String,
    pub published_at: String,
}

impl NewsCard {
    /// Where "Read More" leads; `None` for an item the store never numbered.
    pub fn link(&self) -> Option<Route> {
        self.news_id.map(Route::detail)
    }
}

impl From<&NewsItem> for NewsCard {
    fn from(item: &NewsItem) -> Self {
        Self {
            news_id: item.news_id,
            title: item.title.clone(),
            category: item.category.clone(),
            author_name: item.author_name.clone(),
            preview: item.preview(),
            published_at: item.published_at.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScreen {
    Loading,
    Articles {
        categories: Vec<String>,
        active_category: Option<String>,
        cards: Vec<NewsCard>,
    },
}

impl ListScreen {
    pub fn cards(&self) -> &[NewsCard] {
        match self {
            ListScreen::Loading => &[],
            ListScreen::Articles { cards, .. } => cards,
        }
    }
}

/// Category filter state of the list, independent of where the items come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    active: Option<String>,
}

impl CategoryFilter {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Selects `category`, or clears the filter when it is already the active one.
    pub fn toggle(&mut self, category: &str) {
        if self.active.as_deref() == Some(category) {
            self.active = None;
        } else {
            self.active = Some(category.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn apply<'a>(&self, items: &'a [NewsItem]) -> Vec<&'a NewsItem> {
        match &self.active {
            Some(active) => items.iter().filter(|i| &i.category == active).collect(),
            None => items.iter().collect(),
        }
    }
}

/// The mounted list view. Holds the `"news"` key alive while it exists.
pub struct ListView {
    queries: NewsQueries,
    filter: CategoryFilter,
    _observer: QueryObserver,
}

impl ListView {
    pub fn mount(queries: &NewsQueries) -> Self {
        Self {
            queries: queries.clone(),
            filter: CategoryFilter::default(),
            _observer: queries.observe_list(),
        }
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.filter.toggle(category);
    }

    /// "Show All".
    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    /// Fetches the list and builds the screen. A failed fetch raises a toast
    /// and shows the same empty list as "no articles yet".
    pub async fn render(&self, notifier: &Notifier) -> ListScreen {
        match self.queries.list().await {
            QueryState::Loading | QueryState::Idle => ListScreen::Loading,
            QueryState::Data(items) => self.articles(&items),
            QueryState::Error(_) | QueryState::Disabled => {
                notifier.error(LOAD_FAILED);
                self.articles(&[])
            }
        }
    }

    fn articles(&self, items: &[NewsItem]) -> ListScreen {
        ListScreen::Articles {
            categories: categories(items),
            active_category: self.filter.active().map(str::to_string),
            cards: self.filter.apply(items).into_iter().map(NewsCard::from).collect(),
        }
    }
}

impl fmt::Display for ListScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListScreen::Loading => writeln!(f, "Loading..."),
            ListScreen::Articles {
                categories,
                active_category,
                cards,
            } => {
                writeln!(f, "Latest News")?;
                if !categories.is_empty() {
                    let labels = categories
                        .iter()
                        .map(|c| {
                            if Some(c) == active_category.as_ref() {
                                format!("[{}]", c)
                            } else {
                                c.clone()
                            }
                        })
                        .join(" | ");
                    writeln!(f, "Categories: {}", labels)?;
                }
                if cards.is_empty() {
                    return writeln!(f, "No news articles found.");
                }
                for card in cards {
                    writeln!(f)?;
                    let id = card.news_id.map_or_else(|| "-".to_string(), |id| id.to_string());
                    writeln!(f, "#{} [{}] {}", id, card.category, card.title)?;
                    writeln!(f, "  {}", card.preview)?;
                    writeln!(f, "  by {} on {}", card.author_name, card.published_at)?;
                    if let Some(link) = card.link() {
                        writeln!(f, "  Read More: {}", link)?;
                    }
                }
                Ok(())
            }
        }
    }
}
