//! Article detail (`/news/{id}`) and its delete action.

use crate::news::model::NewsItem;
use crate::query::{parse_news_id, NewsQueries, QueryObserver, QueryState};
use crate::views::notify::Notifier;
use crate::views::route::{Navigation, Route};
use std::fmt;

pub const LOAD_FAILED: &str = "Failed to load the news article.";
pub const DELETE_OK: &str = "News article deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete the news article";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    pub news_id: i64,
    pub title: String,
    pub category: String,
    pub author_name: String,
    pub published_at: String,
    /// Present only when the article was edited after publication
    pub updated_at: Option<String>,
    pub paragraphs: Vec<String>,
}

impl ArticleView {
    fn new(news_id: i64, item: &NewsItem) -> Self {
        Self {
            news_id,
            title: item.title.clone(),
            category: item.category.clone(),
            author_name: item.author_name.clone(),
            published_at: item.published_at.clone(),
            updated_at: if item.was_updated() {
                item.updated_at.clone()
            } else {
                None
            },
            paragraphs: item.paragraphs().into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailScreen {
    Loading,
    Article(ArticleView),
    /// Unknown, invalid, or unloadable article; offers a way back home
    NotFound,
}

/// The mounted detail view for one route segment.
pub struct DetailView {
    queries: NewsQueries,
    news_id: Option<i64>,
    _observer: Option<QueryObserver>,
}

impl DetailView {
    /// Mounts the view for a raw `/news/{segment}`. An invalid segment leaves
    /// the query disabled: nothing is fetched and the view renders not-found.
    pub fn mount(queries: &NewsQueries, segment: &str) -> Self {
        let news_id = parse_news_id(segment);
        Self {
            queries: queries.clone(),
            news_id,
            _observer: news_id.map(|id| queries.observe_item(id)),
        }
    }

    pub fn news_id(&self) -> Option<i64> {
        self.news_id
    }

    pub async fn render(&self, notifier: &Notifier) -> DetailScreen {
        let Some(id) = self.news_id else {
            return DetailScreen::NotFound;
        };
        match self.queries.item(id).await {
            QueryState::Loading | QueryState::Idle => DetailScreen::Loading,
            QueryState::Data(item) => DetailScreen::Article(ArticleView::new(id, &item)),
            QueryState::Error(err) => {
                if !err.is_not_found() {
                    notifier.error(LOAD_FAILED);
                }
                DetailScreen::NotFound
            }
            QueryState::Disabled => DetailScreen::NotFound,
        }
    }

    /// Deletes the article shown. Goes home on success, stays put on failure.
    pub async fn delete(&self, notifier: &Notifier) -> Navigation {
        let Some(id) = self.news_id else {
            notifier.error(DELETE_FAILED);
            return Navigation::Stay;
        };
        match self.queries.delete(id).await {
            Ok(()) => {
                notifier.success(DELETE_OK);
                Navigation::To(Route::Home)
            }
            Err(_) => {
                notifier.error(DELETE_FAILED);
                Navigation::Stay
            }
        }
    }
}

impl fmt::Display for DetailScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailScreen::Loading => writeln!(f, "Loading..."),
            DetailScreen::NotFound => {
                writeln!(f, "News article not found")?;
                writeln!(f, "Back to Home: {}", Route::Home)
            }
            DetailScreen::Article(article) => {
                writeln!(f, "[{}] {}", article.category, article.title)?;
                write!(f, "by {} on {}", article.author_name, article.published_at)?;
                if let Some(updated) = &article.updated_at {
                    write!(f, " (updated {})", updated)?;
                }
                writeln!(f)?;
                writeln!(f)?;
                for paragraph in &article.paragraphs {
                    writeln!(f, "{}", paragraph)?;
                }
                Ok(())
            }
        }
    }
}
