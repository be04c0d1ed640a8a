//! Screens of the news front end, built on the query layer.
//!
//! A view is "mounted" by constructing it and "unmounted" by dropping it.
//! Mounted list and detail views keep their query keys observed.

pub mod create;
pub mod detail;
pub mod list;
pub mod notify;
pub mod route;

pub use create::{CreateForm, CreateView};
pub use detail::{DetailScreen, DetailView};
pub use list::{ListScreen, ListView};
pub use notify::{Level, Notification, Notifier};
pub use route::{Navigation, Route};

use crate::query::NewsQueries;
use std::fmt;

/// A mounted view for one route.
pub enum Page {
    List(ListView),
    Detail(DetailView),
    Create(CreateView),
    NotFound(String),
}

impl Page {
    pub fn mount(queries: &NewsQueries, route: &Route) -> Self {
        match route {
            Route::Home => Page::List(ListView::mount(queries)),
            Route::Detail(segment) => Page::Detail(DetailView::mount(queries, segment)),
            Route::Create => Page::Create(CreateView::mount(queries)),
            Route::NotFound(path) => Page::NotFound(path.clone()),
        }
    }

    pub async fn render(&self, notifier: &Notifier) -> Screen {
        match self {
            Page::List(view) => Screen::List(view.render(notifier).await),
            Page::Detail(view) => Screen::Detail(view.render(notifier).await),
            Page::Create(view) => Screen::Create(view.form().clone()),
            Page::NotFound(path) => Screen::NotFound(path.clone()),
        }
    }
}

/// What a page shows after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List(ListScreen),
    Detail(DetailScreen),
    Create(CreateForm),
    NotFound(String),
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::List(screen) => write!(f, "{}", screen),
            Screen::Detail(screen) => write!(f, "{}", screen),
            Screen::Create(form) => {
                writeln!(f, "Create News Article")?;
                writeln!(f, "Title:    {}", form.title)?;
                writeln!(f, "Content:  {}", form.body)?;
                writeln!(f, "Author:   {}", form.author_name)?;
                writeln!(f, "Category: {}", form.category)
            }
            Screen::NotFound(path) => {
                writeln!(f, "Page not found: {}", path)?;
                writeln!(f, "Back to Home: {}", Route::Home)
            }
        }
    }
}
