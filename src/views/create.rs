//! Article creation (`/create`).
//!
//! The form keeps its own state; nothing here reads from the query cache.

use crate::error::{FieldError, NewsError};
use crate::news::model::NewsDraft;
use crate::query::NewsQueries;
use crate::views::notify::Notifier;
use crate::views::route::{Navigation, Route};

pub const CREATE_OK: &str = "News article created successfully!";
pub const CREATE_FAILED: &str = "Failed to create news article";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub title: String,
    pub body: String,
    pub author_name: String,
    pub category: String,
}

impl CreateForm {
    pub fn to_draft(&self) -> NewsDraft {
        NewsDraft::new(
            self.title.clone(),
            self.body.clone(),
            self.author_name.clone(),
            self.category.clone(),
        )
    }
}

pub struct CreateView {
    queries: NewsQueries,
    form: CreateForm,
    field_errors: Vec<FieldError>,
}

impl CreateView {
    pub fn mount(queries: &NewsQueries) -> Self {
        Self {
            queries: queries.clone(),
            form: CreateForm::default(),
            field_errors: Vec::new(),
        }
    }

    pub fn form(&self) -> &CreateForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CreateForm {
        &mut self.form
    }

    /// Messages from the last rejected submission.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Submits the form. Rule violations stay on the form without a request;
    /// a store failure raises a toast and keeps the form filled in for another
    /// try; success raises a toast and goes home.
    pub async fn submit(&mut self, notifier: &Notifier) -> Navigation {
        self.field_errors.clear();
        match self.queries.create(self.form.to_draft()).await {
            Ok(_) => {
                notifier.success(CREATE_OK);
                self.form = CreateForm::default();
                Navigation::To(Route::Home)
            }
            Err(NewsError::Validation(fields)) => {
                self.field_errors = fields;
                Navigation::Stay
            }
            Err(_) => {
                notifier.error(CREATE_FAILED);
                Navigation::Stay
            }
        }
    }
}
