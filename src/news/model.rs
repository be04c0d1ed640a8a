//! News article data structures
//!
//! `NewsItem` is what the news store hands back, `NewsDraft` is what the
//! creation form submits, and `CreatedNews` is the store's answer to a create.

use crate::error::{FieldError, NewsError};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Number of body characters shown on a list card before truncation.
pub const PREVIEW_CHARS: usize = 150;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 100;
pub const BODY_MIN_CHARS: usize = 20;
pub const AUTHOR_MIN_CHARS: usize = 2;
pub const CATEGORY_MIN_CHARS: usize = 2;

/// Parses a route segment into an article id the way a browser's `parseInt`
/// reads it: leading whitespace, an optional sign, then as many digits as
/// follow (`"12abc"` is 12, `"1.5"` is 1). No digits, or a value of zero,
/// yields `None`; callers treat that as "no such article" without asking the
/// store.
pub fn parse_news_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    match digits.parse::<i64>() {
        Ok(0) | Err(_) => None,
        Ok(id) if negative => Some(-id),
        Ok(id) => Some(id),
    }
}

/// A persisted news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Assigned by the news store; absent only on payloads not yet persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_id: Option<i64>,

    pub title: String,

    /// Free text; paragraphs are separated by `\n`
    pub body: String,

    pub author_name: String,

    /// Free-form grouping label, not a fixed enumeration
    pub category: String,

    /// ISO 8601 timestamp
    pub published_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl NewsItem {
    /// Body text for a list card: the first 150 characters followed by `...`
    /// when the body is longer.
    pub fn preview(&self) -> String {
        let mut chars = self.body.char_indices();
        match chars.nth(PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}...", &self.body[..cut]),
            None => self.body.clone(),
        }
    }

    /// Body lines in order. Empty lines are kept and act as blank separators.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.body.split('\n').collect()
    }

    /// True when both timestamps parse and `updated_at` differs from `published_at`.
    pub fn was_updated(&self) -> bool {
        let Some(updated) = self.updated_at.as_deref() else {
            return false;
        };
        match (
            DateTime::parse_from_rfc3339(&self.published_at),
            DateTime::parse_from_rfc3339(updated),
        ) {
            (Ok(published), Ok(updated)) => published != updated,
            _ => false,
        }
    }
}

/// A news article that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDraft {
    pub title: String,
    pub body: String,
    pub author_name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl NewsDraft {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        author_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author_name: author_name.into(),
            category: category.into(),
            published_at: None,
            updated_at: None,
        }
    }

    /// Fills missing (or blank) `published_at` / `updated_at` with `now`.
    /// Timestamps already present are kept as they are.
    pub fn stamped(mut self, now: &str) -> Self {
        fn fill(slot: &mut Option<String>, now: &str) {
            if slot.as_deref().map_or(true, |s| s.trim().is_empty()) {
                *slot = Some(now.to_string());
            }
        }
        fill(&mut self.published_at, now);
        fill(&mut self.updated_at, now);
        self
    }

    /// Checks the creation form rules. Every violated field is reported.
    pub fn validate(&self) -> Result<(), NewsError> {
        let mut errors = Vec::new();

        let title_len = self.title.chars().count();
        if title_len < TITLE_MIN_CHARS {
            errors.push(FieldError::new(
                "title",
                format!("Title must be at least {} characters", TITLE_MIN_CHARS),
            ));
        } else if title_len > TITLE_MAX_CHARS {
            errors.push(FieldError::new(
                "title",
                format!("Title must not exceed {} characters", TITLE_MAX_CHARS),
            ));
        }
        if self.body.chars().count() < BODY_MIN_CHARS {
            errors.push(FieldError::new(
                "body",
                format!("Content must be at least {} characters", BODY_MIN_CHARS),
            ));
        }
        if self.author_name.chars().count() < AUTHOR_MIN_CHARS {
            errors.push(FieldError::new(
                "author_name",
                format!("Author name must be at least {} characters", AUTHOR_MIN_CHARS),
            ));
        }
        if self.category.chars().count() < CATEGORY_MIN_CHARS {
            errors.push(FieldError::new(
                "category",
                format!("Category must be at least {} characters", CATEGORY_MIN_CHARS),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(NewsError::Validation(errors))
        }
    }

    /// The item the store is expected to hold once it assigns `news_id`.
    pub fn into_item(self, news_id: i64, now: &str) -> NewsItem {
        let stamped = self.stamped(now);
        NewsItem {
            news_id: Some(news_id),
            title: stamped.title,
            body: stamped.body,
            author_name: stamped.author_name,
            category: stamped.category,
            published_at: stamped.published_at.unwrap_or_else(|| now.to_string()),
            updated_at: stamped.updated_at,
        }
    }
}

/// Response body of a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedNews {
    pub id: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(body: &str) -> NewsItem {
        NewsItem {
            news_id: Some(1),
            title: "Five letters".to_string(),
            body: body.to_string(),
            author_name: "Al".to_string(),
            category: "Tech".to_string(),
            published_at: "2024-05-01T09:30:00.000Z".to_string(),
            updated_at: None,
        }
    }

    #[test]
    fn test_parse_news_id() {
        assert_eq!(parse_news_id("42"), Some(42));
        assert_eq!(parse_news_id(" 7 "), Some(7));
        assert_eq!(parse_news_id("-3"), Some(-3));
        assert_eq!(parse_news_id("0"), None);
        assert_eq!(parse_news_id(""), None);
        assert_eq!(parse_news_id("-0"), None);
        assert_eq!(parse_news_id("abc"), None);
        assert_eq!(parse_news_id("abc12"), None);
        assert_eq!(parse_news_id("+"), None);
        assert_eq!(parse_news_id("12abc"), Some(12));
        assert_eq!(parse_news_id("1.5"), Some(1));
        assert_eq!(parse_news_id("+8"), Some(8));
    }

    #[test]
    fn test_item_deserializes_without_updated_at() {
        let json = r#"{"news_id":7,"title":"Hello world","body":"b","author_name":"Al","category":"Tech","published_at":"2024-05-01T09:30:00.000Z"}"#;
        let parsed: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.news_id, Some(7));
        assert_eq!(parsed.updated_at, None);
    }

    #[test]
    fn test_draft_serializes_without_news_id() {
        let draft = NewsDraft::new("Five letters", "x".repeat(25), "Al", "Tech")
            .stamped("2024-05-01T09:30:00.000Z");
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("news_id").is_none());
        assert_eq!(value["published_at"], "2024-05-01T09:30:00.000Z");
        assert_eq!(value["updated_at"], "2024-05-01T09:30:00.000Z");
    }

    #[test]
    fn test_stamped_keeps_existing_timestamps() {
        let mut draft = NewsDraft::new("Five letters", "x".repeat(25), "Al", "Tech");
        draft.published_at = Some("2020-01-01T00:00:00.000Z".to_string());
        draft.updated_at = Some("   ".to_string());
        let draft = draft.stamped("2024-05-01T09:30:00.000Z");
        assert_eq!(draft.published_at.as_deref(), Some("2020-01-01T00:00:00.000Z"));
        assert_eq!(draft.updated_at.as_deref(), Some("2024-05-01T09:30:00.000Z"));
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "é".repeat(200);
        let preview = item(&long).preview();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);

        let short = "short body";
        assert_eq!(item(short).preview(), short);

        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(item(&exact).preview(), exact);
    }

    #[test]
    fn test_paragraphs_keep_blank_lines() {
        let news = item("first\n\nsecond");
        assert_eq!(news.paragraphs(), vec!["first", "", "second"]);
    }

    #[test]
    fn test_was_updated() {
        let mut news = item("body");
        assert!(!news.was_updated());

        news.updated_at = Some("2024-05-01T09:30:00Z".to_string());
        assert!(!news.was_updated(), "same instant in another format");

        news.updated_at = Some("2024-05-02T10:00:00.000Z".to_string());
        assert!(news.was_updated());

        news.updated_at = Some("yesterday".to_string());
        assert!(!news.was_updated());
    }

    #[test]
    fn test_validate_accepts_minimal_draft() {
        let draft = NewsDraft::new("Five letters", "x".repeat(25), "Al", "Tech");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_every_field() {
        let draft = NewsDraft::new("Hey", "too short", "A", "T");
        let Err(NewsError::Validation(fields)) = draft.validate() else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field).collect();
        assert_eq!(names, vec!["title", "body", "author_name", "category"]);
    }

    #[test]
    fn test_validate_rejects_long_title() {
        let draft = NewsDraft::new("t".repeat(101), "x".repeat(25), "Al", "Tech");
        let Err(NewsError::Validation(fields)) = draft.validate() else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].message, "Title must not exceed 100 characters");
    }
}
