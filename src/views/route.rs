use std::fmt;

/// Front end locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, the article list
    Home,
    /// `/news/{id}`; the segment is kept raw and validated by the detail view
    Detail(String),
    /// `/create`
    Create,
    /// Anything else, with the path that was asked for
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let normalized = trimmed.trim_end_matches('/');

        if normalized.is_empty() {
            return Route::Home;
        }
        if normalized == "/create" {
            return Route::Create;
        }
        if let Some(segment) = normalized.strip_prefix("/news/") {
            if !segment.is_empty() && !segment.contains('/') {
                return Route::Detail(segment.to_string());
            }
        }
        Route::NotFound(path.to_string())
    }

    pub fn detail(id: i64) -> Route {
        Route::Detail(id.to_string())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Detail(segment) => write!(f, "/news/{}", segment),
            Route::Create => write!(f, "/create"),
            Route::NotFound(path) => write!(f, "{}", path),
        }
    }
}

/// What a view asks the front end to do after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    To(Route),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/create"), Route::Create);
        assert_eq!(Route::parse("/create/"), Route::Create);
        assert_eq!(Route::parse("/news/12"), Route::Detail("12".to_string()));
        assert_eq!(Route::parse("/news/12?ref=home"), Route::Detail("12".to_string()));
    }

    #[test]
    fn test_detail_segment_is_kept_raw() {
        assert_eq!(Route::parse("/news/abc"), Route::Detail("abc".to_string()));
    }

    #[test]
    fn test_unmatched_routes() {
        assert_eq!(Route::parse("/news"), Route::NotFound("/news".to_string()));
        assert_eq!(Route::parse("/news/1/edit"), Route::NotFound("/news/1/edit".to_string()));
        assert_eq!(Route::parse("/about"), Route::NotFound("/about".to_string()));
    }

    #[test]
    fn test_display_round_trips_paths() {
        assert_eq!(Route::detail(5).to_string(), "/news/5");
        assert_eq!(Route::parse(&Route::Create.to_string()), Route::Create);
    }
}
