use serde::{Deserialize, Serialize};

use crate::destinations::repo_types::Destination;
use crate::reviews::repo_types::ReviewView;

/// Raw `/api/destinations` query string.
#[derive(Debug, Default, Deserialize)]
pub struct DestinationQuery {
    pub category: Option<String>,
    pub state: Option<String>,
    pub weather: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Popularity,
    Rating,
    Name,
}

impl SortKey {
    /// Unknown values fall back to popularity.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("rating") => SortKey::Rating,
            Some("name") => SortKey::Name,
            _ => SortKey::Popularity,
        }
    }

    pub fn order_by(self) -> &'static str {
        match self {
            SortKey::Popularity => "popularity DESC, id ASC",
            SortKey::Rating => "rating DESC, id ASC",
            SortKey::Name => "name ASC, id ASC",
        }
    }
}

/// Normalized listing filter; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationFilter {
    pub category: Option<String>,
    pub state: Option<String>,
    pub weather: Option<String>,
    pub search: Option<String>,
    pub sort: SortKey,
}

impl From<DestinationQuery> for DestinationFilter {
    fn from(q: DestinationQuery) -> Self {
        Self {
            category: constraint(q.category),
            state: constraint(q.state),
            weather: constraint(q.weather),
            search: q
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            sort: SortKey::parse(q.sort.as_deref()),
        }
    }
}

/// Empty strings and the literal `all` disable a filter.
fn constraint(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[derive(Debug, Serialize)]
pub struct DestinationDetails {
    #[serde(flatten)]
    pub destination: Destination,
    pub reviews: Vec<ReviewView>,
}
