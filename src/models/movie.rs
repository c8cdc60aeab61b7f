use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::MovieId;

/// Production status of a movie.
///
/// Persisted as its display string (see [`MovieStatus::as_str`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovieStatus {
    #[serde(rename = "Released")]
    Released,
    #[serde(rename = "Post Production")]
    PostProduction,
    #[serde(rename = "In Production")]
    InProduction,
}

impl MovieStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Released => "Released",
            Self::PostProduction => "Post Production",
            Self::InProduction => "In Production",
        }
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<MovieStatus> for String {
    fn from(status: MovieStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A genre, actor or language as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i32,
    pub code: String,
    pub name: Option<String>,
}

/// Row of the paginated movie list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
}

/// A movie with every relation resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
    pub status: String,
    pub budget: f64,
    pub revenue: f64,
    pub country: Country,
    pub genres: Vec<Tag>,
    pub actors: Vec<Tag>,
    pub languages: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoviePage {
    pub movies: Vec<MovieSummary>,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Input for creating a movie. Related entities are referenced by natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub name: String,
    pub date: NaiveDate,
    pub score: f64,
    pub overview: String,
    pub status: MovieStatus,
    pub budget: f64,
    pub revenue: f64,
    pub country: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub languages: Vec<String>,
}

/// Partial update. `None` means "leave the column alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieChanges {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub score: Option<f64>,
    pub overview: Option<String>,
    pub status: Option<MovieStatus>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
}

impl MovieChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date.is_none()
            && self.score.is_none()
            && self.overview.is_none()
            && self.status.is_none()
            && self.budget.is_none()
            && self.revenue.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_to_display_string() {
        assert_eq!(
            serde_json::to_string(&MovieStatus::PostProduction).unwrap(),
            "\"Post Production\""
        );
        let parsed: MovieStatus = serde_json::from_str("\"In Production\"").unwrap();
        assert_eq!(parsed, MovieStatus::InProduction);
        assert!(serde_json::from_str::<MovieStatus>("\"Cancelled\"").is_err());
    }

    #[test]
    fn test_status_string_conversion() {
        assert_eq!(String::from(MovieStatus::Released), "Released");
        assert_eq!(MovieStatus::InProduction.to_string(), "In Production");
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(MovieChanges::default().is_empty());
        let changes = MovieChanges {
            score: Some(50.0),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
