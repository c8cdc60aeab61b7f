use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::validation::release_date_within_a_year;
use crate::domain::PageRequest;
use crate::models::movie::{MovieChanges, MovieStatus, MovieSummary, NewMovie};

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorDto>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldErrorDto {
    pub field: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListMoviesQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page: u64,

    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 20, message = "must be between 1 and 20"))]
    pub per_page: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_per_page() -> u64 {
    10
}

impl From<ListMoviesQuery> for PageRequest {
    fn from(query: ListMoviesQuery) -> Self {
        Self {
            number: query.page,
            size: query.per_page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<MovieSummary>,
    pub prev_page: Option<String>,
    pub next_page: Option<String>,
    pub total_pages: u64,
    pub total_items: u64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMovieRequest {
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub name: String,

    #[validate(custom(function = "release_date_within_a_year"))]
    pub date: NaiveDate,

    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub score: f64,

    pub overview: String,

    pub status: MovieStatus,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub budget: f64,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub revenue: f64,

    /// ISO 3166-1 alpha-3 code.
    pub country: String,

    pub genres: Vec<String>,

    pub actors: Vec<String>,

    pub languages: Vec<String>,
}

impl From<CreateMovieRequest> for NewMovie {
    fn from(req: CreateMovieRequest) -> Self {
        Self {
            name: req.name,
            date: req.date,
            score: req.score,
            overview: req.overview,
            status: req.status,
            budget: req.budget,
            revenue: req.revenue,
            country: req.country,
            genres: req.genres,
            actors: req.actors,
            languages: req.languages,
        }
    }
}

/// Partial update. A missing key leaves the column untouched; an explicit
/// `null` is rejected because none of these columns is nullable.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMovieRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "release_date_within_a_year"))]
    pub date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub score: Option<f64>,

    #[serde(default, deserialize_with = "present")]
    pub overview: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub status: Option<MovieStatus>,

    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub budget: Option<f64>,

    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub revenue: Option<f64>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<UpdateMovieRequest> for MovieChanges {
    fn from(req: UpdateMovieRequest) -> Self {
        Self {
            name: req.name,
            date: req.date,
            score: req.score,
            overview: req.overview,
            status: req.status,
            budget: req.budget,
            revenue: req.revenue,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateMovieResponse {
    pub detail: String,
}

impl Default for UpdateMovieResponse {
    fn default() -> Self {
        Self {
            detail: "Movie updated successfully.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query: ListMoviesQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 10);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_list_query_bounds() {
        let too_big = ListMoviesQuery {
            page: 1,
            per_page: 21,
        };
        assert!(too_big.validate().is_err());

        let page_zero = ListMoviesQuery {
            page: 0,
            per_page: 10,
        };
        let errors = page_zero.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("page"));
    }

    #[test]
    fn test_update_absent_fields_stay_none() {
        let req: UpdateMovieRequest = serde_json::from_str(r#"{"score": 75}"#).unwrap();
        assert_eq!(req.score, Some(75.0));
        assert!(req.name.is_none());
        assert!(req.status.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_explicit_null() {
        assert!(serde_json::from_str::<UpdateMovieRequest>(r#"{"score": null}"#).is_err());
        assert!(serde_json::from_str::<UpdateMovieRequest>(r#"{"name": null}"#).is_err());
    }

    #[test]
    fn test_update_validates_present_fields() {
        let req: UpdateMovieRequest =
            serde_json::from_str(r#"{"score": 101, "budget": -1}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("score"));
        assert!(fields.contains_key("budget"));
    }

    #[test]
    fn test_create_request_constraints() {
        let body = serde_json::json!({
            "name": "x".repeat(256),
            "date": "2021-10-22",
            "score": 82,
            "overview": "...",
            "status": "Released",
            "budget": 165000000,
            "revenue": 400000000,
            "country": "USA",
            "genres": ["Sci-Fi"],
            "actors": [],
            "languages": []
        });
        let req: CreateMovieRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert_eq!(errors.field_errors().len(), 1);
    }
}
