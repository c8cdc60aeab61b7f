//! Movie catalog endpoints.
//!
//! Handlers only translate between HTTP and [`MovieService`]; all database work
//! happens in the service.

use axum::{
    Json,
    extract::{OriginalUri, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{MovieIdPath, ValidatedJson, ValidatedQuery};
use super::{
    ApiError, AppState, CreateMovieRequest, ListMoviesQuery, MovieListResponse,
    UpdateMovieRequest, UpdateMovieResponse,
};
use crate::domain::PageRequest;
use crate::models::movie::MovieDetail;
use crate::services::MovieError;

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::NotFound(_) => Self::movie_not_found(),
            MovieError::NoMovies => Self::NotFound("No movies found.".to_string()),
            err @ MovieError::Duplicate { .. } => Self::Conflict(err.to_string()),
            MovieError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /movies/?page=&per_page=`
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    ValidatedQuery(query): ValidatedQuery<ListMoviesQuery>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let page = PageRequest::from(query);
    let result = state.movie_service().list_movies(page).await?;

    let (prev_page, next_page) = page_links(uri.path(), page, result.total_pages);

    Ok(Json(MovieListResponse {
        movies: result.movies,
        prev_page,
        next_page,
        total_pages: result.total_pages,
        total_items: result.total_items,
    }))
}

/// `POST /movies/`
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateMovieRequest>,
) -> Result<(StatusCode, Json<MovieDetail>), ApiError> {
    let movie = state.movie_service().create_movie(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// `GET /movies/{id}/`
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    MovieIdPath(id): MovieIdPath,
) -> Result<Json<MovieDetail>, ApiError> {
    let movie = state.movie_service().get_movie(id).await?;
    Ok(Json(movie))
}

/// `PATCH /movies/{id}/`
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    MovieIdPath(id): MovieIdPath,
    ValidatedJson(payload): ValidatedJson<UpdateMovieRequest>,
) -> Result<Json<UpdateMovieResponse>, ApiError> {
    state
        .movie_service()
        .update_movie(id, payload.into())
        .await?;
    Ok(Json(UpdateMovieResponse::default()))
}

/// `DELETE /movies/{id}/`
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    MovieIdPath(id): MovieIdPath,
) -> Result<StatusCode, ApiError> {
    state.movie_service().delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Previous/next links against the list endpoint's own path.
fn page_links(path: &str, page: PageRequest, total_pages: u64) -> (Option<String>, Option<String>) {
    let link = |number: u64| format!("{path}?page={number}&per_page={}", page.size);

    let prev = (page.number > 1).then(|| link(page.number - 1));
    let next = (page.number < total_pages).then(|| link(page.number + 1));
    (prev, next)
}
