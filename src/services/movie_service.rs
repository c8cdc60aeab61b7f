//! Domain service for the movie catalog.
//!
//! Every operation runs in its own transaction; handlers never touch the
//! database directly.

use crate::domain::{MovieId, PageRequest};
use crate::models::movie::{MovieChanges, MovieDetail, MoviePage, NewMovie};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    /// The catalog is empty or the requested page is past the end.
    #[error("No movies found")]
    NoMovies,

    #[error("A movie with the name '{name}' and release date '{date}' already exists.")]
    Duplicate { name: String, date: NaiveDate },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Returns one page of movies, newest first.
    ///
    /// # Errors
    ///
    /// - [`MovieError::NoMovies`] if the catalog is empty or the page holds no rows
    /// - [`MovieError::Database`] on query failures
    async fn list_movies(&self, page: PageRequest) -> Result<MoviePage, MovieError>;

    /// Creates a movie, resolving country, genres, actors and languages by
    /// natural key, and returns it fully loaded.
    ///
    /// # Errors
    ///
    /// - [`MovieError::Duplicate`] if `(name, date)` is taken
    /// - [`MovieError::Database`] on query failures
    async fn create_movie(&self, movie: NewMovie) -> Result<MovieDetail, MovieError>;

    async fn get_movie(&self, id: MovieId) -> Result<MovieDetail, MovieError>;

    /// Applies only the fields present in `changes`.
    ///
    /// # Errors
    ///
    /// - [`MovieError::NotFound`] for an unknown id
    /// - [`MovieError::Duplicate`] if the new `(name, date)` belongs to another movie
    async fn update_movie(&self, id: MovieId, changes: MovieChanges) -> Result<(), MovieError>;

    async fn delete_movie(&self, id: MovieId) -> Result<(), MovieError>;
}
