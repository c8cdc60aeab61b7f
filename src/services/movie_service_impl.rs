//! `SeaORM` implementation of the `MovieService` trait.

use crate::db::{MovieRepository, Store};
use crate::domain::{MovieId, PageRequest};
use crate::entities::movies;
use crate::entities::prelude::{Actors, Genres, Languages};
use crate::models::movie::{MovieChanges, MovieDetail, MoviePage, NewMovie};
use crate::services::movie_service::{MovieError, MovieService};
use async_trait::async_trait;
use sea_orm::{IntoActiveModel, Set};
use tracing::info;

pub struct SeaOrmMovieService {
    store: Store,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn list_movies(&self, page: PageRequest) -> Result<MoviePage, MovieError> {
        let txn = self.store.begin().await?;
        let repo = MovieRepository::new(&txn);

        let total_items = repo.count().await?;
        if page.is_past_end(total_items) {
            return Err(MovieError::NoMovies);
        }

        let movies = repo.page(page).await?;
        if movies.is_empty() {
            return Err(MovieError::NoMovies);
        }

        txn.commit().await?;

        Ok(MoviePage {
            movies,
            total_items,
            total_pages: page.total_pages(total_items),
        })
    }

    async fn create_movie(&self, movie: NewMovie) -> Result<MovieDetail, MovieError> {
        let txn = self.store.begin().await?;
        let repo = MovieRepository::new(&txn);

        if repo
            .find_by_name_and_date(&movie.name, movie.date, None)
            .await?
            .is_some()
        {
            return Err(MovieError::Duplicate {
                name: movie.name,
                date: movie.date,
            });
        }

        let country = repo.get_or_create_country(&movie.country).await?;
        let genres = repo.get_or_create_all::<Genres>(&movie.genres).await?;
        let actors = repo.get_or_create_all::<Actors>(&movie.actors).await?;
        let languages = repo
            .get_or_create_all::<Languages>(&movie.languages)
            .await?;

        let created = repo
            .insert(movies::ActiveModel {
                name: Set(movie.name),
                date: Set(movie.date),
                score: Set(movie.score),
                overview: Set(movie.overview),
                status: Set(movie.status.as_str().to_string()),
                budget: Set(movie.budget),
                revenue: Set(movie.revenue),
                country_id: Set(country.id),
                ..Default::default()
            })
            .await?;

        let id = MovieId::new(created.id);
        repo.link_genres(id, &genres).await?;
        repo.link_actors(id, &actors).await?;
        repo.link_languages(id, &languages).await?;

        txn.commit().await?;
        info!(movie_id = %id, name = %created.name, "Created movie");

        self.store
            .movies()
            .load_detail(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn get_movie(&self, id: MovieId) -> Result<MovieDetail, MovieError> {
        self.store
            .movies()
            .load_detail(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn update_movie(&self, id: MovieId, changes: MovieChanges) -> Result<(), MovieError> {
        let txn = self.store.begin().await?;
        let repo = MovieRepository::new(&txn);

        let movie = repo.find(id).await?.ok_or(MovieError::NotFound(id))?;
        if changes.is_empty() {
            return Ok(());
        }

        if changes.name.is_some() || changes.date.is_some() {
            let name = changes.name.clone().unwrap_or_else(|| movie.name.clone());
            let date = changes.date.unwrap_or(movie.date);
            if repo
                .find_by_name_and_date(&name, date, Some(id))
                .await?
                .is_some()
            {
                return Err(MovieError::Duplicate { name, date });
            }
        }

        let mut active = movie.into_active_model();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(score) = changes.score {
            active.score = Set(score);
        }
        if let Some(overview) = changes.overview {
            active.overview = Set(overview);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(budget) = changes.budget {
            active.budget = Set(budget);
        }
        if let Some(revenue) = changes.revenue {
            active.revenue = Set(revenue);
        }

        repo.update(active).await?;
        txn.commit().await?;

        info!(movie_id = %id, "Updated movie");
        Ok(())
    }

    async fn delete_movie(&self, id: MovieId) -> Result<(), MovieError> {
        let txn = self.store.begin().await?;
        let repo = MovieRepository::new(&txn);

        let movie = repo.find(id).await?.ok_or(MovieError::NotFound(id))?;
        repo.delete(movie).await?;

        txn.commit().await?;
        info!(movie_id = %id, "Deleted movie");
        Ok(())
    }
}
