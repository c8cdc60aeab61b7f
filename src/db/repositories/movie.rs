use crate::domain::{MovieId, PageRequest};
use crate::entities::{
    actors, actors_movies, countries, genres, languages, movies, movies_genres, movies_languages,
    prelude::*,
};
use crate::models::movie::{Country, MovieDetail, MovieSummary, Tag};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

/// Related entity looked up by its unique `name` column.
pub trait NamedEntity: EntityTrait {
    const KIND: &'static str;

    fn name_column() -> Self::Column;

    fn new_row(name: &str) -> Self::ActiveModel;

    fn into_tag(model: Self::Model) -> Tag;
}

impl NamedEntity for Genres {
    const KIND: &'static str = "genre";

    fn name_column() -> Self::Column {
        genres::Column::Name
    }

    fn new_row(name: &str) -> Self::ActiveModel {
        genres::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
    }

    fn into_tag(model: Self::Model) -> Tag {
        Tag {
            id: model.id,
            name: model.name,
        }
    }
}

impl NamedEntity for Actors {
    const KIND: &'static str = "actor";

    fn name_column() -> Self::Column {
        actors::Column::Name
    }

    fn new_row(name: &str) -> Self::ActiveModel {
        actors::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
    }

    fn into_tag(model: Self::Model) -> Tag {
        Tag {
            id: model.id,
            name: model.name,
        }
    }
}

impl NamedEntity for Languages {
    const KIND: &'static str = "language";

    fn name_column() -> Self::Column {
        languages::Column::Name
    }

    fn new_row(name: &str) -> Self::ActiveModel {
        languages::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
    }

    fn into_tag(model: Self::Model) -> Tag {
        Tag {
            id: model.id,
            name: model.name,
        }
    }
}

/// Movie queries bound to a single connection or transaction.
///
/// Callers own the unit of work: pass a `DatabaseTransaction` to group several
/// calls and commit it themselves.
pub struct MovieRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MovieRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    fn map_summary(model: movies::Model) -> MovieSummary {
        MovieSummary {
            id: MovieId::new(model.id),
            name: model.name,
            date: model.date,
            score: model.score,
            overview: model.overview,
        }
    }

    fn map_country(model: countries::Model) -> Country {
        Country {
            id: model.id,
            code: model.code,
            name: model.name,
        }
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Movies::find().count(self.conn).await
    }

    /// Newest first (by id, not by release date).
    pub async fn page(&self, page: PageRequest) -> Result<Vec<MovieSummary>, DbErr> {
        let rows = Movies::find()
            .order_by_desc(movies::Column::Id)
            .offset(page.offset())
            .limit(page.size)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_summary).collect())
    }

    pub async fn find(&self, id: MovieId) -> Result<Option<movies::Model>, DbErr> {
        Movies::find_by_id(id.value()).one(self.conn).await
    }

    /// Looks for another movie holding the `(name, date)` pair, ignoring `except`.
    pub async fn find_by_name_and_date(
        &self,
        name: &str,
        date: NaiveDate,
        except: Option<MovieId>,
    ) -> Result<Option<movies::Model>, DbErr> {
        let mut query = Movies::find()
            .filter(movies::Column::Name.eq(name))
            .filter(movies::Column::Date.eq(date));

        if let Some(id) = except {
            query = query.filter(movies::Column::Id.ne(id.value()));
        }

        query.one(self.conn).await
    }

    pub async fn get_or_create_country(&self, code: &str) -> Result<countries::Model, DbErr> {
        let existing = Countries::find()
            .filter(countries::Column::Code.eq(code))
            .one(self.conn)
            .await?;

        if let Some(country) = existing {
            return Ok(country);
        }

        debug!(code, "Creating country");
        countries::ActiveModel {
            code: Set(code.to_string()),
            name: Set(None),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    /// Returns the row named `name`, inserting it first if needed.
    ///
    /// The insert runs on the repository's connection, so inside a transaction
    /// the new id is visible to later calls before anything is committed.
    /// Two transactions racing on the same new name are not coordinated; the
    /// unique index rejects the slower one.
    pub async fn get_or_create<E>(&self, name: &str) -> Result<Tag, DbErr>
    where
        E: NamedEntity,
        E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    {
        let existing = E::find()
            .filter(E::name_column().eq(name))
            .one(self.conn)
            .await?;

        if let Some(model) = existing {
            return Ok(E::into_tag(model));
        }

        debug!(kind = E::KIND, name, "Creating related entity");
        let model = E::new_row(name).insert(self.conn).await?;
        Ok(E::into_tag(model))
    }

    /// Resolves every name in order, one lookup-or-insert per entry.
    pub async fn get_or_create_all<E>(&self, names: &[String]) -> Result<Vec<Tag>, DbErr>
    where
        E: NamedEntity,
        E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    {
        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            tags.push(self.get_or_create::<E>(name).await?);
        }
        Ok(tags)
    }

    pub async fn insert(&self, movie: movies::ActiveModel) -> Result<movies::Model, DbErr> {
        movie.insert(self.conn).await
    }

    pub async fn link_genres(&self, movie_id: MovieId, tags: &[Tag]) -> Result<(), DbErr> {
        let rows: Vec<movies_genres::ActiveModel> = unique_ids(tags)
            .into_iter()
            .map(|genre_id| movies_genres::ActiveModel {
                movie_id: Set(movie_id.value()),
                genre_id: Set(genre_id),
            })
            .collect();

        if !rows.is_empty() {
            MoviesGenres::insert_many(rows)
                .exec_without_returning(self.conn)
                .await?;
        }
        Ok(())
    }

    pub async fn link_actors(&self, movie_id: MovieId, tags: &[Tag]) -> Result<(), DbErr> {
        let rows: Vec<actors_movies::ActiveModel> = unique_ids(tags)
            .into_iter()
            .map(|actor_id| actors_movies::ActiveModel {
                movie_id: Set(movie_id.value()),
                actor_id: Set(actor_id),
            })
            .collect();

        if !rows.is_empty() {
            ActorsMovies::insert_many(rows)
                .exec_without_returning(self.conn)
                .await?;
        }
        Ok(())
    }

    pub async fn link_languages(&self, movie_id: MovieId, tags: &[Tag]) -> Result<(), DbErr> {
        let rows: Vec<movies_languages::ActiveModel> = unique_ids(tags)
            .into_iter()
            .map(|language_id| movies_languages::ActiveModel {
                movie_id: Set(movie_id.value()),
                language_id: Set(language_id),
            })
            .collect();

        if !rows.is_empty() {
            MoviesLanguages::insert_many(rows)
                .exec_without_returning(self.conn)
                .await?;
        }
        Ok(())
    }

    /// Fetches a movie together with its country, genres, actors and languages.
    pub async fn load_detail(&self, id: MovieId) -> Result<Option<MovieDetail>, DbErr> {
        let Some((movie, country)) = Movies::find_by_id(id.value())
            .find_also_related(Countries)
            .one(self.conn)
            .await?
        else {
            return Ok(None);
        };

        let country = country.ok_or_else(|| {
            DbErr::RecordNotFound(format!(
                "country {} referenced by movie {}",
                movie.country_id, movie.id
            ))
        })?;

        let genres = movie
            .find_related(Genres)
            .order_by_asc(genres::Column::Id)
            .all(self.conn)
            .await?;
        let actors = movie
            .find_related(Actors)
            .order_by_asc(actors::Column::Id)
            .all(self.conn)
            .await?;
        let languages = movie
            .find_related(Languages)
            .order_by_asc(languages::Column::Id)
            .all(self.conn)
            .await?;

        Ok(Some(MovieDetail {
            id: MovieId::new(movie.id),
            name: movie.name,
            date: movie.date,
            score: movie.score,
            overview: movie.overview,
            status: movie.status,
            budget: movie.budget,
            revenue: movie.revenue,
            country: Self::map_country(country),
            genres: genres.into_iter().map(Genres::into_tag).collect(),
            actors: actors.into_iter().map(Actors::into_tag).collect(),
            languages: languages.into_iter().map(Languages::into_tag).collect(),
        }))
    }

    pub async fn update(&self, movie: movies::ActiveModel) -> Result<(), DbErr> {
        if movie.is_changed() {
            movie.update(self.conn).await?;
        }
        Ok(())
    }

    /// Removes the movie and its membership rows. Genres, actors, languages
    /// and the country stay in place.
    pub async fn delete(&self, movie: movies::Model) -> Result<(), DbErr> {
        MoviesGenres::delete_many()
            .filter(movies_genres::Column::MovieId.eq(movie.id))
            .exec(self.conn)
            .await?;
        ActorsMovies::delete_many()
            .filter(actors_movies::Column::MovieId.eq(movie.id))
            .exec(self.conn)
            .await?;
        MoviesLanguages::delete_many()
            .filter(movies_languages::Column::MovieId.eq(movie.id))
            .exec(self.conn)
            .await?;

        Movies::delete_by_id(movie.id).exec(self.conn).await?;
        Ok(())
    }
}

/// Ids in first-seen order, without repeats.
fn unique_ids(tags: &[Tag]) -> Vec<i32> {
    let mut ids: Vec<i32> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !ids.contains(&tag.id) {
            ids.push(tag.id);
        }
    }
    ids
}
