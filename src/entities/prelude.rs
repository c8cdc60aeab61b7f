pub use super::actors::Entity as Actors;
pub use super::actors_movies::Entity as ActorsMovies;
pub use super::countries::Entity as Countries;
pub use super::genres::Entity as Genres;
pub use super::languages::Entity as Languages;
pub use super::movies::Entity as Movies;
pub use super::movies_genres::Entity as MoviesGenres;
pub use super::movies_languages::Entity as MoviesLanguages;
