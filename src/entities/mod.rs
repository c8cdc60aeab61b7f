pub mod prelude;

pub mod actors;
pub mod actors_movies;
pub mod countries;
pub mod genres;
pub mod languages;
pub mod movies;
pub mod movies_genres;
pub mod movies_languages;
