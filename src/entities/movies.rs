use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub name: String,
    pub date: Date,
    pub score: f64,
    #[sea_orm(column_type = "Text")]
    pub overview: String,
    /// One of `Released`, `Post Production`, `In Production`.
    pub status: String,
    pub budget: f64,
    pub revenue: f64,
    pub country_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::countries::Entity",
        from = "Column::CountryId",
        to = "super::countries::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Countries,
    #[sea_orm(has_many = "super::movies_genres::Entity")]
    MoviesGenres,
    #[sea_orm(has_many = "super::actors_movies::Entity")]
    ActorsMovies,
    #[sea_orm(has_many = "super::movies_languages::Entity")]
    MoviesLanguages,
}

impl Related<super::countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Countries.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::movies_genres::Relation::Genres.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::movies_genres::Relation::Movies.def().rev())
    }
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        super::actors_movies::Relation::Actors.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::actors_movies::Relation::Movies.def().rev())
    }
}

impl Related<super::languages::Entity> for Entity {
    fn to() -> RelationDef {
        super::movies_languages::Relation::Languages.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::movies_languages::Relation::Movies.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
