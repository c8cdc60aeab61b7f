use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::actors_movies::Entity")]
    MovieLinks,
}

impl Related<super::movies::Entity> for Entity {
    fn to() -> RelationDef {
        super::actors_movies::Relation::Movies.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::actors_movies::Relation::Actors.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
