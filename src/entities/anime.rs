use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "anime")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub english_title: String,
    pub japanese_title: Option<String>,
    pub trailer_url: Option<String>,
    pub image_url: String,
    #[sea_orm(column_type = "Text")]
    pub synopsis: String,
    pub airing: bool,
    pub episodes: i32,
    #[sea_orm(column_type = "Float")]
    pub score: f32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favourites::Entity")]
    Favourites,
}

impl Related<super::favourites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favourites.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        super::favourites::Relation::Accounts.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::favourites::Relation::Anime.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
