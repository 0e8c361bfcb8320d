use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Lowercase hex SHA-256 digest of the password.
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Roles,
    #[sea_orm(has_many = "super::favourites::Entity")]
    Favourites,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl Related<super::favourites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favourites.def()
    }
}

impl Related<super::anime::Entity> for Entity {
    fn to() -> RelationDef {
        super::favourites::Relation::Anime.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::favourites::Relation::Accounts.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
