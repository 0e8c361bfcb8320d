use crate::entities::prelude::*;
use crate::models::role::{ADMIN_ROLE_ID, CLIENT_ROLE_ID};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Roles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Accounts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Anime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Favourites)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed the closed role set with fixed ids
        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Roles)
            .columns([
                crate::entities::roles::Column::Id,
                crate::entities::roles::Column::Name,
            ])
            .values_panic([ADMIN_ROLE_ID.into(), "Admin".into()])
            .values_panic([CLIENT_ROLE_ID.into(), "Client".into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favourites).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Anime).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles).to_owned())
            .await?;

        Ok(())
    }
}
