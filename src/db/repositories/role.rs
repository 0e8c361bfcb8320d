use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::entities::{prelude::*, roles};
use crate::models::role::{Role, RoleKind};

pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Role>> {
        let role = Roles::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query role by id")?;

        Ok(role.map(map_model))
    }

    pub async fn list(&self) -> Result<Vec<Role>> {
        let roles = Roles::find()
            .order_by_asc(roles::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list roles")?;

        Ok(roles.into_iter().map(map_model).collect())
    }

    /// Resolves a role id into the closed role set. Missing rows and
    /// unrecognized names both come back as [`RoleKind::Unknown`].
    pub async fn resolve(&self, id: i32) -> Result<RoleKind> {
        let role = Roles::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to resolve role")?;

        Ok(role.map_or(RoleKind::Unknown, |r| RoleKind::from_name(&r.name)))
    }

    pub async fn is_admin(&self, id: i32) -> Result<bool> {
        Ok(self.resolve(id).await?.is_admin())
    }

    pub async fn is_client(&self, id: i32) -> Result<bool> {
        Ok(self.resolve(id).await?.is_client())
    }
}

fn map_model(model: roles::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
    }
}
