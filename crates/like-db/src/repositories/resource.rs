//! PostgreSQL implementation of ResourceResolver

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use like_core::entities::{ResolvedResource, ResourceKey};
use like_core::traits::{RepoResult, ResourceResolver};
use like_core::value_objects::EntityId;

use crate::models::OwnerModel;

use super::error::map_db_error;
use super::tables::ResourceTable;

/// Resolves posts, comments and replies to their authors
#[derive(Clone)]
pub struct PgResourceResolver {
    pool: PgPool,
}

impl PgResourceResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceResolver for PgResourceResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, key: ResourceKey) -> RepoResult<Option<ResolvedResource>> {
        let table = ResourceTable::for_type(key.resource_type);
        let sql = format!(
            "SELECT author_id FROM {} WHERE id = $1 AND is_deleted = FALSE AND {}",
            table.name, table.filter
        );

        let owner = sqlx::query_as::<_, OwnerModel>(&sql)
            .bind(key.resource_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(owner.map(|row| ResolvedResource::new(key, EntityId::new(row.author_id))))
    }
}
