//! PostgreSQL implementation of ActorRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use like_core::traits::{ActorRepository, RepoResult};
use like_core::value_objects::EntityId;

use super::error::map_db_error;

/// Actor lookup against the members table
#[derive(Clone)]
pub struct PgActorRepository {
    pool: PgPool,
}

impl PgActorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActorRepository for PgActorRepository {
    #[instrument(skip(self))]
    async fn exists(&self, actor_id: EntityId) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM members WHERE id = $1 AND is_deleted = FALSE)
            "#,
        )
        .bind(actor_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }
}
