//! PostgreSQL implementation of ReactionStore

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use like_core::entities::{ReactionKey, ReactionRow, ResourceKey, UpsertOutcome};
use like_core::traits::{ReactionStore, RepoResult};
use like_core::value_objects::{EntityId, ResourceType};

use crate::models::{LikeCountModel, LikeModel, UpsertModel};

use super::error::map_db_error;
use super::tables::ResourceTable;

// The CTE reads the previous state before the statement's own write, so
// `was_active` is NULL exactly when the row did not exist yet.
const UPSERT_SQL: &str = r#"
    WITH previous AS (
        SELECT active FROM likes
        WHERE actor_id = $1 AND resource_id = $2 AND resource_type = $3
        FOR UPDATE
    )
    INSERT INTO likes (actor_id, resource_id, resource_type, active, created_at, modified_at)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (actor_id, resource_id, resource_type)
    DO UPDATE SET active = EXCLUDED.active, modified_at = EXCLUDED.modified_at
    RETURNING (SELECT active FROM previous) AS was_active
"#;

/// Durable reaction store backed by the likes table and the
/// `like_count` columns of the resource tables
#[derive(Clone)]
pub struct PgReactionStore {
    pool: PgPool,
}

impl PgReactionStore {
    /// Create a new PgReactionStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_on(conn: &mut PgConnection, row: &ReactionRow) -> RepoResult<UpsertOutcome> {
        let result = sqlx::query_as::<_, UpsertModel>(UPSERT_SQL)
            .bind(row.actor_id.into_inner())
            .bind(row.resource_id.into_inner())
            .bind(row.resource_type.as_str())
            .bind(row.active)
            .bind(row.created_at)
            .bind(row.modified_at)
            .fetch_one(conn)
            .await
            .map_err(map_db_error)?;

        Ok(result.into())
    }
}

#[async_trait]
impl ReactionStore for PgReactionStore {
    #[instrument(skip(self))]
    async fn find_reaction(&self, key: ReactionKey) -> RepoResult<Option<ReactionRow>> {
        let result = sqlx::query_as::<_, LikeModel>(
            r#"
            SELECT actor_id, resource_id, resource_type, active, created_at, modified_at
            FROM likes
            WHERE actor_id = $1 AND resource_id = $2 AND resource_type = $3
            "#,
        )
        .bind(key.actor_id.into_inner())
        .bind(key.resource_id.into_inner())
        .bind(key.resource_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionRow::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn upsert_reaction(&self, row: &ReactionRow) -> RepoResult<UpsertOutcome> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        Self::upsert_on(&mut conn, row).await
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn upsert_reactions(&self, rows: &[ReactionRow]) -> RepoResult<Vec<UpsertOutcome>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            outcomes.push(Self::upsert_on(&mut tx, row).await?);
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(outcomes)
    }

    #[instrument(skip(self))]
    async fn count_active_grouped(
        &self,
        resource_type: ResourceType,
    ) -> RepoResult<HashMap<EntityId, i64>> {
        let results = sqlx::query_as::<_, LikeCountModel>(
            r#"
            SELECT resource_id, COUNT(*) AS count
            FROM likes
            WHERE resource_type = $1 AND active = TRUE
            GROUP BY resource_id
            "#,
        )
        .bind(resource_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results
            .into_iter()
            .map(|r| (EntityId::new(r.resource_id), r.count))
            .collect())
    }

    #[instrument(skip(self))]
    async fn update_aggregate_count(
        &self,
        resource_type: ResourceType,
        resource_id: EntityId,
        count: i64,
    ) -> RepoResult<bool> {
        let table = ResourceTable::for_type(resource_type);
        let sql = format!(
            "UPDATE {} SET like_count = $2 \
             WHERE id = $1 AND like_count <> $2 AND is_deleted = FALSE AND {}",
            table.name, table.filter
        );

        let result = sqlx::query(&sql)
            .bind(resource_id.into_inner())
            .bind(count)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, with_likes), fields(with_likes = with_likes.len()))]
    async fn reset_unreacted_counts(
        &self,
        resource_type: ResourceType,
        with_likes: &[EntityId],
    ) -> RepoResult<Vec<EntityId>> {
        let table = ResourceTable::for_type(resource_type);
        // NOT (id = ANY(...)) is true for every row when the array is empty
        let sql = format!(
            "UPDATE {} SET like_count = 0 \
             WHERE like_count <> 0 AND is_deleted = FALSE AND {} AND NOT (id = ANY($1)) \
             RETURNING id",
            table.name, table.filter
        );
        let ids: Vec<i64> = with_likes.iter().copied().map(EntityId::into_inner).collect();

        let reset = sqlx::query_scalar::<_, i64>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        debug!(reset = reset.len(), "Zero-reset unreacted resources");
        Ok(reset.into_iter().map(EntityId::new).collect())
    }

    #[instrument(skip(self))]
    async fn aggregate_count(&self, key: ResourceKey) -> RepoResult<Option<i64>> {
        let table = ResourceTable::for_type(key.resource_type);
        let sql = format!(
            "SELECT like_count FROM {} WHERE id = $1 AND is_deleted = FALSE AND {}",
            table.name, table.filter
        );

        sqlx::query_scalar::<_, i64>(&sql)
            .bind(key.resource_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn adjust_aggregate_count(
        &self,
        resource_type: ResourceType,
        resource_id: EntityId,
        delta: i64,
    ) -> RepoResult<()> {
        let table = ResourceTable::for_type(resource_type);
        let sql = format!(
            "UPDATE {} SET like_count = GREATEST(like_count + $2, 0) \
             WHERE id = $1 AND is_deleted = FALSE AND {}",
            table.name, table.filter
        );

        sqlx::query(&sql)
            .bind(resource_id.into_inner())
            .bind(delta)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
