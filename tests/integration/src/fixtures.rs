//! In-memory collaborators with failure injection
//!
//! `InMemoryDatabase` stands in for PostgreSQL: it resolves resources, knows
//! members, and stores reaction rows and aggregate counts in one place, the
//! same way the Pg repositories share a pool.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use like_cache::AtomicLikeCounter;
use like_core::traits::{
    ActorRepository, EventPublisher, LikeCounter, ReactionStore, RepoResult, ResourceResolver,
};
use like_core::{
    DomainError, EntityId, ReactionEvent, ReactionKey, ReactionRow, ResolvedResource, ResourceKey,
    ResourceType, UpsertOutcome,
};
use parking_lot::Mutex;

/// Counter for unique test ids
static NEXT_ID: AtomicI64 = AtomicI64::new(1_000);

/// Get an id unique within the test binary
pub fn unique_id() -> EntityId {
    EntityId::new(NEXT_ID.fetch_add(1, Ordering::SeqCst))
}

#[derive(Debug, Clone, Copy)]
struct ResourceRecord {
    owner_id: EntityId,
    like_count: i64,
    deleted: bool,
}

#[derive(Debug, Default)]
struct DatabaseState {
    members: HashSet<EntityId>,
    resources: HashMap<ResourceKey, ResourceRecord>,
    likes: HashMap<ReactionKey, ReactionRow>,
    failing_resources: HashSet<ResourceKey>,
    failing_types: HashSet<ResourceType>,
}

/// Durable store, resolver and member directory in process memory
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    state: Mutex<DatabaseState>,
    fail_reads: AtomicBool,
    fail_lookups: AtomicBool,
    fail_writes: AtomicBool,
    write_delay_ms: AtomicUsize,
    upsert_batches: AtomicUsize,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    // === Seeding ===

    pub fn add_member(&self) -> EntityId {
        let id = unique_id();
        self.state.lock().members.insert(id);
        id
    }

    /// Create a resource owned by `owner_id` with a zero aggregate
    pub fn add_resource(&self, resource_type: ResourceType, owner_id: EntityId) -> ResourceKey {
        let key = ResourceKey::new(resource_type, unique_id());
        self.state.lock().resources.insert(
            key,
            ResourceRecord {
                owner_id,
                like_count: 0,
                deleted: false,
            },
        );
        key
    }

    pub fn soft_delete(&self, key: ResourceKey) {
        if let Some(record) = self.state.lock().resources.get_mut(&key) {
            record.deleted = true;
        }
    }

    /// Overwrite an aggregate, simulating drift
    pub fn set_like_count(&self, key: ResourceKey, like_count: i64) {
        if let Some(record) = self.state.lock().resources.get_mut(&key) {
            record.like_count = like_count;
        }
    }

    /// Write a row directly, bypassing the engine
    pub fn seed_like(&self, key: ReactionKey, active: bool, at: DateTime<Utc>) {
        self.state.lock().likes.insert(
            key,
            ReactionRow {
                actor_id: key.actor_id,
                resource_id: key.resource_id,
                resource_type: key.resource_type,
                active,
                created_at: at,
                modified_at: at,
            },
        );
    }

    // === Inspection ===

    pub fn like_count(&self, key: ResourceKey) -> Option<i64> {
        self.state.lock().resources.get(&key).map(|r| r.like_count)
    }

    pub fn row(&self, key: ReactionKey) -> Option<ReactionRow> {
        self.state.lock().likes.get(&key).copied()
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().likes.len()
    }

    pub fn rows_for(&self, resource: ResourceKey) -> Vec<ReactionRow> {
        let mut rows: Vec<ReactionRow> = self
            .state
            .lock()
            .likes
            .values()
            .filter(|row| row.key().resource() == resource)
            .copied()
            .collect();
        rows.sort_by_key(|row| row.actor_id);
        rows
    }

    /// Number of `upsert_reactions` calls that reached the store
    pub fn upsert_batches(&self) -> usize {
        self.upsert_batches.load(Ordering::SeqCst)
    }

    // === Failure injection ===

    /// Fail every read (lookups, grouped counts, pings)
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Fail only `find_reaction`, the toggle's cold-path lookup
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Fail every write
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fail writes touching one resource only
    pub fn fail_resource(&self, key: ResourceKey, fail: bool) {
        let mut state = self.state.lock();
        if fail {
            state.failing_resources.insert(key);
        } else {
            state.failing_resources.remove(&key);
        }
    }

    /// Fail the grouped count query for one resource type
    pub fn fail_type(&self, resource_type: ResourceType, fail: bool) {
        let mut state = self.state.lock();
        if fail {
            state.failing_types.insert(resource_type);
        } else {
            state.failing_types.remove(&resource_type);
        }
    }

    /// Delay every batch write, to hold a flush open
    pub fn set_write_delay(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    fn check_reads(&self) -> RepoResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(DomainError::DatabaseError("injected read failure".into()))
        } else {
            Ok(())
        }
    }

    fn check_writes(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(DomainError::DatabaseError("injected write failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ResourceResolver for InMemoryDatabase {
    async fn resolve(&self, key: ResourceKey) -> RepoResult<Option<ResolvedResource>> {
        self.check_reads()?;
        Ok(self
            .state
            .lock()
            .resources
            .get(&key)
            .filter(|record| !record.deleted)
            .map(|record| ResolvedResource::new(key, record.owner_id)))
    }
}

#[async_trait]
impl ActorRepository for InMemoryDatabase {
    async fn exists(&self, actor_id: EntityId) -> RepoResult<bool> {
        self.check_reads()?;
        Ok(self.state.lock().members.contains(&actor_id))
    }
}

#[async_trait]
impl ReactionStore for InMemoryDatabase {
    async fn find_reaction(&self, key: ReactionKey) -> RepoResult<Option<ReactionRow>> {
        self.check_reads()?;
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("injected lookup failure".into()));
        }
        Ok(self.state.lock().likes.get(&key).copied())
    }

    async fn upsert_reaction(&self, row: &ReactionRow) -> RepoResult<UpsertOutcome> {
        let mut outcomes = self.upsert_reactions(std::slice::from_ref(row)).await?;
        outcomes
            .pop()
            .ok_or_else(|| DomainError::InternalError("empty upsert result".into()))
    }

    async fn upsert_reactions(&self, rows: &[ReactionRow]) -> RepoResult<Vec<UpsertOutcome>> {
        self.upsert_batches.fetch_add(1, Ordering::SeqCst);

        let delay = self.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        self.check_writes()?;

        let mut state = self.state.lock();
        if rows
            .iter()
            .any(|row| state.failing_resources.contains(&row.key().resource()))
        {
            return Err(DomainError::DatabaseError("injected resource failure".into()));
        }

        // All or nothing, like the transaction in PgReactionStore
        let outcomes = rows
            .iter()
            .map(|row| match state.likes.get_mut(&row.key()) {
                Some(existing) => {
                    let was_active = existing.active;
                    existing.active = row.active;
                    existing.modified_at = row.modified_at;
                    UpsertOutcome::Updated { was_active }
                }
                None => {
                    state.likes.insert(row.key(), *row);
                    UpsertOutcome::Inserted
                }
            })
            .collect();
        Ok(outcomes)
    }

    async fn count_active_grouped(
        &self,
        resource_type: ResourceType,
    ) -> RepoResult<HashMap<EntityId, i64>> {
        self.check_reads()?;
        let state = self.state.lock();
        if state.failing_types.contains(&resource_type) {
            return Err(DomainError::DatabaseError("injected count failure".into()));
        }

        let mut counts = HashMap::new();
        for row in state.likes.values() {
            if row.resource_type == resource_type && row.active {
                *counts.entry(row.resource_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn update_aggregate_count(
        &self,
        resource_type: ResourceType,
        resource_id: EntityId,
        count: i64,
    ) -> RepoResult<bool> {
        self.check_writes()?;
        let mut state = self.state.lock();
        match state
            .resources
            .get_mut(&ResourceKey::new(resource_type, resource_id))
        {
            Some(record) if !record.deleted && record.like_count != count => {
                record.like_count = count;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn reset_unreacted_counts(
        &self,
        resource_type: ResourceType,
        with_likes: &[EntityId],
    ) -> RepoResult<Vec<EntityId>> {
        self.check_writes()?;
        let keep: HashSet<EntityId> = with_likes.iter().copied().collect();
        let mut reset = Vec::new();
        for (key, record) in &mut self.state.lock().resources {
            if key.resource_type == resource_type
                && !keep.contains(&key.resource_id)
                && !record.deleted
                && record.like_count != 0
            {
                record.like_count = 0;
                reset.push(key.resource_id);
            }
        }
        Ok(reset)
    }

    async fn aggregate_count(&self, key: ResourceKey) -> RepoResult<Option<i64>> {
        self.check_reads()?;
        Ok(self
            .state
            .lock()
            .resources
            .get(&key)
            .filter(|record| !record.deleted)
            .map(|record| record.like_count))
    }

    async fn adjust_aggregate_count(
        &self,
        resource_type: ResourceType,
        resource_id: EntityId,
        delta: i64,
    ) -> RepoResult<()> {
        self.check_writes()?;
        if let Some(record) = self
            .state
            .lock()
            .resources
            .get_mut(&ResourceKey::new(resource_type, resource_id))
        {
            if !record.deleted {
                record.like_count = (record.like_count + delta).max(0);
            }
        }
        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        self.check_reads()
    }
}

/// In-process counter whose writes can be made to fail
#[derive(Debug, Default)]
pub struct FlakyCounter {
    inner: AtomicLikeCounter,
    fail_writes: AtomicBool,
}

impl FlakyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `add`, `seed` and `set`
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writes(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(DomainError::CacheError("injected counter failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LikeCounter for FlakyCounter {
    async fn add(&self, key: ResourceKey, delta: i64) -> RepoResult<i64> {
        self.check_writes()?;
        self.inner.add(key, delta).await
    }

    async fn get(&self, key: ResourceKey) -> RepoResult<i64> {
        self.inner.get(key).await
    }

    async fn peek(&self, key: ResourceKey) -> RepoResult<Option<i64>> {
        self.inner.peek(key).await
    }

    async fn seed(&self, key: ResourceKey, count: i64) -> RepoResult<bool> {
        self.check_writes()?;
        self.inner.seed(key, count).await
    }

    async fn set(&self, key: ResourceKey, count: i64) -> RepoResult<()> {
        self.check_writes()?;
        self.inner.set(key, count).await
    }
}

/// Publisher that records every event it receives
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ReactionEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReactionEvent> {
        self.events.lock().clone()
    }

    /// Wait until `count` events arrived; publishing runs on detached tasks
    pub async fn wait_for(&self, count: usize) -> Vec<ReactionEvent> {
        for _ in 0..100 {
            if self.events.lock().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.events()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &ReactionEvent) -> RepoResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Publisher that always fails
#[derive(Debug, Default)]
pub struct FailingPublisher {
    attempts: AtomicUsize,
}

impl FailingPublisher {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: &ReactionEvent) -> RepoResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::PublishError("notification service down".into()))
    }
}
