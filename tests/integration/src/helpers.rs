//! Test helpers for integration tests
//!
//! `TestHarness` wires the in-memory fixtures into a `ServiceContext`;
//! `TestServer` serves the real router over a local socket.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use like_api::{create_app, AppState};
use like_cache::MemoryReactionCache;
use like_common::{
    AppConfig, AppSettings, CacheBackend, CacheConfig, CorsConfig, DatabaseConfig, Environment,
    RateLimitConfig, ReconcileConfig, RedisConfig, ServerConfig, SyncConfig,
};
use like_core::traits::EventPublisher;
use like_core::{EntityId, ResourceType, ToggleResult};
use like_service::{
    LikeCountReconciler, LikeService, ServiceContext, ServiceContextBuilder, ServiceResult,
    SyncScheduler,
};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{FlakyCounter, InMemoryDatabase, RecordingPublisher};

pub const TEST_BATCH_THRESHOLD: usize = 5;

/// Engine wired to in-memory collaborators
pub struct TestHarness {
    pub db: Arc<InMemoryDatabase>,
    pub cache: Arc<MemoryReactionCache>,
    /// Counter behind `cache`
    pub counter: Arc<FlakyCounter>,
    pub publisher: Arc<RecordingPublisher>,
    pub ctx: ServiceContext,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_threshold(TEST_BATCH_THRESHOLD)
    }

    pub fn with_threshold(batch_threshold: usize) -> Self {
        let publisher = Arc::new(RecordingPublisher::new());
        Self::build(batch_threshold, publisher.clone(), publisher)
    }

    /// Harness whose events go to `events` instead of the recorder
    pub fn with_publisher(events: Arc<dyn EventPublisher>) -> Self {
        Self::build(TEST_BATCH_THRESHOLD, events, Arc::new(RecordingPublisher::new()))
    }

    fn build(
        batch_threshold: usize,
        events: Arc<dyn EventPublisher>,
        publisher: Arc<RecordingPublisher>,
    ) -> Self {
        let db = Arc::new(InMemoryDatabase::new());
        let counter = Arc::new(FlakyCounter::new());
        let cache = Arc::new(MemoryReactionCache::new(
            counter.clone(),
            Duration::from_secs(3600),
        ));

        let ctx = ServiceContextBuilder::new()
            .resolver(db.clone())
            .actor_repo(db.clone())
            .store(db.clone())
            .cache(cache.clone())
            .publisher(events)
            .batch_threshold(batch_threshold)
            .build()
            .expect("test context should build");

        Self {
            db,
            cache,
            counter,
            publisher,
            ctx,
        }
    }

    pub fn service(&self) -> LikeService<'_> {
        LikeService::new(&self.ctx)
    }

    pub fn scheduler(&self) -> SyncScheduler {
        SyncScheduler::new(&self.ctx)
    }

    pub fn reconciler(&self) -> LikeCountReconciler {
        LikeCountReconciler::new(&self.ctx)
    }

    pub async fn toggle(
        &self,
        actor_id: EntityId,
        resource_type: ResourceType,
        resource_id: EntityId,
    ) -> ServiceResult<ToggleResult> {
        self.service()
            .toggle(actor_id, resource_type, resource_id)
            .await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for servers started from a harness
///
/// Connection settings are never used since the harness supplies every
/// collaborator.
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "like-engine-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        redis: RedisConfig {
            url: "redis://unused".to_string(),
            max_connections: 1,
        },
        cache: CacheConfig {
            backend: CacheBackend::Memory,
            ttl_secs: 3600,
        },
        sync: SyncConfig::default(),
        reconciliation: ReconcileConfig::default(),
        rate_limit: RateLimitConfig {
            enabled: false,
            requests_per_second: 100,
            burst: 100,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve the router over the harness's context
    pub async fn start(harness: &TestHarness) -> Result<Self> {
        Self::start_with_config(harness, test_config()).await
    }

    pub async fn start_with_config(harness: &TestHarness, config: AppConfig) -> Result<Self> {
        let state = AppState::new(harness.ctx.clone(), config);
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body and no actor header
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request on behalf of an actor
    pub async fn post_as<T: Serialize>(
        &self,
        path: &str,
        actor_id: EntityId,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("X-Actor-Id", actor_id.to_string())
            .json(body)
            .send()
            .await?)
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status and return the error code of the body
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("Missing error code in {body}"))
}
