//! Schema migrations

use std::path::{Path, PathBuf};

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Directory holding the SQL migrations, overridable with `MIGRATIONS_DIR`
fn migrations_dir() -> PathBuf {
    std::env::var("MIGRATIONS_DIR").map_or_else(
        |_| Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"),
        PathBuf::from,
    )
}

/// Apply pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let dir = migrations_dir();
    let migrator = Migrator::new(dir.as_path()).await?;
    migrator.run(pool).await?;
    info!(dir = %dir.display(), "Database migrations applied");
    Ok(())
}
