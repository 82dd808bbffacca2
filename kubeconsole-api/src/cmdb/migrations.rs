//! CMDB schema migrations for development and test databases

use sqlx::SqlitePool;

use crate::error::ConsoleResult;

pub async fn run_migrations(pool: &SqlitePool) -> ConsoleResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            executed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    run_migration(pool, "001_create_datacenter_table", MIGRATION_001_CREATE_DATACENTER).await?;
    run_migration(pool, "002_create_availablezone_table", MIGRATION_002_CREATE_AVAILABLEZONE).await?;
    run_migration(pool, "003_create_k8scluster_table", MIGRATION_003_CREATE_K8SCLUSTER).await?;

    Ok(())
}

async fn run_migration(pool: &SqlitePool, name: &str, sql: &str) -> ConsoleResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM migrations WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await?;

    if count > 0 {
        tracing::debug!("Migration {} already applied", name);
        return Ok(());
    }

    tracing::info!("Running migration: {}", name);

    sqlx::query(sql).execute(pool).await?;

    sqlx::query("INSERT INTO migrations (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

const MIGRATION_001_CREATE_DATACENTER: &str = "
CREATE TABLE datacenter (
    id TEXT PRIMARY KEY,
    cn_name TEXT NOT NULL,
    en_name TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    status INTEGER NOT NULL DEFAULT 0,
    is_deleted INTEGER NOT NULL DEFAULT 0
);
";

const MIGRATION_002_CREATE_AVAILABLEZONE: &str = "
CREATE TABLE availablezone (
    id TEXT PRIMARY KEY,
    cn_name TEXT NOT NULL,
    en_name TEXT NOT NULL DEFAULT '',
    datacenter_id TEXT NOT NULL REFERENCES datacenter(id),
    status INTEGER NOT NULL DEFAULT 0,
    is_deleted INTEGER NOT NULL DEFAULT 0
);
";

const MIGRATION_003_CREATE_K8SCLUSTER: &str = "
CREATE TABLE k8scluster (
    id TEXT PRIMARY KEY,
    datacenter_id TEXT NOT NULL,
    zone_id TEXT NOT NULL REFERENCES availablezone(id),
    cn_name TEXT NOT NULL,
    en_name TEXT NOT NULL DEFAULT '',
    api_server TEXT NOT NULL DEFAULT '',
    connect_scheme TEXT NOT NULL,
    cluster_user TEXT NOT NULL DEFAULT '',
    ca_data TEXT NOT NULL DEFAULT '',
    cert_data TEXT NOT NULL DEFAULT '',
    key_data TEXT NOT NULL DEFAULT '',
    token TEXT NOT NULL DEFAULT '',
    kubeconfig TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    runtime TEXT NOT NULL DEFAULT '',
    pod_cidr TEXT NOT NULL DEFAULT '',
    service_cidr TEXT NOT NULL DEFAULT '',
    status INTEGER NOT NULL DEFAULT 0,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL DEFAULT 0
);
";
