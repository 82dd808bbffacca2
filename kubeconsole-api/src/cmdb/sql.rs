//! SQLite-backed CMDB accessor

use async_trait::async_trait;
use kubeconsole_common::{
    AvailabilityZoneRecord, ClusterRecord, ConnectScheme, DatacenterRecord, RecordStatus,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::path::Path;

use super::{migrations, CmdbAccessor, FieldValue, ListQuery, Table};
use crate::error::ConsoleResult;
use crate::log_cmdb_query;

const DATACENTER_COLUMNS: &str = "id, cn_name, en_name, address, status, is_deleted";
const ZONE_COLUMNS: &str = "id, cn_name, en_name, datacenter_id, status, is_deleted";
const CLUSTER_COLUMNS: &str = "id, datacenter_id, zone_id, cn_name, en_name, api_server, \
    connect_scheme, cluster_user, ca_data, cert_data, key_data, token, kubeconfig, version, \
    runtime, pod_cidr, service_cidr, status, is_deleted, updated_at";

/// CMDB accessor over a SQLite pool
#[derive(Clone)]
pub struct SqlCmdb {
    pool: SqlitePool,
}

impl SqlCmdb {
    /// Connect to the CMDB
    pub async fn new(database_url: &str, max_connections: u32) -> ConsoleResult<Self> {
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = tokio::fs::create_dir_all(parent).await {
                        tracing::warn!("Failed to create CMDB directory {:?}: {}", parent, e);
                    }
                }
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("CMDB connection established");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the CMDB tables when missing
    pub async fn migrate(&self) -> ConsoleResult<()> {
        migrations::run_migrations(&self.pool).await?;
        tracing::info!("CMDB migrations completed");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_by_id(&self, table: Table, columns: &str, id: &str) -> ConsoleResult<Option<SqliteRow>> {
        log_cmdb_query!("get", table.name(), id);

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            columns,
            table.name(),
            table.primary_key()
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        Ok(row)
    }

    async fn fetch_list(&self, table: Table, columns: &str, query: &ListQuery) -> ConsoleResult<Vec<SqliteRow>> {
        query.validate(table)?;
        log_cmdb_query!("list", table.name());

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM {}", columns, table.name()));
        push_filters(&mut builder, table, query);

        if !query.order_by.is_empty() {
            builder.push(" ORDER BY ");
            let mut terms = builder.separated(", ");
            for order in &query.order_by {
                let direction = if order.descending { "DESC" } else { "ASC" };
                terms.push(format!("{} {}", order.field, direction));
            }
        }

        match query.step {
            Some(step) => {
                builder.push(" LIMIT ");
                builder.push_bind(step as i64);
                builder.push(" OFFSET ");
                builder.push_bind(query.start as i64);
            }
            None if query.start > 0 => {
                builder.push(" LIMIT -1 OFFSET ");
                builder.push_bind(query.start as i64);
            }
            None => {}
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows)
    }
}

/// Append the WHERE clause for `query`. Keys have already been validated.
fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, table: Table, query: &ListQuery) {
    builder.push(" WHERE is_deleted = 0");

    if let Some(term) = query.search_term() {
        let pattern = format!("%{}%", term);
        builder.push(" AND (");
        let mut any = builder.separated(" OR ");
        for key in query.effective_search_keys(table) {
            any.push(format!("{} LIKE ", key));
            any.push_bind_unseparated(pattern.clone());
        }
        builder.push(")");
    }

    if !query.ids.is_empty() {
        builder.push(format!(" AND {} IN (", table.primary_key()));
        let mut ids = builder.separated(", ");
        for id in &query.ids {
            ids.push_bind(id.clone());
        }
        ids.push_unseparated(")");
    }

    for condition in &query.conditions {
        builder.push(format!(" AND {} = ", condition.field));
        match &condition.value {
            FieldValue::Int(value) => builder.push_bind(*value),
            FieldValue::Text(value) => builder.push_bind(value.clone()),
        };
    }
}

fn parse_status(row: &SqliteRow) -> ConsoleResult<RecordStatus> {
    Ok(RecordStatus::from_code(row.try_get("status")?)?)
}

fn row_to_datacenter(row: &SqliteRow) -> ConsoleResult<DatacenterRecord> {
    Ok(DatacenterRecord {
        id: row.try_get("id")?,
        cn_name: row.try_get("cn_name")?,
        en_name: row.try_get("en_name")?,
        address: row.try_get("address")?,
        status: parse_status(row)?,
        is_deleted: row.try_get::<i64, _>("is_deleted")? != 0,
    })
}

fn row_to_zone(row: &SqliteRow) -> ConsoleResult<AvailabilityZoneRecord> {
    Ok(AvailabilityZoneRecord {
        id: row.try_get("id")?,
        cn_name: row.try_get("cn_name")?,
        en_name: row.try_get("en_name")?,
        datacenter_id: row.try_get("datacenter_id")?,
        status: parse_status(row)?,
        is_deleted: row.try_get::<i64, _>("is_deleted")? != 0,
    })
}

fn row_to_cluster(row: &SqliteRow) -> ConsoleResult<ClusterRecord> {
    let scheme: String = row.try_get("connect_scheme")?;

    Ok(ClusterRecord {
        id: row.try_get("id")?,
        datacenter_id: row.try_get("datacenter_id")?,
        zone_id: row.try_get("zone_id")?,
        cn_name: row.try_get("cn_name")?,
        en_name: row.try_get("en_name")?,
        api_server: row.try_get("api_server")?,
        connect_scheme: scheme.parse::<ConnectScheme>()?,
        cluster_user: row.try_get("cluster_user")?,
        ca: row.try_get("ca_data")?,
        cert: row.try_get("cert_data")?,
        key: row.try_get("key_data")?,
        token: row.try_get("token")?,
        kubeconfig: row.try_get("kubeconfig")?,
        version: row.try_get("version")?,
        runtime: row.try_get("runtime")?,
        pod_cidr: row.try_get("pod_cidr")?,
        service_cidr: row.try_get("service_cidr")?,
        status: parse_status(row)?,
        is_deleted: row.try_get::<i64, _>("is_deleted")? != 0,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CmdbAccessor for SqlCmdb {
    async fn get_datacenter(&self, id: &str) -> ConsoleResult<Option<DatacenterRecord>> {
        self.fetch_by_id(Table::Datacenter, DATACENTER_COLUMNS, id)
            .await?
            .as_ref()
            .map(row_to_datacenter)
            .transpose()
    }

    async fn get_zone(&self, id: &str) -> ConsoleResult<Option<AvailabilityZoneRecord>> {
        self.fetch_by_id(Table::AvailabilityZone, ZONE_COLUMNS, id)
            .await?
            .as_ref()
            .map(row_to_zone)
            .transpose()
    }

    async fn get_cluster(&self, id: &str) -> ConsoleResult<Option<ClusterRecord>> {
        self.fetch_by_id(Table::Cluster, CLUSTER_COLUMNS, id)
            .await?
            .as_ref()
            .map(row_to_cluster)
            .transpose()
    }

    async fn list_datacenters(&self, query: &ListQuery) -> ConsoleResult<Vec<DatacenterRecord>> {
        self.fetch_list(Table::Datacenter, DATACENTER_COLUMNS, query)
            .await?
            .iter()
            .map(row_to_datacenter)
            .collect()
    }

    async fn list_zones(&self, query: &ListQuery) -> ConsoleResult<Vec<AvailabilityZoneRecord>> {
        self.fetch_list(Table::AvailabilityZone, ZONE_COLUMNS, query)
            .await?
            .iter()
            .map(row_to_zone)
            .collect()
    }

    async fn list_clusters(&self, query: &ListQuery) -> ConsoleResult<Vec<ClusterRecord>> {
        self.fetch_list(Table::Cluster, CLUSTER_COLUMNS, query)
            .await?
            .iter()
            .map(row_to_cluster)
            .collect()
    }

    async fn count(&self, table: Table, query: &ListQuery) -> ConsoleResult<u64> {
        query.validate(table)?;
        log_cmdb_query!("count", table.name());

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", table.name()));
        push_filters(&mut builder, table, query);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    async fn seeded() -> SqlCmdb {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let cmdb = SqlCmdb::from_pool(pool);
        cmdb.migrate().await.unwrap();

        for (id, name, deleted) in [("d1", "east", 0), ("d2", "west", 0), ("d3", "old", 1)] {
            sqlx::query("INSERT INTO datacenter (id, cn_name, en_name, status, is_deleted) VALUES (?, ?, ?, 1, ?)")
                .bind(id)
                .bind(name)
                .bind(name)
                .bind(deleted)
                .execute(cmdb.pool())
                .await
                .unwrap();
        }
        for (id, dc) in [("z1", "d1"), ("z2", "d1"), ("z3", "d2")] {
            sqlx::query("INSERT INTO availablezone (id, cn_name, en_name, datacenter_id, status) VALUES (?, ?, ?, ?, 1)")
                .bind(id)
                .bind(id)
                .bind(id)
                .bind(dc)
                .execute(cmdb.pool())
                .await
                .unwrap();
        }
        sqlx::query(
            "INSERT INTO k8scluster (id, datacenter_id, zone_id, cn_name, en_name, api_server, connect_scheme, token, status)
             VALUES ('c1', 'd1', 'z1', 'prod', 'prod', '10.0.0.1:6443', '1', 'tkn', 1)",
        )
        .execute(cmdb.pool())
        .await
        .unwrap();

        cmdb
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let cmdb = seeded().await;

        let dc = cmdb.get_datacenter("d1").await.unwrap().unwrap();
        assert_eq!(dc.cn_name, "east");
        assert!(cmdb.get_datacenter("missing").await.unwrap().is_none());

        let cluster = cmdb.get_cluster("c1").await.unwrap().unwrap();
        assert_eq!(cluster.connect_scheme, ConnectScheme::Token);
        assert_eq!(cluster.token, "tkn");
    }

    #[tokio::test]
    async fn test_list_excludes_soft_deleted() {
        let cmdb = seeded().await;

        let all = cmdb.list_datacenters(&ListQuery::new().order("id", "0")).await.unwrap();
        let ids: Vec<_> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
        assert_eq!(cmdb.count(Table::Datacenter, &ListQuery::new()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_with_conditions_and_paging() {
        let cmdb = seeded().await;

        let zones = cmdb
            .list_zones(&ListQuery::new().condition("datacenter_id", "d1").order("id", "1"))
            .await
            .unwrap();
        let ids: Vec<_> = zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["z2", "z1"]);

        let page = cmdb
            .list_zones(&ListQuery::new().order("id", "0").page(1, 1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "z2");
    }

    #[tokio::test]
    async fn test_search_and_ids() {
        let cmdb = seeded().await;

        let found = cmdb
            .list_datacenters(&ListQuery::new().search("wes", &["en_name"]))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "d2");

        let by_ids = cmdb
            .list_zones(&ListQuery::new().ids(["z1", "z3"]))
            .await
            .unwrap();
        assert_eq!(by_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_field_rejected_before_query() {
        let cmdb = seeded().await;

        let err = cmdb
            .list_clusters(&ListQuery::new().condition("key_data", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }
}
