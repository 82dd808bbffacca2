//! CMDB accessor
//!
//! Typed read access to datacenter, zone and cluster records. Every filter,
//! search and order key is checked against the fields a table declares
//! before a query is built.

pub mod memory;
pub mod migrations;
pub mod sql;

pub use memory::MemoryCmdb;
pub use sql::SqlCmdb;

use async_trait::async_trait;
use kubeconsole_common::{AvailabilityZoneRecord, ClusterRecord, DatacenterRecord};

use crate::error::{ConsoleError, ConsoleResult};

/// CMDB tables this layer reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Datacenter,
    AvailabilityZone,
    Cluster,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Datacenter => "datacenter",
            Table::AvailabilityZone => "availablezone",
            Table::Cluster => "k8scluster",
        }
    }

    pub fn primary_key(&self) -> &'static str {
        "id"
    }

    /// Queryable fields. Credential columns are deliberately absent.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Table::Datacenter => &["id", "cn_name", "en_name", "address", "status", "is_deleted"],
            Table::AvailabilityZone => &[
                "id",
                "cn_name",
                "en_name",
                "datacenter_id",
                "status",
                "is_deleted",
            ],
            Table::Cluster => &[
                "id",
                "datacenter_id",
                "zone_id",
                "cn_name",
                "en_name",
                "api_server",
                "connect_scheme",
                "version",
                "runtime",
                "status",
                "is_deleted",
                "updated_at",
            ],
        }
    }

    /// Keys searched when a query gives search content but no keys
    pub fn default_search_keys(&self) -> &'static [&'static str] {
        &["cn_name", "en_name"]
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }
}

/// A typed value compared against a field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

/// Equality condition on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub value: FieldValue,
}

/// One ordering term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    /// Direction `"1"` sorts descending, anything else ascending
    pub fn from_direction(field: impl Into<String>, direction: &str) -> Self {
        Self {
            field: field.into(),
            descending: direction.trim() == "1",
        }
    }
}

/// Filtered list request against one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search_content: Option<String>,
    pub search_keys: Vec<String>,
    pub ids: Vec<String>,
    pub conditions: Vec<Condition>,
    pub start: usize,
    pub step: Option<usize>,
    pub order_by: Vec<OrderBy>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn search(mut self, content: impl Into<String>, keys: &[&str]) -> Self {
        self.search_content = Some(content.into());
        self.search_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn order(mut self, field: impl Into<String>, direction: &str) -> Self {
        self.order_by.push(OrderBy::from_direction(field, direction));
        self
    }

    pub fn page(mut self, start: usize, step: usize) -> Self {
        self.start = start;
        self.step = Some(step);
        self
    }

    /// Non-empty, trimmed search content
    pub fn search_term(&self) -> Option<&str> {
        self.search_content
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Search keys in effect for `table`
    pub fn effective_search_keys(&self, table: Table) -> Vec<String> {
        if self.search_keys.is_empty() {
            table
                .default_search_keys()
                .iter()
                .map(|k| k.to_string())
                .collect()
        } else {
            self.search_keys.clone()
        }
    }

    /// Reject any key not declared on `table`
    pub fn validate(&self, table: Table) -> ConsoleResult<()> {
        let keys = self
            .search_keys
            .iter()
            .chain(self.conditions.iter().map(|c| &c.field))
            .chain(self.order_by.iter().map(|o| &o.field));

        for key in keys {
            if !table.has_field(key) {
                return Err(ConsoleError::UnknownField {
                    table: table.name(),
                    field: key.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Read access to the configuration-management database
#[async_trait]
pub trait CmdbAccessor: Send + Sync {
    async fn get_datacenter(&self, id: &str) -> ConsoleResult<Option<DatacenterRecord>>;

    async fn get_zone(&self, id: &str) -> ConsoleResult<Option<AvailabilityZoneRecord>>;

    async fn get_cluster(&self, id: &str) -> ConsoleResult<Option<ClusterRecord>>;

    async fn list_datacenters(&self, query: &ListQuery) -> ConsoleResult<Vec<DatacenterRecord>>;

    async fn list_zones(&self, query: &ListQuery) -> ConsoleResult<Vec<AvailabilityZoneRecord>>;

    async fn list_clusters(&self, query: &ListQuery) -> ConsoleResult<Vec<ClusterRecord>>;

    /// Number of live records matching `query`, ignoring its paging
    async fn count(&self, table: Table, query: &ListQuery) -> ConsoleResult<u64>;
}

/// Field access used by in-memory filtering
pub trait CmdbRow {
    fn field(&self, name: &str) -> Option<FieldValue>;

    fn is_deleted(&self) -> bool;
}

impl CmdbRow for DatacenterRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "id" => self.id.clone().into(),
            "cn_name" => self.cn_name.clone().into(),
            "en_name" => self.en_name.clone().into(),
            "address" => self.address.clone().into(),
            "status" => self.status.code().into(),
            "is_deleted" => i64::from(self.is_deleted).into(),
            _ => return None,
        })
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl CmdbRow for AvailabilityZoneRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "id" => self.id.clone().into(),
            "cn_name" => self.cn_name.clone().into(),
            "en_name" => self.en_name.clone().into(),
            "datacenter_id" => self.datacenter_id.clone().into(),
            "status" => self.status.code().into(),
            "is_deleted" => i64::from(self.is_deleted).into(),
            _ => return None,
        })
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl CmdbRow for ClusterRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "id" => self.id.clone().into(),
            "datacenter_id" => self.datacenter_id.clone().into(),
            "zone_id" => self.zone_id.clone().into(),
            "cn_name" => self.cn_name.clone().into(),
            "en_name" => self.en_name.clone().into(),
            "api_server" => self.api_server.clone().into(),
            "connect_scheme" => self.connect_scheme.to_string().into(),
            "version" => self.version.clone().into(),
            "runtime" => self.runtime.clone().into(),
            "status" => self.status.code().into(),
            "is_deleted" => i64::from(self.is_deleted).into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        })
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}
