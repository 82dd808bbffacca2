//! In-memory CMDB accessor for tests and local demos

use async_trait::async_trait;
use kubeconsole_common::{AvailabilityZoneRecord, ClusterRecord, DatacenterRecord};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CmdbAccessor, CmdbRow, FieldValue, ListQuery, Table};
use crate::error::ConsoleResult;

/// CMDB held entirely in memory
#[derive(Clone, Default)]
pub struct MemoryCmdb {
    datacenters: Arc<RwLock<Vec<DatacenterRecord>>>,
    zones: Arc<RwLock<Vec<AvailabilityZoneRecord>>>,
    clusters: Arc<RwLock<Vec<ClusterRecord>>>,
}

impl MemoryCmdb {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_datacenter(&self, record: DatacenterRecord) {
        upsert(&mut *self.datacenters.write().await, record, |r| r.id.clone());
    }

    pub async fn insert_zone(&self, record: AvailabilityZoneRecord) {
        upsert(&mut *self.zones.write().await, record, |r| r.id.clone());
    }

    /// Insert or replace a cluster record, as a credential edit would
    pub async fn insert_cluster(&self, record: ClusterRecord) {
        upsert(&mut *self.clusters.write().await, record, |r| r.id.clone());
    }
}

fn upsert<R, F>(records: &mut Vec<R>, record: R, id_of: F)
where
    F: Fn(&R) -> String,
{
    let id = id_of(&record);
    match records.iter_mut().find(|r| id_of(r) == id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Apply `query` to `records` the way the SQL accessor would, without paging
fn filter<R: CmdbRow + Clone>(table: Table, records: &[R], query: &ListQuery) -> ConsoleResult<Vec<R>> {
    query.validate(table)?;

    let search_keys = query.effective_search_keys(table);
    let matches_search = |record: &R| match query.search_term() {
        None => true,
        Some(term) => search_keys.iter().any(|key| {
            matches!(record.field(key), Some(FieldValue::Text(text)) if text.contains(term))
        }),
    };

    let mut selected: Vec<R> = records
        .iter()
        .filter(|r| !r.is_deleted())
        .filter(|r| matches_search(*r))
        .filter(|r| {
            query.ids.is_empty()
                || matches!(r.field(table.primary_key()), Some(FieldValue::Text(id)) if query.ids.contains(&id))
        })
        .filter(|r| {
            query
                .conditions
                .iter()
                .all(|c| r.field(&c.field).as_ref() == Some(&c.value))
        })
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        query
            .order_by
            .iter()
            .map(|order| {
                let ordering = a.field(&order.field).cmp(&b.field(&order.field));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(selected)
}

fn paged<R: CmdbRow + Clone>(table: Table, records: &[R], query: &ListQuery) -> ConsoleResult<Vec<R>> {
    let selected = filter(table, records, query)?;
    let step = query.step.unwrap_or(usize::MAX);
    Ok(selected.into_iter().skip(query.start).take(step).collect())
}

#[async_trait]
impl CmdbAccessor for MemoryCmdb {
    async fn get_datacenter(&self, id: &str) -> ConsoleResult<Option<DatacenterRecord>> {
        Ok(self.datacenters.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn get_zone(&self, id: &str) -> ConsoleResult<Option<AvailabilityZoneRecord>> {
        Ok(self.zones.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn get_cluster(&self, id: &str) -> ConsoleResult<Option<ClusterRecord>> {
        Ok(self.clusters.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list_datacenters(&self, query: &ListQuery) -> ConsoleResult<Vec<DatacenterRecord>> {
        paged(Table::Datacenter, &self.datacenters.read().await, query)
    }

    async fn list_zones(&self, query: &ListQuery) -> ConsoleResult<Vec<AvailabilityZoneRecord>> {
        paged(Table::AvailabilityZone, &self.zones.read().await, query)
    }

    async fn list_clusters(&self, query: &ListQuery) -> ConsoleResult<Vec<ClusterRecord>> {
        paged(Table::Cluster, &self.clusters.read().await, query)
    }

    async fn count(&self, table: Table, query: &ListQuery) -> ConsoleResult<u64> {
        let count = match table {
            Table::Datacenter => filter(table, &self.datacenters.read().await, query)?.len(),
            Table::AvailabilityZone => filter(table, &self.zones.read().await, query)?.len(),
            Table::Cluster => filter(table, &self.clusters.read().await, query)?.len(),
        };
        Ok(count as u64)
    }
}
