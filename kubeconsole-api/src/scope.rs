//! Scope resolution and cascading selectors
//!
//! Request identifiers are normalised to the `"0"` sentinel, checked against
//! the CMDB and re-derived upward from the deepest selected level, so a
//! stale or forged parent id never survives. Selector lists are filled only
//! from children of the enclosing selection.

use kubeconsole_common::{is_unselected, CascadingOptions, ScopeSelection, SelectOption, UNSELECTED};
use std::sync::Arc;

use crate::cmdb::{CmdbAccessor, ListQuery};
use crate::error::{ConsoleError, ConsoleResult, ErrorKind};
use crate::kubernetes::credentials::load_cluster;
use crate::kubernetes::NamespaceLister;
use crate::validation::is_valid_namespace;

fn normalize(value: &str) -> String {
    if is_unselected(value) {
        UNSELECTED.to_string()
    } else {
        value.trim().to_string()
    }
}

/// Placeholder labels per selector level
pub mod labels {
    pub const DATACENTER: &str = "Select datacenter";
    pub const ZONE: &str = "All zones";
    pub const CLUSTER: &str = "Select cluster";
    pub const NAMESPACE: &str = "All namespaces";
}

/// Narrows requests to one place in the datacenter tree
#[derive(Clone)]
pub struct ScopeResolver {
    cmdb: Arc<dyn CmdbAccessor>,
    namespaces: Arc<dyn NamespaceLister>,
}

impl ScopeResolver {
    pub fn new(cmdb: Arc<dyn CmdbAccessor>, namespaces: Arc<dyn NamespaceLister>) -> Self {
        Self { cmdb, namespaces }
    }

    /// Validate `requested` and rebuild its parent chain from stored records
    pub async fn resolve_scope(&self, requested: &ScopeSelection) -> ConsoleResult<ScopeSelection> {
        let mut scope = ScopeSelection {
            datacenter_id: normalize(&requested.datacenter_id),
            zone_id: normalize(&requested.zone_id),
            cluster_id: normalize(&requested.cluster_id),
            namespace: normalize(&requested.namespace),
        };

        if scope.has_cluster() {
            let cluster = load_cluster(self.cmdb.as_ref(), &scope.cluster_id).await?;
            scope.zone_id = cluster.zone_id;
            scope.datacenter_id = cluster.datacenter_id;
        } else if scope.has_zone() {
            let zone = self
                .cmdb
                .get_zone(&scope.zone_id)
                .await?
                .filter(|zone| !zone.is_deleted)
                .ok_or_else(|| ConsoleError::RecordNotFound {
                    table: "availablezone",
                    id: scope.zone_id.clone(),
                })?;
            scope.datacenter_id = zone.datacenter_id;
        } else if scope.has_datacenter() {
            self.cmdb
                .get_datacenter(&scope.datacenter_id)
                .await?
                .filter(|dc| !dc.is_deleted)
                .ok_or_else(|| ConsoleError::RecordNotFound {
                    table: "datacenter",
                    id: scope.datacenter_id.clone(),
                })?;
        }

        if !scope.has_cluster() {
            scope.namespace = UNSELECTED.to_string();
        } else if scope.has_namespace() && !is_valid_namespace(&scope.namespace) {
            return Err(ConsoleError::InvalidScope(format!(
                "invalid namespace name: {}",
                scope.namespace
            )));
        }

        tracing::debug!(
            datacenter = %scope.datacenter_id,
            zone = %scope.zone_id,
            cluster = %scope.cluster_id,
            namespace = %scope.namespace,
            "Resolved scope"
        );

        Ok(scope)
    }

    /// Selector lists for a resolved `scope`
    ///
    /// Each level lists only children of the selected parent. An unselected
    /// parent yields the placeholder alone. Namespaces are queried only for
    /// namespaced kinds once a cluster is chosen.
    pub async fn build_cascading_options(
        &self,
        scope: &ScopeSelection,
        namespaced: bool,
    ) -> ConsoleResult<CascadingOptions> {
        let mut options = CascadingOptions::default();

        options.dc_options.push(SelectOption::placeholder(labels::DATACENTER, !scope.has_datacenter()));
        crate::log_cmdb_query!("list", "datacenter");
        for dc in self.cmdb.list_datacenters(&ListQuery::new().order("id", "0")).await? {
            let selected = dc.id == scope.datacenter_id;
            options.dc_options.push(SelectOption::new(dc.id.clone(), dc.display_name(), selected));
        }

        options.az_options.push(SelectOption::placeholder(labels::ZONE, !scope.has_zone()));
        if scope.has_datacenter() {
            crate::log_cmdb_query!("list", "availablezone", scope.datacenter_id);
            let query = ListQuery::new()
                .condition("datacenter_id", scope.datacenter_id.as_str())
                .order("id", "0");
            for zone in self.cmdb.list_zones(&query).await? {
                let selected = zone.id == scope.zone_id;
                options.az_options.push(SelectOption::new(zone.id.clone(), zone.display_name(), selected));
            }
        }

        options
            .cluster_options
            .push(SelectOption::placeholder(labels::CLUSTER, !scope.has_cluster()));
        if scope.has_zone() {
            crate::log_cmdb_query!("list", "k8scluster", scope.zone_id);
            let query = ListQuery::new()
                .condition("zone_id", scope.zone_id.as_str())
                .order("id", "0");
            for cluster in self.cmdb.list_clusters(&query).await? {
                let selected = cluster.id == scope.cluster_id;
                options
                    .cluster_options
                    .push(SelectOption::new(cluster.id.clone(), cluster.display_name(), selected));
            }
        }

        options
            .ns_options
            .push(SelectOption::placeholder(labels::NAMESPACE, !scope.has_namespace()));
        if scope.has_cluster() && namespaced {
            for name in self.namespace_names(scope).await? {
                let selected = name == scope.namespace;
                options.ns_options.push(SelectOption::new(name.clone(), name, selected));
            }
        }

        Ok(options)
    }

    /// Live namespaces of the scope's cluster. A cluster that refuses the
    /// listing still offers the namespace already selected.
    async fn namespace_names(&self, scope: &ScopeSelection) -> ConsoleResult<Vec<String>> {
        match self.namespaces.list_namespaces(&scope.cluster_id).await {
            Ok(names) => Ok(names),
            Err(e) if e.kind() == ErrorKind::ConnectionError => {
                tracing::warn!(
                    cluster_id = %scope.cluster_id,
                    code = e.code(),
                    cause = %e,
                    "Namespace listing failed, offering the selected namespace only"
                );
                Ok(if scope.has_namespace() {
                    vec![scope.namespace.clone()]
                } else {
                    Vec::new()
                })
            }
            Err(e) => Err(e),
        }
    }
}
