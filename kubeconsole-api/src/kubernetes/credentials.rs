//! Cluster credential resolution
//!
//! Loads a cluster's connection record from the CMDB and reduces it to the
//! tuple the client factory consumes.

use kubeconsole_common::{ClusterRecord, ConnectScheme};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::cmdb::CmdbAccessor;
use crate::error::{ConsoleError, ConsoleResult};

/// User name used when a cert-scheme record leaves it blank
pub const DEFAULT_CLUSTER_USER: &str = "kubernetes-admin";

/// Namespace bound to the synthesised context
pub const DEFAULT_NAMESPACE: &str = "default";

/// Everything needed to authenticate to one cluster
#[derive(Clone, Hash)]
pub struct ConnectionRequest {
    pub scheme: ConnectScheme,
    pub api_server: String,
    pub cluster_id: String,
    pub cluster_name: String,
    pub username: String,
    pub ca: String,
    pub cert: String,
    pub key: String,
    pub token: String,
    pub kubeconfig: String,
    pub updated_at: i64,
}

impl From<&ClusterRecord> for ConnectionRequest {
    fn from(record: &ClusterRecord) -> Self {
        Self {
            scheme: record.connect_scheme,
            api_server: record.api_server.clone(),
            cluster_id: record.id.clone(),
            cluster_name: record.display_name().to_string(),
            username: record.cluster_user.clone(),
            ca: record.ca.clone(),
            cert: record.cert.clone(),
            key: record.key.clone(),
            token: record.token.clone(),
            kubeconfig: record.kubeconfig.clone(),
            updated_at: record.updated_at,
        }
    }
}

impl ConnectionRequest {
    /// Hash over every credential input; changes whenever the record is edited
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// User name for cert-scheme contexts
    pub fn effective_username(&self) -> &str {
        let name = self.username.trim();
        if name.is_empty() {
            DEFAULT_CLUSTER_USER
        } else {
            name
        }
    }
}

impl std::fmt::Debug for ConnectionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRequest")
            .field("scheme", &self.scheme)
            .field("api_server", &self.api_server)
            .field("cluster_id", &self.cluster_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Load a live cluster record; absent and soft-deleted records are `NotFound`
pub async fn load_cluster(cmdb: &dyn CmdbAccessor, cluster_id: &str) -> ConsoleResult<ClusterRecord> {
    match cmdb.get_cluster(cluster_id).await? {
        Some(record) if !record.is_deleted => Ok(record),
        _ => Err(ConsoleError::ClusterNotFound(cluster_id.to_string())),
    }
}
