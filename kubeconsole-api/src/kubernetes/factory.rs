//! Per-request client construction
//!
//! The factory reads the cluster record on every call, so credential edits in
//! the CMDB take effect on the next request. Built clients may be reused for a
//! short while, but only when the credential fingerprint is unchanged.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, ListParams};
use std::sync::Arc;

use super::cache::ClientCache;
use super::client::K8sClient;
use super::credentials::{load_cluster, ConnectionRequest};
use crate::cmdb::CmdbAccessor;
use crate::config::KubernetesConfig;
use crate::error::ConsoleResult;

/// Lists the live namespaces of a cluster
#[async_trait]
pub trait NamespaceLister: Send + Sync {
    async fn list_namespaces(&self, cluster_id: &str) -> ConsoleResult<Vec<String>>;
}

/// Builds authenticated clients for CMDB clusters
#[derive(Clone)]
pub struct ClientFactory {
    cmdb: Arc<dyn CmdbAccessor>,
    settings: KubernetesConfig,
    cache: Option<ClientCache<K8sClient>>,
}

impl ClientFactory {
    pub fn new(cmdb: Arc<dyn CmdbAccessor>, settings: KubernetesConfig) -> Self {
        let cache = ClientCache::from_config(&settings.client_cache);
        Self { cmdb, settings, cache }
    }

    /// Client for `cluster_id`
    ///
    /// Fails with `NotFound` for absent or soft-deleted records and with a
    /// connection error when the stored credentials cannot produce a client.
    pub async fn resolve_client(&self, cluster_id: &str) -> ConsoleResult<K8sClient> {
        let record = load_cluster(self.cmdb.as_ref(), cluster_id).await?;
        let request = ConnectionRequest::from(&record);
        let fingerprint = request.fingerprint();

        if let Some(cache) = &self.cache {
            if let Some(client) = cache.get(cluster_id, fingerprint).await {
                tracing::debug!(cluster_id, "Reusing cached cluster client");
                return Ok(client);
            }
        }

        let client = K8sClient::connect(&request, &self.settings).await?;

        if let Some(cache) = &self.cache {
            cache.insert(cluster_id, fingerprint, client.clone()).await;
        }

        tracing::info!(
            cluster_id,
            cluster = %client.cluster_name(),
            scheme = %request.scheme,
            "Built client for cluster"
        );

        Ok(client)
    }

    /// Drop any cached client for `cluster_id`
    pub async fn invalidate(&self, cluster_id: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(cluster_id).await;
        }
    }

    pub fn cmdb(&self) -> &Arc<dyn CmdbAccessor> {
        &self.cmdb
    }
}

#[async_trait]
impl NamespaceLister for ClientFactory {
    async fn list_namespaces(&self, cluster_id: &str) -> ConsoleResult<Vec<String>> {
        let client = self.resolve_client(cluster_id).await?;
        crate::log_k8s_operation!("list", cluster_id, "namespace");

        let api: Api<Namespace> = Api::all(client.inner().clone());
        let list = api.list(&ListParams::default()).await?;

        let mut names: Vec<String> = list.items.into_iter().filter_map(|ns| ns.metadata.name).collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmdb::MemoryCmdb;
    use crate::error::ErrorKind;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use kubeconsole_common::{ClusterRecord, ConnectScheme, RecordStatus};

    const TEST_CA: &str = include_str!("../../tests/fixtures/ca.pem");

    fn stored_kubeconfig() -> String {
        format!(
            "
apiVersion: v1
kind: Config
clusters:
- name: lab
  cluster:
    server: https://lab.example.com:6443
    certificate-authority-data: {}
users:
- name: lab
  user:
    token: t0ken
contexts:
- name: lab
  context:
    cluster: lab
    user: lab
current-context: lab
",
            STANDARD.encode(TEST_CA)
        )
    }

    fn cluster(id: &str, scheme: ConnectScheme) -> ClusterRecord {
        ClusterRecord {
            id: id.into(),
            datacenter_id: "d1".into(),
            zone_id: "z1".into(),
            cn_name: String::new(),
            en_name: "lab".into(),
            api_server: "https://10.1.1.1:6443".into(),
            connect_scheme: scheme,
            cluster_user: String::new(),
            ca: TEST_CA.into(),
            cert: String::new(),
            key: String::new(),
            token: "t0ken".into(),
            kubeconfig: stored_kubeconfig(),
            version: String::new(),
            runtime: String::new(),
            pod_cidr: String::new(),
            service_cidr: String::new(),
            status: RecordStatus::Enabled,
            is_deleted: false,
            updated_at: 1,
        }
    }

    fn factory(cmdb: &MemoryCmdb) -> ClientFactory {
        ClientFactory::new(Arc::new(cmdb.clone()), KubernetesConfig::default())
    }

    #[tokio::test]
    async fn test_unknown_cluster_is_not_found() {
        let cmdb = MemoryCmdb::new();
        let err = factory(&cmdb).resolve_client("missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cert_scheme_with_empty_key_is_connection_error() {
        let cmdb = MemoryCmdb::new();
        let mut record = cluster("c1", ConnectScheme::Cert);
        record.cert = TEST_CA.into();
        cmdb.insert_cluster(record).await;

        let err = factory(&cmdb).resolve_client("c1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionError);
    }

    #[tokio::test]
    async fn test_kubeconfig_scheme_uses_document_server() {
        let cmdb = MemoryCmdb::new();
        cmdb.insert_cluster(cluster("c1", ConnectScheme::Kubeconfig)).await;

        let client = factory(&cmdb).resolve_client("c1").await.unwrap();
        assert!(client.api_server().contains("lab.example.com"));
        assert_eq!(client.cluster_name(), "lab");
    }

    #[tokio::test]
    async fn test_credential_edit_takes_effect() {
        let cmdb = MemoryCmdb::new();
        cmdb.insert_cluster(cluster("c1", ConnectScheme::Token)).await;
        let factory = factory(&cmdb);

        let first = factory.resolve_client("c1").await.unwrap();
        assert!(first.api_server().contains("10.1.1.1"));

        let mut edited = cluster("c1", ConnectScheme::Token);
        edited.api_server = "https://10.2.2.2:6443".into();
        edited.updated_at = 2;
        cmdb.insert_cluster(edited).await;

        let second = factory.resolve_client("c1").await.unwrap();
        assert!(second.api_server().contains("10.2.2.2"));
    }

    #[tokio::test]
    async fn test_soft_delete_takes_effect_despite_cache() {
        let cmdb = MemoryCmdb::new();
        cmdb.insert_cluster(cluster("c1", ConnectScheme::Token)).await;
        let factory = factory(&cmdb);
        factory.resolve_client("c1").await.unwrap();

        let mut deleted = cluster("c1", ConnectScheme::Token);
        deleted.is_deleted = true;
        cmdb.insert_cluster(deleted).await;

        let err = factory.resolve_client("c1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
