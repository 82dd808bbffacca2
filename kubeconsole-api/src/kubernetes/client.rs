//! Kubernetes client wrapper
//!
//! Builds an authenticated kube-rs Client from a [`ConnectionRequest`] through
//! exactly one of three paths: client certificate, bearer token, or a stored
//! kubeconfig document.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use kubeconsole_common::ConnectScheme;

use super::credentials::{ConnectionRequest, DEFAULT_NAMESPACE};
use crate::config::KubernetesConfig;
use crate::error::{ConsoleError, ConsoleResult};

/// Wrapper around kube-rs Client with cluster context
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    cluster_id: String,
    cluster_name: String,
    api_server: String,
}

impl K8sClient {
    /// Build a client for the cluster described by `request`.
    ///
    /// No request is sent to the API server here; malformed credentials fail
    /// with a connection error, unreachable servers fail on first use.
    pub async fn connect(request: &ConnectionRequest, settings: &KubernetesConfig) -> ConsoleResult<Self> {
        let mut config = build_config(request).await?;
        config.connect_timeout = settings.connect_timeout();
        config.read_timeout = settings.read_timeout();

        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config).map_err(|e| {
            ConsoleError::invalid_credentials(&request.cluster_id, format!("Failed to create client: {}", e))
        })?;

        Ok(Self {
            inner: client,
            cluster_id: request.cluster_id.clone(),
            cluster_name: request.cluster_name.clone(),
            api_server,
        })
    }

    /// Wrap an already built client, e.g. one over a custom tower service
    pub fn from_client(client: Client, cluster_id: impl Into<String>, cluster_name: impl Into<String>) -> Self {
        Self {
            inner: client,
            cluster_id: cluster_id.into(),
            cluster_name: cluster_name.into(),
            api_server: String::new(),
        }
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn api_server(&self) -> &str {
        &self.api_server
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("cluster_id", &self.cluster_id)
            .field("cluster_name", &self.cluster_name)
            .field("api_server", &self.api_server)
            .finish()
    }
}

/// Turn a connection request into a kube-rs Config
pub async fn build_config(request: &ConnectionRequest) -> ConsoleResult<Config> {
    let kubeconfig = match request.scheme {
        ConnectScheme::Cert => cert_kubeconfig(request)?,
        ConnectScheme::Token => token_kubeconfig(request)?,
        // Address, CA, cert, key and token columns are not consulted here.
        ConnectScheme::Kubeconfig => Kubeconfig::from_yaml(request.kubeconfig.trim()).map_err(|e| {
            ConsoleError::invalid_credentials(&request.cluster_id, format!("Failed to parse kubeconfig: {}", e))
        })?,
    };

    Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| {
            ConsoleError::invalid_credentials(&request.cluster_id, format!("Failed to create config: {}", e))
        })
}

/// Trim, lowercase and default the scheme of an API server address
pub fn normalize_api_server(raw: &str) -> Option<String> {
    let address = raw.trim().to_lowercase();
    if address.is_empty() {
        return None;
    }

    let address = if address.starts_with("https://") || address.starts_with("http://") {
        address
    } else {
        format!("https://{}", address)
    };

    url::Url::parse(&address)
        .ok()
        .filter(|url| url.host_str().is_some())
        .map(|_| address)
}

/// Kubeconfig `*-data` fields carry base64; records may hold raw PEM
fn encode_material(value: &str) -> String {
    let value = value.trim();
    if value.starts_with("-----BEGIN") {
        STANDARD.encode(value)
    } else {
        value.to_string()
    }
}

fn require_address(request: &ConnectionRequest) -> ConsoleResult<String> {
    normalize_api_server(&request.api_server).ok_or_else(|| {
        ConsoleError::invalid_credentials(&request.cluster_id, "the address of api server is not valid")
    })
}

fn require(request: &ConnectionRequest, value: &str, what: &str) -> ConsoleResult<()> {
    if value.trim().is_empty() {
        return Err(ConsoleError::invalid_credentials(
            &request.cluster_id,
            format!("{} is empty", what),
        ));
    }
    Ok(())
}

fn cert_kubeconfig(request: &ConnectionRequest) -> ConsoleResult<Kubeconfig> {
    let server = require_address(request)?;
    require(request, &request.ca, "CA certificate")?;
    require(request, &request.cert, "client certificate")?;
    require(request, &request.key, "client key")?;

    let user = request.effective_username();
    let document = serde_json::json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{
            "name": request.cluster_id,
            "cluster": {
                "server": server,
                "certificate-authority-data": encode_material(&request.ca),
            }
        }],
        "users": [{
            "name": user,
            "user": {
                "username": user,
                "client-certificate-data": encode_material(&request.cert),
                "client-key-data": encode_material(&request.key),
            }
        }],
        "contexts": [{
            "name": request.cluster_id,
            "context": {
                "cluster": request.cluster_id,
                "user": user,
                "namespace": DEFAULT_NAMESPACE,
            }
        }],
        "current-context": request.cluster_id,
    });

    serde_json::from_value(document).map_err(|e| {
        ConsoleError::invalid_credentials(&request.cluster_id, format!("Failed to assemble kubeconfig: {}", e))
    })
}

fn token_kubeconfig(request: &ConnectionRequest) -> ConsoleResult<Kubeconfig> {
    let server = require_address(request)?;
    require(request, &request.token, "bearer token")?;

    let mut cluster = serde_json::json!({ "server": server });
    if !request.ca.trim().is_empty() {
        cluster["certificate-authority-data"] = encode_material(&request.ca).into();
    }

    let document = serde_json::json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{ "name": request.cluster_id, "cluster": cluster }],
        "users": [{
            "name": "token-user",
            "user": { "token": request.token.trim() }
        }],
        "contexts": [{
            "name": request.cluster_id,
            "context": {
                "cluster": request.cluster_id,
                "user": "token-user",
                "namespace": DEFAULT_NAMESPACE,
            }
        }],
        "current-context": request.cluster_id,
    });

    serde_json::from_value(document).map_err(|e| {
        ConsoleError::invalid_credentials(&request.cluster_id, format!("Failed to assemble kubeconfig: {}", e))
    })
}
