//! Live-cluster access
//!
//! Provides:
//! - Credential resolution from CMDB cluster records
//! - Client construction under the cert, token and kubeconfig schemes
//! - A fingerprint-checked client cache
//! - Manifest input as JSON or multi-document YAML
//! - One resource module per listed kind (workloads, networking,
//!   configuration and storage, cluster resources)

pub mod cache;
pub mod client;
pub mod credentials;
pub mod display;
pub mod factory;
pub mod manifest;
pub mod module;

#[cfg(test)]
pub(crate) mod mock;

pub mod cluster_resources;
pub mod config_storage;
pub mod networking;
pub mod workloads;

pub use client::K8sClient;
pub use factory::{ClientFactory, NamespaceLister};
pub use manifest::ManifestSource;
pub use module::{KindModule, KindSpec, ResourceDetail, ResourceModule};
