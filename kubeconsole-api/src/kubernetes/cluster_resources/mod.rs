//! Cluster-level kinds
//!
//! Namespaces with their quotas and limit ranges, RBAC objects and service
//! accounts.

pub mod namespaces;
pub mod quotas;
pub mod rbac;
pub mod serviceaccounts;
