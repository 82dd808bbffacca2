//! Kubeconsole API Library
//!
//! Resource dispatch and live-cluster access for a multi-cluster
//! Kubernetes console, exposed for the server binary, tests and benches.

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Application state
pub mod state;
pub use state::AppState;

// Configuration store
pub mod cmdb;

// Cluster access and resource modules
pub mod kubernetes;
pub mod registry;

// List views
pub mod actions;
pub mod pipeline;
pub mod scope;
pub mod validation;

// Request handling
pub mod dispatch;
pub mod handlers;
