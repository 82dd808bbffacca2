//! Application State
//!
//! Shared state for the Kubeconsole API server

use std::sync::Arc;

use crate::cmdb::CmdbAccessor;
use crate::config::ConsoleConfig;
use crate::dispatch::Dispatcher;
use crate::kubernetes::ClientFactory;
use crate::registry::Registry;
use crate::scope::ScopeResolver;

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConsoleConfig>,
    pub cmdb: Arc<dyn CmdbAccessor>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Wire the registry, scope resolver and client factory around `cmdb`
    pub fn new(config: Arc<ConsoleConfig>, cmdb: Arc<dyn CmdbAccessor>) -> Self {
        let page_size = config.paging.page_size;
        let factory = ClientFactory::new(cmdb.clone(), config.kubernetes.clone());
        let scope = ScopeResolver::new(cmdb.clone(), Arc::new(factory.clone()));
        let registry = Arc::new(Registry::new(page_size));
        let dispatcher = Arc::new(Dispatcher::new(registry, factory, scope, page_size));

        Self {
            config,
            cmdb,
            dispatcher,
        }
    }
}
