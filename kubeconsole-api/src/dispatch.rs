//! Request dispatch
//!
//! Composes the registry, scope resolver and client factory into the
//! operations the HTTP layer exposes. Every operation resolves its module
//! first, so an unknown kind fails before any CMDB or cluster call.

use kubeconsole_common::{is_unselected, ActionId, CascadingOptions, ResourceRow, ScopeSelection};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ConsoleError, ConsoleResult};
use crate::kubernetes::{ClientFactory, K8sClient, ManifestSource, ResourceDetail, ResourceModule};
use crate::pipeline::{Column, ListPage, ListParams, OrderDirection};
use crate::registry::{Registry, ResourceKind};
use crate::scope::ScopeResolver;
use crate::validation::validate_object_name;

/// A list page together with the scope it was taken in
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub total: usize,
    pub rows: Vec<ResourceRow>,
    pub scope: ScopeSelection,
    pub options: CascadingOptions,
}

/// Static description of one module, for building its list view
#[derive(Debug, Clone, Serialize)]
pub struct ModuleMeta {
    pub kind: ResourceKind,
    pub namespaced: bool,
    pub order_fields: Vec<&'static str>,
    pub default_order_field: &'static str,
    pub default_direction: OrderDirection,
    pub actions: &'static [ActionId],
    pub columns: &'static [Column],
    pub page_size: usize,
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    factory: ClientFactory,
    scope: ScopeResolver,
    page_size: usize,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, factory: ClientFactory, scope: ScopeResolver, page_size: usize) -> Self {
        Self {
            registry,
            factory,
            scope,
            page_size,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn meta(&self, kind: &str) -> ConsoleResult<ModuleMeta> {
        let module = self.registry.resolve(kind)?;
        Ok(ModuleMeta {
            kind: module.kind(),
            namespaced: module.namespaced(),
            order_fields: module.order_field_ids(),
            default_order_field: module.default_order_field(),
            default_direction: module.default_order_direction(),
            actions: module.pop_menu_items(),
            columns: module.columns(),
            page_size: self.page_size,
        })
    }

    /// Selector lists for the resolved scope, without touching objects
    pub async fn options(&self, kind: &str, requested: &ScopeSelection) -> ConsoleResult<CascadingOptions> {
        let module = self.registry.resolve(kind)?;
        let scope = self.scope.resolve_scope(requested).await?;
        self.scope.build_cascading_options(&scope, module.namespaced()).await
    }

    /// One page of live objects. Without a cluster the page is empty.
    pub async fn list(&self, kind: &str, requested: &ScopeSelection, params: &ListParams) -> ConsoleResult<ListView> {
        let module = self.registry.resolve(kind)?;
        let scope = self.scope.resolve_scope(requested).await?;
        let options = self.scope.build_cascading_options(&scope, module.namespaced()).await?;

        let page = if scope.has_cluster() {
            let client = self.factory.resolve_client(&scope.cluster_id).await?;
            module
                .list_object_data(&client, scope.namespace_filter(), params)
                .await?
        } else {
            ListPage::empty()
        };

        Ok(ListView {
            total: page.total,
            rows: page.rows,
            scope,
            options,
        })
    }

    /// Quotas of the namespace a namespace row names, in the row's cluster
    pub async fn quota_list(
        &self,
        kind: &str,
        requested: &ScopeSelection,
        namespace: &str,
        params: &ListParams,
    ) -> ConsoleResult<ListView> {
        let scoped = self.row_scope(kind, requested, ActionId::QuotaList, namespace)?;
        self.list(ResourceKind::ResourceQuota.as_str(), &scoped, params).await
    }

    /// Create the quota or limit range a namespace row action asks for
    pub async fn add_for_row(
        &self,
        kind: &str,
        requested: &ScopeSelection,
        action: ActionId,
        namespace: &str,
        manifest: &ManifestSource,
    ) -> ConsoleResult<Vec<String>> {
        let target = match action {
            ActionId::AddQuota => ResourceKind::ResourceQuota,
            ActionId::AddLimitRange => ResourceKind::LimitRange,
            other => {
                return Err(ConsoleError::InvalidRequest(format!("action {} creates no object", other)));
            }
        };
        let scoped = self.row_scope(kind, requested, action, namespace)?;
        self.add(target.as_str(), &scoped, manifest).await
    }

    /// Scope narrowed to the namespace a row names, for actions in its catalog
    fn row_scope(
        &self,
        kind: &str,
        requested: &ScopeSelection,
        action: ActionId,
        namespace: &str,
    ) -> ConsoleResult<ScopeSelection> {
        let module = self.registry.resolve(kind)?;
        if !module.pop_menu_items().contains(&action) {
            return Err(ConsoleError::InvalidRequest(format!(
                "{} rows have no {} action",
                module.kind(),
                action
            )));
        }
        if is_unselected(namespace) {
            return Err(ConsoleError::InvalidRequest(format!("{} needs a namespace", action)));
        }

        Ok(ScopeSelection {
            namespace: namespace.trim().to_string(),
            ..requested.clone()
        })
    }

    /// Names of the live objects in scope, for reference pickers
    pub async fn names(&self, kind: &str, requested: &ScopeSelection) -> ConsoleResult<Vec<String>> {
        let (module, scope, client) = self.connect(kind, requested).await?;
        module.list_names(&client, scope.namespace_filter()).await
    }

    /// Check a proposed name before the add form is submitted
    pub async fn validate_name(&self, kind: &str, requested: &ScopeSelection, name: &str) -> ConsoleResult<()> {
        let module = self.registry.resolve(kind)?;
        validate_object_name(module.name_rule(), name.trim())?;

        let (module, scope, client) = self.connect(kind, requested).await?;
        module
            .validate_new_name(&client, scope.namespace_filter(), name.trim())
            .await
    }

    pub async fn detail(
        &self,
        kind: &str,
        requested: &ScopeSelection,
        object_id: &str,
        action: Option<ActionId>,
    ) -> ConsoleResult<ResourceDetail> {
        let (module, scope, client) = self.connect(kind, requested).await?;
        module
            .show_resource_detail(&client, scope.namespace_filter(), object_id, action)
            .await
    }

    /// Create one object per manifest document, returning their names.
    /// Documents are created in order and the first failure stops the rest.
    pub async fn add(
        &self,
        kind: &str,
        requested: &ScopeSelection,
        manifest: &ManifestSource,
    ) -> ConsoleResult<Vec<String>> {
        self.registry.resolve(kind)?;
        let documents = manifest.documents()?;
        let (module, scope, client) = self.connect(kind, requested).await?;

        let mut names = Vec::with_capacity(documents.len());
        for document in documents {
            let name = module
                .add_new_resource(&client, scope.namespace_filter(), document)
                .await?;
            names.push(name);
        }
        Ok(names)
    }

    /// Delete the selected objects, returning how many were removed
    pub async fn delete(
        &self,
        kind: &str,
        requested: &ScopeSelection,
        object_ids: &[String],
        action: Option<ActionId>,
    ) -> ConsoleResult<usize> {
        let (module, scope, client) = self.connect(kind, requested).await?;
        module
            .del_resource(&client, scope.namespace_filter(), object_ids, action)
            .await
    }

    async fn connect(
        &self,
        kind: &str,
        requested: &ScopeSelection,
    ) -> ConsoleResult<(Arc<dyn ResourceModule>, ScopeSelection, K8sClient)> {
        let module = self.registry.resolve(kind)?;
        let scope = self.scope.resolve_scope(requested).await?;
        if !scope.has_cluster() {
            return Err(ConsoleError::InvalidScope("no cluster selected".to_string()));
        }
        let client = self.factory.resolve_client(&scope.cluster_id).await?;
        Ok((module, scope, client))
    }
}
