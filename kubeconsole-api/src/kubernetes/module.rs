//! The uniform resource module contract
//!
//! Each kind describes itself once through [`KindSpec`]: its typed object,
//! columns, comparators and action rules. [`KindModule`] turns any such
//! description into an object-safe [`ResourceModule`] the registry can hold.

use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, DeleteParams, ListParams as KubeListParams, PostParams};
use kube::{Client, Resource, ResourceExt};
use kubeconsole_common::{ActionId, ResourceRow};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use super::client::K8sClient;
use super::display;
use crate::actions;
use crate::error::{ConsoleError, ConsoleResult};
use crate::pipeline::{Column, ListPage, ListParams, ListPipeline, OrderDirection, OrderField};
use crate::registry::ResourceKind;
use crate::validation::{validate_object_name, NameRule};

/// Read-only description of a live object, returned by detail views
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDetail {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
    pub created: String,
    /// The object rendered as YAML, without managed fields
    pub manifest: String,
    /// Row columns keyed by column title
    pub summary: BTreeMap<String, String>,
}

/// Static description of one resource kind
#[async_trait]
pub trait KindSpec: Send + Sync + 'static {
    type Object: Resource<DynamicType = ()>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize
        + Send
        + Sync
        + 'static;

    /// Cross-references resolved once per page
    type Related: Default + Send + Sync;

    const KIND: ResourceKind;
    const NAMESPACED: bool;
    const COLUMNS: &'static [Column];
    const ACTIONS: &'static [ActionId] = actions::EDIT_DELETE;
    const DEFAULT_ORDER_FIELD: &'static str = "TD1";
    const DEFAULT_DIRECTION: OrderDirection = OrderDirection::Reversed;
    const NAME_RULE: NameRule = NameRule::Subdomain;

    /// Name and creation time, the latter keyed by the last column
    fn order_fields() -> Vec<OrderField<Self::Object>> {
        let mut fields = vec![OrderField::new("TD1", by_name::<Self::Object>)];
        if let Some(created) = Self::COLUMNS.last().filter(|c| c.id != "TD1") {
            fields.push(OrderField::new(created.id, by_creation::<Self::Object>));
        }
        fields
    }

    /// Api handle, all namespaces when `namespace` is `None`
    fn api(client: &Client, namespace: Option<&str>) -> Api<Self::Object>;

    /// Display values in `COLUMNS` order
    fn row_columns(obj: &Self::Object) -> Vec<String>;

    fn permitted_actions(_obj: &Self::Object, _related: &Self::Related) -> Vec<ActionId> {
        actions::edit_delete()
    }

    async fn resolve_related(_client: &Client, _page: &[Self::Object]) -> ConsoleResult<Self::Related> {
        Ok(Self::Related::default())
    }

    /// Detail views other than the object's own
    async fn action_detail(
        _client: &Client,
        _namespace: Option<&str>,
        _name: &str,
        action: ActionId,
    ) -> ConsoleResult<ResourceDetail> {
        Err(unsupported::<Self>(action))
    }

    /// Deletions other than the object itself
    async fn action_delete(
        _client: &Client,
        _namespace: Option<&str>,
        _name: &str,
        action: ActionId,
    ) -> ConsoleResult<()> {
        Err(unsupported::<Self>(action))
    }
}

fn unsupported<K: KindSpec + ?Sized>(action: ActionId) -> ConsoleError {
    ConsoleError::InvalidRequest(format!("action {} is not supported for {}", action, K::KIND))
}

pub fn by_name<T: Resource>(a: &T, b: &T) -> Ordering {
    a.meta().name.cmp(&b.meta().name)
}

pub fn by_creation<T: Resource>(a: &T, b: &T) -> Ordering {
    let created = |o: &T| o.meta().creation_timestamp.as_ref().map(|t| t.0);
    created(a).cmp(&created(b))
}

/// Api for a namespaced kind, cluster-wide without a namespace filter
pub fn namespaced_api<T>(client: &Client, namespace: Option<&str>) -> Api<T>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
{
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

pub fn cluster_api<T>(client: &Client) -> Api<T>
where
    T: Resource<DynamicType = ()>,
{
    Api::all(client.clone())
}

/// Project one object into a list row
pub fn project_row<K: KindSpec>(obj: &K::Object, related: &K::Related) -> ResourceRow {
    let mut row = ResourceRow::new(obj.name_any());
    row.columns = K::COLUMNS
        .iter()
        .map(|column| column.id.to_string())
        .zip(K::row_columns(obj))
        .collect();
    row.permitted_action_ids = K::permitted_actions(obj, related);
    row
}

/// Render `obj` as a detail view
pub fn describe<K: KindSpec>(obj: &K::Object) -> ConsoleResult<ResourceDetail> {
    let mut trimmed = obj.clone();
    trimmed.meta_mut().managed_fields = None;
    let manifest = serde_yaml::to_string(&trimmed).map_err(|e| ConsoleError::InvalidManifest(e.to_string()))?;

    let summary = K::COLUMNS
        .iter()
        .map(|column| column.title.to_string())
        .zip(K::row_columns(obj))
        .collect();

    Ok(ResourceDetail {
        kind: K::KIND.to_string(),
        name: obj.name_any(),
        namespace: obj.namespace(),
        created: display::created(obj.meta()),
        manifest,
        summary,
    })
}

/// Keep objects whose name contains `term`
pub fn filter_by_name<T: Resource>(items: &mut Vec<T>, term: Option<&str>) {
    if let Some(term) = term {
        items.retain(|obj| obj.meta().name.as_deref().unwrap_or_default().contains(term));
    }
}

/// Object-safe contract every registered kind fulfils
#[async_trait]
pub trait ResourceModule: Send + Sync {
    fn kind(&self) -> ResourceKind;

    fn namespaced(&self) -> bool;

    fn order_field_ids(&self) -> Vec<&'static str>;

    fn default_order_field(&self) -> &'static str;

    fn default_order_direction(&self) -> OrderDirection;

    /// Every action a row of this kind may ever offer
    fn pop_menu_items(&self) -> &'static [ActionId];

    fn columns(&self) -> &'static [Column];

    /// DNS-1123 form new object names must take
    fn name_rule(&self) -> NameRule;

    /// Fetch, filter, sort, page and project the live objects of this kind
    async fn list_object_data(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        params: &ListParams,
    ) -> ConsoleResult<ListPage>;

    /// Sorted names of the live objects in `namespace`, or everywhere
    async fn list_names(&self, client: &K8sClient, namespace: Option<&str>) -> ConsoleResult<Vec<String>>;

    /// Accept `name` for a new object only if well formed and unused
    async fn validate_new_name(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        name: &str,
    ) -> ConsoleResult<()>;

    /// Create an object from one manifest document, returning its name
    async fn add_new_resource(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        manifest: serde_json::Value,
    ) -> ConsoleResult<String>;

    /// Delete the named objects, or run a row action's deletion on each
    async fn del_resource(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        object_ids: &[String],
        action: Option<ActionId>,
    ) -> ConsoleResult<usize>;

    async fn show_resource_detail(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        name: &str,
        action: Option<ActionId>,
    ) -> ConsoleResult<ResourceDetail>;
}

/// [`ResourceModule`] for any [`KindSpec`]
pub struct KindModule<K> {
    pipeline: ListPipeline,
    _kind: PhantomData<fn() -> K>,
}

impl<K: KindSpec> KindModule<K> {
    pub fn new(pipeline: ListPipeline) -> Self {
        Self {
            pipeline,
            _kind: PhantomData,
        }
    }

    fn require_namespace<'a>(&self, namespace: Option<&'a str>) -> ConsoleResult<Option<&'a str>> {
        if !K::NAMESPACED {
            return Ok(None);
        }
        namespace.map(Some).ok_or_else(|| {
            ConsoleError::InvalidScope(format!("{} operations need a namespace", K::KIND))
        })
    }

    /// Sort, page and project already fetched objects
    pub async fn paginate(
        &self,
        client: &Client,
        items: Vec<K::Object>,
        params: &ListParams,
    ) -> ConsoleResult<ListPage> {
        let fields = K::order_fields();
        self.pipeline
            .run(
                items,
                &fields,
                (K::DEFAULT_ORDER_FIELD, K::DEFAULT_DIRECTION),
                params,
                |page| async move {
                    let related = K::resolve_related(client, &page).await?;
                    Ok(page.iter().map(|obj| project_row::<K>(obj, &related)).collect())
                },
            )
            .await
    }
}

#[async_trait]
impl<K: KindSpec> ResourceModule for KindModule<K> {
    fn kind(&self) -> ResourceKind {
        K::KIND
    }

    fn namespaced(&self) -> bool {
        K::NAMESPACED
    }

    fn order_field_ids(&self) -> Vec<&'static str> {
        K::order_fields().iter().map(|field| field.id).collect()
    }

    fn default_order_field(&self) -> &'static str {
        K::DEFAULT_ORDER_FIELD
    }

    fn default_order_direction(&self) -> OrderDirection {
        K::DEFAULT_DIRECTION
    }

    fn pop_menu_items(&self) -> &'static [ActionId] {
        K::ACTIONS
    }

    fn columns(&self) -> &'static [Column] {
        K::COLUMNS
    }

    fn name_rule(&self) -> NameRule {
        K::NAME_RULE
    }

    async fn list_object_data(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        params: &ListParams,
    ) -> ConsoleResult<ListPage> {
        crate::log_k8s_operation!("list", client.cluster_id(), K::KIND, namespace = namespace.unwrap_or("*"));

        let namespace = if K::NAMESPACED { namespace } else { None };
        let list = K::api(client.inner(), namespace)
            .list(&KubeListParams::default())
            .await?;

        let mut items = list.items;
        filter_by_name(&mut items, params.search_term());

        self.paginate(client.inner(), items, params).await
    }

    async fn list_names(&self, client: &K8sClient, namespace: Option<&str>) -> ConsoleResult<Vec<String>> {
        crate::log_k8s_operation!("list", client.cluster_id(), K::KIND, namespace = namespace.unwrap_or("*"));

        let namespace = if K::NAMESPACED { namespace } else { None };
        let list = K::api(client.inner(), namespace)
            .list(&KubeListParams::default())
            .await?;

        let mut names: Vec<String> = list.items.into_iter().filter_map(|obj| obj.meta().name.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn validate_new_name(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        name: &str,
    ) -> ConsoleResult<()> {
        let namespace = self.require_namespace(namespace)?;
        validate_object_name(K::NAME_RULE, name)?;

        crate::log_k8s_operation!("get", client.cluster_id(), K::KIND, name = name);
        let existing = K::api(client.inner(), namespace).get_opt(name).await?;
        if existing.is_some() {
            return Err(ConsoleError::NameTaken {
                kind: K::KIND.to_string(),
                name: name.to_string(),
                namespace: namespace.unwrap_or("-").to_string(),
            });
        }
        Ok(())
    }

    async fn add_new_resource(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        mut manifest: serde_json::Value,
    ) -> ConsoleResult<String> {
        let fields = manifest
            .as_object_mut()
            .ok_or_else(|| ConsoleError::InvalidManifest("manifest must be a JSON object".to_string()))?;
        let expected = K::Object::kind(&()).to_string();
        match fields.get("kind").and_then(serde_json::Value::as_str) {
            Some(found) if found != expected => {
                return Err(ConsoleError::InvalidManifest(format!(
                    "expected a {} manifest, found {}",
                    expected, found
                )));
            }
            _ => {}
        }
        fields
            .entry("apiVersion")
            .or_insert_with(|| K::Object::api_version(&()).into());
        fields.entry("kind").or_insert_with(|| expected.into());

        let mut object: K::Object =
            serde_json::from_value(manifest).map_err(|e| ConsoleError::InvalidManifest(e.to_string()))?;

        if object.meta().name.is_none() && object.meta().generate_name.is_none() {
            return Err(ConsoleError::InvalidManifest("metadata.name is required".to_string()));
        }

        let namespace = if K::NAMESPACED {
            let ns = namespace
                .map(str::to_string)
                .or_else(|| object.meta().namespace.clone())
                .ok_or_else(|| ConsoleError::InvalidScope(format!("{} needs a namespace", K::KIND)))?;
            object.meta_mut().namespace = Some(ns.clone());
            Some(ns)
        } else {
            object.meta_mut().namespace = None;
            None
        };

        let name = object.name_any();
        crate::log_k8s_operation!("create", client.cluster_id(), K::KIND, name = name.as_str());

        let created = K::api(client.inner(), namespace.as_deref())
            .create(&PostParams::default(), &object)
            .await?;

        tracing::info!(
            cluster_id = %client.cluster_id(),
            kind = %K::KIND,
            name = %created.name_any(),
            "Created resource"
        );

        Ok(created.name_any())
    }

    async fn del_resource(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        object_ids: &[String],
        action: Option<ActionId>,
    ) -> ConsoleResult<usize> {
        let namespace = self.require_namespace(namespace)?;
        let names: Vec<&str> = object_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        if names.is_empty() {
            return Err(ConsoleError::InvalidRequest("no object selected".to_string()));
        }

        let api = K::api(client.inner(), namespace);
        for name in &names {
            crate::log_k8s_operation!("delete", client.cluster_id(), K::KIND, name = *name);
            match action {
                None | Some(ActionId::Delete) => {
                    api.delete(name, &DeleteParams::default())
                        .await
                        .map_err(|e| ConsoleError::from_lookup(e, K::KIND.as_str(), name, namespace))?;
                }
                Some(other) => K::action_delete(client.inner(), namespace, name, other).await?,
            }
        }

        tracing::info!(
            cluster_id = %client.cluster_id(),
            kind = %K::KIND,
            count = names.len(),
            "Deleted resources"
        );

        Ok(names.len())
    }

    async fn show_resource_detail(
        &self,
        client: &K8sClient,
        namespace: Option<&str>,
        name: &str,
        action: Option<ActionId>,
    ) -> ConsoleResult<ResourceDetail> {
        let namespace = self.require_namespace(namespace)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConsoleError::InvalidRequest("object id is empty".to_string()));
        }

        crate::log_k8s_operation!("get", client.cluster_id(), K::KIND, name = name);

        match action {
            None | Some(ActionId::Detail) | Some(ActionId::Edit) => {
                let obj = K::api(client.inner(), namespace)
                    .get(name)
                    .await
                    .map_err(|e| ConsoleError::from_lookup(e, K::KIND.as_str(), name, namespace))?;
                describe::<K>(&obj)
            }
            Some(other) => K::action_detail(client.inner(), namespace, name, other).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::kubernetes::config_storage::configmaps::ConfigMaps;
    use crate::kubernetes::mock::{core_object, list_of, scripted_client, Step};
    use http::Method;
    use serde_json::json;

    const TEAM_A: &str = "/api/v1/namespaces/team-a/configmaps";

    fn module() -> KindModule<ConfigMaps> {
        KindModule::new(ListPipeline::new(2))
    }

    fn config_map(name: &str, namespace: &str) -> serde_json::Value {
        let mut map = core_object("ConfigMap", name, Some(namespace));
        map["data"] = json!({ "key": "value" });
        map
    }

    fn ascending() -> ListParams {
        ListParams {
            direction: Some("0".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_without_namespace_spans_the_cluster() {
        let items = vec![config_map("c", "x"), config_map("a", "x"), config_map("b", "y")];
        let (client, server) = scripted_client(vec![Step::get("/api/v1/configmaps", list_of("ConfigMap", items))]);

        let page = module().list_object_data(&client, None, &ascending()).await.unwrap();
        assert_eq!(page.total, 3);
        let ids: Vec<&str> = page.rows.iter().map(|r| r.object_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(page.rows[1].column("TD2"), Some("y"));

        assert_eq!(server.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_in_namespace_filters_by_search() {
        let items = vec![config_map("settings", "team-a"), config_map("flags", "team-a")];
        let (client, server) = scripted_client(vec![Step::get(TEAM_A, list_of("ConfigMap", items))]);

        let params = ListParams {
            search_content: Some("set".into()),
            ..ascending()
        };
        let page = module().list_object_data(&client, Some("team-a"), &params).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].object_id, "settings");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_add_uses_scope_namespace_over_manifest() {
        let (client, server) = scripted_client(vec![Step::create(TEAM_A)]);

        let manifest = json!({
            "metadata": { "name": "settings", "namespace": "elsewhere" },
            "data": { "key": "value" }
        });
        let name = module().add_new_resource(&client, Some("team-a"), manifest).await.unwrap();
        assert_eq!(name, "settings");

        let served = server.await.unwrap();
        let body = served[0].body.as_ref().unwrap();
        assert_eq!(body["metadata"]["namespace"], "team-a");
        assert_eq!(body["kind"], "ConfigMap");
        assert_eq!(body["apiVersion"], "v1");
    }

    #[tokio::test]
    async fn test_add_rejects_a_manifest_of_another_kind() {
        let (client, server) = scripted_client(Vec::new());

        let manifest = json!({ "kind": "Secret", "metadata": { "name": "db" } });
        let err = module().add_new_resource(&client, Some("team-a"), manifest).await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidManifest(_)));
        assert!(server.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_without_any_namespace_is_rejected() {
        let (client, _server) = scripted_client(Vec::new());

        let manifest = json!({ "metadata": { "name": "settings" } });
        let err = module().add_new_resource(&client, None, manifest).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn test_partial_delete_fails() {
        let (client, server) = scripted_client(vec![
            Step::delete(&format!("{}/a", TEAM_A), config_map("a", "team-a")),
            Step::not_found(Method::DELETE, &format!("{}/b", TEAM_A)),
        ]);

        let ids = vec!["a".to_string(), "b".to_string()];
        let err = module().del_resource(&client, Some("team-a"), &ids, None).await.unwrap_err();
        assert!(matches!(err, ConsoleError::ResourceNotFound { ref name, .. } if name == "b"));
        assert_eq!(server.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_needs_namespace_and_ids() {
        let (client, _server) = scripted_client(Vec::new());

        let err = module().del_resource(&client, None, &["a".to_string()], None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let err = module().del_resource(&client, Some("team-a"), &[" ".to_string()], None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn test_detail_renders_yaml_and_summary() {
        let (client, _server) = scripted_client(vec![Step::get(
            &format!("{}/settings", TEAM_A),
            config_map("settings", "team-a"),
        )]);

        let detail = module()
            .show_resource_detail(&client, Some("team-a"), "settings", None)
            .await
            .unwrap();
        assert_eq!(detail.name, "settings");
        assert_eq!(detail.namespace.as_deref(), Some("team-a"));
        assert!(detail.manifest.contains("name: settings"));
        assert_eq!(detail.summary.get("Data items").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn test_detail_of_missing_object_is_not_found() {
        let (client, _server) = scripted_client(vec![Step::not_found(Method::GET, &format!("{}/gone", TEAM_A))]);

        let err = module()
            .show_resource_detail(&client, Some("team-a"), "gone", Some(ActionId::Edit))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_names_are_sorted() {
        let items = vec![config_map("c", "team-a"), config_map("a", "team-a"), config_map("b", "team-a")];
        let (client, _server) = scripted_client(vec![Step::get(TEAM_A, list_of("ConfigMap", items))]);

        let names = module().list_names(&client, Some("team-a")).await.unwrap();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_validate_new_name() {
        let (client, server) = scripted_client(vec![
            Step::get(&format!("{}/settings", TEAM_A), config_map("settings", "team-a")),
            Step::not_found(Method::GET, &format!("{}/fresh", TEAM_A)),
        ]);
        let module = module();

        let err = module.validate_new_name(&client, Some("team-a"), "settings").await.unwrap_err();
        assert!(matches!(err, ConsoleError::NameTaken { .. }));
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        module.validate_new_name(&client, Some("team-a"), "fresh").await.unwrap();

        let err = module.validate_new_name(&client, Some("team-a"), "Bad_Name").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidRequest(_)));

        assert_eq!(server.await.unwrap().len(), 2);
    }
}
