//! Namespace list view
//!
//! Namespace rows advertise quota and limit-range actions, so each page needs
//! to know which namespaces already hold such objects. Both sets are fetched
//! with one cluster-wide list per page.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{LimitRange, Namespace, ResourceQuota};
use kube::api::{DeleteParams, ListParams};
use kube::{Api, Client, Resource};
use kubeconsole_common::ActionId;
use std::collections::HashMap;

use super::quotas::LimitRanges;
use crate::actions;
use crate::error::{ConsoleError, ConsoleResult};
use crate::kubernetes::display;
use crate::kubernetes::module::{cluster_api, describe, KindSpec, ResourceDetail};
use crate::pipeline::Column;
use crate::registry::ResourceKind;
use crate::validation::NameRule;

pub struct Namespaces;

/// Quota and limit-range counts per namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceUsage {
    pub quotas: HashMap<String, usize>,
    pub limit_ranges: HashMap<String, usize>,
}

impl NamespaceUsage {
    pub fn from_objects<'a, Q, L>(quotas: Q, limit_ranges: L) -> Self
    where
        Q: IntoIterator<Item = &'a ResourceQuota>,
        L: IntoIterator<Item = &'a LimitRange>,
    {
        Self {
            quotas: count_by_namespace(quotas),
            limit_ranges: count_by_namespace(limit_ranges),
        }
    }

    pub fn quota_count(&self, namespace: &str) -> usize {
        self.quotas.get(namespace).copied().unwrap_or(0)
    }

    pub fn limit_range_count(&self, namespace: &str) -> usize {
        self.limit_ranges.get(namespace).copied().unwrap_or(0)
    }
}

fn count_by_namespace<'a, T, I>(objects: I) -> HashMap<String, usize>
where
    T: Resource + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut counts = HashMap::new();
    for obj in objects {
        if let Some(ns) = obj.meta().namespace.clone() {
            *counts.entry(ns).or_insert(0) += 1;
        }
    }
    counts
}

/// The single limit range of `namespace`
async fn sole_limit_range(client: &Client, namespace: &str) -> ConsoleResult<LimitRange> {
    let api: Api<LimitRange> = Api::namespaced(client.clone(), namespace);
    let mut ranges = api.list(&ListParams::default()).await?.items;

    match ranges.len() {
        0 => Err(ConsoleError::ResourceNotFound {
            kind: ResourceKind::LimitRange.to_string(),
            name: display::NONE.to_string(),
            namespace: namespace.to_string(),
        }),
        1 => Ok(ranges.remove(0)),
        n => Err(ConsoleError::InvalidRequest(format!(
            "namespace {} has {} limit ranges",
            namespace, n
        ))),
    }
}

#[async_trait]
impl KindSpec for Namespaces {
    type Object = Namespace;
    type Related = NamespaceUsage;

    const KIND: ResourceKind = ResourceKind::Namespace;
    const NAMESPACED: bool = false;
    const NAME_RULE: NameRule = NameRule::Label;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Status"),
        Column::new("TD3", "Labels"),
        Column::new("TD4", "Created"),
    ];
    const ACTIONS: &'static [ActionId] = actions::NAMESPACE_CATALOG;

    fn api(client: &Client, _namespace: Option<&str>) -> Api<Namespace> {
        cluster_api(client)
    }

    fn row_columns(namespace: &Namespace) -> Vec<String> {
        vec![
            display::name(&namespace.metadata),
            display::or_none(namespace.status.as_ref().and_then(|s| s.phase.as_deref())),
            display::labels(&namespace.metadata),
            display::created(&namespace.metadata),
        ]
    }

    fn permitted_actions(namespace: &Namespace, usage: &NamespaceUsage) -> Vec<ActionId> {
        let name = namespace.metadata.name.as_deref().unwrap_or_default();
        actions::namespace_actions(
            namespace.status.as_ref().and_then(|s| s.phase.as_deref()),
            usage.quota_count(name),
            usage.limit_range_count(name),
        )
    }

    async fn resolve_related(client: &Client, page: &[Namespace]) -> ConsoleResult<NamespaceUsage> {
        if page.is_empty() {
            return Ok(NamespaceUsage::default());
        }

        let quotas: Api<ResourceQuota> = Api::all(client.clone());
        let limit_ranges: Api<LimitRange> = Api::all(client.clone());
        let params = ListParams::default();

        let quotas = quotas.list(&params).await?;
        let limit_ranges = limit_ranges.list(&params).await?;

        Ok(NamespaceUsage::from_objects(&quotas.items, &limit_ranges.items))
    }

    async fn action_detail(
        client: &Client,
        _namespace: Option<&str>,
        name: &str,
        action: ActionId,
    ) -> ConsoleResult<ResourceDetail> {
        match action {
            ActionId::LimitRangeDetail | ActionId::LimitRangeEdit => {
                let range = sole_limit_range(client, name).await?;
                describe::<LimitRanges>(&range)
            }
            other => Err(ConsoleError::InvalidRequest(format!(
                "action {} has no detail view for namespaces",
                other
            ))),
        }
    }

    async fn action_delete(
        client: &Client,
        _namespace: Option<&str>,
        name: &str,
        action: ActionId,
    ) -> ConsoleResult<()> {
        match action {
            ActionId::LimitRangeDelete => {
                let range = sole_limit_range(client, name).await?;
                let range_name = range.metadata.name.unwrap_or_default();
                let api: Api<LimitRange> = Api::namespaced(client.clone(), name);
                api.delete(&range_name, &DeleteParams::default())
                    .await
                    .map_err(|e| {
                        ConsoleError::from_lookup(e, ResourceKind::LimitRange.as_str(), &range_name, Some(name))
                    })?;
                Ok(())
            }
            other => Err(ConsoleError::InvalidRequest(format!(
                "action {} cannot delete from namespaces",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::kubernetes::mock::{core_object, list_of, scripted_client, Step};
    use crate::kubernetes::module::{project_row, KindModule, ResourceModule};
    use crate::pipeline::{ListParams, ListPipeline};
    use k8s_openapi::api::core::v1::NamespaceStatus;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use serde_json::{json, Value};

    fn meta(name: &str, namespace: Option<&str>) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.into()),
            namespace: namespace.map(Into::into),
            ..Default::default()
        }
    }

    fn namespace(name: &str, phase: &str) -> Namespace {
        Namespace {
            metadata: meta(name, None),
            status: Some(NamespaceStatus {
                phase: Some(phase.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn usage() -> NamespaceUsage {
        let quotas = vec![ResourceQuota {
            metadata: meta("compute", Some("shop")),
            ..Default::default()
        }];
        let ranges = vec![
            LimitRange {
                metadata: meta("default", Some("shop")),
                ..Default::default()
            },
            LimitRange {
                metadata: meta("a", Some("batch")),
                ..Default::default()
            },
            LimitRange {
                metadata: meta("b", Some("batch")),
                ..Default::default()
            },
        ];
        NamespaceUsage::from_objects(&quotas, &ranges)
    }

    #[test]
    fn test_usage_counts() {
        let usage = usage();
        assert_eq!(usage.quota_count("shop"), 1);
        assert_eq!(usage.quota_count("batch"), 0);
        assert_eq!(usage.limit_range_count("batch"), 2);
    }

    #[test]
    fn test_namespace_with_quota_and_default_limit_range() {
        let row = project_row::<Namespaces>(&namespace("shop", "Active"), &usage());
        assert_eq!(
            row.permitted_action_ids,
            vec![
                ActionId::Detail,
                ActionId::Edit,
                ActionId::Delete,
                ActionId::AddQuota,
                ActionId::QuotaList,
                ActionId::LimitRangeDetail,
                ActionId::LimitRangeEdit,
                ActionId::LimitRangeDelete,
            ]
        );
    }

    #[test]
    fn test_ambiguous_limit_ranges_offer_create_only() {
        let row = project_row::<Namespaces>(&namespace("batch", "Active"), &usage());
        assert!(row.permitted_action_ids.contains(&ActionId::AddLimitRange));
        assert!(!row.permitted_action_ids.contains(&ActionId::LimitRangeDetail));
        assert!(!row.permitted_action_ids.contains(&ActionId::QuotaList));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let ns = namespace("shop", "Active");
        let usage = usage();
        assert_eq!(
            project_row::<Namespaces>(&ns, &usage),
            project_row::<Namespaces>(&ns.clone(), &usage.clone())
        );
    }

    fn namespace_object(name: &str) -> Value {
        let mut ns = core_object("Namespace", name, None);
        ns["status"] = json!({ "phase": "Active" });
        ns
    }

    fn module() -> KindModule<Namespaces> {
        KindModule::new(ListPipeline::new(10))
    }

    fn limit_ranges(names: &[&str], namespace: &str) -> Value {
        list_of(
            "LimitRange",
            names.iter().map(|n| core_object("LimitRange", n, Some(namespace))).collect(),
        )
    }

    #[tokio::test]
    async fn test_usage_drives_row_actions() {
        let (client, server) = scripted_client(vec![
            Step::get(
                "/api/v1/namespaces",
                list_of(
                    "Namespace",
                    vec![namespace_object("batch"), namespace_object("idle"), namespace_object("shop")],
                ),
            ),
            Step::get(
                "/api/v1/resourcequotas",
                list_of("ResourceQuota", vec![core_object("ResourceQuota", "compute", Some("shop"))]),
            ),
            Step::get(
                "/api/v1/limitranges",
                list_of(
                    "LimitRange",
                    vec![
                        core_object("LimitRange", "default", Some("shop")),
                        core_object("LimitRange", "a", Some("batch")),
                        core_object("LimitRange", "b", Some("batch")),
                    ],
                ),
            ),
        ]);

        let page = module().list_object_data(&client, None, &ListParams::default()).await.unwrap();
        let ids: Vec<&str> = page.rows.iter().map(|r| r.object_id.as_str()).collect();
        assert_eq!(ids, vec!["shop", "idle", "batch"]);

        let shop = &page.rows[0].permitted_action_ids;
        assert!(shop.contains(&ActionId::QuotaList));
        assert!(shop.contains(&ActionId::LimitRangeDelete));

        let idle = &page.rows[1].permitted_action_ids;
        assert!(!idle.contains(&ActionId::QuotaList));
        assert!(idle.contains(&ActionId::AddLimitRange));

        let batch = &page.rows[2].permitted_action_ids;
        assert!(batch.contains(&ActionId::AddLimitRange));
        assert!(!batch.contains(&ActionId::LimitRangeDetail));

        assert_eq!(server.await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_scope_namespace_is_ignored_for_namespace_lists() {
        let (client, server) = scripted_client(vec![Step::get("/api/v1/namespaces", list_of("Namespace", Vec::new()))]);

        let page = module()
            .list_object_data(&client, Some("team-a"), &ListParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(server.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_limit_range_delete_removes_the_single_range() {
        let (client, server) = scripted_client(vec![
            Step::get("/api/v1/namespaces/shop/limitranges", limit_ranges(&["default"], "shop")),
            Step::delete(
                "/api/v1/namespaces/shop/limitranges/default",
                core_object("LimitRange", "default", Some("shop")),
            ),
        ]);

        let deleted = module()
            .del_resource(&client, None, &["shop".to_string()], Some(ActionId::LimitRangeDelete))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(server.await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_limit_range_delete_without_a_range_is_not_found() {
        let (client, _server) = scripted_client(vec![Step::get(
            "/api/v1/namespaces/idle/limitranges",
            limit_ranges(&[], "idle"),
        )]);

        let err = module()
            .del_resource(&client, None, &["idle".to_string()], Some(ActionId::LimitRangeDelete))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_limit_range_delete_with_two_ranges_is_rejected() {
        let (client, server) = scripted_client(vec![Step::get(
            "/api/v1/namespaces/batch/limitranges",
            limit_ranges(&["a", "b"], "batch"),
        )]);

        let err = module()
            .del_resource(&client, None, &["batch".to_string()], Some(ActionId::LimitRangeDelete))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        // no delete was sent
        assert_eq!(server.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_limit_range_detail() {
        let (client, _server) = scripted_client(vec![Step::get(
            "/api/v1/namespaces/shop/limitranges",
            limit_ranges(&["default"], "shop"),
        )]);

        let detail = module()
            .show_resource_detail(&client, None, "shop", Some(ActionId::LimitRangeEdit))
            .await
            .unwrap();
        assert_eq!(detail.kind, "limitrange");
        assert_eq!(detail.name, "default");
        assert_eq!(detail.namespace.as_deref(), Some("shop"));
    }
}
