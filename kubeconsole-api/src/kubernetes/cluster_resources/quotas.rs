//! ResourceQuota and LimitRange list views

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{LimitRange, ResourceQuota};
use kube::api::DeleteParams;
use kube::{Api, Client};
use kubeconsole_common::ActionId;

use crate::actions;
use crate::error::{ConsoleError, ConsoleResult};
use crate::kubernetes::display;
use crate::kubernetes::module::{describe, namespaced_api, KindSpec, ResourceDetail};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct ResourceQuotas;

pub struct LimitRanges;

/// Hard limit for `resource`, e.g. `requests.cpu`
pub fn hard(quota: &ResourceQuota, resource: &str) -> String {
    display::quantity(
        quota
            .spec
            .as_ref()
            .and_then(|s| s.hard.as_ref())
            .and_then(|h| h.get(resource)),
    )
}

#[async_trait]
impl KindSpec for ResourceQuotas {
    type Object = ResourceQuota;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::ResourceQuota;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "CPU request"),
        Column::new("TD4", "CPU limit"),
        Column::new("TD5", "Memory request"),
        Column::new("TD6", "Memory limit"),
        Column::new("TD7", "Created"),
    ];
    const ACTIONS: &'static [ActionId] = actions::QUOTA_CATALOG;

    fn api(client: &Client, namespace: Option<&str>) -> Api<ResourceQuota> {
        namespaced_api(client, namespace)
    }

    fn row_columns(quota: &ResourceQuota) -> Vec<String> {
        vec![
            display::name(&quota.metadata),
            display::namespace(&quota.metadata),
            hard(quota, "requests.cpu"),
            hard(quota, "limits.cpu"),
            hard(quota, "requests.memory"),
            hard(quota, "limits.memory"),
            display::created(&quota.metadata),
        ]
    }

    fn permitted_actions(_quota: &ResourceQuota, _related: &()) -> Vec<ActionId> {
        actions::quota_actions()
    }

    // quota_* row actions address the quota itself
    async fn action_detail(
        client: &Client,
        namespace: Option<&str>,
        name: &str,
        action: ActionId,
    ) -> ConsoleResult<ResourceDetail> {
        match action {
            ActionId::QuotaDetail | ActionId::QuotaEdit => {
                let quota = Self::api(client, namespace)
                    .get(name)
                    .await
                    .map_err(|e| ConsoleError::from_lookup(e, Self::KIND.as_str(), name, namespace))?;
                describe::<Self>(&quota)
            }
            other => Err(ConsoleError::InvalidRequest(format!(
                "action {} has no detail view for resourcequotas",
                other
            ))),
        }
    }

    async fn action_delete(
        client: &Client,
        namespace: Option<&str>,
        name: &str,
        action: ActionId,
    ) -> ConsoleResult<()> {
        match action {
            ActionId::QuotaDelete => {
                Self::api(client, namespace)
                    .delete(name, &DeleteParams::default())
                    .await
                    .map_err(|e| ConsoleError::from_lookup(e, Self::KIND.as_str(), name, namespace))?;
                Ok(())
            }
            other => Err(ConsoleError::InvalidRequest(format!(
                "action {} cannot delete from resourcequotas",
                other
            ))),
        }
    }
}

impl KindSpec for LimitRanges {
    type Object = LimitRange;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::LimitRange;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Limits"),
        Column::new("TD4", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<LimitRange> {
        namespaced_api(client, namespace)
    }

    fn row_columns(range: &LimitRange) -> Vec<String> {
        let items = range.spec.as_ref().map_or(0, |s| s.limits.len());
        vec![
            display::name(&range.metadata),
            display::namespace(&range.metadata),
            items.to_string(),
            display::created(&range.metadata),
        ]
    }
}
