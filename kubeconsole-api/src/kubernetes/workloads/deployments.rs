//! Deployment list view

use k8s_openapi::api::apps::v1::Deployment;
use kube::{Api, Client};
use kubeconsole_common::ActionId;

use crate::actions;
use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;
use crate::validation::NameRule;

pub struct Deployments;

/// Desired and ready replica counts
pub fn replicas(deployment: &Deployment) -> (i32, i32) {
    let desired = deployment.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let ready = deployment
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);
    (desired, ready)
}

impl KindSpec for Deployments {
    type Object = Deployment;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::Deployment;
    const NAMESPACED: bool = true;
    const NAME_RULE: NameRule = NameRule::Label;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Status"),
        Column::new("TD4", "Labels"),
        Column::new("TD5", "Pods"),
        Column::new("TD6", "Created"),
    ];
    const ACTIONS: &'static [ActionId] = actions::REPLICATED_CATALOG;

    fn api(client: &Client, namespace: Option<&str>) -> Api<Deployment> {
        namespaced_api(client, namespace)
    }

    fn row_columns(deployment: &Deployment) -> Vec<String> {
        let (desired, ready) = replicas(deployment);
        vec![
            display::name(&deployment.metadata),
            display::namespace(&deployment.metadata),
            display::replica_status(ready, desired).to_string(),
            display::labels(&deployment.metadata),
            format!("{}/{}", ready, desired),
            display::created(&deployment.metadata),
        ]
    }

    fn permitted_actions(deployment: &Deployment, _related: &()) -> Vec<ActionId> {
        let (desired, ready) = replicas(deployment);
        actions::replicated_actions(ready.min(desired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::module::project_row;
    use k8s_openapi::api::apps::v1::{DeploymentSpec, DeploymentStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn deployment(replicas: i32, ready: i32) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some("web".into()),
                namespace: Some("shop".into()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(replicas),
                ..Default::default()
            }),
            status: Some(DeploymentStatus {
                ready_replicas: Some(ready),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_running_deployment_can_restart() {
        let row = project_row::<Deployments>(&deployment(3, 3), &());
        assert_eq!(
            row.permitted_action_ids,
            vec![ActionId::Scale, ActionId::Edit, ActionId::Restart, ActionId::Delete]
        );
        assert_eq!(row.column("TD3"), Some("running"));
        assert_eq!(row.column("TD5"), Some("3/3"));
    }

    #[test]
    fn test_scaled_to_zero_cannot_restart() {
        let row = project_row::<Deployments>(&deployment(0, 0), &());
        assert_eq!(row.permitted_action_ids, vec![ActionId::Scale, ActionId::Edit, ActionId::Delete]);
        assert_eq!(row.column("TD3"), Some("not running"));
    }

    #[test]
    fn test_partially_running() {
        let row = project_row::<Deployments>(&deployment(3, 1), &());
        assert_eq!(row.column("TD3"), Some("partially running"));
        assert_eq!(row.object_id, "web");
        assert_eq!(row.column("TD2"), Some("shop"));
    }
}
