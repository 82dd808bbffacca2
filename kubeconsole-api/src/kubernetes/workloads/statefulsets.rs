//! StatefulSet list view

use k8s_openapi::api::apps::v1::StatefulSet;
use kube::{Api, Client};
use kubeconsole_common::ActionId;

use crate::actions;
use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;
use crate::validation::NameRule;

pub struct StatefulSets;

fn replicas(set: &StatefulSet) -> (i32, i32) {
    let desired = set.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let ready = set.status.as_ref().and_then(|s| s.ready_replicas).unwrap_or(0);
    (desired, ready)
}

impl KindSpec for StatefulSets {
    type Object = StatefulSet;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::StatefulSet;
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

    fn api(client: &Client, namespace: Option<&str>) -> Api<StatefulSet> {
        namespaced_api(client, namespace)
    }

    fn row_columns(set: &StatefulSet) -> Vec<String> {
        let (desired, ready) = replicas(set);
        vec![
            display::name(&set.metadata),
            display::namespace(&set.metadata),
            display::replica_status(ready, desired).to_string(),
            display::labels(&set.metadata),
            format!("{}/{}", ready, desired),
            display::created(&set.metadata),
        ]
    }

    fn permitted_actions(set: &StatefulSet, _related: &()) -> Vec<ActionId> {
        let (desired, ready) = replicas(set);
        actions::replicated_actions(ready.min(desired))
    }
}
