//! DaemonSet list view

use k8s_openapi::api::apps::v1::DaemonSet;
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;
use crate::validation::NameRule;

pub struct DaemonSets;

impl KindSpec for DaemonSets {
    type Object = DaemonSet;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::DaemonSet;
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

    fn api(client: &Client, namespace: Option<&str>) -> Api<DaemonSet> {
        namespaced_api(client, namespace)
    }

    fn row_columns(set: &DaemonSet) -> Vec<String> {
        let (desired, available) = set
            .status
            .as_ref()
            .map(|s| (s.desired_number_scheduled, s.number_available.unwrap_or(0)))
            .unwrap_or((0, 0));
        vec![
            display::name(&set.metadata),
            display::namespace(&set.metadata),
            display::replica_status(available, desired).to_string(),
            display::labels(&set.metadata),
            format!("{}/{}", available, desired),
            display::created(&set.metadata),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::module::project_row;
    use k8s_openapi::api::apps::v1::DaemonSetStatus;
    use kubeconsole_common::ActionId;

    #[test]
    fn test_available_over_desired() {
        let set = DaemonSet {
            status: Some(DaemonSetStatus {
                desired_number_scheduled: 4,
                number_available: Some(4),
                ..Default::default()
            }),
            ..Default::default()
        };
        let row = project_row::<DaemonSets>(&set, &());
        assert_eq!(row.column("TD3"), Some("running"));
        assert_eq!(row.column("TD5"), Some("4/4"));
        assert_eq!(row.permitted_action_ids, vec![ActionId::Edit, ActionId::Delete]);
    }
}
