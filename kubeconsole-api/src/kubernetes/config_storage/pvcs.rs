//! PersistentVolumeClaim list view

use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use kube::{Api, Client};
use kubeconsole_common::ActionId;

use crate::actions;
use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct PersistentVolumeClaims;

impl KindSpec for PersistentVolumeClaims {
    type Object = PersistentVolumeClaim;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::PersistentVolumeClaim;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Status"),
        Column::new("TD4", "Volume"),
        Column::new("TD5", "Capacity"),
        Column::new("TD6", "Access modes"),
        Column::new("TD7", "Storage class"),
        Column::new("TD8", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<PersistentVolumeClaim> {
        namespaced_api(client, namespace)
    }

    fn row_columns(claim: &PersistentVolumeClaim) -> Vec<String> {
        let spec = claim.spec.as_ref();
        let requested = spec
            .and_then(|s| s.resources.as_ref())
            .and_then(|r| r.requests.as_ref())
            .and_then(|r| r.get("storage"));
        vec![
            display::name(&claim.metadata),
            display::namespace(&claim.metadata),
            display::or_none(claim.status.as_ref().and_then(|s| s.phase.as_deref())),
            display::or_none(spec.and_then(|s| s.volume_name.as_deref())),
            display::quantity(requested),
            display::access_modes(spec.and_then(|s| s.access_modes.as_ref())),
            display::or_none(spec.and_then(|s| s.storage_class_name.as_deref())),
            display::created(&claim.metadata),
        ]
    }

    fn permitted_actions(claim: &PersistentVolumeClaim, _related: &()) -> Vec<ActionId> {
        actions::volume_actions(claim.status.as_ref().and_then(|s| s.phase.as_deref()))
    }
}
