//! PersistentVolume list view

use k8s_openapi::api::core::v1::PersistentVolume;
use kube::{Api, Client};
use kubeconsole_common::ActionId;

use crate::actions;
use crate::kubernetes::display;
use crate::kubernetes::module::{cluster_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct PersistentVolumes;

/// `namespace/name` of the bound claim
pub fn bound_claim(volume: &PersistentVolume) -> String {
    let claim = volume.spec.as_ref().and_then(|s| s.claim_ref.as_ref());
    let namespace = claim.and_then(|c| c.namespace.as_deref()).unwrap_or_default();
    let name = claim.and_then(|c| c.name.as_deref()).unwrap_or_default();
    if namespace.is_empty() && name.is_empty() {
        display::NONE.to_string()
    } else {
        format!("{}/{}", namespace, name)
    }
}

impl KindSpec for PersistentVolumes {
    type Object = PersistentVolume;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::PersistentVolume;
    const NAMESPACED: bool = false;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Capacity"),
        Column::new("TD3", "Access modes"),
        Column::new("TD4", "Reclaim policy"),
        Column::new("TD5", "Status"),
        Column::new("TD6", "Claim"),
        Column::new("TD7", "Storage class"),
        Column::new("TD8", "Volume mode"),
        Column::new("TD9", "Created"),
    ];

    fn api(client: &Client, _namespace: Option<&str>) -> Api<PersistentVolume> {
        cluster_api(client)
    }

    fn row_columns(volume: &PersistentVolume) -> Vec<String> {
        let spec = volume.spec.as_ref();
        let capacity: Vec<String> = spec
            .and_then(|s| s.capacity.as_ref())
            .map(|c| c.iter().map(|(k, v)| format!("{}: {}", k, v.0)).collect())
            .unwrap_or_default();
        vec![
            display::name(&volume.metadata),
            display::list(&capacity),
            display::access_modes(spec.and_then(|s| s.access_modes.as_ref())),
            display::or_none(spec.and_then(|s| s.persistent_volume_reclaim_policy.as_deref())),
            display::or_none(volume.status.as_ref().and_then(|s| s.phase.as_deref())),
            bound_claim(volume),
            display::or_none(spec.and_then(|s| s.storage_class_name.as_deref())),
            display::or_none(spec.and_then(|s| s.volume_mode.as_deref())),
            display::created(&volume.metadata),
        ]
    }

    fn permitted_actions(volume: &PersistentVolume, _related: &()) -> Vec<ActionId> {
        actions::volume_actions(volume.status.as_ref().and_then(|s| s.phase.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::module::project_row;
    use k8s_openapi::api::core::v1::{ObjectReference, PersistentVolumeSpec, PersistentVolumeStatus};

    #[test]
    fn test_bound_volume() {
        let volume = PersistentVolume {
            spec: Some(PersistentVolumeSpec {
                claim_ref: Some(ObjectReference {
                    namespace: Some("shop".into()),
                    name: Some("data".into()),
                    ..Default::default()
                }),
                access_modes: Some(vec!["ReadWriteMany".into()]),
                ..Default::default()
            }),
            status: Some(PersistentVolumeStatus {
                phase: Some("Bound".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let row = project_row::<PersistentVolumes>(&volume, &());
        assert!(row.permitted_action_ids.is_empty());
        assert_eq!(row.column("TD6"), Some("shop/data"));
        assert_eq!(row.column("TD3"), Some("RWM"));
    }

    #[test]
    fn test_unclaimed_volume() {
        assert_eq!(bound_claim(&PersistentVolume::default()), "-");
        let row = project_row::<PersistentVolumes>(&PersistentVolume::default(), &());
        assert_eq!(row.permitted_action_ids, vec![ActionId::Edit, ActionId::Delete]);
    }
}
