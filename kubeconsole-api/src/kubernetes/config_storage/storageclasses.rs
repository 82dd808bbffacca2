//! StorageClass list view

use k8s_openapi::api::storage::v1::StorageClass;
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{cluster_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct StorageClasses;

impl KindSpec for StorageClasses {
    type Object = StorageClass;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::StorageClass;
    const NAMESPACED: bool = false;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Provisioner"),
        Column::new("TD3", "Parameters"),
        Column::new("TD4", "Reclaim policy"),
        Column::new("TD5", "Binding mode"),
        Column::new("TD6", "Expansion allowed"),
        Column::new("TD7", "Created"),
    ];

    fn api(client: &Client, _namespace: Option<&str>) -> Api<StorageClass> {
        cluster_api(client)
    }

    fn row_columns(class: &StorageClass) -> Vec<String> {
        let expansion = if class.allow_volume_expansion.unwrap_or(false) { "yes" } else { "no" };
        vec![
            display::name(&class.metadata),
            class.provisioner.clone(),
            display::pairs(class.parameters.as_ref()),
            display::or_none(class.reclaim_policy.as_deref()),
            display::or_none(class.volume_binding_mode.as_deref()),
            expansion.to_string(),
            display::created(&class.metadata),
        ]
    }
}
