//! IngressClass list view

use k8s_openapi::api::networking::v1::IngressClass;
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{cluster_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct IngressClasses;

impl KindSpec for IngressClasses {
    type Object = IngressClass;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::IngressClass;
    const NAMESPACED: bool = false;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Controller"),
        Column::new("TD3", "Created"),
    ];

    fn api(client: &Client, _namespace: Option<&str>) -> Api<IngressClass> {
        cluster_api(client)
    }

    fn row_columns(class: &IngressClass) -> Vec<String> {
        vec![
            display::name(&class.metadata),
            display::or_none(class.spec.as_ref().and_then(|s| s.controller.as_deref())),
            display::created(&class.metadata),
        ]
    }
}
