//! Secret list view
//!
//! Only counts of data items are shown; values never reach a row.

use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};

use super::configmaps::editable;
use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct Secrets;

impl KindSpec for Secrets {
    type Object = Secret;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::Secret;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Type"),
        Column::new("TD4", "Labels"),
        Column::new("TD5", "Data items"),
        Column::new("TD6", "Editable"),
        Column::new("TD7", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<Secret> {
        namespaced_api(client, namespace)
    }

    fn row_columns(secret: &Secret) -> Vec<String> {
        let items = secret.data.as_ref().map_or(0, |d| d.len()) + secret.string_data.as_ref().map_or(0, |d| d.len());
        vec![
            display::name(&secret.metadata),
            display::namespace(&secret.metadata),
            display::or_none(secret.type_.as_deref()),
            display::labels(&secret.metadata),
            items.to_string(),
            editable(secret.immutable),
            display::created(&secret.metadata),
        ]
    }
}
