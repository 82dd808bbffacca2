//! ServiceAccount list view

use k8s_openapi::api::core::v1::ServiceAccount;
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct ServiceAccounts;

impl KindSpec for ServiceAccounts {
    type Object = ServiceAccount;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::ServiceAccount;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Secrets"),
        Column::new("TD4", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<ServiceAccount> {
        namespaced_api(client, namespace)
    }

    fn row_columns(account: &ServiceAccount) -> Vec<String> {
        vec![
            display::name(&account.metadata),
            display::namespace(&account.metadata),
            account.secrets.as_ref().map_or(0, |s| s.len()).to_string(),
            display::created(&account.metadata),
        ]
    }
}
