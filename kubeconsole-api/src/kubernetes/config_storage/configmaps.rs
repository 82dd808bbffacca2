//! ConfigMap list view

use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct ConfigMaps;

pub fn editable(immutable: Option<bool>) -> String {
    if immutable.unwrap_or(false) { "no" } else { "yes" }.to_string()
}

impl KindSpec for ConfigMaps {
    type Object = ConfigMap;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::ConfigMap;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Labels"),
        Column::new("TD4", "Data items"),
        Column::new("TD5", "Editable"),
        Column::new("TD6", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<ConfigMap> {
        namespaced_api(client, namespace)
    }

    fn row_columns(map: &ConfigMap) -> Vec<String> {
        let items = map.data.as_ref().map_or(0, |d| d.len()) + map.binary_data.as_ref().map_or(0, |d| d.len());
        vec![
            display::name(&map.metadata),
            display::namespace(&map.metadata),
            display::labels(&map.metadata),
            items.to_string(),
            editable(map.immutable),
            display::created(&map.metadata),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::module::project_row;
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    #[test]
    fn test_counts_text_and_binary_items() {
        let map = ConfigMap {
            data: Some(BTreeMap::from([("a".to_string(), "1".to_string())])),
            binary_data: Some(BTreeMap::from([("b".to_string(), ByteString(vec![0]))])),
            immutable: Some(true),
            ..Default::default()
        };
        let row = project_row::<ConfigMaps>(&map, &());
        assert_eq!(row.column("TD4"), Some("2"));
        assert_eq!(row.column("TD5"), Some("no"));
    }
}
