//! Ingress list view

use k8s_openapi::api::networking::v1::Ingress;
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct Ingresses;

pub fn hosts(ingress: &Ingress) -> Vec<String> {
    ingress
        .spec
        .as_ref()
        .and_then(|s| s.rules.as_ref())
        .map(|rules| rules.iter().filter_map(|r| r.host.clone()).collect())
        .unwrap_or_default()
}

impl KindSpec for Ingresses {
    type Object = Ingress;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::Ingress;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Hosts"),
        Column::new("TD4", "Labels"),
        Column::new("TD5", "Ingress class"),
        Column::new("TD6", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<Ingress> {
        namespaced_api(client, namespace)
    }

    fn row_columns(ingress: &Ingress) -> Vec<String> {
        vec![
            display::name(&ingress.metadata),
            display::namespace(&ingress.metadata),
            display::list(&hosts(ingress)),
            display::labels(&ingress.metadata),
            display::or_none(ingress.spec.as_ref().and_then(|s| s.ingress_class_name.as_deref())),
            display::created(&ingress.metadata),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::networking::v1::{IngressRule, IngressSpec};

    #[test]
    fn test_hosts_skip_wildcard_rules() {
        let ingress = Ingress {
            spec: Some(IngressSpec {
                rules: Some(vec![
                    IngressRule {
                        host: Some("shop.example.com".into()),
                        ..Default::default()
                    },
                    IngressRule::default(),
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(hosts(&ingress), vec!["shop.example.com".to_string()]);
    }
}
