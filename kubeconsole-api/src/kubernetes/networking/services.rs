//! Service list view

use k8s_openapi::api::core::v1::Service;
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;
use crate::validation::NameRule;

pub struct Services;

/// `port:nodePort/protocol` entries
pub fn ports(service: &Service) -> String {
    let ports: Vec<String> = service
        .spec
        .as_ref()
        .and_then(|s| s.ports.as_ref())
        .map(|ports| {
            ports
                .iter()
                .map(|p| {
                    let protocol = p.protocol.as_deref().unwrap_or("TCP");
                    match p.node_port {
                        Some(node_port) => format!("{}:{}/{}", p.port, node_port, protocol),
                        None => format!("{}/{}", p.port, protocol),
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    display::list(&ports)
}

impl KindSpec for Services {
    type Object = Service;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::Service;
    const NAMESPACED: bool = true;
    const NAME_RULE: NameRule = NameRule::Label;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Labels"),
        Column::new("TD4", "Type"),
        Column::new("TD5", "Cluster IP"),
        Column::new("TD6", "External IPs"),
        Column::new("TD7", "Ports"),
        Column::new("TD8", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<Service> {
        namespaced_api(client, namespace)
    }

    fn row_columns(service: &Service) -> Vec<String> {
        let spec = service.spec.as_ref();
        let external: Vec<String> = spec
            .and_then(|s| s.external_ips.clone())
            .unwrap_or_default();
        vec![
            display::name(&service.metadata),
            display::namespace(&service.metadata),
            display::labels(&service.metadata),
            display::or_none(spec.and_then(|s| s.type_.as_deref())),
            display::or_none(spec.and_then(|s| s.cluster_ip.as_deref())),
            display::list(&external),
            ports(service),
            display::created(&service.metadata),
        ]
    }
}
