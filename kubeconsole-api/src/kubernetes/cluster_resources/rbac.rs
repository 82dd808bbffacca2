//! RBAC list views
//!
//! Roles, RoleBindings, ClusterRoles and ClusterRoleBindings.

use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding, RoleRef, Subject};
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{cluster_api, namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct Roles;

pub struct RoleBindings;

pub struct ClusterRoles;

pub struct ClusterRoleBindings;

pub fn role_ref(role: &RoleRef) -> String {
    format!("{}/{}", role.kind, role.name)
}

/// `Kind/namespace/name` per subject
pub fn subjects(subjects: Option<&Vec<Subject>>) -> String {
    let entries: Vec<String> = subjects
        .map(|subjects| {
            subjects
                .iter()
                .map(|s| format!("{}/{}/{}", s.kind, s.namespace.as_deref().unwrap_or_default(), s.name))
                .collect()
        })
        .unwrap_or_default();
    display::list(&entries)
}

impl KindSpec for Roles {
    type Object = Role;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::Role;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<Role> {
        namespaced_api(client, namespace)
    }

    fn row_columns(role: &Role) -> Vec<String> {
        vec![
            display::name(&role.metadata),
            display::namespace(&role.metadata),
            display::created(&role.metadata),
        ]
    }
}

impl KindSpec for RoleBindings {
    type Object = RoleBinding;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::RoleBinding;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Role"),
        Column::new("TD4", "Subjects"),
        Column::new("TD5", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<RoleBinding> {
        namespaced_api(client, namespace)
    }

    fn row_columns(binding: &RoleBinding) -> Vec<String> {
        vec![
            display::name(&binding.metadata),
            display::namespace(&binding.metadata),
            role_ref(&binding.role_ref),
            subjects(binding.subjects.as_ref()),
            display::created(&binding.metadata),
        ]
    }
}

impl KindSpec for ClusterRoles {
    type Object = ClusterRole;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::ClusterRole;
    const NAMESPACED: bool = false;
    const COLUMNS: &'static [Column] = &[Column::new("TD1", "Name"), Column::new("TD2", "Created")];

    fn api(client: &Client, _namespace: Option<&str>) -> Api<ClusterRole> {
        cluster_api(client)
    }

    fn row_columns(role: &ClusterRole) -> Vec<String> {
        vec![display::name(&role.metadata), display::created(&role.metadata)]
    }
}

impl KindSpec for ClusterRoleBindings {
    type Object = ClusterRoleBinding;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::ClusterRoleBinding;
    const NAMESPACED: bool = false;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Role"),
        Column::new("TD3", "Subjects"),
        Column::new("TD4", "Created"),
    ];

    fn api(client: &Client, _namespace: Option<&str>) -> Api<ClusterRoleBinding> {
        cluster_api(client)
    }

    fn row_columns(binding: &ClusterRoleBinding) -> Vec<String> {
        vec![
            display::name(&binding.metadata),
            role_ref(&binding.role_ref),
            subjects(binding.subjects.as_ref()),
            display::created(&binding.metadata),
        ]
    }
}
