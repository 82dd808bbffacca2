//! Resource module registry
//!
//! The set of kinds is closed: [`ResourceKind`] enumerates every variant and
//! [`Registry::new`] builds one module per variant through an exhaustive
//! match, so a kind without a module does not compile.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ConsoleError, ConsoleResult};
use crate::kubernetes::cluster_resources::{namespaces, quotas, rbac, serviceaccounts};
use crate::kubernetes::config_storage::{configmaps, pvcs, pvs, secrets, storageclasses};
use crate::kubernetes::module::{KindModule, ResourceModule};
use crate::kubernetes::networking::{ingress, ingressclasses, services};
use crate::kubernetes::workloads::{cronjobs, daemonsets, deployments, jobs, statefulsets};
use crate::pipeline::ListPipeline;

/// Every resource kind the console can list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
    CronJob,
    Service,
    Ingress,
    IngressClass,
    ConfigMap,
    Secret,
    PersistentVolumeClaim,
    PersistentVolume,
    StorageClass,
    Role,
    RoleBinding,
    ClusterRole,
    ClusterRoleBinding,
    ServiceAccount,
    Namespace,
    ResourceQuota,
    LimitRange,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 21] = [
        Self::Deployment,
        Self::StatefulSet,
        Self::DaemonSet,
        Self::Job,
        Self::CronJob,
        Self::Service,
        Self::Ingress,
        Self::IngressClass,
        Self::ConfigMap,
        Self::Secret,
        Self::PersistentVolumeClaim,
        Self::PersistentVolume,
        Self::StorageClass,
        Self::Role,
        Self::RoleBinding,
        Self::ClusterRole,
        Self::ClusterRoleBinding,
        Self::ServiceAccount,
        Self::Namespace,
        Self::ResourceQuota,
        Self::LimitRange,
    ];

    /// Name used in request paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::StatefulSet => "statefulset",
            Self::DaemonSet => "daemonset",
            Self::Job => "job",
            Self::CronJob => "cronjob",
            Self::Service => "service",
            Self::Ingress => "ingress",
            Self::IngressClass => "ingressclass",
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
            Self::PersistentVolumeClaim => "pvc",
            Self::PersistentVolume => "pv",
            Self::StorageClass => "storageclass",
            Self::Role => "role",
            Self::RoleBinding => "rolebindings",
            Self::ClusterRole => "clusterrole",
            Self::ClusterRoleBinding => "clusterrolebind",
            Self::ServiceAccount => "serviceaccount",
            Self::Namespace => "namespace",
            Self::ResourceQuota => "resourcequota",
            Self::LimitRange => "limitrange",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or(ConsoleError::ModuleNotFound(wanted))
    }
}

impl Serialize for ResourceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn build(kind: ResourceKind, pipeline: ListPipeline) -> Arc<dyn ResourceModule> {
    match kind {
        ResourceKind::Deployment => Arc::new(KindModule::<deployments::Deployments>::new(pipeline)),
        ResourceKind::StatefulSet => Arc::new(KindModule::<statefulsets::StatefulSets>::new(pipeline)),
        ResourceKind::DaemonSet => Arc::new(KindModule::<daemonsets::DaemonSets>::new(pipeline)),
        ResourceKind::Job => Arc::new(KindModule::<jobs::Jobs>::new(pipeline)),
        ResourceKind::CronJob => Arc::new(KindModule::<cronjobs::CronJobs>::new(pipeline)),
        ResourceKind::Service => Arc::new(KindModule::<services::Services>::new(pipeline)),
        ResourceKind::Ingress => Arc::new(KindModule::<ingress::Ingresses>::new(pipeline)),
        ResourceKind::IngressClass => Arc::new(KindModule::<ingressclasses::IngressClasses>::new(pipeline)),
        ResourceKind::ConfigMap => Arc::new(KindModule::<configmaps::ConfigMaps>::new(pipeline)),
        ResourceKind::Secret => Arc::new(KindModule::<secrets::Secrets>::new(pipeline)),
        ResourceKind::PersistentVolumeClaim => Arc::new(KindModule::<pvcs::PersistentVolumeClaims>::new(pipeline)),
        ResourceKind::PersistentVolume => Arc::new(KindModule::<pvs::PersistentVolumes>::new(pipeline)),
        ResourceKind::StorageClass => Arc::new(KindModule::<storageclasses::StorageClasses>::new(pipeline)),
        ResourceKind::Role => Arc::new(KindModule::<rbac::Roles>::new(pipeline)),
        ResourceKind::RoleBinding => Arc::new(KindModule::<rbac::RoleBindings>::new(pipeline)),
        ResourceKind::ClusterRole => Arc::new(KindModule::<rbac::ClusterRoles>::new(pipeline)),
        ResourceKind::ClusterRoleBinding => Arc::new(KindModule::<rbac::ClusterRoleBindings>::new(pipeline)),
        ResourceKind::ServiceAccount => Arc::new(KindModule::<serviceaccounts::ServiceAccounts>::new(pipeline)),
        ResourceKind::Namespace => Arc::new(KindModule::<namespaces::Namespaces>::new(pipeline)),
        ResourceKind::ResourceQuota => Arc::new(KindModule::<quotas::ResourceQuotas>::new(pipeline)),
        ResourceKind::LimitRange => Arc::new(KindModule::<quotas::LimitRanges>::new(pipeline)),
    }
}

/// Name to module map, built once at startup
#[derive(Clone)]
pub struct Registry {
    modules: HashMap<ResourceKind, Arc<dyn ResourceModule>>,
}

impl Registry {
    pub fn new(page_size: usize) -> Self {
        let pipeline = ListPipeline::new(page_size);
        let modules = ResourceKind::ALL
            .iter()
            .map(|&kind| (kind, build(kind, pipeline)))
            .collect();
        Self { modules }
    }

    /// Module registered under `name`
    pub fn resolve(&self, name: &str) -> ConsoleResult<Arc<dyn ResourceModule>> {
        let kind: ResourceKind = name.parse()?;
        self.get(kind)
    }

    pub fn get(&self, kind: ResourceKind) -> ConsoleResult<Arc<dyn ResourceModule>> {
        self.modules
            .get(&kind)
            .cloned()
            .ok_or_else(|| ConsoleError::ModuleNotFound(kind.to_string()))
    }

    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut kinds: Vec<_> = self.modules.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("kinds", &self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_every_kind_registered_under_its_name() {
        let registry = Registry::new(20);
        assert_eq!(registry.kinds().len(), ResourceKind::ALL.len());

        for kind in ResourceKind::ALL {
            let module = registry.resolve(kind.as_str()).unwrap();
            assert_eq!(module.kind(), kind);
        }
    }

    #[test]
    fn test_unknown_name_is_module_not_found() {
        let registry = Registry::new(20);
        let err = registry.resolve("pod").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ModuleNotFound);
        assert_eq!(err.code(), 40400);
    }

    #[test]
    fn test_name_parsing_is_trimmed_and_case_insensitive() {
        assert_eq!(" Deployment ".parse::<ResourceKind>().unwrap(), ResourceKind::Deployment);
        assert_eq!("clusterrolebind".parse::<ResourceKind>().unwrap(), ResourceKind::ClusterRoleBinding);
        assert!("clusterrolebinding".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_module_metadata() {
        let registry = Registry::new(20);

        let deployment = registry.resolve("deployment").unwrap();
        assert!(deployment.namespaced());
        assert_eq!(deployment.order_field_ids(), vec!["TD1", "TD6"]);
        assert_eq!(deployment.default_order_field(), "TD1");
        assert_eq!(deployment.default_order_direction().as_str(), "1");

        let pv = registry.resolve("pv").unwrap();
        assert!(!pv.namespaced());

        for kind in ResourceKind::ALL {
            let module = registry.get(kind).unwrap();
            assert_eq!(module.columns()[0].id, "TD1", "{}", kind);
            assert!(!module.pop_menu_items().is_empty(), "{}", kind);
            assert!(module.order_field_ids().contains(&module.default_order_field()), "{}", kind);
        }
    }
}
