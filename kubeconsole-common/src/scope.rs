//! Scope selection and cascading selector options

use serde::{Deserialize, Serialize};

use crate::{is_unselected, UNSELECTED};

/// Datacenter → zone → cluster → namespace narrowing of one operation.
///
/// Every level defaults to the `"0"` sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScopeSelection {
    pub datacenter_id: String,
    pub zone_id: String,
    pub cluster_id: String,
    pub namespace: String,
}

impl Default for ScopeSelection {
    fn default() -> Self {
        Self {
            datacenter_id: UNSELECTED.to_string(),
            zone_id: UNSELECTED.to_string(),
            cluster_id: UNSELECTED.to_string(),
            namespace: UNSELECTED.to_string(),
        }
    }
}

impl ScopeSelection {
    pub fn has_datacenter(&self) -> bool {
        !is_unselected(&self.datacenter_id)
    }

    pub fn has_zone(&self) -> bool {
        !is_unselected(&self.zone_id)
    }

    pub fn has_cluster(&self) -> bool {
        !is_unselected(&self.cluster_id)
    }

    pub fn has_namespace(&self) -> bool {
        !is_unselected(&self.namespace)
    }

    /// Namespace filter for a live list call; `None` lists every namespace
    pub fn namespace_filter(&self) -> Option<&str> {
        if self.has_namespace() {
            Some(self.namespace.as_str())
        } else {
            None
        }
    }
}

/// One entry of a selector drop-down
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }

    /// The `"0"` entry shown when nothing is chosen at this level
    pub fn placeholder(label: impl Into<String>, selected: bool) -> Self {
        Self::new(UNSELECTED, label, selected)
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == UNSELECTED
    }
}

/// Selector lists for every scope level
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CascadingOptions {
    pub dc_options: Vec<SelectOption>,
    pub az_options: Vec<SelectOption>,
    pub cluster_options: Vec<SelectOption>,
    pub ns_options: Vec<SelectOption>,
}
