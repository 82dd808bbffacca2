//! Row action rules
//!
//! Pure functions from observed object state to the subset of a kind's action
//! catalog a row may offer. Each kind's projector delegates here.

use kubeconsole_common::ActionId;

/// Catalog of kinds without state-dependent rules
pub const EDIT_DELETE: &[ActionId] = &[ActionId::Edit, ActionId::Delete];

pub const REPLICATED_CATALOG: &[ActionId] = &[ActionId::Scale, ActionId::Edit, ActionId::Restart, ActionId::Delete];

pub const QUOTA_CATALOG: &[ActionId] = &[ActionId::QuotaDetail, ActionId::QuotaEdit, ActionId::QuotaDelete];

pub const NAMESPACE_CATALOG: &[ActionId] = &[
    ActionId::Detail,
    ActionId::Edit,
    ActionId::Delete,
    ActionId::AddQuota,
    ActionId::QuotaList,
    ActionId::AddLimitRange,
    ActionId::LimitRangeDetail,
    ActionId::LimitRangeEdit,
    ActionId::LimitRangeDelete,
];

pub fn edit_delete() -> Vec<ActionId> {
    EDIT_DELETE.to_vec()
}

/// Deployments and stateful sets: restart only while replicas are running
pub fn replicated_actions(ready_replicas: i32) -> Vec<ActionId> {
    if ready_replicas > 0 {
        vec![ActionId::Scale, ActionId::Edit, ActionId::Restart, ActionId::Delete]
    } else {
        vec![ActionId::Scale, ActionId::Edit, ActionId::Delete]
    }
}

/// Volumes and claims: a bound object offers nothing
pub fn volume_actions(phase: Option<&str>) -> Vec<ActionId> {
    if phase == Some("Bound") {
        Vec::new()
    } else {
        edit_delete()
    }
}

pub fn quota_actions() -> Vec<ActionId> {
    QUOTA_CATALOG.to_vec()
}

/// Namespace rows depend on phase and on quota and limit-range presence
pub fn namespace_actions(phase: Option<&str>, quota_count: usize, limit_range_count: usize) -> Vec<ActionId> {
    if phase != Some("Active") {
        return Vec::new();
    }

    let mut actions = vec![ActionId::Detail, ActionId::Edit, ActionId::Delete, ActionId::AddQuota];
    if quota_count > 0 {
        actions.push(ActionId::QuotaList);
    }
    if limit_range_count == 1 {
        actions.extend([
            ActionId::LimitRangeDetail,
            ActionId::LimitRangeEdit,
            ActionId::LimitRangeDelete,
        ]);
    } else {
        actions.push(ActionId::AddLimitRange);
    }
    actions
}
