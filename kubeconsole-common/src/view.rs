//! List view rows and row-level actions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Row-level operation offered in a list view's pop-up menu
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Detail,
    Edit,
    Delete,
    Scale,
    Restart,
    AddQuota,
    QuotaList,
    AddLimitRange,
    LimitRangeDetail,
    LimitRangeEdit,
    LimitRangeDelete,
    QuotaDetail,
    QuotaEdit,
    QuotaDelete,
}

impl ActionId {
    pub const ALL: [ActionId; 14] = [
        Self::Detail,
        Self::Edit,
        Self::Delete,
        Self::Scale,
        Self::Restart,
        Self::AddQuota,
        Self::QuotaList,
        Self::AddLimitRange,
        Self::LimitRangeDetail,
        Self::LimitRangeEdit,
        Self::LimitRangeDelete,
        Self::QuotaDetail,
        Self::QuotaEdit,
        Self::QuotaDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detail => "detail",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Scale => "scale",
            Self::Restart => "restart",
            Self::AddQuota => "add_quota",
            Self::QuotaList => "quota_list",
            Self::AddLimitRange => "add_limit_range",
            Self::LimitRangeDetail => "limit_range_detail",
            Self::LimitRangeEdit => "limit_range_edit",
            Self::LimitRangeDelete => "limit_range_delete",
            Self::QuotaDetail => "quota_detail",
            Self::QuotaEdit => "quota_edit",
            Self::QuotaDelete => "quota_delete",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == wanted)
            .ok_or_else(|| Error::UnknownAction(wanted.to_string()))
    }
}

/// One projected list row. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceRow {
    pub object_id: String,
    /// Display columns keyed `TD1` … `TDn`
    #[serde(flatten)]
    pub columns: BTreeMap<String, String>,
    pub permitted_action_ids: Vec<ActionId>,
}

impl ResourceRow {
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            columns: BTreeMap::new(),
            permitted_action_ids: Vec::new(),
        }
    }

    pub fn column(&self, id: &str) -> Option<&str> {
        self.columns.get(id).map(String::as_str)
    }
}
