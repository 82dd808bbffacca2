//! Common types shared between kubeconsole-api and its consumers

pub mod cmdb;
pub mod scope;
pub mod view;

pub use cmdb::{AvailabilityZoneRecord, ClusterRecord, ConnectScheme, DatacenterRecord, RecordStatus};
pub use scope::{CascadingOptions, ScopeSelection, SelectOption};
pub use view::{ActionId, ResourceRow};

/// Sentinel meaning "unselected" for every scope level and "all" for namespaces
pub const UNSELECTED: &str = "0";

/// Returns true when a request-supplied identifier carries no selection
pub fn is_unselected(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == UNSELECTED
}

/// Model errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid connect scheme: {0}")]
    InvalidConnectScheme(String),

    #[error("Invalid record status: {0}")]
    InvalidStatus(i64),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_detection() {
        assert!(is_unselected("0"));
        assert!(is_unselected(" 0 "));
        assert!(is_unselected(""));
        assert!(!is_unselected("kube-system"));
        assert!(!is_unselected("10"));
    }
}
