//! Object name validation
//!
//! Kubernetes names follow one of two DNS-1123 shapes. Workload controllers,
//! services and namespaces take the stricter label form; everything else
//! accepts a subdomain.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ConsoleError, ConsoleResult};

pub const MAX_LABEL_LENGTH: usize = 63;
pub const MAX_SUBDOMAIN_LENGTH: usize = 253;

static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap()
});

static SUBDOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").unwrap()
});

/// Which DNS-1123 form a kind's names must take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    Label,
    Subdomain,
}

impl NameRule {
    pub fn max_length(self) -> usize {
        match self {
            Self::Label => MAX_LABEL_LENGTH,
            Self::Subdomain => MAX_SUBDOMAIN_LENGTH,
        }
    }

    pub fn is_match(self, name: &str) -> bool {
        let regex = match self {
            Self::Label => &LABEL_REGEX,
            Self::Subdomain => &SUBDOMAIN_REGEX,
        };
        name.len() <= self.max_length() && regex.is_match(name)
    }
}

/// DNS-1123 label check applied to selected namespaces
pub fn is_valid_namespace(name: &str) -> bool {
    NameRule::Label.is_match(name)
}

/// Check a proposed object name against `rule`
pub fn validate_object_name(rule: NameRule, name: &str) -> ConsoleResult<()> {
    if name.is_empty() {
        return Err(ConsoleError::InvalidRequest("name cannot be empty".to_string()));
    }

    if name.len() > rule.max_length() {
        return Err(ConsoleError::InvalidRequest(format!(
            "name too long (max {} characters)",
            rule.max_length()
        )));
    }

    if !rule.is_match(name) {
        let shape = match rule {
            NameRule::Label => "lowercase alphanumerics and '-'",
            NameRule::Subdomain => "lowercase alphanumerics, '-' and '.'",
        };
        return Err(ConsoleError::InvalidRequest(format!(
            "name {} must consist of {} and start and end with an alphanumeric",
            name, shape
        )));
    }

    Ok(())
}
