//! Column formatting shared by the resource modules

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use std::collections::BTreeMap;

/// Placeholder for absent values
pub const NONE: &str = "-";

pub fn name(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

pub fn namespace(meta: &ObjectMeta) -> String {
    meta.namespace.clone().unwrap_or_else(|| NONE.to_string())
}

pub fn time(value: Option<&Time>) -> String {
    value
        .map(|t| t.0.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn created(meta: &ObjectMeta) -> String {
    time(meta.creation_timestamp.as_ref())
}

/// `k=v` pairs in key order
pub fn pairs(map: Option<&BTreeMap<String, String>>) -> String {
    match map {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(","),
        _ => NONE.to_string(),
    }
}

pub fn labels(meta: &ObjectMeta) -> String {
    pairs(meta.labels.as_ref())
}

pub fn list(items: &[String]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(",")
    }
}

pub fn or_none(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NONE.to_string(),
    }
}

pub fn quantity(value: Option<&Quantity>) -> String {
    or_none(value.map(|q| q.0.as_str()))
}

/// Compact `1h2m3s` rendering of an elapsed time
pub fn elapsed(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);
    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Summary of workload readiness
pub fn replica_status(ready: i32, desired: i32) -> &'static str {
    if desired > 0 && ready >= desired {
        "running"
    } else if ready <= 0 {
        "not running"
    } else {
        "partially running"
    }
}

/// Short forms of persistent volume access modes
pub fn access_modes(modes: Option<&Vec<String>>) -> String {
    let short: Vec<String> = modes
        .map(|modes| {
            modes
                .iter()
                .map(|mode| match mode.as_str() {
                    "ReadWriteOnce" => "RWO".to_string(),
                    "ReadOnlyMany" => "ROM".to_string(),
                    "ReadWriteMany" => "RWM".to_string(),
                    "ReadWriteOncePod" => "RWOP".to_string(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();
    list(&short)
}
