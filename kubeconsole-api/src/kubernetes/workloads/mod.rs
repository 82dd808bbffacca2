//! Workload kinds
//!
//! Deployments, StatefulSets, DaemonSets, Jobs and CronJobs.

pub mod cronjobs;
pub mod daemonsets;
pub mod deployments;
pub mod jobs;
pub mod statefulsets;
