//! Job list view

use chrono::{DateTime, Utc};
use k8s_openapi::api::batch::v1::{Job, JobStatus};
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct Jobs;

/// Run time so far, or start to completion for finished jobs
pub fn duration(status: Option<&JobStatus>, now: DateTime<Utc>) -> String {
    let Some(started) = status.and_then(|s| s.start_time.as_ref()) else {
        return "not started".to_string();
    };
    let finished = status
        .and_then(|s| s.completion_time.as_ref())
        .map(|t| t.0)
        .unwrap_or(now);
    display::elapsed(finished - started.0)
}

/// `active/succeeded/failed/total`
pub fn pod_counts(status: Option<&JobStatus>) -> String {
    let (active, succeeded, failed) = status
        .map(|s| {
            (
                s.active.unwrap_or(0),
                s.succeeded.unwrap_or(0),
                s.failed.unwrap_or(0),
            )
        })
        .unwrap_or((0, 0, 0));
    format!("{}/{}/{}/{}", active, succeeded, failed, active + succeeded + failed)
}

impl KindSpec for Jobs {
    type Object = Job;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::Job;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Duration"),
        Column::new("TD4", "Labels"),
        Column::new("TD5", "Pods (active/succeeded/failed/total)"),
        Column::new("TD6", "Completed"),
        Column::new("TD7", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<Job> {
        namespaced_api(client, namespace)
    }

    fn row_columns(job: &Job) -> Vec<String> {
        let status = job.status.as_ref();
        let completed = match status.and_then(|s| s.completion_time.as_ref()) {
            Some(time) => display::time(Some(time)),
            None => "not completed".to_string(),
        };
        vec![
            display::name(&job.metadata),
            display::namespace(&job.metadata),
            duration(status, Utc::now()),
            display::labels(&job.metadata),
            pod_counts(status),
            completed,
            display::created(&job.metadata),
        ]
    }
}
