//! CronJob list view

use k8s_openapi::api::batch::v1::CronJob;
use kube::{Api, Client};

use crate::kubernetes::display;
use crate::kubernetes::module::{namespaced_api, KindSpec};
use crate::pipeline::Column;
use crate::registry::ResourceKind;

pub struct CronJobs;

impl KindSpec for CronJobs {
    type Object = CronJob;
    type Related = ();

    const KIND: ResourceKind = ResourceKind::CronJob;
    const NAMESPACED: bool = true;
    const COLUMNS: &'static [Column] = &[
        Column::new("TD1", "Name"),
        Column::new("TD2", "Namespace"),
        Column::new("TD3", "Labels"),
        Column::new("TD4", "Last schedule"),
        Column::new("TD5", "Last success"),
        Column::new("TD6", "Created"),
    ];

    fn api(client: &Client, namespace: Option<&str>) -> Api<CronJob> {
        namespaced_api(client, namespace)
    }

    fn row_columns(job: &CronJob) -> Vec<String> {
        let status = job.status.as_ref();
        vec![
            display::name(&job.metadata),
            display::namespace(&job.metadata),
            display::labels(&job.metadata),
            display::time(status.and_then(|s| s.last_schedule_time.as_ref())),
            display::time(status.and_then(|s| s.last_successful_time.as_ref())),
            display::created(&job.metadata),
        ]
    }
}
