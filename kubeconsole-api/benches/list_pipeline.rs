//! List pipeline benchmarks
//!
//! Run with: cargo bench --package kubeconsole-api

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use kubeconsole_api::kubernetes::module::{project_row, KindSpec};
use kubeconsole_api::kubernetes::workloads::deployments::Deployments;
use kubeconsole_api::pipeline::{ListParams, ListPipeline};
use std::collections::BTreeMap;

const SMALL_DATASET: usize = 10;
const MEDIUM_DATASET: usize = 100;
const LARGE_DATASET: usize = 1000;

fn deployments(count: usize) -> Vec<Deployment> {
    let base = chrono::Utc::now();
    (0..count)
        .map(|i| {
            let mut labels = BTreeMap::new();
            labels.insert("app".to_string(), format!("svc-{}", i % 17));
            Deployment {
                metadata: ObjectMeta {
                    name: Some(format!("svc-{:05}", (i * 7919) % count)),
                    namespace: Some("default".to_string()),
                    labels: Some(labels),
                    creation_timestamp: Some(Time(base - chrono::Duration::seconds(i as i64))),
                    ..Default::default()
                },
                spec: Some(DeploymentSpec {
                    replicas: Some(3),
                    ..Default::default()
                }),
                status: Some(DeploymentStatus {
                    ready_replicas: Some((i % 4) as i32),
                    ..Default::default()
                }),
            }
        })
        .collect()
}

/// Sort, window and project one page from collections of growing size
fn bench_list_scaling(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let pipeline = ListPipeline::new(20);
    let fields = Deployments::order_fields();
    let mut group = c.benchmark_group("list_pipeline_scaling");

    for size in [SMALL_DATASET, MEDIUM_DATASET, LARGE_DATASET] {
        let items = deployments(size);
        let params = ListParams {
            start: size / 2,
            order_field: Some("TD6".to_string()),
            direction: Some("1".to_string()),
            search_content: None,
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.to_async(&runtime).iter(|| async {
                let page = pipeline
                    .run(
                        items.clone(),
                        &fields,
                        (Deployments::DEFAULT_ORDER_FIELD, Deployments::DEFAULT_DIRECTION),
                        black_box(&params),
                        |page| async move {
                            Ok(page.iter().map(|d| project_row::<Deployments>(d, &())).collect())
                        },
                    )
                    .await
                    .unwrap();
                black_box(page)
            });
        });
    }

    group.finish();
}

/// Row projection alone
fn bench_project_row(c: &mut Criterion) {
    let items = deployments(SMALL_DATASET);

    c.bench_function("deployment_project_row", |b| {
        b.iter(|| {
            for item in &items {
                black_box(project_row::<Deployments>(black_box(item), &()));
            }
        });
    });
}

criterion_group!(benches, bench_list_scaling, bench_project_row);
criterion_main!(benches);
