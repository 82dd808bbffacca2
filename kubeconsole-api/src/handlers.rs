//! HTTP routes
//!
//! Thin axum handlers over [`Dispatcher`]. Parameter names follow the
//! console front end: `dcID`, `azID`, `clusterID`, `namespace`, `objID`,
//! `start`, `orderfield`, `direction`, `searchContent`, `objectid[]`, `action`,
//! `objContent`, `objFile`, `objValue`.

use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use kubeconsole_common::{ActionId, CascadingOptions, ScopeSelection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cmdb::{ListQuery, Table};
use crate::dispatch::{ListView, ModuleMeta};
use crate::error::{ApiError, ConsoleError, ConsoleResult};
use crate::kubernetes::{ManifestSource, ResourceDetail};
use crate::pipeline::ListParams;
use crate::state::AppState;

/// Scope fields shared by every workload request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeParams {
    #[serde(rename = "dcID")]
    pub dc_id: Option<String>,
    #[serde(rename = "azID")]
    pub az_id: Option<String>,
    #[serde(rename = "clusterID")]
    pub cluster_id: Option<String>,
    pub namespace: Option<String>,
}

impl ScopeParams {
    /// Missing fields become the unselected sentinel
    pub fn selection(&self) -> ScopeSelection {
        let level = |value: &Option<String>| value.clone().unwrap_or_else(|| kubeconsole_common::UNSELECTED.to_string());
        ScopeSelection {
            datacenter_id: level(&self.dc_id),
            zone_id: level(&self.az_id),
            cluster_id: level(&self.cluster_id),
            namespace: level(&self.namespace),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQueryParams {
    #[serde(flatten)]
    pub scope: ScopeParams,
    pub start: Option<String>,
    pub orderfield: Option<String>,
    pub direction: Option<String>,
    #[serde(rename = "searchContent")]
    pub search_content: Option<String>,
    /// `quota_list` lists the quotas of the namespace named by `objID`
    pub action: Option<String>,
    #[serde(rename = "objID", default)]
    pub obj_id: String,
}

impl ListQueryParams {
    /// Unparsable or negative starts fall back to the first page
    pub fn list_params(&self) -> ListParams {
        ListParams {
            start: self
                .start
                .as_deref()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
            order_field: self.orderfield.clone(),
            direction: self.direction.clone(),
            search_content: self.search_content.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQueryParams {
    #[serde(flatten)]
    pub scope: ScopeParams,
    #[serde(rename = "objID", default)]
    pub obj_id: String,
    pub action: Option<String>,
}

/// A JSON `manifest` or YAML `objContent`, exactly one of the two
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    #[serde(flatten)]
    pub scope: ScopeParams,
    #[serde(default)]
    pub manifest: Option<serde_json::Value>,
    #[serde(rename = "objContent", default)]
    pub obj_content: Option<String>,
    /// `add_quota` or `add_limit_range` creates in the namespace named by `objID`
    pub action: Option<String>,
    #[serde(rename = "objID", default)]
    pub obj_id: String,
}

impl AddRequest {
    pub fn source(&self) -> ConsoleResult<ManifestSource> {
        match (&self.manifest, &self.obj_content) {
            (Some(manifest), None) => Ok(ManifestSource::Json(manifest.clone())),
            (None, Some(text)) => Ok(ManifestSource::Yaml(text.clone())),
            (Some(_), Some(_)) => Err(ConsoleError::InvalidManifest(
                "send either manifest or objContent, not both".to_string(),
            )),
            (None, None) => Err(ConsoleError::InvalidManifest("no manifest given".to_string())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateNameParams {
    #[serde(flatten)]
    pub scope: ScopeParams,
    #[serde(rename = "objValue", default)]
    pub obj_value: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(flatten)]
    pub scope: ScopeParams,
    #[serde(rename = "objectid[]", alias = "objectid", default)]
    pub object_ids: Vec<String>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NamesResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateNameResponse {
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub kinds: usize,
    pub cmdb: &'static str,
}

fn parse_action(raw: Option<&str>) -> ConsoleResult<Option<ActionId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => Ok(Some(name.parse()?)),
        None => Ok(None),
    }
}

/// Build the API router around `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/workload/:kind/list", get(list_objects))
        .route("/api/workload/:kind/options", get(list_options))
        .route("/api/workload/:kind/detail", get(show_detail))
        .route("/api/workload/:kind/names", get(list_names))
        .route("/api/workload/:kind/validate_name", get(validate_name))
        .route("/api/workload/:kind/add", post(add_object))
        .route("/api/workload/:kind/upload", post(upload_object))
        .route("/api/workload/:kind/delete", post(delete_objects))
        .route("/api/workload/:kind/meta", get(module_meta))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cmdb = match state.cmdb.count(Table::Datacenter, &ListQuery::new()).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(code = e.code(), cause = %e, "CMDB health check failed");
            "unreachable"
        }
    };

    Json(HealthResponse {
        status: if cmdb == "ok" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        kinds: state.dispatcher.registry().kinds().len(),
        cmdb,
    })
}

async fn list_objects(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<ListQueryParams>,
) -> Result<Json<ListView>, ApiError> {
    let scope = params.scope.selection();
    let list_params = params.list_params();
    let view = match parse_action(params.action.as_deref())? {
        None => state.dispatcher.list(&kind, &scope, &list_params).await?,
        Some(ActionId::QuotaList) => {
            state
                .dispatcher
                .quota_list(&kind, &scope, &params.obj_id, &list_params)
                .await?
        }
        Some(other) => {
            return Err(ConsoleError::InvalidRequest(format!("action {} has no list view", other)).into());
        }
    };
    Ok(Json(view))
}

async fn list_options(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<ScopeParams>,
) -> Result<Json<CascadingOptions>, ApiError> {
    let options = state.dispatcher.options(&kind, &params.selection()).await?;
    Ok(Json(options))
}

async fn show_detail(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<DetailQueryParams>,
) -> Result<Json<ResourceDetail>, ApiError> {
    let action = parse_action(params.action.as_deref())?;
    let detail = state
        .dispatcher
        .detail(&kind, &params.scope.selection(), &params.obj_id, action)
        .await?;
    Ok(Json(detail))
}

async fn list_names(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<ScopeParams>,
) -> Result<Json<NamesResponse>, ApiError> {
    let names = state.dispatcher.names(&kind, &params.selection()).await?;
    Ok(Json(NamesResponse { names }))
}

async fn validate_name(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<ValidateNameParams>,
) -> Result<Json<ValidateNameResponse>, ApiError> {
    state
        .dispatcher
        .validate_name(&kind, &params.scope.selection(), &params.obj_value)
        .await?;
    Ok(Json(ValidateNameResponse {
        name: params.obj_value.trim().to_string(),
        available: true,
    }))
}

async fn add_object(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(request): Json<AddRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let scope = request.scope.selection();
    let source = request.source()?;
    let names = match parse_action(request.action.as_deref())? {
        None => state.dispatcher.add(&kind, &scope, &source).await?,
        Some(action) => {
            state
                .dispatcher
                .add_for_row(&kind, &scope, action, &request.obj_id, &source)
                .await?
        }
    };
    Ok(Json(AddResponse { names }))
}

/// Add from an uploaded YAML file (`objFile`) plus scope form fields
async fn upload_object(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<AddResponse>, ApiError> {
    let unreadable = |e: axum::extract::multipart::MultipartError| {
        ApiError::from(ConsoleError::InvalidManifest(format!("unreadable upload: {}", e)))
    };

    let mut scope = ScopeParams::default();
    let mut content = None;
    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.map_err(unreadable)?;
        match name.as_str() {
            "dcID" => scope.dc_id = Some(value),
            "azID" => scope.az_id = Some(value),
            "clusterID" => scope.cluster_id = Some(value),
            "namespace" => scope.namespace = Some(value),
            "objFile" => content = Some(value),
            _ => {}
        }
    }

    let content = content.ok_or_else(|| ConsoleError::InvalidManifest("no objFile uploaded".to_string()))?;
    let names = state
        .dispatcher
        .add(&kind, &scope.selection(), &ManifestSource::Yaml(content))
        .await?;
    Ok(Json(AddResponse { names }))
}

async fn delete_objects(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let action = parse_action(request.action.as_deref())?;
    let deleted = state
        .dispatcher
        .delete(&kind, &request.scope.selection(), &request.object_ids, action)
        .await?;
    Ok(Json(DeleteResponse { deleted }))
}

async fn module_meta(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<ModuleMeta>, ApiError> {
    Ok(Json(state.dispatcher.meta(&kind)?))
}
