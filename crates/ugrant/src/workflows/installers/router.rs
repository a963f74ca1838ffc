use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    InstallerFilters, InstallerForm, InstallerId, InstallerPatch, InstallerQuery,
};
use super::repository::InstallerRepository;
use super::service::{InstallerService, InstallerServiceError};
use crate::workflows::admin::{authorize, AdminDirectory, Permission};
use crate::workflows::repository::{Pagination, RepositoryError};

pub struct InstallerAdminState<R, D: ?Sized> {
    pub service: Arc<InstallerService<R>>,
    pub directory: Arc<D>,
}

impl<R, D: ?Sized> Clone for InstallerAdminState<R, D> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            directory: Arc::clone(&self.directory),
        }
    }
}

pub fn installer_admin_router<R, D>(
    service: Arc<InstallerService<R>>,
    directory: Arc<D>,
) -> Router
where
    R: InstallerRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    Router::new()
        .route(
            "/api/v1/admin/installers",
            get(list_handler::<R, D>).post(create_handler::<R, D>),
        )
        .route(
            "/api/v1/admin/installers/stats",
            get(stats_handler::<R, D>),
        )
        .route(
            "/api/v1/admin/installers/:installer_id",
            get(detail_handler::<R, D>)
                .patch(update_handler::<R, D>)
                .delete(delete_handler::<R, D>),
        )
        .with_state(InstallerAdminState { service, directory })
}

/// `active`/`verified` accept `true`, `false` or `all`.
#[derive(Debug, Default, Deserialize)]
pub struct InstallerListParams {
    pub active: Option<String>,
    pub verified: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl InstallerListParams {
    pub fn into_query(self) -> Result<InstallerQuery, String> {
        Ok(InstallerQuery {
            filters: InstallerFilters {
                active: parse_flag("active", self.active)?,
                verified: parse_flag("verified", self.verified)?,
                search: self.search.filter(|search| !search.trim().is_empty()),
            },
            pagination: Pagination::new(self.page, self.per_page),
        })
    }
}

fn parse_flag(name: &str, raw: Option<String>) -> Result<Option<bool>, String> {
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(format!("invalid {name} filter '{other}'")),
    }
}

pub(crate) async fn list_handler<R, D>(
    State(state): State<InstallerAdminState<R, D>>,
    headers: HeaderMap,
    Query(params): Query<InstallerListParams>,
) -> Response
where
    R: InstallerRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ReadInstallers) {
        return err.into_response();
    }
    let query = match params.into_query() {
        Ok(query) => query,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };
    match state.service.list(&query) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn stats_handler<R, D>(
    State(state): State<InstallerAdminState<R, D>>,
    headers: HeaderMap,
) -> Response
where
    R: InstallerRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ReadInstallers) {
        return err.into_response();
    }
    match state.service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R, D>(
    State(state): State<InstallerAdminState<R, D>>,
    headers: HeaderMap,
    axum::Json(form): axum::Json<InstallerForm>,
) -> Response
where
    R: InstallerRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ManageInstallers) {
        return err.into_response();
    }
    match state.service.create(form) {
        Ok(installer) => (StatusCode::CREATED, axum::Json(installer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<R, D>(
    State(state): State<InstallerAdminState<R, D>>,
    headers: HeaderMap,
    Path(installer_id): Path<String>,
) -> Response
where
    R: InstallerRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ReadInstallers) {
        return err.into_response();
    }
    let Some(id) = InstallerId::parse(&installer_id) else {
        return not_found();
    };
    match state.service.get(&id) {
        Ok(installer) => (StatusCode::OK, axum::Json(installer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R, D>(
    State(state): State<InstallerAdminState<R, D>>,
    headers: HeaderMap,
    Path(installer_id): Path<String>,
    axum::Json(patch): axum::Json<InstallerPatch>,
) -> Response
where
    R: InstallerRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ManageInstallers) {
        return err.into_response();
    }
    let Some(id) = InstallerId::parse(&installer_id) else {
        return not_found();
    };
    match state.service.update(&id, patch) {
        Ok(installer) => (StatusCode::OK, axum::Json(installer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R, D>(
    State(state): State<InstallerAdminState<R, D>>,
    headers: HeaderMap,
    Path(installer_id): Path<String>,
) -> Response
where
    R: InstallerRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ManageInstallers) {
        return err.into_response();
    }
    let Some(id) = InstallerId::parse(&installer_id) else {
        return not_found();
    };
    match state.service.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn not_found() -> Response {
    let payload = json!({ "error": "installer not found" });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn error_response(err: InstallerServiceError) -> Response {
    let status = match &err {
        InstallerServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InstallerServiceError::Repository(RepositoryError::NotFound) => return not_found(),
        InstallerServiceError::Repository(RepositoryError::Conflict)
        | InstallerServiceError::Repository(RepositoryError::Stale) => StatusCode::CONFLICT,
        InstallerServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
