use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{LeadFilters, LeadId, LeadQuery, LeadStatus};
use super::repository::LeadRepository;
use super::service::{LeadService, LeadServiceError};
use crate::workflows::admin::{authorize, AdminDirectory, Permission};
use crate::workflows::checker::EligibilityTier;
use crate::workflows::repository::{Pagination, RepositoryError};

pub struct LeadAdminState<R, D: ?Sized> {
    pub service: Arc<LeadService<R>>,
    pub directory: Arc<D>,
}

impl<R, D: ?Sized> Clone for LeadAdminState<R, D> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            directory: Arc::clone(&self.directory),
        }
    }
}

/// Back-office lead endpoints. Every route requires a bearer token.
pub fn lead_admin_router<R, D>(service: Arc<LeadService<R>>, directory: Arc<D>) -> Router
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/admin/leads", get(list_handler::<R, D>))
        .route("/api/v1/admin/leads/stats", get(stats_handler::<R, D>))
        .route(
            "/api/v1/admin/leads/:lead_id",
            get(detail_handler::<R, D>).delete(delete_handler::<R, D>),
        )
        .route(
            "/api/v1/admin/leads/:lead_id/status",
            patch(status_handler::<R, D>),
        )
        .route(
            "/api/v1/admin/leads/:lead_id/price",
            patch(price_handler::<R, D>),
        )
        .route(
            "/api/v1/admin/leads/:lead_id/notes",
            post(note_handler::<R, D>),
        )
        .route(
            "/api/v1/admin/leads/:lead_id/restore",
            post(restore_handler::<R, D>),
        )
        .with_state(LeadAdminState { service, directory })
}

/// Raw list filters as they arrive on the query string. `status=all` and blanks mean "any".
#[derive(Debug, Default, Deserialize)]
pub struct LeadListParams {
    pub status: Option<String>,
    pub tier: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl LeadListParams {
    pub fn into_query(self) -> Result<LeadQuery, String> {
        let status = match blank_or_all(self.status) {
            Some(raw) => Some(
                LeadStatus::parse(&raw).ok_or_else(|| format!("unknown lead status '{raw}'"))?,
            ),
            None => None,
        };
        let tier = match blank_or_all(self.tier) {
            Some(raw) => Some(
                EligibilityTier::ordered()
                    .into_iter()
                    .find(|tier| tier.as_str() == raw)
                    .ok_or_else(|| format!("unknown eligibility tier '{raw}'"))?,
            ),
            None => None,
        };

        Ok(LeadQuery {
            filters: LeadFilters {
                status,
                tier,
                search: self.search.filter(|search| !search.trim().is_empty()),
                date_from: parse_date(self.date_from)?,
                date_to: parse_date(self.date_to)?,
            },
            pagination: Pagination::new(self.page, self.per_page),
        })
    }
}

fn blank_or_all(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != "all")
}

fn parse_date(raw: Option<String>) -> Result<Option<NaiveDate>, String> {
    match raw.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD")),
        None => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: LeadStatus,
}

#[derive(Debug, Deserialize)]
pub struct PriceUpdate {
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

pub(crate) async fn list_handler<R, D>(
    State(state): State<LeadAdminState<R, D>>,
    headers: HeaderMap,
    Query(params): Query<LeadListParams>,
) -> Response
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ReadLeads) {
        return err.into_response();
    }
    let query = match params.into_query() {
        Ok(query) => query,
        Err(message) => return bad_request(message),
    };
    match state.service.list(&query) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn stats_handler<R, D>(
    State(state): State<LeadAdminState<R, D>>,
    headers: HeaderMap,
) -> Response
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ReadLeads) {
        return err.into_response();
    }
    match state.service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn detail_handler<R, D>(
    State(state): State<LeadAdminState<R, D>>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ReadLeads) {
        return err.into_response();
    }
    let Some(id) = LeadId::parse(&lead_id) else {
        return lead_not_found(&lead_id);
    };
    match state.service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn status_handler<R, D>(
    State(state): State<LeadAdminState<R, D>>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ManageLeads) {
        return err.into_response();
    }
    let Some(id) = LeadId::parse(&lead_id) else {
        return lead_not_found(&lead_id);
    };
    match state.service.update_status(&id, update.status) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn price_handler<R, D>(
    State(state): State<LeadAdminState<R, D>>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
    axum::Json(update): axum::Json<PriceUpdate>,
) -> Response
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ManageLeads) {
        return err.into_response();
    }
    let Some(id) = LeadId::parse(&lead_id) else {
        return lead_not_found(&lead_id);
    };
    match state.service.update_price(&id, update.price) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn note_handler<R, D>(
    State(state): State<LeadAdminState<R, D>>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
    axum::Json(request): axum::Json<NoteRequest>,
) -> Response
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ManageLeads) {
        return err.into_response();
    }
    let Some(id) = LeadId::parse(&lead_id) else {
        return lead_not_found(&lead_id);
    };
    match state.service.add_note(&id, &request.note) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn delete_handler<R, D>(
    State(state): State<LeadAdminState<R, D>>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ManageLeads) {
        return err.into_response();
    }
    let Some(id) = LeadId::parse(&lead_id) else {
        return lead_not_found(&lead_id);
    };
    match state.service.soft_delete(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn restore_handler<R, D>(
    State(state): State<LeadAdminState<R, D>>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
{
    if let Err(err) = authorize(state.directory.as_ref(), &headers, Permission::ManageLeads) {
        return err.into_response();
    }
    let Some(id) = LeadId::parse(&lead_id) else {
        return lead_not_found(&lead_id);
    };
    match state.service.restore(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => service_error_response(err),
    }
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn lead_not_found(lead_id: &str) -> Response {
    let payload = json!({
        "error": "lead not found",
        "lead_id": lead_id,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

pub(crate) fn service_error_response(err: LeadServiceError) -> Response {
    match err {
        LeadServiceError::Incomplete(incomplete) => {
            let payload = json!({
                "error": incomplete.to_string(),
                "step": incomplete.step.as_str(),
                "errors": incomplete.errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        LeadServiceError::InvalidPrice(_) | LeadServiceError::EmptyNote => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        LeadServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "lead not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        LeadServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "lead already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        LeadServiceError::Repository(RepositoryError::Stale) => {
            let payload = json!({ "error": "lead changed since it was read; reload and retry" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
