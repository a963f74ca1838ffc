use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use ugrant::workflows::admin::AdminDirectory;
use ugrant::workflows::checker::checker_router;
use ugrant::workflows::epc::{epc_router, EpcLookup};
use ugrant::workflows::installers::{installer_admin_router, InstallerRepository, InstallerService};
use ugrant::workflows::leads::{lead_admin_router, LeadRepository, LeadService};

pub(crate) struct Services<R, I, D: ?Sized, L: ?Sized> {
    pub(crate) leads: Arc<LeadService<R>>,
    pub(crate) installers: Arc<InstallerService<I>>,
    pub(crate) directory: Arc<D>,
    pub(crate) epc: Arc<L>,
}

pub(crate) fn with_service_routes<R, I, D, L>(services: Services<R, I, D, L>) -> axum::Router
where
    R: LeadRepository + 'static,
    I: InstallerRepository + 'static,
    D: AdminDirectory + ?Sized + 'static,
    L: EpcLookup + ?Sized + 'static,
{
    let Services {
        leads,
        installers,
        directory,
        epc,
    } = services;

    checker_router(Arc::clone(&leads))
        .merge(lead_admin_router(leads, Arc::clone(&directory)))
        .merge(installer_admin_router(installers, directory))
        .merge(epc_router(epc))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
