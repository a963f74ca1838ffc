use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::{lookup_postcode, EpcLookup, EpcLookupError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LookupRequest {
    pub postcode: String,
}

pub fn epc_router<L>(lookup: Arc<L>) -> Router
where
    L: EpcLookup + ?Sized + 'static,
{
    Router::new()
        .route("/api/epc/lookup", post(lookup_handler::<L>))
        .with_state(lookup)
}

pub(crate) async fn lookup_handler<L>(
    State(lookup): State<Arc<L>>,
    axum::Json(request): axum::Json<LookupRequest>,
) -> Response
where
    L: EpcLookup + ?Sized + 'static,
{
    match lookup_postcode(lookup.as_ref(), &request.postcode).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(err) => {
            let status = match &err {
                EpcLookupError::MissingPostcode => StatusCode::BAD_REQUEST,
                EpcLookupError::NotConfigured | EpcLookupError::AuthRejected => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                EpcLookupError::Http(_) | EpcLookupError::Upstream(_) => {
                    error!(error = ?err, "EPC lookup failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let payload = json!({ "error": err.to_string() });
            (status, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::workflows::epc::EpcCertificate;

    enum Stub {
        Found,
        Unconfigured,
        Rejected,
        Broken,
    }

    #[async_trait]
    impl EpcLookup for Stub {
        async fn search(&self, postcode: &str) -> Result<Vec<EpcCertificate>, EpcLookupError> {
            match self {
                Stub::Found => Ok(vec![EpcCertificate {
                    address: "1 High Street".to_string(),
                    postcode: postcode.to_string(),
                    current_energy_rating: "E".to_string(),
                    lodgement_date: "2020-02-14".to_string(),
                    ..EpcCertificate::default()
                }]),
                Stub::Unconfigured => Err(EpcLookupError::NotConfigured),
                Stub::Rejected => Err(EpcLookupError::AuthRejected),
                Stub::Broken => Err(EpcLookupError::Upstream("502".to_string())),
            }
        }
    }

    async fn lookup(stub: Stub, body: &str) -> (StatusCode, Value) {
        let response = epc_router(Arc::new(stub))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/epc/lookup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn returns_certificates_for_cleaned_postcode() {
        let (status, body) = lookup(Stub::Found, r#"{"postcode":"ls6 2ab"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["found"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["certificates"][0]["postcode"], "LS62AB");
        assert_eq!(body["certificates"][0]["currentEnergyRating"], "E");
    }

    #[tokio::test]
    async fn missing_postcode_is_bad_request() {
        let (status, body) = lookup(Stub::Found, "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Postcode is required");
    }

    #[tokio::test]
    async fn credential_problems_are_service_unavailable() {
        let (status, body) = lookup(Stub::Unconfigured, r#"{"postcode":"LS6 2AB"}"#).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "EPC lookup service unavailable");

        let (status, body) = lookup(Stub::Rejected, r#"{"postcode":"LS6 2AB"}"#).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "EPC API authentication failed - check credentials");
    }

    #[tokio::test]
    async fn upstream_failure_is_internal_error() {
        let (status, body) = lookup(Stub::Broken, r#"{"postcode":"LS6 2AB"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch EPC data");
    }
}
