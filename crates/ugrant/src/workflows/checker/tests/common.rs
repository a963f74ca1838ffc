use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

use crate::workflows::checker::domain::{
    Benefit, CheckerAnswers, EpcRating, HeatingType, IncomeBand, InsulationOption, PropertyType,
    Tenure,
};
use crate::workflows::checker::router::checker_router;
use crate::workflows::leads::{LeadId, LeadRecord, LeadRepository, LeadService};
use crate::workflows::repository::RepositoryError;

/// Answers that pass every step validator.
pub(super) fn complete_answers() -> CheckerAnswers {
    CheckerAnswers {
        house_number: "12".to_string(),
        postcode: "SW1A 1AA".to_string(),
        property_type: Some(PropertyType::SemiDetached),
        tenure: Some(Tenure::OwnerOccupied),
        heating_type: Some(HeatingType::GasBoiler),
        insulation: vec![InsulationOption::LoftPartial],
        benefits: vec![Benefit::UniversalCredit],
        income_band: Some(IncomeBand::Under31k),
        epc_rating: Some(EpcRating::E),
        email: "resident@example.com".to_string(),
        phone: "07700 900123".to_string(),
        wants_installer_contact: true,
        accept_terms: true,
        accept_privacy: true,
    }
}

/// Comfortable household with a well-insulated, efficient home.
pub(super) fn well_off_answers() -> CheckerAnswers {
    CheckerAnswers {
        benefits: vec![Benefit::NoneOfTheAbove],
        epc_rating: Some(EpcRating::B),
        tenure: Some(Tenure::OwnerOccupied),
        heating_type: Some(HeatingType::GasBoiler),
        income_band: Some(IncomeBand::Over40k),
        insulation: vec![InsulationOption::CavityWall, InsulationOption::LoftFull],
        ..complete_answers()
    }
}

pub(super) fn answers_with(
    benefits: Vec<Benefit>,
    epc: EpcRating,
    tenure: Tenure,
    income: IncomeBand,
) -> CheckerAnswers {
    CheckerAnswers {
        benefits,
        epc_rating: Some(epc),
        tenure: Some(tenure),
        income_band: Some(income),
        ..complete_answers()
    }
}

/// Store that refuses every write; enough for routes that never persist.
pub(super) struct OfflineLeadRepository;

impl LeadRepository for OfflineLeadRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update(&self, _record: LeadRecord, _read_at: DateTime<Utc>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Ok(None)
    }

    fn all(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) fn offline_router() -> Router {
    checker_router(Arc::new(LeadService::new(Arc::new(OfflineLeadRepository))))
}

pub(super) async fn post_json(
    router: Router,
    uri: &str,
    body: &impl Serialize,
) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).expect("encodes")))
                .expect("request"),
        )
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}
