use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::workflows::admin::{AdminDirectory, AdminRole, AdminUser};
use crate::workflows::checker::domain::{
    Benefit, CheckerAnswers, EpcRating, HeatingType, IncomeBand, InsulationOption, PropertyType,
    Tenure,
};
use crate::workflows::checker::evaluate;
use crate::workflows::leads::domain::{LeadId, LeadRecord};
use crate::workflows::leads::materializer::materialize;
use crate::workflows::leads::repository::LeadRepository;
use crate::workflows::leads::router::lead_admin_router;
use crate::workflows::leads::service::LeadService;
use crate::workflows::repository::RepositoryError;

#[derive(Default)]
pub(super) struct MemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl MemoryLeadRepository {
    pub(super) fn seeded(records: Vec<LeadRecord>) -> Self {
        let repository = Self::default();
        for record in records {
            repository.insert(record).expect("seed lead");
        }
        repository
    }
}

impl LeadRepository for MemoryLeadRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord, read_at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("mutex poisoned");
        match guard.get_mut(&record.id) {
            Some(existing) if existing.updated_at != read_at => Err(RepositoryError::Stale),
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct TokenDirectory(HashMap<String, AdminUser>);

impl AdminDirectory for TokenDirectory {
    fn resolve(&self, token: &str) -> Result<Option<AdminUser>, RepositoryError> {
        Ok(self.0.get(token).cloned())
    }
}

pub(super) const MANAGER_TOKEN: &str = "manager-token";
pub(super) const VIEWER_TOKEN: &str = "viewer-token";

pub(super) fn directory() -> TokenDirectory {
    let mut users = HashMap::new();
    for (token, role) in [
        (MANAGER_TOKEN, AdminRole::LeadManager),
        (VIEWER_TOKEN, AdminRole::ReadOnly),
    ] {
        users.insert(
            token.to_string(),
            AdminUser {
                id: Uuid::new_v4(),
                email: format!("{}@ugrant.test", role.as_str()),
                name: None,
                role,
                active: true,
            },
        );
    }
    TokenDirectory(users)
}

pub(super) fn answers() -> CheckerAnswers {
    CheckerAnswers {
        house_number: "4".to_string(),
        postcode: "ls1  4ap".to_string(),
        property_type: Some(PropertyType::Terraced),
        tenure: Some(Tenure::PrivateRental),
        heating_type: Some(HeatingType::ElectricStorage),
        insulation: vec![InsulationOption::NoInsulation],
        benefits: vec![Benefit::JsaIncome],
        income_band: Some(IncomeBand::Under31k),
        epc_rating: Some(EpcRating::F),
        email: "tenant@example.com".to_string(),
        phone: "0113 496 0000".to_string(),
        wants_installer_contact: true,
        accept_terms: true,
        accept_privacy: true,
    }
}

pub(super) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn lead_created(answers: &CheckerAnswers, created: DateTime<Utc>) -> LeadRecord {
    materialize(answers, &evaluate(answers), created)
}

pub(super) fn service_with(
    records: Vec<LeadRecord>,
) -> (Arc<LeadService<MemoryLeadRepository>>, Arc<MemoryLeadRepository>) {
    let repository = Arc::new(MemoryLeadRepository::seeded(records));
    let service = Arc::new(LeadService::new(Arc::clone(&repository)));
    (service, repository)
}

pub(super) fn admin_router(service: Arc<LeadService<MemoryLeadRepository>>) -> Router {
    lead_admin_router(service, Arc::new(directory()))
}

pub(super) async fn send(
    router: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
