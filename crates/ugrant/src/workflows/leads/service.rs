use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::domain::{LeadId, LeadPage, LeadQuery, LeadRecord, LeadStats, LeadStatus};
use super::materializer::materialize;
use super::repository::LeadRepository;
use crate::workflows::checker::{
    CheckerAnswers, EligibilityEngine, EligibilityResult, IncompleteAnswers,
};
use crate::workflows::repository::RepositoryError;

const NOTE_TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Outcome of persisting a lead. A failed write is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub result: EligibilityResult,
    pub lead: LeadSubmission,
}

/// Lead intake for the public checker plus the admin back-office operations.
pub struct LeadService<R> {
    repository: Arc<R>,
    engine: Arc<EligibilityEngine>,
}

impl<R> LeadService<R>
where
    R: LeadRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            engine: Arc::new(EligibilityEngine::standard()),
        }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Evaluate completed answers and store them as a new lead.
    pub fn submit(&self, answers: &CheckerAnswers) -> Result<SubmissionOutcome, LeadServiceError> {
        let result = self.engine.evaluate_validated(answers)?;
        let record = materialize(answers, &result, Utc::now());

        let lead = match self.repository.insert(record) {
            Ok(stored) => {
                info!(
                    lead_id = %stored.id,
                    tier = stored.eligibility_tier.as_str(),
                    schemes = stored.eligible_schemes.len(),
                    "lead created"
                );
                LeadSubmission {
                    success: true,
                    lead_id: Some(stored.id),
                    error: None,
                }
            }
            Err(err) => {
                error!(error = %err, "failed to create lead");
                LeadSubmission {
                    success: false,
                    lead_id: None,
                    error: Some(err.to_string()),
                }
            }
        };

        Ok(SubmissionOutcome { result, lead })
    }

    pub fn list(&self, query: &LeadQuery) -> Result<LeadPage, LeadServiceError> {
        Ok(self.repository.query(query)?)
    }

    pub fn get(&self, id: &LeadId) -> Result<LeadRecord, LeadServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// `deleted_at` follows the status: set on entering `deleted`, cleared on leaving it.
    pub fn update_status(
        &self,
        id: &LeadId,
        status: LeadStatus,
    ) -> Result<LeadRecord, LeadServiceError> {
        self.modify(id, |record, now| {
            info!(
                lead_id = %record.id,
                from = record.status.as_str(),
                to = status.as_str(),
                "lead status changed"
            );
            record.status = status;
            record.deleted_at = match status {
                LeadStatus::Deleted => record.deleted_at.or(Some(now)),
                _ => None,
            };
        })
    }

    pub fn update_price(&self, id: &LeadId, price: f64) -> Result<LeadRecord, LeadServiceError> {
        if !price.is_finite() || price < 0.0 {
            return Err(LeadServiceError::InvalidPrice(price));
        }
        self.modify(id, |record, _| {
            record.price = Some(price);
        })
    }

    /// Appends a timestamped note, separated from earlier notes by a blank line.
    pub fn add_note(&self, id: &LeadId, note: &str) -> Result<LeadRecord, LeadServiceError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(LeadServiceError::EmptyNote);
        }
        self.modify(id, |record, now| {
            let entry = format!("[{}]\n{note}", now.format(NOTE_TIMESTAMP_FORMAT));
            record.notes = Some(match record.notes.take().filter(|notes| !notes.is_empty()) {
                Some(existing) => format!("{existing}\n\n{entry}"),
                None => entry,
            });
        })
    }

    pub fn soft_delete(&self, id: &LeadId) -> Result<LeadRecord, LeadServiceError> {
        self.modify(id, |record, now| {
            record.status = LeadStatus::Deleted;
            record.deleted_at = Some(now);
            info!(lead_id = %record.id, "lead soft-deleted");
        })
    }

    pub fn restore(&self, id: &LeadId) -> Result<LeadRecord, LeadServiceError> {
        self.modify(id, |record, _| {
            record.status = LeadStatus::New;
            record.deleted_at = None;
            info!(lead_id = %record.id, "lead restored");
        })
    }

    pub fn stats(&self) -> Result<LeadStats, LeadServiceError> {
        Ok(self.repository.stats()?)
    }

    /// Read-modify-write guarded by `updated_at`: a concurrent edit landing between the fetch
    /// and the write surfaces as [`RepositoryError::Stale`] instead of being overwritten.
    fn modify<F>(&self, id: &LeadId, change: F) -> Result<LeadRecord, LeadServiceError>
    where
        F: FnOnce(&mut LeadRecord, DateTime<Utc>),
    {
        let mut record = self.get(id)?;
        let read_at = record.updated_at;
        let now = Utc::now();
        change(&mut record, now);
        record.updated_at = now;
        self.repository.update(record.clone(), read_at)?;
        Ok(record)
    }
}

/// Error raised by the lead service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Incomplete(#[from] IncompleteAnswers),
    #[error("price must be a non-negative amount, got {0}")]
    InvalidPrice(f64),
    #[error("note must not be empty")]
    EmptyNote,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
