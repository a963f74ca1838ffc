use chrono::{DateTime, Utc};

use super::domain::{LeadId, LeadPage, LeadQuery, LeadRecord, LeadStats};
use crate::workflows::repository::RepositoryError;

/// Record store for leads. Deletes are status changes, never physical removals.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    /// Replaces the stored record only while its `updated_at` still equals `read_at`, the
    /// stamp the caller saw when it fetched the record. A newer write yields
    /// [`RepositoryError::Stale`].
    fn update(&self, record: LeadRecord, read_at: DateTime<Utc>) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<LeadRecord>, RepositoryError>;

    fn query(&self, query: &LeadQuery) -> Result<LeadPage, RepositoryError> {
        Ok(query.apply(self.all()?))
    }

    fn stats(&self) -> Result<LeadStats, RepositoryError> {
        Ok(LeadStats::tally(&self.all()?))
    }
}
