//! Lead capture and the admin lead back office.

pub mod domain;
pub mod materializer;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    EligibilityDetails, LeadFilters, LeadId, LeadPage, LeadQuery, LeadRecord, LeadStats,
    LeadStatus, TierCounts,
};
pub use materializer::{materialize, normalize_postcode};
pub use repository::LeadRepository;
pub use router::{lead_admin_router, LeadListParams};
pub use service::{LeadService, LeadServiceError, LeadSubmission, SubmissionOutcome};
