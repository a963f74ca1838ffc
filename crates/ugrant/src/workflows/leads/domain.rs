use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflows::checker::{
    Benefit, EligibilityTier, EpcRating, HeatingType, IncomeBand, InsulationOption,
    PropertyType, SchemeEligibility, Tenure,
};
use crate::workflows::repository::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub Uuid);

impl LeadId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Sales lifecycle of a lead. `Deleted` is the soft-delete sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Sent,
    Purchased,
    Resent,
    Archived,
    Deleted,
}

impl LeadStatus {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::New,
            Self::Sent,
            Self::Purchased,
            Self::Resent,
            Self::Archived,
            Self::Deleted,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Sent => "sent",
            Self::Purchased => "purchased",
            Self::Resent => "resent",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Sent => "Sent",
            Self::Purchased => "Purchased",
            Self::Resent => "Resent",
            Self::Archived => "Archived",
            Self::Deleted => "Deleted",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|status| status.as_str() == raw.trim())
    }
}

/// Structured copy of the evaluation kept alongside the lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityDetails {
    pub summary: String,
    pub schemes: Vec<SchemeEligibility>,
    pub evaluated_at: DateTime<Utc>,
}

/// Persisted lead. Contact fields are only present when the respondent asked to be contacted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: LeadId,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postcode: String,
    pub property_type: Option<PropertyType>,
    pub tenure: Option<Tenure>,
    pub heating_type: Option<HeatingType>,
    pub insulation: Vec<InsulationOption>,
    pub benefits: Vec<Benefit>,
    pub income_band: Option<IncomeBand>,
    pub epc_rating: Option<EpcRating>,
    pub eligibility_tier: EligibilityTier,
    pub eligible_schemes: Vec<String>,
    pub eligibility_details: EligibilityDetails,
    pub status: LeadStatus,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub wants_installer_contact: bool,
    pub accepted_terms: bool,
    pub accepted_privacy: bool,
    pub consent_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl LeadRecord {
    pub fn is_deleted(&self) -> bool {
        self.status == LeadStatus::Deleted
    }

    fn mentions(&self, needle: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(needle);
        contains(&self.postcode)
            || self.email.as_deref().is_some_and(contains)
            || self.phone.as_deref().is_some_and(contains)
    }
}

/// Admin list filters. Without an explicit status, deleted leads are hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilters {
    pub status: Option<LeadStatus>,
    pub tier: Option<EligibilityTier>,
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl LeadFilters {
    pub fn matches(&self, record: &LeadRecord) -> bool {
        let status_ok = match self.status {
            Some(status) => record.status == status,
            None => !record.is_deleted(),
        };
        if !status_ok {
            return false;
        }

        if self.tier.is_some_and(|tier| record.eligibility_tier != tier) {
            return false;
        }

        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() && !record.mentions(&search.to_lowercase()) {
                return false;
            }
        }

        let created = record.created_at.naive_utc();
        if let Some(from) = self.date_from.and_then(|date| date.and_hms_opt(0, 0, 0)) {
            if created < from {
                return false;
            }
        }
        if let Some(to) = self.date_to.and_then(|date| date.and_hms_opt(23, 59, 59)) {
            if created > to {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
    pub filters: LeadFilters,
    pub pagination: Pagination,
}

impl LeadQuery {
    /// Filters, orders newest first, then pages.
    pub fn apply(&self, records: impl IntoIterator<Item = LeadRecord>) -> LeadPage {
        let mut matching: Vec<LeadRecord> = records
            .into_iter()
            .filter(|record| self.filters.matches(record))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let (leads, total) = self.pagination.apply(matching);
        LeadPage {
            leads,
            total,
            page: self.pagination.page,
            per_page: self.pagination.per_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadPage {
    pub leads: Vec<LeadRecord>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub eligible: usize,
    pub potentially_eligible: usize,
    pub not_eligible: usize,
}

/// Dashboard counters over every lead that is not soft-deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: usize,
    pub new: usize,
    pub sent: usize,
    pub purchased: usize,
    #[serde(rename = "byTier")]
    pub by_tier: TierCounts,
}

impl LeadStats {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a LeadRecord>) -> Self {
        let mut stats = Self::default();
        for record in records.into_iter().filter(|record| !record.is_deleted()) {
            stats.total += 1;
            match record.status {
                LeadStatus::New => stats.new += 1,
                LeadStatus::Sent => stats.sent += 1,
                LeadStatus::Purchased => stats.purchased += 1,
                _ => {}
            }
            match record.eligibility_tier {
                EligibilityTier::Eligible => stats.by_tier.eligible += 1,
                EligibilityTier::PotentiallyEligible => stats.by_tier.potentially_eligible += 1,
                EligibilityTier::NotEligible => stats.by_tier.not_eligible += 1,
            }
        }
        stats
    }
}
