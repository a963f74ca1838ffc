use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflows::repository::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallerId(pub Uuid);

impl InstallerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for InstallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Installer that buys leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installer {
    pub id: InstallerId,
    pub name: String,
    pub company_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub default_lead_price: f64,
    pub coverage_regions: Option<Vec<String>>,
    pub coverage_postcodes: Option<Vec<String>>,
    pub schemes_covered: Option<Vec<String>>,
    pub active: bool,
    pub verified: bool,
    pub total_leads_purchased: u32,
    pub total_spent: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload as submitted by the back-office form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InstallerForm {
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub default_lead_price: f64,
    pub coverage_regions: Vec<String>,
    pub coverage_postcodes: Vec<String>,
    pub schemes_covered: Vec<String>,
    pub active: bool,
    pub verified: bool,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InstallerPatch {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub default_lead_price: Option<f64>,
    pub coverage_regions: Option<Vec<String>>,
    pub coverage_postcodes: Option<Vec<String>>,
    pub schemes_covered: Option<Vec<String>>,
    pub active: Option<bool>,
    pub verified: Option<bool>,
}

pub(crate) fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn empty_to_none(values: Vec<String>) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

impl Installer {
    pub fn from_form(form: InstallerForm, now: DateTime<Utc>) -> Self {
        Self {
            id: InstallerId::generate(),
            name: form.name.trim().to_string(),
            company_name: blank_to_none(form.company_name),
            email: form.email.trim().to_string(),
            phone: blank_to_none(form.phone),
            default_lead_price: form.default_lead_price,
            coverage_regions: empty_to_none(form.coverage_regions),
            coverage_postcodes: empty_to_none(form.coverage_postcodes),
            schemes_covered: empty_to_none(form.schemes_covered),
            active: form.active,
            verified: form.verified,
            total_leads_purchased: 0,
            total_spent: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: InstallerPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(company_name) = patch.company_name {
            self.company_name = blank_to_none(company_name);
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = blank_to_none(phone);
        }
        if let Some(price) = patch.default_lead_price {
            self.default_lead_price = price;
        }
        if let Some(regions) = patch.coverage_regions {
            self.coverage_regions = empty_to_none(regions);
        }
        if let Some(postcodes) = patch.coverage_postcodes {
            self.coverage_postcodes = empty_to_none(postcodes);
        }
        if let Some(schemes) = patch.schemes_covered {
            self.schemes_covered = empty_to_none(schemes);
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(verified) = patch.verified {
            self.verified = verified;
        }
    }

    fn mentions(&self, needle: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(needle);
        contains(&self.name)
            || self.company_name.as_deref().is_some_and(contains)
            || contains(&self.email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerFilters {
    pub active: Option<bool>,
    pub verified: Option<bool>,
    pub search: Option<String>,
}

impl InstallerFilters {
    pub fn matches(&self, installer: &Installer) -> bool {
        if self.active.is_some_and(|active| installer.active != active) {
            return false;
        }
        if self.verified.is_some_and(|verified| installer.verified != verified) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => installer.mentions(&search.to_lowercase()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerQuery {
    pub filters: InstallerFilters,
    pub pagination: Pagination,
}

impl InstallerQuery {
    pub fn apply(&self, installers: impl IntoIterator<Item = Installer>) -> InstallerPage {
        let mut matching: Vec<Installer> = installers
            .into_iter()
            .filter(|installer| self.filters.matches(installer))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let (installers, total) = self.pagination.apply(matching);
        InstallerPage {
            installers,
            total,
            page: self.pagination.page,
            per_page: self.pagination.per_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallerPage {
    pub installers: Vec<Installer>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerStats {
    pub total: usize,
    pub active: usize,
    pub verified: usize,
}

impl InstallerStats {
    pub fn tally<'a>(installers: impl IntoIterator<Item = &'a Installer>) -> Self {
        installers
            .into_iter()
            .fold(Self::default(), |mut stats, installer| {
                stats.total += 1;
                stats.active += usize::from(installer.active);
                stats.verified += usize::from(installer.verified);
                stats
            })
    }
}
