//! EPC register lookup used to pre-fill the questionnaire from a postcode.

pub mod client;
pub mod mapping;
pub mod router;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use client::EpcClient;
pub use mapping::{map_heating_type, map_property_type, parse_insulation, prefill_answers};
pub use router::epc_router;

pub const NO_RECORDS_MESSAGE: &str = "No EPC records found for this postcode";

/// One certificate as returned by the register, flattened to the fields the checker uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpcCertificate {
    pub address: String,
    pub postcode: String,
    pub current_energy_rating: String,
    pub potential_energy_rating: String,
    pub property_type: String,
    pub built_form: String,
    pub floor_description: String,
    pub walls_description: String,
    pub roof_description: String,
    pub windows_description: String,
    pub main_heat_description: String,
    pub main_fuel: String,
    pub hot_water_description: String,
    pub floor_area: f64,
    pub lodgement_date: String,
    pub certificate_hash: String,
}

impl EpcCertificate {
    pub fn lodged_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.lodgement_date.trim(), "%Y-%m-%d").ok()
    }
}

/// Most recent first; undated certificates go last.
pub fn sort_by_lodgement(certificates: &mut [EpcCertificate]) {
    certificates.sort_by(|a, b| b.lodged_on().cmp(&a.lodged_on()));
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpcLookupResponse {
    pub success: bool,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub certificates: Vec<EpcCertificate>,
}

impl EpcLookupResponse {
    pub fn from_certificates(mut certificates: Vec<EpcCertificate>) -> Self {
        if certificates.is_empty() {
            return Self {
                success: true,
                found: false,
                message: Some(NO_RECORDS_MESSAGE.to_string()),
                count: None,
                certificates,
            };
        }
        sort_by_lodgement(&mut certificates);
        Self {
            success: true,
            found: true,
            message: None,
            count: Some(certificates.len()),
            certificates,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EpcLookupError {
    #[error("Postcode is required")]
    MissingPostcode,
    #[error("EPC lookup service unavailable")]
    NotConfigured,
    #[error("EPC API authentication failed - check credentials")]
    AuthRejected,
    #[error("Failed to fetch EPC data")]
    Http(#[from] reqwest::Error),
    #[error("Failed to fetch EPC data")]
    Upstream(String),
}

/// Certificate search by postcode. A postcode with no certificates is an empty list.
#[async_trait]
pub trait EpcLookup: Send + Sync {
    async fn search(&self, postcode: &str) -> Result<Vec<EpcCertificate>, EpcLookupError>;
}

/// Strips all whitespace and uppercases.
pub fn clean_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

pub async fn lookup_postcode<L>(
    lookup: &L,
    postcode: &str,
) -> Result<EpcLookupResponse, EpcLookupError>
where
    L: EpcLookup + ?Sized,
{
    let cleaned = clean_postcode(postcode);
    if cleaned.is_empty() {
        return Err(EpcLookupError::MissingPostcode);
    }

    let certificates = lookup.search(&cleaned).await?;
    info!(postcode = %cleaned, rows = certificates.len(), "EPC lookup completed");
    Ok(EpcLookupResponse::from_certificates(certificates))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Vec<EpcCertificate>);

    #[async_trait]
    impl EpcLookup for Canned {
        async fn search(&self, postcode: &str) -> Result<Vec<EpcCertificate>, EpcLookupError> {
            assert_eq!(postcode, "SW1A1AA");
            Ok(self.0.clone())
        }
    }

    fn lodged(date: &str) -> EpcCertificate {
        EpcCertificate {
            lodgement_date: date.to_string(),
            ..EpcCertificate::default()
        }
    }

    #[tokio::test]
    async fn blank_postcode_is_rejected() {
        let err = lookup_postcode(&Canned(Vec::new()), "   ")
            .await
            .expect_err("blank");
        assert!(matches!(err, EpcLookupError::MissingPostcode));
    }

    #[tokio::test]
    async fn empty_search_is_not_found() {
        let response = lookup_postcode(&Canned(Vec::new()), " sw1a 1aa")
            .await
            .expect("lookup");
        assert!(response.success);
        assert!(!response.found);
        assert_eq!(response.message.as_deref(), Some(NO_RECORDS_MESSAGE));
    }

    #[tokio::test]
    async fn certificates_are_newest_first() {
        let canned = Canned(vec![lodged("2012-05-01"), lodged(""), lodged("2021-11-30")]);
        let response = lookup_postcode(&canned, "SW1A 1AA").await.expect("lookup");

        let dates: Vec<&str> = response
            .certificates
            .iter()
            .map(|certificate| certificate.lodgement_date.as_str())
            .collect();
        assert_eq!(dates, vec!["2021-11-30", "2012-05-01", ""]);
        assert_eq!(response.count, Some(3));
    }
}
