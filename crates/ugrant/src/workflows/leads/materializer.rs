use chrono::{DateTime, Utc};

use super::domain::{EligibilityDetails, LeadId, LeadRecord, LeadStatus};
use crate::workflows::checker::{CheckerAnswers, EligibilityResult};

/// Uppercases and collapses internal whitespace runs to one space.
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Builds the record persisted for a completed questionnaire.
pub fn materialize(
    answers: &CheckerAnswers,
    result: &EligibilityResult,
    now: DateTime<Utc>,
) -> LeadRecord {
    let contact = |value: &str| {
        answers
            .wants_installer_contact
            .then(|| value.trim().to_string())
    };

    LeadRecord {
        id: LeadId::generate(),
        email: contact(&answers.email),
        phone: contact(&answers.phone),
        postcode: normalize_postcode(&answers.postcode),
        property_type: answers.property_type,
        tenure: answers.tenure,
        heating_type: answers.heating_type,
        insulation: answers.insulation.clone(),
        benefits: answers.benefits.clone(),
        income_band: answers.income_band,
        epc_rating: answers.epc_rating,
        eligibility_tier: result.overall_tier,
        eligible_schemes: result.positive_scheme_slugs(),
        eligibility_details: EligibilityDetails {
            summary: result.summary.clone(),
            schemes: result.schemes.clone(),
            evaluated_at: now,
        },
        status: LeadStatus::New,
        price: None,
        notes: None,
        wants_installer_contact: answers.wants_installer_contact,
        accepted_terms: answers.accept_terms,
        accepted_privacy: answers.accept_privacy,
        consent_timestamp: now,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
