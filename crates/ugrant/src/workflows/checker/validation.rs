use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::CheckerAnswers;
use super::steps::StepSlug;

static POSTCODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{1,2}[0-9][A-Za-z0-9]?\s*[0-9][A-Za-z]{2}$")
        .expect("postcode pattern compiles")
});

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-()]").expect("separator pattern compiles"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+44|0)[0-9]{9,10}$").expect("phone pattern compiles"));

/// Outcome of checking one step's answers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl StepValidation {
    fn from_errors(errors: Vec<&'static str>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors: errors.into_iter().map(str::to_string).collect(),
        }
    }
}

/// UK postcode shape, e.g. `SW1A 1AA`, `M1 1AA`, `B33 8TH`. Case-insensitive.
pub fn is_valid_postcode(postcode: &str) -> bool {
    POSTCODE_PATTERN.is_match(postcode.trim())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Blank input is valid since the phone number is optional.
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.trim().is_empty() {
        return true;
    }
    let cleaned = PHONE_SEPARATORS.replace_all(phone, "");
    PHONE_PATTERN.is_match(&cleaned)
}

pub fn validate_step(answers: &CheckerAnswers, step: StepSlug) -> StepValidation {
    let mut errors = Vec::new();

    match step {
        StepSlug::Postcode => {
            if answers.house_number.trim().is_empty() {
                errors.push("Please enter your house number or name");
            }
            if answers.postcode.trim().is_empty() {
                errors.push("Please enter your postcode");
            } else if !is_valid_postcode(&answers.postcode) {
                errors.push("Please enter a valid UK postcode");
            }
        }
        StepSlug::PropertyType => {
            if answers.property_type.is_none() {
                errors.push("Please select your property type");
            }
        }
        StepSlug::Tenure => {
            if answers.tenure.is_none() {
                errors.push("Please select your tenure type");
            }
        }
        StepSlug::Heating => {
            if answers.heating_type.is_none() {
                errors.push("Please select your heating type");
            }
        }
        // "none" counts as a selection; an empty list does not.
        StepSlug::Insulation => {
            if answers.insulation.is_empty() {
                errors.push("Please select at least one option");
            }
        }
        StepSlug::Benefits => {
            if answers.benefits.is_empty() {
                errors.push("Please select at least one option");
            }
        }
        StepSlug::Income => {
            if answers.income_band.is_none() {
                errors.push("Please select your income band");
            }
        }
        StepSlug::Epc => {
            if answers.epc_rating.is_none() {
                errors.push("Please select your EPC rating");
            }
        }
        StepSlug::Contact => {
            if answers.wants_installer_contact {
                if answers.email.trim().is_empty() {
                    errors.push("Please enter your email address");
                } else if !is_valid_email(&answers.email) {
                    errors.push("Please enter a valid email address");
                }
                if !is_valid_phone(&answers.phone) {
                    errors.push("Please enter a valid UK phone number");
                }
            }
        }
        StepSlug::Confirm => {
            if !answers.accept_terms {
                errors.push("Please accept the Terms and Conditions");
            }
            if !answers.accept_privacy {
                errors.push("Please accept the Privacy Policy");
            }
        }
    }

    StepValidation::from_errors(errors)
}

pub fn is_step_complete(answers: &CheckerAnswers, step: StepSlug) -> bool {
    validate_step(answers, step).is_valid
}

/// Length of the longest valid prefix of the questionnaire.
pub fn completed_steps(answers: &CheckerAnswers) -> usize {
    StepSlug::ordered()
        .into_iter()
        .take_while(|step| is_step_complete(answers, *step))
        .count()
}

/// First step whose validator rejects the answers, with its errors.
pub fn first_invalid_step(answers: &CheckerAnswers) -> Option<(StepSlug, StepValidation)> {
    StepSlug::ordered().into_iter().find_map(|step| {
        let validation = validate_step(answers, step);
        (!validation.is_valid).then_some((step, validation))
    })
}
