use serde::Serialize;

use super::domain::{Benefit, HeatingType, IncomeBand, InsulationOption, PropertyType, Tenure};

pub const TOTAL_STEPS: usize = 10;

/// Pseudo-slug returned once the last question has been answered.
pub const RESULTS_SLUG: &str = "results";

/// Ordered questionnaire steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepSlug {
    Postcode,
    PropertyType,
    Tenure,
    Heating,
    Insulation,
    Benefits,
    Income,
    Epc,
    Contact,
    Confirm,
}

impl StepSlug {
    pub const fn ordered() -> [Self; TOTAL_STEPS] {
        [
            Self::Postcode,
            Self::PropertyType,
            Self::Tenure,
            Self::Heating,
            Self::Insulation,
            Self::Benefits,
            Self::Income,
            Self::Epc,
            Self::Contact,
            Self::Confirm,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postcode => "postcode",
            Self::PropertyType => "property-type",
            Self::Tenure => "tenure",
            Self::Heating => "heating",
            Self::Insulation => "insulation",
            Self::Benefits => "benefits",
            Self::Income => "income",
            Self::Epc => "epc",
            Self::Contact => "contact",
            Self::Confirm => "confirm",
        }
    }

    /// One-based position in the questionnaire.
    pub const fn number(self) -> usize {
        match self {
            Self::Postcode => 1,
            Self::PropertyType => 2,
            Self::Tenure => 3,
            Self::Heating => 4,
            Self::Insulation => 5,
            Self::Benefits => 6,
            Self::Income => 7,
            Self::Epc => 8,
            Self::Contact => 9,
            Self::Confirm => 10,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|step| step.as_str() == raw.trim())
    }

    pub fn from_number(number: usize) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|step| step.number() == number)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number()
            .checked_sub(1)
            .and_then(Self::from_number)
    }

    pub fn config(self) -> StepConfig {
        match self {
            Self::Postcode => StepConfig {
                number: 1,
                slug: self,
                title: "Where is your property?",
                subtitle: Some("We'll look up your property details to speed things up"),
                help_text: None,
                input_type: InputType::Postcode,
                options: Vec::new(),
                answer_key: "postcode",
            },
            Self::PropertyType => StepConfig {
                number: 2,
                slug: self,
                title: "What type of property do you live in?",
                subtitle: Some("This helps us determine which improvements are suitable"),
                help_text: None,
                input_type: InputType::Radio,
                options: PropertyType::ordered()
                    .into_iter()
                    .map(|value| StepOption::new(value.value(), value.label()))
                    .collect(),
                answer_key: "propertyType",
            },
            Self::Tenure => StepConfig {
                number: 3,
                slug: self,
                title: "Do you own or rent your property?",
                subtitle: Some(
                    "Different schemes have different eligibility rules for tenants and owners",
                ),
                help_text: None,
                input_type: InputType::Radio,
                options: Tenure::ordered()
                    .into_iter()
                    .map(|value| {
                        StepOption::new(value.value(), value.label())
                            .with_description(value.description())
                    })
                    .collect(),
                answer_key: "tenure",
            },
            Self::Heating => StepConfig {
                number: 4,
                slug: self,
                title: "What is your main heating system?",
                subtitle: Some("This affects which heating upgrades you might be eligible for"),
                help_text: None,
                input_type: InputType::Radio,
                options: HeatingType::ordered()
                    .into_iter()
                    .map(|value| StepOption::new(value.value(), value.label()))
                    .collect(),
                answer_key: "heatingType",
            },
            Self::Insulation => StepConfig {
                number: 5,
                slug: self,
                title: "What insulation does your property have?",
                subtitle: Some("Select all that apply"),
                help_text: Some("If you're unsure, select \"Don't know\""),
                input_type: InputType::Checkbox,
                options: InsulationOption::ordered()
                    .into_iter()
                    .map(|value| StepOption::new(value.value(), value.label()))
                    .collect(),
                answer_key: "insulation",
            },
            Self::Benefits => StepConfig {
                number: 6,
                slug: self,
                title: "Do you or anyone in your household receive any of these benefits?",
                subtitle: Some("Select all that apply"),
                help_text: Some(
                    "Receiving certain benefits can increase your eligibility for grants",
                ),
                input_type: InputType::Checkbox,
                options: Benefit::ordered()
                    .into_iter()
                    .map(|value| StepOption::new(value.value(), value.label()))
                    .collect(),
                answer_key: "benefits",
            },
            Self::Income => StepConfig {
                number: 7,
                slug: self,
                title: "What is your annual household income?",
                subtitle: Some("This is the combined income of everyone in your household"),
                help_text: Some(
                    "Your income is used to determine eligibility - we never share this information",
                ),
                input_type: InputType::Radio,
                options: IncomeBand::ordered()
                    .into_iter()
                    .map(|value| StepOption::new(value.value(), value.label()))
                    .collect(),
                answer_key: "incomeBand",
            },
            Self::Epc => StepConfig {
                number: 8,
                slug: self,
                title: "What is your property's EPC rating?",
                subtitle: Some("Energy Performance Certificate rating from A (best) to G (worst)"),
                help_text: Some(
                    "If you don't know, you can check at gov.uk/find-energy-certificate or select \"Don't know\"",
                ),
                input_type: InputType::Epc,
                options: Vec::new(),
                answer_key: "epcRating",
            },
            Self::Contact => StepConfig {
                number: 9,
                slug: self,
                title: "Would you like to be contacted by installers?",
                subtitle: Some(
                    "If eligible, we can connect you with accredited installers in your area",
                ),
                help_text: Some("Your details will only be shared if you opt in below"),
                input_type: InputType::Contact,
                options: Vec::new(),
                answer_key: "contact",
            },
            Self::Confirm => StepConfig {
                number: 10,
                slug: self,
                title: "Almost there! Please confirm the following",
                subtitle: Some("Review and accept to see your eligibility results"),
                help_text: None,
                input_type: InputType::Confirm,
                options: Vec::new(),
                answer_key: "confirm",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Postcode,
    Radio,
    Checkbox,
    Epc,
    Contact,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl StepOption {
    fn new(value: &'static str, label: &'static str) -> Self {
        Self {
            value,
            label,
            description: None,
        }
    }

    fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Presentation metadata for a single questionnaire step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    pub number: usize,
    pub slug: StepSlug,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<&'static str>,
    pub input_type: InputType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<StepOption>,
    pub answer_key: &'static str,
}

pub fn checker_steps() -> Vec<StepConfig> {
    StepSlug::ordered()
        .into_iter()
        .map(StepSlug::config)
        .collect()
}

pub fn step_by_slug(slug: &str) -> Option<StepConfig> {
    StepSlug::parse(slug).map(StepSlug::config)
}

pub fn step_by_number(number: usize) -> Option<StepConfig> {
    StepSlug::from_number(number).map(StepSlug::config)
}

/// Slug following `current`; `results` after the last step, `postcode` for unknown input.
pub fn next_step_slug(current: &str) -> &'static str {
    match StepSlug::parse(current) {
        Some(step) => step.next().map(StepSlug::as_str).unwrap_or(RESULTS_SLUG),
        None => StepSlug::Postcode.as_str(),
    }
}

pub fn previous_step_slug(current: &str) -> Option<&'static str> {
    StepSlug::parse(current)
        .and_then(StepSlug::previous)
        .map(StepSlug::as_str)
}

pub fn is_valid_step_slug(slug: &str) -> bool {
    StepSlug::parse(slug).is_some()
}

pub fn all_step_slugs() -> Vec<&'static str> {
    StepSlug::ordered().into_iter().map(StepSlug::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_numbers_steps_in_order() {
        let steps = checker_steps();
        assert_eq!(steps.len(), TOTAL_STEPS);
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.number, index + 1);
            assert_eq!(step.slug.number(), step.number);
        }
        assert_eq!(steps[0].answer_key, "postcode");
        assert_eq!(steps[9].slug, StepSlug::Confirm);
    }

    #[test]
    fn navigation_walks_forward_and_back() {
        assert_eq!(next_step_slug("postcode"), "property-type");
        assert_eq!(next_step_slug("epc"), "contact");
        assert_eq!(next_step_slug("confirm"), RESULTS_SLUG);
        assert_eq!(next_step_slug("nonsense"), "postcode");

        assert_eq!(previous_step_slug("postcode"), None);
        assert_eq!(previous_step_slug("tenure"), Some("property-type"));
        assert_eq!(previous_step_slug("nonsense"), None);
    }

    #[test]
    fn slug_lookup_round_trips_catalog() {
        for slug in all_step_slugs() {
            assert!(is_valid_step_slug(slug));
            let step = step_by_slug(slug).expect("slug resolves");
            assert_eq!(step.slug.as_str(), slug);
            assert_eq!(step_by_number(step.number), Some(step));
        }
        assert!(!is_valid_step_slug("results"));
        assert!(step_by_number(0).is_none());
        assert!(step_by_number(11).is_none());
    }

    #[test]
    fn benefits_step_offers_none_sentinel() {
        let step = StepSlug::Benefits.config();
        assert_eq!(step.options.len(), 10);
        assert!(step
            .options
            .iter()
            .any(|option| option.value == "none" && option.label == "None of the above"));
    }
}
