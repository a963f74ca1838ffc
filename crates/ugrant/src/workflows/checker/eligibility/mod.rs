mod rules;
mod schemes;

use serde::{Deserialize, Serialize};

use super::domain::CheckerAnswers;
use super::steps::StepSlug;
use super::validation::first_invalid_step;
use rules::{AnswerFacts, SchemeRules};

/// Verdict strength. Variants are declared weakest first so `Ord` ranks `Eligible` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityTier {
    NotEligible,
    PotentiallyEligible,
    Eligible,
}

impl EligibilityTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Eligible, Self::PotentiallyEligible, Self::NotEligible]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eligible => "eligible",
            Self::PotentiallyEligible => "potentially_eligible",
            Self::NotEligible => "not_eligible",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Eligible => "Eligible",
            Self::PotentiallyEligible => "Potentially eligible",
            Self::NotEligible => "Not eligible",
        }
    }

    /// Eligible and potentially eligible schemes are both worth passing to installers.
    pub const fn is_positive(self) -> bool {
        !matches!(self, Self::NotEligible)
    }
}

/// Grant schemes evaluated for every respondent, in result order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    Eco4,
    Gbis,
    WarmHomeDiscount,
    BoilerUpgradeScheme,
    LaFlex,
}

impl Scheme {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Eco4,
            Self::Gbis,
            Self::WarmHomeDiscount,
            Self::BoilerUpgradeScheme,
            Self::LaFlex,
        ]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Eco4 => "eco4",
            Self::Gbis => "gbis",
            Self::WarmHomeDiscount => "warm-home-discount",
            Self::BoilerUpgradeScheme => "boiler-upgrade-scheme",
            Self::LaFlex => "la-flex",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Eco4 => "ECO4",
            Self::Gbis => "Great British Insulation Scheme",
            Self::WarmHomeDiscount => "Warm Home Discount",
            Self::BoilerUpgradeScheme => "Boiler Upgrade Scheme",
            Self::LaFlex => "LA Flex",
        }
    }

    /// Fixed grant ceiling in pounds, where the scheme publishes one.
    pub const fn max_grant(self) -> Option<u32> {
        match self {
            Self::WarmHomeDiscount => Some(150),
            Self::BoilerUpgradeScheme => Some(7500),
            Self::Eco4 | Self::Gbis | Self::LaFlex => None,
        }
    }

    fn rules(self) -> SchemeRules {
        match self {
            Self::Eco4 => schemes::eco4(),
            Self::Gbis => schemes::gbis(),
            Self::WarmHomeDiscount => schemes::warm_home_discount(),
            Self::BoilerUpgradeScheme => schemes::boiler_upgrade_scheme(),
            Self::LaFlex => schemes::la_flex(),
        }
    }
}

/// Verdict for a single scheme with the user-facing reasons behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeEligibility {
    pub slug: String,
    pub name: String,
    pub tier: EligibilityTier,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_grant: Option<u32>,
}

/// Aggregated verdict across all schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub overall_tier: EligibilityTier,
    pub schemes: Vec<SchemeEligibility>,
    pub summary: String,
}

impl EligibilityResult {
    pub fn count_at(&self, tier: EligibilityTier) -> usize {
        self.schemes
            .iter()
            .filter(|scheme| scheme.tier == tier)
            .count()
    }

    /// Slugs of schemes at `eligible` or `potentially_eligible`.
    pub fn positive_scheme_slugs(&self) -> Vec<String> {
        self.schemes
            .iter()
            .filter(|scheme| scheme.tier.is_positive())
            .map(|scheme| scheme.slug.clone())
            .collect()
    }

    pub fn scheme(&self, scheme: Scheme) -> Option<&SchemeEligibility> {
        self.schemes
            .iter()
            .find(|entry| entry.slug == scheme.slug())
    }
}

/// Raised by validated evaluation when a step has not been answered properly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("answers incomplete at step '{}': {}", step.as_str(), errors.join("; "))]
pub struct IncompleteAnswers {
    pub step: StepSlug,
    pub errors: Vec<String>,
}

/// Stateless evaluator holding the rule cascade of every scheme.
pub struct EligibilityEngine {
    schemes: Vec<SchemeRules>,
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl EligibilityEngine {
    pub fn standard() -> Self {
        Self {
            schemes: Scheme::ordered().into_iter().map(Scheme::rules).collect(),
        }
    }

    pub fn check(&self, scheme: Scheme, answers: &CheckerAnswers) -> SchemeEligibility {
        let facts = AnswerFacts::from_answers(answers);
        self.schemes
            .iter()
            .find(|rules| rules.scheme == scheme)
            .map(|rules| rules.evaluate(&facts))
            .unwrap_or_else(|| scheme.rules().evaluate(&facts))
    }

    /// Total over any answers. Unanswered fields fall through to `not_eligible`.
    pub fn evaluate(&self, answers: &CheckerAnswers) -> EligibilityResult {
        let facts = AnswerFacts::from_answers(answers);
        let schemes: Vec<SchemeEligibility> = self
            .schemes
            .iter()
            .map(|rules| rules.evaluate(&facts))
            .collect();

        let overall_tier = schemes
            .iter()
            .map(|scheme| scheme.tier)
            .max()
            .unwrap_or(EligibilityTier::NotEligible);

        let summary = summarize(overall_tier, &schemes);

        EligibilityResult {
            overall_tier,
            schemes,
            summary,
        }
    }

    /// Evaluates only once every step validator accepts the answers.
    pub fn evaluate_validated(
        &self,
        answers: &CheckerAnswers,
    ) -> Result<EligibilityResult, IncompleteAnswers> {
        if let Some((step, validation)) = first_invalid_step(answers) {
            return Err(IncompleteAnswers {
                step,
                errors: validation.errors,
            });
        }
        Ok(self.evaluate(answers))
    }
}

fn summarize(overall: EligibilityTier, schemes: &[SchemeEligibility]) -> String {
    let count = schemes
        .iter()
        .filter(|scheme| scheme.tier == overall)
        .count();
    let plural = if count > 1 { "s" } else { "" };

    match overall {
        EligibilityTier::Eligible => format!(
            "Great news! You appear to be eligible for {count} energy scheme{plural}."
        ),
        EligibilityTier::PotentiallyEligible => format!(
            "You may be eligible for {count} energy scheme{plural}. Further verification is needed."
        ),
        EligibilityTier::NotEligible => NOT_ELIGIBLE_SUMMARY.to_string(),
    }
}

pub const NOT_ELIGIBLE_SUMMARY: &str = "Based on the information provided, you don't currently qualify for the main energy schemes. However, circumstances can change - check back if your situation changes.";

pub fn evaluate(answers: &CheckerAnswers) -> EligibilityResult {
    EligibilityEngine::standard().evaluate(answers)
}

pub fn evaluate_validated(
    answers: &CheckerAnswers,
) -> Result<EligibilityResult, IncompleteAnswers> {
    EligibilityEngine::standard().evaluate_validated(answers)
}

pub fn check_eco4(answers: &CheckerAnswers) -> SchemeEligibility {
    Scheme::Eco4.rules().evaluate(&AnswerFacts::from_answers(answers))
}

pub fn check_gbis(answers: &CheckerAnswers) -> SchemeEligibility {
    Scheme::Gbis.rules().evaluate(&AnswerFacts::from_answers(answers))
}

pub fn check_warm_home_discount(answers: &CheckerAnswers) -> SchemeEligibility {
    Scheme::WarmHomeDiscount
        .rules()
        .evaluate(&AnswerFacts::from_answers(answers))
}

pub fn check_boiler_upgrade_scheme(answers: &CheckerAnswers) -> SchemeEligibility {
    Scheme::BoilerUpgradeScheme
        .rules()
        .evaluate(&AnswerFacts::from_answers(answers))
}

pub fn check_la_flex(answers: &CheckerAnswers) -> SchemeEligibility {
    Scheme::LaFlex.rules().evaluate(&AnswerFacts::from_answers(answers))
}
