use super::super::domain::{
    Benefit, CheckerAnswers, EpcRating, HeatingType, IncomeBand, InsulationOption, Tenure,
};
use super::{EligibilityTier, Scheme, SchemeEligibility};

/// Boolean view of the answers shared by every scheme's rule cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnswerFacts {
    pub qualifying_benefit: bool,
    pub tax_credit_benefit: bool,
    pub pension_credit: bool,
    pub low_income: bool,
    pub poor_epc: bool,
    pub unknown_epc: bool,
    pub tenure: Option<Tenure>,
    pub heating: Option<HeatingType>,
    pub needs_cavity_wall: bool,
    pub needs_loft_insulation: bool,
}

impl AnswerFacts {
    pub fn from_answers(answers: &CheckerAnswers) -> Self {
        Self {
            qualifying_benefit: answers.benefits.iter().any(|benefit| benefit.is_qualifying()),
            tax_credit_benefit: answers.benefits.iter().any(|benefit| benefit.is_tax_credit()),
            pension_credit: answers.has_benefit(Benefit::PensionCredit),
            low_income: answers.income_band == Some(IncomeBand::Under31k),
            poor_epc: answers.epc_rating.is_some_and(|rating| rating.is_poor()),
            unknown_epc: answers.epc_rating == Some(EpcRating::Unknown),
            tenure: answers.tenure,
            heating: answers.heating_type,
            needs_cavity_wall: !answers.has_insulation(InsulationOption::CavityWall),
            needs_loft_insulation: !answers.has_insulation(InsulationOption::LoftFull),
        }
    }

    /// Owner-occupied, private rental, or social housing.
    pub fn supported_tenure(&self) -> bool {
        matches!(
            self.tenure,
            Some(Tenure::OwnerOccupied | Tenure::PrivateRental | Tenure::SocialHousing)
        )
    }

    pub fn owner_occupied(&self) -> bool {
        self.tenure == Some(Tenure::OwnerOccupied)
    }

    pub fn needs_insulation(&self) -> bool {
        self.needs_cavity_wall || self.needs_loft_insulation
    }
}

pub(crate) type Predicate = fn(&AnswerFacts) -> bool;

/// Reason copy attached to a matched rule.
#[derive(Clone, Copy)]
pub(crate) enum Reasons {
    Fixed(&'static [&'static str]),
    Derived(fn(&AnswerFacts) -> Vec<&'static str>),
}

impl Reasons {
    fn render(&self, facts: &AnswerFacts) -> Vec<String> {
        match self {
            Reasons::Fixed(lines) => lines.iter().map(|line| line.to_string()).collect(),
            Reasons::Derived(build) => build(facts).into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Rule {
    pub tier: EligibilityTier,
    pub when: Predicate,
    pub reasons: Reasons,
}

impl Rule {
    pub fn new(tier: EligibilityTier, when: Predicate, reasons: Reasons) -> Self {
        Self {
            tier,
            when,
            reasons,
        }
    }
}

/// Ordered rule cascade for one scheme. The first matching rule wins; when nothing matches
/// the scheme is `not_eligible` with the fallback reasons.
pub(crate) struct SchemeRules {
    pub scheme: Scheme,
    pub rules: Vec<Rule>,
    pub fallback: Reasons,
}

impl SchemeRules {
    pub fn evaluate(&self, facts: &AnswerFacts) -> SchemeEligibility {
        let (tier, reasons) = self
            .rules
            .iter()
            .find(|rule| (rule.when)(facts))
            .map(|rule| (rule.tier, rule.reasons.render(facts)))
            .unwrap_or_else(|| (EligibilityTier::NotEligible, self.fallback.render(facts)));

        SchemeEligibility {
            slug: self.scheme.slug().to_string(),
            name: self.scheme.name().to_string(),
            tier,
            reasons,
            max_grant: self.scheme.max_grant(),
        }
    }
}
