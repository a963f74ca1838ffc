use super::super::domain::{HeatingType, Tenure};
use super::rules::{Reasons, Rule, SchemeRules};
use super::{EligibilityTier, Scheme};

const POOR_EPC: &str = "Your property has an EPC rating of D-G";
const UNKNOWN_EPC: &str = "EPC rating unknown - may qualify if D-G";
const QUALIFYING_BENEFIT: &str = "You receive a qualifying benefit";
const OWNS_PROPERTY: &str = "You own your property";

pub(crate) fn eco4() -> SchemeRules {
    SchemeRules {
        scheme: Scheme::Eco4,
        rules: vec![
            Rule::new(
                EligibilityTier::Eligible,
                |facts| facts.qualifying_benefit && facts.poor_epc && facts.supported_tenure(),
                Reasons::Fixed(&[QUALIFYING_BENEFIT, POOR_EPC]),
            ),
            Rule::new(
                EligibilityTier::Eligible,
                |facts| {
                    facts.tax_credit_benefit
                        && facts.low_income
                        && facts.poor_epc
                        && facts.supported_tenure()
                },
                Reasons::Fixed(&[
                    "You receive tax credits with household income under £31,000",
                    POOR_EPC,
                ]),
            ),
            Rule::new(
                EligibilityTier::PotentiallyEligible,
                |facts| facts.qualifying_benefit && facts.unknown_epc && facts.supported_tenure(),
                Reasons::Fixed(&[QUALIFYING_BENEFIT, UNKNOWN_EPC]),
            ),
            // Local-authority discretionary route.
            Rule::new(
                EligibilityTier::PotentiallyEligible,
                |facts| facts.poor_epc && facts.supported_tenure() && facts.low_income,
                Reasons::Fixed(&[
                    "Your property has a poor EPC rating",
                    "May qualify through LA Flex if referred by local council",
                ]),
            ),
        ],
        fallback: Reasons::Fixed(&["Does not meet benefit or income requirements"]),
    }
}

pub(crate) fn gbis() -> SchemeRules {
    SchemeRules {
        scheme: Scheme::Gbis,
        rules: vec![
            Rule::new(
                EligibilityTier::Eligible,
                |facts| facts.poor_epc && facts.needs_insulation() && facts.supported_tenure(),
                Reasons::Derived(|facts| {
                    let mut reasons = Vec::with_capacity(3);
                    if facts.needs_cavity_wall {
                        reasons.push("Your property may benefit from cavity wall insulation");
                    }
                    if facts.needs_loft_insulation {
                        reasons.push("Your property may benefit from loft insulation");
                    }
                    reasons.push(POOR_EPC);
                    reasons
                }),
            ),
            Rule::new(
                EligibilityTier::PotentiallyEligible,
                |facts| facts.unknown_epc && facts.needs_insulation() && facts.supported_tenure(),
                Reasons::Fixed(&[UNKNOWN_EPC, "Insulation improvements may be available"]),
            ),
            Rule::new(
                EligibilityTier::NotEligible,
                |facts| !facts.needs_insulation(),
                Reasons::Fixed(&["Your property appears to already have adequate insulation"]),
            ),
        ],
        fallback: Reasons::Fixed(&["Does not meet EPC requirements"]),
    }
}

pub(crate) fn warm_home_discount() -> SchemeRules {
    SchemeRules {
        scheme: Scheme::WarmHomeDiscount,
        rules: vec![
            Rule::new(
                EligibilityTier::Eligible,
                |facts| facts.pension_credit,
                Reasons::Fixed(&[
                    "You receive Pension Credit Guarantee Credit",
                    "You should receive the discount automatically",
                ]),
            ),
            Rule::new(
                EligibilityTier::PotentiallyEligible,
                |facts| facts.low_income && (facts.qualifying_benefit || facts.tax_credit_benefit),
                Reasons::Fixed(&[
                    "You may qualify through the broader group",
                    "Contact your energy supplier to check eligibility",
                ]),
            ),
        ],
        fallback: Reasons::Fixed(&["Requires Pension Credit or qualifying benefit with low income"]),
    }
}

pub(crate) fn boiler_upgrade_scheme() -> SchemeRules {
    SchemeRules {
        scheme: Scheme::BoilerUpgradeScheme,
        rules: vec![
            Rule::new(
                EligibilityTier::Eligible,
                |facts| {
                    facts.owner_occupied()
                        && facts.heating.is_some_and(|heating| heating.is_replaceable_non_gas())
                },
                Reasons::Fixed(&[
                    OWNS_PROPERTY,
                    "You have non-gas heating that can be replaced",
                    "Up to £7,500 towards a heat pump",
                ]),
            ),
            // Gas boilers only qualify in exceptional circumstances.
            Rule::new(
                EligibilityTier::PotentiallyEligible,
                |facts| {
                    facts.owner_occupied()
                        && facts.heating == Some(HeatingType::GasBoiler)
                },
                Reasons::Fixed(&[
                    OWNS_PROPERTY,
                    "Gas boilers may qualify in some circumstances",
                    "Contact a certified installer to discuss options",
                ]),
            ),
            Rule::new(
                EligibilityTier::NotEligible,
                |facts| !facts.owner_occupied(),
                Reasons::Fixed(&["Only available for owner-occupied properties"]),
            ),
        ],
        fallback: Reasons::Fixed(&["Current heating type may not qualify"]),
    }
}

pub(crate) fn la_flex() -> SchemeRules {
    SchemeRules {
        scheme: Scheme::LaFlex,
        rules: vec![
            Rule::new(
                EligibilityTier::PotentiallyEligible,
                |facts| {
                    !facts.qualifying_benefit
                        && facts.low_income
                        && (facts.poor_epc || facts.unknown_epc)
                        && matches!(
                            facts.tenure,
                            Some(Tenure::OwnerOccupied | Tenure::PrivateRental)
                        )
                },
                Reasons::Fixed(&[
                    "You may qualify through your local council's flexible eligibility scheme",
                    "Contact your local authority to request a referral",
                    "Criteria vary by council area",
                ]),
            ),
            // Benefit holders are pointed at ECO4 instead.
            Rule::new(
                EligibilityTier::NotEligible,
                |facts| facts.qualifying_benefit,
                Reasons::Fixed(&["You may qualify directly through ECO4 instead"]),
            ),
        ],
        fallback: Reasons::Fixed(&[
            "LA Flex is typically for low-income households without qualifying benefits",
        ]),
    }
}
