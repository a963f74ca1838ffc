use super::common::*;
use crate::workflows::checker::domain::{
    Benefit, CheckerAnswers, EpcRating, HeatingType, IncomeBand, InsulationOption, Tenure,
};
use crate::workflows::checker::eligibility::{
    check_boiler_upgrade_scheme, check_eco4, check_gbis, check_la_flex,
    check_warm_home_discount, evaluate, evaluate_validated, EligibilityTier, Scheme,
    NOT_ELIGIBLE_SUMMARY,
};
use crate::workflows::checker::steps::StepSlug;

const POOR: [EpcRating; 4] = [EpcRating::D, EpcRating::E, EpcRating::F, EpcRating::G];

#[test]
fn eco4_eligible_for_qualifying_benefit_with_poor_epc() {
    let qualifying = Benefit::ordered()
        .into_iter()
        .filter(|benefit| benefit.is_qualifying());
    for benefit in qualifying {
        for epc in POOR {
            for tenure in Tenure::ordered() {
                for income in IncomeBand::ordered() {
                    let answers = answers_with(vec![benefit], epc, tenure, income);
                    assert_eq!(
                        check_eco4(&answers).tier,
                        EligibilityTier::Eligible,
                        "{benefit:?} {epc:?} {tenure:?} {income:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn eco4_tax_credit_route_requires_low_income() {
    let low = answers_with(
        vec![Benefit::ChildBenefit],
        EpcRating::F,
        Tenure::PrivateRental,
        IncomeBand::Under31k,
    );
    let result = check_eco4(&low);
    assert_eq!(result.tier, EligibilityTier::Eligible);
    assert_eq!(
        result.reasons,
        vec![
            "You receive tax credits with household income under £31,000",
            "Your property has an EPC rating of D-G",
        ]
    );

    let higher = CheckerAnswers {
        income_band: Some(IncomeBand::From31kTo40k),
        ..low
    };
    assert_eq!(check_eco4(&higher).tier, EligibilityTier::NotEligible);
}

#[test]
fn eco4_unknown_epc_and_council_route_are_potential() {
    let unknown = answers_with(
        vec![Benefit::PensionCredit],
        EpcRating::Unknown,
        Tenure::SocialHousing,
        IncomeBand::Over40k,
    );
    let result = check_eco4(&unknown);
    assert_eq!(result.tier, EligibilityTier::PotentiallyEligible);
    assert_eq!(
        result.reasons,
        vec![
            "You receive a qualifying benefit",
            "EPC rating unknown - may qualify if D-G",
        ]
    );

    let council = answers_with(
        vec![Benefit::NoneOfTheAbove],
        EpcRating::D,
        Tenure::OwnerOccupied,
        IncomeBand::Under31k,
    );
    let result = check_eco4(&council);
    assert_eq!(result.tier, EligibilityTier::PotentiallyEligible);
    assert_eq!(
        result.reasons[1],
        "May qualify through LA Flex if referred by local council"
    );
}

#[test]
fn scenario_a_eco4_reasons() {
    let answers = CheckerAnswers {
        benefits: vec![Benefit::UniversalCredit],
        epc_rating: Some(EpcRating::E),
        tenure: Some(Tenure::OwnerOccupied),
        ..CheckerAnswers::default()
    };

    let result = check_eco4(&answers);

    assert_eq!(result.slug, "eco4");
    assert_eq!(result.name, "ECO4");
    assert_eq!(result.tier, EligibilityTier::Eligible);
    assert_eq!(
        result.reasons,
        vec![
            "You receive a qualifying benefit",
            "Your property has an EPC rating of D-G",
        ]
    );
    assert_eq!(result.max_grant, None);
}

#[test]
fn scenario_b_comfortable_household_only_keeps_gas_boiler_route() {
    let result = evaluate(&well_off_answers());

    // Owner-occupied gas boilers stay on the exceptional-circumstances route.
    assert_eq!(result.overall_tier, EligibilityTier::PotentiallyEligible);
    assert_eq!(result.positive_scheme_slugs(), vec!["boiler-upgrade-scheme"]);
    assert_eq!(
        result.summary,
        "You may be eligible for 1 energy scheme. Further verification is needed."
    );
    assert_eq!(
        result.scheme(Scheme::Gbis).map(|scheme| scheme.reasons.clone()),
        Some(vec![
            "Your property appears to already have adequate insulation".to_string()
        ])
    );
}

#[test]
fn comfortable_household_with_heat_pump_qualifies_for_nothing() {
    let answers = CheckerAnswers {
        heating_type: Some(HeatingType::HeatPump),
        ..well_off_answers()
    };

    let result = evaluate(&answers);

    assert_eq!(result.overall_tier, EligibilityTier::NotEligible);
    assert_eq!(result.summary, NOT_ELIGIBLE_SUMMARY);
    assert!(result
        .schemes
        .iter()
        .all(|scheme| scheme.tier == EligibilityTier::NotEligible));
}

#[test]
fn gbis_lists_missing_measures_before_epc_reason() {
    let answers = CheckerAnswers {
        insulation: vec![InsulationOption::CavityWall],
        epc_rating: Some(EpcRating::G),
        tenure: Some(Tenure::PrivateRental),
        ..CheckerAnswers::default()
    };
    let result = check_gbis(&answers);
    assert_eq!(result.tier, EligibilityTier::Eligible);
    assert_eq!(
        result.reasons,
        vec![
            "Your property may benefit from loft insulation",
            "Your property has an EPC rating of D-G",
        ]
    );

    let unknown = CheckerAnswers {
        epc_rating: Some(EpcRating::Unknown),
        ..answers
    };
    assert_eq!(check_gbis(&unknown).tier, EligibilityTier::PotentiallyEligible);
}

#[test]
fn gbis_adequate_insulation_wins_over_epc() {
    let answers = CheckerAnswers {
        insulation: vec![InsulationOption::LoftFull, InsulationOption::CavityWall],
        epc_rating: Some(EpcRating::Unknown),
        tenure: Some(Tenure::OwnerOccupied),
        ..CheckerAnswers::default()
    };
    assert_eq!(check_gbis(&answers).tier, EligibilityTier::NotEligible);
}

#[test]
fn pension_credit_always_gets_warm_home_discount() {
    for epc in EpcRating::ordered() {
        for income in IncomeBand::ordered() {
            let answers = CheckerAnswers {
                benefits: vec![Benefit::NoneOfTheAbove, Benefit::PensionCredit],
                epc_rating: Some(epc),
                income_band: Some(income),
                ..CheckerAnswers::default()
            };
            let result = check_warm_home_discount(&answers);
            assert_eq!(result.tier, EligibilityTier::Eligible);
            assert_eq!(result.max_grant, Some(150));
        }
    }
}

#[test]
fn warm_home_discount_broader_group() {
    let answers = CheckerAnswers {
        benefits: vec![Benefit::WorkingTaxCredit],
        income_band: Some(IncomeBand::Under31k),
        ..CheckerAnswers::default()
    };
    assert_eq!(
        check_warm_home_discount(&answers).tier,
        EligibilityTier::PotentiallyEligible
    );

    let housing_only = CheckerAnswers {
        benefits: vec![Benefit::HousingBenefit],
        ..answers
    };
    assert_eq!(
        check_warm_home_discount(&housing_only).tier,
        EligibilityTier::NotEligible
    );
}

#[test]
fn boiler_upgrade_requires_owner_occupier() {
    for tenure in [Tenure::PrivateRental, Tenure::SocialHousing] {
        for heating in HeatingType::ordered() {
            let answers = CheckerAnswers {
                tenure: Some(tenure),
                heating_type: Some(heating),
                ..CheckerAnswers::default()
            };
            let result = check_boiler_upgrade_scheme(&answers);
            assert_eq!(result.tier, EligibilityTier::NotEligible);
            assert_eq!(
                result.reasons,
                vec!["Only available for owner-occupied properties"]
            );
        }
    }
}

#[test]
fn boiler_upgrade_tiers_for_owners() {
    let owner = |heating| CheckerAnswers {
        tenure: Some(Tenure::OwnerOccupied),
        heating_type: Some(heating),
        ..CheckerAnswers::default()
    };

    let oil = check_boiler_upgrade_scheme(&owner(HeatingType::OilBoiler));
    assert_eq!(oil.tier, EligibilityTier::Eligible);
    assert_eq!(oil.max_grant, Some(7500));
    assert_eq!(
        check_boiler_upgrade_scheme(&owner(HeatingType::GasBoiler)).tier,
        EligibilityTier::PotentiallyEligible
    );
    let heat_pump = check_boiler_upgrade_scheme(&owner(HeatingType::HeatPump));
    assert_eq!(heat_pump.tier, EligibilityTier::NotEligible);
    assert_eq!(heat_pump.reasons, vec!["Current heating type may not qualify"]);
}

#[test]
fn la_flex_points_benefit_holders_to_eco4() {
    let answers = answers_with(
        vec![Benefit::IncomeSupport],
        EpcRating::E,
        Tenure::OwnerOccupied,
        IncomeBand::Under31k,
    );
    let result = check_la_flex(&answers);
    assert_eq!(result.tier, EligibilityTier::NotEligible);
    assert_eq!(
        result.reasons,
        vec!["You may qualify directly through ECO4 instead"]
    );
}

#[test]
fn la_flex_excludes_social_housing() {
    let base = answers_with(
        vec![Benefit::NoneOfTheAbove],
        EpcRating::Unknown,
        Tenure::PrivateRental,
        IncomeBand::Under31k,
    );
    assert_eq!(check_la_flex(&base).tier, EligibilityTier::PotentiallyEligible);

    let social = CheckerAnswers {
        tenure: Some(Tenure::SocialHousing),
        ..base
    };
    assert_eq!(check_la_flex(&social).tier, EligibilityTier::NotEligible);
}

#[test]
fn overall_tier_is_strongest_scheme_tier() {
    let samples = [
        complete_answers(),
        well_off_answers(),
        CheckerAnswers::default(),
        answers_with(
            vec![Benefit::NoneOfTheAbove],
            EpcRating::Unknown,
            Tenure::PrivateRental,
            IncomeBand::Under31k,
        ),
    ];

    for answers in samples {
        let result = evaluate(&answers);
        let any_eligible = result
            .schemes
            .iter()
            .any(|scheme| scheme.tier == EligibilityTier::Eligible);
        assert_eq!(result.overall_tier == EligibilityTier::Eligible, any_eligible);
        let strongest = result.schemes.iter().map(|scheme| scheme.tier).max();
        assert_eq!(Some(result.overall_tier), strongest);
    }
}

#[test]
fn schemes_are_reported_in_fixed_order() {
    let result = evaluate(&complete_answers());
    let slugs: Vec<&str> = result.schemes.iter().map(|scheme| scheme.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec![
            "eco4",
            "gbis",
            "warm-home-discount",
            "boiler-upgrade-scheme",
            "la-flex"
        ]
    );
}

#[test]
fn evaluation_is_repeatable() {
    let answers = complete_answers();
    assert_eq!(evaluate(&answers), evaluate(&answers));
}

#[test]
fn summary_counts_schemes_at_overall_tier() {
    // ECO4 and GBIS eligible.
    let result = evaluate(&complete_answers());
    assert_eq!(result.overall_tier, EligibilityTier::Eligible);
    assert_eq!(result.count_at(EligibilityTier::Eligible), 2);
    assert_eq!(
        result.summary,
        "Great news! You appear to be eligible for 2 energy schemes."
    );

    let potential = evaluate(&answers_with(
        vec![Benefit::NoneOfTheAbove],
        EpcRating::Unknown,
        Tenure::PrivateRental,
        IncomeBand::Under31k,
    ));
    assert_eq!(potential.overall_tier, EligibilityTier::PotentiallyEligible);
    let count = potential.count_at(EligibilityTier::PotentiallyEligible);
    let plural = if count > 1 { "s" } else { "" };
    assert_eq!(
        potential.summary,
        format!(
            "You may be eligible for {count} energy scheme{plural}. Further verification is needed."
        )
    );
}

#[test]
fn single_eligible_scheme_summary_is_singular() {
    let answers = CheckerAnswers {
        benefits: vec![Benefit::PensionCredit],
        epc_rating: Some(EpcRating::A),
        tenure: Some(Tenure::SocialHousing),
        insulation: vec![InsulationOption::LoftFull, InsulationOption::CavityWall],
        income_band: Some(IncomeBand::Over40k),
        ..CheckerAnswers::default()
    };
    let result = evaluate(&answers);
    assert_eq!(
        result.summary,
        "Great news! You appear to be eligible for 1 energy scheme."
    );
}

#[test]
fn validated_evaluation_reports_first_incomplete_step() {
    let answers = CheckerAnswers {
        tenure: None,
        accept_privacy: false,
        ..complete_answers()
    };

    let err = evaluate_validated(&answers).expect_err("tenure missing");
    assert_eq!(err.step, StepSlug::Tenure);
    assert_eq!(err.errors, vec!["Please select your tenure type"]);

    let ok = evaluate_validated(&complete_answers()).expect("complete answers");
    assert_eq!(ok, evaluate(&complete_answers()));
}
