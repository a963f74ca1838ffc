//! Home-energy grant checker: the ten-step questionnaire, its validation rules, the owned
//! session state, and the scheme eligibility engine.

pub mod domain;
pub mod eligibility;
pub mod router;
pub mod session;
pub mod steps;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswersPatch, Benefit, CheckerAnswers, EpcRating, HeatingType, IncomeBand, InsulationOption,
    PropertyType, Tenure,
};
pub use eligibility::{
    check_boiler_upgrade_scheme, check_eco4, check_gbis, check_la_flex,
    check_warm_home_discount, evaluate, evaluate_validated, EligibilityEngine, EligibilityResult,
    EligibilityTier, IncompleteAnswers, Scheme, SchemeEligibility, NOT_ELIGIBLE_SUMMARY,
};
pub use router::checker_router;
pub use session::{AnswerStorage, CheckerSession, MemoryAnswerStorage, StorageError, STORAGE_KEY};
pub use steps::{
    all_step_slugs, checker_steps, is_valid_step_slug, next_step_slug, previous_step_slug,
    step_by_number, step_by_slug, InputType, StepConfig, StepOption, StepSlug, RESULTS_SLUG,
    TOTAL_STEPS,
};
pub use validation::{
    completed_steps, first_invalid_step, is_step_complete, is_valid_email, is_valid_phone,
    is_valid_postcode, validate_step, StepValidation,
};
