use crate::infra::InMemoryLeadRepository;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use ugrant::error::AppError;
use ugrant::workflows::checker::{
    evaluate, first_invalid_step, AnswersPatch, Benefit, CheckerAnswers, CheckerSession,
    EligibilityResult, EpcRating, HeatingType, IncomeBand, InsulationOption,
    MemoryAnswerStorage, PropertyType, StepSlug, Tenure, TOTAL_STEPS,
};
use ugrant::workflows::leads::LeadService;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding the checker answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print the full eligibility result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Postcode for the sample household (defaults to a Manchester postcode)
    #[arg(long)]
    pub(crate) postcode: Option<String>,
    /// Leave the installer-contact box unticked so the lead carries no contact details
    #[arg(long)]
    pub(crate) no_contact: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs { answers, json } = args;

    let raw = std::fs::read_to_string(&answers)?;
    let answers: CheckerAnswers = serde_json::from_str(&raw)?;
    let result = evaluate(&answers);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if let Some((step, validation)) = first_invalid_step(&answers) {
        println!(
            "Note: answers are incomplete from step {} ({}): {}",
            step.number(),
            step.as_str(),
            validation.errors.join("; ")
        );
    }
    render_result(&result);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        postcode,
        no_contact,
    } = args;
    let postcode = postcode.unwrap_or_else(|| "M14 5RL".to_string());

    println!("Grant checker demo");
    let mut session = CheckerSession::new(MemoryAnswerStorage::new());
    session.initialize();

    for step in StepSlug::ordered() {
        session.apply(sample_patch(step, &postcode, !no_contact));
        let validation = session.validate_step(step);
        if validation.is_valid {
            println!("[{}/{}] {}: ok", step.number(), TOTAL_STEPS, step.as_str());
        } else {
            println!(
                "[{}/{}] {}: {}",
                step.number(),
                TOTAL_STEPS,
                step.as_str(),
                validation.errors.join("; ")
            );
        }
    }
    println!(
        "{} of {} steps complete",
        session.completed_steps(),
        TOTAL_STEPS
    );

    let answers = session.into_answers();
    let service = LeadService::new(Arc::new(InMemoryLeadRepository::default()));
    let outcome = service.submit(&answers)?;

    println!();
    render_result(&outcome.result);

    println!();
    match outcome.lead.lead_id {
        Some(lead_id) => {
            let lead = service.get(&lead_id)?;
            println!("Lead {lead_id} stored ({})", lead.status.label());
            println!(
                "- postcode {} | schemes {} | contact {}",
                lead.postcode,
                lead.eligible_schemes.join(", "),
                lead.email.as_deref().unwrap_or("withheld")
            );
        }
        None => println!(
            "Lead not stored: {}",
            outcome.lead.error.as_deref().unwrap_or("unknown error")
        ),
    }

    let stats = service.stats()?;
    println!(
        "Back office: {} total | {} new | {} eligible | {} potentially eligible",
        stats.total, stats.new, stats.by_tier.eligible, stats.by_tier.potentially_eligible
    );
    Ok(())
}

fn sample_patch(step: StepSlug, postcode: &str, contact: bool) -> AnswersPatch {
    match step {
        StepSlug::Postcode => AnswersPatch {
            house_number: Some("27".to_string()),
            postcode: Some(postcode.to_string()),
            ..AnswersPatch::default()
        },
        StepSlug::PropertyType => AnswersPatch {
            property_type: Some(Some(PropertyType::SemiDetached)),
            ..AnswersPatch::default()
        },
        StepSlug::Tenure => AnswersPatch {
            tenure: Some(Some(Tenure::OwnerOccupied)),
            ..AnswersPatch::default()
        },
        StepSlug::Heating => AnswersPatch {
            heating_type: Some(Some(HeatingType::OilBoiler)),
            ..AnswersPatch::default()
        },
        StepSlug::Insulation => AnswersPatch {
            insulation: Some(vec![InsulationOption::LoftPartial]),
            ..AnswersPatch::default()
        },
        StepSlug::Benefits => AnswersPatch {
            benefits: Some(vec![Benefit::PensionCredit]),
            ..AnswersPatch::default()
        },
        StepSlug::Income => AnswersPatch {
            income_band: Some(Some(IncomeBand::Under31k)),
            ..AnswersPatch::default()
        },
        StepSlug::Epc => AnswersPatch {
            epc_rating: Some(Some(EpcRating::E)),
            ..AnswersPatch::default()
        },
        StepSlug::Contact => AnswersPatch {
            email: Some("householder@example.com".to_string()),
            phone: Some("07700 900123".to_string()),
            wants_installer_contact: Some(contact),
            ..AnswersPatch::default()
        },
        StepSlug::Confirm => AnswersPatch {
            accept_terms: Some(true),
            accept_privacy: Some(true),
            ..AnswersPatch::default()
        },
    }
}

fn render_result(result: &EligibilityResult) {
    println!("Overall: {}", result.overall_tier.label());
    println!("{}", result.summary);
    for scheme in &result.schemes {
        match scheme.max_grant {
            Some(max_grant) => println!(
                "- {}: {} (up to £{})",
                scheme.name,
                scheme.tier.label(),
                max_grant
            ),
            None => println!("- {}: {}", scheme.name, scheme.tier.label()),
        }
        for reason in &scheme.reasons {
            println!("    {reason}");
        }
    }
}
