pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use workflows::checker::{evaluate, CheckerAnswers, EligibilityResult, EligibilityTier};
