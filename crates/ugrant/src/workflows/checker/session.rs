use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use tracing::warn;

use super::domain::{AnswersPatch, CheckerAnswers};
use super::eligibility::{EligibilityEngine, EligibilityResult, IncompleteAnswers};
use super::steps::StepSlug;
use super::validation::{self, StepValidation};

/// Key the answers are stored under.
pub const STORAGE_KEY: &str = "ugrant-checker-state";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key/value persistence for in-progress answers.
pub trait AnswerStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn store(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Default)]
pub struct MemoryAnswerStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryAnswerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.into());
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl AnswerStorage for MemoryAnswerStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// One respondent's walk through the questionnaire.
///
/// The session owns its answers and writes them back to storage after every change. Storage
/// failures are logged and swallowed so a broken backend never blocks the questionnaire.
pub struct CheckerSession<S: AnswerStorage> {
    answers: CheckerAnswers,
    storage: S,
    engine: EligibilityEngine,
    hydrated: bool,
}

impl<S: AnswerStorage> CheckerSession<S> {
    pub fn new(storage: S) -> Self {
        Self {
            answers: CheckerAnswers::default(),
            storage,
            engine: EligibilityEngine::standard(),
            hydrated: false,
        }
    }

    /// Restores stored answers over the defaults. Only the first call reads storage.
    pub fn initialize(&mut self) {
        if self.hydrated {
            return;
        }
        self.hydrated = true;

        let stored = match self.storage.load(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                warn!(error = %err, "failed to read checker state");
                return;
            }
        };

        match serde_json::from_str::<CheckerAnswers>(&stored) {
            Ok(answers) => self.answers = answers,
            Err(err) => warn!(error = %err, "ignoring unreadable checker state"),
        }
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn answers(&self) -> &CheckerAnswers {
        &self.answers
    }

    pub fn apply(&mut self, patch: AnswersPatch) {
        self.answers.merge(patch);
        self.persist();
    }

    pub fn update(&mut self, change: impl FnOnce(&mut CheckerAnswers)) {
        change(&mut self.answers);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.answers = CheckerAnswers::default();
        if let Err(err) = self.storage.remove(STORAGE_KEY) {
            warn!(error = %err, "failed to clear checker state");
        }
    }

    pub fn validate_step(&self, step: StepSlug) -> StepValidation {
        validation::validate_step(&self.answers, step)
    }

    pub fn is_step_complete(&self, step: StepSlug) -> bool {
        validation::is_step_complete(&self.answers, step)
    }

    pub fn completed_steps(&self) -> usize {
        validation::completed_steps(&self.answers)
    }

    pub fn evaluate(&self) -> EligibilityResult {
        self.engine.evaluate(&self.answers)
    }

    pub fn evaluate_validated(&self) -> Result<EligibilityResult, IncompleteAnswers> {
        self.engine.evaluate_validated(&self.answers)
    }

    pub fn into_answers(self) -> CheckerAnswers {
        self.answers
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.answers) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(error = %err, "failed to encode checker state");
                return;
            }
        };
        if let Err(err) = self.storage.store(STORAGE_KEY, &encoded) {
            warn!(error = %err, "failed to save checker state");
        }
    }
}
