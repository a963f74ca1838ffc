use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    Installer, InstallerForm, InstallerId, InstallerPage, InstallerPatch, InstallerQuery,
    InstallerStats,
};
use super::repository::InstallerRepository;
use crate::workflows::checker::is_valid_email;
use crate::workflows::repository::RepositoryError;

pub struct InstallerService<R> {
    repository: Arc<R>,
}

impl<R> InstallerService<R>
where
    R: InstallerRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn list(&self, query: &InstallerQuery) -> Result<InstallerPage, InstallerServiceError> {
        Ok(self.repository.query(query)?)
    }

    pub fn get(&self, id: &InstallerId) -> Result<Installer, InstallerServiceError> {
        let installer = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(installer)
    }

    pub fn create(&self, form: InstallerForm) -> Result<Installer, InstallerServiceError> {
        let installer = Installer::from_form(form, Utc::now());
        validate(&installer)?;
        let stored = self.repository.insert(installer)?;
        info!(installer_id = %stored.id, name = %stored.name, "installer created");
        Ok(stored)
    }

    pub fn update(
        &self,
        id: &InstallerId,
        patch: InstallerPatch,
    ) -> Result<Installer, InstallerServiceError> {
        let mut installer = self.get(id)?;
        installer.apply(patch);
        validate(&installer)?;
        installer.updated_at = Utc::now();
        self.repository.update(installer.clone())?;
        Ok(installer)
    }

    pub fn set_active(
        &self,
        id: &InstallerId,
        active: bool,
    ) -> Result<Installer, InstallerServiceError> {
        self.update(
            id,
            InstallerPatch {
                active: Some(active),
                ..InstallerPatch::default()
            },
        )
    }

    pub fn set_verified(
        &self,
        id: &InstallerId,
        verified: bool,
    ) -> Result<Installer, InstallerServiceError> {
        self.update(
            id,
            InstallerPatch {
                verified: Some(verified),
                ..InstallerPatch::default()
            },
        )
    }

    pub fn delete(&self, id: &InstallerId) -> Result<(), InstallerServiceError> {
        self.repository.delete(id)?;
        info!(installer_id = %id, "installer deleted");
        Ok(())
    }

    pub fn stats(&self) -> Result<InstallerStats, InstallerServiceError> {
        Ok(self.repository.stats()?)
    }
}

fn validate(installer: &Installer) -> Result<(), InstallerServiceError> {
    if installer.name.is_empty() {
        return Err(InstallerServiceError::Invalid("name is required".to_string()));
    }
    if !is_valid_email(&installer.email) {
        return Err(InstallerServiceError::Invalid(
            "a valid email address is required".to_string(),
        ));
    }
    if !installer.default_lead_price.is_finite() || installer.default_lead_price < 0.0 {
        return Err(InstallerServiceError::Invalid(
            "default lead price must be a non-negative amount".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum InstallerServiceError {
    #[error("invalid installer: {0}")]
    Invalid(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
