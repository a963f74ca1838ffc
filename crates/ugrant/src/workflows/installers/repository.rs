use super::domain::{Installer, InstallerId, InstallerPage, InstallerQuery, InstallerStats};
use crate::workflows::repository::RepositoryError;

/// Record store for installers. Unlike leads, installers are deleted physically.
pub trait InstallerRepository: Send + Sync {
    fn insert(&self, installer: Installer) -> Result<Installer, RepositoryError>;
    fn update(&self, installer: Installer) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &InstallerId) -> Result<Option<Installer>, RepositoryError>;
    fn delete(&self, id: &InstallerId) -> Result<(), RepositoryError>;
    fn all(&self) -> Result<Vec<Installer>, RepositoryError>;

    fn query(&self, query: &InstallerQuery) -> Result<InstallerPage, RepositoryError> {
        Ok(query.apply(self.all()?))
    }

    fn stats(&self) -> Result<InstallerStats, RepositoryError> {
        Ok(InstallerStats::tally(&self.all()?))
    }
}
