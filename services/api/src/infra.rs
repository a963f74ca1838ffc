use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use ugrant::config::AdminConfig;
use ugrant::workflows::admin::{AdminDirectory, AdminRole, AdminUser};
use ugrant::workflows::installers::{Installer, InstallerId, InstallerRepository};
use ugrant::workflows::leads::{LeadId, LeadRecord, LeadRepository};
use ugrant::workflows::repository::RepositoryError;
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("record store lock poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord, read_at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&record.id) {
            Some(existing) if existing.updated_at != read_at => Err(RepositoryError::Stale),
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        Ok(lock(&self.records)?.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInstallerRepository {
    installers: Arc<Mutex<HashMap<InstallerId, Installer>>>,
}

impl InstallerRepository for InMemoryInstallerRepository {
    fn insert(&self, installer: Installer) -> Result<Installer, RepositoryError> {
        let mut guard = lock(&self.installers)?;
        if guard.contains_key(&installer.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(installer.id, installer.clone());
        Ok(installer)
    }

    fn update(&self, installer: Installer) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.installers)?;
        if guard.contains_key(&installer.id) {
            guard.insert(installer.id, installer);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &InstallerId) -> Result<Option<Installer>, RepositoryError> {
        Ok(lock(&self.installers)?.get(id).cloned())
    }

    fn delete(&self, id: &InstallerId) -> Result<(), RepositoryError> {
        lock(&self.installers)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<Installer>, RepositoryError> {
        Ok(lock(&self.installers)?.values().cloned().collect())
    }
}

/// Token-keyed admin accounts. Without a bootstrap token every admin route answers 401.
#[derive(Default)]
pub(crate) struct InMemoryAdminDirectory {
    users: HashMap<String, AdminUser>,
}

impl InMemoryAdminDirectory {
    pub(crate) fn from_config(config: &AdminConfig) -> Self {
        let mut directory = Self::default();
        if let Some(token) = &config.bootstrap_token {
            directory.users.insert(
                token.clone(),
                AdminUser {
                    id: Uuid::new_v4(),
                    email: config.bootstrap_email.clone(),
                    name: None,
                    role: AdminRole::SuperAdmin,
                    active: true,
                },
            );
        }
        directory
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl AdminDirectory for InMemoryAdminDirectory {
    fn resolve(&self, token: &str) -> Result<Option<AdminUser>, RepositoryError> {
        Ok(self.users.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ugrant::workflows::checker::{evaluate, CheckerAnswers};
    use ugrant::workflows::leads::materialize;

    fn admin_config(token: Option<&str>) -> AdminConfig {
        AdminConfig {
            bootstrap_token: token.map(str::to_string),
            bootstrap_email: "ops@ugrant.test".to_string(),
        }
    }

    #[test]
    fn bootstrap_token_seeds_a_super_admin() {
        let directory = InMemoryAdminDirectory::from_config(&admin_config(Some("seed")));
        let user = directory
            .resolve("seed")
            .expect("directory available")
            .expect("seeded user");
        assert_eq!(user.role, AdminRole::SuperAdmin);
        assert_eq!(user.email, "ops@ugrant.test");
        assert!(directory.resolve("other").expect("directory").is_none());
    }

    #[test]
    fn no_bootstrap_token_means_no_admins() {
        let directory = InMemoryAdminDirectory::from_config(&admin_config(None));
        assert!(directory.is_empty());
    }

    #[test]
    fn lead_updates_require_the_stamp_that_was_read() {
        let answers = CheckerAnswers::default();
        let record = materialize(&answers, &evaluate(&answers), Utc::now());
        let repository = InMemoryLeadRepository::default();
        let stored = repository.insert(record).expect("insert");
        let read_at = stored.updated_at;

        let mut first = stored.clone();
        first.notes = Some("first".to_string());
        first.updated_at = read_at + chrono::Duration::seconds(1);
        repository.update(first, read_at).expect("fresh write");

        let mut second = stored.clone();
        second.notes = Some("second".to_string());
        let err = repository.update(second, read_at).expect_err("stale write");
        assert!(matches!(err, RepositoryError::Stale));

        let kept = repository.fetch(&stored.id).expect("fetch").expect("stored");
        assert_eq!(kept.notes.as_deref(), Some("first"));
        assert!(matches!(
            repository.update(stored.clone(), read_at),
            Err(RepositoryError::Stale)
        ));
    }
}
