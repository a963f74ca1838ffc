//! Installer directory for the admin back office.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Installer, InstallerFilters, InstallerForm, InstallerId, InstallerPage, InstallerPatch,
    InstallerQuery, InstallerStats,
};
pub use repository::InstallerRepository;
pub use router::{installer_admin_router, InstallerListParams};
pub use service::{InstallerService, InstallerServiceError};
