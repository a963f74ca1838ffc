//! Admin identity boundary. Back-office routes resolve a bearer token to an [`AdminUser`]
//! through an [`AdminDirectory`] and check the user's role before touching any record.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::workflows::repository::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    LeadManager,
    ReadOnly,
}

impl AdminRole {
    pub const fn ordered() -> [Self; 4] {
        [Self::SuperAdmin, Self::Admin, Self::LeadManager, Self::ReadOnly]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::LeadManager => "lead_manager",
            Self::ReadOnly => "read_only",
        }
    }

    pub const fn allows(self, permission: Permission) -> bool {
        match self {
            Self::SuperAdmin | Self::Admin => true,
            Self::LeadManager => !matches!(permission, Permission::ManageInstallers),
            Self::ReadOnly => {
                matches!(permission, Permission::ReadLeads | Permission::ReadInstallers)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ReadLeads,
    ManageLeads,
    ReadInstallers,
    ManageInstallers,
}

impl Permission {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadLeads => "read_leads",
            Self::ManageLeads => "manage_leads",
            Self::ReadInstallers => "read_installers",
            Self::ManageInstallers => "manage_installers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: AdminRole,
    pub active: bool,
}

/// Resolves bearer tokens to back-office users.
pub trait AdminDirectory: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Option<AdminUser>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    UnknownToken,
    #[error("admin account is inactive")]
    Inactive,
    #[error("role '{}' may not {}", role.as_str(), permission.as_str())]
    Forbidden {
        role: AdminRole,
        permission: Permission,
    },
    #[error(transparent)]
    Directory(#[from] RepositoryError),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::UnknownToken | AuthError::Inactive => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = json!({ "error": self.to_string() });
        (status, axum::Json(payload)).into_response()
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves the caller and checks that their role grants `permission`.
pub fn authorize<D>(
    directory: &D,
    headers: &HeaderMap,
    permission: Permission,
) -> Result<AdminUser, AuthError>
where
    D: AdminDirectory + ?Sized,
{
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let user = directory.resolve(token)?.ok_or_else(|| {
        warn!("admin request with unknown token");
        AuthError::UnknownToken
    })?;

    if !user.active {
        warn!(admin = %user.email, "inactive admin rejected");
        return Err(AuthError::Inactive);
    }
    if !user.role.allows(permission) {
        warn!(
            admin = %user.email,
            role = user.role.as_str(),
            permission = permission.as_str(),
            "admin request forbidden"
        );
        return Err(AuthError::Forbidden {
            role: user.role,
            permission,
        });
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::http::HeaderValue;

    use super::*;

    struct FixedDirectory(HashMap<String, AdminUser>);

    impl AdminDirectory for FixedDirectory {
        fn resolve(&self, token: &str) -> Result<Option<AdminUser>, RepositoryError> {
            Ok(self.0.get(token).cloned())
        }
    }

    fn user(role: AdminRole, active: bool) -> AdminUser {
        AdminUser {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", role.as_str()),
            name: None,
            role,
            active,
        }
    }

    fn directory() -> FixedDirectory {
        let mut users = HashMap::new();
        users.insert("viewer".to_string(), user(AdminRole::ReadOnly, true));
        users.insert("manager".to_string(), user(AdminRole::LeadManager, true));
        users.insert("root".to_string(), user(AdminRole::SuperAdmin, true));
        users.insert("retired".to_string(), user(AdminRole::Admin, false));
        FixedDirectory(users)
    }

    fn headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
        );
        headers
    }

    #[test]
    fn role_matrix() {
        assert!(AdminRole::ReadOnly.allows(Permission::ReadLeads));
        assert!(!AdminRole::ReadOnly.allows(Permission::ManageLeads));
        assert!(AdminRole::LeadManager.allows(Permission::ManageLeads));
        assert!(!AdminRole::LeadManager.allows(Permission::ManageInstallers));
        for permission in [
            Permission::ReadLeads,
            Permission::ManageLeads,
            Permission::ReadInstallers,
            Permission::ManageInstallers,
        ] {
            assert!(AdminRole::Admin.allows(permission));
            assert!(AdminRole::SuperAdmin.allows(permission));
        }
    }

    #[test]
    fn missing_and_unknown_tokens_are_unauthorized() {
        let directory = directory();
        let err = authorize(&directory, &HeaderMap::new(), Permission::ReadLeads)
            .expect_err("no header");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err = authorize(&directory, &headers("nobody"), Permission::ReadLeads)
            .expect_err("unknown token");
        assert!(matches!(err, AuthError::UnknownToken));
    }

    #[test]
    fn inactive_admins_are_rejected() {
        let err = authorize(&directory(), &headers("retired"), Permission::ReadLeads)
            .expect_err("inactive");
        assert!(matches!(err, AuthError::Inactive));
    }

    #[test]
    fn forbidden_role_gets_403() {
        let err = authorize(&directory(), &headers("manager"), Permission::ManageInstallers)
            .expect_err("forbidden");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let user = authorize(&directory(), &headers("root"), Permission::ManageInstallers)
            .expect("super admin");
        assert_eq!(user.role, AdminRole::SuperAdmin);
    }
}
