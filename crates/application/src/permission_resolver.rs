use std::collections::BTreeSet;
use std::sync::Arc;

use eca_core::{AppError, AppResult};
use eca_domain::{AppPermissionTable, Permission, Role};

use crate::session_service::SessionStore;

mod package;

pub use package::PackagePermissionResolver;

/// Application service answering application-level authorization queries.
#[derive(Clone)]
pub struct PermissionResolver {
    table: Arc<AppPermissionTable>,
    sessions: SessionStore,
}

impl PermissionResolver {
    /// Creates a resolver over a shared table and session store.
    #[must_use]
    pub fn new(table: Arc<AppPermissionTable>, sessions: SessionStore) -> Self {
        Self { table, sessions }
    }

    /// Returns whether any of `roles` grants `permission`.
    ///
    /// A missing permission means the action is unrestricted.
    #[must_use]
    pub fn is_authorized(&self, permission: Option<Permission>, roles: &[Role]) -> bool {
        match permission {
            None => true,
            Some(permission) => roles
                .iter()
                .any(|role| self.table.grants(*role, permission)),
        }
    }

    /// Returns the union of permissions granted by `roles`.
    #[must_use]
    pub fn permissions_for(&self, roles: &[Role]) -> BTreeSet<Permission> {
        self.table.union_of(roles)
    }

    /// Returns the roles of the current session; empty when signed out.
    #[must_use]
    pub fn session_roles(&self) -> Vec<Role> {
        self.sessions
            .current()
            .map(|session| Role::from_role_names(session.role_names()))
            .unwrap_or_default()
    }

    /// Checks `permission` against the current session.
    ///
    /// With no session loaded only unrestricted checks pass.
    #[must_use]
    pub fn is_session_authorized(&self, permission: Option<Permission>) -> bool {
        self.is_authorized(permission, self.session_roles().as_slice())
    }

    /// Fails with [`AppError::Forbidden`] when the current session lacks `permission`.
    pub fn require_session_permission(&self, permission: Option<Permission>) -> AppResult<()> {
        if self.is_session_authorized(permission) {
            return Ok(());
        }

        let subject = self
            .sessions
            .current()
            .map(|session| session.signum().to_owned())
            .unwrap_or_else(|| "anonymous".to_owned());
        let permission = permission.map(|value| value.as_str()).unwrap_or_default();

        Err(AppError::Forbidden(format!(
            "subject '{subject}' is missing permission '{permission}'"
        )))
    }
}
