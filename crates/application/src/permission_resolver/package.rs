use std::sync::Arc;

use eca_core::AppResult;
use eca_domain::{
    ComponentActionPermission, PackageMember, PackagePermissionTable, PackageRole, SortDirection,
    SortDirective,
};
use tokio::sync::watch;

use crate::collection_fetcher::CollectionFetcher;

/// Package-scoped resolver keyed by the user's role in the open package.
#[derive(Clone)]
pub struct PackagePermissionResolver {
    table: Arc<PackagePermissionTable>,
    role: Arc<watch::Sender<PackageRole>>,
}

impl PackagePermissionResolver {
    /// Creates a resolver with no package role.
    #[must_use]
    pub fn new(table: Arc<PackagePermissionTable>) -> Self {
        Self {
            table,
            role: Arc::new(watch::Sender::new(PackageRole::None)),
        }
    }

    /// Returns the current package role.
    #[must_use]
    pub fn current_role(&self) -> PackageRole {
        *self.role.borrow()
    }

    /// Sets the role used for subsequent checks.
    pub fn set_role(&self, role: PackageRole) {
        self.role.send_replace(role);
    }

    /// Clears the package role, for example when leaving a package.
    pub fn reset(&self) {
        self.set_role(PackageRole::None);
    }

    /// Subscribes to package role changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PackageRole> {
        self.role.subscribe()
    }

    /// Returns whether the current package role grants `permission`.
    #[must_use]
    pub fn is_authorized(&self, permission: Option<ComponentActionPermission>) -> bool {
        match permission {
            None => true,
            Some(permission) => self.table.grants(self.current_role(), permission),
        }
    }

    /// Derives the package role of `signum` from the package's member list.
    ///
    /// No matching member yields `None`. On failure the role is reset before
    /// the error is returned.
    pub async fn load_membership(
        &self,
        members: &CollectionFetcher<PackageMember>,
        signum: &str,
    ) -> AppResult<PackageRole> {
        let sort = SortDirective::new("signum", SortDirection::Asc).ok();
        let members = match members.fetch_all(sort).await {
            Ok(members) => members,
            Err(error) => {
                self.reset();
                return Err(error);
            }
        };

        let role = members
            .iter()
            .find(|member| member.is_member(signum))
            .map(PackageMember::package_role)
            .unwrap_or_default();
        self.set_role(role);
        Ok(role)
    }
}
