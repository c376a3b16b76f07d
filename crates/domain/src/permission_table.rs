//! Immutable role → permission tables.

use std::collections::{BTreeSet, HashMap};

use eca_core::{AppError, AppResult};
use serde::Serialize;

use crate::role::{PackageRole, Role, TableRole};
use crate::security::{ComponentActionPermission, Permission};

/// Permissions granted by one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition<R, P: Ord> {
    role: R,
    permissions: BTreeSet<P>,
}

impl<R: TableRole, P: Copy + Ord> RoleDefinition<R, P> {
    /// Creates a role definition.
    #[must_use]
    pub fn new(role: R, permissions: impl IntoIterator<Item = P>) -> Self {
        Self {
            role,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Returns the role this definition describes.
    #[must_use]
    pub fn role(&self) -> R {
        self.role
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<P> {
        &self.permissions
    }
}

/// Immutable mapping from every role of a kind to its granted permissions.
#[derive(Debug, Clone)]
pub struct PermissionTable<R, P: Ord> {
    definitions: HashMap<R, RoleDefinition<R, P>>,
}

/// Table for application-level roles.
pub type AppPermissionTable = PermissionTable<Role, Permission>;

/// Table for package-membership roles.
pub type PackagePermissionTable = PermissionTable<PackageRole, ComponentActionPermission>;

impl<R: TableRole, P: Copy + Ord> PermissionTable<R, P> {
    /// Creates a validated table.
    ///
    /// Every role of the kind, including the empty role, must appear exactly
    /// once, and the empty role must grant nothing.
    pub fn new(definitions: Vec<RoleDefinition<R, P>>) -> AppResult<Self> {
        let mut by_role = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            let role = definition.role;
            if by_role.insert(role, definition).is_some() {
                return Err(AppError::Validation(format!(
                    "role {role:?} is defined more than once"
                )));
            }
        }

        let table = Self {
            definitions: by_role,
        };
        table.validate()?;
        Ok(table)
    }

    /// Checks the one-entry-per-role invariant.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(missing) = R::all()
            .iter()
            .find(|role| !self.definitions.contains_key(*role))
        {
            return Err(AppError::Validation(format!(
                "role {missing:?} has no permission definition"
            )));
        }

        let empty_role_grants = self
            .definitions
            .get(&R::none())
            .is_some_and(|definition| !definition.permissions.is_empty());
        if empty_role_grants {
            return Err(AppError::Validation(format!(
                "role {:?} must not grant permissions",
                R::none()
            )));
        }

        Ok(())
    }

    /// Returns whether `role` grants `permission`. Unknown roles grant nothing.
    #[must_use]
    pub fn grants(&self, role: R, permission: P) -> bool {
        self.definitions
            .get(&role)
            .is_some_and(|definition| definition.permissions.contains(&permission))
    }

    /// Returns the union of the permissions granted by `roles`.
    #[must_use]
    pub fn union_of(&self, roles: &[R]) -> BTreeSet<P> {
        roles
            .iter()
            .filter_map(|role| self.definitions.get(role))
            .flat_map(|definition| definition.permissions.iter().copied())
            .collect()
    }

    /// Returns the definition for one role, if the table has it.
    #[must_use]
    pub fn definition(&self, role: R) -> Option<&RoleDefinition<R, P>> {
        self.definitions.get(&role)
    }

    fn from_entries(entries: Vec<(R, Vec<P>)>) -> Self {
        Self {
            definitions: entries
                .into_iter()
                .map(|(role, permissions)| (role, RoleDefinition::new(role, permissions)))
                .collect(),
        }
    }
}

impl PermissionTable<Role, Permission> {
    /// Returns the built-in application role table.
    #[must_use]
    pub fn standard() -> Self {
        use Permission::*;

        Self::from_entries(vec![
            (
                Role::ProjectAdmin,
                vec![
                    ViewDashboardMenuItem,
                    ViewProjectsMenuItem,
                    ViewCustomersMenuItem,
                    CreateProject,
                    EditProject,
                    CreatePackage,
                ],
            ),
            (
                Role::EricssonContributor,
                vec![ViewDashboardMenuItem, ViewProjectsMenuItem, CreatePackage],
            ),
            (
                Role::CustomerApprover,
                vec![ViewDashboardMenuItem, ViewProjectsMenuItem],
            ),
            (
                Role::OpsAdmin,
                vec![
                    ViewDashboardMenuItem,
                    ViewCustomersMenuItem,
                    ViewUsersMenuItem,
                    ViewConfigurationsMenuItem,
                    CreateCustomer,
                    EditCustomer,
                    CreateUser,
                    EditUser,
                    DeleteUser,
                    EditConfiguration,
                ],
            ),
            (Role::None, Vec::new()),
        ])
    }
}

impl PermissionTable<PackageRole, ComponentActionPermission> {
    /// Returns the built-in package membership table.
    #[must_use]
    pub fn standard() -> Self {
        use ComponentActionPermission::*;

        Self::from_entries(vec![
            (
                PackageRole::EricssonContributor,
                vec![
                    ViewPackage,
                    EditPackage,
                    UploadEvidence,
                    DeleteEvidence,
                    EditMarkings,
                    SubmitPackage,
                    AddComment,
                    DownloadEvidence,
                ],
            ),
            (
                PackageRole::EricssonApprover,
                vec![
                    ViewPackage,
                    SubmitPackage,
                    ApproveLineItem,
                    RejectLineItem,
                    AddComment,
                    DownloadEvidence,
                ],
            ),
            (
                PackageRole::CustomerApprover,
                vec![
                    ViewPackage,
                    EditMarkings,
                    ApproveLineItem,
                    RejectLineItem,
                    AddComment,
                    DownloadEvidence,
                ],
            ),
            (
                PackageRole::CustomerObserver,
                vec![ViewPackage, DownloadEvidence],
            ),
            (PackageRole::None, Vec::new()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::{AppPermissionTable, PackagePermissionTable, RoleDefinition};
    use crate::role::{PackageRole, Role};
    use crate::security::{ComponentActionPermission, Permission};

    #[test]
    fn standard_tables_define_every_role_once() {
        assert!(AppPermissionTable::standard().validate().is_ok());
        assert!(PackagePermissionTable::standard().validate().is_ok());
    }

    #[test]
    fn table_without_empty_role_is_rejected() {
        let result = AppPermissionTable::new(vec![
            RoleDefinition::new(Role::ProjectAdmin, [Permission::CreateProject]),
            RoleDefinition::new(Role::EricssonContributor, []),
            RoleDefinition::new(Role::CustomerApprover, []),
            RoleDefinition::new(Role::OpsAdmin, []),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_role_definition_is_rejected() {
        let result = PackagePermissionTable::new(vec![
            RoleDefinition::new(PackageRole::EricssonContributor, []),
            RoleDefinition::new(PackageRole::EricssonContributor, []),
            RoleDefinition::new(PackageRole::EricssonApprover, []),
            RoleDefinition::new(PackageRole::CustomerApprover, []),
            RoleDefinition::new(PackageRole::CustomerObserver, []),
            RoleDefinition::new(PackageRole::None, []),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn union_merges_role_grants() {
        let table = AppPermissionTable::standard();
        let union = table.union_of(&[Role::CustomerApprover, Role::OpsAdmin]);

        assert!(union.contains(&Permission::ViewProjectsMenuItem));
        assert!(union.contains(&Permission::EditConfiguration));
        assert!(!union.contains(&Permission::CreatePackage));
    }

    #[test]
    fn observer_cannot_edit_markings() {
        let table = PackagePermissionTable::standard();
        assert!(!table.grants(
            PackageRole::CustomerObserver,
            ComponentActionPermission::EditMarkings
        ));
        assert!(table.grants(
            PackageRole::CustomerApprover,
            ComponentActionPermission::EditMarkings
        ));
    }
}
