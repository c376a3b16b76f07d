//! Server-side collections listed by the client and their column catalogs.

use std::str::FromStr;

use eca_core::{AppError, AppResult, NonEmptyString};

use crate::labels::{
    EVIDENCE_STATUS_LABELS, LabelSet, PACKAGE_STATUS_LABELS, SOFT_DELETE_LABELS,
    USER_ROLE_LABELS,
};
use crate::security::{ComponentActionPermission, Permission};

/// How filter criteria travel to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// `GET <path>` with filters in the query string.
    Query,
    /// `POST <path>/search` with filters in a JSON body.
    Search,
}

/// How a column's typed search text is translated for the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text passed through as typed.
    Text,
    /// Finite set of display labels mapped to backend values.
    Enumerated(LabelSet),
    /// Calendar date interpreted in the user's time zone.
    Date,
}

/// One filterable column of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column key, also used as the backend filter key.
    pub key: &'static str,
    /// Translation applied to the search text.
    pub kind: ColumnKind,
}

impl ColumnSpec {
    const fn text(key: &'static str) -> Self {
        Self {
            key,
            kind: ColumnKind::Text,
        }
    }

    const fn enumerated(key: &'static str, labels: LabelSet) -> Self {
        Self {
            key,
            kind: ColumnKind::Enumerated(labels),
        }
    }

    const fn date(key: &'static str) -> Self {
        Self {
            key,
            kind: ColumnKind::Date,
        }
    }
}

/// Filterable columns of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCatalog {
    columns: &'static [ColumnSpec],
}

impl ColumnCatalog {
    /// Creates a catalog from static column specs.
    #[must_use]
    pub const fn new(columns: &'static [ColumnSpec]) -> Self {
        Self { columns }
    }

    /// Returns how `key` is translated. Unknown columns are free text.
    #[must_use]
    pub fn kind_of(&self, key: &str) -> ColumnKind {
        self.columns
            .iter()
            .find(|column| column.key == key)
            .map(|column| column.kind)
            .unwrap_or(ColumnKind::Text)
    }

    /// Returns the declared columns.
    #[must_use]
    pub fn columns(&self) -> &'static [ColumnSpec] {
        self.columns
    }
}

const USER_COLUMNS: ColumnCatalog = ColumnCatalog::new(&[
    ColumnSpec::text("signum"),
    ColumnSpec::text("name"),
    ColumnSpec::text("email"),
    ColumnSpec::text("userType"),
    ColumnSpec::enumerated("userRoles", USER_ROLE_LABELS),
    ColumnSpec::enumerated("isSoftDeleted", SOFT_DELETE_LABELS),
    ColumnSpec::date("createdDate"),
    ColumnSpec::date("lastModifiedDate"),
]);

const CUSTOMER_COLUMNS: ColumnCatalog = ColumnCatalog::new(&[
    ColumnSpec::text("customerName"),
    ColumnSpec::text("customerCode"),
    ColumnSpec::text("country"),
    ColumnSpec::enumerated("isSoftDeleted", SOFT_DELETE_LABELS),
    ColumnSpec::date("createdDate"),
]);

const CONFIGURATION_COLUMNS: ColumnCatalog = ColumnCatalog::new(&[
    ColumnSpec::text("name"),
    ColumnSpec::text("value"),
    ColumnSpec::text("type"),
    ColumnSpec::enumerated("isSoftDeleted", SOFT_DELETE_LABELS),
    ColumnSpec::date("lastModifiedDate"),
]);

const LINE_ITEM_COLUMNS: ColumnCatalog = ColumnCatalog::new(&[
    ColumnSpec::text("name"),
    ColumnSpec::text("siteName"),
    ColumnSpec::enumerated("status", PACKAGE_STATUS_LABELS),
    ColumnSpec::date("lastModifiedDate"),
]);

const EVIDENCE_COLUMNS: ColumnCatalog = ColumnCatalog::new(&[
    ColumnSpec::text("name"),
    ColumnSpec::text("type"),
    ColumnSpec::enumerated("status", EVIDENCE_STATUS_LABELS),
    ColumnSpec::date("createdDate"),
]);

const PACKAGE_MEMBER_COLUMNS: ColumnCatalog = ColumnCatalog::new(&[
    ColumnSpec::text("signum"),
    ColumnSpec::text("name"),
]);

/// Server-side collection listed by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    /// Application users.
    Users,
    /// Onboarded customers.
    Customers,
    /// Configuration entries.
    Configurations,
    /// Line items of one acceptance package.
    LineItems {
        /// Owning package.
        package_id: NonEmptyString,
    },
    /// Evidences of one acceptance package.
    Evidences {
        /// Owning package.
        package_id: NonEmptyString,
    },
    /// Members of one acceptance package.
    PackageMembers {
        /// Owning package.
        package_id: NonEmptyString,
    },
}

impl Collection {
    /// Parses a collection name, using `package_id` for package-scoped collections.
    ///
    /// Only collections a view may list are accepted. The package member list
    /// backs membership checks and is built with [`Collection::package_members`].
    pub fn parse(name: &str, package_id: Option<&str>) -> AppResult<Self> {
        let require_package_id = || {
            package_id.map(package_id_from).transpose()?.ok_or_else(|| {
                AppError::Validation(format!("collection '{name}' requires a package id"))
            })
        };

        match name.trim() {
            "users" => Ok(Self::Users),
            "customers" => Ok(Self::Customers),
            "configurations" => Ok(Self::Configurations),
            "line-items" => Ok(Self::LineItems {
                package_id: require_package_id()?,
            }),
            "evidences" => Ok(Self::Evidences {
                package_id: require_package_id()?,
            }),
            other => Err(AppError::Validation(format!(
                "unknown collection '{other}'"
            ))),
        }
    }

    /// Member list of one package, used to resolve the caller's package role.
    pub fn package_members(package_id: &str) -> AppResult<Self> {
        Ok(Self::PackageMembers {
            package_id: package_id_from(package_id)?,
        })
    }

    /// Returns the endpoint path segments, unencoded.
    #[must_use]
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            Self::Users => vec!["users"],
            Self::Customers => vec!["customers"],
            Self::Configurations => vec!["configurations"],
            Self::LineItems { package_id } => vec!["packages", package_id.as_str(), "line-items"],
            Self::Evidences { package_id } => vec!["packages", package_id.as_str(), "evidences"],
            Self::PackageMembers { package_id } => vec!["packages", package_id.as_str(), "users"],
        }
    }

    /// Returns the endpoint path relative to the API base URL, for display.
    #[must_use]
    pub fn path(&self) -> String {
        self.path_segments().join("/")
    }

    /// Returns how filters are sent for this collection.
    #[must_use]
    pub fn transport_mode(&self) -> TransportMode {
        match self {
            Self::LineItems { .. } | Self::Evidences { .. } => TransportMode::Search,
            _ => TransportMode::Query,
        }
    }

    /// Returns the application permission needed to list the collection.
    ///
    /// Package-scoped collections are gated by [`Collection::required_package_permission`].
    #[must_use]
    pub fn required_permission(&self) -> Option<Permission> {
        match self {
            Self::Users => Some(Permission::ViewUsersMenuItem),
            Self::Customers => Some(Permission::ViewCustomersMenuItem),
            Self::Configurations => Some(Permission::ViewConfigurationsMenuItem),
            Self::LineItems { .. } | Self::Evidences { .. } | Self::PackageMembers { .. } => None,
        }
    }

    /// Returns the package permission needed to list a package-scoped collection.
    #[must_use]
    pub fn required_package_permission(&self) -> Option<ComponentActionPermission> {
        match self {
            Self::LineItems { .. } | Self::Evidences { .. } => {
                Some(ComponentActionPermission::ViewPackage)
            }
            _ => None,
        }
    }

    /// Returns the package id of package-scoped collections.
    #[must_use]
    pub fn package_id(&self) -> Option<&str> {
        match self {
            Self::LineItems { package_id }
            | Self::Evidences { package_id }
            | Self::PackageMembers { package_id } => Some(package_id.as_str()),
            _ => None,
        }
    }

    /// Returns the filterable columns.
    #[must_use]
    pub fn columns(&self) -> ColumnCatalog {
        match self {
            Self::Users => USER_COLUMNS,
            Self::Customers => CUSTOMER_COLUMNS,
            Self::Configurations => CONFIGURATION_COLUMNS,
            Self::LineItems { .. } => LINE_ITEM_COLUMNS,
            Self::Evidences { .. } => EVIDENCE_COLUMNS,
            Self::PackageMembers { .. } => PACKAGE_MEMBER_COLUMNS,
        }
    }
}

/// Package ids travel as one path segment, so dot segments are refused.
fn package_id_from(value: &str) -> AppResult<NonEmptyString> {
    let package_id = NonEmptyString::new(value)?;
    if matches!(package_id.as_str(), "." | "..") {
        return Err(AppError::Validation(format!(
            "package id '{}' is not a valid identifier",
            package_id.as_str()
        )));
    }
    Ok(package_id)
}

impl FromStr for Collection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value, None)
    }
}
