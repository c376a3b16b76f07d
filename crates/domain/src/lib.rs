//! Domain types and invariants for access control and list views.

#![forbid(unsafe_code)]

mod collection;
mod labels;
mod listing;
mod membership;
mod permission_table;
mod role;
mod security;

pub use collection::{Collection, ColumnCatalog, ColumnKind, ColumnSpec, TransportMode};
pub use labels::{
    EVIDENCE_STATUS_LABELS, LabelEntry, LabelSet, PACKAGE_STATUS_LABELS, SOFT_DELETE_LABELS,
    UNKNOWN_LABEL, USER_ROLE_LABELS,
};
pub use listing::{
    ColumnFilter, DEFAULT_PAGE_SIZE, FETCH_ALL_PAGE_SIZE, FilterSortConfiguration,
    PAGE_SIZE_OPTIONS, Page, SortDirection, SortDirective,
};
pub use membership::PackageMember;
pub use permission_table::{
    AppPermissionTable, PackagePermissionTable, PermissionTable, RoleDefinition,
};
pub use role::{PackageRole, Role, TableRole};
pub use security::{ComponentActionPermission, Permission};
