//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod column;
mod field;
mod path;
mod records;
mod security;
mod session;
mod view;

pub use column::{Accessor, ColumnDescriptor, ComputedCell, Extractor};
pub use field::{
    FieldDescriptor, FieldMatrix, FieldOption, FieldPattern, FieldValue, FieldValues, InputKind,
};
pub use path::{display_value, resolve_path};
pub use records::{AccessRequest, ConsoleRecord, Device, Role, Software, StateRequest, User};
pub use security::{
    Action, Permission, PermissionCatalog, PermissionEntry, PermissionSet, Resource, Scope,
};
pub use session::SessionClaims;
pub use view::{SortDirection, SortSpec};
