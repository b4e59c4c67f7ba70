//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod console_ports;
mod directory_service;
mod filter_sort;
mod form_engine;
mod grid_engine;
mod lookup_cache;
mod rest_resource;
mod session_service;

pub use authorization_service::{
    AuthorizationGate, PERMISSION_DENIED_NOTICE_ID, PermissionModel, RouteGuard,
    RouteGuardConfig, RouteOutcome, RouteState,
};
pub use console_ports::{
    CollectionSource, CreateRecord, Draft, Notice, NoticeLevel, Notifier, PersistenceStore,
    SessionTokenDecoder, Transport, UpdateRecord,
};
pub use directory_service::{
    AccessDecision, Directory, DirectoryConfig, DirectoryService, DirectorySummary,
};
pub use filter_sort::{filter_and_sort, filter_and_sort_indices};
pub use form_engine::{FieldState, FormEngine, Validity};
pub use grid_engine::{
    DraftEditorView, DraftInputView, DraftMode, DraftState, FilterBarView, FilterChange,
    GridEngine, GridView, HeaderView, RowAction, RowView,
};
pub use lookup_cache::LookupCache;
pub use rest_resource::{RestResource, draft_matches, draft_to_json};
pub use session_service::{SESSION_CHECKER_NOTICE_ID, SESSION_STORAGE_KEY, SessionService};
