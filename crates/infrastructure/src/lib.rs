//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_persistence_store;
mod in_memory_persistence_store;
mod jwt_claims_decoder;
mod reqwest_transport;
mod static_permission_catalog;
mod tracing_notifier;

pub use file_persistence_store::FilePersistenceStore;
pub use in_memory_persistence_store::InMemoryPersistenceStore;
pub use jwt_claims_decoder::JwtClaimsDecoder;
pub use reqwest_transport::ReqwestTransport;
pub use static_permission_catalog::StaticPermissionCatalog;
pub use tracing_notifier::TracingNotifier;
