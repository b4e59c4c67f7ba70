mod notifier;
mod persistence;
mod records;
mod session;
mod transport;

pub use notifier::{Notice, NoticeLevel, Notifier};
pub use persistence::PersistenceStore;
pub use records::{CollectionSource, CreateRecord, Draft, UpdateRecord};
pub use session::SessionTokenDecoder;
pub use transport::Transport;
