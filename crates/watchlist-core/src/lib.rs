pub mod error;
pub mod normalize;
pub mod parse;
pub mod storage;
pub mod file_storage;
pub mod store;
pub mod stats;
pub mod service;

pub use error::{Result, WatchlistError};
pub use normalize::{normalize_payload, normalize_payload_at, normalize_stored_account};
pub use parse::{decade_of, extract_year, runtime_minutes};
pub use storage::{CollectionStorage, MemoryStorage};
pub use file_storage::FileStorage;
pub use store::ListStore;
pub use stats::{aggregate, Aggregator, DEFAULT_TOP_YEARS};
pub use service::WatchlistService;
