pub mod browser;
pub mod config;
pub mod delete;
pub mod entry;
pub mod selection;
pub mod sort;
pub mod store;
pub mod upload;

pub use browser::Browser;
pub use config::BrowserConfig;
pub use delete::DeleteOutcome;
pub use entry::{Entry, EntryKind};
pub use sort::{SortField, SortOrder};
pub use store::{MemoryStore, ObjectStore, S3Store};
pub use upload::{LocalFile, UploadOutcome, UploadRecord, UploadState};
