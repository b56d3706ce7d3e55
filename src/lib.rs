pub mod api;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod storage;

pub use config::Config;
pub use entity::Entry;
pub use error::{JournalError, Result};
pub use storage::{Database, EntryStore};
