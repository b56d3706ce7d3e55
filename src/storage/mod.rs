mod database;
mod entry_store;

pub use database::{Connection, Database};
pub use entry_store::EntryStore;
