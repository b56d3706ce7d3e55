use uuid::Uuid;

use super::database::{Connection, Database};
use crate::entity::{Entry, EntryPatch, NewEntry};
use crate::error::{JournalError, Result};

const ENTRIES: &str = "entries";

/// CRUD operations on journal entries.
///
/// Every operation opens its own connection and closes it before returning;
/// nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct EntryStore {
    db: Database,
}

impl EntryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All entries in store order
    pub fn list(&self) -> Result<Vec<Entry>> {
        self.db.with_connection(|conn| conn.find_all(ENTRIES))
    }

    /// Entries whose title matches exactly (case-sensitive)
    pub fn find_by_title(&self, title: &str) -> Result<Vec<Entry>> {
        self.db
            .with_connection(|conn| conn.find_by_field(ENTRIES, "title", title))
    }

    pub fn find_by_id(&self, id: &str) -> Result<Entry> {
        self.db.with_connection(|conn| fetch(conn, id))
    }

    /// Validate and persist a new entry. The store assigns the id.
    pub fn create(&self, new: NewEntry) -> Result<Entry> {
        self.db.with_connection(|conn| {
            let (title, body) = new.into_fields()?;
            let entry = Entry::new(Uuid::new_v4(), title, body)?;
            conn.insert(ENTRIES, &entry.id().to_string(), &entry)?;
            tracing::info!(id = %entry.id(), "Created entry");
            Ok(entry)
        })
    }

    pub fn update(&self, id: &str, patch: EntryPatch) -> Result<Entry> {
        self.db.with_connection(|conn| {
            let mut entry = fetch(conn, id)?;
            entry.apply(patch).map_err(|e| {
                tracing::warn!(id, field = e.field(), error = %e, "Rejected update");
                JournalError::RejectedUpdate(e)
            })?;

            // The document may have been removed since it was read
            if !conn.replace(ENTRIES, &entry.id().to_string(), &entry)? {
                return Err(JournalError::EntryNotFound(id.to_string()));
            }
            tracing::info!(id = %entry.id(), "Updated entry");
            Ok(entry)
        })
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            let key = parse_id(id)?;
            if !conn.remove(ENTRIES, &key.to_string())? {
                return Err(JournalError::EntryNotFound(id.to_string()));
            }
            tracing::info!(id = %key, "Deleted entry");
            Ok(())
        })
    }
}

/// Ids that are not well-formed cannot name an entry.
fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| JournalError::EntryNotFound(id.to_string()))
}

fn fetch(conn: &Connection, id: &str) -> Result<Entry> {
    let key = parse_id(id)?;
    conn.get(ENTRIES, &key.to_string())?
        .ok_or_else(|| JournalError::EntryNotFound(id.to_string()))
}
