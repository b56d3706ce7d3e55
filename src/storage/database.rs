use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{params, Connection as SqliteConnection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::{JournalError, Result};

/// Handle to the document store. Holds only the connection target; every
/// [`Database::connect`] opens a fresh connection.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

/// An open connection to the document store.
///
/// Documents are JSON objects grouped into named collections and addressed
/// by an opaque string id.
pub struct Connection {
    conn: SqliteConnection,
}

impl Database {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            path: config.path.clone(),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        }
    }

    /// Open a connection. Any failure to reach or initialize the store is
    /// reported as [`JournalError::Connection`].
    pub fn connect(&self) -> Result<Connection> {
        match self.open() {
            Ok(conn) => {
                tracing::debug!(path = %self.path.display(), "Connected to document store");
                Ok(conn)
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to connect to document store");
                Err(JournalError::Connection(e.to_string()))
            }
        }
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = SqliteConnection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;

        let connection = Connection { conn };
        connection.init_schema()?;
        Ok(connection)
    }

    /// Run `op` on a fresh connection and disconnect afterwards, whatever the
    /// outcome. A failed disconnect is logged and does not replace the result
    /// of `op`.
    pub fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connect()?;
        let outcome = op(&conn);
        if let Err(e) = conn.disconnect() {
            tracing::warn!(error = %e, "Failed to disconnect from document store");
        }
        outcome
    }
}

impl Connection {
    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )",
            [],
        )?;
        Ok(())
    }

    /// Close the connection. Consuming `self` rules out a second disconnect.
    pub fn disconnect(self) -> Result<()> {
        match self.conn.close() {
            Ok(()) => {
                tracing::debug!("Disconnected from document store");
                Ok(())
            }
            Err((_conn, e)) => Err(JournalError::Connection(e.to_string())),
        }
    }

    pub fn insert<T: Serialize>(&self, collection: &str, id: &str, document: &T) -> Result<()> {
        let body = serde_json::to_string(document)?;
        self.conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection, id, body],
        )?;
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|b| serde_json::from_str(&b).map_err(JournalError::from))
            .transpose()
    }

    /// All documents of a collection in store order.
    pub fn find_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY rowid")?;

        let bodies = stmt
            .query_map([collection], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        decode_all(bodies)
    }

    /// Documents whose top-level `field` equals `value` exactly.
    pub fn find_by_field<T: DeserializeOwned>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM documents
             WHERE collection = ?1 AND json_extract(body, ?2) = ?3
             ORDER BY rowid",
        )?;

        let path = format!("$.{}", field);
        let bodies = stmt
            .query_map(params![collection, path, value], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        decode_all(bodies)
    }

    /// Overwrite an existing document. Returns false if there was none.
    pub fn replace<T: Serialize>(&self, collection: &str, id: &str, document: &T) -> Result<bool> {
        let body = serde_json::to_string(document)?;
        let changed = self.conn.execute(
            "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2",
            params![collection, id, body],
        )?;
        Ok(changed > 0)
    }

    /// Delete a document. Returns false if there was none.
    pub fn remove(&self, collection: &str, id: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )?;
        Ok(changed > 0)
    }
}

fn decode_all<T: DeserializeOwned>(bodies: Vec<String>) -> Result<Vec<T>> {
    bodies
        .iter()
        .map(|b| serde_json::from_str(b).map_err(JournalError::from))
        .collect()
}
