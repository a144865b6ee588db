//! SQLite storage for registered clients

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};

use super::RegisteredClient;
use crate::error::RegistryError;

/// Schema version - bump when the table layout changes
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, RegistryError>;

pub struct ClientRegistry {
    conn: Connection,
}

impl ClientRegistry {
    /// Database file inside a data directory
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join("clients.db")
    }

    /// Open or create the registry in `data_dir`
    pub fn open_at(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| RegistryError::Io(format!("Failed to create data dir: {}", e)))?;

        let conn = Connection::open(Self::db_path(data_dir))?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version > SCHEMA_VERSION {
            return Err(RegistryError::Database(format!(
                "registry schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS registered_clients (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                document TEXT NOT NULL,
                email TEXT NOT NULL,
                initial_amount REAL NOT NULL,
                status TEXT NOT NULL,
                registered_at INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self { conn })
    }

    /// Record a client. Re-registering an id replaces the old entry and moves
    /// it to the front.
    pub fn add(&self, client: &RegisteredClient) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO registered_clients
             (id, name, document, email, initial_amount, status, registered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                client.id,
                client.name,
                client.document,
                client.email,
                client.initial_amount,
                client.status,
                client.registered_at.timestamp_millis()
            ],
        )?;
        Ok(())
    }

    /// All clients, most recently registered first
    pub fn list(&self) -> Result<Vec<RegisteredClient>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, document, email, initial_amount, status, registered_at
             FROM registered_clients ORDER BY seq DESC",
        )?;
        let clients = stmt
            .query_map([], from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(clients)
    }

    pub fn get(&self, id: &str) -> Result<Option<RegisteredClient>> {
        let client = self
            .conn
            .query_row(
                "SELECT id, name, document, email, initial_amount, status, registered_at
                 FROM registered_clients WHERE id = ?1",
                [id],
                from_row,
            )
            .optional()?;
        Ok(client)
    }

    /// Remove one client, returning whether it existed
    pub fn remove(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM registered_clients WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    /// Remove every client, returning how many there were
    pub fn clear(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM registered_clients", [])?;
        Ok(deleted)
    }
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<RegisteredClient> {
    let millis: i64 = row.get(6)?;
    Ok(RegisteredClient {
        id: row.get(0)?,
        name: row.get(1)?,
        document: row.get(2)?,
        email: row.get(3)?,
        initial_amount: row.get(4)?,
        status: row.get(5)?,
        registered_at: DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default(),
    })
}
