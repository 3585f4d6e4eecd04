//! Record store for visits and clinics.
//!
//! The rest of the crate only relies on the operations here: create, get,
//! equality-filtered listing with a single-field sort, update, delete, and
//! atomic multi-record writes (transactions). Anything beyond that contract
//! is an implementation detail of this module.

mod clinics;
mod schema;
mod seed;
mod visits;

pub use schema::*;
#[allow(unused_imports)]
pub use clinics::*;
pub use seed::*;
#[allow(unused_imports)]
pub use visits::*;

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Store errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

/// Map a user scope onto a per-user database file under `root`.
///
/// The scope string is an opaque partition key supplied by the identity
/// collaborator; it is hashed, never parsed, so any scope shape yields a
/// valid file name.
pub fn scoped_db_path(root: &Path, scope: &str) -> PathBuf {
    let digest = Sha256::digest(scope.as_bytes());
    root.join(format!("coverage-{}.sqlite3", hex::encode(digest)))
}
