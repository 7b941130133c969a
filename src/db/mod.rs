//! Database layer for the board engine.

pub mod boards;
pub mod cards;
pub mod checklists;
pub mod comments;
pub mod lists;
mod positions;
pub mod workspaces;

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Bounded retries for write transactions that hit a busy database.
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Database handle wrapping a SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for concurrent access
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations.
    fn run_migrations(&self) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        embedded::migrations::runner().run(&mut *conn)?;
        Ok(())
    }

    /// Execute a read with shared access to the connection.
    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }

    /// Run a mutation inside an immediate transaction.
    ///
    /// The closure computes and applies the full write set; it commits as
    /// one unit or not at all. A busy/locked database (another handle
    /// writing the same file) retries the whole read-then-write from
    /// scratch up to [`MAX_WRITE_ATTEMPTS`] before surfacing
    /// [`Error::ConflictRetryExhausted`]. `scope` names the contended
    /// sibling scope for logs and the error message.
    pub(crate) fn write_txn<F, T>(&self, scope: &str, f: F) -> Result<T>
    where
        F: Fn(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock().unwrap();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(Error::from)
                .and_then(|tx| {
                    let value = f(&tx)?;
                    tx.commit()?;
                    Ok(value)
                });
            match result {
                Err(Error::Database(ref err)) if is_busy(err) => {
                    if attempt >= MAX_WRITE_ATTEMPTS {
                        return Err(Error::ConflictRetryExhausted {
                            scope: scope.to_string(),
                            attempts: attempt,
                        });
                    }
                    tracing::debug!(scope, attempt, "write transaction busy, retrying");
                }
                other => return other,
            }
        }
    }
}

/// Whether a rusqlite error is a transient busy/locked conflict.
fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::DatabaseBusy
                || e.code == rusqlite::ErrorCode::DatabaseLocked
    )
}

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
