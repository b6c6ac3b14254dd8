//! SQLite connection pool.
//!
//! A single connection guarded by a mutex. The workshop runs one operator at a
//! time, so requests simply queue on the lock.

use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Connection(rusqlite::Error),

    #[error("Referenced row still in use: {0}")]
    ForeignKeyViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid decimal value: {0}")]
    Decimal(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("Connection lock poisoned")]
    Poisoned,
}

/// SQLite reports immediate FK checks as `SQLITE_CONSTRAINT_FOREIGNKEY` but
/// `ON DELETE RESTRICT` ones as `SQLITE_CONSTRAINT_TRIGGER`.
fn is_foreign_key_failure(err: &rusqlite::ffi::Error, msg: Option<&str>) -> bool {
    match err.extended_code {
        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => true,
        rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER => {
            msg.is_some_and(|m| m.contains("FOREIGN KEY constraint failed"))
        }
        _ => false,
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, msg)
                if is_foreign_key_failure(&err, msg.as_deref()) =>
            {
                DbError::ForeignKeyViolation(
                    msg.unwrap_or_else(|| "FOREIGN KEY constraint failed".to_string()),
                )
            }
            e => DbError::Connection(e),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Shared handle to the application database.
pub struct DbPool {
    conn: Mutex<Connection>,
}

impl DbPool {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::configure(conn)
    }

    /// Private in-memory database, used by tests.
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> DbResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with a shared borrow of the connection.
    pub fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&conn)
    }

    /// Run `f` with an exclusive borrow of the connection.
    pub fn with_conn_mut<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&mut conn)
    }

    /// Run `f` inside a transaction. Commits when `f` returns `Ok`,
    /// rolls back otherwise.
    pub fn with_transaction<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DbResult<T>,
    {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
    }
}

/// Initialize a database pool at `path` and bring the schema up to date.
pub fn init_pool(path: &Path) -> DbResult<DbPool> {
    let pool = DbPool::open(path)?;
    crate::migrations::run_migrations(&pool)?;
    tracing::debug!(path = %path.display(), "Database ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let pool = DbPool::in_memory().unwrap();
        pool.with_conn(|conn| {
            conn.execute_batch("CREATE TABLE t (v INTEGER NOT NULL)")?;
            Ok(())
        })
        .unwrap();

        let result: DbResult<()> = pool.with_transaction(|tx| {
            tx.execute("INSERT INTO t (v) VALUES (1)", [])?;
            Err(DbError::NotFound("abort".into()))
        });
        assert!(result.is_err());

        let count: i64 = pool
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }

    fn parent_child(pool: &DbPool) {
        pool.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE parent (id INTEGER PRIMARY KEY);
                 CREATE TABLE child (
                     id INTEGER PRIMARY KEY,
                     parent_id INTEGER NOT NULL REFERENCES parent(id) ON DELETE RESTRICT
                 );
                 INSERT INTO parent (id) VALUES (1);
                 INSERT INTO child (id, parent_id) VALUES (1, 1);",
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_restrict_delete_is_a_foreign_key_violation() {
        let pool = DbPool::in_memory().unwrap();
        parent_child(&pool);

        let err = pool
            .with_conn(|conn| {
                conn.execute("DELETE FROM parent WHERE id = 1", [])?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation(_)), "{:?}", err);
    }

    #[test]
    fn test_missing_parent_is_a_foreign_key_violation() {
        let pool = DbPool::in_memory().unwrap();
        parent_child(&pool);

        let err = pool
            .with_conn(|conn| {
                conn.execute("INSERT INTO child (id, parent_id) VALUES (2, 99)", [])?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation(_)), "{:?}", err);
    }

    #[test]
    fn test_other_constraints_are_not_foreign_keys() {
        let pool = DbPool::in_memory().unwrap();
        parent_child(&pool);

        let err = pool
            .with_conn(|conn| {
                conn.execute("INSERT INTO parent (id) VALUES (1)", [])?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Connection(_)), "{:?}", err);
    }
}
