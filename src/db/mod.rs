use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Failures talking to the store. "Not found" is never one of these.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("failed to open database at {url}")]
    Open {
        url: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database query failed")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database worker failed")]
    Join(#[from] tokio::task::JoinError),
}

/// A single SQLite connection with the schema applied.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database named by `url` and bootstrap its schema.
    ///
    /// Accepts `sqlite://path`, `sqlite:path`, a bare path, or `:memory:`.
    pub fn open(url: &str) -> Result<Self, DbError> {
        let open_err = |source| DbError::Open {
            url: url.to_string(),
            source,
        };
        let conn = Connection::open(sqlite_path(url)).map_err(open_err)?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")
            .map_err(open_err)?;

        let db = Database { conn };
        db.migrate()?;
        tracing::debug!(url, "database opened");
        Ok(db)
    }

    /// Create the schema tables if they don't exist.
    pub fn migrate(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS tasks (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                completed   INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
            CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at);
            ",
        )?;
        Ok(())
    }

    /// Round-trip a trivial query to prove the connection is usable.
    pub fn ping(&self) -> Result<(), DbError> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Strip the URL scheme, leaving what `Connection::open` expects.
fn sqlite_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

/// Shared handle to the store, created once at startup and cloned into every request.
///
/// The connection is opened on first use, so constructing a `Store` never
/// fails; a store that cannot be reached surfaces as `DbError` on each call
/// until it can be opened.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    url: String,
    db: Mutex<Option<Database>>,
}

impl Store {
    pub fn new(url: impl Into<String>) -> Self {
        Store {
            inner: Arc::new(Inner {
                url: url.into(),
                db: Mutex::new(None),
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Run `f` against the connection on the blocking thread pool.
    pub async fn call<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Database) -> Result<T, DbError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            // A panic inside `f` drops the taken connection, so the poisoned
            // slot is empty and safe to reuse.
            let mut slot = inner.db.lock().unwrap_or_else(PoisonError::into_inner);
            let db = match slot.take() {
                Some(db) => db,
                None => Database::open(&inner.url)?,
            };
            let result = f(&db);
            *slot = Some(db);
            result
        })
        .await?
    }

    pub async fn ping(&self) -> Result<(), DbError> {
        self.call(|db| db.ping()).await
    }
}
