//! SQLite storage handle

use std::path::{Path, PathBuf};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row};
use crate::Result;
use super::schema;

/// File name used when neither the CLI nor a config file names a database
pub const DEFAULT_DATABASE_FILE: &str = "questions.db";

/// Handle to the forum database.
///
/// Owns a single connection for its whole lifetime. Every record operation
/// takes a `&Database`; there is no global connection.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open a database file (creates if doesn't exist).
    ///
    /// The schema is not created here; call [`Database::initialize_schema`]
    /// or point at a file that already has the tables.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::info!("Opened database {}", path.display());
        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    /// Open a database file that must already exist.
    ///
    /// A missing file is reported as [`crate::Error::Connection`] and is not
    /// created.
    pub fn open_existing(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        tracing::info!("Opened database {}", path.display());
        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    /// Open an in-memory database with the schema in place (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self::with_connection(conn, None)?;
        db.initialize_schema()?;
        Ok(db)
    }

    // Foreign keys in the schema are advisory; bundled SQLite enforces them
    // unless switched off per connection.
    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", false)?;
        Ok(Self { conn, path })
    }

    /// Create the five forum tables if they are missing
    pub fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        tracing::info!("Schema ready ({} tables)", schema::TABLES.len());
        Ok(())
    }

    /// Path of the backing file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw connection, for queries the record layer does not cover
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute a statement, returning the number of changed rows
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        tracing::debug!(sql = sql.trim(), "execute");
        Ok(self.conn.execute(sql, params)?)
    }

    /// Row id generated by the most recent successful INSERT
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Run a query and map every row
    pub fn fetch_all<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        tracing::debug!(sql = sql.trim(), "query");
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(rows)
    }

    /// Run a query expected to yield at most one row
    pub fn fetch_optional<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        tracing::debug!(sql = sql.trim(), "query_row");
        self.conn
            .query_row(sql, params, map)
            .optional()
            .map_err(Into::into)
    }

    /// Count the rows of one forum table
    pub fn count_rows(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            users: self.count_rows("users")?,
            questions: self.count_rows("questions")?,
            replies: self.count_rows("replies")?,
            followers: self.count_rows("question_followers")?,
            likes: self.count_rows("question_likes")?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub users: usize,
    pub questions: usize,
    pub replies: usize,
    pub followers: usize,
    pub likes: usize,
}

impl DbStats {
    /// (label, count) pairs in table order
    pub fn rows(&self) -> [(&'static str, usize); 5] {
        [
            ("Users", self.users),
            ("Questions", self.questions),
            ("Replies", self.replies),
            ("Follows", self.followers),
            ("Likes", self.likes),
        ]
    }
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        for (label, count) in self.rows() {
            writeln!(f, "  {}: {}", label, count)?;
        }
        Ok(())
    }
}
