//! Database Connection Management
//!
//! This module provides the database connection, schema initialization and
//! raw SQL operations for the event planner, using libsql (embedded,
//! SQLite-compatible).
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf
//! - **WAL mode**: Write-Ahead Logging for concurrent readers
//! - **Raw rows**: `db_*` methods return libsql rows; `TursoStore` converts
//!   them into models
//! - **Transactions**: Every write touching more than one row (event plus
//!   type count, bulk priority rewrites) runs in a single transaction
//!
//! # Database Connection Patterns
//!
//! **ALWAYS use `connect_with_timeout()` in async functions.** The 5-second
//! busy timeout lets concurrent writers wait for the lock instead of failing
//! immediately with `SQLITE_BUSY`.
//!
//! ```no_run
//! # use event_planner_core::db::DatabaseService;
//! # use std::path::PathBuf;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db_service = DatabaseService::new(PathBuf::from("./data/event-planner.db")).await?;
//! let conn = db_service.connect_with_timeout().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::error::DatabaseError;
use libsql::{Builder, Connection, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Column list shared by every event SELECT (order matters for row conversion)
pub(crate) const EVENT_COLUMNS: &str =
    "id, title, event_type, start_at, end_at, priority, created_at, updated_at";

/// Database service for managing the libsql connection and schema
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

/// Parameters for event insertion and update (avoids too-many-arguments lint)
///
/// Instants are epoch milliseconds.
pub struct DbEventParams<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub event_type: &'a str,
    pub start_at: i64,
    pub end_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created, the
    /// connection fails or schema initialization fails.
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema().await?;

        tracing::info!("Database ready at {}", service.db_path.display());
        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so they must go through query() rather
    /// than execute().
    async fn execute_pragma(&self, conn: &Connection, pragma: &str) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Idempotent: safe to call on an existing database.
    ///
    /// # Schema
    ///
    /// - `events`: one row per event, `priority` NULL when unordered
    /// - `event_types`: reference-counted type vocabulary (count always > 0)
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                event_type TEXT NOT NULL,
                start_at INTEGER NOT NULL,
                end_at INTEGER NOT NULL,
                priority REAL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                CHECK (start_at < end_at)
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create events table: {}", e))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS event_types (
                type TEXT PRIMARY KEY,
                count INTEGER NOT NULL CHECK (count > 0)
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!(
                "Failed to create event_types table: {}",
                e
            ))
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_events_start_at ON events(start_at)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create start_at index: {}", e))
        })?;

        Ok(())
    }

    /// Get a connection to the database
    ///
    /// Prefer `connect_with_timeout()` in async code.
    pub fn connect(&self) -> Result<Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get a connection with a 5-second busy timeout configured
    ///
    /// Concurrent writers wait for the lock instead of failing immediately.
    pub async fn connect_with_timeout(&self) -> Result<Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        Ok(conn)
    }

    /// Begin a write transaction on `conn`
    ///
    /// IMMEDIATE takes the write lock up front so the busy timeout applies.
    async fn begin(conn: &Connection) -> Result<(), DatabaseError> {
        conn.execute("BEGIN IMMEDIATE", ()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to begin transaction: {}", e))
        })?;
        Ok(())
    }

    /// Commit on success, roll back on failure
    async fn finish<T>(
        conn: &Connection,
        outcome: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match outcome {
            Ok(value) => {
                if let Err(e) = conn.execute("COMMIT", ()).await {
                    let _rollback = conn.execute("ROLLBACK", ()).await;
                    return Err(DatabaseError::sql_execution(format!(
                        "Failed to commit transaction: {}",
                        e
                    )));
                }
                Ok(value)
            }
            Err(e) => {
                let _rollback = conn.execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }

    async fn increment_type(conn: &Connection, event_type: &str) -> Result<(), DatabaseError> {
        conn.execute(
            "INSERT INTO event_types (type, count) VALUES (?, 1)
             ON CONFLICT(type) DO UPDATE SET count = count + 1",
            [event_type],
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to increment event type '{}': {}",
                event_type, e
            ))
        })?;
        Ok(())
    }

    /// Decrement a type's count, deleting the record instead of reaching zero
    async fn decrement_type(conn: &Connection, event_type: &str) -> Result<(), DatabaseError> {
        let updated = conn
            .execute(
                "UPDATE event_types SET count = count - 1 WHERE type = ? AND count > 1",
                [event_type],
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!(
                    "Failed to decrement event type '{}': {}",
                    event_type, e
                ))
            })?;

        if updated == 0 {
            conn.execute("DELETE FROM event_types WHERE type = ?", [event_type])
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!(
                        "Failed to remove event type '{}': {}",
                        event_type, e
                    ))
                })?;
        }
        Ok(())
    }

    //
    // EVENT OPERATIONS
    //

    /// Insert an event and count its type, atomically
    ///
    /// New events are always unordered (priority NULL).
    pub async fn db_insert_event(&self, params: DbEventParams<'_>) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        Self::begin(&conn).await?;

        let outcome = async {
            conn.execute(
                "INSERT INTO events (id, title, event_type, start_at, end_at, priority, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, NULL, ?, ?)",
                (
                    params.id,
                    params.title,
                    params.event_type,
                    params.start_at,
                    params.end_at,
                    params.created_at,
                    params.updated_at,
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert event: {}", e)))?;

            Self::increment_type(&conn, params.event_type).await
        }
        .await;

        Self::finish(&conn, outcome).await
    }

    /// Retrieve a single event row by ID
    pub async fn db_get_event(&self, id: &str) -> Result<Option<libsql::Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS),
                [id],
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to execute get_event query: {}", e))
            })?;

        rows.next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))
    }

    /// Retrieve several events in one round trip
    ///
    /// Unknown IDs are simply absent from the result.
    pub async fn db_get_events_by_ids(&self, ids: &[&str]) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let placeholders = vec!["?"; ids.len().max(1)].join(", ");
        let values: Vec<libsql::Value> = if ids.is_empty() {
            vec![libsql::Value::Null]
        } else {
            ids.iter()
                .map(|id| libsql::Value::Text(id.to_string()))
                .collect()
        };

        conn.query(
            &format!(
                "SELECT {} FROM events WHERE id IN ({})",
                EVENT_COLUMNS, placeholders
            ),
            libsql::params::Params::Positional(values),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute batched lookup: {}", e))
        })
    }

    /// Update an event's fields (never its priority), keeping type counts in step
    ///
    /// The stored type is read inside the write transaction, so concurrent
    /// type changes each release the type they actually replaced.
    ///
    /// Returns the number of event rows changed (0 if the event is gone).
    pub async fn db_update_event(&self, params: DbEventParams<'_>) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        Self::begin(&conn).await?;

        let outcome = async {
            let mut rows = conn
                .query("SELECT event_type FROM events WHERE id = ?", [params.id])
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!("Failed to look up event: {}", e))
                })?;

            let previous_type: String = match rows
                .next()
                .await
                .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
            {
                Some(row) => row.get(0)?,
                None => return Ok(0),
            };

            let changed = conn
                .execute(
                    "UPDATE events SET title = ?, event_type = ?, start_at = ?, end_at = ?, updated_at = ?
                     WHERE id = ?",
                    (
                        params.title,
                        params.event_type,
                        params.start_at,
                        params.end_at,
                        params.updated_at,
                        params.id,
                    ),
                )
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!("Failed to update event: {}", e))
                })?;

            if previous_type != params.event_type {
                Self::decrement_type(&conn, &previous_type).await?;
                Self::increment_type(&conn, params.event_type).await?;
            }
            Ok::<u64, DatabaseError>(changed)
        }
        .await;

        Self::finish(&conn, outcome).await
    }

    /// Delete an event and release its type, atomically
    ///
    /// Returns the number of event rows deleted.
    pub async fn db_delete_event(&self, id: &str) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        Self::begin(&conn).await?;

        let outcome = async {
            let mut rows = conn
                .query("SELECT event_type FROM events WHERE id = ?", [id])
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!("Failed to look up event: {}", e))
                })?;

            let event_type: String = match rows
                .next()
                .await
                .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
            {
                Some(row) => row.get(0)?,
                None => return Ok(0),
            };

            let deleted = conn
                .execute("DELETE FROM events WHERE id = ?", [id])
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!("Failed to delete event: {}", e))
                })?;

            Self::decrement_type(&conn, &event_type).await?;
            Ok::<u64, DatabaseError>(deleted)
        }
        .await;

        Self::finish(&conn, outcome).await
    }

    /// Events whose start lies in `[from_ms, to_ms]`, unsorted
    ///
    /// Keyword filtering happens in the store: SQLite `LIKE` only folds ASCII
    /// case.
    pub async fn db_query_events(
        &self,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.query(
            &format!(
                "SELECT {} FROM events WHERE start_at >= ? AND start_at <= ?",
                EVENT_COLUMNS
            ),
            (from_ms, to_ms),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute query_events: {}", e))
        })
    }

    /// Every event in the collection, unsorted
    pub async fn db_all_events(&self) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.query(&format!("SELECT {} FROM events", EVENT_COLUMNS), ())
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to execute all_events query: {}", e))
            })
    }

    //
    // PRIORITY OPERATIONS
    //

    /// Write one event's priority
    ///
    /// Returns the number of rows changed (0 if the event is gone).
    pub async fn db_set_priority(
        &self,
        id: &str,
        priority: Option<f64>,
    ) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute("UPDATE events SET priority = ? WHERE id = ?", (priority, id))
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to set priority: {}", e)))
    }

    /// Rewrite many priorities in a single transaction
    ///
    /// All-or-nothing: any failure rolls the whole batch back. Rows that no
    /// longer exist are skipped.
    pub async fn db_batch_set_priorities(
        &self,
        updates: &[(&str, f64)],
    ) -> Result<u64, DatabaseError> {
        if updates.is_empty() {
            return Ok(0);
        }

        let conn = self.connect_with_timeout().await?;
        Self::begin(&conn).await?;

        let outcome = async {
            let mut changed = 0;
            for (id, priority) in updates {
                changed += conn
                    .execute(
                        "UPDATE events SET priority = ? WHERE id = ?",
                        (*priority, *id),
                    )
                    .await
                    .map_err(|e| {
                        DatabaseError::sql_execution(format!(
                            "Failed to set priority for event {}: {}",
                            id, e
                        ))
                    })?;
            }
            Ok::<u64, DatabaseError>(changed)
        }
        .await;

        Self::finish(&conn, outcome).await
    }

    /// Clear every priority in one statement
    pub async fn db_clear_priorities(&self) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "UPDATE events SET priority = NULL WHERE priority IS NOT NULL",
            (),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to clear priorities: {}", e)))
    }

    //
    // EVENT TYPE OPERATIONS
    //

    /// Every type record, sorted by name
    pub async fn db_list_event_types(&self) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.query("SELECT type, count FROM event_types ORDER BY type ASC", ())
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to list event types: {}", e))
            })
    }
}
