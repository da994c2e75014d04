// crates/provision-gate-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Secret Store
// Description: Durable SecretStore backed by SQLite WAL.
// Purpose: Persist minted credential payloads keyed by secret path.
// Dependencies: provision-gate-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`SecretStore`] using `SQLite`. Each
//! secret is one row keyed by path with a JSON payload. Writes use a single
//! mutex-guarded connection; readiness and reads fail closed on engine or
//! deserialization errors.
//!
//! Invariants:
//! - A fresh write to an existing path fails with a conflict unless
//!   overwrite is requested; the existing payload is never clobbered.
//! - Payloads above the size limit are rejected before touching the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use provision_gate_core::OverwritePolicy;
use provision_gate_core::SecretPath;
use provision_gate_core::SecretPayload;
use provision_gate_core::SecretStore;
use provision_gate_core::SecretStoreError;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum serialized payload size accepted by the store.
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` secret store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with defaults for the given database path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding credential payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Store payload exceeded configured size limits.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
    /// Secret path already exists and overwrite was not requested.
    #[error("sqlite store conflict: {path}")]
    Conflict {
        /// Conflicting secret path.
        path: SecretPath,
    },
}

impl From<SqliteStoreError> for SecretStoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) | SqliteStoreError::VersionMismatch(message) => {
                Self::Store(message)
            }
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "payload exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
            SqliteStoreError::Conflict { path } => Self::Conflict { path },
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed secret store with WAL support.
///
/// # Invariants
/// - `SQLite` connection access is serialized through a mutex.
/// - Cloning shares the underlying connection.
#[derive(Clone, Debug)]
pub struct SqliteSecretStore {
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteSecretStore {
    /// Opens or creates the store at the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the path is invalid, the database
    /// cannot be opened, or the schema version does not match.
    pub fn open(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the number of stored secrets.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Db`] when the count query fails.
    pub fn secret_count(&self) -> Result<u64, SqliteStoreError> {
        let connection = self.lock_connection()?;
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM secrets", params![], |row| row.get(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Locks the shared connection.
    fn lock_connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("store connection lock poisoned".to_string()))
    }

    /// Serializes and writes one payload under the given path.
    fn write_payload(
        &self,
        path: &SecretPath,
        payload: &SecretPayload,
        policy: OverwritePolicy,
    ) -> Result<(), SqliteStoreError> {
        let payload_json =
            serde_json::to_string(payload).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if payload_json.len() > MAX_PAYLOAD_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_PAYLOAD_BYTES,
                actual_bytes: payload_json.len(),
            });
        }
        let created_at_ms = unix_millis_now();

        let connection = self.lock_connection()?;
        let statement = match policy {
            OverwritePolicy::Fail => {
                "INSERT INTO secrets (path, payload, created_at_ms) VALUES (?1, ?2, ?3)"
            }
            OverwritePolicy::Overwrite => {
                "INSERT OR REPLACE INTO secrets (path, payload, created_at_ms) VALUES (?1, ?2, ?3)"
            }
        };
        let result =
            connection.execute(statement, params![path.as_str(), payload_json, created_at_ms]);
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(SqliteStoreError::Conflict { path: path.clone() })
            }
            Err(err) => Err(SqliteStoreError::Db(err.to_string())),
        }
    }

    /// Reads and deserializes the payload stored under the given path.
    fn read_payload(&self, path: &SecretPath) -> Result<Option<SecretPayload>, SqliteStoreError> {
        let connection = self.lock_connection()?;
        let payload_json: Option<String> = connection
            .query_row(
                "SELECT payload FROM secrets WHERE path = ?1",
                params![path.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        payload_json
            .map(|json| {
                serde_json::from_str(&json).map_err(|err| SqliteStoreError::Invalid(err.to_string()))
            })
            .transpose()
    }
}

#[async_trait]
impl SecretStore for SqliteSecretStore {
    async fn write(
        &self,
        path: &SecretPath,
        payload: &SecretPayload,
        policy: OverwritePolicy,
    ) -> Result<(), SecretStoreError> {
        self.write_payload(path, payload, policy).map_err(SecretStoreError::from)
    }

    async fn read(&self, path: &SecretPath) -> Result<Option<SecretPayload>, SecretStoreError> {
        self.read_payload(path).map_err(SecretStoreError::from)
    }

    async fn readiness(&self) -> Result<(), SecretStoreError> {
        let connection = self.lock_connection().map_err(SecretStoreError::from)?;
        connection
            .query_row("SELECT 1", params![], |_row| Ok(()))
            .map_err(|err| SecretStoreError::Store(err.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current wall clock as unix milliseconds.
fn unix_millis_now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| {
        i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
    })
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute_batch(
                "INSERT INTO store_meta (version) VALUES (1);
                 CREATE TABLE IF NOT EXISTS secrets (
                     path TEXT PRIMARY KEY,
                     payload TEXT NOT NULL,
                     created_at_ms INTEGER NOT NULL
                 );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(found) if found == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "expected schema version {SCHEMA_VERSION}, found {found}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))
}
