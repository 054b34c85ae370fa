//! Error types for schema migrations

use std::fmt;
use thiserror::Error;

// ============================================================================
// REASON CATALOG
// ============================================================================

/// Closed catalog of reasons a migration can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    InvalidTableOperation,
    InvalidColumnOperation,
    AddTableOnExistingTable,
    RemoveTableOnNonExistingTable,
    UpdateTableOnNonExistingTable,
    MustContainDistKey,
    DistKeyNotInCols,
    SortKeyNotInCols,
    DifferentTableOptions,
    RemoveColIsDistKey,
    UpdateColIsDistKey,
    UpdateColNonExistingCol,
    RemoveColNonExistingCol,
    ColumnOpNotAdd,
    ColumnOpNotUpdate,
    ColumnOpNotRemove,
    InvalidTransformer,
    VarCharBytesMax,
    VarCharNotInt,
    InvalidIdentifier,
    OutboundNameCollision,
    TooManyColumns,
    VersionOverflow,
}

impl ErrorReason {
    /// Every reason in the catalog.
    pub const ALL: [ErrorReason; 23] = [
        ErrorReason::InvalidTableOperation,
        ErrorReason::InvalidColumnOperation,
        ErrorReason::AddTableOnExistingTable,
        ErrorReason::RemoveTableOnNonExistingTable,
        ErrorReason::UpdateTableOnNonExistingTable,
        ErrorReason::MustContainDistKey,
        ErrorReason::DistKeyNotInCols,
        ErrorReason::SortKeyNotInCols,
        ErrorReason::DifferentTableOptions,
        ErrorReason::RemoveColIsDistKey,
        ErrorReason::UpdateColIsDistKey,
        ErrorReason::UpdateColNonExistingCol,
        ErrorReason::RemoveColNonExistingCol,
        ErrorReason::ColumnOpNotAdd,
        ErrorReason::ColumnOpNotUpdate,
        ErrorReason::ColumnOpNotRemove,
        ErrorReason::InvalidTransformer,
        ErrorReason::VarCharBytesMax,
        ErrorReason::VarCharNotInt,
        ErrorReason::InvalidIdentifier,
        ErrorReason::OutboundNameCollision,
        ErrorReason::TooManyColumns,
        ErrorReason::VersionOverflow,
    ];

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorReason::InvalidTableOperation => "INVALID_TABLE_OPERATION",
            ErrorReason::InvalidColumnOperation => "INVALID_COLUMN_OPERATION",
            ErrorReason::AddTableOnExistingTable => "ADD_TABLE_ON_EXISTING_TABLE",
            ErrorReason::RemoveTableOnNonExistingTable => "REMOVE_TABLE_ON_NON_EXISTING_TABLE",
            ErrorReason::UpdateTableOnNonExistingTable => "UPDATE_TABLE_ON_NON_EXISTING_TABLE",
            ErrorReason::MustContainDistKey => "MUST_CONTAIN_DIST_KEY",
            ErrorReason::DistKeyNotInCols => "DIST_KEY_NOT_IN_COLS",
            ErrorReason::SortKeyNotInCols => "SORT_KEY_NOT_IN_COLS",
            ErrorReason::DifferentTableOptions => "DIFFERENT_TABLE_OPTIONS",
            ErrorReason::RemoveColIsDistKey => "REMOVE_COL_IS_DIST_KEY",
            ErrorReason::UpdateColIsDistKey => "UPDATE_COL_IS_DIST_KEY",
            ErrorReason::UpdateColNonExistingCol => "UPDATE_COL_NON_EXISTING_COL",
            ErrorReason::RemoveColNonExistingCol => "REMOVE_COL_NON_EXISTING_COL",
            ErrorReason::ColumnOpNotAdd => "COLUMN_OP_NOT_ADD",
            ErrorReason::ColumnOpNotUpdate => "COLUMN_OP_NOT_UPDATE",
            ErrorReason::ColumnOpNotRemove => "COLUMN_OP_NOT_REMOVE",
            ErrorReason::InvalidTransformer => "INVALID_TRANSFORMER",
            ErrorReason::VarCharBytesMax => "VARCHAR_BYTES_MAX",
            ErrorReason::VarCharNotInt => "VARCHAR_NOT_INT",
            ErrorReason::InvalidIdentifier => "INVALID_IDENTIFIER",
            ErrorReason::OutboundNameCollision => "OUTBOUND_NAME_COLLISION",
            ErrorReason::TooManyColumns => "TOO_MANY_COLUMNS",
            ErrorReason::VersionOverflow => "VERSION_OVERFLOW",
        }
    }

    /// Fixed human-readable message, suitable for the migration's author.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorReason::InvalidTableOperation => {
                "Not one of the valid table operations (add, remove, update)"
            }
            ErrorReason::InvalidColumnOperation => {
                "Not one of the valid column operations (add, remove, update)"
            }
            ErrorReason::AddTableOnExistingTable => "Cannot add table that already exists",
            ErrorReason::RemoveTableOnNonExistingTable => "Cannot remove table that doesn't exist",
            ErrorReason::UpdateTableOnNonExistingTable => "Cannot update table that doesn't exist",
            ErrorReason::MustContainDistKey => {
                "Cannot proceed without having at least a single DistKey"
            }
            ErrorReason::DistKeyNotInCols => "DistKey must be present in outbound col names",
            ErrorReason::SortKeyNotInCols => "SortKey must be present in outbound col names",
            ErrorReason::DifferentTableOptions => "Cannot change table options on update",
            ErrorReason::RemoveColIsDistKey => "Remove column operation is on DistKey",
            ErrorReason::UpdateColIsDistKey => "Update column operation is on DistKey",
            ErrorReason::UpdateColNonExistingCol => "Cannot update column that does not exist",
            ErrorReason::RemoveColNonExistingCol => "Cannot remove column that does not exist",
            ErrorReason::ColumnOpNotAdd => "Column operation should be add",
            ErrorReason::ColumnOpNotUpdate => "Column operation should be update",
            ErrorReason::ColumnOpNotRemove => "Column operation should be remove",
            ErrorReason::InvalidTransformer => "Invalid transformer",
            ErrorReason::VarCharBytesMax => "varchar size exceeds max bytes (64k-1)",
            ErrorReason::VarCharNotInt => "varchar option provided not an int",
            ErrorReason::InvalidIdentifier => "Provided name is an invalid sql identifier",
            ErrorReason::OutboundNameCollision => {
                "Outbound column name collides with existing column"
            }
            ErrorReason::TooManyColumns => {
                "Too many columns; wide redshift tables slow queries immensely"
            }
            ErrorReason::VersionOverflow => "Table version cannot be incremented further",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

// ============================================================================
// MIGRATION ERRORS
// ============================================================================

/// Which part of a migration is to blame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The migration as a whole
    Table,
    /// One column operation
    Column,
}

/// Rejection of a migration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MigrationError {
    #[error("Table error [{}]: {reason}", .reason.code())]
    Table { reason: ErrorReason },

    #[error("Column error on '{column}' [{}]: {reason}", .reason.code())]
    Column { reason: ErrorReason, column: String },
}

impl MigrationError {
    pub fn table(reason: ErrorReason) -> Self {
        MigrationError::Table { reason }
    }

    pub fn column(reason: ErrorReason, column: impl Into<String>) -> Self {
        MigrationError::Column {
            reason,
            column: column.into(),
        }
    }

    pub fn reason(&self) -> ErrorReason {
        match self {
            MigrationError::Table { reason } | MigrationError::Column { reason, .. } => *reason,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MigrationError::Table { .. } => ErrorKind::Table,
            MigrationError::Column { .. } => ErrorKind::Column,
        }
    }

    /// Outbound name of the offending column operation, for column errors.
    pub fn column_name(&self) -> Option<&str> {
        match self {
            MigrationError::Table { .. } => None,
            MigrationError::Column { column, .. } => Some(column),
        }
    }
}

/// Result type alias for engine operations.
pub type MigrationResult<T> = Result<T, MigrationError>;

// ============================================================================
// AMBIENT ERRORS
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration: {reason}")]
    ParseFailed { reason: String },
}

/// Schema store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Table not found: {table}")]
    NotFound { table: String },

    #[error("Stale write for {table}: stored version {stored}, attempted {attempted}")]
    StaleVersion {
        table: String,
        stored: u64,
        attempted: u64,
    },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Master error type for all scoop errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoopError {
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for scoop operations.
pub type ScoopResult<T> = Result<T, ScoopError>;
