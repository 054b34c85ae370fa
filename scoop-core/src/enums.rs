//! Operation keywords for migrations

use std::fmt;
use std::str::FromStr;

// ============================================================================
// TABLE OPERATION
// ============================================================================

/// Table-level operation carried by a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableOperation {
    /// Create the table from an empty snapshot
    Add,
    /// Drive the table back to the empty state
    Remove,
    /// Apply column edits to an existing table
    Update,
}

impl TableOperation {
    /// Convert to the wire keyword.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TableOperation::Add => "add",
            TableOperation::Remove => "remove",
            TableOperation::Update => "update",
        }
    }

    /// Parse from the wire keyword. Matching is exact.
    pub fn from_db_str(s: &str) -> Result<Self, OperationParseError> {
        match s {
            "add" => Ok(TableOperation::Add),
            "remove" => Ok(TableOperation::Remove),
            "update" => Ok(TableOperation::Update),
            _ => Err(OperationParseError(s.to_string())),
        }
    }
}

impl fmt::Display for TableOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for TableOperation {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

// ============================================================================
// COLUMN OPERATION KIND
// ============================================================================

/// Column-level operation inside a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnOperationKind {
    Add,
    Remove,
    Update,
}

impl ColumnOperationKind {
    /// Convert to the wire keyword.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ColumnOperationKind::Add => "add",
            ColumnOperationKind::Remove => "remove",
            ColumnOperationKind::Update => "update",
        }
    }

    /// Parse from the wire keyword. Matching is exact.
    pub fn from_db_str(s: &str) -> Result<Self, OperationParseError> {
        match s {
            "add" => Ok(ColumnOperationKind::Add),
            "remove" => Ok(ColumnOperationKind::Remove),
            "update" => Ok(ColumnOperationKind::Update),
            _ => Err(OperationParseError(s.to_string())),
        }
    }
}

impl fmt::Display for ColumnOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for ColumnOperationKind {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an unrecognized operation keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationParseError(pub String);

impl fmt::Display for OperationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid operation: {}", self.0)
    }
}

impl std::error::Error for OperationParseError {}
