//! Scoop Core - Schema Model Types
//!
//! Value types for a warehouse table's versioned schema and the migrations
//! that evolve it, plus the error catalog and engine configuration shared by
//! the other crates. This crate holds no migration logic; see scoop-migrator.

mod config;
mod enums;
mod error;
mod identifier;
mod model;
mod transformer;

pub use config::{
    MigratorConfig, DEFAULT_MAX_COLUMNS, DEFAULT_MAX_IDENTIFIER_LEN, DEFAULT_MAX_VARCHAR_BYTES,
};
pub use enums::{ColumnOperationKind, OperationParseError, TableOperation};
pub use error::{
    ConfigError, ErrorKind, ErrorReason, MigrationError, MigrationResult, ScoopError, ScoopResult,
    StorageError,
};
pub use identifier::IdentifierPolicy;
pub use model::{ColumnDefinition, ColumnOperation, Event, Migration, TableOption};
pub use transformer::{varchar_size, TransformerSet, STANDARD_TRANSFORMERS, VARCHAR};

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
