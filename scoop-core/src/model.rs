//! Schema entity types
//!
//! Field names serialize in PascalCase so payloads produced by the signed
//! transport layer deserialize without a mapping step.

use crate::enums::{ColumnOperationKind, TableOperation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// COLUMN DEFINITION
// ============================================================================

/// A single column of a warehouse table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ColumnDefinition {
    /// Field name in the source record
    pub inbound_name: String,
    /// Column name in the destination table, unique per table
    pub outbound_name: String,
    /// Name of the transform applied to the value on load
    pub transformer: String,
    /// Raw DDL fragment, e.g. `(500)` for a varchar
    pub column_creation_options: String,
}

impl ColumnDefinition {
    pub fn new(
        inbound_name: impl Into<String>,
        outbound_name: impl Into<String>,
        transformer: impl Into<String>,
        column_creation_options: impl Into<String>,
    ) -> Self {
        Self {
            inbound_name: inbound_name.into(),
            outbound_name: outbound_name.into(),
            transformer: transformer.into(),
            column_creation_options: column_creation_options.into(),
        }
    }
}

// ============================================================================
// TABLE OPTION
// ============================================================================

/// Distribution and sort keys, as references into the column set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TableOption {
    /// Outbound names used for data distribution
    pub dist_key: Vec<String>,
    /// Outbound names used for sort order (may be empty)
    pub sort_key: Vec<String>,
}

impl TableOption {
    pub fn new<D, S>(dist_key: D, sort_key: S) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            dist_key: dist_key.into_iter().map(Into::into).collect(),
            sort_key: sort_key.into_iter().map(Into::into).collect(),
        }
    }

    /// True iff both key lists are empty.
    pub fn is_empty(&self) -> bool {
        self.dist_key.is_empty() && self.sort_key.is_empty()
    }

    pub fn is_dist_key(&self, outbound_name: &str) -> bool {
        self.dist_key.iter().any(|k| k == outbound_name)
    }

    pub fn is_sort_key(&self, outbound_name: &str) -> bool {
        self.sort_key.iter().any(|k| k == outbound_name)
    }
}

// ============================================================================
// COLUMN OPERATION
// ============================================================================

/// One column-level edit inside a migration.
///
/// For remove and update, `inbound_name`/`outbound_name` identify the existing
/// column being acted on. For add they echo the new definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ColumnOperation {
    /// Raw operation keyword (`add`, `remove`, `update`)
    pub operation: String,
    pub inbound_name: String,
    pub outbound_name: String,
    /// Definition to add, or the replacement definition for update
    pub new_column_definition: ColumnDefinition,
}

impl ColumnOperation {
    /// Add `definition` as a new column.
    pub fn add(definition: ColumnDefinition) -> Self {
        Self {
            operation: ColumnOperationKind::Add.as_db_str().to_string(),
            inbound_name: definition.inbound_name.clone(),
            outbound_name: definition.outbound_name.clone(),
            new_column_definition: definition,
        }
    }

    /// Remove the column currently named `outbound_name`.
    pub fn remove(inbound_name: impl Into<String>, outbound_name: impl Into<String>) -> Self {
        Self {
            operation: ColumnOperationKind::Remove.as_db_str().to_string(),
            inbound_name: inbound_name.into(),
            outbound_name: outbound_name.into(),
            new_column_definition: ColumnDefinition::default(),
        }
    }

    /// Replace the column currently named `outbound_name` with `definition`.
    pub fn update(
        inbound_name: impl Into<String>,
        outbound_name: impl Into<String>,
        definition: ColumnDefinition,
    ) -> Self {
        Self {
            operation: ColumnOperationKind::Update.as_db_str().to_string(),
            inbound_name: inbound_name.into(),
            outbound_name: outbound_name.into(),
            new_column_definition: definition,
        }
    }

    /// Parsed operation keyword, if recognized.
    pub fn kind(&self) -> Option<ColumnOperationKind> {
        self.operation.parse().ok()
    }
}

// ============================================================================
// MIGRATION
// ============================================================================

/// A proposed change to one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Migration {
    /// Raw table operation keyword (`add`, `remove`, `update`)
    pub table_operation: String,
    /// Target table name
    pub name: String,
    pub column_operations: Vec<ColumnOperation>,
    /// Keys for add; must equal the current keys for update
    pub table_option: TableOption,
}

impl Migration {
    pub fn add_table(
        name: impl Into<String>,
        table_option: TableOption,
        column_operations: Vec<ColumnOperation>,
    ) -> Self {
        Self {
            table_operation: TableOperation::Add.as_db_str().to_string(),
            name: name.into(),
            column_operations,
            table_option,
        }
    }

    pub fn remove_table(name: impl Into<String>) -> Self {
        Self {
            table_operation: TableOperation::Remove.as_db_str().to_string(),
            name: name.into(),
            column_operations: Vec::new(),
            table_option: TableOption::default(),
        }
    }

    pub fn update_table(
        name: impl Into<String>,
        table_option: TableOption,
        column_operations: Vec<ColumnOperation>,
    ) -> Self {
        Self {
            table_operation: TableOperation::Update.as_db_str().to_string(),
            name: name.into(),
            column_operations,
            table_option,
        }
    }

    /// Parsed table operation keyword, if recognized.
    pub fn operation(&self) -> Option<TableOperation> {
        self.table_operation.parse().ok()
    }

    /// Outbound names of the column definitions this migration carries.
    ///
    /// These are the names that end up stored, so key references can be
    /// checked before any column exists. Operation echoes are not included.
    pub fn outbound_column_name_set(&self) -> BTreeSet<&str> {
        self.column_operations
            .iter()
            .map(|op| op.new_column_definition.outbound_name.as_str())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

// ============================================================================
// EVENT (versioned table snapshot)
// ============================================================================

/// The versioned schema of one table.
///
/// A table is either empty (no columns, no keys) or populated (at least one
/// column and a non-empty dist key). Only the migration engine moves a table
/// between versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Event {
    pub event_name: String,
    pub version: u64,
    /// Physical column order
    pub columns: Vec<ColumnDefinition>,
    pub table_option: TableOption,
    /// Last migration applied to reach this version
    pub parent_migration: Option<Migration>,
}

impl Event {
    /// Create an empty table snapshot at `version`.
    pub fn new(event_name: impl Into<String>, version: u64) -> Self {
        Self {
            event_name: event_name.into(),
            version,
            ..Default::default()
        }
    }

    /// True iff the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, outbound_name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.outbound_name == outbound_name)
    }

    pub fn column_position(&self, outbound_name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.outbound_name == outbound_name)
    }

    pub fn outbound_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.outbound_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varchar(name: &str) -> ColumnDefinition {
        ColumnDefinition::new(format!("{}_in", name), name, "varchar", "(30)")
    }

    #[test]
    fn test_new_event_is_empty() {
        let event = Event::new("t", 1);
        assert!(event.is_empty());
        assert!(event.table_option.is_empty());
        assert!(event.parent_migration.is_none());
        assert_eq!(event.version, 1);
    }

    #[test]
    fn test_table_option_is_empty_requires_both_lists_empty() {
        assert!(TableOption::default().is_empty());
        assert!(!TableOption::new(["a"], Vec::<String>::new()).is_empty());
        assert!(!TableOption::new(Vec::<String>::new(), ["b"]).is_empty());
    }

    #[test]
    fn test_key_membership() {
        let option = TableOption::new(["a"], ["b"]);
        assert!(option.is_dist_key("a"));
        assert!(!option.is_dist_key("b"));
        assert!(option.is_sort_key("b"));
    }

    #[test]
    fn test_outbound_column_name_set_uses_definition_names() {
        let mut op = ColumnOperation::add(varchar("c1"));
        op.new_column_definition.outbound_name = "c1_defined".to_string();
        let migration = Migration::add_table(
            "t",
            TableOption::new(["c0"], Vec::<String>::new()),
            vec![ColumnOperation::add(varchar("c0")), op],
        );

        let names = migration.outbound_column_name_set();
        assert!(names.contains("c0"));
        assert!(names.contains("c1_defined"));
        assert!(!names.contains("c1"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_outbound_column_name_set_skips_empty_definition() {
        let migration = Migration::update_table(
            "t",
            TableOption::default(),
            vec![ColumnOperation::remove("in", "gone")],
        );
        assert!(migration.outbound_column_name_set().is_empty());
    }

    #[test]
    fn test_column_lookup() {
        let mut event = Event::new("t", 1);
        event.columns = vec![varchar("a"), varchar("b")];
        assert_eq!(event.column_position("b"), Some(1));
        assert_eq!(event.column("a").map(|c| c.transformer.as_str()), Some("varchar"));
        assert!(event.column("missing").is_none());
        assert_eq!(event.outbound_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_constructors_set_operation_keywords() {
        assert_eq!(Migration::add_table("t", TableOption::default(), vec![]).table_operation, "add");
        assert_eq!(Migration::remove_table("t").table_operation, "remove");
        assert_eq!(ColumnOperation::remove("i", "o").kind(), Some(ColumnOperationKind::Remove));
        assert_eq!(
            ColumnOperation::update("i", "o", varchar("o")).kind(),
            Some(ColumnOperationKind::Update)
        );
    }

    #[test]
    fn test_wire_format_uses_pascal_case() {
        let migration = Migration::add_table(
            "t",
            TableOption::new(["c0"], Vec::<String>::new()),
            vec![ColumnOperation::add(varchar("c0"))],
        );
        let json = serde_json::to_value(&migration).expect("serialize migration");
        assert_eq!(json["TableOperation"], "add");
        assert_eq!(json["TableOption"]["DistKey"][0], "c0");
        assert_eq!(
            json["ColumnOperations"][0]["NewColumnDefinition"]["ColumnCreationOptions"],
            "(30)"
        );
    }

    #[test]
    fn test_missing_fields_default_on_deserialize() {
        let event: Event =
            serde_json::from_str(r#"{"EventName":"t","Version":1}"#).expect("parse event");
        assert_eq!(event, Event::new("t", 1));
    }

    #[test]
    fn test_unknown_operation_keyword_still_deserializes() {
        let migration: Migration =
            serde_json::from_str(r#"{"TableOperation":"drop","Name":"t"}"#).expect("parse");
        assert_eq!(migration.table_operation, "drop");
        assert!(migration.operation().is_none());
    }
}
