//! Scoop Test Utilities
//!
//! Shared test infrastructure for the scoop workspace:
//! - Proptest generators for schema model types
//! - Fixtures for a populated and an empty table plus one migration per
//!   table operation
//! - Assertions on migration errors and snapshot versions
//! - Tracing setup for tests that want log output

// Re-export mock storage from its source crate
pub use scoop_storage::MockSchemaStore;

// Re-export core types for convenience
pub use scoop_core::{
    ColumnDefinition, ColumnOperation, ErrorKind, ErrorReason, Event, Migration, MigrationError,
    MigrationResult, MigratorConfig, ScoopError, ScoopResult, TableOption, STANDARD_TRANSFORMERS,
    VARCHAR,
};

use std::sync::Once;

// ============================================================================
// TRACING
// ============================================================================

static TRACING: Once = Once::new();

/// Install a fmt subscriber filtered by `RUST_LOG`, once per process.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating schema model types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a name that passes both identifier policies.
    pub fn arb_identifier() -> impl Strategy<Value = String> {
        "[a-z_][a-z0-9_]{0,30}"
    }

    /// Generate a transformer from the standard allow-list.
    pub fn arb_transformer() -> impl Strategy<Value = &'static str> {
        prop::sample::select(STANDARD_TRANSFORMERS.to_vec())
    }

    /// Generate a column definition with a standard transformer.
    ///
    /// Varchar columns get a size within the default ceiling.
    pub fn arb_column_definition() -> impl Strategy<Value = ColumnDefinition> {
        (arb_identifier(), arb_identifier(), arb_transformer(), 1u64..=65535).prop_map(
            |(inbound, outbound, transformer, size)| {
                let options = if transformer == VARCHAR {
                    format!("({})", size)
                } else {
                    String::new()
                };
                ColumnDefinition::new(inbound, outbound, transformer, options)
            },
        )
    }

    /// Generate an add-table migration with 1 to `max_columns` uniquely named
    /// columns, keyed on its first column.
    pub fn arb_add_table_migration(max_columns: usize) -> impl Strategy<Value = Migration> {
        (
            arb_identifier(),
            prop::collection::vec(arb_column_definition(), 1..=max_columns.max(1)),
        )
            .prop_map(|(name, definitions)| {
                let ops: Vec<ColumnOperation> = definitions
                    .into_iter()
                    .enumerate()
                    .map(|(i, mut definition)| {
                        // Suffix keeps outbound names unique
                        definition.outbound_name = format!("{}_{}", definition.outbound_name, i);
                        ColumnOperation::add(definition)
                    })
                    .collect();
                let dist_key = ops[0].outbound_name.clone();
                Migration::add_table(name, TableOption::new([dist_key], Vec::<String>::new()), ops)
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built tables and migrations for common scenarios.

    use super::*;

    fn varchar_500(inbound: &str, outbound: &str) -> ColumnDefinition {
        ColumnDefinition::new(inbound, outbound, "varchar", "(500)")
    }

    fn add_op(n: usize) -> ColumnOperation {
        ColumnOperation::add(varchar_500(
            &format!("test_event_1_new_inbound_col_{}", n),
            &format!("test_event_1_new_outbound_col_{}", n),
        ))
    }

    /// Table `test_event_1` at version 1 with five varchar(500) columns,
    /// distributed on its first column.
    pub fn event_test_1() -> Event {
        let mut event = Event::new("test_event_1", 1);
        event.table_option = TableOption::new(["test_event_1_outbound_col_1"], Vec::<String>::new());
        event.columns = (1..=5)
            .map(|n| {
                varchar_500(
                    &format!("test_event_1_inbound_col_{}", n),
                    &format!("test_event_1_outbound_col_{}", n),
                )
            })
            .collect();
        event
    }

    /// Table `test_event_1` at version 1 that has never been created.
    pub fn event_test_1_empty() -> Event {
        Event::new("test_event_1", 1)
    }

    /// Create `test_event_1` with four columns.
    ///
    /// The fourth operation's echoed names differ from its definition's.
    pub fn migration_add_on_event_1() -> Migration {
        let mut ops: Vec<ColumnOperation> = (1..=3).map(add_op).collect();
        let mut fourth = add_op(4);
        fourth.new_column_definition =
            varchar_500("test_event_4_new_inbound_col_4", "test_event_4_new_outbound_col_4");
        ops.push(fourth);

        Migration::add_table(
            "test_event_1",
            TableOption::new(["test_event_1_new_outbound_col_1"], Vec::<String>::new()),
            ops,
        )
    }

    /// Drop `test_event_1`.
    pub fn migration_remove_on_event_1() -> Migration {
        Migration::remove_table("test_event_1")
    }

    /// Add one column, rename column 2 and drop column 3 of `test_event_1`.
    pub fn migration_update_on_event_1() -> Migration {
        let ops = vec![
            add_op(1),
            ColumnOperation::update(
                "test_event_1_inbound_col_2",
                "test_event_1_outbound_col_2",
                varchar_500(
                    "test_event_1_new_inbound_col_2_updated",
                    "test_event_1_new_outbound_col_2_updated",
                ),
            ),
            ColumnOperation::remove("test_event_1_inbound_col_3", "test_event_1_outbound_col_3"),
        ];

        Migration::update_table(
            "test_event_1",
            TableOption::new(["test_event_1_outbound_col_1"], Vec::<String>::new()),
            ops,
        )
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions on migration outcomes.

    use super::*;

    /// Assert that a migration failed with a table-level error for `reason`.
    #[track_caller]
    pub fn assert_table_error<T: std::fmt::Debug>(result: &MigrationResult<T>, reason: ErrorReason) {
        match result {
            Err(MigrationError::Table { reason: got }) => {
                assert_eq!(*got, reason, "Wrong reason in table error");
            }
            other => panic!("Expected table error {}, got: {:?}", reason.code(), other),
        }
    }

    /// Assert that a migration failed with a column-level error for `reason`.
    #[track_caller]
    pub fn assert_column_error<T: std::fmt::Debug>(
        result: &MigrationResult<T>,
        reason: ErrorReason,
    ) {
        match result {
            Err(MigrationError::Column { reason: got, .. }) => {
                assert_eq!(*got, reason, "Wrong reason in column error");
            }
            other => panic!("Expected column error {}, got: {:?}", reason.code(), other),
        }
    }

    /// Assert that `next` is exactly one version past `previous`.
    #[track_caller]
    pub fn assert_version(previous: &Event, next: &Event) {
        assert_eq!(
            next.version,
            previous.version + 1,
            "Expected version {} after {}, got {}",
            previous.version + 1,
            previous.version,
            next.version
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
