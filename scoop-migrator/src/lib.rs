//! Scoop Migrator - Schema Migration Engine
//!
//! Turns a table's current [`Event`] plus a proposed [`Migration`] into the
//! next versioned snapshot, or rejects the migration with a reason from the
//! error catalog.
//!
//! The engine performs no I/O and never mutates its inputs: every migration
//! runs against an owned working copy that is only returned once every check
//! has passed. Callers that race migrations against the same table must
//! serialize them.

mod column;

use scoop_core::{
    ErrorReason, Event, Migration, MigrationError, MigrationResult, MigratorConfig, ScoopResult,
    TableOperation,
};

// ============================================================================
// MIGRATOR
// ============================================================================

/// Migration engine bound to one immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct Migrator {
    config: MigratorConfig,
}

impl Migrator {
    /// Create a migrator with the given configuration.
    pub fn new(config: MigratorConfig) -> ScoopResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &MigratorConfig {
        &self.config
    }
}

// ============================================================================
// TABLE-LEVEL DISPATCH
// ============================================================================

impl Migrator {
    /// Apply `migration` to `event`, returning the next snapshot.
    ///
    /// On success the returned event has its version incremented by one and
    /// records `migration` as its parent. On failure `event` is untouched and
    /// the error names the first violated rule.
    pub fn apply_migration(&self, migration: &Migration, event: &Event) -> MigrationResult<Event> {
        tracing::debug!(
            table = %migration.name,
            operation = %migration.table_operation,
            version = event.version,
            column_operations = migration.column_operations.len(),
            "Applying migration"
        );

        let next = match migration.operation() {
            Some(TableOperation::Add) => self.add_table(migration, event)?,
            Some(TableOperation::Remove) => self.remove_table(migration, event)?,
            Some(TableOperation::Update) => self.update_table(migration, event)?,
            None => return Err(MigrationError::table(ErrorReason::InvalidTableOperation)),
        };

        tracing::debug!(table = %migration.name, version = next.version, "Migration applied");
        Ok(next)
    }

    /// Run every check `apply_migration` runs and discard the result.
    pub fn validate_migration(&self, migration: &Migration, event: &Event) -> MigrationResult<()> {
        self.apply_migration(migration, event).map(|_| ())
    }

    fn add_table(&self, migration: &Migration, event: &Event) -> MigrationResult<Event> {
        if !event.is_empty() {
            return Err(MigrationError::table(ErrorReason::AddTableOnExistingTable));
        }

        let option = &migration.table_option;
        if option.dist_key.is_empty() {
            return Err(MigrationError::table(ErrorReason::MustContainDistKey));
        }

        // Keys must point at columns this migration creates
        let names = migration.outbound_column_name_set();
        if option.dist_key.iter().any(|k| !names.contains(k.as_str())) {
            return Err(MigrationError::table(ErrorReason::DistKeyNotInCols));
        }
        if option.sort_key.iter().any(|k| !names.contains(k.as_str())) {
            return Err(MigrationError::table(ErrorReason::SortKeyNotInCols));
        }

        if !self.config.is_valid_identifier(&migration.name) {
            return Err(MigrationError::table(ErrorReason::InvalidIdentifier));
        }

        if migration.column_operations.len() > self.config.max_columns {
            return Err(MigrationError::table(ErrorReason::TooManyColumns));
        }

        let mut working = event.clone();
        for op in &migration.column_operations {
            self.add_column(op, &mut working)?;
        }
        working.table_option = option.clone();

        commit(working, migration)
    }

    fn remove_table(&self, migration: &Migration, event: &Event) -> MigrationResult<Event> {
        if event.is_empty() {
            return Err(MigrationError::table(
                ErrorReason::RemoveTableOnNonExistingTable,
            ));
        }

        let mut working = event.clone();
        working.columns.clear();
        working.table_option = Default::default();

        commit(working, migration)
    }

    fn update_table(&self, migration: &Migration, event: &Event) -> MigrationResult<Event> {
        if event.is_empty() {
            return Err(MigrationError::table(
                ErrorReason::UpdateTableOnNonExistingTable,
            ));
        }

        // Keys are fixed at creation
        if migration.table_option != event.table_option {
            return Err(MigrationError::table(ErrorReason::DifferentTableOptions));
        }

        let mut working = event.clone();
        for op in &migration.column_operations {
            self.apply_column_operation(op, &mut working)?;
        }

        if working.columns.len() > self.config.max_columns {
            return Err(MigrationError::table(ErrorReason::TooManyColumns));
        }

        // Unreachable for snapshots this engine produced; keys cannot change on update.
        if working.table_option.dist_key.is_empty() {
            return Err(MigrationError::table(ErrorReason::MustContainDistKey));
        }

        commit(working, migration)
    }
}

/// Stamp a fully validated working copy as the next version.
fn commit(mut working: Event, migration: &Migration) -> MigrationResult<Event> {
    working.version = working
        .version
        .checked_add(1)
        .ok_or_else(|| MigrationError::table(ErrorReason::VersionOverflow))?;
    working.parent_migration = Some(migration.clone());
    Ok(working)
}
