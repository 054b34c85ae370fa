//! Load, migrate and persist in one call

use crate::SchemaStore;
use scoop_core::{Event, Migration, ScoopResult};
use scoop_migrator::Migrator;

/// Applies migrations to the snapshots held by a [`SchemaStore`].
///
/// The runner takes no locks. Two callers migrating the same table at once
/// race; the store's version check rejects the loser's write.
#[derive(Debug)]
pub struct MigrationRunner<S: SchemaStore> {
    store: S,
    migrator: Migrator,
}

impl<S: SchemaStore> MigrationRunner<S> {
    pub fn new(store: S, migrator: Migrator) -> Self {
        Self { store, migrator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn migrator(&self) -> &Migrator {
        &self.migrator
    }

    /// Current snapshot for `name`, or a fresh empty table at the configured
    /// initial version.
    pub fn current(&self, name: &str) -> ScoopResult<Event> {
        Ok(self
            .store
            .get_schema(name)?
            .unwrap_or_else(|| Event::new(name, self.migrator.config().initial_version)))
    }

    /// Apply `migration` to the table it names and persist the result.
    pub fn run(&self, migration: &Migration) -> ScoopResult<Event> {
        let current = self.current(&migration.name)?;

        let next = match self.migrator.apply_migration(migration, &current) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(
                    table = %migration.name,
                    version = current.version,
                    reason = e.reason().code(),
                    error = %e,
                    "Migration rejected"
                );
                return Err(e.into());
            }
        };

        self.store.update_table(&next)?;
        tracing::info!(
            table = %next.event_name,
            version = next.version,
            columns = next.columns.len(),
            "Schema persisted"
        );

        Ok(next)
    }

    /// Check `migration` against the stored snapshot without persisting.
    pub fn dry_run(&self, migration: &Migration) -> ScoopResult<()> {
        let current = self.current(&migration.name)?;
        self.migrator.validate_migration(migration, &current)?;
        Ok(())
    }
}
