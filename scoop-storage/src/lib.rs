//! Scoop Storage - Schema Store Trait and Mock Implementation
//!
//! Defines the persistence seam for table snapshots and the runner that
//! glues a store to the migration engine. No remote backend lives here;
//! [`MockSchemaStore`] backs tests and local wiring.

mod runner;

pub use runner::MigrationRunner;

use scoop_core::{Event, ScoopError, ScoopResult, StorageError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// ============================================================================
// SCHEMA STORE TRAIT
// ============================================================================

/// Persistence for the latest snapshot of each table.
pub trait SchemaStore: Send + Sync {
    /// Names of every stored table.
    fn list_tables(&self) -> ScoopResult<Vec<String>>;

    /// Latest snapshot for `name`, if one was ever stored.
    fn get_schema(&self, name: &str) -> ScoopResult<Option<Event>>;

    /// Whether a snapshot for `name` is stored.
    fn exists(&self, name: &str) -> ScoopResult<bool>;

    /// Store `event` as the latest snapshot of its table.
    fn update_table(&self, event: &Event) -> ScoopResult<()>;

    /// Latest snapshot for `name`, failing with `NotFound` when absent.
    fn require_schema(&self, name: &str) -> ScoopResult<Event> {
        self.get_schema(name)?.ok_or_else(|| {
            ScoopError::Storage(StorageError::NotFound {
                table: name.to_string(),
            })
        })
    }
}

// ============================================================================
// MOCK STORAGE
// ============================================================================

/// In-memory schema store keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct MockSchemaStore {
    tables: Arc<RwLock<HashMap<String, Event>>>,
}

impl MockSchemaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `events`, bypassing version checks.
    pub fn with_tables(events: impl IntoIterator<Item = Event>) -> Self {
        let tables = events
            .into_iter()
            .map(|e| (e.event_name.clone(), e))
            .collect();
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Number of stored tables.
    pub fn table_count(&self) -> ScoopResult<usize> {
        Ok(self
            .tables
            .read()
            .map_err(|_| ScoopError::Storage(StorageError::LockPoisoned))?
            .len())
    }

    /// Clear all stored data.
    pub fn clear(&self) -> ScoopResult<()> {
        self.tables
            .write()
            .map_err(|_| ScoopError::Storage(StorageError::LockPoisoned))?
            .clear();
        Ok(())
    }
}

impl SchemaStore for MockSchemaStore {
    fn list_tables(&self) -> ScoopResult<Vec<String>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| ScoopError::Storage(StorageError::LockPoisoned))?;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn get_schema(&self, name: &str) -> ScoopResult<Option<Event>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| ScoopError::Storage(StorageError::LockPoisoned))?;
        Ok(tables.get(name).cloned())
    }

    fn exists(&self, name: &str) -> ScoopResult<bool> {
        let tables = self
            .tables
            .read()
            .map_err(|_| ScoopError::Storage(StorageError::LockPoisoned))?;
        Ok(tables.contains_key(name))
    }

    fn update_table(&self, event: &Event) -> ScoopResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| ScoopError::Storage(StorageError::LockPoisoned))?;

        if let Some(stored) = tables.get(&event.event_name) {
            if event.version <= stored.version {
                return Err(ScoopError::Storage(StorageError::StaleVersion {
                    table: event.event_name.clone(),
                    stored: stored.version,
                    attempted: event.version,
                }));
            }
        }

        tables.insert(event.event_name.clone(), event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoop_core::{ColumnDefinition, TableOption};

    fn make_test_event(name: &str, version: u64) -> Event {
        let mut event = Event::new(name, version);
        event.columns = vec![ColumnDefinition::new("a", "a", "int", "")];
        event.table_option = TableOption::new(["a"], Vec::<String>::new());
        event
    }

    #[test]
    fn test_update_and_get() {
        let store = MockSchemaStore::new();
        let event = make_test_event("t", 2);

        store.update_table(&event).expect("update");

        assert_eq!(store.get_schema("t").expect("get"), Some(event));
        assert!(store.exists("t").expect("exists"));
        assert!(!store.exists("u").expect("exists"));
        assert_eq!(store.table_count().expect("count"), 1);
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = MockSchemaStore::new();
        assert_eq!(store.get_schema("missing").expect("get"), None);
    }

    #[test]
    fn test_require_schema_missing_is_not_found() {
        let store = MockSchemaStore::new();
        assert_eq!(
            store.require_schema("missing"),
            Err(ScoopError::Storage(StorageError::NotFound {
                table: "missing".to_string()
            }))
        );
    }

    #[test]
    fn test_list_tables_is_sorted() {
        let store = MockSchemaStore::with_tables([
            make_test_event("b", 1),
            make_test_event("a", 1),
            make_test_event("c", 1),
        ]);
        assert_eq!(store.list_tables().expect("list"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_update_rejects_stale_version() {
        let store = MockSchemaStore::with_tables([make_test_event("t", 3)]);

        for attempted in [2, 3] {
            let result = store.update_table(&make_test_event("t", attempted));
            assert_eq!(
                result,
                Err(ScoopError::Storage(StorageError::StaleVersion {
                    table: "t".to_string(),
                    stored: 3,
                    attempted,
                }))
            );
        }

        assert!(store.update_table(&make_test_event("t", 4)).is_ok());
        assert_eq!(store.require_schema("t").expect("get").version, 4);
    }

    #[test]
    fn test_clones_share_state() {
        let store = MockSchemaStore::new();
        let other = store.clone();
        store.update_table(&make_test_event("t", 1)).expect("update");
        assert!(other.exists("t").expect("exists"));

        other.clear().expect("clear");
        assert_eq!(store.table_count().expect("count"), 0);
    }

    #[test]
    fn test_poisoned_lock_surfaces_as_storage_error() {
        let store = MockSchemaStore::new();
        let tables = Arc::clone(&store.tables);
        let _ = std::thread::spawn(move || {
            let _guard = tables.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(
            store.get_schema("t"),
            Err(ScoopError::Storage(StorageError::LockPoisoned))
        );
        assert_eq!(
            store.update_table(&make_test_event("t", 1)),
            Err(ScoopError::Storage(StorageError::LockPoisoned))
        );
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
