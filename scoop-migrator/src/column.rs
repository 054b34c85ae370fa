//! Column-level operations
//!
//! Each operation mutates the working copy handed down by table-level
//! dispatch. A rejected operation may leave that copy half-modified, which is
//! fine: the table level discards it.

use crate::Migrator;
use scoop_core::{
    varchar_size, ColumnDefinition, ColumnOperation, ColumnOperationKind, ErrorReason, Event,
    MigrationError, MigrationResult, VARCHAR,
};

impl Migrator {
    pub(crate) fn apply_column_operation(
        &self,
        op: &ColumnOperation,
        working: &mut Event,
    ) -> MigrationResult<()> {
        match op.kind() {
            Some(ColumnOperationKind::Add) => self.add_column(op, working),
            Some(ColumnOperationKind::Remove) => self.remove_column(op, working),
            Some(ColumnOperationKind::Update) => self.update_column(op, working),
            None => Err(reject(op, ErrorReason::InvalidColumnOperation)),
        }
    }

    /// Append the operation's column definition.
    ///
    /// Both the operation's outbound name and the definition's outbound name
    /// must be valid identifiers that no existing column already uses.
    pub fn add_column(&self, op: &ColumnOperation, working: &mut Event) -> MigrationResult<()> {
        if op.kind() != Some(ColumnOperationKind::Add) {
            return Err(reject(op, ErrorReason::ColumnOpNotAdd));
        }

        let definition = &op.new_column_definition;
        self.check_definition(definition)
            .map_err(|reason| reject(op, reason))?;

        if !self.config().is_valid_identifier(&op.outbound_name)
            || !self.config().is_valid_identifier(&definition.outbound_name)
        {
            return Err(reject(op, ErrorReason::InvalidIdentifier));
        }

        if working.column(&op.outbound_name).is_some()
            || working.column(&definition.outbound_name).is_some()
        {
            return Err(reject(op, ErrorReason::OutboundNameCollision));
        }

        working.columns.push(definition.clone());
        Ok(())
    }

    /// Drop the column named by the operation's outbound name.
    pub fn remove_column(&self, op: &ColumnOperation, working: &mut Event) -> MigrationResult<()> {
        if op.kind() != Some(ColumnOperationKind::Remove) {
            return Err(reject(op, ErrorReason::ColumnOpNotRemove));
        }

        let index = working
            .column_position(&op.outbound_name)
            .ok_or_else(|| reject(op, ErrorReason::RemoveColNonExistingCol))?;

        if working.table_option.is_dist_key(&op.outbound_name) {
            return Err(reject(op, ErrorReason::RemoveColIsDistKey));
        }

        working.columns.remove(index);
        Ok(())
    }

    /// Replace the column named by the operation's outbound name in place.
    ///
    /// The replacement may rename the column, as long as the new name is not
    /// taken by a different column.
    pub fn update_column(&self, op: &ColumnOperation, working: &mut Event) -> MigrationResult<()> {
        if op.kind() != Some(ColumnOperationKind::Update) {
            return Err(reject(op, ErrorReason::ColumnOpNotUpdate));
        }

        let definition = &op.new_column_definition;
        self.check_definition(definition)
            .map_err(|reason| reject(op, reason))?;

        if !self.config().is_valid_identifier(&definition.outbound_name) {
            return Err(reject(op, ErrorReason::InvalidIdentifier));
        }

        if working.table_option.is_dist_key(&op.outbound_name) {
            return Err(reject(op, ErrorReason::UpdateColIsDistKey));
        }

        let index = working
            .column_position(&op.outbound_name)
            .ok_or_else(|| reject(op, ErrorReason::UpdateColNonExistingCol))?;

        if definition.outbound_name != op.outbound_name
            && working
                .columns
                .iter()
                .enumerate()
                .any(|(i, c)| i != index && c.outbound_name == definition.outbound_name)
        {
            return Err(reject(op, ErrorReason::OutboundNameCollision));
        }

        working.columns[index] = definition.clone();
        Ok(())
    }

    /// Transformer allow-list and varchar size checks shared by add and update.
    fn check_definition(&self, definition: &ColumnDefinition) -> Result<(), ErrorReason> {
        if !self.config().transformers.contains(&definition.transformer) {
            return Err(ErrorReason::InvalidTransformer);
        }

        if definition.transformer == VARCHAR {
            let size = varchar_size(&definition.column_creation_options)
                .ok_or(ErrorReason::VarCharNotInt)?;
            if size > self.config().max_varchar_bytes {
                return Err(ErrorReason::VarCharBytesMax);
            }
        }

        Ok(())
    }
}

/// Column error naming the operation's target, falling back to the
/// definition's name for add operations that leave the echo blank.
fn reject(op: &ColumnOperation, reason: ErrorReason) -> MigrationError {
    let column = if op.outbound_name.is_empty() {
        &op.new_column_definition.outbound_name
    } else {
        &op.outbound_name
    };
    MigrationError::column(reason, column.as_str())
}
