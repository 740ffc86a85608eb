// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-memory leaf table
//!
//! [`MemoryTable`] stores its cells column-major and never changes after it
//! is built. Several tables can be views over the same stored columns, each
//! exposing a different set of visible rows (the way a transaction sees a
//! subset of a physical table). Views over the same storage are roots of the
//! same type and share one set of root lock counts.

use std::sync::{Arc, OnceLock};

use crate::core::{Error, Result, Schema, Value};
use crate::storage::raw::RawTableInfo;
use crate::storage::root_lock::RootLocks;
use crate::storage::scheme::{CollatedSearch, Collation};
use crate::storage::traits::{
    LockKey, Origin, RowEnumeration, SchemeRef, Table, TableId, TableRef,
};

/// Column-major cell storage shared by every view of a table
#[derive(Debug)]
struct ColumnStore {
    // root identity of every view over this storage
    id: TableId,
    schema: Schema,
    columns: Vec<Vec<Value>>,
    row_count: usize,
    locks: RootLocks,
}

/// An immutable in-memory table
#[derive(Debug)]
pub struct MemoryTable {
    id: TableId,
    store: Arc<ColumnStore>,
    visible: Option<Arc<[usize]>>,
    schemes: Vec<OnceLock<Arc<Collation>>>,
}

impl MemoryTable {
    /// Start building a table with the given schema
    pub fn builder(schema: Schema) -> MemoryTableBuilder {
        MemoryTableBuilder::new(schema)
    }

    /// Build a table from row-major values
    pub fn from_rows(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Self> {
        rows.into_iter()
            .fold(MemoryTableBuilder::new(schema), |b, row| b.row(row))
            .build()
    }

    fn with_store(store: Arc<ColumnStore>, visible: Option<Arc<[usize]>>) -> Self {
        let schemes = (0..store.columns.len()).map(|_| OnceLock::new()).collect();
        Self {
            id: TableId::next(),
            store,
            visible,
            schemes,
        }
    }

    /// A view of the same storage exposing only `rows`, in that order
    pub fn with_visible_rows(&self, rows: Vec<usize>) -> Result<MemoryTable> {
        if let Some(&bad) = rows.iter().find(|&&r| r >= self.store.row_count) {
            return Err(Error::row_out_of_bounds(bad, self.store.row_count));
        }
        Ok(Self::with_store(self.store.clone(), Some(rows.into())))
    }

    /// Number of stored rows, visible or not
    pub fn physical_row_count(&self) -> usize {
        self.store.row_count
    }

    /// Number of root locks held on the storage
    pub fn root_lock_count(&self) -> usize {
        self.store.locks.count()
    }

    /// Wrap in a shared handle
    pub fn into_ref(self) -> TableRef {
        Arc::new(self)
    }

    fn column_values(&self, column: usize) -> Result<&[Value]> {
        self.store
            .columns
            .get(column)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::column_out_of_bounds(column, self.store.columns.len()))
    }

    fn collation(&self, column: usize) -> Result<Arc<Collation>> {
        let values = self.column_values(column)?;
        let collation = self.schemes[column].get_or_init(|| {
            let entries = self
                .rows()
                .iter()
                .map(|row| (values[row].clone(), row))
                .collect();
            Arc::new(Collation::from_unsorted(entries))
        });
        Ok(collation.clone())
    }
}

impl Table for MemoryTable {
    fn id(&self) -> TableId {
        self.id
    }

    fn schema(&self) -> &Schema {
        &self.store.schema
    }

    fn row_count(&self) -> usize {
        match &self.visible {
            Some(rows) => rows.len(),
            None => self.store.row_count,
        }
    }

    fn rows(&self) -> RowEnumeration {
        match &self.visible {
            Some(rows) => RowEnumeration::Indexed(rows.clone()),
            None => RowEnumeration::Identity(self.store.row_count),
        }
    }

    fn cell(&self, column: usize, row: usize) -> Result<Value> {
        self.column_values(column)?
            .get(row)
            .cloned()
            .ok_or_else(|| Error::row_out_of_bounds(row, self.store.row_count))
    }

    fn scheme(&self, column: usize, _origin: Origin) -> Result<SchemeRef<'_>> {
        let collation = self.collation(column)?;
        Ok(Box::new(CollatedSearch::new(self.id, collation)))
    }

    fn to_ancestor_domain(
        &self,
        _column: usize,
        _rows: &mut [usize],
        ancestor: TableId,
    ) -> Result<()> {
        if ancestor != self.id {
            return Err(Error::IncorrectAncestor);
        }
        Ok(())
    }

    fn resolve_raw_rows(&self, this: &TableRef, rows: &[usize]) -> Result<RawTableInfo> {
        Ok(RawTableInfo::single(this.clone(), rows.to_vec()))
    }

    fn root_identity(&self) -> Option<TableId> {
        Some(self.store.id)
    }

    fn lock_root(&self, key: LockKey) -> Result<()> {
        self.store.locks.lock(key);
        Ok(())
    }

    fn unlock_root(&self, key: LockKey) -> Result<()> {
        self.store.locks.unlock(key, &self.store.schema.table_name)
    }

    fn has_roots_locked(&self) -> bool {
        self.store.locks.is_locked()
    }
}

/// Builder for [`MemoryTable`]
///
/// Rows are validated as they are added; the first invalid row is reported
/// by [`build`](Self::build).
pub struct MemoryTableBuilder {
    schema: Schema,
    columns: Vec<Vec<Value>>,
    row_count: usize,
    error: Option<Error>,
}

impl MemoryTableBuilder {
    pub fn new(schema: Schema) -> Self {
        let columns = vec![Vec::new(); schema.column_count()];
        Self {
            schema,
            columns,
            row_count: 0,
            error: None,
        }
    }

    /// Append a row
    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if self.error.is_none() {
            let values: Vec<Value> = values.into_iter().map(Into::into).collect();
            match self.check_row(values) {
                Ok(values) => {
                    for (column, value) in self.columns.iter_mut().zip(values) {
                        column.push(value);
                    }
                    self.row_count += 1;
                }
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    // Validates a row and gives NULLs the column's type
    fn check_row(&self, values: Vec<Value>) -> Result<Vec<Value>> {
        if values.len() != self.schema.column_count() {
            return Err(Error::table_columns_not_match(
                self.schema.column_count(),
                values.len(),
            ));
        }
        self.schema
            .columns
            .iter()
            .zip(values)
            .map(|(column, value)| {
                if value.is_null() {
                    if !column.nullable {
                        return Err(Error::invariant(format!(
                            "NULL in NOT NULL column {}.{}",
                            column.table, column.name
                        )));
                    }
                    return Ok(Value::null(column.data_type));
                }
                if !value.data_type().is_compatible(&column.data_type) {
                    return Err(Error::incompatible_types(
                        column.data_type.to_string(),
                        value.data_type().to_string(),
                    ));
                }
                Ok(value)
            })
            .collect()
    }

    pub fn build(self) -> Result<MemoryTable> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let store = ColumnStore {
            id: TableId::next(),
            schema: self.schema,
            columns: self.columns,
            row_count: self.row_count,
            locks: RootLocks::new(),
        };
        Ok(MemoryTable::with_store(Arc::new(store), None))
    }
}
