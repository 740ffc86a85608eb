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

//! Column projection tables
//!
//! Both tables here expose the rows of a single parent unchanged and only
//! alter the columns: [`ReferenceTable`] re-qualifies every column under a
//! new table name (`FROM t AS x`), [`SubsetColumnTable`] picks and aliases
//! columns (`SELECT b AS y, a`). Both are roots: raw decomposition stops at
//! them so the names they introduce survive.

use crate::core::{ColumnName, Error, Result, Schema, Value};
use crate::storage::raw::RawTableInfo;
use crate::storage::root_lock::RootLocks;
use crate::storage::traits::{
    LockKey, Origin, RowEnumeration, SchemeRef, Table, TableId, TableRef,
};

/// A parent table under another name
#[derive(Debug)]
pub struct ReferenceTable {
    id: TableId,
    schema: Schema,
    parent: TableRef,
    locks: RootLocks,
}

impl ReferenceTable {
    pub fn new(parent: TableRef, name: impl Into<String>) -> Self {
        Self {
            id: TableId::next(),
            schema: parent.schema().renamed(name),
            parent,
            locks: RootLocks::new(),
        }
    }

    pub fn parent(&self) -> &TableRef {
        &self.parent
    }
}

impl Table for ReferenceTable {
    fn id(&self) -> TableId {
        self.id
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn row_count(&self) -> usize {
        self.parent.row_count()
    }

    fn rows(&self) -> RowEnumeration {
        self.parent.rows()
    }

    fn cell(&self, column: usize, row: usize) -> Result<Value> {
        self.parent.cell(column, row)
    }

    fn scheme(&self, column: usize, origin: Origin) -> Result<SchemeRef<'_>> {
        self.parent.scheme(column, origin)
    }

    fn to_ancestor_domain(
        &self,
        column: usize,
        rows: &mut [usize],
        ancestor: TableId,
    ) -> Result<()> {
        if ancestor == self.id {
            return Ok(());
        }
        self.parent.to_ancestor_domain(column, rows, ancestor)
    }

    fn resolve_raw_rows(&self, this: &TableRef, rows: &[usize]) -> Result<RawTableInfo> {
        Ok(RawTableInfo::single(this.clone(), rows.to_vec()))
    }

    fn root_identity(&self) -> Option<TableId> {
        Some(self.id)
    }

    fn lock_root(&self, key: LockKey) -> Result<()> {
        self.parent.lock_root(key)?;
        self.locks.lock(key);
        Ok(())
    }

    fn unlock_root(&self, key: LockKey) -> Result<()> {
        self.locks.unlock(key, &self.schema.table_name)?;
        self.parent.unlock_root(key)
    }

    fn has_roots_locked(&self) -> bool {
        self.locks.is_locked()
    }
}

/// A chosen, aliased subset of a parent's columns
#[derive(Debug)]
pub struct SubsetColumnTable {
    id: TableId,
    schema: Schema,
    parent: TableRef,
    // exposed column -> parent column
    column_map: Vec<usize>,
    // parent column -> first exposed column showing it
    reverse_column_map: Vec<Option<usize>>,
    locks: RootLocks,
}

impl SubsetColumnTable {
    /// Expose parent columns `column_map[i]` as `aliases[i]`
    pub fn new(parent: TableRef, column_map: Vec<usize>, aliases: Vec<ColumnName>) -> Result<Self> {
        let schema = parent.schema().subset(&column_map, &aliases)?;
        let mut reverse_column_map = vec![None; parent.column_count()];
        for (exposed, &source) in column_map.iter().enumerate() {
            reverse_column_map[source].get_or_insert(exposed);
        }
        Ok(Self {
            id: TableId::next(),
            schema,
            parent,
            column_map,
            reverse_column_map,
            locks: RootLocks::new(),
        })
    }

    pub fn parent(&self) -> &TableRef {
        &self.parent
    }

    pub fn column_map(&self) -> &[usize] {
        &self.column_map
    }

    /// Exposed column showing parent column `parent_column`, if any
    pub fn local_column(&self, parent_column: usize) -> Option<usize> {
        self.reverse_column_map.get(parent_column).copied().flatten()
    }

    fn parent_column(&self, column: usize) -> Result<usize> {
        self.column_map
            .get(column)
            .copied()
            .ok_or_else(|| Error::column_out_of_bounds(column, self.column_map.len()))
    }
}

impl Table for SubsetColumnTable {
    fn id(&self) -> TableId {
        self.id
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn row_count(&self) -> usize {
        self.parent.row_count()
    }

    fn rows(&self) -> RowEnumeration {
        self.parent.rows()
    }

    fn cell(&self, column: usize, row: usize) -> Result<Value> {
        self.parent.cell(self.parent_column(column)?, row)
    }

    fn scheme(&self, column: usize, origin: Origin) -> Result<SchemeRef<'_>> {
        self.parent.scheme(self.parent_column(column)?, origin)
    }

    fn to_ancestor_domain(
        &self,
        column: usize,
        rows: &mut [usize],
        ancestor: TableId,
    ) -> Result<()> {
        if ancestor == self.id {
            return Ok(());
        }
        self.parent
            .to_ancestor_domain(self.parent_column(column)?, rows, ancestor)
    }

    fn resolve_raw_rows(&self, this: &TableRef, rows: &[usize]) -> Result<RawTableInfo> {
        Ok(RawTableInfo::single(this.clone(), rows.to_vec()))
    }

    fn root_identity(&self) -> Option<TableId> {
        Some(self.id)
    }

    fn lock_root(&self, key: LockKey) -> Result<()> {
        self.parent.lock_root(key)?;
        self.locks.lock(key);
        Ok(())
    }

    fn unlock_root(&self, key: LockKey) -> Result<()> {
        self.locks.unlock(key, &self.schema.table_name)?;
        self.parent.unlock_root(key)
    }

    fn has_roots_locked(&self) -> bool {
        self.locks.is_locked()
    }

    /// Aliases first, then the parent's names for columns this table shows
    fn find_field_name(&self, name: &ColumnName) -> Option<usize> {
        self.schema.find_column(name).or_else(|| {
            self.parent
                .find_field_name(name)
                .and_then(|parent_column| self.local_column(parent_column))
        })
    }
}
