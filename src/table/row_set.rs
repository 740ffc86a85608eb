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

//! RowSetTable - a derived table given by explicit row index sequences
//!
//! The table holds, per source, one sequence of the source's physical rows.
//! Row `n` of the table is the tuple formed by entry `n` of every sequence.
//! Selections, IN results and flattened raw tables are all expressed this
//! way; no cell is ever copied.

use std::sync::{Arc, OnceLock};

use crate::core::{Error, Result, Schema, Value};
use crate::storage::raw::RawTableInfo;
use crate::storage::root_lock::RootLocks;
use crate::storage::scheme::Collation;
use crate::storage::traits::{LockKey, Origin, SchemeRef, Table, TableId, TableRef};

use super::joined::{self, check_source, ColumnRouting, JoinedTable};

/// A table made of explicit row sequences over its sources
#[derive(Debug)]
pub struct RowSetTable {
    id: TableId,
    schema: Schema,
    sources: Vec<TableRef>,
    routing: ColumnRouting,
    rows: Vec<Vec<usize>>,
    row_count: usize,
    schemes: Vec<OnceLock<Arc<Collation>>>,
    locks: RootLocks,
}

impl RowSetTable {
    /// Start building a table over `sources`
    pub fn builder(sources: Vec<TableRef>) -> RowSetTableBuilder {
        RowSetTableBuilder::new(sources)
    }

    /// A single-source table exposing `rows` of `source`
    pub fn from_selection(source: TableRef, rows: Vec<usize>) -> Self {
        Self::assemble(vec![source], vec![rows])
    }

    /// A table over the roots of a raw decomposition
    pub fn from_raw(info: RawTableInfo) -> Result<Self> {
        let (sources, rows): (Vec<_>, Vec<_>) =
            info.into_entries().map(|e| (e.table, e.rows)).unzip();
        RowSetTableBuilder::new(sources).set_all(rows)?.build()
    }

    // Callers guarantee every sequence has the same length
    fn assemble(sources: Vec<TableRef>, rows: Vec<Vec<usize>>) -> Self {
        let schema = Schema::joined(sources.iter().map(|s| s.schema()));
        let routing = ColumnRouting::new(&sources);
        let row_count = rows.first().map_or(0, Vec::len);
        Self {
            id: TableId::next(),
            schemes: joined::new_scheme_cache(routing.column_count()),
            schema,
            sources,
            routing,
            rows,
            row_count,
            locks: RootLocks::new(),
        }
    }

    /// Row sequence of each source
    pub fn row_index_map(&self) -> &[Vec<usize>] {
        &self.rows
    }
}

impl JoinedTable for RowSetTable {
    fn sources(&self) -> &[TableRef] {
        &self.sources
    }

    fn routing(&self) -> &ColumnRouting {
        &self.routing
    }

    fn resolve_row_for_table(&self, row: usize, source: usize) -> Result<usize> {
        check_source(source, self.sources.len())?;
        self.rows[source]
            .get(row)
            .copied()
            .ok_or_else(|| Error::row_out_of_bounds(row, self.row_count))
    }

    fn resolve_all_rows_for_table(&self, rows: &mut [usize], source: usize) -> Result<()> {
        check_source(source, self.sources.len())?;
        let map = &self.rows[source];
        for row in rows.iter_mut() {
            *row = *map
                .get(*row)
                .ok_or_else(|| Error::row_out_of_bounds(*row, self.row_count))?;
        }
        Ok(())
    }
}

impl Table for RowSetTable {
    fn id(&self) -> TableId {
        self.id
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn cell(&self, column: usize, row: usize) -> Result<Value> {
        joined::cell(self, column, row)
    }

    fn scheme(&self, column: usize, origin: Origin) -> Result<SchemeRef<'_>> {
        joined::scheme(self, &self.schemes, column, origin)
    }

    fn to_ancestor_domain(
        &self,
        column: usize,
        rows: &mut [usize],
        ancestor: TableId,
    ) -> Result<()> {
        joined::to_ancestor_domain(self, column, rows, ancestor)
    }

    fn resolve_raw_rows(&self, _this: &TableRef, rows: &[usize]) -> Result<RawTableInfo> {
        joined::resolve_raw_rows(self, rows)
    }

    fn lock_root(&self, key: LockKey) -> Result<()> {
        joined::lock_root(&self.sources, &self.locks, key)
    }

    fn unlock_root(&self, key: LockKey) -> Result<()> {
        joined::unlock_root(self.id, &self.sources, &self.locks, key)
    }

    fn has_roots_locked(&self) -> bool {
        self.locks.is_locked()
    }
}

/// Builder for [`RowSetTable`]
///
/// Each source's sequence is installed once; the table exists only after
/// every sequence is in place and the lengths agree.
#[derive(Debug)]
pub struct RowSetTableBuilder {
    sources: Vec<TableRef>,
    rows: Vec<Option<Vec<usize>>>,
}

impl RowSetTableBuilder {
    pub fn new(sources: Vec<TableRef>) -> Self {
        let rows = vec![None; sources.len()];
        Self { sources, rows }
    }

    /// Install the row sequence of one source
    pub fn set(mut self, source: usize, rows: Vec<usize>) -> Result<Self> {
        check_source(source, self.sources.len())?;
        if self.rows[source].is_some() {
            return Err(Error::invariant(format!(
                "rows of source {} are already set",
                source
            )));
        }
        self.rows[source] = Some(rows);
        Ok(self)
    }

    /// Install the row sequences of every source at once
    pub fn set_all(mut self, rows: Vec<Vec<usize>>) -> Result<Self> {
        if rows.len() != self.sources.len() {
            return Err(Error::invariant(format!(
                "{} row sequences given for {} sources",
                rows.len(),
                self.sources.len()
            )));
        }
        for (source, sequence) in rows.into_iter().enumerate() {
            self = self.set(source, sequence)?;
        }
        Ok(self)
    }

    pub fn build(self) -> Result<RowSetTable> {
        let row_count = self.rows.iter().flatten().next().map_or(0, Vec::len);
        let rows: Vec<Vec<usize>> = self.rows.into_iter().map(Option::unwrap_or_default).collect();
        if let Some(bad) = rows.iter().find(|r| r.len() != row_count) {
            return Err(Error::row_count_mismatch(row_count, bad.len()));
        }
        Ok(RowSetTable::assemble(self.sources, rows))
    }
}
