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

//! OuterTable - a joined table extended with null-padded rows
//!
//! The table starts from a base of matched rows (the inner part of an outer
//! join). Each `merge_in` appends a segment of rows from a table over some
//! of the same sources, typically the preserved side's unmatched rows.
//! Sources missing from a segment read as typed NULLs for its rows:
//!
//! ```text
//!            left   right
//! base       3      0        matched pairs
//!            5      2
//! segment    1      NULL     left rows without a match
//! ```
//!
//! An outer table is a root: tables derived from it flatten to its rows, so
//! it can serve as the base of a further outer join.

use crate::core::{Error, Result, Schema, Value};
use crate::storage::raw::RawTableInfo;
use crate::storage::root_lock::RootLocks;
use crate::storage::scheme::BlindSearch;
use crate::storage::traits::{
    resolve_raw, LockKey, Origin, SchemeRef, Table, TableId, TableRef,
};

use super::joined::{self, check_source, ColumnRouting};

// Rows appended by one merge; `None` marks a source that is all NULL
#[derive(Debug, Clone)]
struct OuterSegment {
    rows: Vec<Option<Vec<usize>>>,
    count: usize,
}

/// A base row set plus null-extended segments
#[derive(Debug)]
pub struct OuterTable {
    id: TableId,
    schema: Schema,
    sources: Vec<TableRef>,
    routing: ColumnRouting,
    base: Vec<Vec<usize>>,
    base_count: usize,
    segments: Vec<OuterSegment>,
    row_count: usize,
    locks: RootLocks,
}

impl OuterTable {
    /// Start an outer table whose base is every row of `base`
    ///
    /// The base is flattened to its root tables, which become the sources
    /// later merges are matched against.
    pub fn builder(base: &TableRef) -> Result<OuterTableBuilder> {
        Ok(OuterTableBuilder::from_raw(resolve_raw(base)?))
    }

    pub fn sources(&self) -> &[TableRef] {
        &self.sources
    }

    /// Number of rows coming from the base
    pub fn base_row_count(&self) -> usize {
        self.base_count
    }

    /// Physical row of `source` behind `row`, `None` for a NULL-extended row
    pub fn resolve_row_for_table(&self, row: usize, source: usize) -> Result<Option<usize>> {
        check_source(source, self.sources.len())?;
        if row < self.base_count {
            return Ok(Some(self.base[source][row]));
        }
        let mut remaining = row - self.base_count;
        for segment in &self.segments {
            if remaining < segment.count {
                return Ok(segment.rows[source].as_ref().map(|rows| rows[remaining]));
            }
            remaining -= segment.count;
        }
        Err(Error::row_out_of_bounds(row, self.row_count))
    }

    // Like resolve_row_for_table but NULL-extended rows are an error
    fn resolve_existing(&self, row: usize, source: usize) -> Result<usize> {
        self.resolve_row_for_table(row, source)?
            .ok_or(Error::NullExtendedRow {
                row,
                source_index: source,
            })
    }
}

impl Table for OuterTable {
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
        let (source, source_column) = self.routing.route(column)?;
        match self.resolve_row_for_table(row, source)? {
            Some(source_row) => self.sources[source].cell(source_column, source_row),
            None => Ok(Value::null(self.schema.columns[column].data_type)),
        }
    }

    fn scheme(&self, column: usize, _origin: Origin) -> Result<SchemeRef<'_>> {
        self.schema.column(column)?;
        Ok(Box::new(BlindSearch::new(self, column)))
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
        let (source, source_column) = self.routing.route(column)?;
        for row in rows.iter_mut() {
            *row = self.resolve_existing(*row, source)?;
        }
        self.sources[source].to_ancestor_domain(source_column, rows, ancestor)
    }

    // NULL-extended rows have no row in some source, so flattening stops here
    fn resolve_raw_rows(&self, this: &TableRef, rows: &[usize]) -> Result<RawTableInfo> {
        Ok(RawTableInfo::single(this.clone(), rows.to_vec()))
    }

    fn root_identity(&self) -> Option<TableId> {
        Some(self.id)
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

/// Builder for [`OuterTable`]
#[derive(Debug)]
pub struct OuterTableBuilder {
    sources: Vec<TableRef>,
    base: Vec<Vec<usize>>,
    segments: Vec<OuterSegment>,
}

impl OuterTableBuilder {
    /// Start from a flattened base
    pub fn from_raw(base: RawTableInfo) -> Self {
        let (sources, rows): (Vec<_>, Vec<_>) =
            base.into_entries().map(|e| (e.table, e.rows)).unzip();
        Self {
            sources,
            base: rows,
            segments: Vec::new(),
        }
    }

    /// Append every row of `other`
    ///
    /// `other` must flatten to a subset of the base's root tables; the
    /// sources it does not cover are NULL for the appended rows.
    pub fn merge_in(mut self, other: &TableRef) -> Result<Self> {
        let info = resolve_raw(other)?;
        let count = info.row_count();
        let mut rows: Vec<Option<Vec<usize>>> = vec![None; self.sources.len()];
        for entry in info.into_entries() {
            // a self join lists the same table twice, so take the first free slot
            let slot = self
                .sources
                .iter()
                .zip(&rows)
                .position(|(source, taken)| taken.is_none() && source.id() == entry.table.id())
                .ok_or_else(|| {
                    Error::invariant(format!(
                        "merged table {} is not a source of the outer table",
                        entry.table.id()
                    ))
                })?;
            rows[slot] = Some(entry.rows);
        }
        self.segments.push(OuterSegment { rows, count });
        Ok(self)
    }

    pub fn build(self) -> OuterTable {
        let mut schema = Schema::joined(self.sources.iter().map(|s| s.schema()));
        let routing = ColumnRouting::new(&self.sources);
        // columns of a source that some segment leaves out can be NULL
        for (column, definition) in schema.columns.iter_mut().enumerate() {
            if let Ok((source, _)) = routing.route(column) {
                if self.segments.iter().any(|s| s.rows[source].is_none()) {
                    definition.nullable = true;
                }
            }
        }
        let base_count = self.base.first().map_or(0, Vec::len);
        let row_count = base_count + self.segments.iter().map(|s| s.count).sum::<usize>();
        OuterTable {
            id: TableId::next(),
            schema,
            sources: self.sources,
            routing,
            base: self.base,
            base_count,
            segments: self.segments,
            row_count,
            locks: RootLocks::new(),
        }
    }
}
