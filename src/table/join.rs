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

//! NaturallyJoinedTable - the cartesian product of two tables
//!
//! No row sequences are stored: with `R` right rows, row `n` is made of
//! left row `n / R` and right row `n % R`, taken through each side's
//! enumeration.

use std::sync::{Arc, OnceLock};

use crate::core::{Error, Result, Schema, Value};
use crate::storage::raw::RawTableInfo;
use crate::storage::root_lock::RootLocks;
use crate::storage::scheme::Collation;
use crate::storage::traits::{
    LockKey, Origin, RowEnumeration, SchemeRef, Table, TableId, TableRef,
};

use super::joined::{self, check_source, ColumnRouting, JoinedTable};

/// How a join side addresses its source's physical rows
#[derive(Debug, Clone)]
pub enum TableKind {
    /// Position `i` is physical row `i`
    Identity(usize),
    /// Position `i` is physical row `rows[i]`
    Indexed(Arc<[usize]>),
}

impl TableKind {
    /// Kind of a source, captured from its enumeration
    ///
    /// With `allow_identity` unset every source is captured as an explicit
    /// sequence.
    pub fn of(source: &dyn Table, allow_identity: bool) -> Self {
        match source.rows() {
            RowEnumeration::Identity(count) if allow_identity => TableKind::Identity(count),
            RowEnumeration::Identity(count) => TableKind::Indexed((0..count).collect()),
            RowEnumeration::Indexed(rows) => TableKind::Indexed(rows),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TableKind::Identity(count) => *count,
            TableKind::Indexed(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn row_at(&self, position: usize) -> usize {
        match self {
            TableKind::Identity(_) => position,
            TableKind::Indexed(rows) => rows[position],
        }
    }
}

pub(crate) fn product_row_count(left: usize, right: usize) -> Result<usize> {
    left.checked_mul(right).ok_or_else(|| {
        Error::invariant(format!(
            "join of {} and {} rows overflows the row count",
            left, right
        ))
    })
}

/// Cartesian product of a left and a right table
#[derive(Debug)]
pub struct NaturallyJoinedTable {
    id: TableId,
    schema: Schema,
    sources: [TableRef; 2],
    kinds: [TableKind; 2],
    routing: ColumnRouting,
    row_count: usize,
    schemes: Vec<OnceLock<Arc<Collation>>>,
    locks: RootLocks,
}

impl NaturallyJoinedTable {
    /// Join `left` and `right`
    ///
    /// `identity_enumeration` lets identity-enumerated sides skip the
    /// captured index sequence.
    /// Fails when the product row count does not fit in `usize`.
    pub fn new(left: TableRef, right: TableRef, identity_enumeration: bool) -> Result<Self> {
        let kinds = [
            TableKind::of(&*left, identity_enumeration),
            TableKind::of(&*right, identity_enumeration),
        ];
        let row_count = product_row_count(kinds[0].len(), kinds[1].len())?;
        let sources = [left, right];
        let routing = ColumnRouting::new(&sources);
        Ok(Self {
            id: TableId::next(),
            schema: Schema::joined(sources.iter().map(|s| s.schema())),
            schemes: joined::new_scheme_cache(routing.column_count()),
            sources,
            kinds,
            routing,
            row_count,
            locks: RootLocks::new(),
        })
    }

    pub fn left(&self) -> &TableRef {
        &self.sources[0]
    }

    pub fn right(&self) -> &TableRef {
        &self.sources[1]
    }

    /// Row addressing of a side (0 = left, 1 = right)
    pub fn kind(&self, source: usize) -> Result<&TableKind> {
        check_source(source, 2)?;
        Ok(&self.kinds[source])
    }

    // Position of row `row` within the enumeration of `source`
    #[inline]
    fn position(&self, row: usize, source: usize) -> usize {
        let right_count = self.kinds[1].len();
        if source == 0 {
            row / right_count
        } else {
            row % right_count
        }
    }
}

impl JoinedTable for NaturallyJoinedTable {
    fn sources(&self) -> &[TableRef] {
        &self.sources
    }

    fn routing(&self) -> &ColumnRouting {
        &self.routing
    }

    fn resolve_row_for_table(&self, row: usize, source: usize) -> Result<usize> {
        check_source(source, 2)?;
        if row >= self.row_count {
            return Err(Error::row_out_of_bounds(row, self.row_count));
        }
        Ok(self.kinds[source].row_at(self.position(row, source)))
    }

    fn resolve_all_rows_for_table(&self, rows: &mut [usize], source: usize) -> Result<()> {
        check_source(source, 2)?;
        if let Some(&bad) = rows.iter().find(|&&r| r >= self.row_count) {
            return Err(Error::row_out_of_bounds(bad, self.row_count));
        }
        let kind = &self.kinds[source];
        for row in rows.iter_mut() {
            *row = kind.row_at(self.position(*row, source));
        }
        Ok(())
    }
}

impl Table for NaturallyJoinedTable {
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
