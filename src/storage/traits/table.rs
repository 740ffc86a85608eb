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

//! Table trait shared by physical and derived tables
//!

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::core::{ColumnName, Result, Schema, Value};
use crate::storage::raw::RawTableInfo;
use crate::storage::traits::scheme::SchemeRef;

/// Shared handle to a table
pub type TableRef = Arc<dyn Table>;

/// Key identifying the holder of a root lock
pub type LockKey = u64;

/// Process-wide unique identity of a table instance
///
/// Identity checks compare ids rather than addresses, so filtering the same
/// physical table twice yields two distinct tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u64);

impl TableId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);
        TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a scheme request comes from
///
/// `Here` asks for a scheme over the callee's own rows. `Descendant` means a
/// table derived from the callee is building its own scheme: any ancestor's
/// scheme will do, since the descendant maps its rows into that scheme's
/// domain with [`Table::to_ancestor_domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The request is about the callee itself
    Here,
    /// The request is forwarded on behalf of a derived table
    Descendant,
}

/// The physical rows a table enumerates, in order
#[derive(Debug, Clone)]
pub enum RowEnumeration {
    /// Rows `0..count`
    Identity(usize),
    /// An explicit list of physical rows
    Indexed(Arc<[usize]>),
}

impl RowEnumeration {
    /// Number of enumerated rows
    pub fn len(&self) -> usize {
        match self {
            RowEnumeration::Identity(count) => *count,
            RowEnumeration::Indexed(rows) => rows.len(),
        }
    }

    /// Returns true if no rows are enumerated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if rows enumerate as `0..count`
    pub fn is_identity(&self) -> bool {
        matches!(self, RowEnumeration::Identity(_))
    }

    /// Physical row at enumeration position `n`
    pub fn get(&self, n: usize) -> Option<usize> {
        match self {
            RowEnumeration::Identity(count) => (n < *count).then_some(n),
            RowEnumeration::Indexed(rows) => rows.get(n).copied(),
        }
    }

    /// Iterate the physical rows in order
    pub fn iter(&self) -> RowIter<'_> {
        RowIter {
            rows: self,
            pos: 0,
        }
    }

    /// Collect the physical rows into a vector
    pub fn to_vec(&self) -> Vec<usize> {
        match self {
            RowEnumeration::Identity(count) => (0..*count).collect(),
            RowEnumeration::Indexed(rows) => rows.to_vec(),
        }
    }
}

/// Iterator over a [`RowEnumeration`]
pub struct RowIter<'a> {
    rows: &'a RowEnumeration,
    pos: usize,
}

impl Iterator for RowIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let row = self.rows.get(self.pos)?;
        self.pos += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowIter<'_> {}

/// A table: physical storage or a derived view over other tables
///
/// Rows are addressed by *physical row index*, an index that is only
/// meaningful for the table instance it came from. `rows()` lists the
/// physical rows the table currently exposes. Tables that build their own
/// rows enumerate `0..row_count`; projections expose their parent's rows.
///
/// Tables are immutable once built and may be read from several threads.
pub trait Table: Send + Sync + fmt::Debug {
    /// Returns the identity of this table instance
    fn id(&self) -> TableId;

    /// Returns the column definitions
    fn schema(&self) -> &Schema;

    /// Returns the number of columns
    fn column_count(&self) -> usize {
        self.schema().column_count()
    }

    /// Returns the number of rows
    fn row_count(&self) -> usize;

    /// Enumerates the physical rows of this table
    fn rows(&self) -> RowEnumeration {
        RowEnumeration::Identity(self.row_count())
    }

    /// Returns the cell at (column, physical row)
    fn cell(&self, column: usize, row: usize) -> Result<Value>;

    /// Returns a selection scheme for a column
    ///
    /// For [`Origin::Here`] the scheme's rows are rows of this table. For
    /// [`Origin::Descendant`] they belong to the table named by
    /// [`SelectableScheme::domain`](crate::storage::SelectableScheme::domain),
    /// which is this table or one of its ancestors.
    fn scheme(&self, column: usize, origin: Origin) -> Result<SchemeRef<'_>>;

    /// Maps physical rows of this table, in place, to the row domain of
    /// `ancestor`, following the source that owns `column`
    ///
    /// Fails with [`Error::IncorrectAncestor`](crate::core::Error::IncorrectAncestor)
    /// when `ancestor` is not reachable through `column`.
    fn to_ancestor_domain(
        &self,
        column: usize,
        rows: &mut [usize],
        ancestor: TableId,
    ) -> Result<()>;

    /// Decomposes the given physical rows into rows of root tables
    ///
    /// `this` must be the handle `self` was reached through; root tables
    /// record it as the raw table.
    fn resolve_raw_rows(&self, this: &TableRef, rows: &[usize]) -> Result<RawTableInfo>;

    /// Identity used for root type-equality, `None` for non-root tables
    ///
    /// Two roots are type-compatible when their identities are equal. A
    /// table is always type-equal to itself; distinct tables may share an
    /// identity to declare themselves type-equal.
    fn root_identity(&self) -> Option<TableId> {
        None
    }

    /// Returns true if recursion into ancestors stops at this table
    fn is_root(&self) -> bool {
        self.root_identity().is_some()
    }

    /// Returns true if both tables are roots of the same type
    fn root_type_equals(&self, other: &dyn Table) -> bool {
        match (self.root_identity(), other.root_identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Takes a root lock, propagating to every constituent table
    fn lock_root(&self, key: LockKey) -> Result<()>;

    /// Releases a root lock taken with the same key
    fn unlock_root(&self, key: LockKey) -> Result<()>;

    /// Returns true while this table holds any root lock
    fn has_roots_locked(&self) -> bool;

    /// Resolves a column reference to a column index
    fn find_field_name(&self, name: &ColumnName) -> Option<usize> {
        self.schema().find_column(name)
    }
}

/// Decomposes every row of `table` into rows of root tables
pub fn resolve_raw(table: &TableRef) -> Result<RawTableInfo> {
    let rows = table.rows().to_vec();
    table.resolve_raw_rows(table, &rows)
}
