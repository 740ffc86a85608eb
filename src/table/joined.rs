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

//! Machinery shared by tables whose rows are tuples of source rows
//!
//! Such a table lays its sources' columns out side by side. A column is
//! routed to (source, source column); a row is resolved per source to one of
//! that source's physical rows. Everything else (cells, schemes, ancestor
//! mapping, raw decomposition, root locks) follows from those two mappings.

use std::sync::{Arc, OnceLock};

use crate::core::{Error, Result, Value};
use crate::storage::raw::RawTableInfo;
use crate::storage::root_lock::RootLocks;
use crate::storage::scheme::{derive_collation, CollatedSearch, Collation};
use crate::storage::traits::{LockKey, Origin, SchemeRef, Table, TableId, TableRef};

/// Maps each exposed column to the source that owns it
#[derive(Debug, Clone, Default)]
pub struct ColumnRouting {
    column_table: Vec<usize>,
    column_filter: Vec<usize>,
}

impl ColumnRouting {
    /// Routing for `sources` laid out left to right
    pub fn new(sources: &[TableRef]) -> Self {
        let mut routing = Self::default();
        for (index, source) in sources.iter().enumerate() {
            for column in 0..source.column_count() {
                routing.column_table.push(index);
                routing.column_filter.push(column);
            }
        }
        routing
    }

    /// Number of exposed columns
    pub fn column_count(&self) -> usize {
        self.column_table.len()
    }

    /// (source index, source column) of an exposed column
    pub fn route(&self, column: usize) -> Result<(usize, usize)> {
        match (self.column_table.get(column), self.column_filter.get(column)) {
            (Some(&source), Some(&source_column)) => Ok((source, source_column)),
            _ => Err(Error::column_out_of_bounds(column, self.column_table.len())),
        }
    }
}

/// A table whose rows are tuples of rows from its sources
pub trait JoinedTable: Table + Sized {
    fn sources(&self) -> &[TableRef];

    fn routing(&self) -> &ColumnRouting;

    /// Physical row of `source` that row `row` of this table is made of
    fn resolve_row_for_table(&self, row: usize, source: usize) -> Result<usize>;

    /// Replace every row of this table in `rows` by the row of `source`
    fn resolve_all_rows_for_table(&self, rows: &mut [usize], source: usize) -> Result<()> {
        for row in rows.iter_mut() {
            *row = self.resolve_row_for_table(*row, source)?;
        }
        Ok(())
    }
}

/// Check a source index against the number of sources
pub(crate) fn check_source(source: usize, count: usize) -> Result<()> {
    if source >= count {
        return Err(Error::SourceIndexOutOfBounds {
            index: source,
            count,
        });
    }
    Ok(())
}

pub(crate) fn new_scheme_cache(columns: usize) -> Vec<OnceLock<Arc<Collation>>> {
    (0..columns).map(|_| OnceLock::new()).collect()
}

pub(crate) fn cell<T: JoinedTable>(table: &T, column: usize, row: usize) -> Result<Value> {
    let (source, source_column) = table.routing().route(column)?;
    let source_row = table.resolve_row_for_table(row, source)?;
    table.sources()[source].cell(source_column, source_row)
}

/// Scheme of a joined table column
///
/// A descendant is handed the owning source's scheme as is. A request about
/// the table itself is served from `cache`, filled on first use by ordering
/// this table's rows by the source's collation.
pub(crate) fn scheme<'a, T: JoinedTable>(
    table: &'a T,
    cache: &'a [OnceLock<Arc<Collation>>],
    column: usize,
    origin: Origin,
) -> Result<SchemeRef<'a>> {
    let (source, source_column) = table.routing().route(column)?;
    let source_table = &table.sources()[source];
    if origin == Origin::Descendant {
        return source_table.scheme(source_column, Origin::Descendant);
    }
    let slot = &cache[column];
    let collation = match slot.get() {
        Some(collation) => collation.clone(),
        None => {
            let ancestor = source_table.scheme(source_column, Origin::Descendant)?;
            let derived = Arc::new(derive_collation(table, column, &*ancestor)?);
            slot.get_or_init(|| derived).clone()
        }
    };
    Ok(Box::new(CollatedSearch::new(table.id(), collation)))
}

pub(crate) fn to_ancestor_domain<T: JoinedTable>(
    table: &T,
    column: usize,
    rows: &mut [usize],
    ancestor: TableId,
) -> Result<()> {
    if ancestor == table.id() {
        return Ok(());
    }
    let (source, source_column) = table.routing().route(column)?;
    table.resolve_all_rows_for_table(rows, source)?;
    table.sources()[source].to_ancestor_domain(source_column, rows, ancestor)
}

pub(crate) fn resolve_raw_rows<T: JoinedTable>(table: &T, rows: &[usize]) -> Result<RawTableInfo> {
    let mut info = RawTableInfo::new();
    for (index, source) in table.sources().iter().enumerate() {
        let mut source_rows = rows.to_vec();
        table.resolve_all_rows_for_table(&mut source_rows, index)?;
        info.append(source.resolve_raw_rows(source, &source_rows)?)?;
    }
    Ok(info)
}

/// Locks every source, then `locks`
///
/// When a source refuses the lock, the sources before it are released again
/// and the refusal is returned.
pub(crate) fn lock_root(sources: &[TableRef], locks: &RootLocks, key: LockKey) -> Result<()> {
    for (index, source) in sources.iter().enumerate() {
        if let Err(err) = source.lock_root(key) {
            for locked in sources[..index].iter().rev() {
                // the refusal is the error the caller sees
                let _ = locked.unlock_root(key);
            }
            return Err(err);
        }
    }
    locks.lock(key);
    Ok(())
}

pub(crate) fn unlock_root(
    id: TableId,
    sources: &[TableRef],
    locks: &RootLocks,
    key: LockKey,
) -> Result<()> {
    locks.unlock(key, &id.to_string())?;
    for source in sources {
        source.unlock_root(key)?;
    }
    Ok(())
}
