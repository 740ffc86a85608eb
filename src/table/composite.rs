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

//! CompositeTable - rows of several same-shaped tables, one after another
//!
//! A composite is the result of UNION, INTERSECT and EXCEPT. Each source
//! contributes a sequence of its own physical rows; row `n` of the
//! composite is found by walking the sources and subtracting their counts.
//! Rows from different sources are not ordered relative to each other, so
//! columns are searched with a [`BlindSearch`].

use crate::core::{CompositeFunction, Error, Result, Schema, Value};
use crate::storage::config::DedupStrategy;
use crate::storage::raw::RawTableInfo;
use crate::storage::root_lock::RootLocks;
use crate::storage::scheme::BlindSearch;
use crate::storage::traits::{LockKey, Origin, SchemeRef, Table, TableId, TableRef};

use super::dedup;
use super::joined;

/// Rows of several same-shaped tables, concatenated
#[derive(Debug)]
pub struct CompositeTable {
    id: TableId,
    schema: Schema,
    sources: Vec<TableRef>,
    rows: Vec<Vec<usize>>,
    row_count: usize,
    locks: RootLocks,
}

impl CompositeTable {
    /// Every row of every source (UNION ALL)
    pub fn new(sources: Vec<TableRef>) -> Result<Self> {
        let rows = sources.iter().map(|s| s.rows().to_vec()).collect();
        Self::from_parts(sources, rows)
    }

    /// Chosen physical rows of each source
    ///
    /// The first source provides the column names; every other source must
    /// have the same number of columns, with comparable types.
    pub fn from_parts(sources: Vec<TableRef>, rows: Vec<Vec<usize>>) -> Result<Self> {
        let master = sources
            .first()
            .ok_or_else(|| Error::invariant("composite table needs at least one source"))?;
        if rows.len() != sources.len() {
            return Err(Error::invariant(format!(
                "{} row sequences given for {} sources",
                rows.len(),
                sources.len()
            )));
        }
        let schema = master.schema().clone();
        for source in &sources[1..] {
            check_shape(&schema, source.schema())?;
        }
        let row_count = rows.iter().map(Vec::len).sum();
        Ok(Self {
            id: TableId::next(),
            schema,
            sources,
            rows,
            row_count,
            locks: RootLocks::new(),
        })
    }

    /// Combine `sources` left to right with `function`
    ///
    /// Without `all`, the result holds each distinct row once.
    pub fn compose(
        sources: Vec<TableRef>,
        function: CompositeFunction,
        all: bool,
        strategy: DedupStrategy,
    ) -> Result<Self> {
        let union = Self::new(sources)?;
        let step: fn(&[Vec<Value>], &[Vec<Value>], bool) -> Vec<usize> = match function {
            CompositeFunction::Union if all => return Ok(union),
            CompositeFunction::Union => return union.remove_duplicates(strategy),
            CompositeFunction::Intersect => dedup::intersect,
            CompositeFunction::Except => dedup::except,
        };

        // (source, physical row) of every surviving row, plus its values
        let mut acc = union.row_refs_of(0);
        let mut acc_values = union.values_of(&acc)?;
        for source in 1..union.sources.len() {
            let right = union.row_refs_of(source);
            let right_values = union.values_of(&right)?;
            let keep = step(&acc_values, &right_values, all);
            let mut next = Vec::with_capacity(keep.len());
            for &i in &keep {
                next.push(std::mem::take(&mut acc_values[i]));
            }
            acc = keep.into_iter().map(|i| acc[i]).collect();
            acc_values = next;
        }
        if union.sources.len() == 1 && !all {
            let keep = dedup::distinct_hash(&acc_values);
            acc = keep.into_iter().map(|i| acc[i]).collect();
        }
        union.regroup(acc)
    }

    /// The same rows with duplicates removed
    pub fn remove_duplicates(&self, strategy: DedupStrategy) -> Result<Self> {
        let refs: Vec<(usize, usize)> = (0..self.sources.len())
            .flat_map(|source| self.row_refs_of(source))
            .collect();
        let values = self.values_of(&refs)?;
        let keep = dedup::distinct(&values, strategy);
        self.regroup(keep.into_iter().map(|i| refs[i]).collect())
    }

    pub fn sources(&self) -> &[TableRef] {
        &self.sources
    }

    /// Physical rows each source contributes, in order
    pub fn row_sets(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// (source index, source physical row) of a composite row
    pub fn locate(&self, row: usize) -> Result<(usize, usize)> {
        let mut remaining = row;
        for (source, rows) in self.rows.iter().enumerate() {
            if remaining < rows.len() {
                return Ok((source, rows[remaining]));
            }
            remaining -= rows.len();
        }
        Err(Error::row_out_of_bounds(row, self.row_count))
    }

    fn row_refs_of(&self, source: usize) -> Vec<(usize, usize)> {
        self.rows[source].iter().map(|&row| (source, row)).collect()
    }

    fn values_of(&self, refs: &[(usize, usize)]) -> Result<Vec<Vec<Value>>> {
        let columns = self.schema.column_count();
        refs.iter()
            .map(|&(source, row)| {
                (0..columns)
                    .map(|c| self.sources[source].cell(c, row))
                    .collect()
            })
            .collect()
    }

    // A composite over the same sources holding `refs`
    fn regroup(&self, refs: Vec<(usize, usize)>) -> Result<Self> {
        let mut rows = vec![Vec::new(); self.sources.len()];
        for (source, row) in refs {
            rows[source].push(row);
        }
        Self::from_parts(self.sources.clone(), rows)
    }
}

fn check_shape(master: &Schema, other: &Schema) -> Result<()> {
    if other.column_count() != master.column_count() {
        return Err(Error::table_columns_not_match(
            master.column_count(),
            other.column_count(),
        ));
    }
    for (a, b) in master.columns.iter().zip(&other.columns) {
        if !a.data_type.is_compatible(&b.data_type) {
            return Err(Error::incompatible_types(
                a.data_type.to_string(),
                b.data_type.to_string(),
            ));
        }
    }
    Ok(())
}

impl Table for CompositeTable {
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
        let (source, source_row) = self.locate(row)?;
        self.sources[source].cell(column, source_row)
    }

    fn scheme(&self, column: usize, _origin: Origin) -> Result<SchemeRef<'_>> {
        self.schema.column(column)?;
        Ok(Box::new(BlindSearch::new(self, column)))
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
