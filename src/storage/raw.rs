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

//! Raw table discovery
//!
//! Any derived table can be flattened into a list of root tables plus, per
//! root, the sequence of root rows each derived row is made of. All row
//! sequences have the same length: entry `i` of every sequence together
//! forms derived row `i`.

use smallvec::SmallVec;

use crate::core::{Error, Result};
use crate::storage::traits::TableRef;

/// A root table and the rows taken from it
#[derive(Debug, Clone)]
pub struct RawTableEntry {
    pub table: TableRef,
    pub rows: Vec<usize>,
}

/// Flattened (root table, rows) decomposition of a derived table
#[derive(Debug, Clone, Default)]
pub struct RawTableInfo {
    entries: SmallVec<[RawTableEntry; 4]>,
}

impl RawTableInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decomposition with a single root
    pub fn single(table: TableRef, rows: Vec<usize>) -> Self {
        let mut entries = SmallVec::new();
        entries.push(RawTableEntry { table, rows });
        Self { entries }
    }

    /// Append a root and its rows
    ///
    /// Fails if `rows` disagrees in length with the entries already present.
    pub fn push(&mut self, table: TableRef, rows: Vec<usize>) -> Result<()> {
        if !self.entries.is_empty() && rows.len() != self.row_count() {
            return Err(Error::row_count_mismatch(self.row_count(), rows.len()));
        }
        self.entries.push(RawTableEntry { table, rows });
        Ok(())
    }

    /// Append every entry of `other`
    pub fn append(&mut self, other: RawTableInfo) -> Result<()> {
        for entry in other.entries {
            self.push(entry.table, entry.rows)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> &[RawTableEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> impl Iterator<Item = RawTableEntry> {
        self.entries.into_iter()
    }

    /// Number of roots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of derived rows described
    pub fn row_count(&self) -> usize {
        self.entries.first().map_or(0, |e| e.rows.len())
    }

    /// Returns true if both decompositions list type-equal roots in the same order
    pub fn is_compatible(&self, other: &RawTableInfo) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.table.root_type_equals(&*b.table))
    }

    /// Distinct union of two decompositions over the same roots
    ///
    /// Rows are compared by their root row tuple, so two derived rows are
    /// duplicates only when they are made of the very same root rows. The
    /// result lists tuples in ascending order.
    pub fn union(&self, other: &RawTableInfo) -> Result<RawTableInfo> {
        if !self.is_compatible(other) {
            return Err(Error::invariant(
                "raw table decompositions are over different root tables",
            ));
        }
        let mut tuples = self.tuples();
        tuples.extend(other.tuples());
        Ok(self.with_tuples(tuples))
    }

    /// The same decomposition with duplicate row tuples removed
    pub fn remove_duplicates(&self) -> RawTableInfo {
        self.with_tuples(self.tuples())
    }

    // Row tuples, one per derived row
    fn tuples(&self) -> Vec<SmallVec<[usize; 4]>> {
        (0..self.row_count())
            .map(|r| self.entries.iter().map(|e| e.rows[r]).collect())
            .collect()
    }

    fn with_tuples(&self, mut tuples: Vec<SmallVec<[usize; 4]>>) -> RawTableInfo {
        tuples.sort_unstable();
        tuples.dedup();
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| RawTableEntry {
                table: entry.table.clone(),
                rows: tuples.iter().map(|t| t[i]).collect(),
            })
            .collect();
        RawTableInfo { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, SchemaBuilder};
    use crate::storage::MemoryTable;

    fn leaf(rows: usize) -> TableRef {
        let schema = SchemaBuilder::new("t").add("v", DataType::Integer).build();
        (0..rows as i64)
            .fold(MemoryTable::builder(schema), |b, v| b.row([v]))
            .build()
            .unwrap()
            .into_ref()
    }

    #[test]
    fn test_push_checks_lengths() {
        let (a, b) = (leaf(3), leaf(3));
        let mut info = RawTableInfo::single(a, vec![0, 1]);
        assert!(info.push(b.clone(), vec![2, 2]).is_ok());
        assert_eq!(
            info.push(b, vec![0]).unwrap_err(),
            Error::row_count_mismatch(2, 1)
        );
        assert_eq!(info.len(), 2);
        assert_eq!(info.row_count(), 2);
    }

    #[test]
    fn test_union_matches_tuples() {
        let (a, b) = (leaf(3), leaf(3));
        let mut left = RawTableInfo::single(a.clone(), vec![2, 0]);
        left.push(b.clone(), vec![1, 1]).unwrap();
        let mut right = RawTableInfo::single(a.clone(), vec![0, 0]);
        right.push(b.clone(), vec![1, 2]).unwrap();

        let union = left.union(&right).unwrap();
        assert_eq!(union.entries()[0].rows, vec![0, 0, 2]);
        assert_eq!(union.entries()[1].rows, vec![1, 2, 1]);

        let other = RawTableInfo::single(b, vec![0, 0]);
        assert!(left.union(&other).unwrap_err().is_invariant_violation());
    }

    #[test]
    fn test_remove_duplicates() {
        let a = leaf(2);
        let info = RawTableInfo::single(a, vec![1, 0, 1, 1]);
        assert_eq!(info.remove_duplicates().entries()[0].rows, vec![0, 1]);
        assert!(RawTableInfo::new().remove_duplicates().is_empty());
    }
}
