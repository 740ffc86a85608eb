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

//! Collation order of a column and the range arithmetic over it
//!
//! A [`Collation`] pairs each *position* in ascending value order with the
//! row stored there. Every range search reduces to two positions:
//!
//! ```text
//! position:   0    1    2    3
//! value:     10   20   20   30
//! row:        3    0    2    1
//!
//! [20 .. 20]  ->  positions 1..=2  ->  rows {0, 2}
//! ```
//!
//! Searches return `-(insertion_point + 1)` when the value is absent, the
//! same encoding as `Arrays.binarySearch` style APIs.

use rustc_hash::FxHashMap;

use crate::core::Value;

use super::range::{RangeFlag, RangePoint, SelectableRange};

/// Rows of a column ordered by value, with the values alongside
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collation {
    rows: Vec<usize>,
    values: Vec<Value>,
}

impl Collation {
    /// Build a collation from unordered `(value, row)` pairs
    ///
    /// The sort is stable: equal values keep their input order.
    pub fn from_unsorted(mut entries: Vec<(Value, usize)>) -> Self {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let (values, rows) = entries.into_iter().unzip();
        Self { rows, values }
    }

    /// Build a collation from parallel vectors already in ascending order
    pub(crate) fn from_sorted(rows: Vec<usize>, values: Vec<Value>) -> Self {
        debug_assert_eq!(rows.len(), values.len());
        debug_assert!(values.windows(2).all(|w| w[0].cmp(&w[1]).is_le()));
        Self { rows, values }
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in collation order
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Values in collation order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Row at a position
    pub fn row_at(&self, position: usize) -> Option<usize> {
        self.rows.get(position).copied()
    }

    /// Value at a position
    pub fn value_at(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Smallest value
    pub fn first_value(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Largest value
    pub fn last_value(&self) -> Option<&Value> {
        self.values.last()
    }

    /// Position of each row, keyed by row
    pub fn ranks(&self) -> FxHashMap<usize, usize> {
        let mut ranks = FxHashMap::default();
        ranks.reserve(self.rows.len());
        for (position, &row) in self.rows.iter().enumerate() {
            ranks.insert(row, position);
        }
        ranks
    }

    /// First position holding `value`, or `-(insertion_point + 1)`
    pub fn search_first(&self, value: &Value) -> isize {
        let ip = self.values.partition_point(|v| v.cmp(value).is_lt());
        match self.values.get(ip) {
            Some(v) if v == value => ip as isize,
            _ => encode_not_found(ip),
        }
    }

    /// Last position holding `value`, or `-(insertion_point + 1)`
    pub fn search_last(&self, value: &Value) -> isize {
        let after = self.values.partition_point(|v| v.cmp(value).is_le());
        match after.checked_sub(1).and_then(|p| self.values.get(p)) {
            Some(v) if v == value => after as isize - 1,
            // nothing equal, so `after` is also the insertion point
            _ => encode_not_found(after),
        }
    }

    /// Resolve a range endpoint to a position
    ///
    /// The result may fall one outside the set (`-1` or `len`), which is how
    /// an exclusive endpoint past either end is expressed.
    pub fn position_of_range_point(&self, flag: RangeFlag, point: &RangePoint) -> isize {
        let size = self.len() as isize;
        match flag {
            RangeFlag::FirstValue => match point {
                RangePoint::FirstInSet => 0,
                RangePoint::LastInSet => self.first_position_of(self.last_value()),
                RangePoint::Value(v) => self.first_position_of(Some(v)),
            },
            RangeFlag::LastValue => match point {
                RangePoint::LastInSet => size - 1,
                RangePoint::FirstInSet => self.last_position_of(self.first_value()),
                RangePoint::Value(v) => self.last_position_of(Some(v)),
            },
            RangeFlag::BeforeFirstValue => match point {
                RangePoint::FirstInSet => -1,
                RangePoint::LastInSet => self.first_position_of(self.last_value()) - 1,
                RangePoint::Value(v) => self.first_position_of(Some(v)) - 1,
            },
            RangeFlag::AfterLastValue => match point {
                RangePoint::LastInSet => size,
                RangePoint::FirstInSet => self.last_position_of(self.first_value()) + 1,
                RangePoint::Value(v) => self.last_position_of(Some(v)) + 1,
            },
        }
    }

    /// Rows of a single range, in collation order
    pub fn select_range(&self, range: &SelectableRange) -> Vec<usize> {
        let mut out = Vec::new();
        self.add_range(range, &mut out);
        out
    }

    /// Rows of several ranges, each evaluated independently and appended
    ///
    /// Overlapping ranges yield the overlapping rows more than once.
    pub fn select_ranges(&self, ranges: &[SelectableRange]) -> Vec<usize> {
        let mut out = Vec::new();
        for range in ranges {
            self.add_range(range, &mut out);
        }
        out
    }

    /// Append the rows of `range` to `out`
    pub(crate) fn add_range(&self, range: &SelectableRange, out: &mut Vec<usize>) {
        if self.is_empty() {
            return;
        }
        let r1 = self.position_of_range_point(range.start_flag().into(), range.start());
        let r2 = self.position_of_range_point(range.end_flag().into(), range.end());
        if r2 < r1 {
            return;
        }
        // start flags resolve to 0..=len and end flags to -1..len, so after
        // the check above both are inside the set
        let (r1, r2) = (r1.max(0) as usize, r2 as usize);
        out.extend_from_slice(&self.rows[r1..=r2.min(self.len() - 1)]);
    }

    // Position of the first occurrence, or the insertion point
    fn first_position_of(&self, value: Option<&Value>) -> isize {
        match value {
            Some(v) => match self.search_first(v) {
                p if p >= 0 => p,
                p => decode_not_found(p),
            },
            None => 0,
        }
    }

    // Position of the last occurrence, or one before the insertion point
    fn last_position_of(&self, value: Option<&Value>) -> isize {
        match value {
            Some(v) => match self.search_last(v) {
                p if p >= 0 => p,
                p => decode_not_found(p) - 1,
            },
            None => -1,
        }
    }
}

#[inline]
fn encode_not_found(insertion_point: usize) -> isize {
    -(insertion_point as isize + 1)
}

#[inline]
fn decode_not_found(encoded: isize) -> isize {
    -(encoded + 1)
}
