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

//! IN and NOT IN resolution
//!
//! Both functions return physical rows of the left table. Only single
//! column membership is supported; a row value list on either side is
//! rejected before any row is read.
//!
//! IN lets the smaller table drive: every driving value is probed with an
//! equality search against the other side's collation. When the right side
//! drives, the matching left rows arrive grouped by right value, so they
//! are collected into a sorted, duplicate free accumulator. When the left
//! side drives, each left row is kept or dropped exactly once and is
//! appended in enumeration order.

use tracing::trace;

use crate::core::{Error, Result};
use crate::storage::scheme::SelectableRange;
use crate::storage::traits::{Origin, Table};

/// The single column of a membership operand
pub(crate) fn single_column(columns: &[usize], side: &str) -> Result<usize> {
    match columns {
        [column] => Ok(*column),
        _ => Err(Error::not_supported(format!(
            "{}-column IN on the {} side",
            columns.len(),
            side
        ))),
    }
}

/// Left rows whose value occurs in the right column
pub fn in_rows(
    left: &dyn Table,
    left_columns: &[usize],
    right: &dyn Table,
    right_columns: &[usize],
    accumulator_capacity: usize,
) -> Result<Vec<usize>> {
    let left_column = single_column(left_columns, "left")?;
    let right_column = single_column(right_columns, "right")?;
    let (left_count, right_count) = (left.row_count(), right.row_count());
    if left_count == 0 || right_count == 0 {
        return Ok(Vec::new());
    }

    if right_count <= left_count {
        trace!(left_count, right_count, "IN driven by right side");
        let scheme = left.scheme(left_column, Origin::Here)?;
        let collation = scheme.collation()?;
        let mut matched = Vec::with_capacity(accumulator_capacity);
        for row in right.rows().iter() {
            let value = right.cell(right_column, row)?;
            if value.is_null() {
                continue;
            }
            matched.extend(collation.select_range(&SelectableRange::equal(value)));
        }
        matched.sort_unstable();
        matched.dedup();
        Ok(matched)
    } else {
        trace!(left_count, right_count, "IN driven by left side");
        let scheme = right.scheme(right_column, Origin::Here)?;
        let collation = scheme.collation()?;
        let mut matched = Vec::with_capacity(accumulator_capacity.min(left_count));
        for row in left.rows().iter() {
            let value = left.cell(left_column, row)?;
            if !value.is_null() && collation.search_first(&value) >= 0 {
                matched.push(row);
            }
        }
        Ok(matched)
    }
}

/// Left rows whose value does not occur in the right column
///
/// A single right row is handled as `left <> value`, which leaves out left
/// rows holding NULL. With more right rows every left row is probed and a
/// NULL left value never finds a match, so it is kept.
pub fn not_in_rows(
    left: &dyn Table,
    left_columns: &[usize],
    right: &dyn Table,
    right_columns: &[usize],
) -> Result<Vec<usize>> {
    let left_column = single_column(left_columns, "left")?;
    let right_column = single_column(right_columns, "right")?;
    let right_rows = right.rows();

    match right_rows.len() {
        0 => Ok(left.rows().to_vec()),
        1 => {
            let value = match right_rows.get(0) {
                Some(row) => right.cell(right_column, row)?,
                None => return Ok(left.rows().to_vec()),
            };
            left.scheme(left_column, Origin::Here)?
                .select_not_equal(&value)
        }
        _ => {
            let scheme = right.scheme(right_column, Origin::Here)?;
            let collation = scheme.collation()?;
            let mut kept = Vec::new();
            for row in left.rows().iter() {
                let value = left.cell(left_column, row)?;
                if value.is_null() || collation.search_first(&value) < 0 {
                    kept.push(row);
                }
            }
            Ok(kept)
        }
    }
}
