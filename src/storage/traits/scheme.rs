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

//! SelectableScheme trait - range selection over one column of a table

use std::borrow::Cow;
use std::fmt;

use crate::core::{Error, Operator, Result, Value};
use crate::storage::scheme::{Collation, EndFlag, RangePoint, SelectableRange, StartFlag};
use crate::storage::traits::table::TableId;

/// A scheme borrowed from the table that produced it
pub type SchemeRef<'a> = Box<dyn SelectableScheme + 'a>;

/// Range selection over one column
///
/// Implementations only say how to obtain the column's [`Collation`]; all
/// selections are provided on top of it and return rows of the table named
/// by [`domain`](Self::domain), in collation order.
pub trait SelectableScheme: Send + Sync + fmt::Debug {
    /// The table whose physical rows this scheme returns
    fn domain(&self) -> TableId;

    /// The column's collation
    fn collation(&self) -> Result<Cow<'_, Collation>>;

    /// Returns true if the scheme refuses insert/remove notifications
    fn is_immutable(&self) -> bool {
        true
    }

    /// Notification that a row was inserted into the underlying column
    ///
    /// Schemes here derive their order from the column on demand, so the
    /// notification carries no state change.
    fn insert(&self, _row: usize) -> Result<()> {
        if self.is_immutable() {
            return Err(Error::ImmutableScheme);
        }
        Ok(())
    }

    /// Notification that a row was removed from the underlying column
    fn remove(&self, _row: usize) -> Result<()> {
        if self.is_immutable() {
            return Err(Error::ImmutableScheme);
        }
        Ok(())
    }

    /// Number of rows in the set
    fn set_size(&self) -> Result<usize> {
        Ok(self.collation()?.len())
    }

    /// First position of `value`, or `-(insertion_point + 1)`
    fn search_first(&self, value: &Value) -> Result<isize> {
        Ok(self.collation()?.search_first(value))
    }

    /// Last position of `value`, or `-(insertion_point + 1)`
    fn search_last(&self, value: &Value) -> Result<isize> {
        Ok(self.collation()?.search_last(value))
    }

    /// Every row
    fn select_all(&self) -> Result<Vec<usize>> {
        Ok(self.collation()?.rows().to_vec())
    }

    fn select_range(&self, range: &SelectableRange) -> Result<Vec<usize>> {
        Ok(self.collation()?.select_range(range))
    }

    fn select_ranges(&self, ranges: &[SelectableRange]) -> Result<Vec<usize>> {
        Ok(self.collation()?.select_ranges(ranges))
    }

    /// Rows equal to the smallest value
    fn select_first(&self) -> Result<Vec<usize>> {
        self.select_range(&SelectableRange::new(
            StartFlag::FirstValue,
            RangePoint::FirstInSet,
            EndFlag::LastValue,
            RangePoint::FirstInSet,
        ))
    }

    /// Rows equal to the largest value
    fn select_last(&self) -> Result<Vec<usize>> {
        self.select_range(&SelectableRange::new(
            StartFlag::FirstValue,
            RangePoint::LastInSet,
            EndFlag::LastValue,
            RangePoint::LastInSet,
        ))
    }

    fn select_all_non_null(&self) -> Result<Vec<usize>> {
        self.select_range(&SelectableRange::new(
            StartFlag::AfterLastValue,
            null_point(),
            EndFlag::LastValue,
            RangePoint::LastInSet,
        ))
    }

    fn select_equal(&self, value: &Value) -> Result<Vec<usize>> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        self.select_range(&SelectableRange::equal(value.clone()))
    }

    fn select_not_equal(&self, value: &Value) -> Result<Vec<usize>> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        self.select_ranges(&[
            SelectableRange::new(
                StartFlag::AfterLastValue,
                null_point(),
                EndFlag::BeforeFirstValue,
                value.clone(),
            ),
            SelectableRange::new(
                StartFlag::AfterLastValue,
                value.clone(),
                EndFlag::LastValue,
                RangePoint::LastInSet,
            ),
        ])
    }

    fn select_greater(&self, value: &Value) -> Result<Vec<usize>> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        self.select_range(&SelectableRange::new(
            StartFlag::AfterLastValue,
            value.clone(),
            EndFlag::LastValue,
            RangePoint::LastInSet,
        ))
    }

    fn select_greater_or_equal(&self, value: &Value) -> Result<Vec<usize>> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        self.select_range(&SelectableRange::new(
            StartFlag::FirstValue,
            value.clone(),
            EndFlag::LastValue,
            RangePoint::LastInSet,
        ))
    }

    fn select_less(&self, value: &Value) -> Result<Vec<usize>> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        self.select_range(&SelectableRange::new(
            StartFlag::AfterLastValue,
            null_point(),
            EndFlag::BeforeFirstValue,
            value.clone(),
        ))
    }

    fn select_less_or_equal(&self, value: &Value) -> Result<Vec<usize>> {
        if value.is_null() {
            return Ok(Vec::new());
        }
        self.select_range(&SelectableRange::new(
            StartFlag::AfterLastValue,
            null_point(),
            EndFlag::LastValue,
            value.clone(),
        ))
    }

    /// Rows satisfying `column <op> value`
    fn select_operator(&self, op: Operator, value: &Value) -> Result<Vec<usize>> {
        match op {
            Operator::Eq => self.select_equal(value),
            Operator::Ne => self.select_not_equal(value),
            Operator::Gt => self.select_greater(value),
            Operator::Gte => self.select_greater_or_equal(value),
            Operator::Lt => self.select_less(value),
            Operator::Lte => self.select_less_or_equal(value),
        }
    }
}

// Comparisons skip the NULL block, which sorts before every value
fn null_point() -> RangePoint {
    RangePoint::Value(Value::null_unknown())
}
