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

//! Selectable ranges over a collated column
//!
//! A range is two endpoints, each a value or a sentinel, plus a flag per
//! endpoint saying whether the endpoint is inclusive:
//!
//! ```text
//! [20 .. 30]   start FirstValue(20)      end LastValue(30)
//! (20 .. 30)   start AfterLastValue(20)  end BeforeFirstValue(30)
//! ```
//!
//! Sentinels are resolved against the column at search time, so
//! `[FirstInSet .. LastInSet]` selects every row including NULLs.

use std::fmt;

use crate::core::Value;

/// Where a range starts relative to its start point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartFlag {
    /// Start at the first occurrence of the point (inclusive)
    FirstValue,
    /// Start just after the last occurrence of the point (exclusive)
    AfterLastValue,
}

/// Where a range ends relative to its end point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndFlag {
    /// End at the last occurrence of the point (inclusive)
    LastValue,
    /// End just before the first occurrence of the point (exclusive)
    BeforeFirstValue,
}

/// Any endpoint flag, as resolved by
/// [`Collation::position_of_range_point`](super::Collation::position_of_range_point)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeFlag {
    FirstValue,
    LastValue,
    BeforeFirstValue,
    AfterLastValue,
}

impl From<StartFlag> for RangeFlag {
    fn from(flag: StartFlag) -> Self {
        match flag {
            StartFlag::FirstValue => RangeFlag::FirstValue,
            StartFlag::AfterLastValue => RangeFlag::AfterLastValue,
        }
    }
}

impl From<EndFlag> for RangeFlag {
    fn from(flag: EndFlag) -> Self {
        match flag {
            EndFlag::LastValue => RangeFlag::LastValue,
            EndFlag::BeforeFirstValue => RangeFlag::BeforeFirstValue,
        }
    }
}

/// A range endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RangePoint {
    /// The smallest value in the column
    FirstInSet,
    /// The largest value in the column
    LastInSet,
    /// A concrete value (may be NULL, which sorts before everything)
    Value(Value),
}

impl From<Value> for RangePoint {
    fn from(value: Value) -> Self {
        RangePoint::Value(value)
    }
}

impl fmt::Display for RangePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangePoint::FirstInSet => write!(f, "FIRST_IN_SET"),
            RangePoint::LastInSet => write!(f, "LAST_IN_SET"),
            RangePoint::Value(v) => write!(f, "{}", v),
        }
    }
}

/// An immutable range of a collated column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectableRange {
    start_flag: StartFlag,
    start: RangePoint,
    end_flag: EndFlag,
    end: RangePoint,
}

impl SelectableRange {
    /// Create a new range
    pub fn new(
        start_flag: StartFlag,
        start: impl Into<RangePoint>,
        end_flag: EndFlag,
        end: impl Into<RangePoint>,
    ) -> Self {
        Self {
            start_flag,
            start: start.into(),
            end_flag,
            end: end.into(),
        }
    }

    /// Every row of the column, NULLs included
    pub fn full() -> Self {
        Self::new(
            StartFlag::FirstValue,
            RangePoint::FirstInSet,
            EndFlag::LastValue,
            RangePoint::LastInSet,
        )
    }

    /// Every row equal to `value`
    pub fn equal(value: Value) -> Self {
        Self::new(
            StartFlag::FirstValue,
            value.clone(),
            EndFlag::LastValue,
            value,
        )
    }

    /// Every non-NULL row, optionally bounded by `[from` and `to]`
    ///
    /// Convenience for the common `BETWEEN` shape: both bounds inclusive and
    /// NULLs excluded when no lower bound is given.
    pub fn between(from: Option<Value>, to: Option<Value>) -> Self {
        let (start_flag, start) = match from {
            Some(v) => (StartFlag::FirstValue, RangePoint::Value(v)),
            None => (StartFlag::AfterLastValue, RangePoint::Value(Value::null_unknown())),
        };
        let end = to.map_or(RangePoint::LastInSet, RangePoint::Value);
        Self::new(start_flag, start, EndFlag::LastValue, end)
    }

    /// Flag of the start endpoint
    pub fn start_flag(&self) -> StartFlag {
        self.start_flag
    }

    /// Start endpoint
    pub fn start(&self) -> &RangePoint {
        &self.start
    }

    /// Flag of the end endpoint
    pub fn end_flag(&self) -> EndFlag {
        self.end_flag
    }

    /// End endpoint
    pub fn end(&self) -> &RangePoint {
        &self.end
    }
}

impl fmt::Display for SelectableRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = match self.start_flag {
            StartFlag::FirstValue => '[',
            StartFlag::AfterLastValue => '(',
        };
        let close = match self.end_flag {
            EndFlag::LastValue => ']',
            EndFlag::BeforeFirstValue => ')',
        };
        write!(f, "{}{} .. {}{}", open, self.start, self.end, close)
    }
}
