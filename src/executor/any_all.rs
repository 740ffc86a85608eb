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

//! Quantified comparisons against a non-correlated sub-query
//!
//! `left op ANY (right)` and `left op ALL (right)` reduce to a single range
//! selection on the left column against an extreme value of the right
//! column, or to IN / NOT IN for equality operators.

use ahash::AHashSet;
use tracing::trace;

use crate::core::{Error, Operator, Quantifier, Result, Value};
use crate::storage::traits::{Origin, Table};

use super::membership::{in_rows, not_in_rows, single_column};

/// Outcome of a quantified comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantifiedSelection {
    /// Every left row, unchanged
    Whole,
    /// These physical left rows
    Rows(Vec<usize>),
}

impl QuantifiedSelection {
    /// Rows of a left table enumerating `all`
    pub fn into_rows(self, all: impl FnOnce() -> Vec<usize>) -> Vec<usize> {
        match self {
            QuantifiedSelection::Whole => all(),
            QuantifiedSelection::Rows(rows) => rows,
        }
    }
}

// Non-NULL values of the right column, reduced to what the operators need
struct RightSummary {
    min: Value,
    max: Value,
    // the only distinct value, if there is exactly one
    single: Option<Value>,
}

impl RightSummary {
    fn collect(table: &dyn Table, column: usize) -> Result<Option<Self>> {
        let mut distinct: AHashSet<Value> = AHashSet::new();
        let mut bounds: Option<(Value, Value)> = None;
        for row in table.rows().iter() {
            let value = table.cell(column, row)?;
            if value.is_null() {
                continue;
            }
            if distinct.len() < 2 {
                distinct.insert(value.clone());
            }
            bounds = Some(match bounds {
                None => (value.clone(), value),
                Some((min, max)) => {
                    if value.cmp(&min).is_lt() {
                        (value, max)
                    } else if value.cmp(&max).is_gt() {
                        (min, value)
                    } else {
                        (min, max)
                    }
                }
            });
        }
        Ok(bounds.map(|(min, max)| {
            let single = if distinct.len() == 1 {
                Some(min.clone())
            } else {
                None
            };
            Self { min, max, single }
        }))
    }
}

/// Left rows satisfying `left op quantifier (right)`
pub fn any_all_rows(
    left: &dyn Table,
    left_columns: &[usize],
    op: Operator,
    quantifier: Quantifier,
    right: &dyn Table,
    right_columns: &[usize],
    accumulator_capacity: usize,
) -> Result<QuantifiedSelection> {
    if right_columns.len() != left_columns.len() {
        return Err(Error::table_columns_not_match(
            left_columns.len(),
            right_columns.len(),
        ));
    }
    let left_column = single_column(left_columns, "left")?;
    let right_column = single_column(right_columns, "right")?;

    if left.row_count() == 0 {
        return Ok(QuantifiedSelection::Whole);
    }
    if right.row_count() == 0 {
        return Ok(match quantifier {
            Quantifier::All => QuantifiedSelection::Whole,
            Quantifier::Any => QuantifiedSelection::Rows(Vec::new()),
        });
    }

    // IN / NOT IN read the right side themselves
    match (quantifier, op) {
        (Quantifier::Any, Operator::Eq) => {
            return in_rows(left, left_columns, right, right_columns, accumulator_capacity)
                .map(QuantifiedSelection::Rows);
        }
        (Quantifier::All, Operator::Ne) => {
            return not_in_rows(left, left_columns, right, right_columns)
                .map(QuantifiedSelection::Rows);
        }
        _ => {}
    }

    let Some(summary) = RightSummary::collect(right, right_column)? else {
        return Ok(QuantifiedSelection::Rows(Vec::new()));
    };
    trace!(
        %op,
        %quantifier,
        min = %summary.min,
        max = %summary.max,
        "quantified comparison"
    );

    let scheme = left.scheme(left_column, Origin::Here)?;
    let rows = match (quantifier, op) {
        (Quantifier::All, Operator::Gt | Operator::Gte) => {
            scheme.select_operator(op, &summary.max)?
        }
        (Quantifier::All, Operator::Lt | Operator::Lte) => {
            scheme.select_operator(op, &summary.min)?
        }
        (Quantifier::All, Operator::Eq) => match &summary.single {
            Some(value) => scheme.select_equal(value)?,
            None => Vec::new(),
        },
        (Quantifier::Any, Operator::Gt | Operator::Gte) => {
            scheme.select_operator(op, &summary.min)?
        }
        (Quantifier::Any, Operator::Lt | Operator::Lte) => {
            scheme.select_operator(op, &summary.max)?
        }
        (Quantifier::Any, Operator::Ne) => match &summary.single {
            Some(value) => scheme.select_not_equal(value)?,
            None => return Ok(QuantifiedSelection::Whole),
        },
        (Quantifier::Any, Operator::Eq) | (Quantifier::All, Operator::Ne) => {
            return Err(Error::internal("equality quantifier was not resolved"));
        }
    };
    Ok(QuantifiedSelection::Rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, SchemaBuilder};
    use crate::storage::MemoryTable;

    fn leaf(values: &[Option<i64>]) -> MemoryTable {
        let schema = SchemaBuilder::new("t")
            .add_nullable("v", DataType::Integer)
            .build();
        values
            .iter()
            .fold(MemoryTable::builder(schema), |b, v| b.row([Value::from(*v)]))
            .build()
            .unwrap()
    }

    fn ints(values: &[i64]) -> MemoryTable {
        leaf(&values.iter().copied().map(Some).collect::<Vec<_>>())
    }

    fn run(op: Operator, quantifier: Quantifier, left: &MemoryTable, right: &MemoryTable) -> QuantifiedSelection {
        any_all_rows(left, &[0], op, quantifier, right, &[0], 16).unwrap()
    }

    fn rows(selection: QuantifiedSelection) -> Vec<usize> {
        let mut rows = selection.into_rows(Vec::new);
        rows.sort_unstable();
        rows
    }

    #[test]
    fn test_all_uses_extremes() {
        let left = ints(&[1, 5, 10, 15]);
        let right = ints(&[4, 10, 7]);
        assert_eq!(rows(run(Operator::Gt, Quantifier::All, &left, &right)), vec![3]);
        assert_eq!(rows(run(Operator::Gte, Quantifier::All, &left, &right)), vec![2, 3]);
        assert_eq!(rows(run(Operator::Lt, Quantifier::All, &left, &right)), vec![0]);
        assert_eq!(rows(run(Operator::Ne, Quantifier::All, &left, &right)), vec![0, 1, 3]);
        assert_eq!(rows(run(Operator::Eq, Quantifier::All, &left, &right)), Vec::<usize>::new());
    }

    #[test]
    fn test_any_uses_extremes() {
        let left = ints(&[1, 5, 10, 15]);
        let right = ints(&[4, 10, 7]);
        assert_eq!(rows(run(Operator::Gt, Quantifier::Any, &left, &right)), vec![1, 2, 3]);
        assert_eq!(rows(run(Operator::Lte, Quantifier::Any, &left, &right)), vec![0, 1, 2]);
        assert_eq!(rows(run(Operator::Eq, Quantifier::Any, &left, &right)), vec![2]);
        assert_eq!(run(Operator::Ne, Quantifier::Any, &left, &right), QuantifiedSelection::Whole);
    }

    #[test]
    fn test_single_distinct_value() {
        let left = ints(&[3, 4, 3]);
        let right = ints(&[3, 3]);
        assert_eq!(rows(run(Operator::Eq, Quantifier::All, &left, &right)), vec![0, 2]);
        assert_eq!(rows(run(Operator::Ne, Quantifier::Any, &left, &right)), vec![1]);
    }

    #[test]
    fn test_empty_operands() {
        let left = ints(&[1, 2]);
        let empty = ints(&[]);
        assert_eq!(run(Operator::Gt, Quantifier::All, &left, &empty), QuantifiedSelection::Whole);
        assert_eq!(
            run(Operator::Gt, Quantifier::Any, &left, &empty),
            QuantifiedSelection::Rows(Vec::new())
        );
        assert_eq!(run(Operator::Gt, Quantifier::Any, &empty, &left), QuantifiedSelection::Whole);
    }

    #[test]
    fn test_null_only_right_side() {
        let left = ints(&[1, 2]);
        let nulls = leaf(&[None, None]);
        assert_eq!(
            run(Operator::Lt, Quantifier::All, &left, &nulls),
            QuantifiedSelection::Rows(Vec::new())
        );
    }

    #[test]
    fn test_arity_checked() {
        let left = ints(&[1]);
        let err = any_all_rows(&left, &[0], Operator::Gt, Quantifier::All, &left, &[0, 0], 16)
            .unwrap_err();
        assert_eq!(err, Error::table_columns_not_match(1, 2));
        let err = any_all_rows(&left, &[0, 0], Operator::Gt, Quantifier::All, &left, &[0, 0], 16)
            .unwrap_err();
        assert!(matches!(err, Error::NotSupported(_)));
    }
}
