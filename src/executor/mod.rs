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

//! Table algebra executor
//!
//! [`TableAlgebra`] is the entry point a query plan evaluator uses to build
//! derived tables. Every operation returns a new table over its inputs
//! without copying cells:
//!
//! ```text
//! MemoryTable ──select_rows──▶ RowSetTable ──join──▶ NaturallyJoinedTable
//!                                   │                      │
//!                                   └──in_ / not_in        └──select──▶ RowSetTable ──outer──▶ OuterTable
//! ```
//!
//! # Components
//!
//! - [`TableAlgebra`] - construction entry points, configured by [`Config`]
//! - [`membership`] - IN / NOT IN row resolution
//! - [`any_all`] - quantified comparisons against a sub-query

pub mod any_all;
pub mod membership;

mod set_ops;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::{ColumnName, Operator, Quantifier, Result, Value};
use crate::storage::config::Config;
use crate::storage::scheme::SelectableRange;
use crate::storage::traits::{Origin, Table, TableRef};
use crate::table::{
    NaturallyJoinedTable, OuterTable, ReferenceTable, RowSetTable, SubsetColumnTable,
};

pub use any_all::{any_all_rows, QuantifiedSelection};
pub use membership::{in_rows, not_in_rows};

/// Builds derived tables
#[derive(Debug, Clone, Default)]
pub struct TableAlgebra {
    config: Config,
}

impl TableAlgebra {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Cartesian product of `left` and `right`
    pub fn join(&self, left: &TableRef, right: &TableRef) -> Result<TableRef> {
        let joined = NaturallyJoinedTable::new(
            left.clone(),
            right.clone(),
            self.config.identity_enumeration,
        )?;
        trace!(
            left_rows = left.row_count(),
            right_rows = right.row_count(),
            identity_enumeration = self.config.identity_enumeration,
            "natural join"
        );
        Ok(Arc::new(joined))
    }

    /// The given physical rows of `table`, in that order
    pub fn select(&self, table: &TableRef, rows: Vec<usize>) -> TableRef {
        Arc::new(RowSetTable::from_selection(table.clone(), rows))
    }

    /// Every row of `table`, ordered by `column`
    pub fn select_all(&self, table: &TableRef, column: usize) -> Result<TableRef> {
        let rows = table.scheme(column, Origin::Here)?.select_all()?;
        Ok(self.select(table, rows))
    }

    pub fn select_range(
        &self,
        table: &TableRef,
        column: usize,
        range: &SelectableRange,
    ) -> Result<TableRef> {
        let rows = table.scheme(column, Origin::Here)?.select_range(range)?;
        trace!(%range, rows = rows.len(), "range selection");
        Ok(self.select(table, rows))
    }

    /// Rows in any of `ranges`; a row in two overlapping ranges appears twice
    pub fn select_ranges(
        &self,
        table: &TableRef,
        column: usize,
        ranges: &[SelectableRange],
    ) -> Result<TableRef> {
        let rows = table.scheme(column, Origin::Here)?.select_ranges(ranges)?;
        Ok(self.select(table, rows))
    }

    /// Rows where `column <op> value`
    pub fn select_rows(
        &self,
        table: &TableRef,
        column: usize,
        op: Operator,
        value: &Value,
    ) -> Result<TableRef> {
        let rows = table
            .scheme(column, Origin::Here)?
            .select_operator(op, value)?;
        trace!(%op, %value, rows = rows.len(), "operator selection");
        Ok(self.select(table, rows))
    }

    /// `table` under the name `name`
    pub fn rename(&self, table: &TableRef, name: impl Into<String>) -> TableRef {
        Arc::new(ReferenceTable::new(table.clone(), name))
    }

    /// Columns `column_map` of `table`, named `aliases`
    pub fn subset(
        &self,
        table: &TableRef,
        column_map: Vec<usize>,
        aliases: Vec<ColumnName>,
    ) -> Result<TableRef> {
        Ok(Arc::new(SubsetColumnTable::new(
            table.clone(),
            column_map,
            aliases,
        )?))
    }

    /// `base` followed by every row of each of `merges`
    pub fn outer(&self, base: &TableRef, merges: &[TableRef]) -> Result<TableRef> {
        let builder = merges
            .iter()
            .try_fold(OuterTable::builder(base)?, |builder, merge| {
                builder.merge_in(merge)
            })?;
        let table = builder.build();
        debug!(
            base_rows = table.base_row_count(),
            rows = table.row_count(),
            segments = merges.len(),
            "outer table"
        );
        Ok(Arc::new(table))
    }

    /// Rows of `left` whose value is in `right`
    pub fn in_(
        &self,
        left: &TableRef,
        left_columns: &[usize],
        right: &TableRef,
        right_columns: &[usize],
    ) -> Result<TableRef> {
        let rows = in_rows(
            left.as_ref(),
            left_columns,
            right.as_ref(),
            right_columns,
            self.config.in_accumulator_capacity,
        )?;
        debug!(
            left_rows = left.row_count(),
            right_rows = right.row_count(),
            matched = rows.len(),
            "IN"
        );
        Ok(self.select(left, rows))
    }

    /// Rows of `left` whose value is not in `right`
    pub fn not_in(
        &self,
        left: &TableRef,
        left_columns: &[usize],
        right: &TableRef,
        right_columns: &[usize],
    ) -> Result<TableRef> {
        let rows = not_in_rows(left.as_ref(), left_columns, right.as_ref(), right_columns)?;
        debug!(
            left_rows = left.row_count(),
            right_rows = right.row_count(),
            kept = rows.len(),
            "NOT IN"
        );
        Ok(self.select(left, rows))
    }

    /// Rows of `left` satisfying `left op quantifier (right)`
    ///
    /// Returns `left` itself when every row qualifies.
    pub fn any_all(
        &self,
        left: &TableRef,
        left_columns: &[usize],
        op: Operator,
        quantifier: Quantifier,
        right: &TableRef,
        right_columns: &[usize],
    ) -> Result<TableRef> {
        let selection = any_all_rows(
            left.as_ref(),
            left_columns,
            op,
            quantifier,
            right.as_ref(),
            right_columns,
            self.config.in_accumulator_capacity,
        )?;
        Ok(match selection {
            QuantifiedSelection::Whole => left.clone(),
            QuantifiedSelection::Rows(rows) => self.select(left, rows),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, SchemaBuilder};
    use crate::storage::{MemoryTable, Table};

    fn leaf(name: &str, values: &[i64]) -> TableRef {
        let schema = SchemaBuilder::new(name).add("v", DataType::Integer).build();
        values
            .iter()
            .fold(MemoryTable::builder(schema), |b, v| b.row([*v]))
            .build()
            .unwrap()
            .into_ref()
    }

    fn column(table: &TableRef, column: usize) -> Vec<Value> {
        (0..table.row_count())
            .map(|r| table.cell(column, r).unwrap())
            .collect()
    }

    #[test]
    fn test_select_rows_and_ranges() {
        let algebra = TableAlgebra::default();
        let t = leaf("t", &[10, 20, 20, 30]);

        let eq = algebra
            .select_rows(&t, 0, Operator::Eq, &Value::integer(20))
            .unwrap();
        assert_eq!(eq.row_count(), 2);

        let ranges = [
            SelectableRange::between(None, Some(Value::integer(20))),
            SelectableRange::between(Some(Value::integer(20)), None),
        ];
        let both = algebra.select_ranges(&t, 0, &ranges).unwrap();
        assert_eq!(both.row_count(), 6);

        let ordered = algebra.select_all(&t, 0).unwrap();
        assert_eq!(column(&ordered, 0)[3], Value::integer(30));
    }

    #[test]
    fn test_left_outer_join() {
        let algebra = TableAlgebra::default();
        let left = leaf("l", &[1, 2, 3]);
        let right = leaf("r", &[2, 3, 4]);

        let product = algebra.join(&left, &right).unwrap();
        let matched: Vec<usize> = (0..product.row_count())
            .filter(|&r| product.cell(0, r).unwrap() == product.cell(1, r).unwrap())
            .collect();
        let inner = algebra.select(&product, matched);
        let unmatched = algebra.not_in(&left, &[0], &right, &[0]).unwrap();

        let outer = algebra.outer(&inner, &[unmatched]).unwrap();
        assert_eq!(outer.row_count(), 3);
        assert_eq!(
            column(&outer, 0),
            vec![Value::integer(2), Value::integer(3), Value::integer(1)]
        );
        assert!(outer.cell(1, 2).unwrap().is_null());
        assert!(outer.schema().columns[1].nullable);
    }

    #[test]
    fn test_membership_tables() {
        let algebra = TableAlgebra::default();
        let left = leaf("l", &[1, 2, 3]);
        let right = leaf("r", &[2, 3, 3, 4]);

        let t = algebra.in_(&left, &[0], &right, &[0]).unwrap();
        assert_eq!(column(&t, 0), vec![Value::integer(2), Value::integer(3)]);

        let t = algebra.not_in(&left, &[0], &right, &[0]).unwrap();
        assert_eq!(column(&t, 0), vec![Value::integer(1)]);

        let t = algebra
            .any_all(&left, &[0], Operator::Lt, Quantifier::All, &right, &[0])
            .unwrap();
        assert_eq!(column(&t, 0), vec![Value::integer(1)]);

        let empty = leaf("e", &[]);
        let t = algebra
            .any_all(&left, &[0], Operator::Gt, Quantifier::All, &empty, &[0])
            .unwrap();
        assert_eq!(t.id(), left.id());
    }

    #[test]
    fn test_rename_and_subset() {
        let algebra = TableAlgebra::default();
        let t = leaf("t", &[7]);
        let renamed = algebra.rename(&t, "x");
        assert_eq!(renamed.find_field_name(&"x.v".into()), Some(0));
        let subset = algebra
            .subset(&renamed, vec![0, 0], vec!["a".into(), "b".into()])
            .unwrap();
        assert_eq!(subset.find_field_name(&"b".into()), Some(1));
        assert_eq!(subset.cell(1, 0).unwrap(), Value::integer(7));
        assert!(algebra.subset(&t, vec![3], vec!["z".into()]).is_err());
    }
}
