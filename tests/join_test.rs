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

//! Natural Join Tests
//!
//! Row arithmetic of cartesian joins, nested joins and join schemes.

use std::sync::Arc;

use proptest::prelude::*;
use stoolap_algebra::{
    Config, DataType, JoinedTable, MemoryTable, NaturallyJoinedTable, Operator, Origin,
    SchemaBuilder, Table, TableAlgebra, TableRef, Value,
};

fn leaf(name: &str, values: &[i64]) -> TableRef {
    let schema = SchemaBuilder::new(name).add("v", DataType::Integer).build();
    values
        .iter()
        .fold(MemoryTable::builder(schema), |b, v| b.row([*v]))
        .build()
        .expect("Failed to build table")
        .into_ref()
}

fn int(table: &dyn Table, column: usize, row: usize) -> i64 {
    table
        .cell(column, row)
        .expect("cell")
        .as_int64()
        .expect("integer cell")
}

#[test]
fn test_join_schema_and_cells() {
    let a = leaf("a", &[1, 2]);
    let b = leaf("b", &[10, 20, 30]);
    let joined = NaturallyJoinedTable::new(a, b, true).unwrap();

    assert_eq!(joined.row_count(), 6);
    assert_eq!(joined.column_count(), 2);
    assert_eq!(joined.find_field_name(&"a.v".into()), Some(0));
    assert_eq!(joined.find_field_name(&"b.v".into()), Some(1));

    let rows: Vec<(i64, i64)> = (0..6)
        .map(|r| (int(&joined, 0, r), int(&joined, 1, r)))
        .collect();
    assert_eq!(
        rows,
        vec![(1, 10), (1, 20), (1, 30), (2, 10), (2, 20), (2, 30)]
    );
    assert!(joined.cell(2, 0).unwrap_err().is_out_of_bounds());
    assert!(joined.resolve_row_for_table(0, 2).unwrap_err().is_out_of_bounds());
}

#[test]
fn test_join_over_selection() {
    let algebra = TableAlgebra::default();
    let a = leaf("a", &[5, 6, 7, 8]);
    let picked = algebra
        .select_rows(&a, 0, Operator::Gte, &Value::integer(7))
        .unwrap();
    let b = leaf("b", &[0, 1]);
    let joined = algebra.join(&picked, &b).unwrap();

    assert_eq!(joined.row_count(), 4);
    assert_eq!(int(&*joined, 0, 0), 7);
    assert_eq!(int(&*joined, 0, 3), 8);
    assert_eq!(int(&*joined, 1, 3), 1);
}

#[test]
fn test_nested_join_maps_to_ancestors() {
    let algebra = TableAlgebra::default();
    let a = leaf("a", &[1, 2]);
    let b = leaf("b", &[3, 4]);
    let c = leaf("c", &[5, 6]);
    let ab = algebra.join(&a, &b).unwrap();
    let abc = algebra.join(&ab, &c).unwrap();
    assert_eq!(abc.row_count(), 8);

    // row 5 = ab row 2 (a row 1, b row 0) x c row 1
    assert_eq!(int(&*abc, 0, 5), 2);
    assert_eq!(int(&*abc, 1, 5), 3);
    assert_eq!(int(&*abc, 2, 5), 6);

    let mut rows = vec![5, 0];
    abc.to_ancestor_domain(1, &mut rows, b.id()).unwrap();
    assert_eq!(rows, vec![0, 0]);

    let mut rows = vec![5];
    assert!(abc.to_ancestor_domain(2, &mut rows, a.id()).is_err());
}

#[test]
fn test_join_scheme_orders_by_source() {
    let algebra = TableAlgebra::default();
    let a = leaf("a", &[3, 1, 2]);
    let b = leaf("b", &[9, 8]);
    let joined = algebra.join(&a, &b).unwrap();

    let by_b = joined.scheme(1, Origin::Here).unwrap();
    let rows = by_b.select_equal(&Value::integer(8)).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|&r| int(&*joined, 1, r) == 8));

    let sorted = algebra.select_all(&joined, 0).unwrap();
    let values: Vec<i64> = (0..sorted.row_count()).map(|r| int(&*sorted, 0, r)).collect();
    assert_eq!(values, vec![1, 1, 2, 2, 3, 3]);
}

#[test]
fn test_join_with_empty_side() {
    let algebra = TableAlgebra::default();
    let a = leaf("a", &[1, 2]);
    let empty = leaf("e", &[]);
    assert_eq!(algebra.join(&a, &empty).unwrap().row_count(), 0);
    assert_eq!(algebra.join(&empty, &a).unwrap().row_count(), 0);
}

proptest! {
    #[test]
    fn prop_join_row_laws(
        left in prop::collection::vec(any::<i64>(), 0..8),
        right in prop::collection::vec(any::<i64>(), 1..8),
        materialized in any::<bool>(),
    ) {
        let config = if materialized { Config::materialized() } else { Config::new() };
        let l = leaf("l", &left);
        let r = leaf("r", &right);
        let joined = NaturallyJoinedTable::new(l, r, config.identity_enumeration).unwrap();

        prop_assert_eq!(joined.row_count(), left.len() * right.len());
        for n in 0..joined.row_count() {
            prop_assert_eq!(joined.resolve_row_for_table(n, 0).unwrap(), n / right.len());
            prop_assert_eq!(joined.resolve_row_for_table(n, 1).unwrap(), n % right.len());
            prop_assert_eq!(int(&joined, 0, n), left[n / right.len()]);
            prop_assert_eq!(int(&joined, 1, n), right[n % right.len()]);
        }

        let mut bulk: Vec<usize> = (0..joined.row_count()).collect();
        joined.resolve_all_rows_for_table(&mut bulk, 1).unwrap();
        let expected: Vec<usize> = (0..joined.row_count()).map(|n| n % right.len()).collect();
        prop_assert_eq!(bulk, expected);
    }

    #[test]
    fn prop_join_over_visible_rows(
        values in prop::collection::vec(0i64..100, 1..10),
        right in prop::collection::vec(0i64..100, 1..5),
    ) {
        let schema = SchemaBuilder::new("l").add("v", DataType::Integer).build();
        let base = values
            .iter()
            .fold(MemoryTable::builder(schema), |b, v| b.row([*v]))
            .build()
            .unwrap();
        let visible: Vec<usize> = (0..values.len()).rev().step_by(2).collect();
        let view: TableRef = Arc::new(base.with_visible_rows(visible.clone()).unwrap());
        let joined = NaturallyJoinedTable::new(view, leaf("r", &right), true).unwrap();

        prop_assert_eq!(joined.row_count(), visible.len() * right.len());
        for n in 0..joined.row_count() {
            prop_assert_eq!(joined.resolve_row_for_table(n, 0).unwrap(), visible[n / right.len()]);
        }
    }
}
