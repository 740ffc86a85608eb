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

//! Range Search Tests
//!
//! Range selection over collated and blind columns, including the set
//! sentinels, inclusive/exclusive endpoints and NULL handling.

use proptest::prelude::*;
use stoolap_algebra::{
    CompositeTable, DataType, EndFlag, MemoryTable, Origin, RangePoint, SchemaBuilder,
    SelectableRange, SelectableScheme, StartFlag, Table, TableAlgebra, TableRef, Value,
};

fn column_table(values: &[Option<i64>]) -> MemoryTable {
    let schema = SchemaBuilder::new("t")
        .add_nullable("v", DataType::Integer)
        .build();
    values
        .iter()
        .fold(MemoryTable::builder(schema), |b, v| b.row([Value::from(*v)]))
        .build()
        .expect("Failed to build table")
}

fn ints(values: &[i64]) -> MemoryTable {
    column_table(&values.iter().copied().map(Some).collect::<Vec<_>>())
}

fn range(start_flag: StartFlag, start: i64, end_flag: EndFlag, end: i64) -> SelectableRange {
    SelectableRange::new(
        start_flag,
        Value::integer(start),
        end_flag,
        Value::integer(end),
    )
}

// ============================================================================
// Fixed cases
// ============================================================================

#[test]
fn test_equal_range_over_duplicates() {
    let t = ints(&[10, 20, 20, 30]);
    let scheme = t.scheme(0, Origin::Here).unwrap();

    let rows = scheme
        .select_range(&range(StartFlag::FirstValue, 20, EndFlag::LastValue, 20))
        .unwrap();
    assert_eq!(rows, vec![1, 2]);

    assert_eq!(scheme.search_first(&Value::integer(20)).unwrap(), 1);
    assert_eq!(scheme.search_last(&Value::integer(20)).unwrap(), 2);
    assert_eq!(scheme.search_first(&Value::integer(25)).unwrap(), -4);
    assert_eq!(scheme.search_first(&Value::integer(5)).unwrap(), -1);
}

#[test]
fn test_exclusive_endpoints() {
    let t = ints(&[10, 20, 20, 30]);
    let scheme = t.scheme(0, Origin::Here).unwrap();

    let open = range(StartFlag::AfterLastValue, 10, EndFlag::BeforeFirstValue, 30);
    assert_eq!(scheme.select_range(&open).unwrap(), vec![1, 2]);

    let empty = range(StartFlag::AfterLastValue, 20, EndFlag::BeforeFirstValue, 30);
    assert!(scheme.select_range(&empty).unwrap().is_empty());

    // end before start selects nothing
    let inverted = range(StartFlag::FirstValue, 30, EndFlag::LastValue, 10);
    assert!(scheme.select_range(&inverted).unwrap().is_empty());

    // endpoints between stored values
    let between = range(StartFlag::FirstValue, 15, EndFlag::LastValue, 25);
    assert_eq!(scheme.select_range(&between).unwrap(), vec![1, 2]);
}

#[test]
fn test_sentinels() {
    let t = ints(&[30, 10, 20, 20]);
    let scheme = t.scheme(0, Origin::Here).unwrap();

    let everything = SelectableRange::new(
        StartFlag::FirstValue,
        RangePoint::FirstInSet,
        EndFlag::LastValue,
        RangePoint::LastInSet,
    );
    assert_eq!(
        scheme.select_range(&everything).unwrap(),
        scheme.select_all().unwrap()
    );
    assert_eq!(SelectableRange::full(), everything);

    assert_eq!(scheme.select_first().unwrap(), vec![1]);
    assert_eq!(scheme.select_last().unwrap(), vec![0]);

    let after_first = SelectableRange::new(
        StartFlag::AfterLastValue,
        RangePoint::FirstInSet,
        EndFlag::LastValue,
        RangePoint::LastInSet,
    );
    assert_eq!(scheme.select_range(&after_first).unwrap(), vec![2, 3, 0]);
}

#[test]
fn test_empty_column_selects_nothing() {
    let t = ints(&[]);
    let scheme = t.scheme(0, Origin::Here).unwrap();
    assert_eq!(scheme.set_size().unwrap(), 0);
    assert!(scheme.select_all().unwrap().is_empty());
    assert!(scheme.select_first().unwrap().is_empty());
    assert!(scheme
        .select_range(&SelectableRange::full())
        .unwrap()
        .is_empty());
    assert_eq!(scheme.search_first(&Value::integer(1)).unwrap(), -1);
}

#[test]
fn test_nulls_sort_first_and_never_compare() {
    let t = column_table(&[Some(2), None, Some(1), None]);
    let scheme = t.scheme(0, Origin::Here).unwrap();

    assert_eq!(scheme.select_all().unwrap(), vec![1, 3, 2, 0]);
    assert_eq!(scheme.select_all_non_null().unwrap(), vec![2, 0]);
    assert_eq!(scheme.select_less(&Value::integer(5)).unwrap(), vec![2, 0]);
    assert_eq!(scheme.select_not_equal(&Value::integer(1)).unwrap(), vec![0]);
    assert!(scheme.select_equal(&Value::null_unknown()).unwrap().is_empty());
    assert!(scheme.select_greater(&Value::null(DataType::Integer)).unwrap().is_empty());
}

#[test]
fn test_leading_null_block() {
    let t = column_table(&[None, None, None, Some(1), Some(2), Some(3)]);
    let scheme = t.scheme(0, Origin::Here).unwrap();

    assert_eq!(scheme.search_first(&Value::integer(1)).unwrap(), 3);
    assert_eq!(scheme.search_last(&Value::integer(3)).unwrap(), 5);
    assert_eq!(scheme.search_first(&Value::integer(0)).unwrap(), -4);
    assert_eq!(scheme.select_equal(&Value::integer(1)).unwrap(), vec![3]);
    assert_eq!(scheme.select_less(&Value::integer(3)).unwrap(), vec![3, 4]);
    assert_eq!(scheme.select_greater_or_equal(&Value::integer(2)).unwrap(), vec![4, 5]);
    assert_eq!(scheme.select_not_equal(&Value::integer(2)).unwrap(), vec![3, 5]);
}

#[test]
fn test_derived_scheme_over_nullable_column() {
    let algebra = TableAlgebra::default();
    let t = column_table(&[Some(2), None, Some(1), None, Some(3)]).into_ref();

    let selected = algebra.select(&t, vec![0, 1, 2, 4]);
    let scheme = selected.scheme(0, Origin::Here).unwrap();
    assert_eq!(scheme.select_all().unwrap(), vec![1, 2, 0, 3]);
    assert_eq!(scheme.select_equal(&Value::integer(1)).unwrap(), vec![2]);
    assert_eq!(scheme.select_less(&Value::integer(3)).unwrap(), vec![2, 0]);
    assert_eq!(scheme.select_all_non_null().unwrap(), vec![2, 0, 3]);

    let joined = algebra.join(&selected, &ints(&[7]).into_ref()).unwrap();
    let scheme = joined.scheme(0, Origin::Here).unwrap();
    assert_eq!(scheme.select_greater(&Value::integer(1)).unwrap(), vec![0, 3]);
}

#[test]
fn test_overlapping_ranges_keep_duplicates() {
    let t = ints(&[1, 2, 3, 4]);
    let scheme = t.scheme(0, Origin::Here).unwrap();
    let rows = scheme
        .select_ranges(&[
            range(StartFlag::FirstValue, 1, EndFlag::LastValue, 3),
            range(StartFlag::FirstValue, 2, EndFlag::LastValue, 4),
        ])
        .unwrap();
    assert_eq!(rows, vec![0, 1, 2, 1, 2, 3]);
}

#[test]
fn test_collated_schemes_reject_notifications() {
    let t = ints(&[1]);
    let scheme = t.scheme(0, Origin::Here).unwrap();
    assert!(scheme.is_immutable());
    assert!(scheme.insert(0).is_err());
    assert!(scheme.remove(0).is_err());
}

#[test]
fn test_blind_search_matches_collated_search() {
    let a: TableRef = ints(&[5, 1, 9]).into_ref();
    let b: TableRef = ints(&[3, 7]).into_ref();
    let composite = CompositeTable::new(vec![a, b]).unwrap();
    let blind = composite.scheme(0, Origin::Here).unwrap();

    let flat = ints(&[5, 1, 9, 3, 7]);
    let collated = flat.scheme(0, Origin::Here).unwrap();

    let r = range(StartFlag::FirstValue, 3, EndFlag::BeforeFirstValue, 9);
    assert_eq!(
        blind.select_range(&r).unwrap(),
        collated.select_range(&r).unwrap()
    );
    assert!(!blind.is_immutable());
}

// ============================================================================
// Properties
// ============================================================================

// NULLs order before every integer, the same way `None < Some(_)` does
fn brute_force(
    values: &[Option<i64>],
    low: i64,
    low_inclusive: bool,
    high: i64,
    high_inclusive: bool,
) -> Vec<Option<i64>> {
    let (low, high) = (Some(low), Some(high));
    let mut selected: Vec<Option<i64>> = values
        .iter()
        .copied()
        .filter(|&v| if low_inclusive { v >= low } else { v > low })
        .filter(|&v| if high_inclusive { v <= high } else { v < high })
        .collect();
    selected.sort_unstable();
    selected
}

fn cell_value(t: &MemoryTable, row: usize) -> Option<i64> {
    t.cell(0, row).unwrap().as_int64()
}

proptest! {
    #[test]
    fn prop_range_selection_is_total_and_exact(
        values in prop::collection::vec(prop::option::weighted(0.8, -20i64..20), 0..40),
        low in -25i64..25,
        high in -25i64..25,
        low_inclusive in any::<bool>(),
        high_inclusive in any::<bool>(),
    ) {
        let t = column_table(&values);
        let scheme = t.scheme(0, Origin::Here).unwrap();
        let start_flag = if low_inclusive { StartFlag::FirstValue } else { StartFlag::AfterLastValue };
        let end_flag = if high_inclusive { EndFlag::LastValue } else { EndFlag::BeforeFirstValue };

        let rows = scheme.select_range(&range(start_flag, low, end_flag, high)).unwrap();
        let selected: Vec<Option<i64>> = rows.iter().map(|&r| cell_value(&t, r)).collect();

        // results come back in value order
        prop_assert!(selected.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(selected, brute_force(&values, low, low_inclusive, high, high_inclusive));
    }

    #[test]
    fn prop_full_range_and_non_null_partition_rows(
        values in prop::collection::vec(prop::option::weighted(0.6, -5i64..5), 0..30),
    ) {
        let t = column_table(&values);
        let scheme = t.scheme(0, Origin::Here).unwrap();

        let mut all = scheme.select_all().unwrap();
        let collated: Vec<Option<i64>> = all.iter().map(|&r| cell_value(&t, r)).collect();
        prop_assert!(collated.windows(2).all(|w| w[0] <= w[1]));
        all.sort_unstable();
        prop_assert_eq!(all, (0..values.len()).collect::<Vec<_>>());

        let non_null = scheme.select_all_non_null().unwrap();
        prop_assert_eq!(non_null.len(), values.iter().filter(|v| v.is_some()).count());
    }

    #[test]
    fn prop_search_first_encodes_insertion_point(
        values in prop::collection::vec(-10i64..10, 0..30),
        needle in -12i64..12,
    ) {
        let t = ints(&values);
        let scheme = t.scheme(0, Origin::Here).unwrap();
        let mut sorted = values.clone();
        sorted.sort_unstable();
        let position = scheme.search_first(&Value::integer(needle)).unwrap();
        let lower = sorted.partition_point(|&v| v < needle);
        if sorted.contains(&needle) {
            prop_assert_eq!(position, lower as isize);
        } else {
            prop_assert_eq!(position, -(lower as isize + 1));
        }
    }
}
