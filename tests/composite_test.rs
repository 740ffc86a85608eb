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

//! Composite Table Tests
//!
//! UNION, INTERSECT and EXCEPT over same-shaped tables, and the shape checks
//! that guard them.

use stoolap_algebra::{
    CompositeFunction, CompositeTable, Config, DataType, DedupStrategy, Error, MemoryTable,
    SchemaBuilder, Table, TableAlgebra, TableRef, Value,
};

fn pairs(name: &str, rows: &[(i64, &str)]) -> TableRef {
    let schema = SchemaBuilder::new(name)
        .add("id", DataType::Integer)
        .add("tag", DataType::Text)
        .build();
    rows.iter()
        .fold(MemoryTable::builder(schema), |b, (id, tag)| {
            b.row([Value::integer(*id), Value::text(tag)])
        })
        .build()
        .expect("Failed to build table")
        .into_ref()
}

fn rows_of(table: &TableRef) -> Vec<(i64, String)> {
    let mut rows: Vec<(i64, String)> = (0..table.row_count())
        .map(|r| {
            (
                table.cell(0, r).unwrap().as_int64().unwrap(),
                table.cell(1, r).unwrap().as_str().unwrap().to_string(),
            )
        })
        .collect();
    rows.sort();
    rows
}

#[test]
fn test_union_removes_duplicate_rows() {
    let a = pairs("a", &[(1, "x"), (2, "y"), (1, "x")]);
    let b = pairs("b", &[(2, "y"), (2, "z")]);

    for config in [Config::new(), Config::ordered()] {
        let algebra = TableAlgebra::new(config);
        let union = algebra.union(vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(
            rows_of(&union),
            vec![(1, "x".into()), (2, "y".into()), (2, "z".into())]
        );
    }

    let all = TableAlgebra::default().union_all(vec![a, b]).unwrap();
    assert_eq!(all.row_count(), 5);
}

#[test]
fn test_union_takes_first_source_names() {
    let a = pairs("a", &[(1, "x")]);
    let b = pairs("b", &[(2, "y")]);
    let union = TableAlgebra::default().union_all(vec![a, b]).unwrap();
    assert_eq!(union.find_field_name(&"a.tag".into()), Some(1));
    assert_eq!(union.find_field_name(&"b.tag".into()), None);
}

#[test]
fn test_intersect_and_except_chain() {
    let algebra = TableAlgebra::default();
    let a = pairs("a", &[(1, "x"), (2, "y"), (3, "z")]);
    let b = pairs("b", &[(2, "y"), (3, "z"), (4, "w")]);
    let c = pairs("c", &[(3, "z")]);

    let both = algebra.intersect(vec![a.clone(), b.clone(), c], false).unwrap();
    assert_eq!(rows_of(&both), vec![(3, "z".into())]);

    let only_a = algebra.except(vec![a, b], false).unwrap();
    assert_eq!(rows_of(&only_a), vec![(1, "x".into())]);
}

#[test]
fn test_remove_duplicates_never_grows() {
    let a = pairs("a", &[(1, "x"), (1, "x"), (1, "x")]);
    let b = pairs("b", &[(1, "x")]);
    let union = CompositeTable::new(vec![a, b]).unwrap();
    for strategy in [DedupStrategy::Hash, DedupStrategy::Sort] {
        let distinct = union.remove_duplicates(strategy).unwrap();
        assert_eq!(distinct.row_count(), 1);
        assert!(distinct.row_count() <= union.row_count());
    }
}

#[test]
fn test_shape_checks() {
    let a = pairs("a", &[(1, "x")]);
    let narrow = {
        let schema = SchemaBuilder::new("n").add("id", DataType::Integer).build();
        MemoryTable::builder(schema).row([1]).build().unwrap().into_ref()
    };
    let err = TableAlgebra::default()
        .union(vec![a.clone(), narrow])
        .unwrap_err();
    assert_eq!(err, Error::table_columns_not_match(2, 1));

    let err = "CROSS".parse::<CompositeFunction>().unwrap_err();
    assert!(err.is_invariant_violation());
    assert!(matches!(err, Error::UnknownCompositeFunction(_)));
    assert_eq!(
        "intersect".parse::<CompositeFunction>().unwrap(),
        CompositeFunction::Intersect
    );
}

#[test]
fn test_composite_of_composites() {
    let algebra = TableAlgebra::default();
    let a = pairs("a", &[(1, "x")]);
    let b = pairs("b", &[(2, "y")]);
    let c = pairs("c", &[(1, "x"), (3, "z")]);
    let ab = algebra.union_all(vec![a, b]).unwrap();
    let abc = algebra.union(vec![ab, c]).unwrap();
    assert_eq!(
        rows_of(&abc),
        vec![(1, "x".into()), (2, "y".into()), (3, "z".into())]
    );
}
