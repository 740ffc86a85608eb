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

//! Core types and definitions
//!
//! - [`DataType`] - SQL data types (INTEGER, TEXT, FLOAT, etc.)
//! - [`Operator`] - Comparison operators (=, <>, >, <, etc.)
//! - [`Quantifier`] - ANY / ALL
//! - [`CompositeFunction`] - UNION / INTERSECT / EXCEPT
//! - [`Value`] - Cell values with type information
//! - [`Schema`] - Column definitions of a table
//! - [`Error`] - Error type for every operation

pub mod error;
pub mod schema;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use schema::{ColumnName, Schema, SchemaBuilder, SchemaColumn};
pub use types::{CompositeFunction, DataType, Operator, Quantifier};
pub use value::Value;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::cmp::Ordering;

    /// Schema qualifiers survive a rename followed by a subset
    #[test]
    fn test_schema_rename_then_subset() {
        let schema = SchemaBuilder::new("employees")
            .add("id", DataType::Integer)
            .add("manager_id", DataType::Integer)
            .add("name", DataType::Text)
            .build();

        let boss = schema.renamed("boss");
        let picked = boss
            .subset(&[2, 0], &["boss_name".into(), "boss_id".into()])
            .unwrap();

        assert_eq!(picked.find_column(&"boss.boss_name".into()), Some(0));
        assert_eq!(picked.find_column(&"boss_id".into()), Some(1));
        assert_eq!(picked.columns[1].data_type, DataType::Integer);
    }

    /// Collation order agrees with SQL comparison on non-NULL values
    #[test]
    fn test_value_orderings_agree() {
        let values = [
            Value::integer(-3),
            Value::float(-2.5),
            Value::integer(0),
            Value::float(0.5),
            Value::integer(10),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(a.cmp(b), a.compare(b).unwrap());
            }
        }
        assert_eq!(
            Value::null(DataType::Integer).cmp(&Value::integer(i64::MIN)),
            Ordering::Less
        );
    }

    /// Error classification used by plan evaluators
    #[test]
    fn test_error_integration() {
        let err = "FULL OUTER".parse::<CompositeFunction>().unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(!err.is_out_of_bounds());

        let err = Schema::default().column(0).unwrap_err();
        assert!(err.is_out_of_bounds());
    }
}
