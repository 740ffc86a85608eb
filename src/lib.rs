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

//! # Stoolap Algebra - table algebra and range-indexed selection
//!
//! The relational core of an embedded SQL engine. SQL operators (select,
//! join, union, project, outer join, IN / ANY / ALL) are evaluated as lazy
//! compositions of row-index mappings over physically stored tables. No
//! cell is ever copied: a derived table only knows which rows of its
//! sources it is made of.
//!
//! ## Key Features
//!
//! - **Collated range search** - comparison predicates become contiguous spans of a sorted column
//! - **Derived tables** - row sets, cartesian joins, composites and outer tables
//! - **Column projection** - renamed and aliased column subsets that keep provenance
//! - **Set membership** - IN, NOT IN, ANY and ALL with cardinality-driven probing
//! - **Root locks** - pin the physical rows a plan still reads
//!
//! ## Quick Start
//!
//! ```rust
//! use stoolap_algebra::{
//!     DataType, MemoryTable, Operator, SchemaBuilder, Table, TableAlgebra, Value,
//! };
//!
//! let schema = SchemaBuilder::new("orders")
//!     .add("id", DataType::Integer)
//!     .add("amount", DataType::Integer)
//!     .build();
//! let orders = MemoryTable::builder(schema)
//!     .row([1, 250])
//!     .row([2, 40])
//!     .row([3, 900])
//!     .build()
//!     .unwrap()
//!     .into_ref();
//!
//! let algebra = TableAlgebra::default();
//! let large = algebra
//!     .select_rows(&orders, 1, Operator::Gt, &Value::integer(100))
//!     .unwrap();
//! assert_eq!(large.row_count(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`DataType`], [`Value`], [`Schema`], [`Error`])
//! - [`storage`] - Table and scheme traits, range search, the in-memory leaf table
//! - [`table`] - Derived tables
//! - [`executor`] - The [`TableAlgebra`] facade and set membership resolution

pub mod core;
pub mod executor;
pub mod storage;
pub mod table;

// Re-export main types for convenience
pub use crate::core::{
    ColumnName, CompositeFunction, DataType, Error, Operator, Quantifier, Result, Schema,
    SchemaBuilder, SchemaColumn, Value,
};

pub use executor::{any_all_rows, in_rows, not_in_rows, QuantifiedSelection, TableAlgebra};

pub use storage::{
    resolve_raw, BlindSearch, CollatedSearch, Collation, Config, DedupStrategy, EndFlag,
    LockKey, MemoryTable, MemoryTableBuilder, Origin, RangeFlag, RangePoint, RawTableEntry,
    RawTableInfo, RowEnumeration, SchemeRef, SelectableRange, SelectableScheme, StartFlag,
    Table, TableId, TableRef,
};

pub use table::{
    CompositeTable, JoinedTable, NaturallyJoinedTable, OuterTable, OuterTableBuilder,
    ReferenceTable, RowSetTable, RowSetTableBuilder, SubsetColumnTable, TableKind,
};
