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

//! Derived tables
//!
//! Every table here is built from other tables and never copies a cell:
//! - [`RowSetTable`] - explicit row sequences over one or more sources
//! - [`NaturallyJoinedTable`] - cartesian product of two tables
//! - [`CompositeTable`] - UNION / INTERSECT / EXCEPT of same-shaped tables
//! - [`OuterTable`] - a base table extended with NULL-padded rows
//! - [`ReferenceTable`], [`SubsetColumnTable`] - renamed and projected columns

pub mod composite;
pub mod dedup;
pub mod filter;
pub mod join;
pub mod joined;
pub mod outer;
pub mod row_set;

pub use composite::CompositeTable;
pub use filter::{ReferenceTable, SubsetColumnTable};
pub use join::{NaturallyJoinedTable, TableKind};
pub use joined::{ColumnRouting, JoinedTable};
pub use outer::{OuterTable, OuterTableBuilder};
pub use row_set::{RowSetTable, RowSetTableBuilder};
