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

//! Set operations (UNION, INTERSECT, EXCEPT)
//!
//! This module builds composite tables combining same-shaped tables:
//! - UNION / UNION ALL
//! - INTERSECT / INTERSECT ALL
//! - EXCEPT / EXCEPT ALL
//!
//! plus the merge of two selections over the same tables, used when a
//! disjunction was evaluated as two separate row sets.

use std::sync::Arc;

use tracing::debug;

use crate::core::{CompositeFunction, Result};
use crate::storage::traits::{resolve_raw, Table, TableRef};
use crate::table::{CompositeTable, RowSetTable};

use super::TableAlgebra;

impl TableAlgebra {
    /// UNION: distinct rows of every source
    pub fn union(&self, sources: Vec<TableRef>) -> Result<TableRef> {
        self.composite(sources, CompositeFunction::Union, false)
    }

    /// UNION ALL: every row of every source
    pub fn union_all(&self, sources: Vec<TableRef>) -> Result<TableRef> {
        self.composite(sources, CompositeFunction::Union, true)
    }

    pub fn intersect(&self, sources: Vec<TableRef>, all: bool) -> Result<TableRef> {
        self.composite(sources, CompositeFunction::Intersect, all)
    }

    pub fn except(&self, sources: Vec<TableRef>, all: bool) -> Result<TableRef> {
        self.composite(sources, CompositeFunction::Except, all)
    }

    /// Combine `sources` left to right with `function`
    pub fn composite(
        &self,
        sources: Vec<TableRef>,
        function: CompositeFunction,
        all: bool,
    ) -> Result<TableRef> {
        let input_rows: usize = sources.iter().map(|s| s.row_count()).sum();
        let table = CompositeTable::compose(
            sources,
            function,
            all,
            self.config.dedup_strategy,
        )?;
        debug!(
            %function,
            all,
            strategy = ?self.config.dedup_strategy,
            input_rows,
            output_rows = table.row_count(),
            "composite table"
        );
        Ok(Arc::new(table))
    }

    /// Distinct rows present in either selection
    ///
    /// Both tables must flatten to the same root tables. Rows are matched
    /// by the root rows they are made of, not by value.
    pub fn merge_selections(&self, a: &TableRef, b: &TableRef) -> Result<TableRef> {
        let merged = resolve_raw(a)?.union(&resolve_raw(b)?)?;
        debug!(
            left_rows = a.row_count(),
            right_rows = b.row_count(),
            merged_rows = merged.row_count(),
            "merged selections"
        );
        Ok(Arc::new(RowSetTable::from_raw(merged)?))
    }
}
