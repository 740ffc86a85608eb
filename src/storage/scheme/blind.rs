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

//! BlindSearch - a scheme that keeps no order of its own
//!
//! Used for tables whose rows come from several places (composite and outer
//! tables), where no ancestor collation covers every row. Each query reads
//! the column and sorts it.

use std::borrow::Cow;

use crate::core::Result;
use crate::storage::traits::{SelectableScheme, Table, TableId};

use super::Collation;

/// Scheme that sorts the column on every query
#[derive(Debug)]
pub struct BlindSearch<'a> {
    table: &'a dyn Table,
    column: usize,
}

impl<'a> BlindSearch<'a> {
    pub fn new(table: &'a dyn Table, column: usize) -> Self {
        Self { table, column }
    }
}

impl SelectableScheme for BlindSearch<'_> {
    fn domain(&self) -> TableId {
        self.table.id()
    }

    fn collation(&self) -> Result<Cow<'_, Collation>> {
        let rows = self.table.rows();
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            entries.push((self.table.cell(self.column, row)?, row));
        }
        Ok(Cow::Owned(Collation::from_unsorted(entries)))
    }

    fn is_immutable(&self) -> bool {
        false
    }
}
