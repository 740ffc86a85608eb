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

//! Collation of a derived table's rows, taken from an ancestor
//!
//! A derived table never compares values to order a column. It maps each of
//! its rows to the ancestor's row domain and sorts by the position that row
//! holds in the ancestor's collation.

use crate::core::{Error, Result};
use crate::storage::traits::{SelectableScheme, Table};

use super::Collation;

/// Order the rows of `table` by the collation of `ancestor`
///
/// `ancestor` must be a scheme `table` obtained for `column` from its
/// sources with [`Origin::Descendant`](crate::storage::Origin::Descendant).
pub fn derive_collation(
    table: &dyn Table,
    column: usize,
    ancestor: &dyn SelectableScheme,
) -> Result<Collation> {
    let ancestor_collation = ancestor.collation()?;
    let own_rows = table.rows().to_vec();
    let mut mapped = own_rows.clone();
    table.to_ancestor_domain(column, &mut mapped, ancestor.domain())?;

    let ranks = ancestor_collation.ranks();
    let mut ranked = Vec::with_capacity(own_rows.len());
    for (own, ancestor_row) in own_rows.into_iter().zip(mapped) {
        let rank = ranks.get(&ancestor_row).copied().ok_or_else(|| {
            Error::internal(format!(
                "row {} is not in the collation of table {}",
                ancestor_row,
                ancestor.domain()
            ))
        })?;
        ranked.push((rank, own));
    }
    ranked.sort_by_key(|&(rank, _)| rank);

    let values = ranked
        .iter()
        .map(|&(rank, _)| ancestor_collation.values()[rank].clone())
        .collect();
    let rows = ranked.into_iter().map(|(_, own)| own).collect();
    Ok(Collation::from_sorted(rows, values))
}
