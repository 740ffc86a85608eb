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

//! CollatedSearch - a scheme over a stored collation order

use std::borrow::Cow;
use std::sync::Arc;

use crate::core::Result;
use crate::storage::traits::{SelectableScheme, TableId};

use super::Collation;

/// Scheme backed by a collation computed once and shared
///
/// Cloning is cheap; the collation itself is reference counted so a table
/// can cache it and hand out schemes without copying.
#[derive(Debug, Clone)]
pub struct CollatedSearch {
    domain: TableId,
    collation: Arc<Collation>,
    immutable: bool,
}

impl CollatedSearch {
    /// Create a scheme over `collation`, whose rows belong to `domain`
    pub fn new(domain: TableId, collation: Arc<Collation>) -> Self {
        Self {
            domain,
            collation,
            immutable: true,
        }
    }

    /// Accept insert/remove notifications instead of failing on them
    pub fn accepting_notifications(mut self) -> Self {
        self.immutable = false;
        self
    }
}

impl SelectableScheme for CollatedSearch {
    fn domain(&self) -> TableId {
        self.domain
    }

    fn collation(&self) -> Result<Cow<'_, Collation>> {
        Ok(Cow::Borrowed(&self.collation))
    }

    fn is_immutable(&self) -> bool {
        self.immutable
    }
}
