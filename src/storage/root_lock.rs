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

//! Root lock counters
//!
//! A root lock pins the rows of a physical table while a plan still reads
//! them. Every table keeps a count per lock key; the physical table may only
//! reclaim rows once every count is back to zero.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::core::{Error, Result};
use crate::storage::traits::LockKey;

/// Per-key root lock counts of one table
#[derive(Debug, Default)]
pub struct RootLocks {
    held: Mutex<FxHashMap<LockKey, usize>>,
}

impl RootLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take one lock for `key`
    pub fn lock(&self, key: LockKey) {
        *self.held.lock().entry(key).or_insert(0) += 1;
    }

    /// Release one lock for `key`
    ///
    /// `table` names the owner in the underflow error.
    pub fn unlock(&self, key: LockKey, table: &str) -> Result<()> {
        let mut held = self.held.lock();
        let count = held
            .get_mut(&key)
            .ok_or_else(|| Error::root_lock_underflow(table))?;
        *count -= 1;
        if *count == 0 {
            held.remove(&key);
        }
        Ok(())
    }

    /// Returns true while any key holds a lock
    pub fn is_locked(&self) -> bool {
        !self.held.lock().is_empty()
    }

    /// Total number of locks held across keys
    pub fn count(&self) -> usize {
        self.held.lock().values().sum()
    }
}
