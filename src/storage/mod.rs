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

//! Storage module for the table algebra
//!
//! This module contains the storage surface the algebra is built on:
//! - Storage traits (Table, SelectableScheme)
//! - Selection schemes and range search
//! - The in-memory leaf table
//! - Root locks and raw table discovery
//! - Configuration types

pub mod config;
pub mod memory;
pub mod raw;
pub mod root_lock;
pub mod scheme;
pub mod traits;

// Re-export config types
pub use config::{Config, DedupStrategy};

// Re-export trait types
pub use traits::{
    resolve_raw, LockKey, Origin, RowEnumeration, SchemeRef, SelectableScheme, Table, TableId,
    TableRef,
};

// Re-export scheme types
pub use scheme::{
    BlindSearch, CollatedSearch, Collation, EndFlag, RangeFlag, RangePoint, SelectableRange,
    StartFlag,
};

pub use memory::{MemoryTable, MemoryTableBuilder};
pub use raw::{RawTableEntry, RawTableInfo};
pub use root_lock::RootLocks;
