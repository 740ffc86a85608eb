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

//! Selection schemes and the range search they share

pub mod blind;
pub mod collated;
pub mod collation;
pub mod range;
pub mod subset;

pub use blind::BlindSearch;
pub use collated::CollatedSearch;
pub use collation::Collation;
pub use range::{EndFlag, RangeFlag, RangePoint, SelectableRange, StartFlag};
pub use subset::derive_collation;
