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

//! Table algebra configuration
//!

/// How duplicate rows are removed from a UNION
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupStrategy {
    /// Hash each row and compare rows within a bucket, keeps first occurrence order
    #[default]
    Hash = 0,
    /// Sort rows by value and drop adjacent duplicates, result is in sorted order
    Sort = 1,
}

impl From<i32> for DedupStrategy {
    fn from(value: i32) -> Self {
        match value {
            1 => DedupStrategy::Sort,
            _ => DedupStrategy::Hash,
        }
    }
}

impl From<DedupStrategy> for i32 {
    fn from(strategy: DedupStrategy) -> Self {
        strategy as i32
    }
}

/// Configuration of the table algebra
#[derive(Debug, Clone)]
pub struct Config {
    /// Duplicate removal strategy for UNION
    /// Default: Hash
    pub dedup_strategy: DedupStrategy,

    /// Let joins address identity-enumerated sources by row number instead
    /// of capturing an explicit index sequence
    /// Default: true
    pub identity_enumeration: bool,

    /// Initial capacity of IN result accumulators
    /// Default: 64
    pub in_accumulator_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dedup_strategy: DedupStrategy::Hash,
            identity_enumeration: true,
            in_accumulator_capacity: 64,
        }
    }
}

impl Config {
    /// Creates a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Config whose UNION results come back in value order
    pub fn ordered() -> Self {
        Self {
            dedup_strategy: DedupStrategy::Sort,
            ..Self::default()
        }
    }

    /// Creates a Config that always captures explicit row sequences
    ///
    /// Costs one index vector per join source but keeps join row mapping
    /// independent of how a source enumerates its rows.
    pub fn materialized() -> Self {
        Self {
            identity_enumeration: false,
            ..Self::default()
        }
    }

    /// Builder method to set the dedup strategy
    pub fn with_dedup_strategy(mut self, strategy: DedupStrategy) -> Self {
        self.dedup_strategy = strategy;
        self
    }

    /// Builder method to enable/disable identity enumeration
    pub fn with_identity_enumeration(mut self, enabled: bool) -> Self {
        self.identity_enumeration = enabled;
        self
    }

    /// Builder method to set the IN accumulator capacity
    pub fn with_in_accumulator_capacity(mut self, capacity: usize) -> Self {
        self.in_accumulator_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_strategy_default() {
        assert_eq!(DedupStrategy::default(), DedupStrategy::Hash);
    }

    #[test]
    fn test_dedup_strategy_from_i32() {
        assert_eq!(DedupStrategy::from(0), DedupStrategy::Hash);
        assert_eq!(DedupStrategy::from(1), DedupStrategy::Sort);
        assert_eq!(DedupStrategy::from(42), DedupStrategy::Hash); // Invalid defaults to Hash
        assert_eq!(i32::from(DedupStrategy::Sort), 1);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.dedup_strategy, DedupStrategy::Hash);
        assert!(config.identity_enumeration);
        assert_eq!(config.in_accumulator_capacity, 64);
    }

    #[test]
    fn test_config_presets() {
        assert_eq!(Config::ordered().dedup_strategy, DedupStrategy::Sort);
        assert!(Config::ordered().identity_enumeration);
        assert!(!Config::materialized().identity_enumeration);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_dedup_strategy(DedupStrategy::Sort)
            .with_identity_enumeration(false)
            .with_in_accumulator_capacity(8);

        assert_eq!(config.dedup_strategy, DedupStrategy::Sort);
        assert!(!config.identity_enumeration);
        assert_eq!(config.in_accumulator_capacity, 8);
    }
}
