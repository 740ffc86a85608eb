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

//! Error types for the table algebra
//!
//! Every failure in this crate is either an invariant violation (a plan was
//! composed incorrectly), a bounds violation (a row or column index that does
//! not exist), or an error passed through unchanged from a collaborator.
//! "Not found" during range search is not an error; see
//! [`crate::storage::SelectableScheme::search_first`].

use thiserror::Error;

/// Result type alias for table algebra operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the table algebra
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Lookup errors
    // =========================================================================
    /// Column name could not be resolved against a table
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Column index out of bounds
    #[error("column index {index} out of bounds (table has {count} columns)")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    /// Row index out of bounds
    #[error("row index {index} out of bounds (table has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    /// Source table index out of bounds
    #[error("source index {index} out of bounds (table has {count} sources)")]
    SourceIndexOutOfBounds { index: usize, count: usize },

    // =========================================================================
    // Composition errors
    // =========================================================================
    /// Row index sequences of a derived table disagree in length
    #[error("row index sequences don't match, expected {expected} rows, got {got}")]
    RowCountMismatch { expected: usize, got: usize },

    /// Tables combined by a composite operator have different column shapes
    #[error("table columns don't match, expected {expected}, got {got}")]
    TableColumnsNotMatch { expected: usize, got: usize },

    /// A composite function name was not recognized
    #[error("unrecognized composite function '{0}'")]
    UnknownCompositeFunction(String),

    /// A row-domain request was routed to a table that is not the ancestor
    #[error("request routed to incorrect table ancestor")]
    IncorrectAncestor,

    /// A row maps to a null marker and cannot be resolved to a raw table
    #[error("row {row} of source {source_index} is null-extended and has no raw row")]
    NullExtendedRow { row: usize, source_index: usize },

    /// A selection scheme that cannot change state was asked to mutate
    #[error("selection scheme is immutable")]
    ImmutableScheme,

    /// Generic invariant violation
    #[error("invariant violation: {message}")]
    Invariant { message: String },

    // =========================================================================
    // Root lock errors
    // =========================================================================
    /// Root lock released more times than it was taken
    #[error("root lock underflow on table '{table}'")]
    RootLockUnderflow { table: String },

    // =========================================================================
    // Comparison errors
    // =========================================================================
    /// Cannot compare NULL with non-NULL value
    #[error("cannot compare NULL with non-NULL value")]
    NullComparison,

    /// Cannot compare incompatible types
    #[error("cannot compare incompatible types")]
    IncomparableTypes,

    /// Operand column types are not compatible
    #[error("incompatible column types: {left} and {right}")]
    IncompatibleTypes { left: String, right: String },

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Operation not supported
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(String),

    /// Internal error for unexpected conditions
    #[error("{message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new ColumnIndexOutOfBounds error
    pub fn column_out_of_bounds(index: usize, count: usize) -> Self {
        Error::ColumnIndexOutOfBounds { index, count }
    }

    /// Create a new RowIndexOutOfBounds error
    pub fn row_out_of_bounds(index: usize, count: usize) -> Self {
        Error::RowIndexOutOfBounds { index, count }
    }

    /// Create a new RowCountMismatch error
    pub fn row_count_mismatch(expected: usize, got: usize) -> Self {
        Error::RowCountMismatch { expected, got }
    }

    /// Create a new TableColumnsNotMatch error
    pub fn table_columns_not_match(expected: usize, got: usize) -> Self {
        Error::TableColumnsNotMatch { expected, got }
    }

    /// Create a new RootLockUnderflow error
    pub fn root_lock_underflow(table: impl Into<String>) -> Self {
        Error::RootLockUnderflow {
            table: table.into(),
        }
    }

    /// Create a new IncompatibleTypes error
    pub fn incompatible_types(left: impl Into<String>, right: impl Into<String>) -> Self {
        Error::IncompatibleTypes {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a new generic invariant violation
    pub fn invariant(message: impl Into<String>) -> Self {
        Error::Invariant {
            message: message.into(),
        }
    }

    /// Create a new NotSupported error
    pub fn not_supported(message: impl Into<String>) -> Self {
        Error::NotSupported(message.into())
    }

    /// Create a new Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Check if this error signals a plan-construction bug
    ///
    /// These are never retried: the same plan fails the same way again.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Error::RowCountMismatch { .. }
                | Error::TableColumnsNotMatch { .. }
                | Error::UnknownCompositeFunction(_)
                | Error::IncorrectAncestor
                | Error::NullExtendedRow { .. }
                | Error::ImmutableScheme
                | Error::Invariant { .. }
                | Error::RootLockUnderflow { .. }
                | Error::NotSupported(_)
        )
    }

    /// Check if this is a bounds violation
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Error::ColumnIndexOutOfBounds { .. }
                | Error::RowIndexOutOfBounds { .. }
                | Error::SourceIndexOutOfBounds { .. }
        )
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ColumnNotFound(_))
    }
}
