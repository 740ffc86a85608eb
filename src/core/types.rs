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

//! Core type definitions
//!
//! This module defines the fundamental types: DataType, Operator, Quantifier
//! and CompositeFunction

use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// SQL data types carried by cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DataType {
    /// NULL data type, used for unknown/unspecified types
    #[default]
    Null = 0,

    /// 64-bit signed integer
    Integer = 1,

    /// 64-bit floating point number
    Float = 2,

    /// UTF-8 text string
    Text = 3,

    /// Boolean true/false
    Boolean = 4,

    /// Timestamp with timezone (stored as UTC)
    Timestamp = 5,
}

impl DataType {
    /// Returns true if this type is numeric (INTEGER or FLOAT)
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Returns true if values of the two types can be compared with each other
    ///
    /// NULL is compatible with everything; INTEGER and FLOAT compare
    /// numerically.
    pub fn is_compatible(&self, other: &DataType) -> bool {
        if *self == DataType::Null || *other == DataType::Null || self == other {
            return true;
        }
        self.is_numeric() && other.is_numeric()
    }

    /// Returns the type ID as u8
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Create DataType from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DataType::Null),
            1 => Some(DataType::Integer),
            2 => Some(DataType::Float),
            3 => Some(DataType::Text),
            4 => Some(DataType::Boolean),
            5 => Some(DataType::Timestamp),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => write!(f, "NULL"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Text => write!(f, "TEXT"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NULL" => Ok(DataType::Null),
            "INTEGER" | "INT" | "BIGINT" | "SMALLINT" | "TINYINT" => Ok(DataType::Integer),
            "FLOAT" | "DOUBLE" | "REAL" | "DECIMAL" | "NUMERIC" => Ok(DataType::Float),
            "TEXT" | "VARCHAR" | "CHAR" | "STRING" => Ok(DataType::Text),
            "BOOLEAN" | "BOOL" => Ok(DataType::Boolean),
            "TIMESTAMP" | "DATETIME" | "DATE" | "TIME" => Ok(DataType::Timestamp),
            _ => Err(Error::parse(format!("unknown data type: {}", s))),
        }
    }
}

/// Comparison operators usable against a collated column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Operator {
    /// Equality (=)
    Eq = 0,

    /// Inequality (<>)
    Ne = 1,

    /// Greater than (>)
    Gt = 2,

    /// Greater than or equal (>=)
    Gte = 3,

    /// Less than (<)
    Lt = 4,

    /// Less than or equal (<=)
    Lte = 5,
}

impl Operator {
    /// Returns the negation of this operator
    pub fn negate(&self) -> Self {
        match self {
            Operator::Eq => Operator::Ne,
            Operator::Ne => Operator::Eq,
            Operator::Gt => Operator::Lte,
            Operator::Gte => Operator::Lt,
            Operator::Lt => Operator::Gte,
            Operator::Lte => Operator::Gt,
        }
    }

    /// Returns the operator with its operands swapped (`a op b` == `b op' a`)
    pub fn reverse(&self) -> Self {
        match self {
            Operator::Eq => Operator::Eq,
            Operator::Ne => Operator::Ne,
            Operator::Gt => Operator::Lt,
            Operator::Gte => Operator::Lte,
            Operator::Lt => Operator::Gt,
            Operator::Lte => Operator::Gte,
        }
    }

    /// Returns true for `>` and `>=`
    pub fn is_greater(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Gte)
    }

    /// Returns true for `<` and `<=`
    pub fn is_less(&self) -> bool {
        matches!(self, Operator::Lt | Operator::Lte)
    }

    /// Returns the type ID as u8
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Eq => write!(f, "="),
            Operator::Ne => write!(f, "<>"),
            Operator::Gt => write!(f, ">"),
            Operator::Gte => write!(f, ">="),
            Operator::Lt => write!(f, "<"),
            Operator::Lte => write!(f, "<="),
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            _ => Err(Error::parse(format!("unknown operator: {}", s))),
        }
    }
}

/// Quantifier of a sub-query comparison (`x > ANY (...)`, `x = ALL (...)`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// True if the comparison holds for at least one sub-query row
    Any,
    /// True if the comparison holds for every sub-query row
    All,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Any => write!(f, "ANY"),
            Quantifier::All => write!(f, "ALL"),
        }
    }
}

impl FromStr for Quantifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ANY" | "SOME" => Ok(Quantifier::Any),
            "ALL" => Ok(Quantifier::All),
            _ => Err(Error::parse(format!("unknown quantifier: {}", s))),
        }
    }
}

/// Function combining the rows of several tables of the same shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeFunction {
    /// Rows of every source
    Union,
    /// Rows of the first source that appear in every other source
    Intersect,
    /// Rows of the first source that appear in no other source
    Except,
}

impl fmt::Display for CompositeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeFunction::Union => write!(f, "UNION"),
            CompositeFunction::Intersect => write!(f, "INTERSECT"),
            CompositeFunction::Except => write!(f, "EXCEPT"),
        }
    }
}

impl FromStr for CompositeFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UNION" => Ok(CompositeFunction::Union),
            "INTERSECT" => Ok(CompositeFunction::Intersect),
            "EXCEPT" | "MINUS" => Ok(CompositeFunction::Except),
            _ => Err(Error::UnknownCompositeFunction(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // DataType tests
    // =========================================================================

    #[test]
    fn test_datatype_display() {
        assert_eq!(DataType::Null.to_string(), "NULL");
        assert_eq!(DataType::Integer.to_string(), "INTEGER");
        assert_eq!(DataType::Float.to_string(), "FLOAT");
        assert_eq!(DataType::Text.to_string(), "TEXT");
        assert_eq!(DataType::Boolean.to_string(), "BOOLEAN");
        assert_eq!(DataType::Timestamp.to_string(), "TIMESTAMP");
    }

    #[test]
    fn test_datatype_from_str() {
        assert_eq!("INTEGER".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("BIGINT".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("float".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("VARCHAR".parse::<DataType>().unwrap(), DataType::Text);
        assert_eq!("BOOL".parse::<DataType>().unwrap(), DataType::Boolean);
        assert!("JSON".parse::<DataType>().is_err());
    }

    #[test]
    fn test_datatype_compatibility() {
        assert!(DataType::Integer.is_compatible(&DataType::Float));
        assert!(DataType::Text.is_compatible(&DataType::Text));
        assert!(DataType::Null.is_compatible(&DataType::Timestamp));
        assert!(!DataType::Text.is_compatible(&DataType::Integer));
        assert!(!DataType::Boolean.is_compatible(&DataType::Timestamp));
    }

    #[test]
    fn test_datatype_u8_conversion() {
        for v in 0u8..6 {
            let dt = DataType::from_u8(v).unwrap();
            assert_eq!(dt.as_u8(), v);
        }
        assert_eq!(DataType::from_u8(6), None);
    }

    // =========================================================================
    // Operator tests
    // =========================================================================

    #[test]
    fn test_operator_from_str() {
        assert_eq!("=".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("<>".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!("!=".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::Gte);
        assert_eq!("<".parse::<Operator>().unwrap(), Operator::Lt);
        assert!("LIKE".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_negate_and_reverse() {
        assert_eq!(Operator::Gt.negate(), Operator::Lte);
        assert_eq!(Operator::Eq.negate(), Operator::Ne);
        assert_eq!(Operator::Gt.reverse(), Operator::Lt);
        assert_eq!(Operator::Lte.reverse(), Operator::Gte);
        assert_eq!(Operator::Ne.reverse(), Operator::Ne);
        assert!(Operator::Gte.is_greater());
        assert!(Operator::Lt.is_less());
        assert!(!Operator::Eq.is_greater());
    }

    // =========================================================================
    // Quantifier / CompositeFunction tests
    // =========================================================================

    #[test]
    fn test_quantifier_from_str() {
        assert_eq!("any".parse::<Quantifier>().unwrap(), Quantifier::Any);
        assert_eq!("SOME".parse::<Quantifier>().unwrap(), Quantifier::Any);
        assert_eq!("ALL".parse::<Quantifier>().unwrap(), Quantifier::All);
    }

    #[test]
    fn test_composite_function_from_str() {
        assert_eq!(
            "union".parse::<CompositeFunction>().unwrap(),
            CompositeFunction::Union
        );
        assert_eq!(
            "MINUS".parse::<CompositeFunction>().unwrap(),
            CompositeFunction::Except
        );
        let err = "CROSS".parse::<CompositeFunction>().unwrap_err();
        assert_eq!(err, Error::UnknownCompositeFunction("CROSS".to_string()));
        assert!(err.is_invariant_violation());
    }
}
