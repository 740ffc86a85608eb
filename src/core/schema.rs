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

//! Schema types - column definitions and qualified column names
//!
//! A derived table's schema is assembled from its sources' schemas, so every
//! column carries the name of the table it is qualified by. A join keeps
//! each source's qualifier, a rename filter replaces all of them.

use std::fmt;

use super::error::{Error, Result};
use super::types::DataType;

/// A column reference, optionally qualified by a table name (`t.a` or `a`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName {
    /// Table qualifier
    pub table: Option<String>,

    /// Column name
    pub name: String,
}

impl ColumnName {
    /// Create an unqualified column name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    /// Create a column name qualified by a table name
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// Parse `table.column` or `column`
    pub fn parse(s: &str) -> Self {
        match s.rsplit_once('.') {
            Some((table, name)) => Self::qualified(table, name),
            None => Self::new(s),
        }
    }

    /// Returns true if this reference names the given column
    ///
    /// Names compare case-insensitively; an unqualified reference matches a
    /// column of any table.
    pub fn matches(&self, column: &SchemaColumn) -> bool {
        if !self.name.eq_ignore_ascii_case(&column.name) {
            return false;
        }
        match &self.table {
            Some(table) => table.eq_ignore_ascii_case(&column.table),
            None => true,
        }
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<&str> for ColumnName {
    fn from(s: &str) -> Self {
        ColumnName::parse(s)
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    /// Name of the table qualifying this column
    pub table: String,

    /// Column name
    pub name: String,

    /// Data type of the column
    pub data_type: DataType,

    /// Whether the column can contain NULL values
    pub nullable: bool,
}

impl SchemaColumn {
    /// Create a new column definition
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        data_type: DataType,
        nullable: bool,
    ) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Returns the qualified name of this column
    pub fn column_name(&self) -> ColumnName {
        ColumnName::qualified(self.table.clone(), self.name.clone())
    }
}

impl fmt::Display for SchemaColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} {}", self.table, self.name, self.data_type)?;
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// Column definitions of a table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Name of the table (empty for joined tables, which have no single name)
    pub table_name: String,

    /// Column definitions
    pub columns: Vec<SchemaColumn>,
}

impl Schema {
    /// Create a new schema with the given table name and columns
    pub fn new(table_name: impl Into<String>, columns: Vec<SchemaColumn>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has any columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column by index
    pub fn get_column(&self, index: usize) -> Option<&SchemaColumn> {
        self.columns.get(index)
    }

    /// Get a column by index, failing with a bounds violation
    pub fn column(&self, index: usize) -> Result<&SchemaColumn> {
        self.columns
            .get(index)
            .ok_or_else(|| Error::column_out_of_bounds(index, self.columns.len()))
    }

    /// Find the index of the first column matching the reference
    pub fn find_column(&self, name: &ColumnName) -> Option<usize> {
        self.columns.iter().position(|c| name.matches(c))
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &ColumnName) -> bool {
        self.find_column(name).is_some()
    }

    /// Get all column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Validate column count matches expected value
    pub fn validate_column_count(&self, expected: usize) -> Result<()> {
        if self.columns.len() != expected {
            return Err(Error::table_columns_not_match(expected, self.columns.len()));
        }
        Ok(())
    }

    /// Schema of a table joining `schemas` side by side
    ///
    /// Every column keeps its source's qualifier.
    pub fn joined<'a>(schemas: impl IntoIterator<Item = &'a Schema>) -> Schema {
        let columns = schemas
            .into_iter()
            .flat_map(|s| s.columns.iter().cloned())
            .collect();
        Schema::new("", columns)
    }

    /// The same columns qualified by a different table name
    pub fn renamed(&self, table_name: impl Into<String>) -> Schema {
        let table_name = table_name.into();
        let columns = self
            .columns
            .iter()
            .map(|c| SchemaColumn {
                table: table_name.clone(),
                ..c.clone()
            })
            .collect();
        Schema::new(table_name, columns)
    }

    /// Columns picked by `column_map`, renamed to `aliases`
    ///
    /// An alias without a table qualifier keeps the qualifier of the table
    /// the column came from.
    pub fn subset(&self, column_map: &[usize], aliases: &[ColumnName]) -> Result<Schema> {
        if column_map.len() != aliases.len() {
            return Err(Error::invariant(format!(
                "column map has {} entries but {} aliases were given",
                column_map.len(),
                aliases.len()
            )));
        }
        let mut columns = Vec::with_capacity(column_map.len());
        for (&source, alias) in column_map.iter().zip(aliases) {
            let column = self.column(source)?;
            columns.push(SchemaColumn {
                table: alias.table.clone().unwrap_or_else(|| column.table.clone()),
                name: alias.name.clone(),
                data_type: column.data_type,
                nullable: column.nullable,
            });
        }
        Ok(Schema::new(self.table_name.clone(), columns))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.table_name)?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, ")")
    }
}

/// Builder for creating schemas more ergonomically
pub struct SchemaBuilder {
    table_name: String,
    columns: Vec<SchemaColumn>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column
    pub fn column(mut self, name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        let column = SchemaColumn::new(self.table_name.clone(), name, data_type, nullable);
        self.columns.push(column);
        self
    }

    /// Add a non-nullable column
    pub fn add(self, name: impl Into<String>, data_type: DataType) -> Self {
        self.column(name, data_type, false)
    }

    /// Add a nullable column
    pub fn add_nullable(self, name: impl Into<String>, data_type: DataType) -> Self {
        self.column(name, data_type, true)
    }

    /// Build the schema
    pub fn build(self) -> Schema {
        Schema::new(self.table_name, self.columns)
    }
}
