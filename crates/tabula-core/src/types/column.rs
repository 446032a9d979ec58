//! Column identity: name, owning table, declared type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a column, as reported by the schema catalog.
///
/// The set of handled types is closed: adding a type means adding a variant
/// and teaching the generator registry about it. Types with no generator
/// are carried through as [`ColumnType::Other`] so that a catalog built
/// from live schema introspection never fails to construct; filters on
/// such columns are logged and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Boolean,
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Date,
    DateTime,
    Timestamp,
    /// A database type the engine has no condition generator for.
    /// Carries the raw declared type name for diagnostics.
    Other(std::string::String),
}

impl ColumnType {
    /// Parse a catalog type string into a `ColumnType`.
    pub fn from_type_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Self::Boolean,
            "string" | "varchar" | "character varying" => Self::String,
            "text" => Self::Text,
            "integer" | "int" | "bigint" | "smallint" => Self::Integer,
            "float" | "double" | "double precision" | "real" => Self::Float,
            "decimal" | "numeric" => Self::Decimal,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "timestamp" | "timestamptz" | "timestamp without time zone" => Self::Timestamp,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this is a date-like type whose range bounds are instants.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::Timestamp)
    }

    /// Whether range bounds for this type carry a time-of-day component.
    /// Plain dates only need `{year, month, day}`.
    pub fn needs_datetime_parts(&self) -> bool {
        matches!(self, Self::DateTime | Self::Timestamp)
    }

    /// Whether this is a numeric type whose range bounds get the
    /// digit-containment guard.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Decimal)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::String => write!(f, "string"),
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Decimal => write!(f, "decimal"),
            Self::Date => write!(f, "date"),
            Self::DateTime => write!(f, "datetime"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A named, typed attribute of a row, possibly from a joined table.
///
/// Immutable after catalog construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name within its table.
    pub name: String,
    /// Name of the owning table.
    pub table: String,
    /// Declared type, driving generator selection.
    pub column_type: ColumnType,
    /// Whether the column belongs to the grid's primary table (as opposed
    /// to a joined table).
    pub main_table: bool,
}

impl Column {
    /// Create a new column.
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        column_type: ColumnType,
        main_table: bool,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            column_type,
            main_table,
        }
    }

    /// The table alias if one was declared, otherwise the owning table name.
    pub fn alias_or_table_name<'a>(&'a self, table_alias: Option<&'a str>) -> &'a str {
        table_alias.unwrap_or(&self.table)
    }

    /// The fully qualified `table.column` name used in SQL fragments.
    pub fn qualified_name(&self, table_alias: Option<&str>) -> String {
        format!("{}.{}", self.alias_or_table_name(table_alias), self.name)
    }

    /// The request-parameter key this column answers to.
    ///
    /// Main-table columns may use their bare name; all other columns must
    /// be addressed by their qualified name.
    pub fn filter_key(&self, table_alias: Option<&str>) -> String {
        if self.main_table {
            self.name.clone()
        } else {
            self.qualified_name(table_alias)
        }
    }
}
