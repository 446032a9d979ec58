//! The column catalog: every column the grid may declare, keyed by owning
//! table and name.

use tabula_core::types::{Column, ColumnType};

/// Describes the columns available to one grid: the primary table's
/// columns plus those of any joined tables.
///
/// Immutable once the grid starts declaring columns; a declared column
/// missing from the catalog is a configuration error that aborts grid
/// construction, not a runtime filter error.
#[derive(Debug, Clone)]
pub struct ColumnCatalog {
    default_table: String,
    columns: Vec<Column>,
}

impl ColumnCatalog {
    /// Create an empty catalog over the given primary table.
    pub fn new(default_table: impl Into<String>) -> Self {
        Self {
            default_table: default_table.into(),
            columns: Vec::new(),
        }
    }

    /// Build a catalog from `(table, name, declared type)` triples, such
    /// as the output of a schema introspection query.
    pub fn from_schema<'a>(
        default_table: impl Into<String>,
        schema: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> Self {
        let mut catalog = Self::new(default_table);
        for (table, name, type_str) in schema {
            catalog.register(table, name, ColumnType::from_type_str(type_str));
        }
        catalog
    }

    /// Register one column. Whether it belongs to the primary table is
    /// derived from its owning table name.
    pub fn register(&mut self, table: impl Into<String>, name: impl Into<String>, column_type: ColumnType) {
        let table = table.into();
        let main_table = table == self.default_table;
        self.columns.push(Column::new(table, name, column_type, main_table));
    }

    /// The primary table name.
    pub fn default_table(&self) -> &str {
        &self.default_table
    }

    /// Look up a column by owning table and name.
    pub fn find(&self, table: &str, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.table == table && c.name == name)
    }

    /// Look up a column on the primary table by bare name.
    pub fn find_in_default_table(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.main_table && c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::from_schema(
            "orders",
            [
                ("orders", "id", "integer"),
                ("orders", "total", "decimal"),
                ("customers", "name", "string"),
            ],
        )
    }

    #[test]
    fn test_find_in_default_table() {
        let catalog = catalog();
        let col = catalog.find_in_default_table("total").expect("column exists");
        assert!(col.main_table);
        assert_eq!(col.column_type, ColumnType::Decimal);
        assert!(catalog.find_in_default_table("name").is_none());
    }

    #[test]
    fn test_find_qualified() {
        let catalog = catalog();
        let col = catalog.find("customers", "name").expect("column exists");
        assert!(!col.main_table);
        assert!(catalog.find("customers", "total").is_none());
    }
}
