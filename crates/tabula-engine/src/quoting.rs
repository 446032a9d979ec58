//! Database-family-specific identifier quoting.

use tabula_core::config::DatabaseFamily;

/// Quote a single identifier for the given engine family.
pub fn quote_ident(family: DatabaseFamily, ident: &str) -> String {
    match family {
        DatabaseFamily::Postgres | DatabaseFamily::Sqlite => {
            format!("\"{}\"", ident.replace('"', "\"\""))
        }
        DatabaseFamily::MySql => format!("`{}`", ident.replace('`', "``")),
    }
}

/// Quote a (possibly qualified) order column reference.
///
/// SQLite rejects a quoted `"table.column"` as a single identifier, so the
/// name is split on `.` and each chunk quoted separately; other families
/// quote the trimmed name whole.
pub fn quote_order_ident(family: DatabaseFamily, name: &str) -> String {
    let name = name.trim();
    match family {
        DatabaseFamily::Sqlite => name
            .split('.')
            .map(|chunk| quote_ident(family, chunk))
            .collect::<Vec<_>>()
            .join("."),
        _ => quote_ident(family, name),
    }
}
