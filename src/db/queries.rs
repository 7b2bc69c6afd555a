//! SQL query constants and builders
//!
//! Contains all SQL text sent to the warehouse session.

/// Name of the database the application itself is installed in
pub const CURRENT_DATABASE: &str = "SELECT CURRENT_DATABASE()";

/// List every database visible to the application
pub const SHOW_DATABASES: &str = "SHOW DATABASES";

/// Column index of the object name in `SHOW` output
pub const SHOW_NAME_COLUMN: usize = 1;

/// Column index of the column name in `DESC TABLE` output
pub const DESC_NAME_COLUMN: usize = 0;

/// SQL builder for safe identifier and literal quoting
pub struct SqlBuilder;

impl SqlBuilder {
    /// Quote an identifier (database/schema/table name) safely
    pub fn quote_ident(ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Quote a string literal by doubling single quotes.
    ///
    /// Assumes `standard_conforming_strings`: backslashes are literal and
    /// are left as written. Dialects that treat backslash as an escape
    /// inside strings need it escaped as well.
    pub fn quote_literal(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Join identifiers into a quoted, dot-separated path
    pub fn qualified(parts: &[&str]) -> String {
        parts
            .iter()
            .map(|p| Self::quote_ident(p))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Build SHOW SCHEMAS query
    pub fn show_schemas(database: &str) -> String {
        format!("SHOW SCHEMAS IN DATABASE {}", Self::quote_ident(database))
    }

    /// Build SHOW TABLES query
    pub fn show_tables(database: &str, schema: &str) -> String {
        format!("SHOW TABLES IN SCHEMA {}", Self::qualified(&[database, schema]))
    }

    /// Build DESC TABLE query
    pub fn describe_table(database: &str, schema: &str, table: &str) -> String {
        format!("DESC TABLE {}", Self::qualified(&[database, schema, table]))
    }

    /// Build a full read of a configured table reference.
    ///
    /// The reference comes from configuration, not from user input, and is
    /// used as written so unquoted names keep the warehouse's case folding.
    pub fn select_all(table_ref: &str) -> String {
        format!("SELECT * FROM {}", table_ref)
    }

    /// Build a stored procedure call with positional string arguments
    pub fn call(procedure: &str, args: &[&str]) -> String {
        let args = args
            .iter()
            .map(|a| Self::quote_literal(a))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CALL {}({})", procedure, args)
    }
}
