//! Schema introspection and file validation for SQLite databases.

use crate::tool_error::ToolError;
use rusqlite::Connection;
use std::path::Path;

/// One user table and its CREATE statement.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub create_sql: String,
}

/// Dialect plus table catalog of one database.
#[derive(Debug, Clone)]
pub struct DatabaseSchema {
    pub dialect: &'static str,
    pub tables: Vec<TableSchema>,
}

impl DatabaseSchema {
    /// Catalog rendered as CREATE TABLE statements, suitable for inclusion
    /// in a model prompt.
    pub fn table_info(&self) -> String {
        self.tables
            .iter()
            .map(|table| table.create_sql.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|table| table.name.as_str()).collect()
    }
}

/// Reads the table catalog of the database at `db_path`.
pub fn describe_database(db_path: &str) -> Result<DatabaseSchema, ToolError> {
    let conn = Connection::open(db_path)
        .map_err(|e| ToolError::ExecutionError(format!("Failed to open database: {}", e)))?;

    let mut stmt = conn
        .prepare(
            "SELECT name, sql FROM sqlite_master \
             WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .map_err(|e| ToolError::ExecutionError(format!("Failed to read schema: {}", e)))?;

    let tables = stmt
        .query_map([], |row| {
            Ok(TableSchema {
                name: row.get(0)?,
                create_sql: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(|e| ToolError::ExecutionError(format!("Failed to read schema: {}", e)))?;

    Ok(DatabaseSchema {
        dialect: "sqlite",
        tables,
    })
}

/// Checks that the file at `path` is a readable SQLite database by opening
/// it and querying the table catalog.
pub fn validate_sqlite_file(path: &Path) -> Result<(), ToolError> {
    let probe = || -> rusqlite::Result<()> {
        let conn = Connection::open(path)?;
        conn.query_row(
            "SELECT count(*) FROM sqlite_master WHERE type='table'",
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(())
    };

    probe().map_err(|e| {
        ToolError::InvalidInput(format!("not a readable SQLite database: {}", e))
    })
}
