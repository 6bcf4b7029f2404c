//! SQLite access utilities: query execution, schema introspection, and
//! result formatting for LLM consumption.

pub mod executor;
pub mod formatter;
pub mod schema;
pub mod tool_error;

pub use executor::{QueryResult, SqlExecutor};
pub use schema::{describe_database, validate_sqlite_file, DatabaseSchema, TableSchema};
pub use tool_error::ToolError;
