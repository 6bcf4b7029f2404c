//! SQL query executor over a SQLite database file.
//!
//! The executor runs the query string it is handed verbatim; callers that
//! pass model-generated SQL get whatever that SQL does. Results come back
//! as JSON-typed rows plus execution metadata. A row cap (`max_rows`)
//! bounds how much of a result set is collected; hitting the cap marks the
//! result as truncated.

use rusqlite::Connection;
use serde_json::Value;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
    pub truncated: bool,
    pub execution_time_ms: u64,
}

pub struct SqlExecutor {
    conn: Connection,
    max_rows: usize,
}

impl SqlExecutor {
    pub fn new(db_path: &str, max_rows: usize, timeout_ms: u64) -> anyhow::Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(std::time::Duration::from_millis(timeout_ms))?;

        Ok(Self { conn, max_rows })
    }

    pub fn execute(&self, query: &str, limit: Option<usize>) -> anyhow::Result<QueryResult> {
        let start_time = Instant::now();
        let effective_limit = limit.unwrap_or(self.max_rows).min(self.max_rows);

        let mut stmt = self.conn.prepare(query)?;

        // Statements that produce no columns (INSERT, UPDATE, ...) cannot
        // be iterated as rows.
        if stmt.column_count() == 0 {
            stmt.execute([])?;
            return Ok(QueryResult {
                columns: Vec::new(),
                rows: Vec::new(),
                row_count: 0,
                truncated: false,
                execution_time_ms: start_time.elapsed().as_millis() as u64,
            });
        }

        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|&name| name.to_string())
            .collect();

        let mapped = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(row.as_ref().column_count());
            for i in 0..row.as_ref().column_count() {
                values.push(json_value(row.get_ref(i)?));
            }
            Ok(values)
        })?;

        let mut rows = Vec::new();
        let mut truncated = false;
        for row in mapped {
            if rows.len() >= effective_limit {
                truncated = true;
                break;
            }
            rows.push(row?);
        }

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        debug!(
            rows = rows.len(),
            truncated, execution_time_ms, "query executed"
        );

        Ok(QueryResult {
            row_count: rows.len(),
            columns,
            rows,
            truncated,
            execution_time_ms,
        })
    }
}

fn json_value(value: rusqlite::types::ValueRef<'_>) -> Value {
    match value {
        rusqlite::types::ValueRef::Null => Value::Null,
        rusqlite::types::ValueRef::Integer(i) => Value::Number(serde_json::Number::from(i)),
        rusqlite::types::ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        rusqlite::types::ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).to_string()),
        rusqlite::types::ValueRef::Blob(b) => Value::String(format!("<{} byte blob>", b.len())),
    }
}
