//! Formats query results as aligned text tables for LLM consumption.
//!
//! Long strings are shortened to 50 characters and at most 20 rows are
//! rendered; the header line carries row count and execution time so the
//! model can still answer aggregate questions about truncated output.

use crate::executor::QueryResult;
use serde_json::Value;

const MAX_DISPLAY_ROWS: usize = 20;
const MAX_CELL_CHARS: usize = 50;

pub fn format_query_result(result: &QueryResult) -> String {
    if result.row_count == 0 {
        return "Query executed successfully but returned no rows.".to_string();
    }

    let mut output = format!(
        "Query executed successfully. Returned {} rows",
        result.row_count
    );
    if result.truncated {
        output.push_str(" (results truncated)");
    }
    output.push_str(&format!(
        ".\nExecution time: {}ms\n\n",
        result.execution_time_ms
    ));

    let mut widths: Vec<usize> = result.columns.iter().map(|c| c.len()).collect();
    for row in result.rows.iter().take(MAX_DISPLAY_ROWS) {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(format_cell(cell).len());
            }
        }
    }

    let header: Vec<String> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{:<width$}", col, width = widths[i]))
        .collect();
    output.push_str(&header.join(" | "));
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    output.push_str(&separator.join("-+-"));
    output.push('\n');

    for row in result.rows.iter().take(MAX_DISPLAY_ROWS) {
        let cells: Vec<String> = row
            .iter()
            .take(widths.len())
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", format_cell(cell), width = widths[i]))
            .collect();
        output.push_str(&cells.join(" | "));
        output.push('\n');
    }

    if result.row_count > MAX_DISPLAY_ROWS {
        output.push_str(&format!(
            "\n... and {} more rows",
            result.row_count - MAX_DISPLAY_ROWS
        ));
    }

    output
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => {
            if s.chars().count() > MAX_CELL_CHARS {
                let truncated: String = s.chars().take(MAX_CELL_CHARS - 3).collect();
                format!("{}...", truncated)
            } else {
                s.clone()
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => value.to_string(),
    }
}
