//! Query orchestrator: question -> SQL -> execution -> answer.
//!
//! Credentials travel as an explicit per-request model client, never as
//! process-global state. The generated SQL runs verbatim; the row-limit
//! hint in the prompt is a suggestion to the model, not an enforced cap.

use crate::error::ApiError;
use crate::models::{ApiKeys, QueryOutcome};
use askdb_llm_sdk::{CompletionRequest, LlmClient, LlmError};
use askdb_tools::formatter::format_query_result;
use askdb_tools::schema::describe_database;
use askdb_tools::SqlExecutor;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Builds a model client from per-session credentials. Stored in app data
/// so tests can substitute a mock.
pub type ModelFactory =
    Arc<dyn Fn(&ApiKeys) -> Result<Arc<dyn LlmClient>, LlmError> + Send + Sync>;

const TOP_K_HINT: u32 = 10;
const MAX_RESULT_ROWS: usize = 1000;
const DB_BUSY_TIMEOUT_MS: u64 = 5000;

/// Structured shape the SQL-generation call must return.
#[derive(Debug, Deserialize)]
struct GeneratedSql {
    query: String,
}

fn generated_sql_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Syntactically valid SQL query"
            }
        },
        "required": ["query"]
    })
}

pub struct QueryService;

impl QueryService {
    /// Runs the full pipeline for one question. Any step's failure aborts
    /// the operation; there are no retries and no partial results.
    pub async fn process_question(
        question: &str,
        session_id: &str,
        db_path: &str,
        model: &dyn LlmClient,
    ) -> Result<QueryOutcome, ApiError> {
        let schema = describe_database(db_path)
            .map_err(|e| ApiError::Processing(format!("Error processing question: {}", e)))?;

        let sql_query = Self::generate_sql_query(question, &schema, model).await?;
        info!(session_id, sql = %sql_query, "generated SQL query");

        let query_result = Self::execute_query(&sql_query, db_path)?;
        debug!(session_id, "query executed");

        let answer = Self::generate_answer(question, &sql_query, &query_result, model).await?;

        Ok(QueryOutcome {
            session_id: session_id.to_string(),
            question: question.to_string(),
            sql_query,
            query_result,
            answer,
        })
    }

    async fn generate_sql_query(
        question: &str,
        schema: &askdb_tools::DatabaseSchema,
        model: &dyn LlmClient,
    ) -> Result<String, ApiError> {
        let system = format!(
            "Given an input question, create a syntactically correct {dialect} query to \
             run to help find the answer. Unless the user specifies in his question a \
             specific number of examples they wish to obtain, always limit your query to \
             at most {top_k} results. You can order the results by a relevant column to \
             return the most interesting examples in the database.\n\n\
             Never query for all the columns from a specific table, only ask for a the \
             few relevant columns given the question.\n\n\
             Pay attention to use only the column names that you can see in the schema \
             description. Be careful to not query for columns that do not exist. Also, \
             pay attention to which column is in which table.\n\n\
             Only use the following tables:\n{table_info}",
            dialect = schema.dialect,
            top_k = TOP_K_HINT,
            table_info = schema.table_info(),
        );

        let request = CompletionRequest::new(question)
            .with_system(system)
            .with_response_schema(generated_sql_schema());

        let response = model.complete(request).await.map_err(|e| {
            ApiError::Processing(format!("Error generating SQL query: {}", e))
        })?;

        let generated: GeneratedSql = serde_json::from_str(strip_code_fences(&response.text))
            .map_err(|e| {
                ApiError::Processing(format!(
                    "Error generating SQL query: unexpected model output: {}",
                    e
                ))
            })?;

        Ok(generated.query)
    }

    fn execute_query(sql_query: &str, db_path: &str) -> Result<String, ApiError> {
        let run = || -> Result<String, askdb_tools::ToolError> {
            let executor = SqlExecutor::new(db_path, MAX_RESULT_ROWS, DB_BUSY_TIMEOUT_MS)?;
            let result = executor.execute(sql_query, None)?;
            Ok(format_query_result(&result))
        };
        run().map_err(|e| ApiError::Processing(format!("Error executing SQL query: {}", e)))
    }

    async fn generate_answer(
        question: &str,
        sql_query: &str,
        query_result: &str,
        model: &dyn LlmClient,
    ) -> Result<String, ApiError> {
        let prompt = format!(
            "Given the following user question, corresponding SQL query, \
             and SQL result, answer the user question.\n\n\
             Question: {question}\n\
             SQL Query: {sql_query}\n\
             SQL Result: {query_result}"
        );

        let response = model
            .complete(CompletionRequest::new(prompt))
            .await
            .map_err(|e| ApiError::Processing(format!("Error generating answer: {}", e)))?;

        Ok(response.text)
    }
}

/// Models sometimes wrap JSON in a Markdown fence despite the schema; strip
/// it before parsing.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim()
}
