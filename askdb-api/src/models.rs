use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-session provider credentials, supplied by the client at upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    pub gemini_api_key: String,
    pub langchain_api_key: String,
}

/// Metadata of a stored database upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseFile {
    pub file_name: String,
    pub session_id: String,
    pub file_size: u64,
    pub upload_timestamp: DateTime<Utc>,
    pub file_path: String,
}

/// Response body of a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub filename: String,
    pub message: String,
    pub file_info: DatabaseFile,
}

/// Natural-language query request.
#[derive(Debug, Deserialize, Serialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Composed result of one question: generated SQL, execution output, and
/// the model's natural-language answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub session_id: String,
    pub question: String,
    pub sql_query: String,
    pub query_result: String,
    pub answer: String,
}

/// Response body of the ask-question endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub session_id: String,
    pub question: String,
    pub result: QueryOutcome,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
