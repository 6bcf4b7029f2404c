#![allow(dead_code)]

use askdb_api::models::ApiKeys;
use askdb_api::services::{FileStore, ModelFactory, SessionStore};
use askdb_llm_sdk::client::LlmClient;
use askdb_llm_sdk::error::LlmError;
use askdb_llm_sdk::types::{CompletionRequest, CompletionResponse};
use actix_web::web;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// LLM client returning queued responses, for exercising the pipeline
/// without a hosted model.
pub struct MockLlmClient {
    pub responses: Mutex<Vec<CompletionResponse>>,
    pub call_count: Mutex<usize>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        MockLlmClient {
            responses: Mutex::new(Vec::new()),
            call_count: Mutex::new(0),
        }
    }

    pub fn with_responses(responses: Vec<CompletionResponse>) -> Self {
        MockLlmClient {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        *self.call_count.lock().unwrap() += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(CompletionResponse::text("mock response"))
        } else {
            Ok(responses.remove(0))
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// A factory that hands every request the same mock client, ignoring the
/// session's credentials.
pub fn mock_factory(mock: Arc<MockLlmClient>) -> web::Data<ModelFactory> {
    let factory: ModelFactory = Arc::new(move |_api_keys: &ApiKeys| {
        Ok(mock.clone() as Arc<dyn LlmClient>)
    });
    web::Data::new(factory)
}

pub fn test_stores(root: &Path) -> (web::Data<SessionStore>, web::Data<FileStore>) {
    (
        web::Data::new(SessionStore::new()),
        web::Data::new(FileStore::new(root).unwrap()),
    )
}

/// Bytes of a small SQLite database: table t(id INTEGER, name TEXT) with
/// one row (1, 'a').
pub fn sample_db_bytes() -> Vec<u8> {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sample.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE t (id INTEGER, name TEXT); INSERT INTO t VALUES (1, 'a');",
    )
    .unwrap();
    drop(conn);
    std::fs::read(&path).unwrap()
}

pub const VALID_API_KEYS: &str =
    r#"{"gemini_api_key": "test-gemini-key", "langchain_api_key": "test-langchain-key"}"#;

/// Builds a multipart/form-data payload with an `api_keys` text field and a
/// `file` part; returns (content-type header value, body bytes).
pub fn multipart_body(api_keys_json: &str, file_name: &str, file_bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "------------------------askdbtest";
    let mut body = Vec::new();

    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"api_keys\"\r\n\r\n{api_keys_json}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}
