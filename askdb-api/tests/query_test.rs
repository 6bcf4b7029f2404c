mod common;

use actix_web::{test, web, App};
use askdb_api::handlers::query::ask_question;
use askdb_api::handlers::upload::upload_database;
use askdb_llm_sdk::types::CompletionResponse;
use common::{
    mock_factory, multipart_body, sample_db_bytes, test_stores, MockLlmClient, VALID_API_KEYS,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

async fn upload_sample<S>(app: &S) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let (content_type, body) = multipart_body(VALID_API_KEYS, "sample.db", &sample_db_bytes());
    let req = test::TestRequest::post()
        .uri("/api/v1/upload/upload-database")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success());
    let json: Value = test::read_body_json(resp).await;
    json["session_id"].as_str().unwrap().to_string()
}

#[actix_web::test]
async fn answers_question_end_to_end() {
    let root = TempDir::new().unwrap();
    let (sessions, files) = test_stores(root.path());
    let mock = Arc::new(MockLlmClient::with_responses(vec![
        CompletionResponse::text(r#"{"query": "SELECT COUNT(*) AS row_count FROM t"}"#),
        CompletionResponse::text("There is 1 row in table t."),
    ]));

    let app = test::init_service(
        App::new()
            .app_data(sessions)
            .app_data(files)
            .app_data(mock_factory(mock.clone()))
            .service(web::scope("/api/v1/upload").service(upload_database))
            .service(web::scope("/api/v1/query").service(ask_question)),
    )
    .await;

    let session_id = upload_sample(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/query/ask-question/{}", session_id))
        .set_json(json!({"question": "how many rows are in t?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["session_id"], session_id.as_str());
    assert_eq!(body["question"], "how many rows are in t?");

    let result = &body["result"];
    assert!(result["sql_query"].as_str().unwrap().contains("t"));
    assert!(result["query_result"].as_str().unwrap().contains("1"));
    assert!(result["answer"].as_str().unwrap().contains("1"));

    // One generation call and one answer call.
    assert_eq!(mock.get_call_count(), 2);
}

#[actix_web::test]
async fn unknown_session_is_404() {
    let root = TempDir::new().unwrap();
    let (sessions, files) = test_stores(root.path());
    let mock = Arc::new(MockLlmClient::new());

    let app = test::init_service(
        App::new()
            .app_data(sessions)
            .app_data(files)
            .app_data(mock_factory(mock))
            .service(web::scope("/api/v1/query").service(ask_question)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/query/ask-question/user_never_created")
        .set_json(json!({"question": "anything"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("user_never_created"));
}

#[actix_web::test]
async fn unparseable_generation_output_is_processing_error() {
    let root = TempDir::new().unwrap();
    let (sessions, files) = test_stores(root.path());
    let mock = Arc::new(MockLlmClient::with_responses(vec![
        CompletionResponse::text("I cannot write SQL today."),
    ]));

    let app = test::init_service(
        App::new()
            .app_data(sessions)
            .app_data(files)
            .app_data(mock_factory(mock.clone()))
            .service(web::scope("/api/v1/upload").service(upload_database))
            .service(web::scope("/api/v1/query").service(ask_question)),
    )
    .await;

    let session_id = upload_sample(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/query/ask-question/{}", session_id))
        .set_json(json!({"question": "how many rows are in t?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Error generating SQL query"));
    // The pipeline aborts before the answer step.
    assert_eq!(mock.get_call_count(), 1);
}

#[actix_web::test]
async fn invalid_generated_sql_is_processing_error() {
    let root = TempDir::new().unwrap();
    let (sessions, files) = test_stores(root.path());
    let mock = Arc::new(MockLlmClient::with_responses(vec![
        CompletionResponse::text(r#"{"query": "SELEC nonsense FROM nowhere"}"#),
    ]));

    let app = test::init_service(
        App::new()
            .app_data(sessions)
            .app_data(files)
            .app_data(mock_factory(mock.clone()))
            .service(web::scope("/api/v1/upload").service(upload_database))
            .service(web::scope("/api/v1/query").service(ask_question)),
    )
    .await;

    let session_id = upload_sample(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/query/ask-question/{}", session_id))
        .set_json(json!({"question": "how many rows are in t?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Error executing SQL query"));
    assert_eq!(mock.get_call_count(), 1);
}

#[actix_web::test]
async fn fenced_generation_output_is_accepted() {
    let root = TempDir::new().unwrap();
    let (sessions, files) = test_stores(root.path());
    let mock = Arc::new(MockLlmClient::with_responses(vec![
        CompletionResponse::text(
            "```json\n{\"query\": \"SELECT name FROM t WHERE id = 1\"}\n```",
        ),
        CompletionResponse::text("The name is a."),
    ]));

    let app = test::init_service(
        App::new()
            .app_data(sessions)
            .app_data(files)
            .app_data(mock_factory(mock))
            .service(web::scope("/api/v1/upload").service(upload_database))
            .service(web::scope("/api/v1/query").service(ask_question)),
    )
    .await;

    let session_id = upload_sample(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/query/ask-question/{}", session_id))
        .set_json(json!({"question": "what is the name of row 1?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert!(body["result"]["query_result"].as_str().unwrap().contains("a"));
}
