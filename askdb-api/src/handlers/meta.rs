use crate::models::HealthResponse;
use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        message: "Natural language querying over SQLite is up".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "title": "askdb",
        "description": "Converts natural language questions into SQL queries and executes them against an uploaded SQLite database",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "/api/v1/upload/upload-database",
            "ask_question": "/api/v1/query/ask-question/{session_id}",
            "health": "/health"
        }
    }))
}
