use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use askdb_api::config::ApiConfig;
use askdb_api::handlers;
use askdb_api::models::ApiKeys;
use askdb_api::services::{FileStore, ModelFactory, SessionStore};
use askdb_llm_sdk::gemini::{GeminiClient, GeminiModel};
use askdb_llm_sdk::models::gemini::GEMINI_2_5_PRO;
use askdb_llm_sdk::LlmClient;
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ApiConfig::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let sessions = web::Data::new(SessionStore::new());
    let files = web::Data::new(FileStore::new(&config.storage_root)?);

    let factory: ModelFactory = Arc::new(|api_keys: &ApiKeys| {
        let client = GeminiClient::new(api_keys.gemini_api_key.clone())?;
        Ok(Arc::new(GeminiModel::new(client, GEMINI_2_5_PRO)) as Arc<dyn LlmClient>)
    });
    let factory = web::Data::new(factory);

    let bind_addr = config.bind_addr();
    info!("Starting askdb-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(sessions.clone())
            .app_data(files.clone())
            .app_data(factory.clone())
            .service(handlers::meta::health)
            .service(handlers::meta::root)
            .service(web::scope("/api/v1/upload").service(handlers::upload::upload_database))
            .service(web::scope("/api/v1/query").service(handlers::query::ask_question))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
