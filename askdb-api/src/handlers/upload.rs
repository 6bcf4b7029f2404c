use crate::error::ApiError;
use crate::models::{ApiKeys, ErrorResponse, UploadResponse};
use crate::services::{FileStore, SessionStore};
use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use actix_web::{post, web, HttpResponse, Responder};
use tracing::{error, info, warn};

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    /// JSON string: {"gemini_api_key": ..., "langchain_api_key": ...}
    pub api_keys: Text<String>,
    pub file: Bytes,
}

#[post("/upload-database")]
pub async fn upload_database(
    MultipartForm(form): MultipartForm<UploadForm>,
    sessions: web::Data<SessionStore>,
    files: web::Data<FileStore>,
) -> impl Responder {
    let api_keys: ApiKeys = match serde_json::from_str(&form.api_keys.0) {
        Ok(keys) => keys,
        Err(e) => {
            warn!(error = %e, "rejected upload with malformed api_keys");
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid JSON format for api_keys".to_string(),
            });
        }
    };

    let file_name = match form.file.file_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Uploaded file must carry a filename".to_string(),
            });
        }
    };

    let session_id = sessions.create_session(api_keys);
    info!(session_id, file_name, size = form.file.data.len(), "received database upload");

    let db_file = match files.save(&form.file.data, &file_name, &session_id) {
        Ok(db_file) => db_file,
        Err(ApiError::InvalidInput(message)) => {
            warn!(session_id, error = %message, "uploaded file failed validation");
            return HttpResponse::BadRequest().json(ErrorResponse { error: message });
        }
        Err(e) => {
            error!(session_id, error = %e, "failed to store uploaded file");
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Internal server error: {}", e),
            });
        }
    };

    if let Err(e) = sessions.attach_file(&session_id, db_file.clone()) {
        error!(session_id, error = %e, "failed to attach file to session");
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: format!("Internal server error: {}", e),
        });
    }

    HttpResponse::Ok().json(UploadResponse {
        session_id,
        filename: file_name.clone(),
        message: format!("Database '{}' uploaded successfully", file_name),
        file_info: db_file,
    })
}
