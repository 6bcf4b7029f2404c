use crate::error::ApiError;
use crate::models::{AskResponse, ErrorResponse, QueryRequest};
use crate::services::{FileStore, ModelFactory, QueryService, SessionStore};
use actix_web::{post, web, HttpResponse, Responder};
use tracing::{error, info, warn};

#[post("/ask-question/{session_id}")]
pub async fn ask_question(
    path: web::Path<String>,
    req: web::Json<QueryRequest>,
    sessions: web::Data<SessionStore>,
    files: web::Data<FileStore>,
    models: web::Data<ModelFactory>,
) -> impl Responder {
    let session_id = path.into_inner();
    info!(session_id, question = %req.question, "processing question");

    let session = match sessions.get_session(&session_id) {
        Ok(session) => session,
        Err(e) => {
            warn!(session_id, "session not found");
            return HttpResponse::NotFound().json(ErrorResponse {
                error: e.to_string(),
            });
        }
    };

    // The file attached at upload wins; fall back to scanning the session
    // folder when no record was attached.
    let db_file = match session.database_file {
        Some(db_file) => db_file,
        None => match files.resolve(&session_id, None) {
            Ok(db_file) => db_file,
            Err(e @ ApiError::NotFound(_)) => {
                warn!(session_id, error = %e, "no database file for session");
                return HttpResponse::NotFound().json(ErrorResponse {
                    error: e.to_string(),
                });
            }
            Err(e) => {
                error!(session_id, error = %e, "failed to resolve database file");
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: format!("Internal server error: {}", e),
                });
            }
        },
    };

    let model = match (models.get_ref())(&session.api_keys) {
        Ok(model) => model,
        Err(e) => {
            error!(session_id, error = %e, "failed to construct model client");
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Internal server error: {}", e),
            });
        }
    };

    match QueryService::process_question(
        &req.question,
        &session_id,
        &db_file.file_path,
        model.as_ref(),
    )
    .await
    {
        Ok(result) => {
            info!(session_id, "question processed successfully");
            HttpResponse::Ok().json(AskResponse {
                session_id,
                question: req.question.clone(),
                result,
            })
        }
        Err(e @ ApiError::NotFound(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: e.to_string(),
        }),
        Err(e @ ApiError::InvalidInput(_)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: e.to_string(),
        }),
        Err(e) => {
            error!(session_id, error = %e, "question processing failed");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}
