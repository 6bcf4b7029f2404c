//! In-memory session store.
//!
//! Sessions correlate a client's provider credentials with at most one
//! uploaded database file. State lives for the process lifetime only; the
//! map is mutex-guarded so concurrent handlers never touch it directly.

use crate::error::ApiError;
use crate::models::{ApiKeys, DatabaseFile};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub api_keys: ApiKeys,
    pub created_at: DateTime<Utc>,
    pub database_file: Option<DatabaseFile>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new session holding the given credentials and returns its
    /// identifier. Identifiers are random and never reissued.
    pub fn create_session(&self, api_keys: ApiKeys) -> String {
        let session_id = format!("user_{}", Uuid::new_v4().simple());
        let session = Session {
            api_keys,
            created_at: Utc::now(),
            database_file: None,
        };
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.clone(), session);
        session_id
    }

    pub fn get_session(&self, session_id: &str) -> Result<Session, ApiError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", session_id)))
    }

    pub fn get_api_keys(&self, session_id: &str) -> Result<ApiKeys, ApiError> {
        self.get_session(session_id).map(|s| s.api_keys)
    }

    /// Associates a database file with a session. Unknown sessions are an
    /// error rather than a silent no-op.
    pub fn attach_file(&self, session_id: &str, db_file: DatabaseFile) -> Result<(), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.database_file = Some(db_file);
                Ok(())
            }
            None => Err(ApiError::NotFound(format!(
                "Session {} not found",
                session_id
            ))),
        }
    }
}
