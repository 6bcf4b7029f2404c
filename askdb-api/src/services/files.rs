//! On-disk store for uploaded database files.
//!
//! Layout: `<root>/session_<id>/<original file name>`. Uploaded bytes are
//! validated as SQLite before a record escapes the store; files that fail
//! validation are removed again.

use crate::error::ApiError;
use crate::models::DatabaseFile;
use askdb_tools::schema::validate_sqlite_file;
use askdb_tools::ToolError;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn session_dir(&self, session_id: &str) -> PathBuf {
        self.root.join(format!("session_{}", session_id))
    }

    /// Writes uploaded bytes under the session's directory and validates
    /// them as a SQLite database. Name collisions overwrite; invalid files
    /// are deleted before the error is returned.
    pub fn save(
        &self,
        bytes: &[u8],
        declared_name: &str,
        session_id: &str,
    ) -> Result<DatabaseFile, ApiError> {
        let file_name = sanitize_file_name(declared_name)?;

        let session_dir = self.session_dir(session_id);
        fs::create_dir_all(&session_dir)
            .map_err(|e| ApiError::Internal(format!("Failed to create session folder: {}", e)))?;

        let file_path = session_dir.join(&file_name);
        fs::write(&file_path, bytes)
            .map_err(|e| ApiError::Internal(format!("Failed to write uploaded file: {}", e)))?;

        if let Err(e) = validate_sqlite_file(&file_path) {
            if let Err(remove_err) = fs::remove_file(&file_path) {
                warn!(path = %file_path.display(), error = %remove_err, "failed to remove invalid upload");
            }
            return Err(match e {
                ToolError::InvalidInput(_) | ToolError::ExecutionError(_) => ApiError::InvalidInput(
                    format!("'{}' is not a valid SQLite database", file_name),
                ),
            });
        }

        debug!(path = %file_path.display(), size = bytes.len(), "stored uploaded database");

        Ok(DatabaseFile {
            file_name,
            session_id: session_id.to_string(),
            file_size: bytes.len() as u64,
            upload_timestamp: Utc::now(),
            file_path: file_path.display().to_string(),
        })
    }

    /// Finds the database file for a session. With no name given, the
    /// lexicographically smallest `.db` file in the session folder wins,
    /// keeping resolution deterministic when several files exist.
    pub fn resolve(
        &self,
        session_id: &str,
        filename: Option<&str>,
    ) -> Result<DatabaseFile, ApiError> {
        let session_dir = self.session_dir(session_id);
        if !session_dir.exists() {
            return Err(ApiError::NotFound(format!(
                "No session folder found for {}",
                session_id
            )));
        }

        let file_path = match filename {
            Some(name) => {
                let path = session_dir.join(sanitize_file_name(name)?);
                if !path.exists() {
                    return Err(ApiError::NotFound(format!(
                        "Database file not found: {}",
                        path.display()
                    )));
                }
                path
            }
            None => {
                let mut candidates: Vec<PathBuf> = fs::read_dir(&session_dir)
                    .map_err(|e| {
                        ApiError::Internal(format!("Failed to read session folder: {}", e))
                    })?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|path| path.extension().is_some_and(|ext| ext == "db"))
                    .collect();
                candidates.sort();
                candidates.into_iter().next().ok_or_else(|| {
                    ApiError::NotFound(format!(
                        "No database files found in session {}",
                        session_id
                    ))
                })?
            }
        };

        let metadata = fs::metadata(&file_path)
            .map_err(|e| ApiError::Internal(format!("Failed to stat database file: {}", e)))?;
        let upload_timestamp: DateTime<Utc> = metadata
            .modified()
            .map(DateTime::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(DatabaseFile {
            file_name: file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            session_id: session_id.to_string(),
            file_size: metadata.len(),
            upload_timestamp,
            file_path: file_path.display().to_string(),
        })
    }
}

/// Reduces a client-declared name to its final path component, refusing
/// names that would escape the session directory.
fn sanitize_file_name(declared_name: &str) -> Result<String, ApiError> {
    let name = Path::new(declared_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty() && n != ".." && n != ".")
        .ok_or_else(|| ApiError::InvalidInput(format!("Invalid file name: {}", declared_name)))?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn sqlite_bytes() -> Vec<u8> {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fixture.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, name TEXT); INSERT INTO t VALUES (1, 'a');",
        )
        .unwrap();
        drop(conn);
        fs::read(&path).unwrap()
    }

    #[test]
    fn save_returns_record_with_input_size() {
        let root = TempDir::new().unwrap();
        let store = FileStore::new(root.path()).unwrap();
        let bytes = sqlite_bytes();

        let record = store.save(&bytes, "mydata.db", "user_abc").unwrap();

        assert_eq!(record.file_size, bytes.len() as u64);
        assert_eq!(record.file_name, "mydata.db");
        assert_eq!(record.session_id, "user_abc");
        assert!(Path::new(&record.file_path).exists());
        assert!(Connection::open(&record.file_path).is_ok());
    }

    #[test]
    fn save_rejects_non_sqlite_and_leaves_no_residue() {
        let root = TempDir::new().unwrap();
        let store = FileStore::new(root.path()).unwrap();

        let err = store
            .save(b"plain text pretending to be a database", "fake.db", "user_abc")
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(err.to_string().contains("not a valid SQLite database"));
        assert!(!root.path().join("session_user_abc").join("fake.db").exists());
    }

    #[test]
    fn save_strips_directory_components() {
        let root = TempDir::new().unwrap();
        let store = FileStore::new(root.path()).unwrap();
        let bytes = sqlite_bytes();

        let record = store.save(&bytes, "../escape.db", "user_abc").unwrap();

        assert_eq!(record.file_name, "escape.db");
        assert!(root
            .path()
            .join("session_user_abc")
            .join("escape.db")
            .exists());
        assert!(!root.path().join("escape.db").exists());
    }

    #[test]
    fn resolve_unknown_session_is_not_found() {
        let root = TempDir::new().unwrap();
        let store = FileStore::new(root.path()).unwrap();

        let err = store.resolve("user_missing", None).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(err.to_string().contains("user_missing"));
    }

    #[test]
    fn resolve_picks_lexicographically_smallest() {
        let root = TempDir::new().unwrap();
        let store = FileStore::new(root.path()).unwrap();
        let bytes = sqlite_bytes();

        store.save(&bytes, "zeta.db", "user_abc").unwrap();
        store.save(&bytes, "alpha.db", "user_abc").unwrap();

        let record = store.resolve("user_abc", None).unwrap();
        assert_eq!(record.file_name, "alpha.db");
    }

    #[test]
    fn resolve_by_name() {
        let root = TempDir::new().unwrap();
        let store = FileStore::new(root.path()).unwrap();
        let bytes = sqlite_bytes();

        store.save(&bytes, "named.db", "user_abc").unwrap();

        let record = store.resolve("user_abc", Some("named.db")).unwrap();
        assert_eq!(record.file_name, "named.db");

        let err = store.resolve("user_abc", Some("other.db")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn sessions_do_not_interfere() {
        let root = TempDir::new().unwrap();
        let store = FileStore::new(root.path()).unwrap();
        let bytes = sqlite_bytes();

        let a = store.save(&bytes, "a.db", "user_a").unwrap();
        let b = store.save(&bytes, "b.db", "user_b").unwrap();

        assert_ne!(a.file_path, b.file_path);
        assert_eq!(store.resolve("user_a", None).unwrap().file_name, "a.db");
        assert_eq!(store.resolve("user_b", None).unwrap().file_name, "b.db");
    }
}
