use runo_core::Session;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game room not found: {0}")]
    NotFound(String),
    #[error("room code already in use: {0}")]
    CodeTaken(String),
    #[error("stale session version: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A session document plus the version counter the compare-and-swap save
/// checks against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedSession {
    pub version: u64,
    pub session: Session,
}

/// Load-by-code / save-with-version storage. The engine assumes every
/// transition runs against an exclusively held snapshot; `save` rejecting
/// a stale `expected` version is what enforces that when callers race.
pub trait SessionStore {
    fn create(&mut self, session: Session) -> Result<VersionedSession, StoreError>;
    fn load(&self, code: &str) -> Result<VersionedSession, StoreError>;
    fn save(
        &mut self,
        code: &str,
        expected: u64,
        session: Session,
    ) -> Result<VersionedSession, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: HashMap<String, VersionedSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.sessions.contains_key(code)
    }
}

impl SessionStore for MemoryStore {
    fn create(&mut self, session: Session) -> Result<VersionedSession, StoreError> {
        let code = session.code.clone();
        if self.sessions.contains_key(&code) {
            return Err(StoreError::CodeTaken(code));
        }
        let doc = VersionedSession {
            version: 1,
            session,
        };
        self.sessions.insert(code, doc.clone());
        Ok(doc)
    }

    fn load(&self, code: &str) -> Result<VersionedSession, StoreError> {
        self.sessions
            .get(code)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    fn save(
        &mut self,
        code: &str,
        expected: u64,
        session: Session,
    ) -> Result<VersionedSession, StoreError> {
        let current = self
            .sessions
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;
        if current.version != expected {
            return Err(StoreError::VersionConflict {
                expected,
                actual: current.version,
            });
        }
        current.version += 1;
        current.session = session;
        Ok(current.clone())
    }
}

/// One JSON document per session under a directory, `<code>.json`. Card
/// faces inside are the plain strings of the document format.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn document_path(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{code}.json"))
    }

    fn read(&self, path: &Path, code: &str) -> Result<VersionedSession, StoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(code.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, path: &Path, doc: &VersionedSession) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(doc)?;
        fs::write(path, body)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn create(&mut self, session: Session) -> Result<VersionedSession, StoreError> {
        let code = session.code.clone();
        let path = self.document_path(&code);
        if path.exists() {
            return Err(StoreError::CodeTaken(code));
        }
        let doc = VersionedSession {
            version: 1,
            session,
        };
        self.write(&path, &doc)?;
        Ok(doc)
    }

    fn load(&self, code: &str) -> Result<VersionedSession, StoreError> {
        self.read(&self.document_path(code), code)
    }

    fn save(
        &mut self,
        code: &str,
        expected: u64,
        session: Session,
    ) -> Result<VersionedSession, StoreError> {
        let path = self.document_path(code);
        let current = self.read(&path, code)?;
        if current.version != expected {
            return Err(StoreError::VersionConflict {
                expected,
                actual: current.version,
            });
        }
        let doc = VersionedSession {
            version: expected + 1,
            session,
        };
        self.write(&path, &doc)?;
        Ok(doc)
    }
}
