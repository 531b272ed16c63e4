//! Encrypted persistence of the authenticated session.
//!
//! Restoring never fails: a missing, unreadable or tampered blob all read
//! back as "no session".

pub mod codec;
pub mod storage;

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use codec::{AesGcmCodec, SessionCodec};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

use crate::errors::StorageError;
use crate::models::Session;

/// Storage key of the encrypted session blob.
pub const SESSION_KEY: &str = "rizzource_session";

#[derive(Clone)]
pub struct SessionPersistence {
    storage: Arc<dyn KeyValueStore>,
    codec: Arc<dyn SessionCodec>,
}

impl SessionPersistence {
    pub fn new(storage: Arc<dyn KeyValueStore>, codec: Arc<dyn SessionCodec>) -> Self {
        Self { storage, codec }
    }

    /// In-memory storage with the default codec.
    pub fn in_memory(passphrase: &str) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(AesGcmCodec::new(passphrase)),
        )
    }

    /// Encrypts and writes the session, replacing any previous blob.
    pub fn persist(&self, session: &Session) -> Result<(), StorageError> {
        let blob = self.codec.encode(session)?;
        self.storage.set(SESSION_KEY, &blob)?;
        debug!("Session persisted");
        Ok(())
    }

    pub fn restore(&self) -> Option<Session> {
        let blob = match self.storage.get(SESSION_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read stored session: {e}");
                return None;
            }
        };

        match self.codec.decode(&blob) {
            Ok(session) => {
                info!("Restored session for user {:?}", session.user_id());
                Some(session)
            }
            Err(e) => {
                warn!("Discarding stored session: {e}");
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_KEY)
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use serde_json::json;

    fn session() -> Session {
        Session {
            token: "tok".to_string(),
            user: User(json!({"id": "u-1"})),
            roles: ["student".to_string(), "mentor".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn test_restore_after_persist() {
        let persistence = SessionPersistence::in_memory("k");
        persistence.persist(&session()).unwrap();
        assert_eq!(persistence.restore(), Some(session()));
    }

    #[test]
    fn test_restore_absent_is_none() {
        assert_eq!(SessionPersistence::in_memory("k").restore(), None);
    }

    #[test]
    fn test_restore_garbage_is_none() {
        let persistence = SessionPersistence::in_memory("k");
        for garbage in ["", "%%%", "U2FsdGVkX1+garbage", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"] {
            persistence.storage().set(SESSION_KEY, garbage).unwrap();
            assert_eq!(persistence.restore(), None, "garbage {garbage:?}");
        }
    }

    #[test]
    fn test_restore_with_other_key_is_none() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let writer = SessionPersistence::new(storage.clone(), Arc::new(AesGcmCodec::new("a")));
        let reader = SessionPersistence::new(storage, Arc::new(AesGcmCodec::new("b")));
        writer.persist(&session()).unwrap();
        assert_eq!(reader.restore(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let persistence = SessionPersistence::in_memory("k");
        persistence.persist(&session()).unwrap();
        persistence.clear().unwrap();
        persistence.clear().unwrap();
        assert_eq!(persistence.storage().get(SESSION_KEY).unwrap(), None);
        assert_eq!(persistence.restore(), None);
    }

    #[test]
    fn test_file_backed_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let build = || {
            SessionPersistence::new(
                Arc::new(FileStore::new(dir.path())),
                Arc::new(AesGcmCodec::new("k")),
            )
        };
        build().persist(&session()).unwrap();
        assert_eq!(build().restore(), Some(session()));
    }
}
