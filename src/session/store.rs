//! Session store
//!
//! The single owner of the credential pair. Every other component reads it
//! through accessors and changes it only through the operations below. Each
//! mutation is written through to durable storage while the write lock is
//! held, so the persisted record never lags behind a newer in-memory one.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::hydration::Latch;
use super::storage::DurableStorage;
use super::token;

/// Persisted shape of the session. The hydration flag lives in the store's
/// latch and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl SessionRecord {
    pub fn has_tokens(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some()
    }
}

/// Process-wide session state behind an explicit interface
pub struct SessionStore {
    state: RwLock<SessionRecord>,
    storage: Arc<dyn DurableStorage>,
    hydrated: Latch,
}

impl SessionStore {
    /// Create an empty, not yet hydrated store
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            state: RwLock::new(SessionRecord::default()),
            storage,
            hydrated: Latch::new(),
        }
    }

    /// Load durable storage into memory, then open the hydration gate.
    ///
    /// The gate opens even when storage fails or does not answer within
    /// `fallback`; in that case the session starts out empty.
    pub async fn hydrate(&self, fallback: Duration) {
        match tokio::time::timeout(fallback, self.storage.load()).await {
            Ok(Ok(Some(persisted))) => {
                let mut state = self.state.write().await;
                if state.has_tokens() {
                    // Signed in while storage was loading; the fresh tokens win
                    debug!("Ignoring persisted session, tokens were set during hydration");
                } else {
                    state.is_authenticated = persisted.has_tokens();
                    state.access_token = persisted.access_token;
                    state.refresh_token = persisted.refresh_token;
                    debug!(
                        "Restored session from storage (authenticated: {})",
                        state.is_authenticated
                    );
                }
            }
            Ok(Ok(None)) => debug!("No persisted session found"),
            Ok(Err(e)) => warn!("Failed to restore session from storage: {}", e),
            Err(_) => warn!(
                "Session storage did not respond within {:?}, starting without it",
                fallback
            ),
        }

        self.mark_hydrated();
    }

    /// Open the hydration gate. Only the first call has an effect.
    pub fn mark_hydrated(&self) {
        if self.hydrated.open() {
            debug!("Session store hydrated");
        }
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated.is_open()
    }

    /// The hydration gate, for consumers that need to wait on it
    pub fn hydration_gate(&self) -> &Latch {
        &self.hydrated
    }

    /// Store a backend-issued token pair. Never re-validated locally.
    pub async fn set_tokens(&self, access_token: String, refresh_token: String) {
        let mut state = self.state.write().await;
        state.access_token = Some(access_token);
        state.refresh_token = Some(refresh_token);
        state.is_authenticated = true;
        self.persist(&state).await;
    }

    /// Replace only the access token. Never re-validated locally.
    pub async fn set_access_token(&self, access_token: String) {
        let mut state = self.state.write().await;
        state.access_token = Some(access_token);
        state.is_authenticated = true;
        self.persist(&state).await;
    }

    /// Erase both tokens.
    ///
    /// A no-op before hydration, so a provisional empty state cannot clobber
    /// the record durable storage is about to supply. Returns whether a
    /// session was actually ended, letting callers redirect exactly once.
    pub async fn clear_auth(&self) -> bool {
        if !self.is_hydrated() {
            debug!("Ignoring clear_auth before hydration");
            return false;
        }

        let mut state = self.state.write().await;
        let had_session = state.has_tokens() || state.is_authenticated;
        *state = SessionRecord::default();
        self.persist(&state).await;

        if had_session {
            info!("Session cleared");
        }
        had_session
    }

    /// Recompute the authenticated flag from the tokens. Expired tokens are
    /// kept; the request interceptor asks the backend before giving up on them.
    pub async fn validate_and_restore_session(&self) {
        let mut state = self.state.write().await;
        let has_tokens = state.has_tokens();
        if state.is_authenticated != has_tokens {
            state.is_authenticated = has_tokens;
            self.persist(&state).await;
        }
    }

    pub fn is_token_expired(&self, token: Option<&str>) -> bool {
        token::is_expired(token, Utc::now())
    }

    pub fn expiration_of(&self, token: Option<&str>) -> Option<DateTime<Utc>> {
        token::expiration_instant(token)
    }

    pub async fn snapshot(&self) -> SessionRecord {
        self.state.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    async fn persist(&self, record: &SessionRecord) {
        if let Err(e) = self.storage.save(record).await {
            warn!("Failed to persist session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{token_expiring_in, token_with_payload};
    use crate::error::StorageError;
    use crate::session::storage::MemoryStorage;
    use async_trait::async_trait;

    const FALLBACK: Duration = Duration::from_millis(500);

    fn record(access: Option<&str>, refresh: Option<&str>) -> SessionRecord {
        SessionRecord {
            access_token: access.map(str::to_string),
            refresh_token: refresh.map(str::to_string),
            is_authenticated: access.is_some() || refresh.is_some(),
        }
    }

    async fn hydrated_store(initial: Option<SessionRecord>) -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(match initial {
            Some(r) => MemoryStorage::with_record(r),
            None => MemoryStorage::default(),
        });
        let store = SessionStore::new(storage.clone());
        store.hydrate(FALLBACK).await;
        (store, storage)
    }

    /// Storage whose read never completes
    struct StalledStorage;

    #[async_trait]
    impl DurableStorage for StalledStorage {
        async fn load(&self) -> std::result::Result<Option<SessionRecord>, StorageError> {
            std::future::pending().await
        }

        async fn save(&self, _record: &SessionRecord) -> std::result::Result<(), StorageError> {
            Ok(())
        }
    }

    /// Storage that cannot be read
    struct BrokenStorage;

    #[async_trait]
    impl DurableStorage for BrokenStorage {
        async fn load(&self) -> std::result::Result<Option<SessionRecord>, StorageError> {
            Err(StorageError::Io("permission denied".to_string()))
        }

        async fn save(&self, _record: &SessionRecord) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io("permission denied".to_string()))
        }
    }

    #[tokio::test]
    async fn test_clear_auth_before_hydration_is_noop() {
        let storage = Arc::new(MemoryStorage::with_record(record(Some("a"), Some("r"))));
        let store = SessionStore::new(storage.clone());

        store.set_tokens("a2".to_string(), "r2".to_string()).await;
        assert!(!store.clear_auth().await);

        assert_eq!(store.snapshot().await, record(Some("a2"), Some("r2")));
        assert_eq!(storage.stored(), Some(record(Some("a2"), Some("r2"))));
    }

    #[tokio::test]
    async fn test_clear_auth_after_hydration_empties_everything() {
        let (store, storage) = hydrated_store(Some(record(Some("a"), Some("r")))).await;

        assert!(store.clear_auth().await);
        assert_eq!(store.snapshot().await, SessionRecord::default());
        assert_eq!(storage.stored(), Some(SessionRecord::default()));

        // Nothing left to end the second time, but it still writes the empty record
        let saves = storage.save_count();
        assert!(!store.clear_auth().await);
        assert_eq!(storage.save_count(), saves + 1);
    }

    #[tokio::test]
    async fn test_set_tokens_trusts_expired_tokens() {
        let (store, storage) = hydrated_store(None).await;
        let expired = token_expiring_in(chrono::Duration::minutes(-10));

        store.set_tokens(expired.clone(), "not-even-a-jwt".to_string()).await;

        assert!(store.is_authenticated().await);
        assert_eq!(store.access_token().await, Some(expired));
        assert!(storage.stored().unwrap().is_authenticated);
    }

    #[tokio::test]
    async fn test_set_access_token_keeps_refresh_token() {
        let (store, _) = hydrated_store(Some(record(Some("a"), Some("r")))).await;
        store.set_access_token("a2".to_string()).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.access_token.as_deref(), Some("a2"));
        assert_eq!(snapshot.refresh_token.as_deref(), Some("r"));
        assert!(snapshot.is_authenticated);
    }

    #[tokio::test]
    async fn test_hydrate_recomputes_authenticated_flag() {
        let stale = SessionRecord {
            access_token: None,
            refresh_token: Some("r".to_string()),
            is_authenticated: false,
        };
        let (store, _) = hydrated_store(Some(stale)).await;
        assert!(store.is_hydrated());
        assert!(store.is_authenticated().await);

        let lying = SessionRecord {
            access_token: None,
            refresh_token: None,
            is_authenticated: true,
        };
        let (store, _) = hydrated_store(Some(lying)).await;
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_hydrate_keeps_tokens_set_during_load() {
        let storage = Arc::new(MemoryStorage::with_record(record(Some("old"), Some("old-r"))));
        let store = SessionStore::new(storage);
        store.set_tokens("new".to_string(), "new-r".to_string()).await;

        store.hydrate(FALLBACK).await;
        assert_eq!(store.access_token().await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_hydrate_falls_back_when_storage_stalls() {
        let store = SessionStore::new(Arc::new(StalledStorage));
        store.hydrate(Duration::from_millis(50)).await;

        assert!(store.is_hydrated());
        assert_eq!(store.snapshot().await, SessionRecord::default());
    }

    #[tokio::test]
    async fn test_storage_failures_do_not_block() {
        let store = SessionStore::new(Arc::new(BrokenStorage));
        store.hydrate(FALLBACK).await;
        assert!(store.is_hydrated());

        store.set_tokens("a".to_string(), "r".to_string()).await;
        assert!(store.is_authenticated().await);
        assert!(store.clear_auth().await);
    }

    #[tokio::test]
    async fn test_validate_and_restore_session() {
        let (store, _) = hydrated_store(None).await;
        store.validate_and_restore_session().await;
        assert!(!store.is_authenticated().await);

        // Expired access token with no refresh token is still "authenticated"
        // until the backend says otherwise
        let expired = token_expiring_in(chrono::Duration::minutes(-1));
        let (store, _) = hydrated_store(Some(record(Some(&expired), None))).await;
        store.validate_and_restore_session().await;
        store.validate_and_restore_session().await;
        assert!(store.is_authenticated().await);
        assert_eq!(store.access_token().await, Some(expired));
    }

    #[tokio::test]
    async fn test_mark_hydrated_is_idempotent() {
        let store = SessionStore::new(Arc::new(MemoryStorage::default()));
        assert!(!store.is_hydrated());
        store.mark_hydrated();
        store.mark_hydrated();
        assert!(store.is_hydrated());
    }

    #[tokio::test]
    async fn test_token_helpers_delegate_to_codec() {
        let store = SessionStore::new(Arc::new(MemoryStorage::default()));
        let valid = token_expiring_in(chrono::Duration::minutes(5));

        assert!(!store.is_token_expired(Some(&valid)));
        assert!(store.is_token_expired(Some("garbage")));
        assert!(store.is_token_expired(None));
        assert!(store.expiration_of(Some(&valid)).is_some());
        assert!(store.expiration_of(Some(&token_with_payload("{}"))).is_none());
    }
}
