//! Session token storage
//!
//! The access/refresh token pair lives outside the in-memory state: the HTTP
//! layer reads it on every request and the auth operations write it on
//! login/refresh/logout. `TokenStore` is the single seam both sides share.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use shared::auth::TokenPair;

/// Durable key-value storage for the session token pair.
///
/// Operations are atomic single-value reads/writes, so implementations are
/// synchronous and must be callable from concurrent tasks.
pub trait TokenStore: Send + Sync {
    /// Current access token, if a session is persisted.
    fn access(&self) -> Option<String>;

    /// Current refresh token, if a session is persisted.
    fn refresh_token(&self) -> Option<String>;

    /// Persist a freshly issued token pair, replacing any previous one.
    fn store(&self, pair: TokenPair);

    /// Drop both tokens (logout or irrecoverable refresh failure).
    fn clear(&self);
}

/// In-memory token store for tests and embedders with their own persistence
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    pair: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a persisted pair already present.
    pub fn with_tokens(pair: TokenPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn access(&self) -> Option<String> {
        self.pair
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|p| p.access_token.clone()))
    }

    fn refresh_token(&self) -> Option<String> {
        self.pair
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|p| p.refresh_token.clone()))
    }

    fn store(&self, pair: TokenPair) {
        if let Ok(mut guard) = self.pair.write() {
            *guard = Some(pair);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.pair.write() {
            *guard = None;
        }
    }
}

/// File-backed token store
///
/// Persists the pair as pretty JSON under `<dir>/session.json`, keyed
/// `accessToken` / `refreshToken` to match the wire names.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cache: RwLock<Option<TokenPair>>,
}

impl FileTokenStore {
    /// Open (or prepare) the store under the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into().join("session.json");
        let cache = RwLock::new(Self::load(&path));
        Self { path, cache }
    }

    /// File path backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Option<TokenPair> {
        if !path.exists() {
            return None;
        }
        let json = fs::read_to_string(path).ok()?;
        serde_json::from_str(&json).ok()
    }

    fn save(&self, pair: &TokenPair) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(path = %self.path.display(), %err, "Failed to create token dir");
                return;
            }
        }
        match serde_json::to_string_pretty(pair) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    tracing::warn!(path = %self.path.display(), %err, "Failed to persist tokens");
                }
            }
            Err(err) => tracing::warn!(%err, "Failed to encode tokens"),
        }
    }

    fn delete(&self) {
        if self.path.exists() {
            if let Err(err) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), %err, "Failed to delete tokens");
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn access(&self) -> Option<String> {
        self.cache
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|p| p.access_token.clone()))
    }

    fn refresh_token(&self) -> Option<String> {
        self.cache
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|p| p.refresh_token.clone()))
    }

    fn store(&self, pair: TokenPair) {
        self.save(&pair);
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(pair);
        }
    }

    fn clear(&self) {
        self.delete();
        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
        }
    }
}
