use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::schemas::SessionUser;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user_data";

/// Persistent string key-value storage backing the session.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// A JSON object on disk. Every write rewrites the whole file; read and write
/// failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path);
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        let encoded = match serde_json::to_string_pretty(&self.values) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to encode session store");
                return;
            }
        };

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(
                    error = %err,
                    path = %parent.display(),
                    "Failed to create session store directory"
                );
            }
        }

        if let Err(err) = fs::write(&self.path, encoded) {
            tracing::warn!(
                error = %err,
                path = %self.path.display(),
                "Failed to write session store"
            );
        }
    }
}

fn read_values(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "Failed to read session store");
            return BTreeMap::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(error = %err, path = %path.display(), "Session store is not a JSON object");
        BTreeMap::new()
    })
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.flush();
        }
    }
}

/// Returned by [`SessionStore::logout`]; the holder must discard every piece
/// of in-memory view state.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reload;

pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn set_token(&mut self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn set_user(&mut self, user: &SessionUser) {
        match serde_json::to_string(user) {
            Ok(encoded) => self.store.set(USER_KEY, &encoded),
            Err(err) => tracing::warn!(error = %err, "Failed to encode session user"),
        }
    }

    pub fn user(&self) -> Option<SessionUser> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(error = %err, "Stored session user is unreadable");
                None
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some_and(|token| !token.is_empty())
    }

    pub fn logout(&mut self) -> Reload {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        tracing::info!("Session cleared");
        Reload
    }
}
