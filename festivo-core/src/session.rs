use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

pub const USER_KEY: &str = "user";
pub const NAME_KEY: &str = "name";
pub const EMAIL_KEY: &str = "email";
pub const PHONE_KEY: &str = "phoneNumber";
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session store is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Persisted key-value session state (profile, auth token)
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    fn remove(&self, key: &str) -> Result<(), SessionStoreError>;
}

/// Process-local store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: RwLock::new(map) }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        let entries = self.entries.read().map_err(|_| SessionStoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.write().map_err(|_| SessionStoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.write().map_err(|_| SessionStoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Contact details used to pre-fill the checkout form. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

/// Session state handed to screens instead of reading storage ad hoc
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A session with nothing stored
    pub fn anonymous() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Read a key, treating store failures as absent
    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read session key {}: {}", key, e);
                None
            }
        }
    }

    fn profile(&self) -> Option<serde_json::Map<String, Value>> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                warn!("Stored user profile is not a JSON object, ignoring");
                None
            }
            Err(e) => {
                warn!("Stored user profile is malformed, ignoring: {}", e);
                None
            }
        }
    }

    /// Profile fields win over the flat keys; everything falls back to ""
    pub fn prefill(&self) -> Prefill {
        let profile = self.profile();
        let from_profile = |key: &str| -> Option<String> {
            profile.as_ref().and_then(|p| p.get(key)).and_then(text_value)
        };

        let prefill = Prefill {
            name: from_profile(NAME_KEY).or_else(|| self.read(NAME_KEY)).unwrap_or_default(),
            email: from_profile(EMAIL_KEY).or_else(|| self.read(EMAIL_KEY)).unwrap_or_default(),
            phone_number: from_profile(PHONE_KEY)
                .or_else(|| self.read(PHONE_KEY))
                .unwrap_or_default(),
            address: from_profile("address").unwrap_or_default(),
        };
        debug!("Session prefill loaded (name present: {})", !prefill.name.is_empty());
        prefill
    }

    /// Bearer token for authenticated calls, if logged in
    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    /// Record a login: the profile JSON and the issued token
    pub fn login(&self, profile: &Value, token: &str) -> Result<(), SessionStoreError> {
        self.store.set(USER_KEY, &serde_json::to_string(profile)?)?;
        self.store.set(TOKEN_KEY, token)?;
        Ok(())
    }

    pub fn logout(&self) -> Result<(), SessionStoreError> {
        for key in [USER_KEY, NAME_KEY, EMAIL_KEY, PHONE_KEY, TOKEN_KEY] {
            self.store.remove(key)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

/// Strings as-is, numbers (the backend stores phones as integers) stringified
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
