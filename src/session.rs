//! Persisted session state.
//!
//! The session lives in an external key-value store under fixed keys, the
//! same layout a browser keeps in local storage. Absence of `auth_token`
//! means logged out.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use derive_more::{From, Into};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const TOKEN_KEY: &str = "auth_token";
pub const EMAIL_KEY: &str = "auth_email";
pub const NAME_KEY: &str = "auth_name";

/// Opaque bearer credential issued by the backend.
///
/// No `Display` impl so it cannot end up in a log line by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct Token(pub String);

impl Token {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub token: Option<Token>,
    pub identity: Option<Identity>,
}

impl Session {
    #[must_use]
    pub fn new(token: Token, identity: Option<Identity>) -> Self {
        Self {
            token: Some(token),
            identity,
        }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Name to greet the user with: stored name, else email local part, else `"User"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let Some(identity) = &self.identity else {
            return "User".into();
        };
        if let Some(name) = identity.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_owned();
        }
        match identity.email.split_once('@') {
            Some((local, _)) if !local.is_empty() => local.to_owned(),
            _ => "User".into(),
        }
    }

    /// Read the session back from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store cannot be read.
    pub fn load(store: &dyn SessionStore) -> Result<Self, Error> {
        let token = store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()).map(Token);
        let identity = store
            .get(EMAIL_KEY)?
            .filter(|e| !e.is_empty())
            .map(|email| -> Result<Identity, Error> {
                Ok(Identity {
                    email,
                    name: store.get(NAME_KEY)?.filter(|n| !n.is_empty()),
                })
            })
            .transpose()?;
        Ok(Self { token, identity })
    }

    /// Write every key of this session through to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if any write fails.
    pub fn save(&self, store: &dyn SessionStore) -> Result<(), Error> {
        match &self.token {
            Some(token) => store.set(TOKEN_KEY, token.as_str())?,
            None => store.remove(TOKEN_KEY)?,
        }
        match &self.identity {
            Some(identity) => {
                store.set(EMAIL_KEY, &identity.email)?;
                match &identity.name {
                    Some(name) => store.set(NAME_KEY, name)?,
                    None => store.remove(NAME_KEY)?,
                }
            }
            None => {
                store.remove(EMAIL_KEY)?;
                store.remove(NAME_KEY)?;
            }
        }
        Ok(())
    }

    /// Remove every session key from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if any removal fails.
    pub fn clear(store: &dyn SessionStore) -> Result<(), Error> {
        store.remove(TOKEN_KEY)?;
        store.remove(EMAIL_KEY)?;
        store.remove(NAME_KEY)
    }
}

/// Process-external string key-value store the session is persisted in.
///
/// Implementations must make a completed `set`/`remove` visible to every
/// later `get`, including from a store opened afresh on the same backing data.
pub trait SessionStore: Send + Sync + 'static {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), Error>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        (**self).remove(key)
    }
}

/// In-memory store, lost with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON-file store: one flat object of string keys to string values.
///
/// Every write rewrites the file, so a new `FileStore` on the same path
/// observes all completed writes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `~/.texsarthi/session.json`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no home directory can be determined.
    pub fn default_location() -> Result<Self, Error> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Cannot find home directory".into()))?;
        Ok(Self::new(home.join(".texsarthi").join("session.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, Error> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Store(format!("{}: {e}", self.path.display())))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| Error::Store(format!("{}: {e}", self.path.display())))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("{}: {e}", parent.display())))?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Store(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| Error::Store(format!("{}: {e}", self.path.display())))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Session {
        Session::new(
            Token::from("tok-1"),
            Some(Identity::new("alice@texsarthi.com").with_name("Alice")),
        )
    }

    #[test]
    fn save_then_load_roundtrips_through_store() {
        let store = MemoryStore::new();
        alice().save(&store).unwrap();

        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(Session::load(&store).unwrap(), alice());
    }

    #[test]
    fn clear_removes_every_key() {
        let store = MemoryStore::new();
        alice().save(&store).unwrap();
        Session::clear(&store).unwrap();

        for key in [TOKEN_KEY, EMAIL_KEY, NAME_KEY] {
            assert_eq!(store.get(key).unwrap(), None);
        }
        assert!(!Session::load(&store).unwrap().is_logged_in());
    }

    #[test]
    fn saving_without_name_drops_stale_name() {
        let store = MemoryStore::new();
        alice().save(&store).unwrap();
        Session::new(Token::from("tok-2"), Some(Identity::new("bob@texsarthi.com")))
            .save(&store)
            .unwrap();

        let loaded = Session::load(&store).unwrap();
        assert_eq!(loaded.identity.unwrap().name, None);
    }

    #[test]
    fn empty_token_counts_as_logged_out() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "").unwrap();
        assert!(!Session::load(&store).unwrap().is_logged_in());
    }

    #[test]
    fn display_name_fallbacks() {
        assert_eq!(alice().display_name(), "Alice");

        let no_name = Session::new(Token::from("t"), Some(Identity::new("ravi@mill.in")));
        assert_eq!(no_name.display_name(), "ravi");

        assert_eq!(Session::default().display_name(), "User");
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        alice().save(&FileStore::new(&path)).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(Session::load(&reopened).unwrap(), alice());

        Session::clear(&reopened).unwrap();
        assert_eq!(Session::load(&FileStore::new(&path)).unwrap(), Session::default());
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::new(&path).get(TOKEN_KEY).unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }
}
