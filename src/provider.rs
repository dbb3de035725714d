//! Ways of establishing a session, chosen once at startup.
//!
//! [`RemoteProvider`] talks to the backend and mirrors accepted accounts into
//! the local table. [`LocalProvider`] is the offline demo mode: accounts live
//! in the session store itself and every session gets the placeholder token
//! `demo-token`. Local mode keeps passwords in plain text and must only be
//! used for demos.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Error;
use crate::session::{Identity, Session, SessionStore, Token};
use crate::transport::Transport;

/// Store key of the local account table.
pub const USERS_KEY: &str = "auth_users";

/// Token installed by [`LocalProvider`].
pub const DEMO_TOKEN: &str = "demo-token";

/// Establishes a session from credentials.
pub trait SessionProvider: Send + Sync {
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, Error>> + Send;

    fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, Error>> + Send;
}

/// Trimmed login form fields.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if either field is empty.
pub fn validate_login(email: &str, password: &str) -> Result<(String, String), Error> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(Error::InvalidInput("Please enter email and password.".into()));
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Trimmed signup form fields.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if any field is empty.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(String, String, String), Error> {
    let (name, email) = (name.trim(), email.trim());
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(Error::InvalidInput(
            "Please fill in name, email and password.".into(),
        ));
    }
    Ok((name.to_owned(), email.to_owned(), password.to_owned()))
}

/// Backend-backed provider.
pub struct RemoteProvider<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T: Transport, S: SessionStore> RemoteProvider<'a, T, S> {
    #[must_use]
    pub fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }
}

impl<T: Transport, S: SessionStore> SessionProvider for RemoteProvider<'_, T, S> {
    async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let (email, password) = validate_login(email, password)?;
        self.client.login(&email, &password).await?;
        let session = self.client.session();
        mirror_account(self.client.store(), &session, &email, &password)?;
        Ok(session)
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session, Error> {
        let (name, email, password) = validate_signup(name, email, password)?;
        self.client.signup(&name, &email, &password).await?;
        let session = self.client.session();
        mirror_account(self.client.store(), &session, &email, &password)?;
        Ok(session)
    }
}

/// Copies a backend-accepted account into the local table so the same
/// credentials keep working in demo mode.
fn mirror_account(
    store: &dyn SessionStore,
    session: &Session,
    email: &str,
    password: &str,
) -> Result<(), Error> {
    let name = session.identity.as_ref().and_then(|i| i.name.as_deref());
    upsert_user(store, name, email, password)?;
    tracing::debug!(email = %email.to_lowercase(), "Account mirrored for offline login");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LocalUser {
    name: String,
    email: String,
    #[serde(default)]
    password: String,
}

fn load_users(store: &dyn SessionStore) -> Result<BTreeMap<String, LocalUser>, Error> {
    let Some(raw) = store.get(USERS_KEY)? else {
        return Ok(BTreeMap::new());
    };
    match serde_json::from_str(&raw) {
        Ok(users) => Ok(users),
        Err(e) => {
            tracing::warn!(error = %e, key = USERS_KEY, "Local account table unreadable, starting over empty");
            Ok(BTreeMap::new())
        }
    }
}

fn save_users(store: &dyn SessionStore, users: &BTreeMap<String, LocalUser>) -> Result<(), Error> {
    let raw = serde_json::to_string(users).map_err(|e| Error::Store(e.to_string()))?;
    store.set(USERS_KEY, &raw)
}

/// Inserts or replaces the account keyed by the lowercased email. A missing
/// name falls back to the email's local part, then `"User"`.
fn upsert_user(
    store: &dyn SessionStore,
    name: Option<&str>,
    email: &str,
    password: &str,
) -> Result<LocalUser, Error> {
    let key = email.to_lowercase();
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| match key.split('@').next() {
            Some(local) if !local.is_empty() => local.to_owned(),
            _ => "User".to_owned(),
        });
    let user = LocalUser {
        name,
        email: key.clone(),
        password: password.to_owned(),
    };

    let mut users = load_users(store)?;
    users.insert(key, user.clone());
    save_users(store, &users)?;
    Ok(user)
}

/// Offline demo provider keeping accounts under [`USERS_KEY`] in the client's store.
pub struct LocalProvider<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T: Transport, S: SessionStore> LocalProvider<'a, T, S> {
    #[must_use]
    pub fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    fn establish(&self, user: &LocalUser) -> Result<Session, Error> {
        let session = Session::new(
            Token::from(DEMO_TOKEN),
            Some(Identity::new(user.email.clone()).with_name(user.name.clone())),
        );
        self.client.set_session(session.clone())?;
        tracing::info!(email = %user.email, "Local demo session established");
        Ok(session)
    }
}

impl<T: Transport, S: SessionStore> SessionProvider for LocalProvider<'_, T, S> {
    async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let (email, password) = validate_login(email, password)?;
        let users = load_users(self.client.store())?;
        let user = users
            .get(&email.to_lowercase())
            .ok_or(Error::AccountNotFound)?;
        if user.password != password {
            return Err(Error::InvalidCredentials);
        }
        self.establish(user)
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session, Error> {
        let (name, email, password) = validate_signup(name, email, password)?;
        let user = upsert_user(self.client.store(), Some(&name), &email, &password)?;
        self.establish(&user)
    }
}
