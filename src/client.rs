use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::error::{Error, Rejection, TransportError};
use crate::session::{Identity, Session, SessionStore, TOKEN_KEY, Token};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::types::AuthResponse;

const LOGIN_ENDPOINT: &str = "/login";
const SIGNUP_ENDPOINT: &str = "/signup";

/// Method, body and extra headers of one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    /// Pre-serialized JSON.
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn delete() -> Self {
        Self {
            method: Method::Delete,
            ..Self::default()
        }
    }

    /// `method` with `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(method: Method, body: &B) -> Result<Self, Error> {
        Ok(Self {
            method,
            body: Some(serde_json::to_string(body)?),
            headers: Vec::new(),
        })
    }

    /// Add or replace a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }
}

/// Result of one attempt before any login-based recovery.
enum Attempt {
    Done(Value),
    /// 401: the session has been cleared.
    Unauthorized,
    /// 422 and the anonymous retry failed too: the session has been cleared.
    Stale(Rejection),
}

impl Attempt {
    fn into_error(self) -> Error {
        match self {
            Self::Done(_) | Self::Unauthorized => Error::AuthRequired,
            Self::Stale(rejection) => Error::AuthStale(rejection),
        }
    }
}

/// Session-aware client for the TEX-SARTHI JSON API.
///
/// Construct once at startup and share by reference (or `Arc`). The session is
/// mirrored from `store` on construction and written through on every change.
pub struct ApiClient<T, S> {
    config: ClientConfig,
    transport: T,
    store: S,
    session: RwLock<Session>,
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// Create a client, loading any previously persisted session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the persisted session cannot be read.
    pub fn new(config: ClientConfig, transport: T, store: S) -> Result<Self, Error> {
        let session = Session::load(&store)?;
        Ok(Self {
            config,
            transport,
            store,
            session: RwLock::new(session),
        })
    }

    /// Configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute API root every path is joined onto.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.config.api_root
    }

    /// Store backing the persisted session.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.session.read().token.clone()
    }

    /// Identity of the logged-in user, if known.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.session.read().identity.clone()
    }

    /// Snapshot of the in-memory session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    /// Whether a token is held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.read().is_logged_in()
    }

    /// Replace the active token, persisting it before it becomes visible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the write fails; the previous token stays active.
    pub fn set_token(&self, token: impl Into<Token>) -> Result<(), Error> {
        let token = token.into();
        self.store.set(TOKEN_KEY, token.as_str())?;
        self.session.write().token = Some(token);
        Ok(())
    }

    /// Replace the whole session (token and identity).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the write fails.
    pub fn set_session(&self, session: Session) -> Result<(), Error> {
        session.save(&self.store)?;
        *self.session.write() = session;
        Ok(())
    }

    /// Forget the session, both persisted and in memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store cannot be cleared.
    pub fn clear_token(&self) -> Result<(), Error> {
        Session::clear(&self.store)?;
        *self.session.write() = Session::default();
        Ok(())
    }

    /// Alias of [`clear_token`](Self::clear_token).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store cannot be cleared.
    pub fn logout(&self) -> Result<(), Error> {
        self.clear_token()
    }

    /// Log in and install the returned session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthRequired`] on bad credentials, [`Error::ServerRejected`]
    /// for validation failures, [`Error::Unreachable`] if the backend is down.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        let body = json!({ "email": email, "password": password });
        self.authenticate(LOGIN_ENDPOINT, &body, email, None).await
    }

    /// Create an account and install the returned session.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login); a taken email surfaces as `ServerRejected` (409).
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, Error> {
        let body = json!({ "name": name, "email": email, "password": password });
        self.authenticate(SIGNUP_ENDPOINT, &body, email, Some(name)).await
    }

    /// Issue a call to `endpoint` (relative to the API root) and return the JSON body.
    ///
    /// A 401 or 422 clears the session and triggers at most one recovery: for a
    /// 422 an anonymous retry, then for either status a single login with the
    /// configured recovery credentials followed by one authorized retry.
    /// Credential endpoints never recover.
    ///
    /// # Errors
    ///
    /// [`Error::AuthRequired`] / [`Error::AuthStale`] when recovery is exhausted,
    /// [`Error::ServerRejected`] for other non-success statuses,
    /// [`Error::Unreachable`] when no response was received.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, Error> {
        let url = self.url(endpoint);
        let attempt = self.attempt(&url, &options).await?;
        match attempt {
            Attempt::Done(value) => Ok(value),
            failed if is_credential_endpoint(endpoint) => Err(failed.into_error()),
            failed => self.recover(&url, &options, failed).await,
        }
    }

    /// [`request`](Self::request), deserializing the body into `R`.
    ///
    /// # Errors
    ///
    /// As `request`, plus [`Error::Decode`] if the body does not match `R`.
    pub async fn request_as<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R, Error> {
        let value = self.request(endpoint, options).await?;
        serde_json::from_value(value).map_err(Into::into)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.config.api_root)
    }

    /// One call with the current token, plus the anonymous retry for a 422.
    async fn attempt(&self, url: &str, options: &RequestOptions) -> Result<Attempt, Error> {
        let token = self.token();
        let response = self.dispatch(url, options, token.as_ref()).await?;

        match response.status {
            401 => {
                tracing::warn!(url, "Authentication failed, clearing session");
                self.clear_token()?;
                Ok(Attempt::Unauthorized)
            }
            422 => {
                tracing::warn!(url, "Received 422, clearing session and retrying without auth");
                self.clear_token()?;
                let retry = self.dispatch(url, options, None).await?;
                if retry.is_success() {
                    return parse_body(&retry.body).map(Attempt::Done);
                }
                Ok(Attempt::Stale(Rejection::from_body(
                    response.status,
                    response.status_text,
                    &response.body,
                )))
            }
            _ if response.is_success() => parse_body(&response.body).map(Attempt::Done),
            _ => Err(self.rejected(url, &response)),
        }
    }

    /// The single login-based recovery for a failed attempt.
    async fn recover(
        &self,
        url: &str,
        options: &RequestOptions,
        failed: Attempt,
    ) -> Result<Value, Error> {
        let Some(token) = self.recovery_login().await else {
            return Err(failed.into_error());
        };

        let retry = self.dispatch(url, options, Some(&token)).await?;
        if retry.is_success() {
            return parse_body(&retry.body);
        }
        tracing::warn!(url, status = retry.status, "Retry after recovery login failed");
        Err(failed.into_error())
    }

    async fn recovery_login(&self) -> Option<Token> {
        let creds = self.config.recovery.as_ref()?;
        match self.login(&creds.email, &creds.password).await {
            Ok(response) => Some(Token(response.token)),
            Err(e) => {
                tracing::warn!(error = %e, "Automatic re-login failed");
                None
            }
        }
    }

    async fn authenticate(
        &self,
        endpoint: &str,
        body: &Value,
        email: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, Error> {
        let url = self.url(endpoint);
        let options = RequestOptions::json(Method::Post, body)?;
        let value = match self.attempt(&url, &options).await? {
            Attempt::Done(value) => value,
            failed => return Err(failed.into_error()),
        };

        let response: AuthResponse = serde_json::from_value(value)?;
        let identity = response.identity(email, name);
        self.set_session(Session::new(Token(response.token.clone()), Some(identity)))?;
        tracing::info!(endpoint, "Session established");
        Ok(response)
    }

    async fn dispatch(
        &self,
        url: &str,
        options: &RequestOptions,
        token: Option<&Token>,
    ) -> Result<HttpResponse, Error> {
        let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
        if let Some(token) = token {
            headers.push(("Authorization".to_owned(), format!("Bearer {}", token.as_str())));
        }
        for (name, value) in &options.headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        let request = HttpRequest {
            method: options.method,
            url: url.to_owned(),
            headers,
            body: options.body.clone(),
        };

        tracing::debug!(method = options.method.as_str(), url, "API request");
        self.transport.send(request).await.map_err(|e| match e {
            TransportError::Connect(detail) => {
                tracing::error!(url, error = %detail, "Network error, is the backend running?");
                Error::Unreachable {
                    api_root: self.config.api_root.clone(),
                }
            }
            other => Error::Transport(other.to_string()),
        })
    }

    fn rejected(&self, url: &str, response: &HttpResponse) -> Error {
        let rejection = Rejection::from_body(
            response.status,
            response.status_text.clone(),
            &response.body,
        );
        tracing::error!(
            url,
            status = response.status,
            message = rejection.message.as_deref().unwrap_or_default(),
            "API error"
        );
        Error::ServerRejected(rejection)
    }
}

fn is_credential_endpoint(endpoint: &str) -> bool {
    matches!(endpoint, LOGIN_ENDPOINT | SIGNUP_ENDPOINT)
}

fn parse_body(body: &str) -> Result<Value, Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(Into::into)
}
