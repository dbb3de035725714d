use url::Url;

use crate::error::Error;

/// Standalone fallback when the client is not hosted next to the API.
pub const DEFAULT_API_ROOT: &str = "http://localhost:3000/api";

/// Path of the API below a co-located page's origin.
const API_PATH: &str = "/api";

/// Credentials used for the one automatic re-login after an auth failure.
///
/// Opt-in only. Nothing is used unless the application supplies a pair.
#[derive(Clone)]
pub struct RecoveryCredentials {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RecoveryCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Debug for RecoveryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// API client configuration.
///
/// ```rust,ignore
/// use texsarthi_client::ClientConfig;
///
/// let page: url::Url = "https://shop.example.com/orders.html".parse()?;
/// let config = ClientConfig::from_page(Some(&page));
/// assert_eq!(config.api_root(), "https://shop.example.com/api");
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ClientConfig {
    pub(crate) api_root: String,
    pub(crate) recovery: Option<RecoveryCredentials>,
}

impl ClientConfig {
    /// Use an explicit absolute API root.
    #[must_use]
    pub fn new(api_root: Url) -> Self {
        Self {
            api_root: trim_root(api_root.as_str()),
            recovery: None,
        }
    }

    /// Resolve the API root from the page hosting the client.
    #[must_use]
    pub fn from_page(page: Option<&Url>) -> Self {
        Self {
            api_root: resolve_api_root(page, DEFAULT_API_ROOT),
            recovery: None,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `TEXSARTHI_API_URL`: absolute API root, skips page resolution
    /// - `TEXSARTHI_PAGE_URL`: hosting page URL for co-located resolution
    /// - `TEXSARTHI_RECOVERY_EMAIL` / `TEXSARTHI_RECOVERY_PASSWORD`: recovery pair
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a URL is invalid or only half of the
    /// recovery pair is set.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = match std::env::var("TEXSARTHI_API_URL") {
            Ok(url_str) => {
                let url: Url = url_str
                    .parse()
                    .map_err(|e| Error::Config(format!("TEXSARTHI_API_URL: {e}")))?;
                Self::new(url)
            }
            Err(_) => {
                let page = match std::env::var("TEXSARTHI_PAGE_URL") {
                    Ok(page_str) => Some(
                        page_str
                            .parse::<Url>()
                            .map_err(|e| Error::Config(format!("TEXSARTHI_PAGE_URL: {e}")))?,
                    ),
                    Err(_) => None,
                };
                Self::from_page(page.as_ref())
            }
        };

        let email = std::env::var("TEXSARTHI_RECOVERY_EMAIL").ok();
        let password = std::env::var("TEXSARTHI_RECOVERY_PASSWORD").ok();
        match (email, password) {
            (Some(email), Some(password)) => {
                config = config.with_recovery_credentials(RecoveryCredentials::new(email, password));
            }
            (None, None) => {}
            _ => {
                return Err(Error::Config(
                    "TEXSARTHI_RECOVERY_EMAIL and TEXSARTHI_RECOVERY_PASSWORD must be set together"
                        .into(),
                ));
            }
        }

        Ok(config)
    }

    /// Enable the one-shot automatic re-login with these credentials.
    #[must_use]
    pub fn with_recovery_credentials(mut self, credentials: RecoveryCredentials) -> Self {
        self.recovery = Some(credentials);
        self
    }

    /// API root every endpoint is appended to, without a trailing slash.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    #[must_use]
    pub fn recovery_credentials(&self) -> Option<&RecoveryCredentials> {
        self.recovery.as_ref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_page(None)
    }
}

/// Pick the API root for a client loaded from `page`.
///
/// Pages served over `http`/`https` talk to the API on their own origin;
/// anything else (a `file://` page, or no page at all) uses `fallback`.
#[must_use]
pub fn resolve_api_root(page: Option<&Url>, fallback: &str) -> String {
    match page {
        Some(url) if matches!(url.scheme(), "http" | "https") => {
            format!("{}{API_PATH}", url.origin().ascii_serialization())
        }
        _ => trim_root(fallback),
    }
}

fn trim_root(root: &str) -> String {
    root.trim_end_matches('/').to_owned()
}
