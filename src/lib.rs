#![doc = include_str!("../README.md")]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use client::{ApiClient, RequestOptions};
pub use config::{ClientConfig, DEFAULT_API_ROOT, RecoveryCredentials, resolve_api_root};
pub use error::{Error, Rejection, TransportError};
pub use provider::{LocalProvider, RemoteProvider, SessionProvider};
pub use session::{FileStore, Identity, MemoryStore, Session, SessionStore, Token};
#[cfg(feature = "http")]
pub use transport::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, Method, Transport};
pub use types::{AuthResponse, DashboardStats, UserProfile};
