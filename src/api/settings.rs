use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::{Method, Transport};

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn settings(&self) -> Result<Value, Error> {
        self.request("/settings", RequestOptions::get()).await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn update_settings<B: Serialize + ?Sized>(&self, settings: &B) -> Result<Value, Error> {
        self.request("/settings", RequestOptions::json(Method::Put, settings)?)
            .await
    }
}
