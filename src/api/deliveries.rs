use serde::Serialize;
use serde_json::Value;

use super::{DeliveryFilter, with_query};
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::{Method, Transport};

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// `GET /deliveries[?status&search]`. Returns the raw payload
    /// (`deliveries` plus `pagination`).
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn deliveries(&self, filter: &DeliveryFilter) -> Result<Value, Error> {
        self.request(&with_query("/deliveries", filter.pairs()), RequestOptions::get())
            .await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn create_delivery<B: Serialize + ?Sized>(&self, delivery: &B) -> Result<Value, Error> {
        self.request("/deliveries", RequestOptions::json(Method::Post, delivery)?)
            .await
    }
}
