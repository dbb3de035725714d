use serde::Serialize;
use serde_json::Value;

use super::{InventoryFilter, list_field, with_query};
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::{Method, Transport};

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// `GET /inventory[?type&search]`, unwrapping the `inventory` array.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn inventory(&self, filter: &InventoryFilter) -> Result<Vec<Value>, Error> {
        let body = self
            .request(&with_query("/inventory", filter.pairs()), RequestOptions::get())
            .await?;
        Ok(list_field(body, "inventory"))
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn create_inventory_item<B: Serialize + ?Sized>(&self, item: &B) -> Result<Value, Error> {
        self.request("/inventory", RequestOptions::json(Method::Post, item)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn update_inventory_item<B: Serialize + ?Sized>(
        &self,
        id: u64,
        item: &B,
    ) -> Result<Value, Error> {
        self.request(&format!("/inventory/{id}"), RequestOptions::json(Method::Put, item)?)
            .await
    }
}
