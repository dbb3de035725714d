use serde::Serialize;
use serde_json::Value;

use super::{list_field, with_query};
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::{Method, Transport};

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// `GET /customers[?search]`, unwrapping the `customers` array.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn customers(&self, search: Option<&str>) -> Result<Vec<Value>, Error> {
        let path = with_query("/customers", [("search", search)]);
        let body = self.request(&path, RequestOptions::get()).await?;
        Ok(list_field(body, "customers"))
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn create_customer<B: Serialize + ?Sized>(&self, customer: &B) -> Result<Value, Error> {
        self.request("/customers", RequestOptions::json(Method::Post, customer)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn update_customer<B: Serialize + ?Sized>(
        &self,
        id: u64,
        customer: &B,
    ) -> Result<Value, Error> {
        self.request(
            &format!("/customers/{id}"),
            RequestOptions::json(Method::Put, customer)?,
        )
        .await
    }

    /// `GET /customers/{id}/orders`, unwrapping the `orders` array.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn customer_orders(&self, id: u64) -> Result<Vec<Value>, Error> {
        let body = self
            .request(&format!("/customers/{id}/orders"), RequestOptions::get())
            .await?;
        Ok(list_field(body, "orders"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::ClientConfig;
    use crate::session::MemoryStore;
    use crate::testing::ScriptedTransport;

    const ROOT: &str = "http://localhost:3000/api";

    #[tokio::test]
    async fn search_and_customer_orders() {
        let transport = ScriptedTransport::new()
            .respond(200, json!({ "customers": [{ "name": "Sharma Textiles" }] }))
            .respond(200, json!({ "customer": { "id": 4 } }));
        let client = ApiClient::new(
            ClientConfig::new(ROOT.parse().unwrap()),
            transport.clone(),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();

        let customers = client.customers(Some("sharma")).await.unwrap();
        assert_eq!(customers.len(), 1);

        let orders = client.customer_orders(4).await.unwrap();
        assert!(orders.is_empty());

        assert_eq!(
            transport.paths(ROOT),
            ["/customers?search=sharma", "/customers/4/orders"]
        );
    }
}
