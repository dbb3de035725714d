use serde::Serialize;
use serde_json::Value;

use super::{OrderFilter, list_field, object_field, with_query};
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::{Method, Transport};

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// `GET /orders`, unwrapping the `orders` array.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn orders(&self, filter: &OrderFilter) -> Result<Vec<Value>, Error> {
        let body = self
            .request(&with_query("/orders", filter.pairs()), RequestOptions::get())
            .await?;
        Ok(list_field(body, "orders"))
    }

    /// `GET /orders/{id}`, unwrapping the `order` object (`{}` when absent).
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures; an unknown id is a 404 `ServerRejected`.
    pub async fn order(&self, id: u64) -> Result<Value, Error> {
        let body = self
            .request(&format!("/orders/{id}"), RequestOptions::get())
            .await?;
        Ok(object_field(body, "order"))
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn create_order<B: Serialize + ?Sized>(&self, order: &B) -> Result<Value, Error> {
        self.request("/orders", RequestOptions::json(Method::Post, order)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn update_order<B: Serialize + ?Sized>(
        &self,
        id: u64,
        order: &B,
    ) -> Result<Value, Error> {
        self.request(&format!("/orders/{id}"), RequestOptions::json(Method::Put, order)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn delete_order(&self, id: u64) -> Result<Value, Error> {
        self.request(&format!("/orders/{id}"), RequestOptions::delete())
            .await
    }

    /// `POST /orders/{id}/invoice`: raise an invoice directly from an order.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn create_order_invoice<B: Serialize + ?Sized>(
        &self,
        id: u64,
        invoice: &B,
    ) -> Result<Value, Error> {
        self.request(
            &format!("/orders/{id}/invoice"),
            RequestOptions::json(Method::Post, invoice)?,
        )
        .await
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

    fn client(transport: &ScriptedTransport) -> ApiClient<ScriptedTransport, Arc<MemoryStore>> {
        ApiClient::new(
            ClientConfig::new(ROOT.parse().unwrap()),
            transport.clone(),
            Arc::new(MemoryStore::new()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn pending_orders_query_and_unwrap() {
        let transport = ScriptedTransport::new()
            .respond(200, json!({ "orders": [{ "id": 1, "status": "pending" }] }));
        let orders = client(&transport)
            .orders(&OrderFilter::default().with_status("pending"))
            .await
            .unwrap();

        assert_eq!(transport.paths(ROOT), ["/orders?status=pending"]);
        assert_eq!(transport.requests()[0].method, Method::Get);
        assert_eq!(orders, vec![json!({ "id": 1, "status": "pending" })]);
    }

    #[tokio::test]
    async fn orders_missing_field_is_empty() {
        let transport = ScriptedTransport::new().respond(200, json!({ "pagination": { "page": 1 } }));
        let orders = client(&transport)
            .orders(&OrderFilter::default())
            .await
            .unwrap();

        assert_eq!(transport.paths(ROOT), ["/orders"]);
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn update_order_sends_json_body() {
        let transport = ScriptedTransport::new().respond(200, json!({ "message": "Order updated" }));
        client(&transport)
            .update_order(12, &json!({ "quantity": 40, "status": "in_progress" }))
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Put);
        assert_eq!(transport.paths(ROOT), ["/orders/12"]);
        let body: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "quantity": 40, "status": "in_progress" }));
    }

    #[tokio::test]
    async fn order_invoice_and_lookup_paths() {
        let transport = ScriptedTransport::new()
            .respond(200, json!({ "order": { "order_number": "ORD-0005" } }))
            .respond(201, json!({ "invoice": { "invoice_number": "INV-0002" } }));
        let client = client(&transport);

        let order = client.order(5).await.unwrap();
        assert_eq!(order["order_number"], "ORD-0005");

        let created = client
            .create_order_invoice(5, &json!({ "amount": 1000, "tax_rate": 0.18 }))
            .await
            .unwrap();
        assert_eq!(created["invoice"]["invoice_number"], "INV-0002");
        assert_eq!(transport.paths(ROOT), ["/orders/5", "/orders/5/invoice"]);
        assert_eq!(transport.requests()[1].method, Method::Post);
    }
}
