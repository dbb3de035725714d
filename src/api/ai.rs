//! AI invoice assistant endpoints under `/ai/invoices`.
//!
//! Suggestions, pricing and templates are produced server-side; payloads are
//! passed through untouched.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::{Method, Transport};

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn ai_invoice_suggestions(&self, order_id: u64) -> Result<Value, Error> {
        self.request(
            &format!("/ai/invoices/suggestions/{order_id}"),
            RequestOptions::get(),
        )
        .await
    }

    /// `options` is forwarded as the request body (e.g. `{"auto_create": true}`).
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn generate_ai_invoice<B: Serialize + ?Sized>(
        &self,
        order_id: u64,
        options: &B,
    ) -> Result<Value, Error> {
        self.request(
            &format!("/ai/invoices/generate/{order_id}"),
            RequestOptions::json(Method::Post, options)?,
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn analyze_order_for_invoice(&self, order_id: u64) -> Result<Value, Error> {
        self.request(
            &format!("/ai/invoices/analyze-order/{order_id}"),
            RequestOptions::get(),
        )
        .await
    }

    /// Body is `options` with `order_ids` set to `order_ids`.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn bulk_generate_ai_invoices(
        &self,
        order_ids: &[u64],
        options: Map<String, Value>,
    ) -> Result<Value, Error> {
        let mut body = options;
        body.insert("order_ids".into(), json!(order_ids));
        self.request(
            "/ai/invoices/bulk-generate",
            RequestOptions::json(Method::Post, &body)?,
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn invoice_templates(&self) -> Result<Value, Error> {
        self.request("/ai/invoices/templates", RequestOptions::get())
            .await
    }

    /// `POST /ai/invoices/smart-pricing` with body `{"items": items}`.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn smart_pricing<B: Serialize + ?Sized>(&self, items: &B) -> Result<Value, Error> {
        let mut body = Map::new();
        body.insert("items".into(), serde_json::to_value(items)?);
        self.request(
            "/ai/invoices/smart-pricing",
            RequestOptions::json(Method::Post, &body)?,
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn ai_invoice_stats(&self) -> Result<Value, Error> {
        self.request("/ai/invoices/stats", RequestOptions::get())
            .await
    }
}
