use serde::Serialize;
use serde_json::Value;

use super::{InvoiceFilter, list_field, with_query};
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::{Method, Transport};

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// `GET /invoices[?status&search]`, unwrapping the `invoices` array.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Value>, Error> {
        let body = self
            .request(&with_query("/invoices", filter.pairs()), RequestOptions::get())
            .await?;
        Ok(list_field(body, "invoices"))
    }

    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn create_invoice<B: Serialize + ?Sized>(&self, invoice: &B) -> Result<Value, Error> {
        self.request("/invoices", RequestOptions::json(Method::Post, invoice)?)
            .await
    }

    /// `GET /invoices/ai-available`: whether the AI invoice assistant is enabled.
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn ai_availability(&self) -> Result<Value, Error> {
        self.request("/invoices/ai-available", RequestOptions::get())
            .await
    }
}
