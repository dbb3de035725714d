//! Convenience operations for each backend resource.
//!
//! Every operation is a thin wrapper over [`ApiClient::request`]: it shapes
//! the path and query string, then picks the part of the body callers need.
//! List operations return an empty `Vec` when the expected field is missing.
//!
//! ```rust,ignore
//! use texsarthi_client::api::OrderFilter;
//!
//! let pending = client.orders(&OrderFilter::default().with_status("pending")).await?;
//! ```
//!
//! [`ApiClient::request`]: crate::ApiClient::request

mod ai;
mod customers;
mod dashboard;
mod deliveries;
mod inventory;
mod invoices;
mod orders;
mod reports;
mod settings;

use serde_json::Value;

pub use reports::DateRange;

/// Filters accepted by `GET /orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl OrderFilter {
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    fn pairs(&self) -> [(&'static str, Option<&str>); 2] {
        [
            ("status", self.status.as_deref()),
            ("search", self.search.as_deref()),
        ]
    }
}

/// `GET /invoices` and `GET /deliveries` take the same filters as orders.
pub type InvoiceFilter = OrderFilter;
pub type DeliveryFilter = OrderFilter;

/// Filters accepted by `GET /inventory`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Sent as `type`.
    pub item_type: Option<String>,
    pub search: Option<String>,
}

impl InventoryFilter {
    #[must_use]
    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    fn pairs(&self) -> [(&'static str, Option<&str>); 2] {
        [
            ("type", self.item_type.as_deref()),
            ("search", self.search.as_deref()),
        ]
    }
}

/// `path` with a query string built from the present, non-empty pairs.
pub(crate) fn with_query<'a>(
    path: &str,
    pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            query.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", query.finish())
    } else {
        path.to_owned()
    }
}

/// The array under `field`, or empty when absent or not an array.
pub(crate) fn list_field(mut body: Value, field: &str) -> Vec<Value> {
    match body.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// The object under `field`, or an empty object when absent.
pub(crate) fn object_field(mut body: Value, field: &str) -> Value {
    match body.get_mut(field).map(Value::take) {
        Some(value @ Value::Object(_)) => value,
        _ => Value::Object(serde_json::Map::new()),
    }
}
