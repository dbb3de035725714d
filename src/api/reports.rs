use serde_json::Value;

use super::with_query;
use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::Transport;

/// Inclusive report window; dates are `YYYY-MM-DD` strings passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    #[must_use]
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// `GET /reports/sales[?start_date&end_date]`
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures.
    pub async fn sales_report(&self, range: &DateRange) -> Result<Value, Error> {
        let path = with_query(
            "/reports/sales",
            [
                ("start_date", range.start_date.as_deref()),
                ("end_date", range.end_date.as_deref()),
            ],
        );
        self.request(&path, RequestOptions::get()).await
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
    async fn open_ended_range_drops_missing_bound() {
        let transport = ScriptedTransport::new()
            .respond(200, json!({ "summary": {} }))
            .respond(200, json!({ "summary": {} }));
        let client = ApiClient::new(
            ClientConfig::new(ROOT.parse().unwrap()),
            transport.clone(),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();

        client.sales_report(&DateRange::new("2024-04-01", "2024-06-30")).await.unwrap();
        client
            .sales_report(&DateRange { start_date: Some("2024-04-01".into()), end_date: None })
            .await
            .unwrap();

        assert_eq!(
            transport.paths(ROOT),
            [
                "/reports/sales?start_date=2024-04-01&end_date=2024-06-30",
                "/reports/sales?start_date=2024-04-01",
            ]
        );
    }
}
