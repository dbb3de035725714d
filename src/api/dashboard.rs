use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::Transport;
use crate::types::DashboardStats;

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    /// `GET /dashboard/stats`
    ///
    /// # Errors
    ///
    /// Propagates [`request`](Self::request) failures, or [`Error::Decode`] if a
    /// counter has the wrong type.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        self.request_as("/dashboard/stats", RequestOptions::get())
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

    #[tokio::test]
    async fn stats_decode_with_defaults() {
        let transport = ScriptedTransport::new()
            .respond(200, json!({ "totalOrders": 8, "pendingDeliveries": 2 }));
        let client = ApiClient::new(
            ClientConfig::default(),
            transport.clone(),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();

        let stats = client.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_orders, 8);
        assert_eq!(stats.pending_deliveries, 2);
        assert_eq!(stats.low_stock_items, 0);
        assert_eq!(transport.requests()[0].url, "http://localhost:3000/api/dashboard/stats");
    }

    #[tokio::test]
    async fn stats_decode_live_backend_shape() {
        let transport = ScriptedTransport::new().respond(
            200,
            json!({
                "totalOrders": 42,
                "lowStockItems": 3,
                "pendingDeliveries": 5,
                "outstandingAmount": 125000.75,
                "recentOrders": 3,
                "completedOrdersThisMonth": 9,
                "monthlyRevenue": 260400.0,
                "topCustomers": [{ "name": "Sharma Textiles", "orderCount": 4, "totalValue": 88000.0 }],
                "statusDistribution": [{ "status": "completed", "count": 9 }],
                "inventoryStatus": [{ "status": "low_stock", "count": 3 }],
                "recentActivity": [{ "id": 11, "orderNumber": "ORD-0011", "status": "pending" }]
            }),
        );
        let client = ApiClient::new(
            ClientConfig::default(),
            transport.clone(),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();

        let stats = client.dashboard_stats().await.unwrap();
        assert_eq!(stats.recent_orders, 3);
        assert_eq!(stats.low_stock_items, 3);
        assert_eq!(stats.recent_activity.len(), 1);
        assert_eq!(stats.status_distribution[0]["count"], 9);
    }
}
