use serde::{Deserialize, Serialize};

use crate::session::Identity;

/// Backend user record as returned by `/login` and `/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of a successful `/login` or `/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// Identity to persist: server-reported fields win over what was submitted.
    #[must_use]
    pub(crate) fn identity(&self, submitted_email: &str, submitted_name: Option<&str>) -> Identity {
        let user = self.user.as_ref();
        let email = user
            .and_then(|u| u.email.clone())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| submitted_email.to_owned());
        let name = user
            .and_then(|u| u.name.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| submitted_name.map(str::to_owned));
        Identity { email, name }
    }
}

/// Headline figures for the dashboard cards. Missing counters read as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[non_exhaustive]
pub struct DashboardStats {
    pub total_orders: u64,
    pub low_stock_items: u64,
    pub pending_deliveries: u64,
    pub outstanding_amount: f64,
    pub completed_orders_this_month: u64,
    pub monthly_revenue: f64,
    /// Orders created in the last seven days.
    pub recent_orders: u64,
    pub top_customers: Vec<serde_json::Value>,
    pub status_distribution: Vec<serde_json::Value>,
    pub inventory_status: Vec<serde_json::Value>,
    /// The latest orders, newest first.
    pub recent_activity: Vec<serde_json::Value>,
}
