//! Dashboard counters.

use serde::{Deserialize, Serialize};

/// Body of `GET /admin/dashboard`. Missing counters read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_visitors: u64,
    pub total_products: u64,
    pub total_quotes: u64,
    pub pending_quotes: u64,
    pub total_users: u64,
}

impl DashboardStats {
    /// Label/value pairs in dashboard order.
    #[must_use]
    pub const fn cards(&self) -> [(&'static str, u64); 5] {
        [
            ("Total Visitors", self.total_visitors),
            ("Total Products", self.total_products),
            ("Total Quotes", self.total_quotes),
            ("Pending Quotes", self.pending_quotes),
            ("Total Users", self.total_users),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counters_default_to_zero() {
        let stats: DashboardStats =
            serde_json::from_value(serde_json::json!({"totalProducts": 12, "pendingQuotes": 3}))
                .unwrap();
        assert_eq!(stats.total_visitors, 0);
        assert_eq!(stats.total_products, 12);
        assert_eq!(stats.cards()[3], ("Pending Quotes", 3));
    }
}
