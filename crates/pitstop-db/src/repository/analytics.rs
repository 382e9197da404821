//! # Analytics Repository
//!
//! Read-only rollups over orders and customers. Nothing here is
//! authoritative state; every figure is recomputed from the live tables
//! on each call.
//!
//! "Today" means the local calendar day: the boundaries are local
//! midnight converted to UTC, compared against the UTC timestamps the
//! tables store.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use pitstop_core::duration::elapsed_minutes;

/// One service type and how many orders carry it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceTypeCount {
    pub service_type: String,
    pub count: i64,
}

/// The on-demand dashboard rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_customers: i64,
    pub arrivals_today: i64,
    pub active_orders: i64,
    pub completed_today: i64,
    pub avg_wait_minutes: i64,
    pub service_breakdown: Vec<ServiceTypeCount>,
}

/// Repository for aggregate queries.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// Computes the full summary in one pass over the current state.
    pub async fn summary(&self) -> DbResult<AnalyticsSummary> {
        let now = Utc::now();
        let midnight = local_midnight_utc(now)?;

        let total_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        let arrivals_today: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE arrival_time >= ?1")
                .bind(midnight)
                .fetch_one(&self.pool)
                .await?;

        let active_orders: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE status IN ('created', 'assigned', 'in-progress')",
        )
        .fetch_one(&self.pool)
        .await?;

        let completed_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE status = 'completed' AND departure_time >= ?1",
        )
        .bind(midnight)
        .fetch_one(&self.pool)
        .await?;

        // Wait times averaged in Rust so the minute floor matches the
        // per-order duration arithmetic exactly
        let arrivals: Vec<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT arrival_time FROM orders WHERE status IN ('created', 'assigned', 'in-progress')",
        )
        .fetch_all(&self.pool)
        .await?;

        let avg_wait_minutes = if arrivals.is_empty() {
            0
        } else {
            let total: i64 = arrivals
                .iter()
                .map(|arrival| elapsed_minutes(*arrival, now))
                .sum();
            total / arrivals.len() as i64
        };

        let service_breakdown: Vec<ServiceTypeCount> = sqlx::query_as(
            r#"
            SELECT service_type, COUNT(*) AS count
            FROM orders
            GROUP BY service_type
            ORDER BY count DESC, service_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(AnalyticsSummary {
            total_customers,
            arrivals_today,
            active_orders,
            completed_today,
            avg_wait_minutes,
            service_breakdown,
        })
    }
}

/// Local midnight of the day containing `now`, as a UTC instant.
fn local_midnight_utc(now: DateTime<Utc>) -> DbResult<DateTime<Utc>> {
    let local_day = now.with_timezone(&Local).date_naive();
    let midnight = local_day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DbError::Internal("invalid midnight".to_string()))?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| DbError::Internal("unrepresentable local midnight".to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::order::NewOrder;
    use pitstop_core::{ident, Customer, CustomerType, OrderStatus, Priority, CUSTOMER_ID_PREFIX};

    async fn with_customer(db: &Database, phone: &str) -> String {
        let customer = Customer {
            id: ident::opaque_id(CUSTOMER_ID_PREFIX),
            name: "Jane".to_string(),
            phone: phone.to_string(),
            email: String::new(),
            address: String::new(),
            customer_type: CustomerType::Personal,
            organization_name: String::new(),
            tax_number: String::new(),
            personal_subtype: String::new(),
            notes: String::new(),
            total_visits: 0,
            total_spent_cents: 0,
            last_visit: None,
            created_at: Utc::now(),
        };
        db.customers().insert(&customer).await.unwrap();
        customer.id
    }

    fn order_for(customer_id: &str, service_type: &str) -> NewOrder {
        NewOrder {
            id: None,
            customer_id: customer_id.to_string(),
            service_type: service_type.to_string(),
            priority: Priority::Normal,
            description: String::new(),
            estimated_duration_min: 60,
            details: None,
        }
    }

    #[tokio::test]
    async fn test_empty_database_summary() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let summary = db.analytics().summary().await.unwrap();
        assert_eq!(summary.total_customers, 0);
        assert_eq!(summary.active_orders, 0);
        assert_eq!(summary.avg_wait_minutes, 0);
        assert!(summary.service_breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_summary_counts_and_breakdown() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db, "+100").await;

        for service_type in ["car-service", "car-service", "tire-sales"] {
            db.orders().create(order_for(&customer_id, service_type)).await.unwrap();
        }
        let done = db.orders().create(order_for(&customer_id, "car-wash")).await.unwrap();
        db.orders().set_status(&done.order.id, OrderStatus::Completed).await.unwrap();

        let summary = db.analytics().summary().await.unwrap();
        assert_eq!(summary.total_customers, 1);
        assert_eq!(summary.arrivals_today, 4);
        assert_eq!(summary.active_orders, 3);
        assert_eq!(summary.completed_today, 1);
        // Fresh orders have waited under a minute
        assert_eq!(summary.avg_wait_minutes, 0);

        assert_eq!(summary.service_breakdown[0].service_type, "car-service");
        assert_eq!(summary.service_breakdown[0].count, 2);
        assert_eq!(summary.service_breakdown.len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_orders_are_not_active() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db, "+100").await;

        let record = db.orders().create(order_for(&customer_id, "car-service")).await.unwrap();
        db.orders().set_status(&record.order.id, OrderStatus::Cancelled).await.unwrap();

        let summary = db.analytics().summary().await.unwrap();
        assert_eq!(summary.active_orders, 0);
        assert_eq!(summary.completed_today, 0);
        // Cancelled still arrived today
        assert_eq!(summary.arrivals_today, 1);
    }
}
