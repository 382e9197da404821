//! # Order Repository
//!
//! Database operations for the order lifecycle.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE (one transaction)                                           │
//! │     ├── allocate order number        (first statement: takes the      │
//! │     │                                 write lock up front)            │
//! │     ├── insert order + detail payload (tagged JSON column)            │
//! │     ├── upsert vehicle               (car-service intake with plate)  │
//! │     └── record customer visit        (total_visits += 1)              │
//! │                                                                         │
//! │  2. MOVE THROUGH THE STATE MACHINE                                     │
//! │     └── set_status() → created / assigned / in-progress / cancelled   │
//! │                                                                         │
//! │  3. COMPLETE                                                           │
//! │     └── set_status(completed)                                          │
//! │         ├── departure_time set once (COALESCE keeps the first write)  │
//! │         ├── actual_duration_min computed from arrival                 │
//! │         └── completion documents ensured (exactly-once)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Completion is an explicit edge in `set_status`, not a save hook: only
//! a transition whose target is `Completed` can generate documents.

use chrono::{DateTime, Local, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::customer::record_visit;
use crate::repository::document::DocumentRepository;
use crate::repository::vehicle::{upsert_vehicle, VehicleInput};
use crate::sequence::{self, KIND_ORDER};
use pitstop_core::{
    classify, duration::elapsed_minutes, ident, Order, OrderDetails, OrderStatus, OrderType,
    Priority, MAX_ORDER_RESULTS, ORDER_ID_PREFIX,
};

// =============================================================================
// Inputs & Outputs
// =============================================================================

/// Domain-shaped input for order creation. The service layer translates
/// the wire payload (flexible duration strings, detail field soup) into
/// this before calling in.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Caller-supplied ID, or None to generate an opaque one.
    pub id: Option<String>,
    pub customer_id: String,
    pub service_type: String,
    pub priority: Priority,
    pub description: String,
    pub estimated_duration_min: i64,
    /// Already matched to the (order type, service type) pair, or None.
    pub details: Option<OrderDetails>,
}

/// An order joined with its customer's display name, which every listing
/// and status response carries.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub order: Order,
    pub customer_name: String,
}

/// Listing filter. `status` is matched verbatim against the stored value,
/// so an unrecognized status simply matches nothing.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub customer_id: Option<String>,
}

// =============================================================================
// Row mapping
// =============================================================================

/// Raw order row; `details` is decoded from its JSON column separately
/// because FromRow cannot parse the tagged payload itself.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    customer_id: String,
    customer_name: String,
    order_type: OrderType,
    service_type: String,
    status: OrderStatus,
    priority: Priority,
    description: String,
    details: Option<String>,
    arrival_time: DateTime<Utc>,
    departure_time: Option<DateTime<Utc>>,
    estimated_duration_min: i64,
    actual_duration_min: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_record(self) -> DbResult<OrderRecord> {
        let details = match &self.details {
            Some(json) => Some(serde_json::from_str::<OrderDetails>(json).map_err(|e| {
                DbError::CorruptRow {
                    entity: "Order".to_string(),
                    id: self.id.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(OrderRecord {
            order: Order {
                id: self.id,
                order_number: self.order_number,
                customer_id: self.customer_id,
                order_type: self.order_type,
                service_type: self.service_type,
                status: self.status,
                priority: self.priority,
                description: self.description,
                details,
                arrival_time: self.arrival_time,
                departure_time: self.departure_time,
                estimated_duration_min: self.estimated_duration_min,
                actual_duration_min: self.actual_duration_min,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            customer_name: self.customer_name,
        })
    }
}

const SELECT_ORDER: &str = r#"
    SELECT
        o.id, o.order_number, o.customer_id, c.name AS customer_name,
        o.order_type, o.service_type, o.status, o.priority, o.description,
        o.details, o.arrival_time, o.departure_time,
        o.estimated_duration_min, o.actual_duration_min,
        o.created_at, o.updated_at
    FROM orders o
    JOIN customers c ON c.id = o.customer_id
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order in a single transaction: number allocation, order
    /// insert, vehicle upsert (car-service with a plate), visit bump.
    ///
    /// The referenced customer must exist; a missing one rolls the whole
    /// intake back as NotFound.
    pub async fn create(&self, new: NewOrder) -> DbResult<OrderRecord> {
        let now = Utc::now();
        let today = Local::now().date_naive();
        let order_type = classify::order_type_for(&new.service_type);

        let mut tx = self.pool.begin().await?;

        // First statement is a write: the sequence upsert takes the write
        // lock immediately, so a concurrent intake waits here instead of
        // deadlocking on a later lock upgrade.
        let seq = sequence::allocate(&mut *tx, KIND_ORDER, today).await?;
        let order_number = ident::order_number(today, seq);

        let id = new
            .id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| ident::opaque_id(ORDER_ID_PREFIX));

        debug!(id = %id, order_number = %order_number, "Creating order");

        let details_json = match &new.details {
            Some(d) => Some(serde_json::to_string(d).map_err(|e| DbError::Internal(e.to_string()))?),
            None => None,
        };

        let insert = sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, customer_id, order_type, service_type,
                status, priority, description, details,
                arrival_time, departure_time,
                estimated_duration_min, actual_duration_min,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, NULL,
                ?11, NULL,
                ?12, ?12
            )
            "#,
        )
        .bind(&id)
        .bind(&order_number)
        .bind(&new.customer_id)
        .bind(order_type)
        .bind(&new.service_type)
        .bind(OrderStatus::Created)
        .bind(new.priority)
        .bind(&new.description)
        .bind(&details_json)
        .bind(now)
        .bind(new.estimated_duration_min)
        .bind(now)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            let err = DbError::from(e);
            if err.is_unique_violation_on("orders.id") {
                return Err(DbError::duplicate("id", &id));
            }
            if let DbError::ForeignKeyViolation { .. } = err {
                return Err(DbError::not_found("Customer", &new.customer_id));
            }
            return Err(err);
        }

        // Car-service intake with a plate also registers the vehicle
        if let Some(OrderDetails::Service(sd)) = &new.details {
            if !sd.plate_number.is_empty() {
                let input = VehicleInput {
                    plate_number: sd.plate_number.clone(),
                    make: sd.vehicle_make.clone(),
                    model: sd.vehicle_model.clone(),
                    vehicle_type: sd.vehicle_type.clone(),
                };
                upsert_vehicle(&mut tx, &new.customer_id, &input).await?;
            }
        }

        record_visit(&mut tx, &new.customer_id, now).await?;

        tx.commit().await?;

        info!(id = %id, order_number = %order_number, order_type = %order_type.as_str(), "Order created");

        self.require(&id).await
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<OrderRecord>> {
        let sql = format!("{} WHERE o.id = ?1", SELECT_ORDER);
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(OrderRow::into_record).transpose()
    }

    /// Gets an order by ID, failing with NotFound when absent.
    pub async fn require(&self, id: &str) -> DbResult<OrderRecord> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Applies a validated status transition.
    ///
    /// Landing on `Completed` stamps departure/duration once and ensures
    /// the completion documents; every other target is a plain status
    /// write with `updated_at` refreshed. Target validation (rejecting
    /// strings outside the enumerated set) happens before this is called.
    pub async fn set_status(&self, order_id: &str, status: OrderStatus) -> DbResult<OrderRecord> {
        let record = self.require(order_id).await?;
        let now = Utc::now();

        if status == OrderStatus::Completed {
            // Departure is set exactly once; COALESCE keeps the first
            // writer's value if two completions race.
            let actual = elapsed_minutes(record.order.arrival_time, now);
            sqlx::query(
                r#"
                UPDATE orders SET
                    status = ?2,
                    departure_time = COALESCE(departure_time, ?3),
                    actual_duration_min = COALESCE(actual_duration_min, ?4),
                    updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(order_id)
            .bind(OrderStatus::Completed)
            .bind(now)
            .bind(actual)
            .execute(&self.pool)
            .await?;

            // The completed edge, and only the completed edge, generates
            // documents. Idempotent under retries and races.
            DocumentRepository::new(self.pool.clone())
                .ensure_for_order(order_id)
                .await?;

            info!(order_id = %order_id, "Order completed");
        } else {
            sqlx::query(
                r#"
                UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1
                "#,
            )
            .bind(order_id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await?;

            debug!(order_id = %order_id, status = %status.as_str(), "Order status updated");
        }

        self.require(order_id).await
    }

    /// Lists orders, newest-created-first, capped at [`MAX_ORDER_RESULTS`].
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<OrderRecord>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_ORDER);
        qb.push(" WHERE 1 = 1");

        if let Some(status) = filter.status.as_deref() {
            qb.push(" AND o.status = ");
            qb.push_bind(status.trim().to_lowercase());
        }
        if let Some(customer_id) = filter.customer_id.as_deref() {
            qb.push(" AND o.customer_id = ");
            qb.push_bind(customer_id.to_string());
        }

        qb.push(" ORDER BY o.created_at DESC LIMIT ");
        qb.push_bind(MAX_ORDER_RESULTS);

        let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(OrderRow::into_record).collect()
    }

    /// Total order count (diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pitstop_core::{Customer, CustomerType, ServiceDetails, CUSTOMER_ID_PREFIX};

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

    fn service_order(customer_id: &str, plate: &str) -> NewOrder {
        NewOrder {
            id: None,
            customer_id: customer_id.to_string(),
            service_type: "car-service".to_string(),
            priority: Priority::Normal,
            description: "brakes".to_string(),
            estimated_duration_min: 90,
            details: Some(OrderDetails::Service(ServiceDetails {
                plate_number: plate.to_string(),
                vehicle_make: "Toyota".to_string(),
                vehicle_model: "Hiace".to_string(),
                vehicle_type: "van".to_string(),
                problem_description: "grinding".to_string(),
                services_selected: vec!["brake-check".to_string()],
            })),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_number_and_records_visit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db, "+100").await;

        let record = db.orders().create(service_order(&customer_id, "ABC123")).await.unwrap();
        assert_eq!(record.order.status, OrderStatus::Created);
        assert_eq!(record.order.order_type, OrderType::Service);
        assert!(record.order.order_number.ends_with("-001"));
        assert_eq!(record.customer_name, "Jane");

        // Visit counter bumped, vehicle registered from the plate
        let customer = db.customers().require(&customer_id).await.unwrap();
        assert_eq!(customer.total_visits, 1);
        assert!(customer.last_visit.is_some());
        assert!(db.vehicles().get(&customer_id, "ABC123").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_order_numbers_are_sequential_and_distinct() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db, "+100").await;

        let mut numbers = Vec::new();
        for _ in 0..5 {
            let r = db.orders().create(service_order(&customer_id, "ABC123")).await.unwrap();
            numbers.push(r.order.order_number);
        }
        let mut unique = numbers.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
        assert!(numbers[4].ends_with("-005"));
    }

    #[tokio::test]
    async fn test_create_for_missing_customer_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.orders().create(service_order("Cmissing", "ABC123")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_completion_sets_departure_and_documents_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db, "+100").await;
        let record = db.orders().create(service_order(&customer_id, "ABC123")).await.unwrap();
        let order_id = record.order.id.clone();

        db.orders().set_status(&order_id, OrderStatus::InProgress).await.unwrap();
        let done = db.orders().set_status(&order_id, OrderStatus::Completed).await.unwrap();

        assert_eq!(done.order.status, OrderStatus::Completed);
        assert!(done.order.departure_time.is_some());
        assert!(done.order.actual_duration_min.unwrap() >= 0);

        // Completing again must not mint a second set of documents or
        // move the departure time
        let again = db.orders().set_status(&order_id, OrderStatus::Completed).await.unwrap();
        assert_eq!(again.order.departure_time, done.order.departure_time);
        assert_eq!(db.documents().count_job_cards().await.unwrap(), 1);
        assert_eq!(db.documents().count_invoices().await.unwrap(), 1);

        let card = db.documents().get_job_card(&order_id).await.unwrap().unwrap();
        let invoice = db.documents().get_invoice(&order_id).await.unwrap().unwrap();
        assert!(card.number.starts_with("JC-"));
        assert!(invoice.number.starts_with("INV-"));
    }

    #[tokio::test]
    async fn test_non_completion_transitions_have_no_side_effects() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db, "+100").await;
        let record = db.orders().create(service_order(&customer_id, "ABC123")).await.unwrap();

        let cancelled = db
            .orders()
            .set_status(&record.order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
        assert!(cancelled.order.departure_time.is_none());
        assert_eq!(db.documents().count_job_cards().await.unwrap(), 0);
        assert_eq!(db.documents().count_invoices().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let jane = with_customer(&db, "+100").await;
        let bob = with_customer(&db, "+200").await;

        let o1 = db.orders().create(service_order(&jane, "ABC123")).await.unwrap();
        let _o2 = db.orders().create(service_order(&bob, "XYZ789")).await.unwrap();
        db.orders().set_status(&o1.order.id, OrderStatus::Completed).await.unwrap();

        let all = db.orders().list(&OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert!(all[0].order.created_at >= all[1].order.created_at);

        let completed = db
            .orders()
            .list(&OrderFilter {
                status: Some("completed".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].order.id, o1.order.id);

        let for_bob = db
            .orders()
            .list(&OrderFilter {
                customer_id: Some(bob.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(for_bob.len(), 1);

        // Unknown status filter matches nothing rather than erroring
        let none = db
            .orders()
            .list(&OrderFilter {
                status: Some("bogus".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_details_round_trip_through_storage() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db, "+100").await;
        let record = db.orders().create(service_order(&customer_id, "ABC123")).await.unwrap();

        match record.order.details {
            Some(OrderDetails::Service(ref sd)) => {
                assert_eq!(sd.plate_number, "ABC123");
                assert_eq!(sd.services_selected, vec!["brake-check".to_string()]);
            }
            other => panic!("expected service details, got {:?}", other),
        }
    }
}
