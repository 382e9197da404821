//! # Customer Repository
//!
//! Database operations for the customer registry.
//!
//! ## Registry Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Customer Registry                                   │
//! │                                                                         │
//! │  1. REGISTER                                                           │
//! │     └── insert() → phone UNIQUE enforced by the database               │
//! │                    (a racing duplicate surfaces as UniqueViolation)    │
//! │                                                                         │
//! │  2. EDIT PROFILE                                                       │
//! │     └── update() → full-row write; the partial-field merge happens     │
//! │                    in the service layer before calling in              │
//! │                                                                         │
//! │  3. EVERY ORDER CREATED                                                │
//! │     └── record_visit() → total_visits += 1, last_visit = now           │
//! │         (runs inside the order-creation transaction)                   │
//! │                                                                         │
//! │  Customers are never deleted by the core.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use pitstop_core::{Customer, MAX_SEARCH_RESULTS};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer.
    ///
    /// A UNIQUE violation on the phone column is reported as a duplicate
    /// phone; this is the authoritative uniqueness check (the service
    /// layer does not pre-check).
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, phone = %customer.phone, "Inserting customer");

        let result = sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, phone, email, address,
                customer_type, organization_name, tax_number, personal_subtype, notes,
                total_visits, total_spent_cents, last_visit, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.customer_type)
        .bind(&customer.organization_name)
        .bind(&customer.tax_number)
        .bind(&customer.personal_subtype)
        .bind(&customer.notes)
        .bind(customer.total_visits)
        .bind(customer.total_spent_cents)
        .bind(customer.last_visit)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let err = DbError::from(e);
                if err.is_unique_violation_on("phone") {
                    return Err(DbError::duplicate("phone", &customer.phone));
                }
                if err.is_unique_violation_on("id") {
                    // Opaque ID collision or caller-supplied duplicate
                    return Err(DbError::duplicate("id", &customer.id));
                }
                Err(err)
            }
        }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer: Option<Customer> = sqlx::query_as(
            r#"
            SELECT
                id, name, phone, email, address,
                customer_type, organization_name, tax_number, personal_subtype, notes,
                total_visits, total_spent_cents, last_visit, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by ID, failing with NotFound when absent.
    pub async fn require(&self, id: &str) -> DbResult<Customer> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Writes back an edited customer profile.
    ///
    /// The service layer merges the partial request onto the loaded row
    /// first; this is a plain full-row UPDATE.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Updating customer");

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                phone = ?3,
                email = ?4,
                address = ?5,
                customer_type = ?6,
                organization_name = ?7,
                tax_number = ?8,
                personal_subtype = ?9,
                notes = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.customer_type)
        .bind(&customer.organization_name)
        .bind(&customer.tax_number)
        .bind(&customer.personal_subtype)
        .bind(&customer.notes)
        .execute(&self.pool)
        .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => Err(DbError::not_found("Customer", &customer.id)),
            Ok(_) => Ok(()),
            Err(e) => {
                let err = DbError::from(e);
                if err.is_unique_violation_on("phone") {
                    return Err(DbError::duplicate("phone", &customer.phone));
                }
                Err(err)
            }
        }
    }

    /// Case-insensitive substring search across name, phone, email and ID.
    ///
    /// An empty query returns all customers; either way the result set is
    /// capped at [`MAX_SEARCH_RESULTS`].
    pub async fn search(&self, query: &str) -> DbResult<Vec<Customer>> {
        let q = query.trim();

        let customers: Vec<Customer> = if q.is_empty() {
            sqlx::query_as(
                r#"
                SELECT
                    id, name, phone, email, address,
                    customer_type, organization_name, tax_number, personal_subtype, notes,
                    total_visits, total_spent_cents, last_visit, created_at
                FROM customers
                ORDER BY created_at DESC
                LIMIT ?1
                "#,
            )
            .bind(MAX_SEARCH_RESULTS)
            .fetch_all(&self.pool)
            .await?
        } else {
            let needle = format!("%{}%", q.to_lowercase());
            sqlx::query_as(
                r#"
                SELECT
                    id, name, phone, email, address,
                    customer_type, organization_name, tax_number, personal_subtype, notes,
                    total_visits, total_spent_cents, last_visit, created_at
                FROM customers
                WHERE lower(name) LIKE ?1
                   OR lower(phone) LIKE ?1
                   OR lower(email) LIKE ?1
                   OR lower(id) LIKE ?1
                ORDER BY created_at DESC
                LIMIT ?2
                "#,
            )
            .bind(needle)
            .bind(MAX_SEARCH_RESULTS)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(customers)
    }

    /// Total number of registered customers.
    pub async fn count(&self) -> DbResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

/// Bumps the visit counter and last-visit timestamp for a customer.
///
/// Invoked once per successful order creation, inside the order-creation
/// transaction so the counter and the order commit together.
pub(crate) async fn record_visit(
    conn: &mut SqliteConnection,
    customer_id: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE customers
        SET total_visits = total_visits + 1,
            last_visit = ?2
        WHERE id = ?1
        "#,
    )
    .bind(customer_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Customer", customer_id));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use pitstop_core::{ident, CustomerType, CUSTOMER_ID_PREFIX};

    fn sample(phone: &str) -> Customer {
        Customer {
            id: ident::opaque_id(CUSTOMER_ID_PREFIX),
            name: "Jane".to_string(),
            phone: phone.to_string(),
            email: "jane@example.com".to_string(),
            address: String::new(),
            customer_type: CustomerType::Personal,
            organization_name: String::new(),
            tax_number: String::new(),
            personal_subtype: "owner".to_string(),
            notes: String::new(),
            total_visits: 0,
            total_spent_cents: 0,
            last_visit: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = sample("+100");
        db.customers().insert(&customer).await.unwrap();

        let loaded = db.customers().get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(loaded.phone, "+100");
        assert_eq!(loaded.customer_type, CustomerType::Personal);
        assert_eq!(loaded.total_visits, 0);
    }

    #[tokio::test]
    async fn test_duplicate_phone_is_conflict() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers().insert(&sample("+100")).await.unwrap();

        let err = db.customers().insert(&sample("+100")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "phone"));

        // The failed registration created no record
        assert_eq!(db.customers().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_name_phone_email_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = sample("+255700111222");
        db.customers().insert(&customer).await.unwrap();

        for needle in ["jane", "JANE", "700111", "example.com", &customer.id] {
            let hits = db.customers().search(needle).await.unwrap();
            assert_eq!(hits.len(), 1, "query {:?} should match", needle);
        }

        assert!(db.customers().search("nobody").await.unwrap().is_empty());
        // Empty query returns everything (capped)
        assert_eq!(db.customers().search("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ghost = sample("+1");
        let err = db.customers().update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
