//! # Vehicle Repository
//!
//! Database operations for vehicles on file.
//!
//! Vehicle identity is `(customer_id, plate_number)`. Attaching a plate
//! that is already on file for the customer updates the existing row in
//! place; supplied fields that are empty leave the stored value alone, so
//! an intake that only knows the plate cannot blank out make/model data
//! captured earlier.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use pitstop_core::Vehicle;

/// Incoming vehicle fields for an upsert. All but the plate are optional
/// in the sense that empty strings do not overwrite.
#[derive(Debug, Clone, Default)]
pub struct VehicleInput {
    pub plate_number: String,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
}

/// Repository for vehicle database operations.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pool: SqlitePool,
}

impl VehicleRepository {
    /// Creates a new VehicleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VehicleRepository { pool }
    }

    /// Creates or updates the vehicle keyed on (customer, plate).
    pub async fn upsert(&self, customer_id: &str, input: &VehicleInput) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        upsert_vehicle(&mut conn, customer_id, input).await
    }

    /// Lists all vehicles on file for a customer.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Vehicle>> {
        let vehicles: Vec<Vehicle> = sqlx::query_as(
            r#"
            SELECT id, customer_id, plate_number, make, model, vehicle_type
            FROM vehicles
            WHERE customer_id = ?1
            ORDER BY id
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Fetches one vehicle by (customer, plate), if present.
    pub async fn get(&self, customer_id: &str, plate: &str) -> DbResult<Option<Vehicle>> {
        let vehicle: Option<Vehicle> = sqlx::query_as(
            r#"
            SELECT id, customer_id, plate_number, make, model, vehicle_type
            FROM vehicles
            WHERE customer_id = ?1 AND plate_number = ?2
            "#,
        )
        .bind(customer_id)
        .bind(plate)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }
}

/// Upsert on (customer_id, plate_number).
///
/// The CASE expressions implement "non-empty fields overwrite, empty
/// fields preserve". Shared between the standalone repository method and
/// the order-creation transaction (a car-service intake with a plate
/// registers the vehicle as a side effect).
pub(crate) async fn upsert_vehicle(
    conn: &mut SqliteConnection,
    customer_id: &str,
    input: &VehicleInput,
) -> DbResult<()> {
    debug!(customer_id = %customer_id, plate = %input.plate_number, "Upserting vehicle");

    sqlx::query(
        r#"
        INSERT INTO vehicles (customer_id, plate_number, make, model, vehicle_type)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (customer_id, plate_number) DO UPDATE SET
            make         = CASE WHEN excluded.make         <> '' THEN excluded.make         ELSE make         END,
            model        = CASE WHEN excluded.model        <> '' THEN excluded.model        ELSE model        END,
            vehicle_type = CASE WHEN excluded.vehicle_type <> '' THEN excluded.vehicle_type ELSE vehicle_type END
        "#,
    )
    .bind(customer_id)
    .bind(&input.plate_number)
    .bind(&input.make)
    .bind(&input.model)
    .bind(&input.vehicle_type)
    .execute(&mut *conn)
    .await?;

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
    use pitstop_core::{ident, Customer, CustomerType, CUSTOMER_ID_PREFIX};

    async fn with_customer(db: &Database) -> String {
        let customer = Customer {
            id: ident::opaque_id(CUSTOMER_ID_PREFIX),
            name: "Jane".to_string(),
            phone: "+100".to_string(),
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

    #[tokio::test]
    async fn test_upsert_creates_then_updates_in_place() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db).await;

        db.vehicles()
            .upsert(
                &customer_id,
                &VehicleInput {
                    plate_number: "ABC123".into(),
                    make: "Toyota".into(),
                    model: "Hiace".into(),
                    vehicle_type: "van".into(),
                },
            )
            .await
            .unwrap();

        // Same plate, different make: update, no duplicate row
        db.vehicles()
            .upsert(
                &customer_id,
                &VehicleInput {
                    plate_number: "ABC123".into(),
                    make: "Nissan".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let vehicles = db.vehicles().list_for_customer(&customer_id).await.unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].make, "Nissan");
        // Empty supplied fields preserved the stored values
        assert_eq!(vehicles[0].model, "Hiace");
        assert_eq!(vehicles[0].vehicle_type, "van");
    }

    #[tokio::test]
    async fn test_different_plates_are_distinct_vehicles() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer_id = with_customer(&db).await;

        for plate in ["ABC123", "XYZ789"] {
            db.vehicles()
                .upsert(
                    &customer_id,
                    &VehicleInput {
                        plate_number: plate.into(),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        assert_eq!(
            db.vehicles().list_for_customer(&customer_id).await.unwrap().len(),
            2
        );
    }
}
