//! End-to-end lifecycle tests through the service operations: register a
//! customer, open orders, walk the status machine, and check the
//! completion side effects against a real (in-memory) database.

use pitstop_core::OrderStatus;
use pitstop_db::{Database, DbConfig};
use pitstop_service::error::ErrorCode;
use pitstop_service::{ops, CreateOrderRequest, RegisterCustomerRequest, UpdateCustomerRequest};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn jane() -> RegisterCustomerRequest {
    serde_json::from_str(r#"{"name": "Jane", "phone": "+100"}"#).unwrap()
}

fn car_service_order(customer_id: &str) -> CreateOrderRequest {
    serde_json::from_str(&format!(
        r#"{{
            "customerId": "{}",
            "serviceType": "car-service",
            "description": "brakes grinding",
            "estimatedCompletion": "1h 30m",
            "serviceDetails": {{
                "carServices": ["brake-check"],
                "plateNumber": "ABC123",
                "carMake": "Toyota",
                "carModel": "Hiace",
                "vehicleType": "van",
                "problemDescription": "grinding on braking"
            }}
        }}"#,
        customer_id
    ))
    .unwrap()
}

#[tokio::test]
async fn test_full_front_desk_walkthrough() {
    let db = test_db().await;

    // Register
    let customer = ops::register_customer(&db, jane()).await.unwrap();
    assert_eq!(customer.name, "Jane");
    assert_eq!(customer.total_visits, 0);
    assert_eq!(customer.total_spent, "0.00");

    // Open a car-service order
    let order = ops::create_order(&db, car_service_order(&customer.id))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.customer_name, "Jane");
    assert_eq!(order.estimated_duration_min, 90);
    assert!(order.order_number.ends_with("-001"));
    assert!(order.departure_time.is_none());

    // The intake registered the vehicle and counted the visit
    let customer = ops::get_customer(&db, &customer.id).await.unwrap();
    assert_eq!(customer.total_visits, 1);
    assert_eq!(customer.vehicles.len(), 1);
    assert_eq!(customer.vehicles[0].plate_number, "ABC123");

    // Walk the state machine
    let order = ops::set_order_status(&db, &order.id, "in-progress")
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::InProgress);

    let order = ops::set_order_status(&db, &order.id, "completed")
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.departure_time.is_some());
    assert!(order.actual_duration_min.unwrap() >= 0);

    // Exactly one job card and one invoice, with dated numbers
    let card = db.documents().get_job_card(&order.id).await.unwrap().unwrap();
    let invoice = db.documents().get_invoice(&order.id).await.unwrap().unwrap();
    assert!(card.number.starts_with("JC-"));
    assert!(card.number.ends_with("-001"));
    assert!(invoice.number.starts_with("INV-"));
    assert_eq!(db.documents().count_job_cards().await.unwrap(), 1);
    assert_eq!(db.documents().count_invoices().await.unwrap(), 1);
}

#[tokio::test]
async fn test_repeated_completion_is_idempotent() {
    let db = test_db().await;
    let customer = ops::register_customer(&db, jane()).await.unwrap();
    let order = ops::create_order(&db, car_service_order(&customer.id))
        .await
        .unwrap();

    let first = ops::set_order_status(&db, &order.id, "completed").await.unwrap();
    let second = ops::set_order_status(&db, &order.id, "completed").await.unwrap();

    assert_eq!(first.departure_time, second.departure_time);
    assert_eq!(first.actual_duration_min, second.actual_duration_min);
    assert_eq!(db.documents().count_job_cards().await.unwrap(), 1);
    assert_eq!(db.documents().count_invoices().await.unwrap(), 1);
}

#[tokio::test]
async fn test_bogus_status_leaves_order_untouched() {
    let db = test_db().await;
    let customer = ops::register_customer(&db, jane()).await.unwrap();
    let order = ops::create_order(&db, car_service_order(&customer.id))
        .await
        .unwrap();

    let err = ops::set_order_status(&db, &order.id, "teleported")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let listed = ops::list_orders(&db, Default::default()).await.unwrap();
    assert_eq!(listed[0].status, OrderStatus::Created);
    assert_eq!(db.documents().count_job_cards().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_phone_is_conflict() {
    let db = test_db().await;
    ops::register_customer(&db, jane()).await.unwrap();

    let mut again = jane();
    again.name = "Other Jane".to_string();
    let err = ops::register_customer(&db, again).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);

    // The failed registration created nothing
    assert_eq!(ops::search_customers(&db, "").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_order_for_unknown_customer_is_not_found() {
    let db = test_db().await;
    let err = ops::create_order(&db, car_service_order("Cnobody"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_registration_with_vehicles_and_classification() {
    let db = test_db().await;
    let req: RegisterCustomerRequest = serde_json::from_str(
        r#"{
            "name": "Kampala Couriers",
            "phone": "+200",
            "customerType": "business",
            "organizationName": "Kampala Couriers Ltd",
            "vehicles": [
                {"plateNumber": "UAX 101K", "make": "Isuzu", "model": "D-Max"},
                {"plateNumber": "UAX 102K"}
            ]
        }"#,
    )
    .unwrap();

    let customer = ops::register_customer(&db, req).await.unwrap();
    assert_eq!(
        customer.customer_type,
        pitstop_core::CustomerType::Company
    );
    assert_eq!(customer.vehicles.len(), 2);
}

#[tokio::test]
async fn test_tire_sale_and_consultation_detail_variants() {
    let db = test_db().await;
    let customer = ops::register_customer(&db, jane()).await.unwrap();

    let sale: CreateOrderRequest = serde_json::from_str(&format!(
        r#"{{
            "customerId": "{}",
            "serviceType": "tire-sales",
            "serviceDetails": {{"tireItemName": "Radial 195/65R15", "tireBrand": "Yana"}}
        }}"#,
        customer.id
    ))
    .unwrap();
    let sale = ops::create_order(&db, sale).await.unwrap();
    let json = serde_json::to_value(&sale).unwrap();
    assert_eq!(json["orderType"], "sales");
    // Quantity defaults to 1; the unsupplied condition stays empty
    assert_eq!(json["serviceDetails"]["quantity"], 1);
    assert_eq!(json["serviceDetails"]["tireCondition"], "");

    // Consultation with an unparseable follow-up date still goes through
    let consult: CreateOrderRequest = serde_json::from_str(&format!(
        r#"{{
            "customerId": "{}",
            "serviceType": "consultation",
            "serviceDetails": {{"inquiryType": "fleet pricing", "followUpDate": "next tuesday"}}
        }}"#,
        customer.id
    ))
    .unwrap();
    let consult = ops::create_order(&db, consult).await.unwrap();
    let json = serde_json::to_value(&consult).unwrap();
    assert_eq!(json["orderType"], "consultation");
    assert_eq!(json["serviceDetails"]["inquiryType"], "fleet pricing");
    assert_eq!(json["serviceDetails"]["followUpDate"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_details_attach_only_for_their_exact_service_type() {
    let db = test_db().await;
    let customer = ops::register_customer(&db, jane()).await.unwrap();

    // general-inquiry is a consultation-class order, but only the
    // "consultation" offering carries a detail record
    let inquiry: CreateOrderRequest = serde_json::from_str(&format!(
        r#"{{
            "customerId": "{}",
            "serviceType": "general-inquiry",
            "serviceDetails": {{"inquiryType": "pricing", "inquiryQuestions": "fleet rates?"}}
        }}"#,
        customer.id
    ))
    .unwrap();
    let inquiry = ops::create_order(&db, inquiry).await.unwrap();
    assert_eq!(serde_json::to_value(&inquiry).unwrap()["orderType"], "consultation");
    assert!(inquiry.service_details.is_none());

    // A car-wash is a service-class order, but only "car-service" attaches
    // details - and without details there is no vehicle side effect
    let wash: CreateOrderRequest = serde_json::from_str(&format!(
        r#"{{
            "customerId": "{}",
            "serviceType": "car-wash",
            "serviceDetails": {{"plateNumber": "ZZZ999", "carMake": "Honda"}}
        }}"#,
        customer.id
    ))
    .unwrap();
    let wash = ops::create_order(&db, wash).await.unwrap();
    assert!(wash.service_details.is_none());
    assert!(db.vehicles().get(&customer.id, "ZZZ999").await.unwrap().is_none());

    let after = ops::get_customer(&db, &customer.id).await.unwrap();
    assert!(after.vehicles.is_empty());
}

#[tokio::test]
async fn test_car_service_attaches_details_even_with_empty_payload() {
    let db = test_db().await;
    let customer = ops::register_customer(&db, jane()).await.unwrap();

    let req: CreateOrderRequest = serde_json::from_str(&format!(
        r#"{{"customerId": "{}", "serviceType": "car-service"}}"#,
        customer.id
    ))
    .unwrap();
    let order = ops::create_order(&db, req).await.unwrap();

    // The record exists with empty fields; no plate means no vehicle
    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["serviceDetails"]["plateNumber"], "");
    assert_eq!(json["serviceDetails"]["servicesSelected"], serde_json::json!([]));
    let after = ops::get_customer(&db, &customer.id).await.unwrap();
    assert!(after.vehicles.is_empty());
}

#[tokio::test]
async fn test_partial_update_preserves_unmentioned_fields() {
    let db = test_db().await;
    let customer = ops::register_customer(&db, jane()).await.unwrap();

    let req: UpdateCustomerRequest =
        serde_json::from_str(r#"{"email": "jane@example.com"}"#).unwrap();
    let updated = ops::update_customer(&db, &customer.id, req).await.unwrap();

    assert_eq!(updated.email, "jane@example.com");
    assert_eq!(updated.name, "Jane");
    assert_eq!(updated.phone, "+100");
}

#[tokio::test]
async fn test_concurrent_completions_generate_documents_once() {
    // A file-backed pool so completions genuinely race on separate
    // connections (the in-memory config is single-connection)
    let path = std::env::temp_dir().join(format!(
        "{}.db",
        pitstop_core::ident::opaque_id("pitstop-race-")
    ));
    let db = Database::new(DbConfig::new(&path)).await.unwrap();

    let customer = ops::register_customer(&db, jane()).await.unwrap();
    let order = ops::create_order(&db, car_service_order(&customer.id))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = db.clone();
        let order_id = order.id.clone();
        handles.push(tokio::spawn(async move {
            ops::set_order_status(&db, &order_id, "completed").await.unwrap()
        }));
    }

    let mut departures = Vec::new();
    for h in handles {
        let done = h.await.unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        departures.push(done.departure_time.unwrap());
    }

    // Every racer saw the same departure stamp, and exactly one document
    // of each kind exists
    departures.dedup();
    assert_eq!(departures.len(), 1);
    assert_eq!(db.documents().count_job_cards().await.unwrap(), 1);
    assert_eq!(db.documents().count_invoices().await.unwrap(), 1);

    db.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

#[tokio::test]
async fn test_analytics_reflect_the_day() {
    let db = test_db().await;
    let customer = ops::register_customer(&db, jane()).await.unwrap();

    let o1 = ops::create_order(&db, car_service_order(&customer.id)).await.unwrap();
    ops::create_order(&db, car_service_order(&customer.id)).await.unwrap();
    ops::set_order_status(&db, &o1.id, "completed").await.unwrap();

    let summary = ops::analytics_summary(&db).await.unwrap();
    assert_eq!(summary.total_customers, 1);
    assert_eq!(summary.arrivals_today, 2);
    assert_eq!(summary.active_orders, 1);
    assert_eq!(summary.completed_today, 1);
    assert_eq!(summary.service_breakdown[0].service_type, "car-service");
    assert_eq!(summary.service_breakdown[0].count, 2);
}
