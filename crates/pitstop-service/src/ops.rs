//! # Service Operations
//!
//! The operations the external request layer invokes, one function per
//! verb. Each takes the shared [`Database`] handle plus a request DTO and
//! returns a response DTO or an [`ApiError`].
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customers            Orders                    Analytics               │
//! │  ─────────            ──────                    ─────────               │
//! │  register_customer    create_order              analytics_summary       │
//! │  search_customers     list_orders                                       │
//! │  get_customer         set_order_status                                  │
//! │  update_customer                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation split: required fields and the status whitelist are checked
//! here; uniqueness (phone, IDs) is the database's UNIQUE constraints,
//! surfaced as Conflict.

use tracing::debug;

use crate::dto::{
    AnalyticsSummaryDto, CreateOrderRequest, CustomerDto, ListOrdersRequest, OrderDto,
    RegisterCustomerRequest, ServiceDetailsRequest, UpdateCustomerRequest,
};
use crate::error::ApiError;
use pitstop_core::duration::parse_estimated_minutes;
use pitstop_core::validation::{require_non_empty, validate_name, validate_phone};
use pitstop_core::{
    classify, ident, ConsultationDetails, CoreError, Customer, OrderDetails, OrderStatus,
    Priority, ServiceDetails, TireSalesDetails, CUSTOMER_ID_PREFIX, ORDER_ID_PREFIX,
};
use pitstop_db::{Database, NewOrder, OrderFilter, VehicleInput};

// =============================================================================
// Customer Operations
// =============================================================================

/// Registers a new customer, optionally with vehicles.
///
/// Phone uniqueness is enforced by the store; a duplicate comes back as
/// Conflict with no record created.
pub async fn register_customer(
    db: &Database,
    req: RegisterCustomerRequest,
) -> Result<CustomerDto, ApiError> {
    debug!(phone = %req.phone, "register_customer");

    let name = validate_name(&req.name)?;
    let phone = validate_phone(&req.phone)?;
    let id = resolve_id(req.id, CUSTOMER_ID_PREFIX)?;

    let customer = Customer {
        id,
        name,
        phone,
        email: req.email.trim().to_string(),
        address: req.address.trim().to_string(),
        customer_type: classify::normalize_customer_type(
            req.customer_type.as_deref(),
            req.is_bodaboda,
        ),
        organization_name: req.organization_name.trim().to_string(),
        tax_number: req.tax_number.trim().to_string(),
        personal_subtype: req.personal_sub_type.trim().to_string(),
        notes: req.notes,
        total_visits: 0,
        total_spent_cents: 0,
        last_visit: None,
        created_at: chrono::Utc::now(),
    };

    db.customers().insert(&customer).await?;

    for vehicle in req.vehicles {
        let plate = vehicle.plate_number.trim().to_string();
        if plate.is_empty() {
            continue;
        }
        db.vehicles()
            .upsert(
                &customer.id,
                &VehicleInput {
                    plate_number: plate,
                    make: vehicle.make.trim().to_string(),
                    model: vehicle.model.trim().to_string(),
                    vehicle_type: vehicle.vehicle_type.trim().to_string(),
                },
            )
            .await?;
    }

    load_customer_dto(db, &customer.id).await
}

/// Case-insensitive customer search across name, phone, email and ID.
/// Capped at 100 results; an empty query lists everyone (capped).
pub async fn search_customers(db: &Database, query: &str) -> Result<Vec<CustomerDto>, ApiError> {
    debug!(query = %query, "search_customers");

    let hits = db.customers().search(query).await?;

    let mut out = Vec::with_capacity(hits.len());
    for customer in hits {
        let vehicles = db.vehicles().list_for_customer(&customer.id).await?;
        out.push(CustomerDto::from_parts(customer, vehicles));
    }
    Ok(out)
}

/// Fetches one customer with their vehicles.
pub async fn get_customer(db: &Database, id: &str) -> Result<CustomerDto, ApiError> {
    debug!(id = %id, "get_customer");
    load_customer_dto(db, id).await
}

/// Partial profile edit: absent request fields keep their stored values.
///
/// The classification is recomputed only when the request mentions
/// `customerType` or `isBodaboda`.
pub async fn update_customer(
    db: &Database,
    id: &str,
    req: UpdateCustomerRequest,
) -> Result<CustomerDto, ApiError> {
    debug!(id = %id, "update_customer");

    let mut customer = db.customers().require(id).await?;

    if let Some(name) = req.name {
        customer.name = validate_name(&name)?;
    }
    if let Some(phone) = req.phone {
        customer.phone = validate_phone(&phone)?;
    }
    if let Some(email) = req.email {
        customer.email = email.trim().to_string();
    }
    if let Some(address) = req.address {
        customer.address = address.trim().to_string();
    }
    if req.customer_type.is_some() || req.is_bodaboda.is_some() {
        customer.customer_type = classify::normalize_customer_type(
            req.customer_type.as_deref(),
            req.is_bodaboda.unwrap_or(false),
        );
    }
    if let Some(organization_name) = req.organization_name {
        customer.organization_name = organization_name.trim().to_string();
    }
    if let Some(tax_number) = req.tax_number {
        customer.tax_number = tax_number.trim().to_string();
    }
    if let Some(personal_sub_type) = req.personal_sub_type {
        customer.personal_subtype = personal_sub_type.trim().to_string();
    }
    if let Some(notes) = req.notes {
        customer.notes = notes;
    }

    db.customers().update(&customer).await?;

    load_customer_dto(db, id).await
}

async fn load_customer_dto(db: &Database, id: &str) -> Result<CustomerDto, ApiError> {
    let customer = db.customers().require(id).await?;
    let vehicles = db.vehicles().list_for_customer(id).await?;
    Ok(CustomerDto::from_parts(customer, vehicles))
}

// =============================================================================
// Order Operations
// =============================================================================

/// Opens a new order for a registered customer.
///
/// Number allocation, the optional vehicle registration and the visit
/// bump all commit atomically with the order row.
pub async fn create_order(db: &Database, req: CreateOrderRequest) -> Result<OrderDto, ApiError> {
    debug!(customer_id = %req.customer_id, service_type = %req.service_type, "create_order");

    let customer_id = require_non_empty("customerId", &req.customer_id)?;
    let service_type = require_non_empty("serviceType", &req.service_type)?;
    let id = match req.id.filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(resolve_id(Some(raw), ORDER_ID_PREFIX)?),
        None => None,
    };

    // Fail early with a clean NotFound instead of a mid-transaction
    // foreign key error
    db.customers()
        .get_by_id(&customer_id)
        .await?
        .ok_or_else(|| ApiError::from(CoreError::CustomerNotFound(customer_id.clone())))?;

    let details = build_details(&service_type, req.service_details);

    let record = db
        .orders()
        .create(NewOrder {
            id,
            customer_id,
            service_type,
            priority: Priority::parse_or_default(&req.priority),
            description: req.description.trim().to_string(),
            estimated_duration_min: parse_estimated_minutes(req.estimated_completion.as_ref()),
            details,
        })
        .await?;

    Ok(OrderDto::from(record))
}

/// Lists orders newest-first, optionally filtered by status and customer.
/// Capped at 200.
pub async fn list_orders(db: &Database, req: ListOrdersRequest) -> Result<Vec<OrderDto>, ApiError> {
    debug!(status = ?req.status, customer_id = ?req.customer_id, "list_orders");

    let records = db
        .orders()
        .list(&OrderFilter {
            status: req.status,
            customer_id: req.customer_id,
        })
        .await?;

    Ok(records.into_iter().map(OrderDto::from).collect())
}

/// Moves an order to a new status.
///
/// The target must be one of the five recognized values; anything else is
/// rejected without touching the order. Landing on `completed` stamps the
/// departure time and generates the job card and invoice exactly once.
pub async fn set_order_status(
    db: &Database,
    order_id: &str,
    status: &str,
) -> Result<OrderDto, ApiError> {
    debug!(order_id = %order_id, status = %status, "set_order_status");

    let target = OrderStatus::parse(status)
        .ok_or_else(|| ApiError::from(CoreError::InvalidStatus(status.to_string())))?;

    let record = db.orders().set_status(order_id, target).await?;
    Ok(OrderDto::from(record))
}

/// Builds the detail record for the order.
///
/// Details attach only for the exact offerings that carry them:
/// `car-service`, `tire-sales`, `consultation`. Any other service type
/// (a `car-wash` service order, a `general-inquiry` consultation) gets
/// no detail record, and therefore no vehicle side effect either. For a
/// matching type the record is always created, absent payload and all;
/// fields pass through trimmed, empty stays empty.
fn build_details(service_type: &str, payload: Option<ServiceDetailsRequest>) -> Option<OrderDetails> {
    let payload = payload.unwrap_or_default();

    match service_type.to_lowercase().as_str() {
        "car-service" => Some(OrderDetails::Service(ServiceDetails {
            plate_number: payload.plate_number.trim().to_string(),
            vehicle_make: payload.car_make.trim().to_string(),
            vehicle_model: payload.car_model.trim().to_string(),
            vehicle_type: payload.vehicle_type.trim().to_string(),
            problem_description: payload.problem_description.trim().to_string(),
            services_selected: payload
                .car_services
                .map(|s| s.into_vec())
                .unwrap_or_default(),
        })),
        "tire-sales" => Some(OrderDetails::TireSales(TireSalesDetails {
            item_name: payload.tire_item_name.trim().to_string(),
            brand: payload.tire_brand.trim().to_string(),
            quantity: payload.tire_quantity.unwrap_or(1),
            tire_condition: payload.tire_type.trim().to_string(),
        })),
        "consultation" => Some(OrderDetails::Consultation(ConsultationDetails {
            inquiry_type: payload.inquiry_type.trim().to_string(),
            questions: payload.inquiry_questions.trim().to_string(),
            contact_preference: payload.contact_preference.trim().to_string(),
            // Bad dates degrade to None; an intake must not fail over
            // a sloppy follow-up field
            follow_up_date: chrono::NaiveDate::parse_from_str(
                payload.follow_up_date.trim(),
                "%Y-%m-%d",
            )
            .ok(),
        })),
        _ => None,
    }
}

// =============================================================================
// Analytics Operations
// =============================================================================

/// Computes the dashboard summary from current state.
pub async fn analytics_summary(db: &Database) -> Result<AnalyticsSummaryDto, ApiError> {
    debug!("analytics_summary");
    let summary = db.analytics().summary().await?;
    Ok(AnalyticsSummaryDto::from(summary))
}

// =============================================================================
// Helpers
// =============================================================================

/// Accepts a caller-supplied ID (trimmed, length-checked) or generates an
/// opaque one with the given prefix.
fn resolve_id(supplied: Option<String>, prefix: &str) -> Result<String, ApiError> {
    match supplied.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(id) => {
            if id.len() > ident::MAX_ID_LEN {
                return Err(ApiError::validation(format!(
                    "id must be at most {} characters",
                    ident::MAX_ID_LEN
                )));
            }
            Ok(id)
        }
        None => Ok(ident::opaque_id(prefix)),
    }
}
