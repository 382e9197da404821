//! # Wire DTOs
//!
//! Request and response shapes for the external request layer, with the
//! externally-visible camelCase field names.
//!
//! ## Conventions
//! - Timestamps are ISO-8601 strings.
//! - Money travels as a decimal string (`"12.34"`), never a float.
//! - Requests are lenient: unknown classifications, sloppy durations and
//!   bad follow-up dates degrade to defaults instead of failing.
//! - `serviceDetails` is flat on the way in (one field soup shared by all
//!   three order types) and variant-shaped on the way out.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pitstop_core::duration::DurationInput;
use pitstop_core::{
    Customer, CustomerType, OrderDetails, OrderStatus, OrderType, Priority, Vehicle,
};
use pitstop_db::{AnalyticsSummary, OrderRecord};

// =============================================================================
// Customer DTOs
// =============================================================================

/// Vehicle fields as they appear on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleDto {
    pub plate_number: String,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        VehicleDto {
            plate_number: v.plate_number,
            make: v.make,
            model: v.model,
            vehicle_type: v.vehicle_type,
        }
    }
}

/// Customer registration request.
///
/// `personalSubType` also accepts the legacy spelling `personalType`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterCustomerRequest {
    /// Caller-supplied ID; generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Free text, run through the classification synonym table.
    pub customer_type: Option<String>,
    /// Explicit flag; wins over whatever `customerType` says.
    pub is_bodaboda: bool,
    pub organization_name: String,
    pub tax_number: String,
    #[serde(alias = "personalType")]
    pub personal_sub_type: String,
    pub notes: String,
    /// Vehicles registered together with the customer.
    pub vehicles: Vec<VehicleDto>,
}

/// Partial customer edit: absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub customer_type: Option<String>,
    pub is_bodaboda: Option<bool>,
    pub organization_name: Option<String>,
    pub tax_number: Option<String>,
    #[serde(alias = "personalType")]
    pub personal_sub_type: Option<String>,
    pub notes: Option<String>,
}

/// Customer record as the request layer sees it.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub customer_type: CustomerType,
    pub organization_name: String,
    pub tax_number: String,
    pub personal_sub_type: String,
    pub notes: String,
    pub total_visits: i64,
    /// Decimal string, e.g. `"0.00"`.
    pub total_spent: String,
    pub last_visit: Option<String>,
    pub created_at: String,
    pub vehicles: Vec<VehicleDto>,
}

impl CustomerDto {
    /// Assembles the wire shape from a customer row and its vehicles.
    pub fn from_parts(customer: Customer, vehicles: Vec<Vehicle>) -> Self {
        CustomerDto {
            id: customer.id,
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            address: customer.address,
            customer_type: customer.customer_type,
            organization_name: customer.organization_name,
            tax_number: customer.tax_number,
            personal_sub_type: customer.personal_subtype,
            notes: customer.notes,
            total_visits: customer.total_visits,
            total_spent: pitstop_core::Money::from_cents(customer.total_spent_cents)
                .to_decimal_string(),
            last_visit: customer.last_visit.map(|t| t.to_rfc3339()),
            created_at: customer.created_at.to_rfc3339(),
            vehicles: vehicles.into_iter().map(VehicleDto::from).collect(),
        }
    }
}

// =============================================================================
// Order DTOs
// =============================================================================

/// A wire value that may be a single string or a list of strings
/// (`carServices` arrives both ways).
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    /// Normalizes to a list; a lone empty string becomes an empty list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::One(s) if s.trim().is_empty() => Vec::new(),
            StringOrList::One(s) => vec![s],
            StringOrList::Many(v) => v,
        }
    }
}

/// The flat `serviceDetails` intake payload. One shape serves all three
/// order types; which fields matter is decided by the derived order type.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDetailsRequest {
    // Car service
    pub car_services: Option<StringOrList>,
    pub plate_number: String,
    pub car_make: String,
    pub car_model: String,
    pub vehicle_type: String,
    pub problem_description: String,

    // Tire sale
    pub tire_item_name: String,
    pub tire_brand: String,
    pub tire_quantity: Option<i64>,
    pub tire_type: String,

    // Consultation
    pub inquiry_type: String,
    pub inquiry_questions: String,
    pub contact_preference: String,
    pub follow_up_date: String,
}

/// Order creation request.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    /// Caller-supplied ID; generated when absent.
    pub id: Option<String>,
    pub customer_id: String,
    pub service_type: String,
    /// Unrecognized values fall back to normal.
    pub priority: String,
    pub description: String,
    /// Integer minutes or free text like `"1h 30m"`.
    pub estimated_completion: Option<DurationInput>,
    pub service_details: Option<ServiceDetailsRequest>,
}

/// Listing filter for orders.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ListOrdersRequest {
    pub status: Option<String>,
    pub customer_id: Option<String>,
}

/// Status transition request.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SetOrderStatusRequest {
    pub status: String,
}

/// Outgoing detail payload, shaped by variant.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum OrderDetailsDto {
    #[serde(rename_all = "camelCase")]
    Service {
        plate_number: String,
        vehicle_make: String,
        vehicle_model: String,
        vehicle_type: String,
        problem_description: String,
        services_selected: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    TireSales {
        item_name: String,
        brand: String,
        quantity: i64,
        tire_condition: String,
    },
    #[serde(rename_all = "camelCase")]
    Consultation {
        inquiry_type: String,
        questions: String,
        contact_preference: String,
        follow_up_date: Option<String>,
    },
}

impl From<OrderDetails> for OrderDetailsDto {
    fn from(details: OrderDetails) -> Self {
        match details {
            OrderDetails::Service(d) => OrderDetailsDto::Service {
                plate_number: d.plate_number,
                vehicle_make: d.vehicle_make,
                vehicle_model: d.vehicle_model,
                vehicle_type: d.vehicle_type,
                problem_description: d.problem_description,
                services_selected: d.services_selected,
            },
            OrderDetails::TireSales(d) => OrderDetailsDto::TireSales {
                item_name: d.item_name,
                brand: d.brand,
                quantity: d.quantity,
                tire_condition: d.tire_condition,
            },
            OrderDetails::Consultation(d) => OrderDetailsDto::Consultation {
                inquiry_type: d.inquiry_type,
                questions: d.questions,
                contact_preference: d.contact_preference,
                follow_up_date: d.follow_up_date.map(|date| date.to_string()),
            },
        }
    }
}

/// Order record as the request layer sees it.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: String,
    pub order_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub order_type: OrderType,
    pub service_type: String,
    pub status: OrderStatus,
    pub priority: Priority,
    pub description: String,
    pub service_details: Option<OrderDetailsDto>,
    pub arrival_time: String,
    pub departure_time: Option<String>,
    pub estimated_duration_min: i64,
    pub actual_duration_min: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderDto {
    fn from(record: OrderRecord) -> Self {
        let order = record.order;
        OrderDto {
            id: order.id,
            order_number: order.order_number,
            customer_id: order.customer_id,
            customer_name: record.customer_name,
            order_type: order.order_type,
            service_type: order.service_type,
            status: order.status,
            priority: order.priority,
            description: order.description,
            service_details: order.details.map(OrderDetailsDto::from),
            arrival_time: order.arrival_time.to_rfc3339(),
            departure_time: order.departure_time.map(|t| t.to_rfc3339()),
            estimated_duration_min: order.estimated_duration_min,
            actual_duration_min: order.actual_duration_min,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

// =============================================================================
// Analytics DTOs
// =============================================================================

/// One `serviceType` and its order count.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeCountDto {
    pub service_type: String,
    pub count: i64,
}

/// The dashboard rollup as the request layer sees it.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummaryDto {
    pub total_customers: i64,
    pub arrivals_today: i64,
    pub active_orders: i64,
    pub completed_today: i64,
    pub avg_wait_minutes: i64,
    pub service_breakdown: Vec<ServiceTypeCountDto>,
}

impl From<AnalyticsSummary> for AnalyticsSummaryDto {
    fn from(s: AnalyticsSummary) -> Self {
        AnalyticsSummaryDto {
            total_customers: s.total_customers,
            arrivals_today: s.arrivals_today,
            active_orders: s.active_orders,
            completed_today: s.completed_today,
            avg_wait_minutes: s.avg_wait_minutes,
            service_breakdown: s
                .service_breakdown
                .into_iter()
                .map(|b| ServiceTypeCountDto {
                    service_type: b.service_type,
                    count: b.count,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
