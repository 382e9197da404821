//! # Domain Types
//!
//! Core domain types used throughout Pitstop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Order      │   │  JobCard/Invoice│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  id (opaque)    │   │  number (daily  │       │
//! │  │  phone (unique) │   │  order_number   │   │   sequence)     │       │
//! │  │  customer_type  │   │  status         │   │  order_id (1:1) │       │
//! │  │  total_visits   │   │  details (sum)  │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   OrderStatus   │   │    OrderType    │   │   OrderDetails  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Created        │   │  Service        │   │  Service(..)    │       │
//! │  │  Assigned       │   │  Sales          │   │  TireSales(..)  │       │
//! │  │  InProgress     │   │  Consultation   │   │  Consultation(.)│       │
//! │  │  Completed      │   └─────────────────┘   └─────────────────┘       │
//! │  │  Cancelled      │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Orders carry two identifiers:
//! - `id`: opaque string (prefix + random hex) - used for relations
//! - `order_number`: human-readable date-scoped sequence (`YYMMDD-NNN`)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Customer Classification
// =============================================================================

/// Customer classification.
///
/// Free-text input from the request layer is mapped onto this closed set
/// by [`crate::classify::normalize_customer_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Personal,
    Government,
    Ngo,
    Company,
    Bodaboda,
}

impl Default for CustomerType {
    fn default() -> Self {
        CustomerType::Personal
    }
}

impl CustomerType {
    /// Storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Personal => "personal",
            CustomerType::Government => "government",
            CustomerType::Ngo => "ngo",
            CustomerType::Company => "company",
            CustomerType::Bodaboda => "bodaboda",
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
///
/// ## Lifecycle
/// Created once at registration, mutated by profile edits and by order
/// creation (visit counter + last-visit bump). Never deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Opaque identifier, e.g. `C4f9a1c2b3d4e`. Caller-supplied or generated.
    pub id: String,

    pub name: String,

    /// Globally unique. Enforced by a UNIQUE constraint, not a pre-check.
    pub phone: String,

    pub email: String,
    pub address: String,
    pub customer_type: CustomerType,
    pub organization_name: String,
    pub tax_number: String,

    /// Free-text subtype for personal customers, e.g. "owner" or "driver".
    pub personal_subtype: String,

    pub notes: String,

    /// Incremented once per order created for this customer.
    pub total_visits: i64,

    /// Cumulative spend in cents. Written by an external billing
    /// collaborator, never by this engine; kept so the schema and wire
    /// format are stable.
    pub total_spent_cents: i64,

    #[ts(as = "Option<String>")]
    pub last_visit: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the cumulative spend as Money.
    #[inline]
    pub fn total_spent(&self) -> Money {
        Money::from_cents(self.total_spent_cents)
    }
}

// =============================================================================
// Vehicle
// =============================================================================

/// A vehicle on file for a customer.
///
/// Identity is `(customer_id, plate_number)`: registering a plate that is
/// already on file for the customer updates the existing record in place.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Vehicle {
    pub id: i64,
    pub customer_id: String,
    pub plate_number: String,
    pub make: String,
    pub model: String,
    pub vehicle_type: String,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// ## State Machine
/// ```text
/// created ──► assigned ──► in-progress ──► completed (terminal)
///     │           │             │
///     └───────────┴─────────────┴────────► cancelled (terminal)
/// ```
///
/// The engine validates a requested target against this set and rejects
/// anything else without mutating the order. Landing on `Completed`
/// triggers the completion document generator exactly once per order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Created,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Created
    }
}

impl OrderStatus {
    /// Parses a status string from the request layer.
    ///
    /// Input is trimmed and lower-cased first; anything outside the
    /// enumerated set yields `None` (the caller reports Validation).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "created" => Some(OrderStatus::Created),
            "assigned" => Some(OrderStatus::Assigned),
            "in-progress" => Some(OrderStatus::InProgress),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Assigned => "assigned",
            OrderStatus::InProgress => "in-progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Active orders are the ones a front desk still has in the shop.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Created | OrderStatus::Assigned | OrderStatus::InProgress
        )
    }

    /// Terminal states accept no further meaningful transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

// =============================================================================
// Order Type & Priority
// =============================================================================

/// Coarse order category, derived from the free-text service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Service,
    Sales,
    Consultation,
}

impl OrderType {
    /// Storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Service => "service",
            OrderType::Sales => "sales",
            OrderType::Consultation => "consultation",
        }
    }
}

/// Order priority. Unrecognized input falls back to `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl Priority {
    /// Parses a priority string, defaulting to `Normal` for anything
    /// outside {low, normal, high, urgent}. Lenient by design: a bad
    /// priority must not fail order creation.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low" => Priority::Low,
            "high" => Priority::High,
            "urgent" => Priority::Urgent,
            _ => Priority::Normal,
        }
    }
}

// =============================================================================
// Order Details (tagged sum type)
// =============================================================================

/// Detail payload for car-service orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceDetails {
    pub plate_number: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_type: String,
    pub problem_description: String,
    pub services_selected: Vec<String>,
}

/// Detail payload for tire-sale orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TireSalesDetails {
    pub item_name: String,
    pub brand: String,
    pub quantity: i64,
    pub tire_condition: String,
}

/// Detail payload for consultation orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConsultationDetails {
    pub inquiry_type: String,
    pub questions: String,
    pub contact_preference: String,
    #[ts(as = "Option<String>")]
    pub follow_up_date: Option<NaiveDate>,
}

/// The service-specific detail record attached to an order.
///
/// Exactly one variant (or none) per order, chosen by the
/// `(order type, service type)` pair at creation time. Modeled as a sum
/// type rather than three independently nullable side records so the
/// invariant "at most one matching detail record" holds by construction.
///
/// Stored as a tagged JSON column on the order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OrderDetails {
    Service(ServiceDetails),
    TireSales(TireSalesDetails),
    Consultation(ConsultationDetails),
}

// =============================================================================
// Order
// =============================================================================

/// A front-desk order: service visit, tire sale, or consultation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Human-readable, unique, date-scoped: `YYMMDD-NNN`.
    pub order_number: String,
    pub customer_id: String,
    pub order_type: OrderType,
    /// Free-text offering label, e.g. "car-service" or "tire-sales".
    pub service_type: String,
    pub status: OrderStatus,
    pub priority: Priority,
    pub description: String,
    /// At most one detail record, variant matching the order type.
    pub details: Option<OrderDetails>,
    #[ts(as = "String")]
    pub arrival_time: DateTime<Utc>,
    /// Set once, on the first transition into `Completed`.
    #[ts(as = "Option<String>")]
    pub departure_time: Option<DateTime<Utc>>,
    pub estimated_duration_min: i64,
    /// Whole minutes between arrival and departure, computed at completion.
    pub actual_duration_min: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Completion Documents
// =============================================================================

/// Job card generated when an order completes. One per order, at most.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct JobCard {
    pub id: i64,
    /// `JC-YYYYMMDD-NNN`, NNN resets daily.
    pub number: String,
    pub order_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Invoice lifecycle status. Only `Draft` is ever written by this engine;
/// sent/paid belong to the external billing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

/// Invoice generated when an order completes. One per order, at most.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: i64,
    /// `INV-YYYYMMDD-NNN`, NNN resets daily, counter independent of JC.
    pub number: String,
    pub order_id: String,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse("completed"), Some(OrderStatus::Completed));
        assert_eq!(
            OrderStatus::parse("  In-Progress "),
            Some(OrderStatus::InProgress)
        );
        assert_eq!(OrderStatus::parse("bogus"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn test_status_classification() {
        assert!(OrderStatus::Created.is_active());
        assert!(OrderStatus::InProgress.is_active());
        assert!(!OrderStatus::Completed.is_active());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Assigned.is_terminal());
    }

    #[test]
    fn test_priority_fallback() {
        assert_eq!(Priority::parse_or_default("urgent"), Priority::Urgent);
        assert_eq!(Priority::parse_or_default("HIGH"), Priority::High);
        assert_eq!(Priority::parse_or_default("asap"), Priority::Normal);
        assert_eq!(Priority::parse_or_default(""), Priority::Normal);
    }

    #[test]
    fn test_details_json_round_trip() {
        let details = OrderDetails::Service(ServiceDetails {
            plate_number: "ABC123".into(),
            vehicle_make: "Toyota".into(),
            vehicle_model: "Hiace".into(),
            vehicle_type: "van".into(),
            problem_description: "brakes grinding".into(),
            services_selected: vec!["brake-check".into(), "oil-change".into()],
        });

        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"kind\":\"service\""));

        let back: OrderDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }
}
