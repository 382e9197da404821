//! # Classification Rules
//!
//! Maps free-text input onto the closed customer-type and order-type sets.
//!
//! ## Resolution Order (customer type)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  isBodaboda flag set? ──► Bodaboda, regardless of the type string       │
//! │           │                                                             │
//! │           ▼ no                                                          │
//! │  type string, trimmed + lower-cased, through the synonym table          │
//! │           │                                                             │
//! │           ▼ no match / empty                                            │
//! │  Personal (the default walk-in customer)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::{CustomerType, OrderType};

/// Resolves the customer classification from the raw type string and the
/// explicit bodaboda flag.
///
/// ## Example
/// ```rust
/// use pitstop_core::classify::normalize_customer_type;
/// use pitstop_core::types::CustomerType;
///
/// assert_eq!(normalize_customer_type(Some("business"), false), CustomerType::Company);
/// assert_eq!(normalize_customer_type(Some("business"), true), CustomerType::Bodaboda);
/// assert_eq!(normalize_customer_type(None, false), CustomerType::Personal);
/// ```
pub fn normalize_customer_type(raw: Option<&str>, is_bodaboda: bool) -> CustomerType {
    if is_bodaboda {
        return CustomerType::Bodaboda;
    }

    let t = match raw {
        Some(s) => s.trim().to_lowercase(),
        None => return CustomerType::Personal,
    };

    // Synonym table: what the front desk types vs. what we store
    match t.as_str() {
        "personal" | "owner" | "driver" => CustomerType::Personal,
        "government" | "gov" => CustomerType::Government,
        "ngo" => CustomerType::Ngo,
        "company" | "private-company" | "business" => CustomerType::Company,
        "boda-boda" | "bodaboda" => CustomerType::Bodaboda,
        _ => CustomerType::Personal,
    }
}

/// Derives the coarse order type from the free-text service type.
///
/// `tire-sales` → Sales; `consultation` / `general-inquiry` → Consultation;
/// everything else is a workshop Service.
pub fn order_type_for(service_type: &str) -> OrderType {
    match service_type.trim().to_lowercase().as_str() {
        "tire-sales" => OrderType::Sales,
        "consultation" | "general-inquiry" => OrderType::Consultation,
        _ => OrderType::Service,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bodaboda_flag_wins() {
        assert_eq!(
            normalize_customer_type(Some("government"), true),
            CustomerType::Bodaboda
        );
        assert_eq!(normalize_customer_type(None, true), CustomerType::Bodaboda);
    }

    #[test]
    fn test_synonym_table() {
        assert_eq!(
            normalize_customer_type(Some("owner"), false),
            CustomerType::Personal
        );
        assert_eq!(
            normalize_customer_type(Some("driver"), false),
            CustomerType::Personal
        );
        assert_eq!(
            normalize_customer_type(Some("gov"), false),
            CustomerType::Government
        );
        assert_eq!(
            normalize_customer_type(Some("BUSINESS"), false),
            CustomerType::Company
        );
        assert_eq!(
            normalize_customer_type(Some(" private-company "), false),
            CustomerType::Company
        );
        assert_eq!(
            normalize_customer_type(Some("boda-boda"), false),
            CustomerType::Bodaboda
        );
    }

    #[test]
    fn test_unknown_defaults_to_personal() {
        assert_eq!(
            normalize_customer_type(Some("alien"), false),
            CustomerType::Personal
        );
        assert_eq!(normalize_customer_type(Some(""), false), CustomerType::Personal);
        assert_eq!(normalize_customer_type(None, false), CustomerType::Personal);
    }

    #[test]
    fn test_order_type_mapping() {
        assert_eq!(order_type_for("tire-sales"), OrderType::Sales);
        assert_eq!(order_type_for("consultation"), OrderType::Consultation);
        assert_eq!(order_type_for("general-inquiry"), OrderType::Consultation);
        assert_eq!(order_type_for("car-service"), OrderType::Service);
        assert_eq!(order_type_for("detailing"), OrderType::Service);
        assert_eq!(order_type_for("  Tire-Sales "), OrderType::Sales);
    }
}
