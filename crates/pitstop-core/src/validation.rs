//! # Validation Module
//!
//! Input validation utilities for Pitstop.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (outside this repo)                            │
//! │  ├── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service operation (Rust)                                     │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: required fields, length limits                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (phone, order/document numbers)                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  The UNIQUE constraints are the authority: an application pre-check    │
//! │  alone has a race window, so layer 3 always backs layer 2.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length for names and free-text labels.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length for phone numbers.
pub const MAX_PHONE_LEN: usize = 32;

/// Trims a required field and rejects it when empty.
///
/// Returns the trimmed value so callers store the canonical form.
///
/// ## Example
/// ```rust
/// use pitstop_core::validation::require_non_empty;
///
/// assert_eq!(require_non_empty("name", "  Jane ").unwrap(), "Jane");
/// assert!(require_non_empty("name", "   ").is_err());
/// ```
pub fn require_non_empty(field: &str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(trimmed.to_string())
}

/// Validates a customer name: required, bounded length.
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = require_non_empty("name", name)?;
    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(name)
}

/// Validates a phone number: required, bounded length.
///
/// No format rules beyond that: phone matching is exact and
/// case-sensitive, so whatever the desk enters is what must be unique.
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = require_non_empty("phone", phone)?;
    if phone.len() > MAX_PHONE_LEN {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LEN,
        });
    }
    Ok(phone)
}

// =============================================================================
// Unit Tests
// =============================================================================
