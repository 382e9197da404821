//! # pitstop-core: Pure Business Logic for Pitstop
//!
//! This crate is the **heart** of Pitstop, a service-center front desk:
//! customers and their vehicles come in, orders move through a small state
//! machine, and completion produces a job card and an invoice with
//! date-scoped numbers. Everything here is pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pitstop Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              External request layer (not in this repo)          │   │
//! │  │    HTTP routing ──► auth ──► page rendering                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  pitstop-service (operations)                   │   │
//! │  │    register_customer, create_order, set_order_status, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pitstop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   ident   │  │ duration  │  │ classify  │  │   │
//! │  │   │  Customer │  │ opaque_id │  │ "1h 30m"  │  │ customer/ │  │   │
//! │  │   │   Order   │  │ JC-/INV-  │  │  parsing  │  │ order type│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   pitstop-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, sequences, repositories      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Vehicle, Order, JobCard, Invoice)
//! - [`ident`] - Opaque IDs and date-scoped number formatting
//! - [`duration`] - Lenient estimated-duration parsing
//! - [`classify`] - Customer-type and order-type resolution
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Required-field and length checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Lenient at the edges**: free-text durations and dates degrade to
//!    sensible defaults instead of failing an intake
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use pitstop_core::classify::normalize_customer_type;
//! use pitstop_core::duration::{parse_estimated_minutes, DurationInput};
//! use pitstop_core::types::CustomerType;
//!
//! let kind = normalize_customer_type(Some("business"), false);
//! assert_eq!(kind, CustomerType::Company);
//!
//! let input = DurationInput::Text("1h 30m".into());
//! assert_eq!(parse_estimated_minutes(Some(&input)), 90);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classify;
pub mod duration;
pub mod error;
pub mod ident;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pitstop_core::Order` instead of
// `use pitstop_core::types::Order`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// ID prefix for customers (`Cxxxxxxxxxxxx`).
pub const CUSTOMER_ID_PREFIX: &str = "C";

/// ID prefix for orders (`Oxxxxxxxxxxxx`).
pub const ORDER_ID_PREFIX: &str = "O";

/// Cap on customer search results.
///
/// ## Business Reason
/// Search is a front-desk typeahead; anything past 100 rows is noise and
/// an unbounded query must not be able to drag the whole table across.
pub const MAX_SEARCH_RESULTS: i64 = 100;

/// Cap on order listings, newest first.
pub const MAX_ORDER_RESULTS: i64 = 200;
