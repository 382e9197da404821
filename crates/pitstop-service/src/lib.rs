//! # pitstop-service: Operation Surface for Pitstop
//!
//! The boundary crate: everything an external request layer needs to run
//! the front desk, and nothing about how requests arrive.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              External request layer (not in this repo)                  │
//! │         HTTP routing ──► auth ──► JSON in / JSON out                    │
//! └─────────────────────────────────┬───────────────────────────────────────┘
//! ┌─────────────────────────────────▼───────────────────────────────────────┐
//! │                  pitstop-service (THIS CRATE)                           │
//! │                                                                         │
//! │   ┌─────────────┐        ┌─────────────┐        ┌─────────────┐        │
//! │   │    ops      │        │    dto      │        │   error     │        │
//! │   │ register_.. │        │ camelCase   │        │ ApiError    │        │
//! │   │ create_..   │        │ wire shapes │        │ code+message│        │
//! │   │ set_..      │        │             │        │             │        │
//! │   └─────────────┘        └─────────────┘        └─────────────┘        │
//! └─────────────────────────────────┬───────────────────────────────────────┘
//! ┌─────────────────────────────────▼───────────────────────────────────────┐
//! │              pitstop-db (repositories) / pitstop-core (rules)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pitstop_db::{Database, DbConfig};
//! use pitstop_service::{ops, RegisterCustomerRequest};
//!
//! let db = Database::new(DbConfig::new("pitstop.db")).await?;
//! let req: RegisterCustomerRequest = serde_json::from_str(body)?;
//! let customer = ops::register_customer(&db, req).await?;
//! ```

pub mod dto;
pub mod error;
pub mod ops;

pub use dto::{
    AnalyticsSummaryDto, CreateOrderRequest, CustomerDto, ListOrdersRequest, OrderDetailsDto,
    OrderDto, RegisterCustomerRequest, ServiceDetailsRequest, SetOrderStatusRequest,
    UpdateCustomerRequest, VehicleDto,
};
pub use error::{ApiError, ErrorCode};
