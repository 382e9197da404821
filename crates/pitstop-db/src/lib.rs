//! # pitstop-db: Database Layer for Pitstop
//!
//! This crate provides database access for the Pitstop front-desk system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Pitstop Data Flow                                 │
//! │                                                                         │
//! │  Service Operation (create_order)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pitstop-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (order.rs)    │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CustomerRepo  │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ OrderRepo     │    │              │  │   │
//! │  │   │ Management    │    │ DocumentRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │ daily number  │                       │   │
//! │  │                        │  allocator    │                       │   │
//! │  │                        │ (sequence.rs) │                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys on)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`sequence`] - Atomic date-scoped number allocation
//! - [`repository`] - Repository implementations (customer, order, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pitstop_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let config = DbConfig::new("path/to/pitstop.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let hits = db.customers().search("jane").await?;
//! let record = db.orders().set_status(&id, OrderStatus::Completed).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sequence;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::analytics::{AnalyticsRepository, AnalyticsSummary, ServiceTypeCount};
pub use repository::customer::CustomerRepository;
pub use repository::document::DocumentRepository;
pub use repository::order::{NewOrder, OrderFilter, OrderRecord, OrderRepository};
pub use repository::vehicle::{VehicleInput, VehicleRepository};
