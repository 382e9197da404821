//! # Repository Module
//!
//! Database repository implementations for Pitstop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service Operation                                                      │
//! │       │                                                                 │
//! │       │  db.orders().set_status("O4f2...", OrderStatus::Completed)     │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── create(&self, new_order)                                          │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── set_status(&self, id, status)                                     │
//! │  └── list(&self, filter)                                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database per test)                          │
//! │  • SQL is isolated in one place                                        │
//! │  • Transaction boundaries live next to the queries they protect        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`] - Customer registration, search and profile edits
//! - [`VehicleRepository`] - Vehicles on file, keyed by (customer, plate)
//! - [`OrderRepository`] - Order lifecycle and status transitions
//! - [`DocumentRepository`] - Completion job cards and invoices
//! - [`AnalyticsRepository`] - Read-only dashboard rollups
//!
//! [`CustomerRepository`]: customer::CustomerRepository
//! [`VehicleRepository`]: vehicle::VehicleRepository
//! [`OrderRepository`]: order::OrderRepository
//! [`DocumentRepository`]: document::DocumentRepository
//! [`AnalyticsRepository`]: analytics::AnalyticsRepository

pub mod analytics;
pub mod customer;
pub mod document;
pub mod order;
pub mod vehicle;
