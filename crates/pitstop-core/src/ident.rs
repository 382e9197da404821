//! # Identifier Generation & Formatting
//!
//! Opaque IDs and human-readable, date-scoped document numbers.
//!
//! ## Two Kinds of Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Identity in Pitstop                               │
//! │                                                                         │
//! │  Opaque ID (machine)                Sequence number (human)             │
//! │  ───────────────────                ───────────────────────             │
//! │  opaque_id("O")                     order_number(date, 7)               │
//! │    → "O4f9a1c2b3d4e"                  → "260830-007"                    │
//! │                                                                         │
//! │  • random, no coordination          • daily counter, needs an atomic   │
//! │  • used for relations                 allocator (pitstop-db::sequence)  │
//! │  • ≤ 32 chars                       • printed on job cards/invoices    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module only FORMATS sequence numbers. Allocating the next NNN for
//! a given day is a storage concern: see `pitstop_db::sequence`, which
//! reserves numbers atomically so concurrent creations on the same day can
//! never collide.

use chrono::NaiveDate;
use uuid::Uuid;

/// Length of the random hex suffix on opaque IDs.
///
/// 12 hex chars = 48 random bits. Collisions are astronomically unlikely,
/// but the store still carries a PRIMARY KEY so a collision surfaces as a
/// conflict instead of silent corruption.
pub const ID_SUFFIX_LEN: usize = 12;

/// Maximum opaque ID length the storage layer accepts.
pub const MAX_ID_LEN: usize = 32;

/// Generates an opaque entity ID: `prefix` + 12 lowercase hex characters.
///
/// ## Example
/// ```rust
/// use pitstop_core::ident::opaque_id;
///
/// let id = opaque_id("C");
/// assert!(id.starts_with('C'));
/// assert_eq!(id.len(), 13);
/// ```
pub fn opaque_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &hex[..ID_SUFFIX_LEN])
}

/// Formats an order number: `YYMMDD-NNN`.
///
/// `seq` is the daily sequence value (1-based); it is zero-padded to three
/// digits and keeps growing past 999 rather than wrapping.
pub fn order_number(date: NaiveDate, seq: i64) -> String {
    format!("{}-{:03}", date.format("%y%m%d"), seq)
}

/// Formats a job card number: `JC-YYYYMMDD-NNN`.
pub fn job_card_number(date: NaiveDate, seq: i64) -> String {
    format!("JC-{}-{:03}", date.format("%Y%m%d"), seq)
}

/// Formats an invoice number: `INV-YYYYMMDD-NNN`.
///
/// The invoice counter is independent from the job card counter even
/// though both reset at local midnight.
pub fn invoice_number(date: NaiveDate, seq: i64) -> String {
    format!("INV-{}-{:03}", date.format("%Y%m%d"), seq)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_opaque_id_shape() {
        let id = opaque_id("O");
        assert_eq!(id.len(), 1 + ID_SUFFIX_LEN);
        assert!(id.len() <= MAX_ID_LEN);
        assert!(id[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_opaque_ids_differ() {
        assert_ne!(opaque_id("C"), opaque_id("C"));
    }

    #[test]
    fn test_order_number_format() {
        assert_eq!(order_number(date(2026, 8, 30), 7), "260830-007");
        assert_eq!(order_number(date(2026, 1, 2), 123), "260102-123");
        // Past three digits the number widens instead of wrapping
        assert_eq!(order_number(date(2026, 8, 30), 1000), "260830-1000");
    }

    #[test]
    fn test_document_number_formats() {
        assert_eq!(job_card_number(date(2026, 8, 30), 1), "JC-20260830-001");
        assert_eq!(invoice_number(date(2026, 8, 30), 42), "INV-20260830-042");
    }
}
