//! # Daily Sequence Allocator
//!
//! Atomic allocation of date-scoped sequence numbers (the NNN in
//! `YYMMDD-NNN`, `JC-YYYYMMDD-NNN`, `INV-YYYYMMDD-NNN`).
//!
//! ## Why a Counter Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE COUNT-THEN-INSERT RACE                                             │
//! │                                                                         │
//! │  Naive numbering counts today's rows and adds one:                      │
//! │                                                                         │
//! │    Request A: COUNT(*) = 4  ──► number 005 ──► INSERT                   │
//! │    Request B: COUNT(*) = 4  ──► number 005 ──► INSERT  ❌ duplicate     │
//! │                                                                         │
//! │  OUR SOLUTION: one atomic upsert per allocation                         │
//! │                                                                         │
//! │    INSERT INTO daily_sequences (kind, day, next_value) VALUES (?, ?, 1) │
//! │    ON CONFLICT (kind, day) DO UPDATE SET next_value = next_value + 1    │
//! │    RETURNING next_value                                                 │
//! │                                                                         │
//! │  A single statement, so SQLite serializes it: two concurrent            │
//! │  allocations for the same (kind, day) always see distinct values.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counters reset at local midnight simply because the `day` key changes;
//! old rows are harmless bookkeeping. An allocated value that is never
//! used (a lost insert race) leaves a gap in the printed numbers, which
//! is fine - duplicates are the thing that must never happen.

use chrono::NaiveDate;

use crate::error::DbResult;

/// Sequence kind for order numbers (`YYMMDD-NNN`).
pub const KIND_ORDER: &str = "order";

/// Sequence kind for job card numbers (`JC-YYYYMMDD-NNN`).
pub const KIND_JOB_CARD: &str = "job-card";

/// Sequence kind for invoice numbers (`INV-YYYYMMDD-NNN`).
pub const KIND_INVOICE: &str = "invoice";

/// Reserves the next sequence value for `(kind, day)`.
///
/// Takes any SQLite executor so callers can allocate inside a transaction
/// (order creation does this as its first statement, taking the write
/// lock up front) or straight on the pool (document generation).
///
/// Returns a 1-based value.
pub async fn allocate<'e, E>(executor: E, kind: &str, day: NaiveDate) -> DbResult<i64>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let day_key = day.format("%Y-%m-%d").to_string();

    let value: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO daily_sequences (kind, day, next_value)
        VALUES (?1, ?2, 1)
        ON CONFLICT (kind, day) DO UPDATE SET next_value = next_value + 1
        RETURNING next_value
        "#,
    )
    .bind(kind)
    .bind(day_key)
    .fetch_one(executor)
    .await?;

    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
