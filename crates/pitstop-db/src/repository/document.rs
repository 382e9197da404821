//! # Completion Document Repository
//!
//! Generates and reads the job card and invoice an order earns when it
//! completes.
//!
//! ## Exactly-Once Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Completion Document Generation                            │
//! │                                                                         │
//! │  set_order_status(id, completed)  ──────┐                               │
//! │  set_order_status(id, completed)  ──────┤  (concurrent retries,        │
//! │  re-completion of a completed order ────┤   double clicks, crashes)    │
//! │                                         ▼                               │
//! │                            ensure_for_order(id)                         │
//! │                                         │                               │
//! │          ┌──────────────────────────────┴─────────────┐                 │
//! │          ▼                                            ▼                 │
//! │   already exists? ── yes ──► no-op             allocate number          │
//! │          │                                            │                 │
//! │          no                                           ▼                 │
//! │          └──────────────────────────► INSERT OR IGNORE (order_id is    │
//! │                                       UNIQUE: the loser of a race      │
//! │                                       becomes a no-op, its number a    │
//! │                                       harmless gap)                    │
//! │                                                                         │
//! │  Result: exactly one JobCard and one Invoice per order, always.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numbers are dated at the moment of document creation, not the order's
//! completion time; the daily counters are global across orders.

use chrono::{Local, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::sequence::{self, KIND_INVOICE, KIND_JOB_CARD};
use pitstop_core::{ident, Invoice, InvoiceStatus, JobCard};

/// Repository for job cards and invoices.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Ensures the completed order has its job card and invoice.
    ///
    /// Idempotent and race-safe: call it as often as you like, one of
    /// each document exists afterwards.
    pub async fn ensure_for_order(&self, order_id: &str) -> DbResult<()> {
        self.ensure_job_card(order_id).await?;
        self.ensure_invoice(order_id).await?;
        Ok(())
    }

    async fn ensure_job_card(&self, order_id: &str) -> DbResult<()> {
        if self.get_job_card(order_id).await?.is_some() {
            return Ok(());
        }

        let today = Local::now().date_naive();
        let seq = sequence::allocate(&self.pool, KIND_JOB_CARD, today).await?;
        let number = ident::job_card_number(today, seq);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO job_cards (number, order_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&number)
        .bind(order_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(order_id = %order_id, "Job card already created by a concurrent completion");
        } else {
            info!(order_id = %order_id, number = %number, "Job card created");
        }

        Ok(())
    }

    async fn ensure_invoice(&self, order_id: &str) -> DbResult<()> {
        if self.get_invoice(order_id).await?.is_some() {
            return Ok(());
        }

        let today = Local::now().date_naive();
        let seq = sequence::allocate(&self.pool, KIND_INVOICE, today).await?;
        let number = ident::invoice_number(today, seq);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO invoices (number, order_id, status, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&number)
        .bind(order_id)
        .bind(InvoiceStatus::Draft)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(order_id = %order_id, "Invoice already created by a concurrent completion");
        } else {
            info!(order_id = %order_id, number = %number, "Invoice created");
        }

        Ok(())
    }

    /// Gets the job card for an order, if generated.
    pub async fn get_job_card(&self, order_id: &str) -> DbResult<Option<JobCard>> {
        let card: Option<JobCard> = sqlx::query_as(
            r#"
            SELECT id, number, order_id, created_at
            FROM job_cards
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Gets the invoice for an order, if generated.
    pub async fn get_invoice(&self, order_id: &str) -> DbResult<Option<Invoice>> {
        let invoice: Option<Invoice> = sqlx::query_as(
            r#"
            SELECT id, number, order_id, status, created_at
            FROM invoices
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Counts job cards (diagnostics and tests).
    pub async fn count_job_cards(&self) -> DbResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_cards")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Counts invoices (diagnostics and tests).
    pub async fn count_invoices(&self) -> DbResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
