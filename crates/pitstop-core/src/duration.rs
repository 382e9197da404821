//! # Duration Parsing
//!
//! Lenient parsing of the "estimated completion" input and minute math for
//! the completion path.
//!
//! ## Leniency Policy
//! The front desk types durations free-form: `"1h 30m"`, `"90m"`, `"120"`.
//! Garbage characters are ignored and an unusable input falls back to a
//! 60-minute default instead of failing the whole order creation. This is
//! deliberate: a sloppy duration must never block an intake.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Default estimate when the input is absent or useless.
pub const DEFAULT_ESTIMATED_MIN: i64 = 60;

/// The "estimatedCompletion" wire value: either plain integer minutes or a
/// free-form duration string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum DurationInput {
    Minutes(i64),
    Text(String),
}

/// Parses an optional estimated-completion input into whole minutes.
///
/// ## Rules
/// - `None` / empty string → 60
/// - Integer input: clamped to non-negative; zero → 60
/// - String input: digits accumulate; `h` multiplies the accumulator by 60
///   and adds it, `m` adds it as-is; every other character (whitespace
///   included) is ignored; a trailing number with no unit is added verbatim;
///   a zero total → 60
///
/// ## Example
/// ```rust
/// use pitstop_core::duration::{parse_estimated_minutes, DurationInput};
///
/// let input = Some(DurationInput::Text("1h 30m".to_string()));
/// assert_eq!(parse_estimated_minutes(input.as_ref()), 90);
/// ```
pub fn parse_estimated_minutes(input: Option<&DurationInput>) -> i64 {
    let total = match input {
        None => 0,
        Some(DurationInput::Minutes(n)) => (*n).max(0),
        Some(DurationInput::Text(s)) => parse_duration_text(s),
    };

    if total == 0 {
        DEFAULT_ESTIMATED_MIN
    } else {
        total
    }
}

/// Accumulator scan over a free-form duration string.
fn parse_duration_text(s: &str) -> i64 {
    let mut total: i64 = 0;
    let mut num: i64 = 0;
    let mut has_num = false;

    for ch in s.trim().to_lowercase().chars() {
        match ch {
            '0'..='9' => {
                num = num.saturating_mul(10).saturating_add((ch as u8 - b'0') as i64);
                has_num = true;
            }
            'h' if has_num => {
                total = total.saturating_add(num.saturating_mul(60));
                num = 0;
                has_num = false;
            }
            'm' if has_num => {
                total = total.saturating_add(num);
                num = 0;
                has_num = false;
            }
            // Units with no pending number, separators, garbage: ignored
            _ => {}
        }
    }

    // Trailing numeric remainder with no unit counts as minutes
    if has_num {
        total = total.saturating_add(num);
    }

    total
}

/// Whole minutes between two instants, floored, never negative.
///
/// Used to compute `actual_duration_min` when an order completes.
pub fn elapsed_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    ((to - from).num_seconds() / 60).max(0)
}

// =============================================================================
// Unit Tests
// =============================================================================
