//! Payment transition logic.
//!
//! An invoice's `paid` flag and `paid_date` move together: the date is set
//! when an invoice transitions to paid, cleared when it transitions back to
//! unpaid, and untouched otherwise. The new `paid_date` is computed here,
//! before the write, never left to column defaults.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Current payment state of an invoice, as read inside the update
/// transaction.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentState {
    pub paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
}

/// The transition implied by the current and requested `paid` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTransition {
    MarkedPaid,
    MarkedUnpaid,
    Unchanged,
}

impl PaymentTransition {
    pub fn classify(current_paid: bool, requested_paid: bool) -> Self {
        match (current_paid, requested_paid) {
            (false, true) => PaymentTransition::MarkedPaid,
            (true, false) => PaymentTransition::MarkedUnpaid,
            _ => PaymentTransition::Unchanged,
        }
    }

    /// Label used for the payment transition metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTransition::MarkedPaid => "marked_paid",
            PaymentTransition::MarkedUnpaid => "marked_unpaid",
            PaymentTransition::Unchanged => "unchanged",
        }
    }
}

/// Compute the `paid_date` to persist for a requested `paid` flag.
pub fn next_paid_date(
    current: &PaymentState,
    requested_paid: bool,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match PaymentTransition::classify(current.paid, requested_paid) {
        PaymentTransition::MarkedPaid => Some(now),
        PaymentTransition::MarkedUnpaid => None,
        PaymentTransition::Unchanged => current.paid_date,
    }
}
