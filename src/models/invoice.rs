//! Invoice model.

use crate::models::Company;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Invoice record.
///
/// `paid_date` is non-null exactly when `paid` is true; the payment
/// transition logic in `services::payment` maintains the pairing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: Decimal,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
}

/// Listing row for invoices.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// Invoice joined with its company.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: Decimal,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
    pub company: Company,
}

/// Flat row produced by the invoice/company join.
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceWithCompanyRow {
    pub id: i32,
    pub amt: Decimal,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<InvoiceWithCompanyRow> for InvoiceDetail {
    fn from(row: InvoiceWithCompanyRow) -> Self {
        Self {
            id: row.id,
            amt: row.amt,
            paid: row.paid,
            add_date: row.add_date,
            paid_date: row.paid_date,
            company: Company {
                code: row.code,
                name: row.name,
                description: row.description,
            },
        }
    }
}

/// Input for creating an invoice. New invoices always start unpaid.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub comp_code: String,
    pub amt: Decimal,
}

/// Input for updating an invoice. Both fields are required; the requested
/// `paid` flag drives the payment transition.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoice {
    pub amt: Decimal,
    pub paid: bool,
}
