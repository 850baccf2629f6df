//! Database service for billtrack.
//!
//! Wraps the PostgreSQL pool and exposes the company and invoice
//! repositories. Storage-level failures are classified into the error
//! taxonomy here; callers never see raw sqlx errors.

use crate::error::AppError;
use crate::models::{
    Company, CompanyDetail, CompanySummary, CreateCompany, CreateInvoice, Invoice, InvoiceDetail,
    InvoiceSummary, InvoiceWithCompanyRow, UpdateCompany, UpdateInvoice,
};
use crate::services::metrics::{DB_QUERY_DURATION, PAYMENT_TRANSITIONS_TOTAL};
use crate::services::payment::{self, PaymentState, PaymentTransition};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "billtrack"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(anyhow::anyhow!("Failed to connect: {}", e))
            })?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Health check"))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Company Operations
    // -------------------------------------------------------------------------

    /// List all companies, ordered by name.
    #[instrument(skip(self))]
    pub async fn list_companies(&self) -> Result<Vec<CompanySummary>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_companies"])
            .start_timer();

        let companies = sqlx::query_as::<_, CompanySummary>(
            r#"
            SELECT code, name
            FROM companies
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to list companies"))?;

        timer.observe_duration();

        Ok(companies)
    }

    /// Get a company by code, with the ids of its invoices.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn get_company(&self, code: &str) -> Result<CompanyDetail, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_company"])
            .start_timer();

        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT code, name, description
            FROM companies
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to get company"))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Company '{}' does not exist", code)))?;

        let invoice_ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT id
            FROM invoices
            WHERE comp_code = $1
            ORDER BY id
            "#,
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to get company invoices"))?;

        timer.observe_duration();

        Ok(CompanyDetail::from_company(company, invoice_ids))
    }

    /// Create a new company.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_company(&self, input: &CreateCompany) -> Result<Company, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_company"])
            .start_timer();

        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (code, name, description)
            VALUES ($1, $2, $3)
            RETURNING code, name, description
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Company '{}' already exists", input.code))
            }
            _ => AppError::from_sqlx(e, "Failed to create company"),
        })?;

        timer.observe_duration();

        info!(code = %company.code, "Company created");

        Ok(company)
    }

    /// Update a company's name and description. The code is immutable.
    #[instrument(skip(self, input), fields(code = %code))]
    pub async fn update_company(
        &self,
        code: &str,
        input: &UpdateCompany,
    ) -> Result<Company, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_company"])
            .start_timer();

        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, description = $3
            WHERE code = $1
            RETURNING code, name, description
            "#,
        )
        .bind(code)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to update company"))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Company '{}' does not exist", code)))?;

        timer.observe_duration();

        info!(code = %company.code, "Company updated");

        Ok(company)
    }

    /// Delete a company. Fails if any invoice still references it.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn delete_company(&self, code: &str) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_company"])
            .start_timer();

        let result = sqlx::query(
            r#"
            DELETE FROM companies
            WHERE code = $1
            "#,
        )
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::ReferentialViolation(anyhow::anyhow!(
                    "Company '{}' still has invoices referencing it",
                    code
                ))
            }
            _ => AppError::from_sqlx(e, "Failed to delete company"),
        })?;

        timer.observe_duration();

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Company '{}' does not exist",
                code
            )));
        }

        info!(code = %code, "Company deleted");

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    /// List all invoices, ordered by id.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, InvoiceSummary>(
            r#"
            SELECT id, comp_code
            FROM invoices
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to list invoices"))?;

        timer.observe_duration();

        Ok(invoices)
    }

    /// Get an invoice by id, joined with its company.
    #[instrument(skip(self), fields(id = id))]
    pub async fn get_invoice(&self, id: i32) -> Result<InvoiceDetail, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let row = sqlx::query_as::<_, InvoiceWithCompanyRow>(
            r#"
            SELECT invoices.id,
                   invoices.amt,
                   invoices.paid,
                   invoices.add_date,
                   invoices.paid_date,
                   companies.code,
                   companies.name,
                   companies.description
            FROM invoices
            INNER JOIN companies ON invoices.comp_code = companies.code
            WHERE invoices.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to get invoice"))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} does not exist", id)))?;

        timer.observe_duration();

        Ok(row.into())
    }

    /// Create a new invoice. New invoices start unpaid with no paid date.
    #[instrument(skip(self, input), fields(comp_code = %input.comp_code))]
    pub async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError> {
        if input.amt < Decimal::ZERO {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "Invoice amount must be non-negative, got {}",
                input.amt
            )));
        }

        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (comp_code, amt)
            VALUES ($1, $2)
            RETURNING id, comp_code, amt, paid, add_date, paid_date
            "#,
        )
        .bind(&input.comp_code)
        .bind(input.amt)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::ReferentialViolation(anyhow::anyhow!(
                    "Company '{}' does not exist",
                    input.comp_code
                ))
            }
            _ => AppError::from_sqlx(e, "Failed to create invoice"),
        })?;

        timer.observe_duration();

        info!(id = invoice.id, comp_code = %invoice.comp_code, "Invoice created");

        Ok(invoice)
    }

    /// Update an invoice's amount and payment state.
    ///
    /// The current state is read with a row lock, the new `paid_date` is
    /// computed from it, and the write lands in the same transaction, so two
    /// concurrent updates cannot interleave their read and write.
    #[instrument(skip(self, input), fields(id = id))]
    pub async fn update_invoice(
        &self,
        id: i32,
        input: &UpdateInvoice,
    ) -> Result<Invoice, AppError> {
        if input.amt < Decimal::ZERO {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "Invoice amount must be non-negative, got {}",
                input.amt
            )));
        }

        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to begin transaction"))?;

        let current = sqlx::query_as::<_, PaymentState>(
            r#"
            SELECT paid, paid_date
            FROM invoices
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to read invoice payment state"))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} does not exist", id)))?;

        let transition = PaymentTransition::classify(current.paid, input.paid);
        let paid_date = payment::next_paid_date(&current, input.paid, Utc::now());

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET amt = $2, paid = $3, paid_date = $4
            WHERE id = $1
            RETURNING id, comp_code, amt, paid, add_date, paid_date
            "#,
        )
        .bind(id)
        .bind(input.amt)
        .bind(input.paid)
        .bind(paid_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to update invoice"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to commit invoice update"))?;

        timer.observe_duration();

        PAYMENT_TRANSITIONS_TOTAL
            .with_label_values(&[transition.as_str()])
            .inc();

        info!(
            id = invoice.id,
            paid = invoice.paid,
            transition = transition.as_str(),
            "Invoice updated"
        );

        Ok(invoice)
    }

    /// Delete an invoice.
    #[instrument(skip(self), fields(id = id))]
    pub async fn delete_invoice(&self, id: i32) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query(
            r#"
            DELETE FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to delete invoice"))?;

        timer.observe_duration();

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Invoice {} does not exist",
                id
            )));
        }

        info!(id = id, "Invoice deleted");

        Ok(())
    }
}
