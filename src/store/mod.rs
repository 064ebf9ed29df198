//! Storage seam: every resource reads and writes through [`Store`].
//! [`PgStore`] is the production backend; [`MemoryStore`] serves tests and `--memory` runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::*;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use std::str::FromStr;

/// Storage operations used by the company, invoice and industry resources.
///
/// Lookups return `Ok(None)` / `Ok(false)` for a missing key; the caller decides whether that is a 404.
/// Integrity failures (duplicate key, unknown company, non-positive amount) are `AppError::Constraint`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round-trip for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_companies(&self) -> Result<Vec<Company>, AppError>;
    async fn find_company(&self, code: &str) -> Result<Option<Company>, AppError>;
    /// Invoices owned by `code`, ordered by id.
    async fn company_invoices(&self, code: &str) -> Result<Vec<CompanyInvoice>, AppError>;
    /// Industries linked to `code` through the association table, ordered by industry code.
    async fn company_industries(&self, code: &str) -> Result<Vec<Industry>, AppError>;
    async fn insert_company(&self, new: &NewCompany) -> Result<Company, AppError>;
    async fn update_company(&self, code: &str, changes: &CompanyChanges) -> Result<Option<Company>, AppError>;
    async fn delete_company(&self, code: &str) -> Result<bool, AppError>;

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, AppError>;
    async fn find_invoice(&self, id: i32) -> Result<Option<InvoiceDetail>, AppError>;
    async fn insert_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError>;
    /// Atomically read the current paid state, derive the new `paid_date` with
    /// [`next_paid_date`], and write. `Ok(None)` if the invoice does not exist (nothing written).
    async fn update_invoice(&self, id: i32, changes: &InvoiceChanges) -> Result<Option<Invoice>, AppError>;
    async fn delete_invoice(&self, id: i32) -> Result<bool, AppError>;

    async fn list_industries(&self) -> Result<Vec<Industry>, AppError>;
    async fn find_industry(&self, code: &str) -> Result<Option<Industry>, AppError>;
    /// Companies linked to industry `code`, ordered by company code.
    async fn industry_companies(&self, code: &str) -> Result<Vec<Company>, AppError>;
    async fn insert_industry(&self, new: &NewIndustry) -> Result<Industry, AppError>;
    async fn delete_industry(&self, code: &str) -> Result<bool, AppError>;
}

/// Connect to the server's `postgres` database and create the database named in `database_url` if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name.filter(|n| !n.is_empty() && n != "postgres") else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(AppError::Db)?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

/// Options for the same server pointed at its `postgres` database, plus the target database name (if any).
fn admin_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Malformed(format!("invalid DATABASE_URL: {}", e)))?;
    let db_name = opts.get_database().map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
