//! PostgreSQL backend. Every statement is parameterized; writes use RETURNING.

use super::Store;
use crate::error::AppError;
use crate::model::*;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

const INVOICE_COLUMNS: &str = "id, comp_code, amt, paid, add_date, paid_date";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Row shape of the invoice-with-company join.
#[derive(sqlx::FromRow)]
struct InvoiceCompanyRow {
    id: i32,
    amt: f64,
    paid: bool,
    add_date: NaiveDate,
    paid_date: Option<NaiveDate>,
    code: String,
    name: String,
    description: Option<String>,
}

impl From<InvoiceCompanyRow> for InvoiceDetail {
    fn from(r: InvoiceCompanyRow) -> Self {
        InvoiceDetail {
            id: r.id,
            amt: r.amt,
            paid: r.paid,
            add_date: r.add_date,
            paid_date: r.paid_date,
            company: Company {
                code: r.code,
                name: r.name,
                description: r.description,
            },
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let sql = "SELECT code, name, description FROM companies ORDER BY code";
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Company>(sql).fetch_all(&self.pool).await?)
    }

    async fn find_company(&self, code: &str) -> Result<Option<Company>, AppError> {
        let sql = "SELECT code, name, description FROM companies WHERE code = $1";
        tracing::debug!(sql = %sql, code, "query");
        Ok(sqlx::query_as::<_, Company>(sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn company_invoices(&self, code: &str) -> Result<Vec<CompanyInvoice>, AppError> {
        let sql = "SELECT id, amt, paid, add_date, paid_date FROM invoices WHERE comp_code = $1 ORDER BY id";
        tracing::debug!(sql = %sql, code, "query");
        Ok(sqlx::query_as::<_, CompanyInvoice>(sql)
            .bind(code)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn company_industries(&self, code: &str) -> Result<Vec<Industry>, AppError> {
        let sql = r#"
            SELECT ind.code, ind.industry
            FROM companies_industries ci
            JOIN industries ind ON ind.code = ci.industry_code
            WHERE ci.company_code = $1
            ORDER BY ind.code
        "#;
        tracing::debug!(sql = %sql, code, "query");
        Ok(sqlx::query_as::<_, Industry>(sql)
            .bind(code)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_company(&self, new: &NewCompany) -> Result<Company, AppError> {
        let sql = r#"
            INSERT INTO companies (code, name, description)
            VALUES ($1, $2, $3)
            RETURNING code, name, description
        "#;
        tracing::debug!(sql = %sql, code = %new.code, "query");
        Ok(sqlx::query_as::<_, Company>(sql)
            .bind(&new.code)
            .bind(&new.name)
            .bind(&new.description)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_company(&self, code: &str, changes: &CompanyChanges) -> Result<Option<Company>, AppError> {
        let sql = r#"
            UPDATE companies
            SET name = $2, description = $3
            WHERE code = $1
            RETURNING code, name, description
        "#;
        tracing::debug!(sql = %sql, code, "query");
        Ok(sqlx::query_as::<_, Company>(sql)
            .bind(code)
            .bind(&changes.name)
            .bind(&changes.description)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_company(&self, code: &str) -> Result<bool, AppError> {
        let sql = "DELETE FROM companies WHERE code = $1";
        tracing::debug!(sql = %sql, code, "query");
        let done = sqlx::query(sql).bind(code).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        let sql = "SELECT id, comp_code FROM invoices ORDER BY id";
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, InvoiceSummary>(sql).fetch_all(&self.pool).await?)
    }

    async fn find_invoice(&self, id: i32) -> Result<Option<InvoiceDetail>, AppError> {
        let sql = r#"
            SELECT i.id, i.amt, i.paid, i.add_date, i.paid_date, c.code, c.name, c.description
            FROM invoices i
            JOIN companies c ON c.code = i.comp_code
            WHERE i.id = $1
        "#;
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, InvoiceCompanyRow>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(InvoiceDetail::from))
    }

    async fn insert_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError> {
        let sql = format!(
            "INSERT INTO invoices (comp_code, amt) VALUES ($1, $2) RETURNING {}",
            INVOICE_COLUMNS
        );
        tracing::debug!(sql = %sql, comp_code = %new.comp_code, amt = new.amt, "query");
        Ok(sqlx::query_as::<_, Invoice>(&sql)
            .bind(&new.comp_code)
            .bind(new.amt)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_invoice(&self, id: i32, changes: &InvoiceChanges) -> Result<Option<Invoice>, AppError> {
        let mut tx = self.pool.begin().await?;

        let lock_sql = "SELECT paid, paid_date, CURRENT_DATE FROM invoices WHERE id = $1 FOR UPDATE";
        tracing::debug!(sql = %lock_sql, id, "query (tx)");
        let current: Option<(bool, Option<NaiveDate>, NaiveDate)> = sqlx::query_as(lock_sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((was_paid, paid_date, today)) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        let new_paid_date = next_paid_date(was_paid, paid_date, changes.paid, today);
        let update_sql = format!(
            "UPDATE invoices SET amt = $2, paid = $3, paid_date = $4 WHERE id = $1 RETURNING {}",
            INVOICE_COLUMNS
        );
        tracing::debug!(sql = %update_sql, id, amt = changes.amt, paid = changes.paid, "query (tx)");
        let row = sqlx::query_as::<_, Invoice>(&update_sql)
            .bind(id)
            .bind(changes.amt)
            .bind(changes.paid)
            .bind(new_paid_date)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(row))
    }

    async fn delete_invoice(&self, id: i32) -> Result<bool, AppError> {
        let sql = "DELETE FROM invoices WHERE id = $1";
        tracing::debug!(sql = %sql, id, "query");
        let done = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn list_industries(&self) -> Result<Vec<Industry>, AppError> {
        let sql = "SELECT code, industry FROM industries ORDER BY code";
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Industry>(sql).fetch_all(&self.pool).await?)
    }

    async fn find_industry(&self, code: &str) -> Result<Option<Industry>, AppError> {
        let sql = "SELECT code, industry FROM industries WHERE code = $1";
        tracing::debug!(sql = %sql, code, "query");
        Ok(sqlx::query_as::<_, Industry>(sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn industry_companies(&self, code: &str) -> Result<Vec<Company>, AppError> {
        let sql = r#"
            SELECT c.code, c.name, c.description
            FROM companies_industries ci
            JOIN companies c ON c.code = ci.company_code
            WHERE ci.industry_code = $1
            ORDER BY c.code
        "#;
        tracing::debug!(sql = %sql, code, "query");
        Ok(sqlx::query_as::<_, Company>(sql)
            .bind(code)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_industry(&self, new: &NewIndustry) -> Result<Industry, AppError> {
        let sql = "INSERT INTO industries (code, industry) VALUES ($1, $2) RETURNING code, industry";
        tracing::debug!(sql = %sql, code = %new.code, "query");
        Ok(sqlx::query_as::<_, Industry>(sql)
            .bind(&new.code)
            .bind(&new.industry)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_industry(&self, code: &str) -> Result<bool, AppError> {
        let sql = "DELETE FROM industries WHERE code = $1";
        tracing::debug!(sql = %sql, code, "query");
        let done = sqlx::query(sql).bind(code).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }
}
