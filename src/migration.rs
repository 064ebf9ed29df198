//! Schema DDL and sample data. Both are idempotent: tables use IF NOT EXISTS, seed rows ON CONFLICT DO NOTHING.

use crate::error::AppError;
use sqlx::PgPool;

/// (code, name, description)
pub const SAMPLE_COMPANIES: &[(&str, &str, &str)] = &[
    ("apple", "Apple Computer", "Maker of OSX."),
    ("ibm", "IBM", "Big blue."),
];

/// (comp_code, amt, paid_date). A paid_date marks the invoice as paid.
pub const SAMPLE_INVOICES: &[(&str, f64, Option<&str>)] = &[
    ("apple", 100.0, None),
    ("apple", 200.0, None),
    ("apple", 300.0, Some("2018-01-01")),
    ("ibm", 400.0, None),
];

/// (code, industry)
pub const SAMPLE_INDUSTRIES: &[(&str, &str)] = &[("acct", "Accounting"), ("aero", "Aerospace")];

/// (company_code, industry_code)
pub const SAMPLE_LINKS: &[(&str, &str)] = &[("apple", "acct"), ("ibm", "aero")];

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id SERIAL PRIMARY KEY,
        comp_code TEXT NOT NULL REFERENCES companies (code) ON DELETE CASCADE,
        amt DOUBLE PRECISION NOT NULL,
        paid BOOLEAN NOT NULL DEFAULT false,
        add_date DATE NOT NULL DEFAULT CURRENT_DATE,
        paid_date DATE,
        CONSTRAINT invoices_amt_check CHECK (amt > 0),
        CONSTRAINT invoices_paid_date_check CHECK ((paid_date IS NOT NULL) = paid)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS industries (
        code TEXT PRIMARY KEY,
        industry TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS companies_industries (
        company_code TEXT NOT NULL REFERENCES companies (code) ON DELETE CASCADE,
        industry_code TEXT NOT NULL REFERENCES industries (code) ON DELETE CASCADE,
        PRIMARY KEY (company_code, industry_code)
    )
    "#,
];

/// Create companies, invoices, industries and companies_industries if they do not exist.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("schema ready");
    Ok(())
}

/// Insert the sample rows. Invoices are only seeded into an empty invoices table since they have no natural key.
pub async fn seed_sample_data(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for (code, name, description) in SAMPLE_COMPANIES {
        sqlx::query("INSERT INTO companies (code, name, description) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING")
            .bind(*code)
            .bind(*name)
            .bind(*description)
            .execute(&mut *tx)
            .await?;
    }
    let (invoice_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM invoices")
        .fetch_one(&mut *tx)
        .await?;
    if invoice_count == 0 {
        for (comp_code, amt, paid_date) in SAMPLE_INVOICES {
            let paid_date = (*paid_date)
                .map(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d"))
                .transpose()
                .map_err(|e| AppError::Malformed(format!("sample paid_date: {}", e)))?;
            sqlx::query("INSERT INTO invoices (comp_code, amt, paid, paid_date) VALUES ($1, $2, $3, $4)")
                .bind(*comp_code)
                .bind(*amt)
                .bind(paid_date.is_some())
                .bind(paid_date)
                .execute(&mut *tx)
                .await?;
        }
    }
    for (code, industry) in SAMPLE_INDUSTRIES {
        sqlx::query("INSERT INTO industries (code, industry) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(*code)
            .bind(*industry)
            .execute(&mut *tx)
            .await?;
    }
    for (company_code, industry_code) in SAMPLE_LINKS {
        sqlx::query(
            "INSERT INTO companies_industries (company_code, industry_code) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(*company_code)
        .bind(*industry_code)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    tracing::info!("sample data seeded");
    Ok(())
}
