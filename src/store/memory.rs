//! In-process backend with the same integrity rules as the SQL schema:
//! unique keys, invoice -> company foreign key, `amt > 0`, and cascading deletes.

use super::Store;
use crate::error::AppError;
use crate::model::*;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    companies: Vec<Company>,
    invoices: Vec<Invoice>,
    industries: Vec<Industry>,
    /// (company_code, industry_code)
    links: Vec<(String, String)>,
    last_invoice_id: i32,
}

impl Tables {
    fn has_company(&self, code: &str) -> bool {
        self.companies.iter().any(|c| c.code == code)
    }

    fn has_industry(&self, code: &str) -> bool {
        self.industries.iter().any(|i| i.code == code)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    /// Fixed clock for tests; `None` uses the local date.
    today: Option<NaiveDate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin "today" so add_date / paid_date are deterministic.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Store preloaded with the sample companies, invoices, industries and associations.
    pub fn seeded() -> Result<Self, AppError> {
        let store = Self::new();
        store.load_sample_data()?;
        Ok(store)
    }

    pub fn load_sample_data(&self) -> Result<(), AppError> {
        for (code, name, description) in crate::migration::SAMPLE_COMPANIES {
            self.insert_company_sync(&NewCompany {
                code: code.to_string(),
                name: name.to_string(),
                description: description.to_string(),
            })?;
        }
        for (comp_code, amt, paid_date) in crate::migration::SAMPLE_INVOICES {
            let inv = self.insert_invoice_sync(&NewInvoice {
                comp_code: comp_code.to_string(),
                amt: *amt,
            })?;
            if let Some(date) = paid_date {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| AppError::Malformed(format!("sample paid_date: {}", e)))?;
                let mut t = self.write();
                if let Some(row) = t.invoices.iter_mut().find(|i| i.id == inv.id) {
                    row.paid = true;
                    row.paid_date = Some(date);
                }
            }
        }
        for (code, industry) in crate::migration::SAMPLE_INDUSTRIES {
            self.insert_industry_sync(&NewIndustry {
                code: code.to_string(),
                industry: industry.to_string(),
            })?;
        }
        for (company_code, industry_code) in crate::migration::SAMPLE_LINKS {
            self.link(company_code, industry_code)?;
        }
        Ok(())
    }

    /// Associate a company with an industry. Both must exist; duplicates are ignored.
    pub fn link(&self, company_code: &str, industry_code: &str) -> Result<(), AppError> {
        let mut t = self.write();
        if !t.has_company(company_code) || !t.has_industry(industry_code) {
            return Err(AppError::Constraint(format!(
                "companies_industries references unknown key ({}, {})",
                company_code, industry_code
            )));
        }
        let pair = (company_code.to_string(), industry_code.to_string());
        if !t.links.contains(&pair) {
            t.links.push(pair);
        }
        Ok(())
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_company_sync(&self, new: &NewCompany) -> Result<Company, AppError> {
        let mut t = self.write();
        if t.has_company(&new.code) {
            return Err(AppError::Constraint(format!("company '{}' already exists", new.code)));
        }
        if t.companies.iter().any(|c| c.name == new.name) {
            return Err(AppError::Constraint(format!("company name '{}' already exists", new.name)));
        }
        let company = Company {
            code: new.code.clone(),
            name: new.name.clone(),
            description: Some(new.description.clone()),
        };
        t.companies.push(company.clone());
        Ok(company)
    }

    fn insert_invoice_sync(&self, new: &NewInvoice) -> Result<Invoice, AppError> {
        let today = self.today();
        let mut t = self.write();
        if !t.has_company(&new.comp_code) {
            return Err(AppError::Constraint(format!(
                "invoices.comp_code references unknown company '{}'",
                new.comp_code
            )));
        }
        if !(new.amt > 0.0) {
            return Err(AppError::Constraint(format!("amt must be positive, got {}", new.amt)));
        }
        t.last_invoice_id += 1;
        let invoice = Invoice {
            id: t.last_invoice_id,
            comp_code: new.comp_code.clone(),
            amt: new.amt,
            paid: false,
            add_date: today,
            paid_date: None,
        };
        t.invoices.push(invoice.clone());
        Ok(invoice)
    }

    fn insert_industry_sync(&self, new: &NewIndustry) -> Result<Industry, AppError> {
        let mut t = self.write();
        if t.has_industry(&new.code) {
            return Err(AppError::Constraint(format!("industry '{}' already exists", new.code)));
        }
        let industry = Industry {
            code: new.code.clone(),
            industry: new.industry.clone(),
        };
        t.industries.push(industry.clone());
        Ok(industry)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let mut out = self.read().companies.clone();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(out)
    }

    async fn find_company(&self, code: &str) -> Result<Option<Company>, AppError> {
        Ok(self.read().companies.iter().find(|c| c.code == code).cloned())
    }

    async fn company_invoices(&self, code: &str) -> Result<Vec<CompanyInvoice>, AppError> {
        let mut out: Vec<CompanyInvoice> = self
            .read()
            .invoices
            .iter()
            .filter(|i| i.comp_code == code)
            .map(CompanyInvoice::from)
            .collect();
        out.sort_by_key(|i| i.id);
        Ok(out)
    }

    async fn company_industries(&self, code: &str) -> Result<Vec<Industry>, AppError> {
        let t = self.read();
        let mut out: Vec<Industry> = t
            .links
            .iter()
            .filter(|(company, _)| company == code)
            .filter_map(|(_, industry)| t.industries.iter().find(|i| &i.code == industry).cloned())
            .collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(out)
    }

    async fn insert_company(&self, new: &NewCompany) -> Result<Company, AppError> {
        self.insert_company_sync(new)
    }

    async fn update_company(&self, code: &str, changes: &CompanyChanges) -> Result<Option<Company>, AppError> {
        let mut t = self.write();
        let Some(idx) = t.companies.iter().position(|c| c.code == code) else {
            return Ok(None);
        };
        if t.companies.iter().any(|c| c.code != code && c.name == changes.name) {
            return Err(AppError::Constraint(format!("company name '{}' already exists", changes.name)));
        }
        let company = &mut t.companies[idx];
        company.name = changes.name.clone();
        company.description = Some(changes.description.clone());
        Ok(Some(company.clone()))
    }

    async fn delete_company(&self, code: &str) -> Result<bool, AppError> {
        let mut t = self.write();
        let before = t.companies.len();
        t.companies.retain(|c| c.code != code);
        if t.companies.len() == before {
            return Ok(false);
        }
        t.invoices.retain(|i| i.comp_code != code);
        t.links.retain(|(company, _)| company != code);
        Ok(true)
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, AppError> {
        Ok(self
            .read()
            .invoices
            .iter()
            .map(|i| InvoiceSummary {
                id: i.id,
                comp_code: i.comp_code.clone(),
            })
            .collect())
    }

    async fn find_invoice(&self, id: i32) -> Result<Option<InvoiceDetail>, AppError> {
        let t = self.read();
        let Some(inv) = t.invoices.iter().find(|i| i.id == id) else {
            return Ok(None);
        };
        let company = t
            .companies
            .iter()
            .find(|c| c.code == inv.comp_code)
            .cloned()
            .ok_or_else(|| AppError::Constraint(format!("invoice {} has no company", id)))?;
        Ok(Some(InvoiceDetail {
            id: inv.id,
            amt: inv.amt,
            paid: inv.paid,
            add_date: inv.add_date,
            paid_date: inv.paid_date,
            company,
        }))
    }

    async fn insert_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError> {
        self.insert_invoice_sync(new)
    }

    async fn update_invoice(&self, id: i32, changes: &InvoiceChanges) -> Result<Option<Invoice>, AppError> {
        let today = self.today();
        let mut t = self.write();
        let Some(inv) = t.invoices.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if !(changes.amt > 0.0) {
            return Err(AppError::Constraint(format!("amt must be positive, got {}", changes.amt)));
        }
        inv.paid_date = next_paid_date(inv.paid, inv.paid_date, changes.paid, today);
        inv.paid = changes.paid;
        inv.amt = changes.amt;
        Ok(Some(inv.clone()))
    }

    async fn delete_invoice(&self, id: i32) -> Result<bool, AppError> {
        let mut t = self.write();
        let before = t.invoices.len();
        t.invoices.retain(|i| i.id != id);
        Ok(t.invoices.len() != before)
    }

    async fn list_industries(&self) -> Result<Vec<Industry>, AppError> {
        let mut out = self.read().industries.clone();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(out)
    }

    async fn find_industry(&self, code: &str) -> Result<Option<Industry>, AppError> {
        Ok(self.read().industries.iter().find(|i| i.code == code).cloned())
    }

    async fn industry_companies(&self, code: &str) -> Result<Vec<Company>, AppError> {
        let t = self.read();
        let mut out: Vec<Company> = t
            .links
            .iter()
            .filter(|(_, industry)| industry == code)
            .filter_map(|(company, _)| t.companies.iter().find(|c| &c.code == company).cloned())
            .collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(out)
    }

    async fn insert_industry(&self, new: &NewIndustry) -> Result<Industry, AppError> {
        self.insert_industry_sync(new)
    }

    async fn delete_industry(&self, code: &str) -> Result<bool, AppError> {
        let mut t = self.write();
        let before = t.industries.len();
        t.industries.retain(|i| i.code != code);
        if t.industries.len() == before {
            return Ok(false);
        }
        t.links.retain(|(_, industry)| industry != code);
        Ok(true)
    }
}
