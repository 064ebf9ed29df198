//! Row types, request payloads and the nested read models returned by the API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Industry {
    pub code: String,
    pub industry: String,
}

/// Full invoice row, as returned by create and update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// Thin projection used by the invoice listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// Invoice as nested under its company (owner implied, so no comp_code).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyInvoice {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

impl From<&Invoice> for CompanyInvoice {
    fn from(inv: &Invoice) -> Self {
        CompanyInvoice {
            id: inv.id,
            amt: inv.amt,
            paid: inv.paid,
            add_date: inv.add_date,
            paid_date: inv.paid_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub invoices: Vec<CompanyInvoice>,
    pub industries: Vec<Industry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub company: Company,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndustryDetail {
    #[serde(flatten)]
    pub industry: Industry,
    pub companies: Vec<Company>,
}

// Validated inputs handed to the store.

#[derive(Clone, Debug)]
pub struct NewCompany {
    pub code: String,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug)]
pub struct CompanyChanges {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: f64,
}

#[derive(Clone, Debug)]
pub struct InvoiceChanges {
    pub amt: f64,
    pub paid: bool,
}

#[derive(Clone, Debug)]
pub struct NewIndustry {
    pub code: String,
    pub industry: String,
}

// Raw request bodies. Every field is optional so a missing one surfaces as a
// malformed-request error rather than an extractor rejection with its own status.

#[derive(Debug, Default, Deserialize)]
pub struct CompanyPayload {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoicePayload {
    pub comp_code: Option<String>,
    pub amt: Option<f64>,
    pub paid: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndustryPayload {
    pub code: Option<String>,
    pub industry: Option<String>,
}

/// New `paid_date` for an invoice whose `paid` flag goes from `was_paid` to `now_paid`.
///
/// unpaid -> paid stamps `today`, paid -> unpaid clears the date, and an unchanged flag keeps
/// the stored date. A paid invoice that somehow lost its date is stamped with `today` so that
/// `paid_date.is_some() == paid` always holds after an update.
pub fn next_paid_date(
    was_paid: bool,
    paid_date: Option<NaiveDate>,
    now_paid: bool,
    today: NaiveDate,
) -> Option<NaiveDate> {
    match (was_paid, now_paid) {
        (false, true) => Some(today),
        (true, true) => paid_date.or(Some(today)),
        (_, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn paying_stamps_today() {
        let today = date(2024, 3, 9);
        assert_eq!(next_paid_date(false, None, true, today), Some(today));
    }

    #[test]
    fn unpaying_clears_date() {
        assert_eq!(next_paid_date(true, Some(date(2018, 1, 1)), false, date(2024, 3, 9)), None);
    }

    #[test]
    fn unchanged_flag_preserves_date() {
        let paid_on = date(2018, 1, 1);
        assert_eq!(next_paid_date(true, Some(paid_on), true, date(2024, 3, 9)), Some(paid_on));
        assert_eq!(next_paid_date(false, None, false, date(2024, 3, 9)), None);
    }

    #[test]
    fn repairs_paid_invoice_without_date() {
        let today = date(2024, 3, 9);
        assert_eq!(next_paid_date(true, None, true, today), Some(today));
    }

    #[test]
    fn company_detail_flattens_company_fields() {
        let detail = CompanyDetail {
            company: Company {
                code: "ibm".into(),
                name: "IBM".into(),
                description: Some("Big blue.".into()),
            },
            invoices: vec![],
            industries: vec![],
        };
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "code": "ibm",
                "name": "IBM",
                "description": "Big blue.",
                "invoices": [],
                "industries": []
            })
        );
    }

    #[test]
    fn dates_serialize_as_iso_and_null() {
        let inv = Invoice {
            id: 1,
            comp_code: "apple".into(),
            amt: 100.0,
            paid: false,
            add_date: date(2024, 3, 9),
            paid_date: None,
        };
        let v = serde_json::to_value(&inv).unwrap();
        assert_eq!(v["add_date"], "2024-03-09");
        assert!(v["paid_date"].is_null());
    }
}
