use crate::error::AppError;
use crate::model::*;
use crate::service::require;
use crate::store::Store;

pub struct InvoiceService;

impl InvoiceService {
    pub async fn list(store: &dyn Store) -> Result<Vec<InvoiceSummary>, AppError> {
        store.list_invoices().await
    }

    pub async fn get(store: &dyn Store, id: i32) -> Result<InvoiceDetail, AppError> {
        store
            .find_invoice(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("invoice {}", id)))
    }

    pub async fn create(store: &dyn Store, payload: InvoicePayload) -> Result<Invoice, AppError> {
        let new = NewInvoice {
            comp_code: require("comp_code", payload.comp_code)?,
            amt: require("amt", payload.amt)?,
        };
        store.insert_invoice(&new).await
    }

    /// Set amt and paid; paid_date follows the paid-state transition.
    /// An unknown id is NotFound even when the body is incomplete.
    pub async fn update(store: &dyn Store, id: i32, payload: InvoicePayload) -> Result<Invoice, AppError> {
        let changes = match (payload.amt, payload.paid) {
            (Some(amt), Some(paid)) => InvoiceChanges { amt, paid },
            (amt, paid) => {
                Self::get(store, id).await?;
                InvoiceChanges {
                    amt: require("amt", amt)?,
                    paid: require("paid", paid)?,
                }
            }
        };
        store
            .update_invoice(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("invoice {}", id)))
    }

    pub async fn delete(store: &dyn Store, id: i32) -> Result<(), AppError> {
        if store.delete_invoice(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("invoice {}", id)))
        }
    }
}
