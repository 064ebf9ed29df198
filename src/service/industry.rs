use crate::error::AppError;
use crate::model::*;
use crate::service::require;
use crate::slug::required_slug;
use crate::store::Store;

pub struct IndustryService;

impl IndustryService {
    pub async fn list(store: &dyn Store) -> Result<Vec<Industry>, AppError> {
        store.list_industries().await
    }

    /// Industry with its linked companies. An industry with no companies is still found.
    pub async fn get(store: &dyn Store, code: &str) -> Result<IndustryDetail, AppError> {
        let industry = store
            .find_industry(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("industry '{}'", code)))?;
        let companies = store.industry_companies(code).await?;
        Ok(IndustryDetail { industry, companies })
    }

    pub async fn create(store: &dyn Store, payload: IndustryPayload) -> Result<Industry, AppError> {
        let new = NewIndustry {
            code: required_slug("code", payload.code.as_deref())?,
            industry: require("industry", payload.industry)?,
        };
        store.insert_industry(&new).await
    }

    pub async fn delete(store: &dyn Store, code: &str) -> Result<(), AppError> {
        if store.delete_industry(code).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("industry '{}'", code)))
        }
    }
}
