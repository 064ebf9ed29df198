use crate::error::AppError;
use crate::model::*;
use crate::service::require;
use crate::slug::required_slug;
use crate::store::Store;

pub struct CompanyService;

impl CompanyService {
    pub async fn list(store: &dyn Store) -> Result<Vec<Company>, AppError> {
        store.list_companies().await
    }

    /// Company with its invoices and linked industries.
    pub async fn get(store: &dyn Store, code: &str) -> Result<CompanyDetail, AppError> {
        let company = store
            .find_company(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("company '{}'", code)))?;
        let invoices = store.company_invoices(code).await?;
        let industries = store.company_industries(code).await?;
        Ok(CompanyDetail {
            company,
            invoices,
            industries,
        })
    }

    /// Insert a company; the code is slugified first.
    pub async fn create(store: &dyn Store, payload: CompanyPayload) -> Result<Company, AppError> {
        let new = NewCompany {
            code: required_slug("code", payload.code.as_deref())?,
            name: require("name", payload.name)?,
            description: require("description", payload.description)?,
        };
        store.insert_company(&new).await
    }

    /// An unknown code is NotFound even when the body is incomplete.
    pub async fn update(store: &dyn Store, code: &str, payload: CompanyPayload) -> Result<Company, AppError> {
        let changes = match (payload.name, payload.description) {
            (Some(name), Some(description)) => CompanyChanges { name, description },
            (name, description) => {
                if store.find_company(code).await?.is_none() {
                    return Err(AppError::NotFound(format!("company '{}'", code)));
                }
                CompanyChanges {
                    name: require("name", name)?,
                    description: require("description", description)?,
                }
            }
        };
        store
            .update_company(code, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("company '{}'", code)))
    }

    pub async fn delete(store: &dyn Store, code: &str) -> Result<(), AppError> {
        if store.delete_company(code).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("company '{}'", code)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn detail_includes_only_own_invoices_and_industries() {
        let store = MemoryStore::seeded().unwrap();
        let detail = CompanyService::get(&store, "ibm").await.unwrap();
        assert_eq!(detail.company.name, "IBM");
        assert_eq!(detail.invoices.len(), 1);
        assert_eq!(detail.invoices[0].amt, 400.0);
        assert_eq!(detail.industries, vec![Industry { code: "aero".into(), industry: "Aerospace".into() }]);
    }

    #[tokio::test]
    async fn create_slugifies_code() {
        let store = MemoryStore::new();
        let company = CompanyService::create(
            &store,
            CompanyPayload {
                code: Some("  TEST name  ".into()),
                name: Some("Test".into()),
                description: Some("desc".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(company.code, "test-name");
    }

    #[tokio::test]
    async fn create_without_code_is_malformed() {
        let store = MemoryStore::new();
        let err = CompanyService::create(
            &store,
            CompanyPayload {
                code: None,
                name: Some("Test".into()),
                description: Some("desc".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Malformed(_)));
    }

    #[tokio::test]
    async fn update_and_delete_unknown_code_are_not_found() {
        let store = MemoryStore::seeded().unwrap();
        let payload = CompanyPayload {
            code: None,
            name: Some("x".into()),
            description: Some("y".into()),
        };
        assert!(matches!(
            CompanyService::update(&store, "nope", payload).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(CompanyService::delete(&store, "nope").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn incomplete_update_checks_code_first() {
        let store = MemoryStore::seeded().unwrap();
        let partial = || CompanyPayload {
            code: None,
            name: Some("x".into()),
            description: None,
        };
        assert!(matches!(
            CompanyService::update(&store, "nope", partial()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            CompanyService::update(&store, "apple", partial()).await,
            Err(AppError::Malformed(_))
        ));
    }
}
