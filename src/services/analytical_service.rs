// src/services/analytical_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::{normalize_clearable, normalize_optional}},
    db::AnalyticalRepository,
    models::analytical::AnalyticalAccount,
};

#[derive(Clone)]
pub struct AnalyticalService {
    repo: AnalyticalRepository,
    pool: PgPool,
}

impl AnalyticalService {
    pub fn new(repo: AnalyticalRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<AnalyticalAccount>, AppError> {
        self.repo.list(&self.pool).await
    }

    pub async fn create(
        &self,
        name: &str,
        code: Option<&str>,
        active: Option<bool>,
    ) -> Result<AnalyticalAccount, AppError> {
        let code = normalize_optional(code);
        let account = self
            .repo
            .create(&self.pool, name.trim(), code.as_deref(), active.unwrap_or(true))
            .await?;

        tracing::info!("Analytical account {} created ({})", account.id, account.name);
        Ok(account)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        code: Option<Option<&str>>,
        active: Option<bool>,
    ) -> Result<AnalyticalAccount, AppError> {
        let name = name.map(str::trim);
        let code = normalize_clearable(code);

        self.repo
            .update(&self.pool, id, name, code.as_ref().map(|c| c.as_deref()), active)
            .await?
            .ok_or_else(|| AppError::not_found("Analytical account", id))
    }

    /// Refuses to delete an account that budgets, journal entries or rules
    /// still point at.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Count what still references the account
        let references = self.repo.count_references(&mut *tx, id).await?;
        if !references.is_empty() {
            return Err(AppError::AccountInUse { id, references });
        }

        // 2. Delete; a row inserted concurrently still trips the FK
        let deleted = match self.repo.delete(&mut *tx, id).await {
            Ok(n) => n,
            Err(e) if is_fk_violation(&e) => {
                let references = self.repo.count_references(&self.pool, id).await?;
                return Err(AppError::AccountInUse { id, references });
            }
            Err(e) => return Err(e.into()),
        };

        if deleted == 0 {
            return Err(AppError::not_found("Analytical account", id));
        }

        tx.commit().await?;
        tracing::info!("Analytical account {} deleted", id);
        Ok(())
    }
}

fn is_fk_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::config::AppState;

    fn state(pool: PgPool) -> AppState {
        AppState::from_pool(pool, "analytical-test-secret".into())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn code_can_be_cleared(pool: PgPool) {
        let service = state(pool).analytical_service;
        let account = service.create("Showroom", Some("CC-101"), None).await.unwrap();

        let renamed = service
            .update(account.id, Some("Showroom 2"), None, None)
            .await
            .unwrap();
        assert_eq!(renamed.code.as_deref(), Some("CC-101"));

        let cleared = service.update(account.id, None, Some(None), None).await.unwrap();
        assert_eq!(cleared.code, None);
        assert_eq!(cleared.name, "Showroom 2");

        let recoded = service
            .update(account.id, None, Some(Some(" CC-7 ")), None)
            .await
            .unwrap();
        assert_eq!(recoded.code.as_deref(), Some("CC-7"));

        let blanked = service.update(account.id, None, Some(Some("  ")), None).await.unwrap();
        assert_eq!(blanked.code, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn referenced_account_cannot_be_deleted(pool: PgPool) {
        let state = state(pool);
        let account = state
            .analytical_service
            .create("Workshop", None, None)
            .await
            .unwrap();
        state
            .budget_service
            .create(
                "Q1",
                account.id,
                Decimal::from(1000),
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            )
            .await
            .unwrap();

        let err = state.analytical_service.delete(account.id).await.unwrap_err();
        match err {
            AppError::AccountInUse { id, references } => {
                assert_eq!(id, account.id);
                assert_eq!(references.budgets, 1);
                assert_eq!(references.journal_entries, 0);
            }
            other => panic!("expected AccountInUse, got {:?}", other),
        }

        // Still there
        let accounts = state.analytical_service.list().await.unwrap();
        assert!(accounts.iter().any(|a| a.id == account.id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn unreferenced_account_is_deleted_once(pool: PgPool) {
        let service = state(pool).analytical_service;
        let account = service.create("Temporary", None, Some(false)).await.unwrap();

        service.delete(account.id).await.unwrap();
        assert!(matches!(
            service.delete(account.id).await,
            Err(AppError::ResourceNotFound(_))
        ));
    }
}
