// src/db/analytical_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::analytical::{AccountReferences, AnalyticalAccount},
};

#[derive(Clone, Default)]
pub struct AnalyticalRepository;

impl AnalyticalRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<AnalyticalAccount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let accounts = sqlx::query_as::<_, AnalyticalAccount>(
            r#"
            SELECT id, name, code, active, created_at
            FROM analytical_accounts
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(accounts)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        code: Option<&str>,
        active: bool,
    ) -> Result<AnalyticalAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, AnalyticalAccount>(
            r#"
            INSERT INTO analytical_accounts (name, code, active)
            VALUES ($1, $2, $3)
            RETURNING id, name, code, active, created_at
            "#,
        )
        .bind(name)
        .bind(code)
        .bind(active)
        .fetch_one(executor)
        .await?;

        Ok(account)
    }

    // None keeps the stored value; `code: Some(None)` clears it
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        code: Option<Option<&str>>,
        active: Option<bool>,
    ) -> Result<Option<AnalyticalAccount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, AnalyticalAccount>(
            r#"
            UPDATE analytical_accounts
            SET name   = COALESCE($2, name),
                code   = CASE WHEN $5 THEN $3 ELSE code END,
                active = COALESCE($4, active)
            WHERE id = $1
            RETURNING id, name, code, active, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(code.flatten())
        .bind(active)
        .bind(code.is_some())
        .fetch_optional(executor)
        .await?;

        Ok(account)
    }

    pub async fn count_references<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<AccountReferences, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let references = sqlx::query_as::<_, AccountReferences>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM budgets                WHERE analytical_account_id = $1) AS budgets,
                (SELECT COUNT(*) FROM journal_entries        WHERE analytical_account_id = $1) AS journal_entries,
                (SELECT COUNT(*) FROM auto_analytical_models WHERE analytical_account_id = $1) AS rules
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(references)
    }

    /// Returns the number of deleted rows (0 when the id is unknown).
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM analytical_accounts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
