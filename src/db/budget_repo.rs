// src/db/budget_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_reference_error, AppError},
    models::budget::{AccountStatusTotal, Budget},
};

#[derive(Clone, Default)]
pub struct BudgetRepository;

impl BudgetRepository {
    pub fn new() -> Self {
        Self
    }

    // Creation order; the report keeps this order
    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Budget>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, name, analytical_account_id, amount, start_date, end_date, created_at
            FROM budgets
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(budgets)
    }

    /// Locks the row until the surrounding transaction ends.
    pub async fn get_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Budget>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, name, analytical_account_id, amount, start_date, end_date, created_at
            FROM budgets
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(budget)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        analytical_account_id: Uuid,
        amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Budget, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (name, analytical_account_id, amount, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, analytical_account_id, amount, start_date, end_date, created_at
            "#,
        )
        .bind(name)
        .bind(analytical_account_id)
        .bind(amount)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await
        .map_err(map_reference_error)
    }

    // Writes the already-merged record back
    pub async fn update<'e, E>(&self, executor: E, budget: &Budget) -> Result<Budget, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets
            SET name = $2,
                analytical_account_id = $3,
                amount = $4,
                start_date = $5,
                end_date = $6
            WHERE id = $1
            RETURNING id, name, analytical_account_id, amount, start_date, end_date, created_at
            "#,
        )
        .bind(budget.id)
        .bind(&budget.name)
        .bind(budget.analytical_account_id)
        .bind(budget.amount)
        .bind(budget.start_date)
        .bind(budget.end_date)
        .fetch_one(executor)
        .await
        .map_err(map_reference_error)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Sum of journal amounts per (account, status). Status filtering is left
    /// to the caller.
    pub async fn totals_by_account_status<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<AccountStatusTotal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let totals = sqlx::query_as::<_, AccountStatusTotal>(
            r#"
            SELECT analytical_account_id, status, COALESCE(SUM(amount), 0) AS total
            FROM journal_entries
            GROUP BY analytical_account_id, status
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(totals)
    }
}
