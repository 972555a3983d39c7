// src/db/auto_analytical_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_reference_error, AppError},
    models::analytical::{AccountRef, AutoAnalyticalModel, ProductRef, RuleView},
};

// Flat row of the rule listing (LEFT JOIN accounts + products)
#[derive(Debug, FromRow)]
struct RuleViewRow {
    id: Uuid,
    name: String,
    analytical_account_id: Uuid,
    match_product_id: Option<Uuid>,
    match_category: Option<String>,
    priority: i32,
    created_at: DateTime<Utc>,
    account_name: Option<String>,
    product_name: Option<String>,
}

impl From<RuleViewRow> for RuleView {
    fn from(row: RuleViewRow) -> Self {
        let account = row.account_name.map(|name| AccountRef {
            id: row.analytical_account_id,
            name,
        });
        let product = row
            .match_product_id
            .zip(row.product_name)
            .map(|(id, name)| ProductRef { id, name });

        RuleView {
            rule: AutoAnalyticalModel {
                id: row.id,
                name: row.name,
                analytical_account_id: row.analytical_account_id,
                match_product_id: row.match_product_id,
                match_category: row.match_category,
                priority: row.priority,
                created_at: row.created_at,
            },
            account,
            product,
        }
    }
}

#[derive(Clone, Default)]
pub struct AutoAnalyticalRepository;

impl AutoAnalyticalRepository {
    pub fn new() -> Self {
        Self
    }

    /// Every rule, already in evaluation order.
    pub async fn list_rules<'e, E>(&self, executor: E) -> Result<Vec<AutoAnalyticalModel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rules = sqlx::query_as::<_, AutoAnalyticalModel>(
            r#"
            SELECT id, name, analytical_account_id, match_product_id,
                   match_category, priority, created_at
            FROM auto_analytical_models
            ORDER BY priority DESC, created_at ASC, id ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(rules)
    }

    pub async fn list_views<'e, E>(&self, executor: E) -> Result<Vec<RuleView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RuleViewRow>(
            r#"
            SELECT
                r.id, r.name, r.analytical_account_id, r.match_product_id,
                r.match_category, r.priority, r.created_at,
                a.name AS account_name,
                p.name AS product_name
            FROM auto_analytical_models r
            LEFT JOIN analytical_accounts a ON a.id = r.analytical_account_id
            LEFT JOIN products p ON p.id = r.match_product_id
            ORDER BY r.priority DESC, r.created_at ASC, r.id ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(RuleView::from).collect())
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        analytical_account_id: Uuid,
        match_product_id: Option<Uuid>,
        match_category: Option<&str>,
        priority: i32,
    ) -> Result<AutoAnalyticalModel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AutoAnalyticalModel>(
            r#"
            INSERT INTO auto_analytical_models (
                name, analytical_account_id, match_product_id, match_category, priority
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, analytical_account_id, match_product_id,
                      match_category, priority, created_at
            "#,
        )
        .bind(name)
        .bind(analytical_account_id)
        .bind(match_product_id)
        .bind(match_category)
        .bind(priority)
        .fetch_one(executor)
        .await
        .map_err(map_reference_error)
    }
}
