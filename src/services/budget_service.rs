// src/services/budget_service.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::BudgetRepository,
    models::{
        budget::{AccountStatusTotal, Budget, BudgetReportRow},
        journal::JournalStatus,
    },
};

// =============================================================================
//  REPORT MATH (pure)
// =============================================================================

/// actual / amount * 100, two decimals, half away from zero.
/// "0.00" when the budget is zero or the division overflows.
pub fn achievement(actual: Decimal, amount: Decimal) -> String {
    if amount.is_zero() {
        return "0.00".to_string();
    }

    let ratio = actual
        .checked_div(amount)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED));

    match ratio {
        Some(pct) => {
            let rounded = pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.2}", rounded)
        }
        None => "0.00".to_string(),
    }
}

/// Posted totals per analytical account. Drafts and cancelled entries never
/// count as actuals.
pub fn actuals_by_account(totals: &[AccountStatusTotal]) -> HashMap<Uuid, Decimal> {
    let mut actuals: HashMap<Uuid, Decimal> = HashMap::new();
    for row in totals.iter().filter(|t| t.status == JournalStatus::Posted) {
        *actuals.entry(row.analytical_account_id).or_default() += row.total;
    }
    actuals
}

pub fn build_report(budgets: &[Budget], actuals: &HashMap<Uuid, Decimal>) -> Vec<BudgetReportRow> {
    budgets
        .iter()
        .map(|budget| {
            let actual = actuals
                .get(&budget.analytical_account_id)
                .copied()
                .unwrap_or(Decimal::ZERO);

            BudgetReportRow {
                budget_id: budget.id,
                name: budget.name.clone(),
                budget_amount: budget.amount,
                actual,
                variance: budget.amount - actual,
                achievement: achievement(actual, budget.amount),
            }
        })
        .collect()
}

pub fn check_window(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), AppError> {
    if end_date < start_date {
        return Err(AppError::invalid(
            "endDate",
            "The end date cannot be before the start date.",
        ));
    }
    Ok(())
}

// Partial update; None keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct BudgetChanges {
    pub name: Option<String>,
    pub analytical_account_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl BudgetChanges {
    pub fn apply(self, mut budget: Budget) -> Budget {
        if let Some(name) = self.name {
            budget.name = name.trim().to_string();
        }
        if let Some(account_id) = self.analytical_account_id {
            budget.analytical_account_id = account_id;
        }
        if let Some(amount) = self.amount {
            budget.amount = amount;
        }
        if let Some(start) = self.start_date {
            budget.start_date = start;
        }
        if let Some(end) = self.end_date {
            budget.end_date = end;
        }
        budget
    }
}

// =============================================================================
//  SERVICE
// =============================================================================

#[derive(Clone)]
pub struct BudgetService {
    repo: BudgetRepository,
    pool: PgPool,
}

impl BudgetService {
    pub fn new(repo: BudgetRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<Budget>, AppError> {
        self.repo.list(&self.pool).await
    }

    pub async fn create(
        &self,
        name: &str,
        analytical_account_id: Uuid,
        amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Budget, AppError> {
        check_window(start_date, end_date)?;

        let budget = self
            .repo
            .create(&self.pool, name.trim(), analytical_account_id, amount, start_date, end_date)
            .await?;

        tracing::info!("Budget {} created for account {}", budget.id, analytical_account_id);
        Ok(budget)
    }

    pub async fn update(&self, id: Uuid, changes: BudgetChanges) -> Result<Budget, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Lock the current row
        let current = self
            .repo
            .get_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Budget", id))?;

        // 2. Merge, then re-check the window on the merged record
        let merged = changes.apply(current);
        check_window(merged.start_date, merged.end_date)?;

        // 3. Persist
        let updated = self.repo.update(&mut *tx, &merged).await?;
        tx.commit().await?;

        tracing::info!("Budget {} updated", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.repo.delete(&self.pool, id).await?;
        if deleted == 0 {
            return Err(AppError::not_found("Budget", id));
        }
        tracing::info!("Budget {} deleted", id);
        Ok(())
    }

    /// Budget vs actual for every budget, in creation order.
    pub async fn report(&self) -> Result<Vec<BudgetReportRow>, AppError> {
        let mut tx = self.pool.begin().await?;

        let budgets = self.repo.list(&mut *tx).await?;
        let totals = self.repo.totals_by_account_status(&mut *tx).await?;

        tx.commit().await?;

        let actuals = actuals_by_account(&totals);
        Ok(build_report(&budgets, &actuals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn budget(account: Uuid, amount: &str) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            name: "Q1 Workshop".into(),
            analytical_account_id: account,
            amount: dec(amount),
            start_date: date(2026, 1, 1),
            end_date: date(2026, 3, 31),
            created_at: Utc::now(),
        }
    }

    fn total(account: Uuid, status: JournalStatus, amount: &str) -> AccountStatusTotal {
        AccountStatusTotal {
            analytical_account_id: account,
            status,
            total: dec(amount),
        }
    }

    #[test]
    fn drafts_do_not_count_as_actuals() {
        let account = Uuid::new_v4();
        let budgets = vec![budget(account, "1000")];
        let totals = vec![
            total(account, JournalStatus::Posted, "400"),
            total(account, JournalStatus::Posted, "100"),
            total(account, JournalStatus::Draft, "9999"),
            total(account, JournalStatus::Cancelled, "50"),
        ];

        let report = build_report(&budgets, &actuals_by_account(&totals));
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].actual, dec("500"));
        assert_eq!(report[0].variance, dec("500"));
        assert_eq!(report[0].achievement, "50.00");
    }

    #[test]
    fn budget_without_entries_has_zero_actual() {
        let budgets = vec![budget(Uuid::new_v4(), "250")];
        let report = build_report(&budgets, &HashMap::new());
        assert_eq!(report[0].actual, Decimal::ZERO);
        assert_eq!(report[0].variance, dec("250"));
        assert_eq!(report[0].achievement, "0.00");
    }

    #[test]
    fn zero_budget_reports_zero_achievement() {
        assert_eq!(achievement(dec("300"), Decimal::ZERO), "0.00");
    }

    #[test]
    fn achievement_rounds_half_away_from_zero() {
        // 1/8 = 12.5%, 1/3 = 33.333..%
        assert_eq!(achievement(dec("1"), dec("8")), "12.50");
        assert_eq!(achievement(dec("1"), dec("3")), "33.33");
        assert_eq!(achievement(dec("2"), dec("3")), "66.67");
        // 0.00125 * 100 = 0.125 -> 0.13
        assert_eq!(achievement(dec("0.00125"), dec("1")), "0.13");
    }

    #[test]
    fn overspending_goes_past_one_hundred() {
        assert_eq!(achievement(dec("1500"), dec("1000")), "150.00");
    }

    #[test]
    fn overflowing_ratio_reports_zero() {
        assert_eq!(achievement(Decimal::MAX, dec("0.0000001")), "0.00");
    }

    #[test]
    fn variance_plus_actual_equals_amount() {
        let account = Uuid::new_v4();
        let budgets = vec![budget(account, "1234.56"), budget(Uuid::new_v4(), "10")];
        let totals = vec![total(account, JournalStatus::Posted, "2000.01")];

        for row in build_report(&budgets, &actuals_by_account(&totals)) {
            assert_eq!(row.variance + row.actual, row.budget_amount);
        }
    }

    #[test]
    fn actuals_are_scoped_by_account_not_by_window() {
        // Two budgets on the same account share the same actual
        let account = Uuid::new_v4();
        let mut later = budget(account, "800");
        later.start_date = date(2026, 7, 1);
        later.end_date = date(2026, 9, 30);
        let budgets = vec![budget(account, "1000"), later];
        let totals = vec![total(account, JournalStatus::Posted, "200")];

        let report = build_report(&budgets, &actuals_by_account(&totals));
        assert_eq!(report[0].actual, report[1].actual);
        assert_eq!(report[1].achievement, "25.00");
    }

    #[test]
    fn report_is_idempotent_and_keeps_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let budgets = vec![budget(a, "100"), budget(b, "200")];
        let actuals = actuals_by_account(&[
            total(a, JournalStatus::Posted, "10"),
            total(b, JournalStatus::Posted, "20"),
        ]);

        let first = build_report(&budgets, &actuals);
        let second = build_report(&budgets, &actuals);
        assert_eq!(first, second);
        assert_eq!(first[0].budget_id, budgets[0].id);
        assert_eq!(first[1].budget_id, budgets[1].id);
    }

    #[test]
    fn window_must_not_end_before_it_starts() {
        assert!(check_window(date(2026, 1, 1), date(2026, 1, 1)).is_ok());
        assert!(matches!(
            check_window(date(2026, 2, 1), date(2026, 1, 31)),
            Err(AppError::InvalidInput { ref field, .. }) if field == "endDate"
        ));
    }

    #[test]
    fn changes_merge_over_stored_budget() {
        let stored = budget(Uuid::new_v4(), "1000");
        let changes = BudgetChanges {
            name: Some("  Renamed ".into()),
            amount: Some(dec("1500")),
            ..Default::default()
        };

        let merged = changes.apply(stored.clone());
        assert_eq!(merged.name, "Renamed");
        assert_eq!(merged.amount, dec("1500"));
        assert_eq!(merged.start_date, stored.start_date);
        assert_eq!(merged.analytical_account_id, stored.analytical_account_id);
    }

    // --- Against the database ---

    use crate::{
        config::AppState,
        models::journal::EntryType,
        services::journal_service::{AccountSelection, JournalEntryInput},
    };

    async fn record(state: &AppState, account: Uuid, amount: &str, post: bool) {
        let entry = state
            .journal_service
            .create(JournalEntryInput {
                reference: None,
                account: AccountSelection::Explicit(account),
                contact_id: None,
                amount: dec(amount),
                entry_type: EntryType::Expense,
                date: date(2026, 2, 14),
            })
            .await
            .unwrap();
        if post {
            state
                .journal_service
                .transition(entry.id, JournalStatus::Posted)
                .await
                .unwrap();
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn report_counts_only_posted_entries(pool: PgPool) {
        let state = AppState::from_pool(pool, "budget-test-secret".into());
        let workshop = state
            .analytical_service
            .create("Workshop", Some("CC-1"), None)
            .await
            .unwrap();
        let showroom = state
            .analytical_service
            .create("Showroom", None, None)
            .await
            .unwrap();

        let q1 = state
            .budget_service
            .create("Q1 Workshop", workshop.id, dec("1000"), date(2026, 1, 1), date(2026, 3, 31))
            .await
            .unwrap();
        let idle = state
            .budget_service
            .create("Showroom", showroom.id, dec("0"), date(2026, 1, 1), date(2026, 12, 31))
            .await
            .unwrap();

        record(&state, workshop.id, "400", true).await;
        record(&state, workshop.id, "100", true).await;
        record(&state, workshop.id, "9999", false).await;

        let report = state.budget_service.report().await.unwrap();
        assert_eq!(report.len(), 2);

        let row = report.iter().find(|r| r.budget_id == q1.id).unwrap();
        assert_eq!(row.actual, dec("500"));
        assert_eq!(row.variance, dec("500"));
        assert_eq!(row.achievement, "50.00");

        let row = report.iter().find(|r| r.budget_id == idle.id).unwrap();
        assert_eq!(row.actual, Decimal::ZERO);
        assert_eq!(row.achievement, "0.00");

        // Reading twice changes nothing
        assert_eq!(state.budget_service.report().await.unwrap(), report);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn merged_update_rechecks_window(pool: PgPool) {
        let state = AppState::from_pool(pool, "budget-test-secret".into());
        let account = state
            .analytical_service
            .create("Workshop", None, None)
            .await
            .unwrap();
        let budget = state
            .budget_service
            .create("Q1", account.id, dec("1000"), date(2026, 1, 1), date(2026, 3, 31))
            .await
            .unwrap();

        let changes = BudgetChanges {
            start_date: Some(date(2026, 6, 1)),
            ..Default::default()
        };
        let err = state.budget_service.update(budget.id, changes).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { ref field, .. } if field == "endDate"));

        let stored = state.budget_service.list().await.unwrap();
        assert_eq!(stored[0].start_date, date(2026, 1, 1));
    }
}
