// src/services/journal_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::normalize_optional},
    db::{journal_repo::NewJournalEntry, JournalRepository},
    models::{
        analytical::{ClassificationInput, ClassificationOutcome},
        journal::{EntryType, JournalEntry, JournalStatus},
    },
    services::ClassificationService,
};

/// Where a new entry's analytical account comes from.
#[derive(Debug, Clone)]
pub enum AccountSelection {
    Explicit(Uuid),
    Classify(ClassificationInput),
}

#[derive(Debug, Clone)]
pub struct JournalEntryInput {
    pub reference: Option<String>,
    pub account: AccountSelection,
    pub contact_id: Option<Uuid>,
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub date: NaiveDate,
}

pub fn account_from_outcome(outcome: &ClassificationOutcome) -> Result<Uuid, AppError> {
    outcome.analytical_account_id.ok_or_else(|| {
        AppError::invalid(
            "analyticalAccountId",
            "No analytical account was given and no auto-analytical rule matched.",
        )
    })
}

pub fn check_transition(from: JournalStatus, to: JournalStatus) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition { from, to })
    }
}

#[derive(Clone)]
pub struct JournalService {
    repo: JournalRepository,
    classifier: ClassificationService,
    pool: PgPool,
}

impl JournalService {
    pub fn new(repo: JournalRepository, classifier: ClassificationService, pool: PgPool) -> Self {
        Self { repo, classifier, pool }
    }

    pub async fn list(&self, status: Option<JournalStatus>) -> Result<Vec<JournalEntry>, AppError> {
        self.repo.list(&self.pool, status).await
    }

    /// Records a DRAFT entry. The account is taken as given or resolved
    /// through the classification rules.
    pub async fn create(&self, input: JournalEntryInput) -> Result<JournalEntry, AppError> {
        // 1. Resolve the account
        let analytical_account_id = match &input.account {
            AccountSelection::Explicit(id) => *id,
            AccountSelection::Classify(criteria) => {
                let outcome = self.classifier.classify(criteria).await?;
                account_from_outcome(&outcome)?
            }
        };

        // 2. Insert
        let new_entry = NewJournalEntry {
            reference: normalize_optional(input.reference.as_deref()),
            analytical_account_id,
            contact_id: input.contact_id,
            amount: input.amount,
            entry_type: input.entry_type,
            date: input.date,
        };
        let entry = self.repo.create(&self.pool, &new_entry).await?;

        tracing::info!(
            "Journal entry {} recorded as DRAFT ({:?} {} on account {})",
            entry.id,
            entry.entry_type,
            entry.amount,
            entry.analytical_account_id
        );
        Ok(entry)
    }

    pub async fn transition(&self, id: Uuid, to: JournalStatus) -> Result<JournalEntry, AppError> {
        // 1. Current state
        let current = self
            .repo
            .get(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Journal entry", id))?;

        check_transition(current.status, to)?;

        // 2. Guarded write; losing a race reports the status that won
        match self.repo.update_status(&self.pool, id, current.status, to).await? {
            Some(entry) => {
                tracing::info!("Journal entry {} moved {:?} -> {:?}", id, current.status, to);
                Ok(entry)
            }
            None => {
                let latest = self
                    .repo
                    .get(&self.pool, id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Journal entry", id))?;
                tracing::warn!("Journal entry {} changed concurrently to {:?}", id, latest.status);
                Err(AppError::InvalidTransition { from: latest.status, to })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_classification_is_a_field_error() {
        let outcome = ClassificationOutcome {
            analytical_account_id: None,
            matched_rule_id: None,
            examined: vec![],
        };
        let err = account_from_outcome(&outcome).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { ref field, .. } if field == "analyticalAccountId"));
    }

    #[test]
    fn matched_classification_yields_account() {
        let account = Uuid::new_v4();
        let outcome = ClassificationOutcome {
            analytical_account_id: Some(account),
            matched_rule_id: Some(Uuid::new_v4()),
            examined: vec![],
        };
        assert_eq!(account_from_outcome(&outcome).unwrap(), account);
    }

    #[test]
    fn posted_cannot_return_to_draft() {
        let err = check_transition(JournalStatus::Posted, JournalStatus::Draft).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: JournalStatus::Posted,
                to: JournalStatus::Draft
            }
        ));
    }

    #[test]
    fn legal_moves_pass() {
        assert!(check_transition(JournalStatus::Draft, JournalStatus::Posted).is_ok());
        assert!(check_transition(JournalStatus::Posted, JournalStatus::Cancelled).is_ok());
    }

    // --- Against the database ---

    use crate::config::AppState;

    async fn draft_entry(state: &AppState, amount: i64) -> JournalEntry {
        let account = state
            .analytical_service
            .create("Workshop", None, None)
            .await
            .unwrap();
        state
            .journal_service
            .create(JournalEntryInput {
                reference: Some(" INV-001 ".into()),
                account: AccountSelection::Explicit(account.id),
                contact_id: None,
                amount: Decimal::from(amount),
                entry_type: EntryType::Expense,
                date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(),
            })
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn entry_moves_draft_posted_cancelled(pool: PgPool) {
        let state = AppState::from_pool(pool, "journal-test-secret".into());
        let entry = draft_entry(&state, 400).await;
        assert_eq!(entry.status, JournalStatus::Draft);
        assert_eq!(entry.reference.as_deref(), Some("INV-001"));

        let posted = state
            .journal_service
            .transition(entry.id, JournalStatus::Posted)
            .await
            .unwrap();
        assert_eq!(posted.status, JournalStatus::Posted);

        let cancelled = state
            .journal_service
            .transition(entry.id, JournalStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, JournalStatus::Cancelled);

        let posted_only = state
            .journal_service
            .list(Some(JournalStatus::Posted))
            .await
            .unwrap();
        assert!(posted_only.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cancelled_entry_cannot_be_posted(pool: PgPool) {
        let state = AppState::from_pool(pool, "journal-test-secret".into());
        let entry = draft_entry(&state, 100).await;
        state
            .journal_service
            .transition(entry.id, JournalStatus::Cancelled)
            .await
            .unwrap();

        let err = state
            .journal_service
            .transition(entry.id, JournalStatus::Posted)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: JournalStatus::Cancelled,
                to: JournalStatus::Posted
            }
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn stale_status_update_is_refused(pool: PgPool) {
        let state = AppState::from_pool(pool.clone(), "journal-test-secret".into());
        let entry = draft_entry(&state, 100).await;
        let repo = JournalRepository::new();

        // Another request already posted the entry
        let winner = repo
            .update_status(&pool, entry.id, JournalStatus::Draft, JournalStatus::Posted)
            .await
            .unwrap();
        assert!(winner.is_some());

        // A writer that still believes the entry is a draft loses
        let loser = repo
            .update_status(&pool, entry.id, JournalStatus::Draft, JournalStatus::Cancelled)
            .await
            .unwrap();
        assert!(loser.is_none());

        let stored = repo.get(&pool, entry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JournalStatus::Posted);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn unknown_entry_is_not_found(pool: PgPool) {
        let state = AppState::from_pool(pool, "journal-test-secret".into());
        let err = state
            .journal_service
            .transition(Uuid::new_v4(), JournalStatus::Posted)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }
}
