// src/db/journal_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_reference_error, AppError},
    models::journal::{EntryType, JournalEntry, JournalStatus},
};

// Everything needed to insert one DRAFT entry
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub reference: Option<String>,
    pub analytical_account_id: Uuid,
    pub contact_id: Option<Uuid>,
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub date: NaiveDate,
}

#[derive(Clone, Default)]
pub struct JournalRepository;

impl JournalRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        status: Option<JournalStatus>,
    ) -> Result<Vec<JournalEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT id, reference, analytical_account_id, contact_id, amount,
                   entry_type, status, date, created_at
            FROM journal_entries
            WHERE ($1::journal_status IS NULL OR status = $1)
            ORDER BY date DESC, created_at DESC, id ASC
            "#,
        )
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<JournalEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT id, reference, analytical_account_id, contact_id, amount,
                   entry_type, status, date, created_at
            FROM journal_entries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(entry)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        new_entry: &NewJournalEntry,
    ) -> Result<JournalEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // status always starts at the column default (DRAFT)
        sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (
                reference, analytical_account_id, contact_id, amount, entry_type, date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, reference, analytical_account_id, contact_id, amount,
                      entry_type, status, date, created_at
            "#,
        )
        .bind(new_entry.reference.as_deref())
        .bind(new_entry.analytical_account_id)
        .bind(new_entry.contact_id)
        .bind(new_entry.amount)
        .bind(new_entry.entry_type)
        .bind(new_entry.date)
        .fetch_one(executor)
        .await
        .map_err(map_reference_error)
    }

    /// Compare-and-set on the status column. None means the row was not in
    /// `from` any more (or does not exist).
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        from: JournalStatus,
        to: JournalStatus,
    ) -> Result<Option<JournalEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            UPDATE journal_entries
            SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING id, reference, analytical_account_id, contact_id, amount,
                      entry_type, status, date, created_at
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(executor)
        .await?;

        Ok(entry)
    }
}
