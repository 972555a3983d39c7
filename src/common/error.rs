use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{analytical::AccountReferences, journal::JournalStatus};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    // Business-rule validation on a single field
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("Missing or invalid authentication token.")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found.")]
    ResourceNotFound(String),

    #[error("Analytical account {id} is still referenced by {references}.")]
    AccountInUse { id: Uuid, references: AccountReferences },

    #[error("A journal entry cannot move from {from:?} to {to:?}.")]
    InvalidTransition { from: JournalStatus, to: JournalStatus },

    // Storage failures (the data source of every read and write)
    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(what: &str, id: Uuid) -> Self {
        AppError::ResourceNotFound(format!("{} {}", what, id))
    }
}

/// Turns a foreign-key violation on insert/update into a 400 on the offending
/// field. The constraint names come from the schema migration.
pub(crate) fn map_reference_error(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_foreign_key_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("contact_id") => "contactId",
                Some(c) if c.contains("match_product_id") => "matchProductId",
                _ => "analyticalAccountId",
            };
            return AppError::invalid(field, "references a record that does not exist");
        }
    }
    AppError::DatabaseError(err)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return every field-level message
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput { ref field, ref message } => {
                let mut details = serde_json::Map::new();
                details.insert(field.clone(), json!([message]));
                let body = Json(json!({
                    "error": self.to_string(),
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::AccountInUse { .. } | AppError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, self.to_string())
            }

            // Everything else becomes a 500; the detail goes to the log only
            ref e => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn maps_each_variant_to_its_status() {
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::Forbidden("Admin access required.".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::not_found("Budget", Uuid::nil())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::invalid("taxRate", "must be a number")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::InvalidTransition {
                from: JournalStatus::Cancelled,
                to: JournalStatus::Posted,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::AccountInUse {
                id: Uuid::nil(),
                references: AccountReferences { budgets: 1, journal_entries: 0, rules: 0 },
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::DatabaseError(sqlx::Error::RowNotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn account_in_use_message_lists_references() {
        let err = AppError::AccountInUse {
            id: Uuid::nil(),
            references: AccountReferences { budgets: 2, journal_entries: 5, rules: 1 },
        };
        let message = err.to_string();
        assert!(message.contains("2 budget(s)"));
        assert!(message.contains("5 journal entry(ies)"));
        assert!(message.contains("1 rule(s)"));
    }

    #[test]
    fn non_database_errors_pass_through_reference_mapping() {
        let mapped = map_reference_error(sqlx::Error::RowNotFound);
        assert!(matches!(mapped, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }
}
