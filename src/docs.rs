// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::navigation::health,

        // --- Analytical accounts ---
        handlers::analytical::list_accounts,
        handlers::analytical::create_account,
        handlers::analytical::update_account,
        handlers::analytical::delete_account,

        // --- Auto-analytical models ---
        handlers::auto_analytical::list_rules,
        handlers::auto_analytical::create_rule,
        handlers::auto_analytical::classify,

        // --- Budgets ---
        handlers::budgets::list_budgets,
        handlers::budgets::create_budget,
        handlers::budgets::update_budget,
        handlers::budgets::delete_budget,
        handlers::budgets::budget_report,

        // --- Journal ---
        handlers::journal::list_entries,
        handlers::journal::create_entry,
        handlers::journal::post_entry,
        handlers::journal::cancel_entry,

        // --- Invoices ---
        handlers::invoices::calculate_totals,
        handlers::invoices::new_draft,
        handlers::invoices::apply_draft_action,
        handlers::invoices::record_invoice,

        // --- Navigation ---
        handlers::navigation::get_navigation,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::CurrentUser,

            // --- Analytical ---
            models::analytical::AnalyticalAccount,
            models::analytical::AccountReferences,
            models::analytical::AutoAnalyticalModel,
            models::analytical::AccountRef,
            models::analytical::ProductRef,
            models::analytical::RuleView,
            models::analytical::ClassificationInput,
            models::analytical::RuleEvaluation,
            models::analytical::ClassificationOutcome,

            // --- Budgets ---
            models::budget::Budget,
            models::budget::BudgetReportRow,

            // --- Journal ---
            models::journal::EntryType,
            models::journal::JournalStatus,
            models::journal::JournalEntry,

            // --- Invoices ---
            models::invoice::NumericInput,
            models::invoice::InvoiceItem,
            models::invoice::InvoiceTotals,
            models::invoice::InvoiceData,
            models::invoice::InvoicePatch,
            models::invoice::ItemField,
            models::invoice::InvoiceAction,

            // --- Navigation ---
            models::navigation::NavItem,
            models::navigation::Navigation,

            // --- Payloads ---
            handlers::analytical::CreateAnalyticalPayload,
            handlers::analytical::UpdateAnalyticalPayload,
            handlers::auto_analytical::CreateRulePayload,
            handlers::budgets::CreateBudgetPayload,
            handlers::budgets::UpdateBudgetPayload,
            handlers::journal::CreateJournalEntryPayload,
            handlers::invoices::TotalsPayload,
            handlers::invoices::DraftActionPayload,
            handlers::invoices::InvoiceJournalPayload,
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Analytical Accounts", description = "Cost centers and projects"),
        (name = "Auto-Analytical Models", description = "Rules that pick an analytical account"),
        (name = "Budgets", description = "Budgets and the budget vs actual report"),
        (name = "Journal Entries", description = "Income and expense movements"),
        (name = "Invoices", description = "Invoice totals, drafts and journal recording"),
        (name = "Navigation", description = "Role-based menus")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/analytical",
            "/api/analytical/{id}",
            "/api/auto-analytical",
            "/api/auto-analytical/classify",
            "/api/budgets",
            "/api/budgets/{id}",
            "/api/budgets/report",
            "/api/journal-entries",
            "/api/journal-entries/{id}/post",
            "/api/journal-entries/{id}/cancel",
            "/api/invoices/totals",
            "/api/invoices/draft",
            "/api/invoices/journal-entries",
            "/api/navigation",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
