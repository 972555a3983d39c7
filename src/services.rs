pub mod analytical_service;
pub use analytical_service::AnalyticalService;
pub mod auth;
pub use auth::AuthService;
pub mod budget_service;
pub use budget_service::BudgetService;
pub mod classification_service;
pub use classification_service::ClassificationService;
pub mod invoice_service;
pub mod journal_service;
pub use journal_service::JournalService;
