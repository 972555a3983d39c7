pub mod analytical_repo;
pub use analytical_repo::AnalyticalRepository;
pub mod auto_analytical_repo;
pub use auto_analytical_repo::AutoAnalyticalRepository;
pub mod budget_repo;
pub use budget_repo::BudgetRepository;
pub mod journal_repo;
pub use journal_repo::JournalRepository;
