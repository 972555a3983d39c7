pub mod analytical;
pub mod auto_analytical;
pub mod budgets;
pub mod invoices;
pub mod journal;
pub mod navigation;
