pub mod analytical;
pub mod auth;
pub mod budget;
pub mod invoice;
pub mod journal;
pub mod navigation;
