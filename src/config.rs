// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, net::SocketAddr, time::Duration};

use crate::{
    db::{AnalyticalRepository, AutoAnalyticalRepository, BudgetRepository, JournalRepository},
    services::{AnalyticalService, AuthService, BudgetService, ClassificationService, JournalService},
};

// ---
// Settings read from the environment (.env is loaded by main)
// ---

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:3000")?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => 5,
        };

        let acquire_timeout_secs = match lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .context("DATABASE_ACQUIRE_TIMEOUT_SECS must be a number of seconds")?,
            None => 3,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

// ---
// Shared state handed to every handler
// ---

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub analytical_service: AnalyticalService,
    pub classification_service: ClassificationService,
    pub budget_service: BudgetService,
    pub journal_service: JournalService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Failed to connect to the database")?;

        tracing::info!("✅ Database connection established");

        Ok(Self::from_pool(db_pool, config.jwt_secret.clone()))
    }

    // Builds the dependency graph on top of an existing pool
    pub fn from_pool(db_pool: PgPool, jwt_secret: String) -> Self {
        let classification_service =
            ClassificationService::new(AutoAnalyticalRepository::new(), db_pool.clone());

        Self {
            auth_service: AuthService::new(jwt_secret),
            analytical_service: AnalyticalService::new(AnalyticalRepository::new(), db_pool.clone()),
            budget_service: BudgetService::new(BudgetRepository::new(), db_pool.clone()),
            journal_service: JournalService::new(
                JournalRepository::new(),
                classification_service.clone(),
                db_pool.clone(),
            ),
            classification_service,
            db_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/shiv"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
    }

    #[test]
    fn overrides_are_read() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BIND_ADDR", "127.0.0.1:8080"));
        pairs.push(("DATABASE_MAX_CONNECTIONS", "20"));
        pairs.push(("DATABASE_ACQUIRE_TIMEOUT_SECS", "10"));

        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.acquire_timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_secret_fails() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn blank_database_url_fails() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", " "), ("JWT_SECRET", "s")]))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn bad_pool_size_fails() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABASE_MAX_CONNECTIONS", "many"));
        assert!(AppConfig::from_lookup(lookup_from(&pairs)).is_err());
    }
}
