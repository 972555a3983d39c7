//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Database migrations applied");

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(app_state)).await?;
    Ok(())
}

pub fn app(app_state: AppState) -> Router {
    // Everything below requires a valid bearer token
    let protected_routes = Router::new()
        // Analytical accounts
        .route(
            "/analytical",
            get(handlers::analytical::list_accounts).post(handlers::analytical::create_account),
        )
        .route(
            "/analytical/{id}",
            put(handlers::analytical::update_account).delete(handlers::analytical::delete_account),
        )
        // Classification rules
        .route(
            "/auto-analytical",
            get(handlers::auto_analytical::list_rules).post(handlers::auto_analytical::create_rule),
        )
        .route("/auto-analytical/classify", post(handlers::auto_analytical::classify))
        // Budgets
        .route(
            "/budgets",
            get(handlers::budgets::list_budgets).post(handlers::budgets::create_budget),
        )
        .route("/budgets/report", get(handlers::budgets::budget_report))
        .route(
            "/budgets/{id}",
            put(handlers::budgets::update_budget).delete(handlers::budgets::delete_budget),
        )
        // Journal
        .route(
            "/journal-entries",
            get(handlers::journal::list_entries).post(handlers::journal::create_entry),
        )
        .route("/journal-entries/{id}/post", post(handlers::journal::post_entry))
        .route("/journal-entries/{id}/cancel", post(handlers::journal::cancel_entry))
        // Invoices
        .route("/invoices/totals", post(handlers::invoices::calculate_totals))
        .route(
            "/invoices/draft",
            get(handlers::invoices::new_draft).post(handlers::invoices::apply_draft_action),
        )
        .route("/invoices/journal-entries", post(handlers::invoices::record_invoice))
        // Navigation
        .route("/navigation", get(handlers::navigation::get_navigation))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::navigation::health))
        .merge(protected_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .with_state(app_state)
}
