//! Fanimal backend entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fanimal::adapters::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use fanimal::adapters::http::{api_router, AppState};
use fanimal::adapters::postgres::{
    PostgresShelterRepository, PostgresSubscriptionRepository, PostgresUserRepository,
    PostgresWebhookEventRepository,
};
use fanimal::adapters::stripe::{StripeBillingGateway, StripeConfig};
use fanimal::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        shelters: Arc::new(PostgresShelterRepository::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        webhook_events: Arc::new(PostgresWebhookEventRepository::new(pool.clone())),
        gateway: Arc::new(StripeBillingGateway::new(StripeConfig::new(
            config.payment.stripe_api_key.clone(),
        ))),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(JwtTokenIssuer::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_expiration_secs,
        )),
        webhook_secret: config.payment.stripe_webhook_secret.clone(),
    };

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, test_mode = config.payment.is_test_mode(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, api_router(state)).await?;

    Ok(())
}
