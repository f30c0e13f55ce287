// Main entry point for the membership form server

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use member_signup::adapters::http::{signup_router, SignupAppState};
use member_signup::adapters::{
    InMemoryMemberStore, InMemoryMembershipTypeReader, OnlinePaymentLinks, PostgresMemberStore,
    PostgresMembershipTypeReader, RecordingEmailSender, ResendConfig, ResendEmailSender,
};
use member_signup::config::AppConfig;
use member_signup::ports::{EmailSender, MemberStore, MembershipTypeReader, PaymentLinkBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().context("Invalid configuration")?;
    let settings = Arc::new(
        config
            .signup_settings()
            .context("Failed to build form settings")?,
    );
    tracing::info!(
        organization = %settings.organization.name,
        enabled = settings.policy.enable_public,
        "Configuration loaded"
    );

    // Storage
    let (members, membership_types): (Arc<dyn MemberStore>, Arc<dyn MembershipTypeReader>) =
        match config.database.url() {
            Some(url) => {
                tracing::info!("Connecting to database...");
                let pool = PgPoolOptions::new()
                    .min_connections(config.database.min_connections)
                    .max_connections(config.database.max_connections)
                    .acquire_timeout(config.database.acquire_timeout())
                    .connect(url)
                    .await
                    .context("Failed to connect to database")?;

                if config.database.run_migrations {
                    tracing::info!("Running database migrations...");
                    sqlx::migrate!("./migrations")
                        .run(&pool)
                        .await
                        .context("Failed to run migrations")?;
                }

                (
                    Arc::new(PostgresMemberStore::new(pool.clone())),
                    Arc::new(PostgresMembershipTypeReader::new(pool)),
                )
            }
            None => {
                tracing::warn!("No database configured, members are kept in memory");
                (
                    Arc::new(InMemoryMemberStore::new()),
                    Arc::new(InMemoryMembershipTypeReader::new(Vec::new())),
                )
            }
        };

    // Email
    let email_sender: Arc<dyn EmailSender> = if config.email.enabled {
        let resend = ResendConfig::new(config.email.resend_api_key.clone())
            .with_base_url(config.email.api_base_url.clone())
            .with_timeout(std::time::Duration::from_secs(config.email.timeout_secs));
        Arc::new(ResendEmailSender::new(resend).context("Failed to create email sender")?)
    } else {
        tracing::warn!("Email delivery disabled, messages are only logged");
        Arc::new(RecordingEmailSender::new())
    };

    // Payment links
    let payment_links = config.payment.page_url()?.map(|page_url| {
        let links = match config.payment.security_secret.clone() {
            Some(secret) => OnlinePaymentLinks::new(page_url).with_secret(secret),
            None => OnlinePaymentLinks::new(page_url),
        };
        Arc::new(links) as Arc<dyn PaymentLinkBuilder>
    });

    let state = SignupAppState {
        members,
        membership_types,
        email_sender,
        payment_links,
        settings,
    };

    let app = signup_router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
