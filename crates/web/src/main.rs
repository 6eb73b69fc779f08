use std::time::Duration;

use anyhow::Context;
use axum::{Router, extract::DefaultBodyLimit};
use receipts::ReceiptProcessor;
use std::sync::Arc;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod routes;
mod state;

use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::receipts::handlers::upload_receipt,
        features::transactions::handlers::get_transaction_eco,
    ),
    components(
        schemas(
            features::receipts::handlers::UploadReceiptForm,
            storage::dto::receipt::UploadReceiptResponse,
            storage::dto::eco::EcoSummaryResponse,
            storage::dto::eco::ScoredItemResponse,
            storage::dto::eco::ScoreSource,
        )
    ),
    tags(
        (name = "receipts", description = "Receipt upload and scoring"),
        (name = "transactions", description = "Per-transaction eco score and cashback"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting eco receipt API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");
    tracing::info!(
        "Real recognition: {}, real footprint service: {}",
        config.receipts.recognition_enabled(),
        config.receipts.footprint_service_enabled()
    );

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let processor = ReceiptProcessor::from_config(Arc::new(db.clone()), &config.receipts)
        .context("Failed to build receipt processor")?;
    let state = AppState::new(db, processor);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", routes::api_routes())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
