use clap::{Parser, Subcommand};
use receipts::{ReceiptProcessor, ReceiptScorer, ReceiptsConfig};
use storage::Database;
use storage::services::eco_scoring;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "receipt-score")]
#[command(about = "Scores receipt images and attaches them to transactions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and score a receipt image without touching the database
    Scan { image: PathBuf },
    /// Process a receipt image for a stored transaction
    Upload {
        #[arg(long)]
        user_id: i64,

        #[arg(long)]
        transaction_id: i64,

        image: PathBuf,

        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("receipt_score={},receipts={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ReceiptsConfig::from_env()?;

    match cli.command {
        Commands::Scan { image } => handle_scan(image, &config).await?,
        Commands::Upload {
            user_id,
            transaction_id,
            image,
            database_url,
        } => handle_upload(user_id, transaction_id, image, &database_url, &config).await?,
    }

    Ok(())
}

async fn handle_scan(image: PathBuf, config: &ReceiptsConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Scanning receipt: {}", image.display());

    let bytes = tokio::fs::read(&image).await?;
    let scorer = ReceiptScorer::from_config(config)?;
    let report = scorer.scan(&bytes).await;

    if report.items.is_empty() {
        tracing::warn!("No items could be read from {}", image.display());
        return Ok(());
    }

    println!("{:<32} {:>10} {:>12} {:>6}", "ITEM", "PRICE", "KG CO2E", "SCORE");
    for item in &report.items {
        let price = item
            .price
            .map(eco_scoring::format_currency)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:>10} {:>12} {:>6}",
            item.name, price, item.kg_co2e, item.item_score
        );
    }
    println!();
    println!("Receipt eco score: {}/10", report.eco_score);

    Ok(())
}

async fn handle_upload(
    user_id: i64,
    transaction_id: i64,
    image: PathBuf,
    database_url: &str,
    config: &ReceiptsConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let db = Database::new(database_url).await?;
    db.run_migrations().await?;

    let bytes = tokio::fs::read(&image).await?;
    let processor = ReceiptProcessor::from_config(Arc::new(db), config)?;

    let response = processor
        .process_upload(user_id, transaction_id, &bytes)
        .await?;

    tracing::info!(
        "✓ Transaction {} scored {}/10 from {} items, cashback ${}",
        response.transaction_id,
        response.eco_score,
        response.item_count,
        response.cashback_amount
    );
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
