use community_records::{
    config::{self, database},
    core::{Quarter, event, event_type, report, summary},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the store configuration (falls back to built-in defaults)
    let store_config = config::store::load_default_config()
        .inspect_err(|e| error!("Failed to load store configuration: {}", e))?;
    info!(
        "Reference policy: {:?}, {} seed event type(s)",
        store_config.reference_policy,
        store_config.event_types.len()
    );

    // 4. Open (or create) the database and ensure the schema
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed default event types
    event_type::seed_event_types(&db, &store_config.event_types)
        .await
        .inspect_err(|e| error!("Failed to seed event types: {}", e))?;

    // 6. Report what the store currently holds
    let board = report::dashboard(&db).await?;
    info!(
        "{} event(s) on record; {}",
        board.total_events,
        report::format_totals(&board.totals)
    );

    if let Some(latest) = event::list_quarters(&db).await?.first() {
        let quarter: Quarter = latest.parse()?;
        let cached = summary::get_quarterly_summary(&db, quarter).await?;
        info!(
            "Latest quarter {}: {} event(s), {} participant(s)",
            quarter, cached.total_events, cached.total_participants
        );
    }

    Ok(())
}
