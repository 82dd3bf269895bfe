//! Database configuration module for the records store.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`
//! and created `IF NOT EXISTS`, so pointing the store at an existing file is harmless
//! and pointing it at a missing file creates it.

use crate::entities::{
    Contribution, Event, EventType, Organization, QuarterlySummary, Volunteer, quarterly_summary,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Directory used for persistent storage when it exists (hosted deployments).
const PERSISTENT_DATA_DIR: &str = "/data";

/// Resolves the database URL.
///
/// `DATABASE_URL` wins when set. Otherwise the store lives in
/// `/data/community.db` if a `/data` directory exists, falling back to
/// `community.db` in the working directory. `mode=rwc` makes `SQLite` create
/// the file on first run.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| default_database_url(Path::new(PERSISTENT_DATA_DIR)))
}

fn default_database_url(data_dir: &Path) -> String {
    if data_dir.is_dir() {
        format!("sqlite://{}/community.db?mode=rwc", data_dir.display())
    } else {
        "sqlite://community.db?mode=rwc".to_string()
    }
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates every table the store needs, skipping tables that already exist.
///
/// Contributions reference events (cascade) and volunteers (set null); events
/// carry no storage foreign keys. `quarterly_summaries` additionally gets a
/// unique index on `(year, quarter)`.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Referenced tables first so the contribution foreign keys resolve
    let mut tables: Vec<TableCreateStatement> = vec![
        schema.create_table_from_entity(EventType),
        schema.create_table_from_entity(Organization),
        schema.create_table_from_entity(Volunteer),
        schema.create_table_from_entity(Event),
        schema.create_table_from_entity(Contribution),
        schema.create_table_from_entity(QuarterlySummary),
    ];

    for table in &mut tables {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    let summary_key = Index::create()
        .name("idx_quarterly_summaries_year_quarter")
        .table(QuarterlySummary)
        .col(quarterly_summary::Column::Year)
        .col(quarterly_summary::Column::Quarter)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&summary_key)).await?;

    info!("Database tables ensured.");
    Ok(())
}
