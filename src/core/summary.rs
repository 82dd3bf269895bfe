//! Quarterly summary cache.
//!
//! A `quarterly_summaries` row holds the headline figures of one quarter. Rows
//! are computed on demand and deleted by every event or contribution write
//! that touches the quarter, so a stored row always matches the live data.

use crate::{
    core::{quarter::Quarter, report},
    entities::{QuarterlySummary, quarterly_summary},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

fn key(quarter: Quarter) -> Result<(i32, i32)> {
    Ok((quarter.year(), i32::try_from(quarter.number())?))
}

/// Drops the cached summary for a quarter, if any.
///
/// Called inside the transaction of every write that changes the quarter's
/// events or contributions.
pub async fn invalidate_quarter<C>(db: &C, quarter: Quarter) -> Result<()>
where
    C: ConnectionTrait,
{
    let (year, number) = key(quarter)?;
    let result = QuarterlySummary::delete_many()
        .filter(quarterly_summary::Column::Year.eq(year))
        .filter(quarterly_summary::Column::Quarter.eq(number))
        .exec(db)
        .await?;
    if result.rows_affected > 0 {
        debug!("Invalidated cached summary for {quarter}");
    }
    Ok(())
}

/// Returns the cached summary for a quarter without computing it.
pub async fn get_cached_summary(
    db: &DatabaseConnection,
    quarter: Quarter,
) -> Result<Option<quarterly_summary::Model>> {
    let (year, number) = key(quarter)?;
    QuarterlySummary::find()
        .filter(quarterly_summary::Column::Year.eq(year))
        .filter(quarterly_summary::Column::Quarter.eq(number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Recomputes a quarter's figures from the live tables and stores them,
/// replacing any previous row.
pub async fn refresh_quarterly_summary(
    db: &DatabaseConnection,
    quarter: Quarter,
) -> Result<quarterly_summary::Model> {
    let (year, number) = key(quarter)?;
    let txn = db.begin().await?;

    let stats = report::quarter_event_stats(&txn, quarter).await?;
    let totals = report::quarter_totals(&txn, quarter).await?;

    invalidate_quarter(&txn, quarter).await?;
    let stored = quarterly_summary::ActiveModel {
        year: Set(year),
        quarter: Set(number),
        total_events: Set(stats.total_events),
        total_volunteer_hours: Set(totals.volunteer_hours),
        total_cash_donations: Set(totals.cash_donations),
        total_material_value: Set(totals.material_value),
        total_participants: Set(stats.total_participants),
        generated_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!("Generated summary for {quarter}");
    Ok(stored)
}

/// Returns the summary for a quarter, computing and caching it on a miss.
pub async fn get_quarterly_summary(
    db: &DatabaseConnection,
    quarter: Quarter,
) -> Result<quarterly_summary::Model> {
    if let Some(cached) = get_cached_summary(db, quarter).await? {
        return Ok(cached);
    }
    refresh_quarterly_summary(db, quarter).await
}
