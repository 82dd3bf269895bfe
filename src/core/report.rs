//! Report generation business logic.
//!
//! This module provides the aggregate queries behind the dashboard, the
//! per-event and per-volunteer totals, and the quarterly report. All functions
//! are framework-agnostic and return structured data that a presentation
//! layer can render.

use crate::{
    core::{
        event::{self as event_logic, EventDetail},
        quarter::Quarter,
    },
    entities::{Contribution, Event, EventType, contribution, event, event_type},
    errors::Result,
};
use sea_orm::{
    FromQueryResult, PaginatorTrait, QueryOrder, QuerySelect, Select, prelude::*,
    sea_query::Expr,
};
use serde::Serialize;
use std::fmt::Write as _;

/// Number of events shown on the dashboard
pub const DASHBOARD_RECENT_EVENTS: u64 = 5;

/// Summed contribution figures for some scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Total hours volunteered
    pub volunteer_hours: f64,
    /// Total cash donated
    pub cash_donations: f64,
    /// Total value of donated materials
    pub material_value: f64,
    /// Number of contributions counted
    pub contribution_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    total_hours: Option<f64>,
    total_cash: Option<f64>,
    total_material: Option<f64>,
    contribution_count: i64,
}

impl From<TotalsRow> for Totals {
    fn from(row: TotalsRow) -> Self {
        Self {
            volunteer_hours: row.total_hours.unwrap_or(0.0),
            cash_donations: row.total_cash.unwrap_or(0.0),
            material_value: row.total_material.unwrap_or(0.0),
            contribution_count: row.contribution_count,
        }
    }
}

/// Event count and participant sum for one quarter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuarterEventStats {
    /// Events dated in the quarter
    pub total_events: i64,
    /// Sum of their actual participants
    pub total_participants: i64,
}

#[derive(Debug, FromQueryResult)]
struct EventStatsRow {
    total_events: i64,
    total_participants: Option<i64>,
}

/// One row of the per-event-type breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    /// Type name; None for untyped events and events whose type was deleted
    pub event_type_name: Option<String>,
    /// Number of events
    pub event_count: i64,
    /// Sum of actual participants
    pub participants: i64,
}

#[derive(Debug, FromQueryResult)]
struct TypeBreakdownRow {
    event_type_name: Option<String>,
    event_count: i64,
    participants: Option<i64>,
}

/// Figures shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Number of events ever recorded
    pub total_events: u64,
    /// Totals across every contribution
    pub totals: Totals,
    /// Most recent events by date
    pub recent_events: Vec<EventDetail>,
}

/// Everything reported for one quarter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterlyReport {
    /// The quarter reported on
    pub quarter: Quarter,
    /// Its events in date order
    pub events: Vec<EventDetail>,
    /// Number of events
    pub total_events: i64,
    /// Contribution totals for those events
    pub totals: Totals,
    /// Sum of actual participants
    pub total_participants: i64,
    /// Counts and participants per event type
    pub by_type: Vec<TypeBreakdown>,
}

fn totals_select() -> Select<Contribution> {
    Contribution::find()
        .select_only()
        .column_as(
            Expr::col((Contribution, contribution::Column::VolunteerHours)).sum(),
            "total_hours",
        )
        .column_as(
            Expr::col((Contribution, contribution::Column::CashDonation)).sum(),
            "total_cash",
        )
        .column_as(
            Expr::col((Contribution, contribution::Column::MaterialValue)).sum(),
            "total_material",
        )
        .column_as(
            Expr::col((Contribution, contribution::Column::Id)).count(),
            "contribution_count",
        )
}

async fn fetch_totals<C>(db: &C, select: Select<Contribution>) -> Result<Totals>
where
    C: ConnectionTrait,
{
    let row = select.into_model::<TotalsRow>().one(db).await?;
    Ok(row.map(Totals::from).unwrap_or_default())
}

/// Totals across every contribution.
pub async fn overall_totals<C>(db: &C) -> Result<Totals>
where
    C: ConnectionTrait,
{
    fetch_totals(db, totals_select()).await
}

/// Totals for the contributions of one event.
pub async fn event_totals<C>(db: &C, event_id: i64) -> Result<Totals>
where
    C: ConnectionTrait,
{
    fetch_totals(
        db,
        totals_select().filter(contribution::Column::EventId.eq(event_id)),
    )
    .await
}

/// Totals for the contributions linked to one volunteer.
pub async fn volunteer_totals<C>(db: &C, volunteer_id: i64) -> Result<Totals>
where
    C: ConnectionTrait,
{
    fetch_totals(
        db,
        totals_select().filter(contribution::Column::VolunteerId.eq(volunteer_id)),
    )
    .await
}

/// Totals for the contributions of every event dated in a quarter.
pub async fn quarter_totals<C>(db: &C, quarter: Quarter) -> Result<Totals>
where
    C: ConnectionTrait,
{
    fetch_totals(
        db,
        totals_select()
            .inner_join(Event)
            .filter(event::Column::Quarter.eq(quarter.label())),
    )
    .await
}

/// Event count and participant sum for a quarter.
pub async fn quarter_event_stats<C>(db: &C, quarter: Quarter) -> Result<QuarterEventStats>
where
    C: ConnectionTrait,
{
    let row = Event::find()
        .select_only()
        .column_as(Expr::col((Event, event::Column::Id)).count(), "total_events")
        .column_as(
            Expr::col((Event, event::Column::ActualParticipants)).sum(),
            "total_participants",
        )
        .filter(event::Column::Quarter.eq(quarter.label()))
        .into_model::<EventStatsRow>()
        .one(db)
        .await?;

    Ok(row.map_or_else(QuarterEventStats::default, |r| QuarterEventStats {
        total_events: r.total_events,
        total_participants: r.total_participants.unwrap_or(0),
    }))
}

/// Event counts and participant sums per event type for a quarter.
///
/// Untyped events and events whose type no longer exists share one row with
/// no name.
pub async fn quarter_breakdown_by_type<C>(
    db: &C,
    quarter: Quarter,
) -> Result<Vec<TypeBreakdown>>
where
    C: ConnectionTrait,
{
    let rows = Event::find()
        .select_only()
        .left_join(EventType)
        .column_as(event_type::Column::Name, "event_type_name")
        .column_as(Expr::col((Event, event::Column::Id)).count(), "event_count")
        .column_as(
            Expr::col((Event, event::Column::ActualParticipants)).sum(),
            "participants",
        )
        .filter(event::Column::Quarter.eq(quarter.label()))
        .group_by(event_type::Column::Name)
        .order_by_asc(event_type::Column::Name)
        .into_model::<TypeBreakdownRow>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| TypeBreakdown {
            event_type_name: r.event_type_name,
            event_count: r.event_count,
            participants: r.participants.unwrap_or(0),
        })
        .collect())
}

/// Builds the dashboard: event count, overall totals and the latest events.
pub async fn dashboard(db: &DatabaseConnection) -> Result<Dashboard> {
    let total_events = Event::find().count(db).await?;
    let totals = overall_totals(db).await?;
    let recent_events = event_logic::list_recent_events(db, DASHBOARD_RECENT_EVENTS).await?;

    Ok(Dashboard {
        total_events,
        totals,
        recent_events,
    })
}

/// Generates the full report for one quarter.
pub async fn generate_quarterly_report(
    db: &DatabaseConnection,
    quarter: Quarter,
) -> Result<QuarterlyReport> {
    let events = event_logic::list_events_for_quarter(db, quarter).await?;
    let stats = quarter_event_stats(db, quarter).await?;
    let totals = quarter_totals(db, quarter).await?;
    let by_type = quarter_breakdown_by_type(db, quarter).await?;

    Ok(QuarterlyReport {
        quarter,
        events,
        total_events: stats.total_events,
        totals,
        total_participants: stats.total_participants,
        by_type,
    })
}

/// Formats totals as a single summary line.
#[must_use]
pub fn format_totals(totals: &Totals) -> String {
    format!(
        "{:.1} hours, ${:.2} cash, ${:.2} in materials ({} contributions)",
        totals.volunteer_hours,
        totals.cash_donations,
        totals.material_value,
        totals.contribution_count
    )
}

/// Formats a quarterly report as plain text.
#[must_use]
pub fn format_quarterly_report(report: &QuarterlyReport) -> String {
    let mut out = format!(
        "Quarterly report {}\nEvents: {}  Participants: {}\nContributions: {}\n",
        report.quarter,
        report.total_events,
        report.total_participants,
        format_totals(&report.totals)
    );

    for row in &report.by_type {
        let name = row.event_type_name.as_deref().unwrap_or("(no type)");
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "  {name}: {} event(s), {} participant(s)",
            row.event_count, row.participants
        );
    }

    for ev in &report.events {
        let _ = writeln!(out, "  {} {} [{}]", ev.event_date, ev.event_name, ev.status);
    }

    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::event::{EventInput, create_event};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_empty_store_totals_are_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let totals = overall_totals(&db).await?;
        assert_eq!(totals, Totals::default());

        let q: Quarter = "2024Q1".parse()?;
        assert_eq!(quarter_event_stats(&db, q).await?, QuarterEventStats::default());
        assert!(quarter_breakdown_by_type(&db, q).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_quarter_totals_sum_across_events() -> Result<()> {
        let db = setup_test_db().await?;
        let e1 = create_test_event(&db, "E1", "2024-01-10").await?;
        let e2 = create_test_event(&db, "E2", "2024-03-20").await?;
        let outside = create_test_event(&db, "Later", "2024-04-01").await?;
        create_test_contribution(&db, e1.id, None, 2.0, 10.0, 0.0).await?;
        create_test_contribution(&db, e2.id, None, 3.0, 0.0, 0.0).await?;
        create_test_contribution(&db, outside.id, None, 100.0, 100.0, 100.0).await?;

        let totals = quarter_totals(&db, "2024Q1".parse()?).await?;
        assert_eq!(totals.volunteer_hours, 5.0);
        assert_eq!(totals.cash_donations, 10.0);
        assert_eq!(totals.material_value, 0.0);
        assert_eq!(totals.contribution_count, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_event_and_volunteer_scopes() -> Result<()> {
        let db = setup_test_db().await?;
        let vol = create_test_volunteer(&db, "Jane Doe").await?;
        let ev = create_test_event(&db, "Fair", "2024-07-04").await?;
        let other = create_test_event(&db, "Sale", "2024-07-05").await?;
        create_test_contribution(&db, ev.id, Some(vol.id), 2.0, 5.0, 1.0).await?;
        create_test_contribution(&db, ev.id, None, 1.0, 0.0, 0.0).await?;
        create_test_contribution(&db, other.id, Some(vol.id), 4.0, 0.0, 0.0).await?;

        let per_event = event_totals(&db, ev.id).await?;
        assert_eq!(per_event.volunteer_hours, 3.0);
        assert_eq!(per_event.contribution_count, 2);

        let per_volunteer = volunteer_totals(&db, vol.id).await?;
        assert_eq!(per_volunteer.volunteer_hours, 6.0);
        assert_eq!(per_volunteer.cash_donations, 5.0);

        let all = overall_totals(&db).await?;
        assert_eq!(all.volunteer_hours, 7.0);
        assert_eq!(all.contribution_count, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_quarterly_report() -> Result<()> {
        let db = setup_seeded_db().await?;
        let school = find_event_type(&db, "School").await?;
        let church = find_event_type(&db, "Church").await?;

        let mut a = EventInput::new("Science Night", parse_test_date("2024-02-01"));
        a.event_type_id = Some(school.id);
        a.actual_participants = 30;
        let a = create_event(&db, a).await?;

        let mut b = EventInput::new("Bake Sale", parse_test_date("2024-01-05"));
        b.event_type_id = Some(school.id);
        b.actual_participants = 12;
        create_event(&db, b).await?;

        let mut c = EventInput::new("Choir", parse_test_date("2024-03-15"));
        c.event_type_id = Some(church.id);
        c.actual_participants = 8;
        create_event(&db, c).await?;

        let mut d = EventInput::new("Untyped", parse_test_date("2024-03-30"));
        d.actual_participants = 1;
        create_event(&db, d).await?;

        create_test_event(&db, "Next quarter", "2024-04-01").await?;
        create_test_contribution(&db, a.id, None, 2.5, 40.0, 10.0).await?;

        let report = generate_quarterly_report(&db, "2024Q1".parse()?).await?;
        assert_eq!(report.total_events, 4);
        assert_eq!(report.total_participants, 51);
        assert_eq!(report.totals.volunteer_hours, 2.5);
        assert_eq!(report.totals.cash_donations, 40.0);

        let names: Vec<&str> = report.events.iter().map(|e| e.event_name.as_str()).collect();
        assert_eq!(names, vec!["Bake Sale", "Science Night", "Choir", "Untyped"]);

        let school_row = report
            .by_type
            .iter()
            .find(|r| r.event_type_name.as_deref() == Some("School"))
            .unwrap();
        assert_eq!(school_row.event_count, 2);
        assert_eq!(school_row.participants, 42);
        let untyped = report.by_type.iter().find(|r| r.event_type_name.is_none()).unwrap();
        assert_eq!(untyped.event_count, 1);
        assert_eq!(report.by_type.len(), 3);

        let text = format_quarterly_report(&report);
        assert!(text.starts_with("Quarterly report 2024Q1"));
        assert!(text.contains("School: 2 event(s), 42 participant(s)"));
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard() -> Result<()> {
        let db = setup_test_db().await?;
        for (name, date) in [
            ("A", "2024-01-01"),
            ("B", "2024-02-01"),
            ("C", "2024-03-01"),
            ("D", "2024-04-01"),
            ("E", "2024-05-01"),
            ("F", "2024-06-01"),
        ] {
            let ev = create_test_event(&db, name, date).await?;
            create_test_contribution(&db, ev.id, None, 1.0, 2.0, 3.0).await?;
        }

        let board = dashboard(&db).await?;
        assert_eq!(board.total_events, 6);
        assert_eq!(board.totals.volunteer_hours, 6.0);
        assert_eq!(board.totals.cash_donations, 12.0);
        assert_eq!(board.totals.material_value, 18.0);
        assert_eq!(board.recent_events.len(), 5);
        assert_eq!(board.recent_events[0].event_name, "F");
        Ok(())
    }

    #[test]
    fn test_format_totals() {
        let totals = Totals {
            volunteer_hours: 5.0,
            cash_donations: 10.0,
            material_value: 2.5,
            contribution_count: 2,
        };
        assert_eq!(
            format_totals(&totals),
            "5.0 hours, $10.00 cash, $2.50 in materials (2 contributions)"
        );
    }
}
