//! Shared test utilities for the records store.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    config::StoreConfig,
    core::{
        contribution::{self, ContributionInput},
        event::{self, EventInput},
        event_type::{self, EventTypeInput},
        form::parse_date,
        organization::{self, OrganizationInput},
        volunteer::{self, VolunteerInput},
    },
    entities::{self, EventType},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Same as [`setup_test_db`] with the four default event types seeded.
pub async fn setup_seeded_db() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    event_type::seed_event_types(&db, &StoreConfig::default().event_types).await?;
    Ok(db)
}

/// Parses a `YYYY-MM-DD` literal used in a test.
pub fn parse_test_date(value: &str) -> NaiveDate {
    parse_date(value).unwrap()
}

/// Looks up an event type by name, failing the test if it is missing.
pub async fn find_event_type(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::event_type::Model> {
    EventType::find()
        .filter(entities::event_type::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| Error::Config {
            message: format!("event type {name} not seeded"),
        })
}

/// Creates an event type with no description.
pub async fn create_test_event_type(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::event_type::Model> {
    event_type::create_event_type(
        db,
        EventTypeInput {
            name: name.to_string(),
            description: None,
        },
    )
    .await
}

/// Creates an organization with only a name.
pub async fn create_test_organization(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::organization::Model> {
    organization::create_organization(
        db,
        OrganizationInput {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates a volunteer with only a name.
pub async fn create_test_volunteer(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::volunteer::Model> {
    volunteer::create_volunteer(
        db,
        VolunteerInput {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates an untyped event with no organization and default figures.
///
/// # Arguments
/// * `db` - Database connection
/// * `name` - Event name
/// * `date` - `YYYY-MM-DD` date
pub async fn create_test_event(
    db: &DatabaseConnection,
    name: &str,
    date: &str,
) -> Result<entities::event::Model> {
    event::create_event(db, EventInput::new(name, parse_test_date(date))).await
}

/// Creates an event with explicit type and organization references.
pub async fn create_custom_event(
    db: &DatabaseConnection,
    name: &str,
    date: &str,
    event_type_id: Option<i64>,
    organization_id: Option<i64>,
) -> Result<entities::event::Model> {
    let mut input = EventInput::new(name, parse_test_date(date));
    input.event_type_id = event_type_id;
    input.organization_id = organization_id;
    event::create_event(db, input).await
}

/// Creates a contribution with the given amounts.
///
/// # Defaults
/// * `volunteer_name`: `"Test Contributor"` (replaced by the volunteer's name
///   when `volunteer_id` is set)
/// * `volunteer_contact`: `"555-0199"`
pub async fn create_test_contribution(
    db: &DatabaseConnection,
    event_id: i64,
    volunteer_id: Option<i64>,
    hours: f64,
    cash: f64,
    material_value: f64,
) -> Result<entities::contribution::Model> {
    let input = ContributionInput {
        volunteer_id,
        volunteer_contact: Some("555-0199".to_string()),
        volunteer_hours: hours,
        cash_donation: cash,
        material_value,
        ..ContributionInput::new("Test Contributor")
    };
    contribution::create_contribution(db, event_id, input).await
}
