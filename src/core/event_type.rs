//! Event type business logic - Creating, listing, seeding and deleting event types.
//!
//! Names are unique; a duplicate insert is reported as
//! [`Error::DuplicateEventType`] rather than a storage failure. Deleting a type
//! that events still use follows the configured [`ReferencePolicy`].

use crate::{
    config::{ReferencePolicy, store::EventTypeConfig},
    core::form::FormFields,
    entities::{Event, EventType, event, event_type},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Fields accepted when adding an event type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTypeInput {
    /// Unique name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

impl EventTypeInput {
    /// Reads `name` (required) and `description` from a submitted form.
    pub fn from_form(form: &FormFields) -> Result<Self> {
        Ok(Self {
            name: form.required("name")?,
            description: form.text("description"),
        })
    }
}

/// Retrieves all event types ordered alphabetically by name.
pub async fn list_event_types(db: &DatabaseConnection) -> Result<Vec<event_type::Model>> {
    EventType::find()
        .order_by_asc(event_type::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an event type by id, returning None if it does not exist.
pub async fn get_event_type_by_id(
    db: &DatabaseConnection,
    event_type_id: i64,
) -> Result<Option<event_type::Model>> {
    EventType::find_by_id(event_type_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a new event type.
///
/// # Errors
/// Returns [`Error::DuplicateEventType`] when the name is already taken; the
/// existing row is left untouched.
#[instrument(skip(db))]
pub async fn create_event_type(
    db: &DatabaseConnection,
    input: EventTypeInput,
) -> Result<event_type::Model> {
    let name = input.name.clone();
    let model = event_type::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(created) => {
            info!("Added event type '{}' (ID: {})", created.name, created.id);
            Ok(created)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            warn!("Event type '{name}' already exists");
            Err(Error::DuplicateEventType { name })
        }
        Err(e) => Err(e.into()),
    }
}

/// Inserts each configured event type whose name is not stored yet.
///
/// Safe to run on every start. Returns the number of rows inserted.
pub async fn seed_event_types(
    db: &DatabaseConnection,
    event_types: &[EventTypeConfig],
) -> Result<u64> {
    let txn = db.begin().await?;
    let mut inserted = 0;

    for config in event_types {
        let existing = EventType::find()
            .filter(event_type::Column::Name.eq(config.name.as_str()))
            .one(&txn)
            .await?;

        if existing.is_some() {
            debug!("Event type '{}' already present. Skipping.", config.name);
            continue;
        }

        event_type::ActiveModel {
            name: Set(config.name.clone()),
            description: Set(config.description.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        inserted += 1;
    }

    txn.commit().await?;
    if inserted > 0 {
        info!("Seeded {inserted} event type(s).");
    }
    Ok(inserted)
}

/// Deletes an event type. Returns whether a row was removed.
///
/// Under [`ReferencePolicy::Dangle`] events keep their now-dangling
/// `event_type_id`. Under [`ReferencePolicy::Restrict`] the delete is refused
/// while any event uses the type.
#[instrument(skip(db))]
pub async fn delete_event_type(
    db: &DatabaseConnection,
    event_type_id: i64,
    policy: ReferencePolicy,
) -> Result<bool> {
    if policy == ReferencePolicy::Restrict {
        let count = Event::find()
            .filter(event::Column::EventTypeId.eq(event_type_id))
            .count(db)
            .await?;
        if count > 0 {
            return Err(Error::ReferenceInUse {
                entity: "Event type",
                id: event_type_id,
                count,
            });
        }
    }

    let result = EventType::delete_by_id(event_type_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
