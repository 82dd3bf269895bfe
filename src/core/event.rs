//! Event business logic - Creating, updating, listing and deleting events.
//!
//! The quarter label is always recomputed from `event_date` here; callers
//! cannot supply it. Every write also drops the cached quarterly summary of
//! each quarter it touches.

use crate::{
    core::{
        form::{FormFields, ensure_finite},
        quarter::{Quarter, quarter_label},
        summary,
    },
    entities::{
        Contribution, Event, EventType, Organization, contribution, event, event_type,
        organization,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect, Select, Set, TransactionTrait, prelude::*,
};
use serde::Serialize;
use tracing::{info, instrument};

/// Status given to events when none is submitted
pub const DEFAULT_STATUS: &str = "In Progress";

/// Full set of event fields accepted on create and update
#[derive(Debug, Clone, PartialEq)]
pub struct EventInput {
    /// Event name
    pub event_name: String,
    /// Event date; determines the quarter
    pub event_date: NaiveDate,
    /// Optional event type
    pub event_type_id: Option<i64>,
    /// Location
    pub location: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Optional organization
    pub organization_id: Option<i64>,
    /// Coordinator name
    pub coordinator_name: Option<String>,
    /// Coordinator phone
    pub coordinator_phone: Option<String>,
    /// Coordinator email
    pub coordinator_email: Option<String>,
    /// Expected participants
    pub expected_participants: i64,
    /// Actual participants
    pub actual_participants: i64,
    /// Income
    pub income: f64,
    /// Expense
    pub expense: f64,
    /// Notes
    pub notes: Option<String>,
    /// Free-text status
    pub status: String,
}

impl EventInput {
    /// An event with only a name and date; everything else takes its default.
    #[must_use]
    pub fn new(event_name: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            event_name: event_name.into(),
            event_date,
            event_type_id: None,
            location: None,
            description: None,
            organization_id: None,
            coordinator_name: None,
            coordinator_phone: None,
            coordinator_email: None,
            expected_participants: 0,
            actual_participants: 0,
            income: 0.0,
            expense: 0.0,
            notes: None,
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// Reads an event from submitted form fields.
    ///
    /// A submitted `quarter` field is ignored.
    pub fn from_form(form: &FormFields) -> Result<Self> {
        Ok(Self {
            event_name: form.required("event_name")?,
            event_date: form.date("event_date")?,
            event_type_id: form.optional_id("event_type_id")?,
            location: form.text("location"),
            description: form.text("description"),
            organization_id: form.optional_id("organization_id")?,
            coordinator_name: form.text("coordinator_name"),
            coordinator_phone: form.text("coordinator_phone"),
            coordinator_email: form.text("coordinator_email"),
            expected_participants: form.integer_or_zero("expected_participants")?,
            actual_participants: form.integer_or_zero("actual_participants")?,
            income: form.number_or_zero("income")?,
            expense: form.number_or_zero("expense")?,
            notes: form.text("notes"),
            status: form.text_or("status", DEFAULT_STATUS),
        })
    }

    fn validate(&self) -> Result<()> {
        ensure_finite("income", self.income)?;
        ensure_finite("expense", self.expense)?;
        Ok(())
    }

    fn apply(self, model: &mut event::ActiveModel) {
        model.quarter = Set(quarter_label(self.event_date));
        model.event_name = Set(self.event_name);
        model.event_date = Set(self.event_date);
        model.event_type_id = Set(self.event_type_id);
        model.location = Set(self.location);
        model.description = Set(self.description);
        model.organization_id = Set(self.organization_id);
        model.coordinator_name = Set(self.coordinator_name);
        model.coordinator_phone = Set(self.coordinator_phone);
        model.coordinator_email = Set(self.coordinator_email);
        model.expected_participants = Set(self.expected_participants);
        model.actual_participants = Set(self.actual_participants);
        model.income = Set(self.income);
        model.expense = Set(self.expense);
        model.notes = Set(self.notes);
        model.status = Set(self.status);
    }
}

/// An event joined with the names of its type and organization.
///
/// The names are None when the reference is absent or dangling.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct EventDetail {
    /// Event id
    pub id: i64,
    /// Event name
    pub event_name: String,
    /// Event date
    pub event_date: Date,
    /// Event type reference
    pub event_type_id: Option<i64>,
    /// Location
    pub location: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Organization reference
    pub organization_id: Option<i64>,
    /// Coordinator name
    pub coordinator_name: Option<String>,
    /// Coordinator phone
    pub coordinator_phone: Option<String>,
    /// Coordinator email
    pub coordinator_email: Option<String>,
    /// Expected participants
    pub expected_participants: i64,
    /// Actual participants
    pub actual_participants: i64,
    /// Income
    pub income: f64,
    /// Expense
    pub expense: f64,
    /// Notes
    pub notes: Option<String>,
    /// Status
    pub status: String,
    /// When the event was entered
    pub entry_date: DateTime,
    /// Quarter label
    pub quarter: String,
    /// Name of the referenced event type
    pub event_type_name: Option<String>,
    /// Name of the referenced organization
    pub organization_name: Option<String>,
}

/// Outcome of deleting an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDeletion {
    /// Whether the event row existed
    pub event_deleted: bool,
    /// How many of its contributions were removed with it
    pub contributions_deleted: u64,
}

fn select_with_names() -> Select<Event> {
    Event::find()
        .left_join(EventType)
        .left_join(Organization)
        .column_as(event_type::Column::Name, "event_type_name")
        .column_as(organization::Column::Name, "organization_name")
}

/// Finds an event by id, returning None if it does not exist.
pub async fn get_event_by_id<C>(db: &C, event_id: i64) -> Result<Option<event::Model>>
where
    C: ConnectionTrait,
{
    Event::find_by_id(event_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an event by id together with its type and organization names.
pub async fn get_event_detail(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Option<EventDetail>> {
    select_with_names()
        .filter(event::Column::Id.eq(event_id))
        .into_model::<EventDetail>()
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all events, newest date first, with type and organization names.
pub async fn list_events(db: &DatabaseConnection) -> Result<Vec<EventDetail>> {
    select_with_names()
        .order_by_desc(event::Column::EventDate)
        .order_by_desc(event::Column::Id)
        .into_model::<EventDetail>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// The `limit` most recent events by date, for the dashboard.
pub async fn list_recent_events(db: &DatabaseConnection, limit: u64) -> Result<Vec<EventDetail>> {
    select_with_names()
        .order_by_desc(event::Column::EventDate)
        .order_by_desc(event::Column::Id)
        .limit(limit)
        .into_model::<EventDetail>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the events of one quarter in date order.
pub async fn list_events_for_quarter(
    db: &DatabaseConnection,
    quarter: Quarter,
) -> Result<Vec<EventDetail>> {
    select_with_names()
        .filter(event::Column::Quarter.eq(quarter.label()))
        .order_by_asc(event::Column::EventDate)
        .order_by_asc(event::Column::Id)
        .into_model::<EventDetail>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every quarter label that has at least one event, latest first.
pub async fn list_quarters(db: &DatabaseConnection) -> Result<Vec<String>> {
    Event::find()
        .select_only()
        .column(event::Column::Quarter)
        .distinct()
        .order_by_desc(event::Column::Quarter)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates an event, deriving its quarter from the date.
#[instrument(skip(db, input), fields(name = %input.event_name, date = %input.event_date))]
pub async fn create_event(db: &DatabaseConnection, input: EventInput) -> Result<event::Model> {
    input.validate()?;
    let txn = db.begin().await?;

    let quarter = Quarter::from_date(input.event_date);
    let mut model = event::ActiveModel {
        entry_date: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    input.apply(&mut model);

    let created = model.insert(&txn).await?;
    summary::invalidate_quarter(&txn, quarter).await?;

    txn.commit().await?;
    info!(
        "Created event '{}' (ID: {}) in {}",
        created.event_name, created.id, created.quarter
    );
    Ok(created)
}

/// Replaces every editable field of an event and recomputes its quarter.
///
/// # Errors
/// Returns [`Error::EventNotFound`] if the event does not exist.
#[instrument(skip(db, input), fields(date = %input.event_date))]
pub async fn update_event(
    db: &DatabaseConnection,
    event_id: i64,
    input: EventInput,
) -> Result<event::Model> {
    input.validate()?;
    let txn = db.begin().await?;

    let existing = Event::find_by_id(event_id)
        .one(&txn)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;
    let old_quarter: Quarter = existing.quarter.parse()?;
    let new_quarter = Quarter::from_date(input.event_date);

    let mut model: event::ActiveModel = existing.into();
    input.apply(&mut model);
    let updated = model.update(&txn).await?;

    summary::invalidate_quarter(&txn, old_quarter).await?;
    if new_quarter != old_quarter {
        summary::invalidate_quarter(&txn, new_quarter).await?;
    }

    txn.commit().await?;
    info!("Updated event {} ({})", updated.id, updated.quarter);
    Ok(updated)
}

/// Deletes an event and all of its contributions in one transaction.
///
/// Deleting a missing event is a no-op.
#[instrument(skip(db))]
pub async fn delete_event(db: &DatabaseConnection, event_id: i64) -> Result<EventDeletion> {
    let txn = db.begin().await?;

    let Some(existing) = Event::find_by_id(event_id).one(&txn).await? else {
        txn.rollback().await?;
        return Ok(EventDeletion {
            event_deleted: false,
            contributions_deleted: 0,
        });
    };

    let removed = Contribution::delete_many()
        .filter(contribution::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    let quarter: Quarter = existing.quarter.parse()?;
    existing.delete(&txn).await?;
    summary::invalidate_quarter(&txn, quarter).await?;

    txn.commit().await?;
    info!(
        "Deleted event {event_id} and {} contribution(s)",
        removed.rows_affected
    );
    Ok(EventDeletion {
        event_deleted: true,
        contributions_deleted: removed.rows_affected,
    })
}
