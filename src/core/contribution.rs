//! Contribution business logic - Recording what was given towards an event.
//!
//! Each contribution belongs to one existing event and optionally to a known
//! volunteer. When a volunteer is referenced, the stored `volunteer_name` is
//! always the volunteer's current name, whatever name was submitted; the
//! contact field is taken from the submission as-is.

use crate::{
    core::{
        form::{FormFields, ensure_finite},
        quarter::Quarter,
        summary,
    },
    entities::{Contribution, Event, Volunteer, contribution, event},
    errors::{Error, Result},
};
use sea_orm::{FromQueryResult, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Fields accepted when adding a contribution to an event
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionInput {
    /// Known volunteer, if selected
    pub volunteer_id: Option<i64>,
    /// Submitted contributor name; replaced by the volunteer's name when
    /// `volunteer_id` is set
    pub volunteer_name: String,
    /// Contact details
    pub volunteer_contact: Option<String>,
    /// Hours volunteered
    pub volunteer_hours: f64,
    /// Cash donated
    pub cash_donation: f64,
    /// Materials given
    pub material_description: Option<String>,
    /// Value of the materials
    pub material_value: f64,
}

impl ContributionInput {
    /// A contribution from a named contributor with all amounts at zero.
    #[must_use]
    pub fn new(volunteer_name: impl Into<String>) -> Self {
        Self {
            volunteer_id: None,
            volunteer_name: volunteer_name.into(),
            volunteer_contact: None,
            volunteer_hours: 0.0,
            cash_donation: 0.0,
            material_description: None,
            material_value: 0.0,
        }
    }

    /// Reads a contribution from submitted form fields.
    pub fn from_form(form: &FormFields) -> Result<Self> {
        Ok(Self {
            volunteer_id: form.optional_id("volunteer_id")?,
            volunteer_name: form.required("volunteer_name")?,
            volunteer_contact: form.text("volunteer_contact"),
            volunteer_hours: form.number_or_zero("volunteer_hours")?,
            cash_donation: form.number_or_zero("cash_donation")?,
            material_description: form.text("material_description"),
            material_value: form.number_or_zero("material_value")?,
        })
    }
}

/// A contribution joined with the name and date of its event.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct ContributionWithEvent {
    /// Contribution id
    pub id: i64,
    /// Event id
    pub event_id: i64,
    /// Volunteer id
    pub volunteer_id: Option<i64>,
    /// Contributor name snapshot
    pub volunteer_name: String,
    /// Contact snapshot
    pub volunteer_contact: Option<String>,
    /// Hours volunteered
    pub volunteer_hours: f64,
    /// Cash donated
    pub cash_donation: f64,
    /// Materials given
    pub material_description: Option<String>,
    /// Value of the materials
    pub material_value: f64,
    /// When the contribution was recorded
    pub created_at: DateTime,
    /// Name of the event
    pub event_name: String,
    /// Date of the event
    pub event_date: Date,
}

/// Finds a contribution by id, returning None if it does not exist.
pub async fn get_contribution_by_id(
    db: &DatabaseConnection,
    contribution_id: i64,
) -> Result<Option<contribution::Model>> {
    Contribution::find_by_id(contribution_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All contributions recorded against one event, in entry order.
pub async fn list_contributions_for_event(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Vec<contribution::Model>> {
    Contribution::find()
        .filter(contribution::Column::EventId.eq(event_id))
        .order_by_asc(contribution::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A volunteer's contribution history, most recent event first.
pub async fn list_contributions_for_volunteer(
    db: &DatabaseConnection,
    volunteer_id: i64,
) -> Result<Vec<ContributionWithEvent>> {
    Contribution::find()
        .inner_join(Event)
        .column_as(event::Column::EventName, "event_name")
        .column_as(event::Column::EventDate, "event_date")
        .filter(contribution::Column::VolunteerId.eq(volunteer_id))
        .order_by_desc(event::Column::EventDate)
        .order_by_desc(contribution::Column::Id)
        .into_model::<ContributionWithEvent>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records a contribution against an event.
///
/// # Errors
/// - [`Error::EventNotFound`] if the event does not exist
/// - [`Error::VolunteerNotFound`] if a referenced volunteer does not exist
/// - [`Error::InvalidField`] if an amount is not a finite number
#[instrument(skip(db, input))]
pub async fn create_contribution(
    db: &DatabaseConnection,
    event_id: i64,
    input: ContributionInput,
) -> Result<contribution::Model> {
    ensure_finite("volunteer_hours", input.volunteer_hours)?;
    ensure_finite("cash_donation", input.cash_donation)?;
    ensure_finite("material_value", input.material_value)?;

    let txn = db.begin().await?;

    let event = Event::find_by_id(event_id)
        .one(&txn)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    let volunteer_name = match input.volunteer_id {
        Some(volunteer_id) => {
            let volunteer = Volunteer::find_by_id(volunteer_id)
                .one(&txn)
                .await?
                .ok_or(Error::VolunteerNotFound { id: volunteer_id })?;
            if volunteer.name != input.volunteer_name {
                debug!(
                    "Using stored volunteer name '{}' instead of submitted '{}'",
                    volunteer.name, input.volunteer_name
                );
            }
            volunteer.name
        }
        None => input.volunteer_name,
    };

    let model = contribution::ActiveModel {
        event_id: Set(event_id),
        volunteer_id: Set(input.volunteer_id),
        volunteer_name: Set(volunteer_name),
        volunteer_contact: Set(input.volunteer_contact),
        volunteer_hours: Set(input.volunteer_hours),
        cash_donation: Set(input.cash_donation),
        material_description: Set(input.material_description),
        material_value: Set(input.material_value),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let created = model.insert(&txn).await?;

    let quarter: Quarter = event.quarter.parse()?;
    summary::invalidate_quarter(&txn, quarter).await?;

    txn.commit().await?;
    info!(
        "Recorded contribution {} from '{}' for event {}",
        created.id, created.volunteer_name, event_id
    );
    Ok(created)
}

/// Deletes a contribution.
///
/// Returns the id of the event it belonged to, or None if it did not exist.
#[instrument(skip(db))]
pub async fn delete_contribution(
    db: &DatabaseConnection,
    contribution_id: i64,
) -> Result<Option<i64>> {
    let txn = db.begin().await?;

    let Some(existing) = Contribution::find_by_id(contribution_id).one(&txn).await? else {
        txn.rollback().await?;
        return Ok(None);
    };
    let event_id = existing.event_id;
    existing.delete(&txn).await?;

    let quarter = Event::find_by_id(event_id)
        .select_only()
        .column(event::Column::Quarter)
        .into_tuple::<String>()
        .one(&txn)
        .await?;
    if let Some(label) = quarter {
        summary::invalidate_quarter(&txn, label.parse()?).await?;
    }

    txn.commit().await?;
    info!("Deleted contribution {contribution_id} from event {event_id}");
    Ok(Some(event_id))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_volunteer_name_wins() -> Result<()> {
        let db = setup_test_db().await?;
        let vol = create_test_volunteer(&db, "Jane Doe").await?;
        let ev = create_test_event(&db, "Fair", "2024-07-04").await?;

        let form: FormFields = [
            ("volunteer_id", vol.id.to_string().as_str()),
            ("volunteer_name", "J. D."),
            ("volunteer_contact", "jd@example.org"),
            ("volunteer_hours", "4"),
        ]
        .into_iter()
        .collect();

        let input = ContributionInput::from_form(&form)?;
        let created = create_contribution(&db, ev.id, input).await?;
        assert_eq!(created.volunteer_name, "Jane Doe");
        assert_eq!(created.volunteer_contact.as_deref(), Some("jd@example.org"));
        assert_eq!(created.volunteer_id, Some(vol.id));
        assert_eq!(created.volunteer_hours, 4.0);
        assert_eq!(created.cash_donation, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_finite_amounts_are_recoverable() -> Result<()> {
        let db = setup_test_db().await?;
        let ev = create_test_event(&db, "Fair", "2024-07-04").await?;

        let form: FormFields = [("volunteer_name", "Sam"), ("cash_donation", "NaN")]
            .into_iter()
            .collect();
        let err = ContributionInput::from_form(&form).unwrap_err();
        assert!(matches!(&err, Error::InvalidField { field, .. } if field == "cash_donation"));
        assert!(err.is_recoverable());

        let input = ContributionInput {
            material_value: f64::INFINITY,
            ..ContributionInput::new("Sam")
        };
        let err = create_contribution(&db, ev.id, input).await.unwrap_err();
        assert!(matches!(&err, Error::InvalidField { field, .. } if field == "material_value"));
        assert!(err.is_recoverable());

        assert!(list_contributions_for_event(&db, ev.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_without_volunteer_keeps_submitted_name() -> Result<()> {
        let db = setup_test_db().await?;
        let ev = create_test_event(&db, "Fair", "2024-07-04").await?;
        let mut input = ContributionInput::new("Walk-in Donor");
        input.cash_donation = 20.0;

        let created = create_contribution(&db, ev.id, input).await?;
        assert_eq!(created.volunteer_name, "Walk-in Donor");
        assert_eq!(created.volunteer_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_references_must_resolve() -> Result<()> {
        let db = setup_test_db().await?;
        let missing_event = create_contribution(&db, 99, ContributionInput::new("x")).await;
        assert!(matches!(missing_event, Err(Error::EventNotFound { id: 99 })));

        let ev = create_test_event(&db, "Fair", "2024-07-04").await?;
        let mut input = ContributionInput::new("x");
        input.volunteer_id = Some(55);
        let missing_volunteer = create_contribution(&db, ev.id, input).await;
        assert!(matches!(
            missing_volunteer,
            Err(Error::VolunteerNotFound { id: 55 })
        ));

        assert!(Contribution::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_returns_event() -> Result<()> {
        let db = setup_test_db().await?;
        let ev = create_test_event(&db, "Fair", "2024-07-04").await?;
        let c = create_test_contribution(&db, ev.id, None, 1.0, 0.0, 0.0).await?;

        assert_eq!(delete_contribution(&db, c.id).await?, Some(ev.id));
        assert!(get_contribution_by_id(&db, c.id).await?.is_none());
        assert_eq!(delete_contribution(&db, c.id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_volunteer_history_is_joined_and_ordered() -> Result<()> {
        let db = setup_test_db().await?;
        let vol = create_test_volunteer(&db, "Jane Doe").await?;
        let spring = create_test_event(&db, "Spring", "2024-04-10").await?;
        let autumn = create_test_event(&db, "Autumn", "2024-10-10").await?;
        create_test_contribution(&db, spring.id, Some(vol.id), 1.0, 0.0, 0.0).await?;
        create_test_contribution(&db, autumn.id, Some(vol.id), 2.0, 0.0, 0.0).await?;
        create_test_contribution(&db, autumn.id, None, 9.0, 0.0, 0.0).await?;

        let history = list_contributions_for_volunteer(&db, vol.id).await?;
        let events: Vec<&str> = history.iter().map(|c| c.event_name.as_str()).collect();
        assert_eq!(events, vec!["Autumn", "Spring"]);
        assert_eq!(history[0].event_date, parse_test_date("2024-10-10"));

        assert_eq!(list_contributions_for_event(&db, autumn.id).await?.len(), 2);
        Ok(())
    }
}
