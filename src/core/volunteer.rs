//! Volunteer business logic - Individual contributor accounts.
//!
//! Deleting a volunteer never deletes their history: their contributions keep
//! the copied name, contact and amounts, and only lose the `volunteer_id` link.

use crate::{
    core::form::FormFields,
    entities::{Contribution, Volunteer, contribution, volunteer},
    errors::Result,
};
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use serde::Serialize;
use tracing::{info, instrument};

/// Fields accepted when adding a volunteer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerInput {
    /// Full name
    pub name: String,
    /// Phone number
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Notes
    pub notes: Option<String>,
}

impl VolunteerInput {
    /// Reads a volunteer from submitted form fields.
    pub fn from_form(form: &FormFields) -> Result<Self> {
        Ok(Self {
            name: form.required("name")?,
            phone: form.text("phone"),
            email: form.text("email"),
            address: form.text("address"),
            notes: form.text("notes"),
        })
    }
}

/// A volunteer together with the totals of everything they contributed.
///
/// Volunteers with no contributions report zero for every total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolunteerWithTotals {
    /// Volunteer id
    pub id: i64,
    /// Volunteer name
    pub name: String,
    /// Phone number
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Notes
    pub notes: Option<String>,
    /// When the volunteer was recorded
    pub created_at: DateTime,
    /// Sum of volunteered hours
    pub total_hours: f64,
    /// Sum of cash donations
    pub total_cash: f64,
    /// Sum of material values
    pub total_material: f64,
    /// Number of linked contributions
    pub contribution_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct VolunteerTotalsRow {
    id: i64,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    created_at: DateTime,
    total_hours: Option<f64>,
    total_cash: Option<f64>,
    total_material: Option<f64>,
    contribution_count: i64,
}

impl From<VolunteerTotalsRow> for VolunteerWithTotals {
    fn from(row: VolunteerTotalsRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            notes: row.notes,
            created_at: row.created_at,
            total_hours: row.total_hours.unwrap_or(0.0),
            total_cash: row.total_cash.unwrap_or(0.0),
            total_material: row.total_material.unwrap_or(0.0),
            contribution_count: row.contribution_count,
        }
    }
}

/// Retrieves all volunteers ordered alphabetically by name.
pub async fn list_volunteers(db: &DatabaseConnection) -> Result<Vec<volunteer::Model>> {
    Volunteer::find()
        .order_by_asc(volunteer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every volunteer with their contribution totals, ordered by name.
///
/// Volunteers without contributions are included with a count of zero.
pub async fn list_volunteers_with_totals(
    db: &DatabaseConnection,
) -> Result<Vec<VolunteerWithTotals>> {
    let rows = Volunteer::find()
        .left_join(Contribution)
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
        .group_by(volunteer::Column::Id)
        .order_by_asc(volunteer::Column::Name)
        .into_model::<VolunteerTotalsRow>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Finds a volunteer by id, returning None if it does not exist.
pub async fn get_volunteer_by_id<C>(
    db: &C,
    volunteer_id: i64,
) -> Result<Option<volunteer::Model>>
where
    C: ConnectionTrait,
{
    Volunteer::find_by_id(volunteer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records a new volunteer.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_volunteer(
    db: &DatabaseConnection,
    input: VolunteerInput,
) -> Result<volunteer::Model> {
    let model = volunteer::ActiveModel {
        name: Set(input.name),
        phone: Set(input.phone),
        email: Set(input.email),
        address: Set(input.address),
        notes: Set(input.notes),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!("Added volunteer '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Deletes a volunteer, first unlinking their contributions.
///
/// Both statements run in one transaction. Returns whether the volunteer
/// existed.
#[instrument(skip(db))]
pub async fn delete_volunteer(db: &DatabaseConnection, volunteer_id: i64) -> Result<bool> {
    let txn = db.begin().await?;

    let unlinked = Contribution::update_many()
        .col_expr(
            contribution::Column::VolunteerId,
            Expr::value(Option::<i64>::None),
        )
        .filter(contribution::Column::VolunteerId.eq(volunteer_id))
        .exec(&txn)
        .await?;

    let deleted = Volunteer::delete_by_id(volunteer_id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        "Deleted volunteer {volunteer_id}, unlinked {} contribution(s)",
        unlinked.rows_affected
    );
    Ok(deleted.rows_affected > 0)
}
