//! Event entity - A single community event and its outcome figures.
//!
//! The `quarter` column is derived from `event_date` on every write and is
//! never taken from caller input. `event_type_id` and `organization_id` are
//! plain columns without storage foreign keys: deleting the referenced row
//! leaves a dangling id behind, and display joins are LEFT JOINs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_profiles")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Event name
    pub event_name: String,
    /// Calendar date the event takes place
    pub event_date: Date,
    /// Optional event type reference (may dangle)
    pub event_type_id: Option<i64>,
    /// Where the event takes place
    pub location: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// Optional organization reference (may dangle)
    pub organization_id: Option<i64>,
    /// Coordinator name
    pub coordinator_name: Option<String>,
    /// Coordinator phone number
    pub coordinator_phone: Option<String>,
    /// Coordinator email address
    pub coordinator_email: Option<String>,
    /// Participants expected when planning
    pub expected_participants: i64,
    /// Participants who actually attended
    pub actual_participants: i64,
    /// Income raised
    pub income: f64,
    /// Expenses incurred
    pub expense: f64,
    /// Free-text notes
    pub notes: Option<String>,
    /// Free-text status, `"In Progress"` unless stated otherwise
    pub status: String,
    /// When the event was first entered
    pub entry_date: DateTime,
    /// Fiscal quarter label derived from `event_date`, e.g. `"2024Q1"`
    pub quarter: String,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One event has many contributions
    #[sea_orm(has_many = "super::contribution::Entity")]
    Contributions,
}

impl Related<super::contribution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

// Join-only relations. They stay out of `Relation` so table creation does not
// emit foreign keys that would block deleting a type or organization.
impl Related<super::event_type::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::event_type::Entity)
            .from(Column::EventTypeId)
            .to(super::event_type::Column::Id)
            .into()
    }
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::organization::Entity)
            .from(Column::OrganizationId)
            .to(super::organization::Column::Id)
            .into()
    }
}

impl ActiveModelBehavior for ActiveModel {}
