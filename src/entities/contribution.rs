//! Contribution entity - Hours, cash and materials given towards one event.
//!
//! `volunteer_name` and `volunteer_contact` are a snapshot taken at write time.
//! They survive deletion of the volunteer, which only clears `volunteer_id`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contribution database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contributions")]
pub struct Model {
    /// Unique identifier for the contribution
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Event this contribution belongs to
    pub event_id: i64,
    /// Volunteer who gave it, if recorded as a known volunteer
    pub volunteer_id: Option<i64>,
    /// Name of the contributor at the time of the contribution
    pub volunteer_name: String,
    /// Contact details as submitted
    pub volunteer_contact: Option<String>,
    /// Hours volunteered
    pub volunteer_hours: f64,
    /// Cash donated
    pub cash_donation: f64,
    /// What materials were given
    pub material_description: Option<String>,
    /// Estimated value of the materials
    pub material_value: f64,
    /// When the contribution was recorded
    pub created_at: DateTime,
}

/// Defines relationships between Contribution and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each contribution belongs to one event and goes away with it
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
    /// Each contribution optionally points at a volunteer
    #[sea_orm(
        belongs_to = "super::volunteer::Entity",
        from = "Column::VolunteerId",
        to = "super::volunteer::Column::Id",
        on_delete = "SetNull"
    )]
    Volunteer,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::volunteer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Volunteer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
