//! Quarterly summary entity - Cached totals for one fiscal quarter.
//!
//! Rows are keyed by `(year, quarter)` through a unique index created
//! alongside the table. They are recomputed on demand and dropped whenever an
//! event or contribution in the quarter changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quarterly summary database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quarterly_summaries")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar year
    pub year: i32,
    /// Quarter number, 1 through 4
    pub quarter: i32,
    /// Number of events dated in the quarter
    pub total_events: i64,
    /// Sum of contribution hours for those events
    pub total_volunteer_hours: f64,
    /// Sum of cash donations for those events
    pub total_cash_donations: f64,
    /// Sum of material values for those events
    pub total_material_value: f64,
    /// Sum of actual participants across those events
    pub total_participants: i64,
    /// When the row was computed
    pub generated_at: DateTime,
}

/// `QuarterlySummary` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
