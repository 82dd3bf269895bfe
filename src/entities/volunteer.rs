//! Volunteer entity - Individual donors and participants.
//!
//! A volunteer is distinct from an organization. Contributions may point at a
//! volunteer; deleting the volunteer clears that pointer but keeps the
//! contribution and its copied name.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Volunteer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "volunteers")]
pub struct Model {
    /// Unique identifier for the volunteer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name, copied onto each contribution at write time
    pub name: String,
    /// Phone number
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the volunteer was recorded
    pub created_at: DateTime,
}

/// Defines relationships between Volunteer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One volunteer has many contributions
    #[sea_orm(has_many = "super::contribution::Entity")]
    Contributions,
}

impl Related<super::contribution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
